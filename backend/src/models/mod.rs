//! Database models for the School Inventory Management Platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
