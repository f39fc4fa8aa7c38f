//! Shared types and models for the School Inventory Management Platform
//!
//! This crate contains the contract types shared between the backend services
//! and any other consumers of the ledger: domain models for both inventory
//! ledgers, the stock status classifier, and input validation helpers.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
