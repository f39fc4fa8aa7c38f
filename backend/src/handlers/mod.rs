//! HTTP handlers for the School Inventory Management Platform

pub mod activity;
pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod health;
pub mod issuances;
pub mod movements;
pub mod stock;
pub mod subscribe;
pub mod uniforms;

pub use activity::*;
pub use auth::*;
pub use categories::*;
pub use dashboard::*;
pub use health::*;
pub use issuances::*;
pub use movements::*;
pub use stock::*;
pub use subscribe::*;
pub use uniforms::*;
