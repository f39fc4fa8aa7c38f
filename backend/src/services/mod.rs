//! Business logic services for the School Inventory Management Platform

pub mod activity;
pub mod auth;
pub mod category;
pub mod dashboard;
pub mod issuance;
pub mod movement;
pub mod notifier;
pub mod stock;
pub mod uniform;

pub use activity::ActivityService;
pub use auth::AuthService;
pub use category::CategoryService;
pub use dashboard::DashboardService;
pub use issuance::IssuanceService;
pub use movement::MovementService;
pub use notifier::ChangeNotifier;
pub use stock::StockService;
pub use uniform::UniformService;
