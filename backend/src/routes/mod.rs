//! Route definitions for the School Inventory Management Platform

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - stock ledger
        .nest("/stock", stock_routes())
        // Protected routes - stock categories
        .nest("/categories", category_routes())
        // Protected routes - stock movement log
        .nest("/movements", movement_routes())
        // Protected routes - activity log
        .nest("/activity", activity_routes())
        // Protected routes - uniform ledger
        .nest("/uniforms", uniform_routes())
        // Protected routes - issued uniform records
        .nest("/issuances", issuance_routes())
        // Protected routes - dashboard statistics
        .nest("/dashboard", dashboard_routes())
        // Protected routes - change-notification feed
        .nest("/subscribe", subscribe_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Stock ledger routes (protected)
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_stock_items).post(handlers::create_stock_item),
        )
        .route(
            "/:item_id",
            get(handlers::get_stock_item)
                .put(handlers::update_stock_item)
                .delete(handlers::delete_stock_item),
        )
        .route("/:item_id/issue", post(handlers::issue_stock_item))
        .route("/:item_id/return", post(handlers::return_stock_item))
        .route("/:item_id/movements", get(handlers::get_stock_item_movements))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock category routes (protected)
fn category_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route("/:category_id", delete(handlers::delete_category))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Stock movement log routes (protected)
fn movement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_movements))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Activity log routes (protected)
fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_activity))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Uniform ledger routes (protected)
fn uniform_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_uniforms).post(handlers::create_uniform),
        )
        .route(
            "/categories",
            get(handlers::list_uniform_categories).post(handlers::create_uniform_category),
        )
        .route(
            "/categories/:category_id",
            delete(handlers::delete_uniform_category),
        )
        .route("/movements", get(handlers::list_uniform_movements))
        .route(
            "/:item_id",
            get(handlers::get_uniform)
                .put(handlers::update_uniform)
                .delete(handlers::delete_uniform),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Issued uniform record routes (protected)
fn issuance_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_issued_records).post(handlers::issue_uniform),
        )
        .route(
            "/:record_id",
            axum::routing::put(handlers::update_issued_record)
                .delete(handlers::delete_issued_record),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Dashboard routes (protected)
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::get_dashboard_stats))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Change-notification feed routes (protected)
fn subscribe_routes() -> Router<AppState> {
    Router::new()
        .route("/:collection", get(handlers::subscribe_changes))
        .route_layer(middleware::from_fn(auth_middleware))
}
