//! Route definitions for the ChemStock inventory and dispatch API

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Product catalogue
        .nest("/products", product_routes())
        // Customer registry
        .nest("/customers", customer_routes())
        // Stock adjustments and the movement ledger
        .nest("/stock", stock_routes())
        // Invoice issuance and lookups
        .nest("/invoices", invoice_routes())
        // Dispatch log
        .nest("/dispatches", dispatch_routes())
        // Location registry
        .nest("/locations", location_routes())
        // Maintenance jobs
        .nest("/maintenance", maintenance_routes())
}

/// Product catalogue routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route("/low-stock", get(handlers::list_low_stock_products))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
}

/// Customer registry routes
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customers).post(handlers::create_customer))
        .route(
            "/:customer_id",
            put(handlers::update_customer).delete(handlers::delete_customer),
        )
}

/// Stock adjustment routes
fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/entries", post(handlers::add_stock))
        .route("/corrections", post(handlers::update_stock_level))
        .route("/transfers", get(handlers::list_transfers).post(handlers::transfer_stock))
        .route("/movements", get(handlers::list_movements))
}

/// Invoice routes
fn invoice_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_invoices).post(handlers::issue_invoice))
        .route("/:invoice_id", get(handlers::get_invoice))
        .route("/:invoice_id/items", get(handlers::get_invoice_items))
        .route("/:invoice_id/dispatches", get(handlers::get_invoice_dispatches))
}

/// Dispatch log routes
fn dispatch_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_dispatches))
}

/// Location registry routes
fn location_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_locations).put(handlers::upsert_location))
        .route("/:name/next-invoice-no", get(handlers::next_invoice_no))
}

/// Maintenance routes
fn maintenance_routes() -> Router<AppState> {
    Router::new().route("/backfill-dispatches", post(handlers::backfill_dispatches))
}
