//! # Bodega Server
//!
//! HTTP JSON API for the inventory tracker.
//!
//! ## Route Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         API Surface                                     │
//! │                                                                         │
//! │  /api/productos          GET list · POST create                        │
//! │  /api/productos/:id      GET · PUT · DELETE (cascades the ledger)      │
//! │  /api/productos/:id/foto POST multipart upload                         │
//! │  /api/clientes[/:id]     GET list · POST · GET · PUT · DELETE          │
//! │  /api/trabajadores[/:id] GET list · POST · GET · PUT · DELETE          │
//! │  /api/cajeros[/:id]      GET list · POST · GET · PUT · DELETE          │
//! │  /api/movimientos        GET list (?producto=) · POST create           │
//! │  /api/movimientos/:id    GET  (append-only, no PUT/DELETE)             │
//! │  /media/*                static product photos                         │
//! │  /health                 liveness + database check                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `PORT` - HTTP listen port (default: 8000)
//! - `DATABASE_PATH` - SQLite file path (default: ./bodega.db)
//! - `MEDIA_DIR` - uploaded photo directory (default: ./media)
//! - `MAX_BODY_BYTES` - request body cap (default: 10MB)
//! - `RUST_LOG` - tracing filter (default: info)

pub mod config;
pub mod error;
pub mod handlers;

use std::path::PathBuf;

use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use bodega_db::Database;

// Re-exports
pub use config::ServerConfig;
pub use error::{ApiError, ErrorCode};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub media_dir: PathBuf,
    pub max_body_bytes: usize,
}

/// Builds the application router.
///
/// Everything the server can do hangs off this function, which is also the
/// entry point for integration tests (drive the router in-process, no
/// socket needed).
pub fn create_router(state: AppState) -> Router {
    use handlers::{cashiers, customers, movements, products, workers};

    let max_body_bytes = state.max_body_bytes;

    Router::new()
        // Products
        .route(
            "/api/productos",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/api/productos/:id",
            get(products::get_product)
                .put(products::update_product)
                .delete(products::delete_product),
        )
        .route("/api/productos/:id/foto", post(products::upload_photo))
        // Customers
        .route(
            "/api/clientes",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/api/clientes/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        )
        // Workers
        .route(
            "/api/trabajadores",
            get(workers::list_workers).post(workers::create_worker),
        )
        .route(
            "/api/trabajadores/:id",
            get(workers::get_worker)
                .put(workers::update_worker)
                .delete(workers::delete_worker),
        )
        // Cashiers
        .route(
            "/api/cajeros",
            get(cashiers::list_cashiers).post(cashiers::create_cashier),
        )
        .route(
            "/api/cajeros/:id",
            get(cashiers::get_cashier)
                .put(cashiers::update_cashier)
                .delete(cashiers::delete_cashier),
        )
        // Stock ledger (append-only: list, read, create)
        .route(
            "/api/movimientos",
            get(movements::list_movements).post(movements::create_movement),
        )
        .route("/api/movimientos/:id", get(movements::get_movement))
        // Health
        .route("/health", get(health))
        // Static product photos
        .nest_service("/media", ServeDir::new(state.media_dir.clone()))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(DefaultBodyLimit::max(max_body_bytes)),
        )
        .with_state(state)
}

/// `GET /health` - liveness plus a database round trip.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = state.db.health_check().await;
    Json(serde_json::json!({
        "status": if database { "ok" } else { "degraded" },
        "database": database,
    }))
}
