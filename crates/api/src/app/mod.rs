//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `routes/`: HTTP routes + handlers (one file per domain area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use stocktrace_infra::{InventoryStore, ItemRegistry, MovementLedger};

pub mod dto;
pub mod errors;
pub mod routes;

/// Shared service state for all handlers.
pub struct AppServices {
    pub registry: ItemRegistry<Arc<dyn InventoryStore>>,
    pub ledger: MovementLedger<Arc<dyn InventoryStore>>,
}

impl AppServices {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self {
            registry: ItemRegistry::new(Arc::clone(&store)),
            ledger: MovementLedger::new(store),
        }
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(store: Arc<dyn InventoryStore>) -> Router {
    let services = Arc::new(AppServices::new(store));

    Router::new()
        .route("/health", get(health))
        .merge(routes::router())
        .layer(Extension(services))
        .layer(ServiceBuilder::new())
}

async fn health() -> &'static str {
    "ok"
}
