use axum::Router;

pub mod items;
pub mod movements;

/// Router for all inventory endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/items", items::router())
        .nest("/movements", movements::router())
}
