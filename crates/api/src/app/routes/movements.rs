use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::{dto, errors, AppServices};

pub fn router() -> Router {
    Router::new().route("/", get(history))
}

pub async fn history(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::HistoryQuery>,
) -> axum::response::Response {
    match services.ledger.history(query.barcode.as_deref()) {
        Ok(records) => (StatusCode::OK, Json(records)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
