use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::app::{dto, errors, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", post(register_item).get(list_items))
        .route(
            "/:barcode",
            get(lookup_item).patch(update_item).delete(remove_item),
        )
        .route("/:barcode/move", post(move_item))
}

pub async fn register_item(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::RegisterItemRequest>,
) -> axum::response::Response {
    match services.registry.register(body.into()) {
        Ok(item) => (StatusCode::CREATED, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListItemsQuery>,
) -> axum::response::Response {
    match services.registry.list(&query.into()) {
        Ok(summaries) => (StatusCode::OK, Json(summaries)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn lookup_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(barcode): Path<String>,
) -> axum::response::Response {
    match services.registry.find_by_barcode(&barcode) {
        Ok(Some(item)) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "no item registered for this barcode",
        ),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(barcode): Path<String>,
    Json(body): Json<dto::UpdateItemRequest>,
) -> axum::response::Response {
    let item = match services.registry.find_by_barcode(&barcode) {
        Ok(Some(item)) => item,
        Ok(None) => {
            return errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                "no item registered for this barcode",
            )
        }
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .registry
        .update_descriptive(item.id_typed(), body.into())
    {
        Ok(updated) => (StatusCode::OK, Json(dto::item_to_json(&updated))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn remove_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(barcode): Path<String>,
) -> axum::response::Response {
    let item = match services.registry.find_by_barcode(&barcode) {
        Ok(Some(item)) => item,
        Ok(None) => {
            return errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                "no item registered for this barcode",
            )
        }
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.registry.remove(item.id_typed()) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn move_item(
    Extension(services): Extension<Arc<AppServices>>,
    Path(barcode): Path<String>,
    Json(body): Json<dto::MoveItemRequest>,
) -> axum::response::Response {
    match services.ledger.move_item(body.into_move(barcode)) {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
