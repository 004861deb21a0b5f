use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, put},
    Router,
};
use tracing::info;

use crate::domain::errors::LedgerError;
use crate::io::rest::error_response;
use crate::AppState;
use shared::KeyValue;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/settings", put(set_setting))
        .route("/settings/:key", get(get_setting).delete(delete_setting))
}

pub async fn get_setting(State(state): State<AppState>, Path(key): Path<String>) -> impl IntoResponse {
    info!("GET /api/settings/{}", key);

    match state.settings_service.get(&key).await {
        Ok(Some(value)) => (StatusCode::OK, Json(KeyValue { key, value })).into_response(),
        Ok(None) => error_response("get setting", LedgerError::not_found("Setting", &key)),
        Err(e) => error_response("get setting", e),
    }
}

pub async fn set_setting(State(state): State<AppState>, Json(request): Json<KeyValue>) -> impl IntoResponse {
    info!("PUT /api/settings - key: {}", request.key);

    match state.settings_service.set(&request.key, &request.value).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("set setting", e),
    }
}

pub async fn delete_setting(State(state): State<AppState>, Path(key): Path<String>) -> impl IntoResponse {
    info!("DELETE /api/settings/{}", key);

    match state.settings_service.delete(&key).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete setting", e),
    }
}
