use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use tracing::info;

use crate::io::rest::error_response;
use crate::io::rest::mappers::ReportMapper;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/ledger/:owner/dashboard", get(get_dashboard))
}

/// Run the refresh pipeline and return the full home-screen view
pub async fn get_dashboard(State(state): State<AppState>, Path(owner): Path<String>) -> impl IntoResponse {
    info!("GET /api/ledger/{}/dashboard", owner);

    match state.dashboard_service.refresh_dashboard(&owner).await {
        Ok(view) => (StatusCode::OK, Json(ReportMapper::to_dashboard_dto(view))).into_response(),
        Err(e) => error_response("refresh dashboard", e),
    }
}
