//! # REST API for autopay plans

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use tracing::info;

use crate::domain::errors::LedgerError;
use crate::io::rest::error_response;
use crate::io::rest::mappers::AutopayMapper;
use crate::AppState;
use shared::{CreatePlanRequest, CreatedResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ledger/:owner/autopay", get(list_plans).post(create_plan))
        .route("/ledger/:owner/autopay/process", post(process_plans))
        .route("/ledger/:owner/autopay/:id", delete(deactivate_plan))
}

pub async fn list_plans(State(state): State<AppState>, Path(owner): Path<String>) -> impl IntoResponse {
    info!("GET /api/ledger/{}/autopay", owner);

    match state.autopay_service.list_active_plans(&owner).await {
        Ok(plans) => (StatusCode::OK, Json(AutopayMapper::to_dto_list(plans))).into_response(),
        Err(e) => error_response("list autopay plans", e),
    }
}

pub async fn create_plan(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    Json(request): Json<CreatePlanRequest>,
) -> impl IntoResponse {
    info!("POST /api/ledger/{}/autopay - request: {:?}", owner, request);

    let command = match AutopayMapper::to_create_command(request) {
        Ok(command) => command,
        Err(e) => return error_response("create autopay plan", LedgerError::from(e)),
    };

    match state.autopay_service.create_plan(&owner, command).await {
        Ok(id) => {
            let response = CreatedResponse {
                id,
                success_message: "Autopay plan created successfully".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("create autopay plan", e),
    }
}

/// Catch up every due plan now
pub async fn process_plans(State(state): State<AppState>, Path(owner): Path<String>) -> impl IntoResponse {
    info!("POST /api/ledger/{}/autopay/process", owner);

    match state.autopay_service.process_due_plans(&owner).await {
        Ok(report) => (StatusCode::OK, Json(AutopayMapper::to_run_response(report))).into_response(),
        Err(e) => error_response("process autopay plans", e),
    }
}

pub async fn deactivate_plan(State(state): State<AppState>, Path((owner, id)): Path<(String, i64)>) -> impl IntoResponse {
    info!("DELETE /api/ledger/{}/autopay/{}", owner, id);

    match state.autopay_service.deactivate_plan(&owner, id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("deactivate autopay plan", e),
    }
}
