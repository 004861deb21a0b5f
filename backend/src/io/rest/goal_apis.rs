//! # REST API for goals
//!
//! Creating and deleting goals, moving money into them and pinning them on
//! the dashboard.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get, post},
    Router,
};
use tracing::info;

use crate::domain::errors::LedgerError;
use crate::io::rest::{error_response, prepare_reads};
use crate::io::rest::mappers::GoalMapper;
use crate::AppState;
use shared::{ActiveGoalsResponse, AddGoalRequest, AdjustGoalRequest, AllocateToGoalRequest, CreatedResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ledger/:owner/goals", get(list_goals).post(add_goal))
        .route("/ledger/:owner/goals/:id", delete(delete_goal))
        .route("/ledger/:owner/goals/:id/adjust", post(adjust_goal))
        .route("/ledger/:owner/goals/:id/allocate", post(allocate_to_goal))
        .route("/ledger/:owner/goals/:id/toggle-active", post(toggle_active_goal))
        .route("/ledger/:owner/active-goals", get(get_active_goals))
}

pub async fn list_goals(State(state): State<AppState>, Path(owner): Path<String>) -> impl IntoResponse {
    info!("GET /api/ledger/{}/goals", owner);

    if let Err(response) = prepare_reads(&state, &owner).await {
        return response;
    }
    match state.goal_service.list_goals(&owner).await {
        Ok(goals) => (StatusCode::OK, Json(GoalMapper::to_dto_list(goals))).into_response(),
        Err(e) => error_response("list goals", e),
    }
}

pub async fn add_goal(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    Json(request): Json<AddGoalRequest>,
) -> impl IntoResponse {
    info!("POST /api/ledger/{}/goals - request: {:?}", owner, request);

    let command = match GoalMapper::to_add_command(request) {
        Ok(command) => command,
        Err(e) => return error_response("add goal", LedgerError::from(e)),
    };

    match state.goal_service.add_goal(&owner, command).await {
        Ok(id) => {
            let response = CreatedResponse {
                id,
                success_message: "Goal created successfully".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("add goal", e),
    }
}

pub async fn delete_goal(State(state): State<AppState>, Path((owner, id)): Path<(String, i64)>) -> impl IntoResponse {
    info!("DELETE /api/ledger/{}/goals/{}", owner, id);

    match state.goal_service.delete_goal(&owner, id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete goal", e),
    }
}

/// Apply a signed delta; unknown goals are ignored
pub async fn adjust_goal(
    State(state): State<AppState>,
    Path((owner, id)): Path<(String, i64)>,
    Json(request): Json<AdjustGoalRequest>,
) -> impl IntoResponse {
    info!("POST /api/ledger/{}/goals/{}/adjust - request: {:?}", owner, id, request);

    match state.goal_service.adjust_goal(&owner, id, request.delta).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("adjust goal", e),
    }
}

pub async fn allocate_to_goal(
    State(state): State<AppState>,
    Path((owner, id)): Path<(String, i64)>,
    Json(request): Json<AllocateToGoalRequest>,
) -> impl IntoResponse {
    info!("POST /api/ledger/{}/goals/{}/allocate - request: {:?}", owner, id, request);

    let command = match GoalMapper::to_allocate_command(id, request) {
        Ok(command) => command,
        Err(e) => return error_response("allocate to goal", LedgerError::from(e)),
    };

    match state.goal_service.allocate_to_goal(&owner, command).await {
        Ok(entry_id) => {
            let response = CreatedResponse {
                id: entry_id,
                success_message: "Money added to goal".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("allocate to goal", e),
    }
}

pub async fn toggle_active_goal(State(state): State<AppState>, Path((owner, id)): Path<(String, i64)>) -> impl IntoResponse {
    info!("POST /api/ledger/{}/goals/{}/toggle-active", owner, id);

    match state.goal_service.toggle_active_goal(&owner, id).await {
        Ok(active_goal_ids) => (StatusCode::OK, Json(ActiveGoalsResponse { active_goal_ids })).into_response(),
        Err(e) => error_response("toggle active goal", e),
    }
}

pub async fn get_active_goals(State(state): State<AppState>, Path(owner): Path<String>) -> impl IntoResponse {
    info!("GET /api/ledger/{}/active-goals", owner);

    match state.goal_service.active_goal_ids(&owner).await {
        Ok(active_goal_ids) => (StatusCode::OK, Json(ActiveGoalsResponse { active_goal_ids })).into_response(),
        Err(e) => error_response("get active goals", e),
    }
}
