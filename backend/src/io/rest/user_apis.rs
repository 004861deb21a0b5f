//! # REST API for accounts
//!
//! Sign-up, sign-in and credential reset. Responses carry the public profile
//! only.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{post, put},
    Router,
};
use tracing::info;

use crate::io::rest::error_response;
use crate::io::rest::mappers::UserMapper;
use crate::AppState;
use shared::{ResetCredentialRequest, SignInRequest, SignUpRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/signup", post(sign_up))
        .route("/users/signin", post(sign_in))
        .route("/users/credential", put(reset_credential))
}

pub async fn sign_up(State(state): State<AppState>, Json(request): Json<SignUpRequest>) -> impl IntoResponse {
    info!("POST /api/users/signup - email: {}", request.email);

    match state
        .user_service
        .sign_up(&request.email, &request.username, &request.credential)
        .await
    {
        Ok(user) => (StatusCode::CREATED, Json(UserMapper::to_profile(user))).into_response(),
        Err(e) => error_response("sign up", e),
    }
}

pub async fn sign_in(State(state): State<AppState>, Json(request): Json<SignInRequest>) -> impl IntoResponse {
    info!("POST /api/users/signin - email: {}", request.email);

    match state.user_service.sign_in(&request.email, &request.credential).await {
        Ok(user) => (StatusCode::OK, Json(UserMapper::to_profile(user))).into_response(),
        Err(e) => error_response("sign in", e),
    }
}

pub async fn reset_credential(
    State(state): State<AppState>,
    Json(request): Json<ResetCredentialRequest>,
) -> impl IntoResponse {
    info!("PUT /api/users/credential - email: {}", request.email);

    match state.user_service.reset_credential(&request.email, &request.credential).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("reset credential", e),
    }
}
