//! # REST API Interface Layer
//!
//! HTTP endpoints for the ledger. Every ledger resource lives under
//! `/ledger/:owner/...`; the owner is the account email.
//!
//! Domain errors become status codes here and nowhere else:
//! validation 400, unknown account or goal 404, duplicate account 409,
//! wrong credential 401, storage 500. The body is the plain error message.
//!
//! Handlers that read an owner's entries, goals or aggregates call
//! [`prepare_reads`] first, the same pre-read step the dashboard runs.

pub mod autopay_apis;
pub mod dashboard_apis;
pub mod entry_apis;
pub mod goal_apis;
pub mod mappers;
pub mod report_apis;
pub mod settings_apis;
pub mod user_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use tracing::{error, warn};

use crate::domain::errors::LedgerError;
use crate::AppState;

/// Every API router, relative to `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(user_apis::router())
        .merge(dashboard_apis::router())
        .merge(entry_apis::router())
        .merge(autopay_apis::router())
        .merge(goal_apis::router())
        .merge(report_apis::router())
        .merge(settings_apis::router())
}

pub fn status_for(error: &LedgerError) -> StatusCode {
    match error {
        LedgerError::Validation(_) => StatusCode::BAD_REQUEST,
        LedgerError::NotFound { .. } => StatusCode::NOT_FOUND,
        LedgerError::Conflict(_) => StatusCode::CONFLICT,
        LedgerError::Unauthorized => StatusCode::UNAUTHORIZED,
        LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Purge demo data and catch up due autopay before serving an owner's read
pub async fn prepare_reads(state: &AppState, owner: &str) -> Result<(), Response> {
    match state.dashboard_service.prepare_reads(owner).await {
        Ok(_) => Ok(()),
        Err(e) => Err(error_response("prepare ledger reads", e)),
    }
}

/// Log a failed operation and turn it into a plain-text response
pub fn error_response(action: &str, error: LedgerError) -> Response {
    let status = status_for(&error);
    if status.is_server_error() {
        error!("Failed to {}: {:#}", action, error);
    } else {
        warn!("Rejected {}: {}", action, error);
    }
    (status, error.to_string()).into_response()
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::{
        body::Body,
        http::{Method, Request, Response},
        Router,
    };
    use serde::de::DeserializeOwned;
    use tower::util::ServiceExt; // for `oneshot`

    use crate::storage::LedgerStore;
    use crate::AppState;

    pub async fn setup_test_app() -> Router {
        let store = LedgerStore::init_test().await.expect("Failed to create test store");
        super::router().with_state(AppState::from_store(store))
    }

    pub async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.clone().oneshot(request).await.unwrap()
    }

    pub async fn read_json<T: DeserializeOwned>(response: Response<Body>) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    pub async fn read_text(response: Response<Body>) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }
}
