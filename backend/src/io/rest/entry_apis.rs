//! # REST API for ledger entries

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use tracing::info;

use crate::domain::errors::LedgerError;
use crate::io::rest::{error_response, prepare_reads};
use crate::io::rest::mappers::EntryMapper;
use crate::AppState;
use shared::{AddEntryRequest, CreatedResponse};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ledger/:owner/entries", get(list_entries).post(add_entry))
        .route("/ledger/:owner/entries/:id", delete(delete_entry))
}

#[derive(Debug, Deserialize)]
pub struct EntryListQuery {
    pub kind: String,
    pub limit: Option<u32>,
}

/// List entries of one kind, newest first
pub async fn list_entries(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    Query(query): Query<EntryListQuery>,
) -> impl IntoResponse {
    info!("GET /api/ledger/{}/entries - query: {:?}", owner, query);

    let kind = match EntryMapper::parse_kind(&query.kind) {
        Ok(kind) => kind,
        Err(e) => return error_response("list entries", LedgerError::from(e)),
    };

    if let Err(response) = prepare_reads(&state, &owner).await {
        return response;
    }
    match state.entry_service.list_entries(&owner, kind, query.limit).await {
        Ok(entries) => (StatusCode::OK, Json(EntryMapper::to_dto_list(entries))).into_response(),
        Err(e) => error_response("list entries", e),
    }
}

pub async fn add_entry(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    Json(request): Json<AddEntryRequest>,
) -> impl IntoResponse {
    info!("POST /api/ledger/{}/entries - request: {:?}", owner, request);

    let command = match EntryMapper::to_add_command(request) {
        Ok(command) => command,
        Err(e) => return error_response("add entry", LedgerError::from(e)),
    };

    match state.entry_service.add_entry(&owner, command).await {
        Ok(id) => {
            let response = CreatedResponse {
                id,
                success_message: "Entry added successfully".to_string(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("add entry", e),
    }
}

/// Delete an entry; unknown ids still answer 204
pub async fn delete_entry(State(state): State<AppState>, Path((owner, id)): Path<(String, i64)>) -> impl IntoResponse {
    info!("DELETE /api/ledger/{}/entries/{}", owner, id);

    match state.entry_service.delete_entry(&owner, id).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete entry", e),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{read_json, read_text, send, setup_test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use shared::{CreatedResponse, FinanceEntry, FinanceKind};

    const BASE: &str = "/ledger/sam@example.com/entries";

    #[tokio::test]
    async fn test_add_list_and_delete_entry() {
        let app = setup_test_app().await;

        let response = send(
            &app,
            Method::POST,
            BASE,
            Some(json!({"kind": "expense", "title": "Coffee", "amount": 4.5, "entry_date": "2024-03-02"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: CreatedResponse = read_json(response).await;

        let listed = send(&app, Method::GET, &format!("{}?kind=expense", BASE), None).await;
        assert_eq!(listed.status(), StatusCode::OK);
        let entries: Vec<FinanceEntry> = read_json(listed).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, created.id);
        assert_eq!(entries[0].kind, FinanceKind::Expense);
        assert_eq!(entries[0].category, "General");
        assert_eq!(entries[0].entry_date, "2024-03-02");

        let deleted = send(&app, Method::DELETE, &format!("{}/{}", BASE, created.id), None).await;
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
        let again = send(&app, Method::DELETE, &format!("{}/{}", BASE, created.id), None).await;
        assert_eq!(again.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_invalid_entries_are_bad_requests() {
        let app = setup_test_app().await;

        let negative = send(&app, Method::POST, BASE, Some(json!({"kind": "income", "title": "Pay", "amount": -1.0}))).await;
        assert_eq!(negative.status(), StatusCode::BAD_REQUEST);

        let bad_date = send(
            &app,
            Method::POST,
            BASE,
            Some(json!({"kind": "income", "title": "Pay", "amount": 1.0, "entry_date": "03/02/2024"})),
        )
        .await;
        assert_eq!(bad_date.status(), StatusCode::BAD_REQUEST);
        assert!(read_text(bad_date).await.contains("expected YYYY-MM-DD"));

        let bad_kind = send(&app, Method::GET, &format!("{}?kind=refund", BASE), None).await;
        assert_eq!(bad_kind.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_owner_path_is_case_insensitive() {
        let app = setup_test_app().await;

        let response = send(
            &app,
            Method::POST,
            "/ledger/Sam@Example.COM/entries",
            Some(json!({"kind": "income", "title": "Paycheck", "amount": 900.0})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let entries: Vec<FinanceEntry> = read_json(send(&app, Method::GET, &format!("{}?kind=income", BASE), None).await).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_email, "sam@example.com");
    }
}
