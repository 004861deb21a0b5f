//! # REST API for budgets and aggregated reports

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Deserialize;
use tracing::info;

use crate::domain::aggregation_service::DEFAULT_SERIES_MONTHS;
use crate::domain::commands::budgets::UpsertBudgetCommand;
use crate::domain::errors::LedgerError;
use crate::io::rest::{error_response, prepare_reads};
use crate::io::rest::mappers::{EntryMapper, ReportMapper};
use crate::AppState;
use shared::{BalanceResponse, ScoreResponse, UpsertBudgetRequest};

/// Longest series the API will compute
const MAX_SERIES_MONTHS: usize = 120;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ledger/:owner/budget", get(get_budget_overview).put(upsert_budget))
        .route("/ledger/:owner/summary", get(get_summary))
        .route("/ledger/:owner/totals", get(get_monthly_totals))
        .route("/ledger/:owner/balance", get(get_balance))
        .route("/ledger/:owner/score", get(get_score))
}

#[derive(Debug, Deserialize)]
pub struct TotalsQuery {
    pub kind: String,
    pub months: Option<usize>,
}

pub async fn get_budget_overview(State(state): State<AppState>, Path(owner): Path<String>) -> impl IntoResponse {
    info!("GET /api/ledger/{}/budget", owner);

    if let Err(response) = prepare_reads(&state, &owner).await {
        return response;
    }
    match state.aggregation_service.budget_overview(&owner).await {
        Ok(overview) => (StatusCode::OK, Json(ReportMapper::to_budget_dto(overview))).into_response(),
        Err(e) => error_response("get budget overview", e),
    }
}

/// Set a month's budget and answer with the refreshed overview
pub async fn upsert_budget(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    Json(request): Json<UpsertBudgetRequest>,
) -> impl IntoResponse {
    info!("PUT /api/ledger/{}/budget - request: {:?}", owner, request);

    let month_key = match ReportMapper::parse_month_key(request.month_key.as_deref()) {
        Ok(month_key) => month_key,
        Err(e) => return error_response("upsert budget", LedgerError::from(e)),
    };
    let command = UpsertBudgetCommand {
        amount: request.amount,
        month_key,
    };

    if let Err(e) = state.budget_service.upsert_budget(&owner, command).await {
        return error_response("upsert budget", e);
    }
    if let Err(response) = prepare_reads(&state, &owner).await {
        return response;
    }
    match state.aggregation_service.budget_overview(&owner).await {
        Ok(overview) => (StatusCode::OK, Json(ReportMapper::to_budget_dto(overview))).into_response(),
        Err(e) => error_response("get budget overview", e),
    }
}

pub async fn get_summary(State(state): State<AppState>, Path(owner): Path<String>) -> impl IntoResponse {
    info!("GET /api/ledger/{}/summary", owner);

    if let Err(response) = prepare_reads(&state, &owner).await {
        return response;
    }
    match state.aggregation_service.current_month_summary(&owner).await {
        Ok(summary) => (StatusCode::OK, Json(ReportMapper::to_summary_dto(summary))).into_response(),
        Err(e) => error_response("get month summary", e),
    }
}

pub async fn get_monthly_totals(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    Query(query): Query<TotalsQuery>,
) -> impl IntoResponse {
    info!("GET /api/ledger/{}/totals - query: {:?}", owner, query);

    let kind = match EntryMapper::parse_kind(&query.kind) {
        Ok(kind) => kind,
        Err(e) => return error_response("get monthly totals", LedgerError::from(e)),
    };
    let months = query.months.unwrap_or(DEFAULT_SERIES_MONTHS).min(MAX_SERIES_MONTHS);

    if let Err(response) = prepare_reads(&state, &owner).await {
        return response;
    }
    match state.aggregation_service.monthly_totals(&owner, kind, months).await {
        Ok(series) => (StatusCode::OK, Json(ReportMapper::to_series_dto(series))).into_response(),
        Err(e) => error_response("get monthly totals", e),
    }
}

pub async fn get_balance(State(state): State<AppState>, Path(owner): Path<String>) -> impl IntoResponse {
    info!("GET /api/ledger/{}/balance", owner);

    if let Err(response) = prepare_reads(&state, &owner).await {
        return response;
    }
    match state.aggregation_service.available_balance(&owner).await {
        Ok(available_balance) => (StatusCode::OK, Json(BalanceResponse { available_balance })).into_response(),
        Err(e) => error_response("get balance", e),
    }
}

pub async fn get_score(State(state): State<AppState>, Path(owner): Path<String>) -> impl IntoResponse {
    info!("GET /api/ledger/{}/score", owner);

    if let Err(response) = prepare_reads(&state, &owner).await {
        return response;
    }
    match state.aggregation_service.dynamic_score(&owner).await {
        Ok(score) => (StatusCode::OK, Json(ScoreResponse { score })).into_response(),
        Err(e) => error_response("get score", e),
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::dates::today;
    use crate::domain::models::NewAutopayPlan;
    use crate::io::rest::test_support::{read_json, send, setup_test_app};
    use crate::storage::LedgerStore;
    use crate::AppState;
    use axum::http::{Method, StatusCode};
    use chrono::Duration;
    use serde_json::json;
    use shared::{AutopayCadence, BalanceResponse, BudgetOverview, FinanceEntry, MonthSummary, MonthlyTotal, ScoreResponse};

    const OWNER: &str = "/ledger/sam@example.com";

    #[tokio::test]
    async fn test_budget_upsert_and_overview() {
        let app = setup_test_app().await;

        let response = send(
            &app,
            Method::PUT,
            &format!("{}/budget", OWNER),
            Some(json!({"amount": 1000.0, "month_key": "2023-01"})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let overview: BudgetOverview = read_json(response).await;
        assert_eq!(overview.total_budget, 1000.0);
        assert_eq!(overview.savings_to_date, 1000.0);

        send(
            &app,
            Method::POST,
            &format!("{}/entries", OWNER),
            Some(json!({"kind": "expense", "title": "Rent", "amount": 300.0, "entry_date": "2023-01-05"})),
        )
        .await;
        let overview: BudgetOverview = read_json(send(&app, Method::GET, &format!("{}/budget", OWNER), None).await).await;
        assert_eq!(overview.savings_to_date, 700.0);

        let bad = send(
            &app,
            Method::PUT,
            &format!("{}/budget", OWNER),
            Some(json!({"amount": 1000.0, "month_key": "2023-13"})),
        )
        .await;
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reads_for_empty_ledger() {
        let app = setup_test_app().await;

        let summary: MonthSummary = read_json(send(&app, Method::GET, &format!("{}/summary", OWNER), None).await).await;
        assert_eq!(summary.income, 0.0);
        assert_eq!(summary.savings, 0.0);

        let series: Vec<MonthlyTotal> =
            read_json(send(&app, Method::GET, &format!("{}/totals?kind=income&months=3", OWNER), None).await).await;
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|m| m.total == 0.0));

        let balance: BalanceResponse = read_json(send(&app, Method::GET, &format!("{}/balance", OWNER), None).await).await;
        assert_eq!(balance.available_balance, 0.0);

        let score: ScoreResponse = read_json(send(&app, Method::GET, &format!("{}/score", OWNER), None).await).await;
        assert_eq!(score.score, 500);
    }

    #[tokio::test]
    async fn test_standalone_reads_purge_demo_rows() {
        let app = setup_test_app().await;
        let created = send(
            &app,
            Method::POST,
            &format!("{}/entries", OWNER),
            Some(json!({"kind": "income", "title": "Salary", "amount": 4000.0})),
        )
        .await;
        assert_eq!(created.status(), StatusCode::CREATED);

        let score: ScoreResponse = read_json(send(&app, Method::GET, &format!("{}/score", OWNER), None).await).await;
        assert_eq!(score.score, 500);

        let balance: BalanceResponse = read_json(send(&app, Method::GET, &format!("{}/balance", OWNER), None).await).await;
        assert_eq!(balance.available_balance, 0.0);
    }

    #[tokio::test]
    async fn test_standalone_reads_catch_up_due_autopay() {
        let store = LedgerStore::init_test().await.expect("Failed to create test store");
        let start = today() - Duration::days(16);
        store
            .autopay
            .insert_plan(&NewAutopayPlan {
                user_email: "sam@example.com".to_string(),
                title: "Gym".to_string(),
                amount: 25.0,
                cadence: AutopayCadence::Weekly,
                start_date: start,
                next_payment_date: start,
            })
            .await
            .unwrap();
        let app = crate::io::rest::router().with_state(AppState::from_store(store));

        let balance: BalanceResponse = read_json(send(&app, Method::GET, &format!("{}/balance", OWNER), None).await).await;
        assert_eq!(balance.available_balance, -75.0);

        // A second read finds nothing new to write
        let expenses: Vec<FinanceEntry> =
            read_json(send(&app, Method::GET, &format!("{}/entries?kind=expense", OWNER), None).await).await;
        assert_eq!(expenses.len(), 3);
        assert!(expenses.iter().all(|e| e.title == "Gym"));
    }
}
