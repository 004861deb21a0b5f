//! # Ledger Backend
//!
//! Personal finance ledger: income, expense and recurring-payment records per
//! owner, with budgets, savings, goals and a composite health score derived
//! from them.
//!
//! ## Architecture
//!
//! ```text
//! UI
//!     ↓
//! IO Layer (REST API, mappers)
//!     ↓
//! Domain Layer (services, recurrence engine, aggregation)
//!     ↓
//! Storage Layer (SQLite repositories)
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{http::Method, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::LedgerConfig;
use crate::domain::{
    AggregationService, AutopayService, BudgetService, DashboardService, EntryService, GoalService,
    SettingsService, UserService,
};
use crate::storage::{DbConnection, LedgerStore};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub entry_service: EntryService,
    pub autopay_service: AutopayService,
    pub aggregation_service: AggregationService,
    pub goal_service: GoalService,
    pub budget_service: BudgetService,
    pub dashboard_service: DashboardService,
    pub user_service: UserService,
    pub settings_service: SettingsService,
}

impl AppState {
    /// Wire every service against one store
    pub fn from_store(store: LedgerStore) -> Self {
        Self {
            entry_service: EntryService::new(store.clone()),
            autopay_service: AutopayService::new(store.clone()),
            aggregation_service: AggregationService::new(store.clone()),
            goal_service: GoalService::new(store.clone()),
            budget_service: BudgetService::new(store.clone()),
            dashboard_service: DashboardService::new(store.clone()),
            user_service: UserService::new(store.clone()),
            settings_service: SettingsService::new(store),
        }
    }
}

/// Initialize the backend with all required services
pub async fn initialize_backend(config: &LedgerConfig) -> Result<AppState> {
    if let Some(dir) = config.database_path.as_ref().and_then(|p| p.parent()) {
        std::fs::create_dir_all(dir)?;
    }

    info!("Setting up database at {}", config.database_url);
    let db = DbConnection::new(&config.database_url).await?;

    info!("Setting up domain services");
    Ok(AppState::from_store(LedgerStore::sqlite(db)))
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &LedgerConfig) -> Router {
    // CORS setup to allow the UI to make requests
    let cors = CorsLayer::new()
        .allow_origin(config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .nest("/api", io::rest::router())
        .layer(cors)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::util::ServiceExt; // for `oneshot`

    fn test_config() -> LedgerConfig {
        LedgerConfig::from_lookup(|name| match name {
            "LEDGER_DATABASE_URL" => Some("sqlite::memory:".to_string()),
            _ => None,
        })
        .expect("Failed to build test config")
    }

    #[tokio::test]
    async fn test_router_serves_api_with_cors() {
        let store = LedgerStore::init_test().await.expect("Failed to create test store");
        let app = create_router(AppState::from_store(store), &test_config());

        let request = Request::builder()
            .uri("/api/ledger/sam@example.com/balance")
            .header("origin", "http://localhost:8080")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").map(|v| v.as_bytes()),
            Some("http://localhost:8080".as_bytes())
        );

        let unknown = Request::builder().uri("/ledger/sam@example.com/balance").body(Body::empty()).unwrap();
        assert_eq!(app.oneshot(unknown).await.unwrap().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_initialize_backend_creates_database_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested").join("ledger.db");
        let mut config = test_config();
        config.database_url = format!("sqlite://{}", path.display());
        config.database_path = Some(path.clone());

        let state = initialize_backend(&config).await.expect("Failed to initialize backend");

        assert!(path.exists());
        assert_eq!(state.aggregation_service.available_balance("sam@example.com").await.unwrap(), 0.0);
    }
}
