//! # Domain Module
//!
//! Contains all business logic for the ledger.
//!
//! Services here own the rules: validation, the autopay recurrence cursor,
//! aggregation arithmetic, goal progress and the demo-data cleanup. They reach
//! storage only through the traits bundled in [`crate::storage::LedgerStore`].
//!
//! ## Module Organization
//!
//! - **entry_service**: recording and deleting ledger entries
//! - **autopay_service**: recurring plans and their catch-up runs
//! - **aggregation_service**: monthly summaries, series, budgets, balance and score
//! - **goal_service**: goal progress, allocations and pinned goals
//! - **budget_service**: monthly budget upserts
//! - **demo_guard**: removal of the legacy sample dataset
//! - **dashboard_service**: the full refresh pipeline
//! - **user_service** / **settings_service**: collaborator surface for accounts and flags
//!
//! ## Business Rules
//!
//! - Amounts are positive; the sign of an entry comes from its kind
//! - A goal's accumulated amount never drops below zero
//! - Each (plan, due date) pair is materialized at most once
//! - Every read and write is scoped to one owner email

pub mod aggregation_service;
pub mod autopay_service;
pub mod budget_service;
pub mod commands;
pub mod dashboard_service;
pub mod dates;
pub mod demo_guard;
pub mod entry_service;
pub mod errors;
pub mod goal_service;
pub mod models;
pub mod settings_service;
pub mod user_service;

pub use aggregation_service::AggregationService;
pub use autopay_service::AutopayService;
pub use budget_service::BudgetService;
pub use dashboard_service::{DashboardService, DashboardView};
pub use demo_guard::DemoDataGuard;
pub use entry_service::EntryService;
pub use errors::{LedgerError, LedgerResult, ValidationError};
pub use goal_service::GoalService;
pub use settings_service::SettingsService;
pub use user_service::UserService;
