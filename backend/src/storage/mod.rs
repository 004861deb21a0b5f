//! # Storage Module
//!
//! Handles all data persistence for the ledger.
//!
//! Domain services never touch SQL. They talk to the traits in [`traits`],
//! and [`LedgerStore`] bundles one implementation of each so services can be
//! wired against SQLite in production and against fakes in tests.
//!
//! ## Current Implementation
//!
//! - **Primary Storage**: SQLite through SQLx, one pool shared by every repository
//! - **Owner Scoping**: every ledger query filters by the owner's email
//! - **Atomic Allocation**: goal allocation and its reversal write the entry and progress in one transaction

pub mod connection;
pub mod repositories;
pub mod traits;

use std::sync::Arc;

// Re-export the main types that other modules need
pub use connection::DbConnection;
pub use repositories::{
    AutopayRepository, BudgetRepository, EntryRepository, GoalRepository, SettingsRepository,
    UserRepository,
};
pub use traits::{AutopayStorage, BudgetStorage, EntryStorage, GoalStorage, SettingsStorage, UserStorage};

/// One handle per storage concern, cheap to clone
#[derive(Clone)]
pub struct LedgerStore {
    pub entries: Arc<dyn EntryStorage>,
    pub goals: Arc<dyn GoalStorage>,
    pub budgets: Arc<dyn BudgetStorage>,
    pub autopay: Arc<dyn AutopayStorage>,
    pub users: Arc<dyn UserStorage>,
    pub settings: Arc<dyn SettingsStorage>,
}

impl LedgerStore {
    /// Every concern backed by the same SQLite pool
    pub fn sqlite(db: DbConnection) -> Self {
        Self {
            entries: Arc::new(EntryRepository::new(db.clone())),
            goals: Arc::new(GoalRepository::new(db.clone())),
            budgets: Arc::new(BudgetRepository::new(db.clone())),
            autopay: Arc::new(AutopayRepository::new(db.clone())),
            users: Arc::new(UserRepository::new(db.clone())),
            settings: Arc::new(SettingsRepository::new(db)),
        }
    }

    /// Swap the entry storage, keeping everything else
    pub fn with_entries(mut self, entries: Arc<dyn EntryStorage>) -> Self {
        self.entries = entries;
        self
    }

    /// Swap the goal storage, keeping everything else
    pub fn with_goals(mut self, goals: Arc<dyn GoalStorage>) -> Self {
        self.goals = goals;
        self
    }

    /// Fresh in-memory store for tests
    #[cfg(test)]
    pub async fn init_test() -> anyhow::Result<Self> {
        Ok(Self::sqlite(DbConnection::init_test().await?))
    }
}
