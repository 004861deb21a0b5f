use chrono::NaiveDate;
use tracing::info;

use crate::domain::commands::budgets::UpsertBudgetCommand;
use crate::domain::dates::{today, MonthKey};
use crate::domain::errors::{require_owner, require_positive_amount, LedgerResult};
use crate::domain::models::Budget;
use crate::storage::LedgerStore;

/// Service for monthly budgets
#[derive(Clone)]
pub struct BudgetService {
    store: LedgerStore,
}

impl BudgetService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Set the budget for a month, replacing any earlier value
    pub async fn upsert_budget(&self, owner: &str, command: UpsertBudgetCommand) -> LedgerResult<MonthKey> {
        self.upsert_budget_on(owner, command, today()).await
    }

    pub async fn upsert_budget_on(&self, owner: &str, command: UpsertBudgetCommand, today: NaiveDate) -> LedgerResult<MonthKey> {
        info!("Upserting budget for {}: {:?}", owner, command);
        let owner = &require_owner(owner)?;
        let amount = require_positive_amount(command.amount)?;
        let month_key = command.month_key.unwrap_or_else(|| MonthKey::of(today));

        self.store.budgets.upsert_budget(owner, month_key, amount).await?;
        Ok(month_key)
    }

    pub async fn list_budgets(&self, owner: &str) -> LedgerResult<Vec<Budget>> {
        let owner = &require_owner(owner)?;
        Ok(self.store.budgets.list_budgets(owner).await?)
    }
}
