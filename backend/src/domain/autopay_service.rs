//! Autopay recurrence engine.
//!
//! A plan's `next_payment_date` is a cursor: every occurrence before it has
//! been materialized as an expense entry. Catching up walks the cursor forward
//! to the first date after "today", writing one entry per due date. Each entry
//! carries an `autopay:<plan>:<date>` source key, so a run that dies halfway
//! can simply be repeated.

use anyhow::anyhow;
use chrono::NaiveDate;
use shared::FinanceKind;
use tracing::{debug, info, warn};

use crate::domain::commands::autopay::{AutopayRunReport, CreatePlanCommand, PlanFailure};
use crate::domain::dates::today;
use crate::domain::errors::{require_owner, require_positive_amount, LedgerResult, ValidationError};
use crate::domain::models::entry::{autopay_source_key, AUTOPAY_CATEGORY};
use crate::domain::models::{AutopayPlan, NewAutopayPlan, NewFinanceEntry};
use crate::storage::LedgerStore;

#[derive(Clone)]
pub struct AutopayService {
    store: LedgerStore,
}

impl AutopayService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Create a plan and catch it up immediately
    pub async fn create_plan(&self, owner: &str, command: CreatePlanCommand) -> LedgerResult<i64> {
        self.create_plan_on(owner, command, today()).await
    }

    pub async fn create_plan_on(&self, owner: &str, command: CreatePlanCommand, today: NaiveDate) -> LedgerResult<i64> {
        info!("Creating autopay plan for {}: {:?}", owner, command);
        let owner = &require_owner(owner)?;

        let title = command.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        let amount = require_positive_amount(command.amount)?;

        let new_plan = NewAutopayPlan {
            user_email: owner.to_string(),
            title: title.to_string(),
            amount,
            cadence: command.cadence,
            start_date: command.start_date,
            next_payment_date: command.start_date,
        };
        let plan_id = self.store.autopay.insert_plan(&new_plan).await?;

        let plan = self
            .store
            .autopay
            .get_plan(owner, plan_id)
            .await?
            .ok_or_else(|| anyhow!("Autopay plan {} vanished after insert", plan_id))?;

        // The plan is stored either way; a failed catch-up resumes on the next run
        match self.catch_up_plan(&plan, today).await {
            Ok(count) => info!("Autopay plan {} created with {} entries materialized", plan_id, count),
            Err(e) => warn!("Autopay plan {} created but catch-up failed: {}", plan_id, e),
        }

        Ok(plan_id)
    }

    /// Logical deletion; unknown or foreign ids are a no-op
    pub async fn deactivate_plan(&self, owner: &str, plan_id: i64) -> LedgerResult<bool> {
        info!("Deactivating autopay plan {} for {}", plan_id, owner);
        let owner = &require_owner(owner)?;
        let deactivated = self.store.autopay.deactivate_plan(owner, plan_id).await?;
        if !deactivated {
            debug!("Autopay plan {} was not active for {}", plan_id, owner);
        }
        Ok(deactivated)
    }

    pub async fn list_active_plans(&self, owner: &str) -> LedgerResult<Vec<AutopayPlan>> {
        let owner = &require_owner(owner)?;
        Ok(self.store.autopay.list_active_plans(owner).await?)
    }

    /// Catch up every active plan of the owner as of the local date
    pub async fn process_due_plans(&self, owner: &str) -> LedgerResult<AutopayRunReport> {
        self.process_due_plans_as_of(owner, today()).await
    }

    pub async fn process_due_plans_as_of(&self, owner: &str, today: NaiveDate) -> LedgerResult<AutopayRunReport> {
        let owner = &require_owner(owner)?;
        let plans = self.store.autopay.list_active_plans(owner).await?;

        let mut report = AutopayRunReport::default();
        for plan in &plans {
            report.plans_examined += 1;
            match self.catch_up_plan(plan, today).await {
                Ok(count) => report.entries_materialized += count,
                Err(e) => {
                    warn!("Autopay plan {} for {} failed this run: {}", plan.id, owner, e);
                    report.failures.push(PlanFailure {
                        plan_id: plan.id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.entries_materialized > 0 || !report.is_clean() {
            info!(
                "Autopay run for {} as of {}: {} plans, {} entries, {} failures",
                owner,
                today,
                report.plans_examined,
                report.entries_materialized,
                report.failures.len()
            );
        }
        Ok(report)
    }

    /// Materialize every occurrence of `plan` due on or before `today`.
    /// The cursor is only written after all occurrences are stored.
    async fn catch_up_plan(&self, plan: &AutopayPlan, today: NaiveDate) -> anyhow::Result<usize> {
        let mut due = plan.next_payment_date;
        let mut materialized = 0;

        while due <= today {
            let source_key = autopay_source_key(plan.id, due);
            let existing = self
                .store
                .entries
                .find_by_source_key(&plan.user_email, &source_key)
                .await?;

            if existing.is_none() {
                let entry = NewFinanceEntry {
                    user_email: plan.user_email.clone(),
                    kind: FinanceKind::Expense,
                    title: plan.title.clone(),
                    amount: plan.amount,
                    category: AUTOPAY_CATEGORY.to_string(),
                    entry_date: due,
                    source_key: Some(source_key),
                };
                self.store.entries.insert_entry(&entry).await?;
                materialized += 1;
                debug!("Materialized autopay plan {} for {}", plan.id, due);
            }

            due = plan
                .following_due_date(due)
                .ok_or_else(|| anyhow!("Autopay plan {} ran past the supported calendar range", plan.id))?;
        }

        if due != plan.next_payment_date {
            self.store
                .autopay
                .update_next_payment_date(&plan.user_email, plan.id, due)
                .await?;
        }
        Ok(materialized)
    }
}
