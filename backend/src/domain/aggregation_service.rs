//! Aggregation engine.
//!
//! Every read here is recomputed from the stored entries and budgets on each
//! call; nothing is cached. The `*_as_of` variants take "today" explicitly so
//! results are reproducible; the plain forms use the local calendar date.

use chrono::NaiveDate;
use shared::FinanceKind;
use std::collections::HashMap;
use tracing::debug;

use crate::domain::dates::{today, trailing_months, MonthKey};
use crate::domain::errors::{require_owner, LedgerResult};
use crate::domain::models::FinanceEntry;
use crate::storage::LedgerStore;

pub const DEFAULT_SERIES_MONTHS: usize = 6;

pub const NEUTRAL_SCORE: i64 = 500;
pub const MIN_SCORE: i64 = 300;
pub const MAX_SCORE: i64 = 850;

/// Per-kind totals for one calendar month
#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub month_key: MonthKey,
    pub income: f64,
    pub expense: f64,
    pub autopay: f64,
    /// `max(0, income - expense - autopay)`
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    pub month_key: MonthKey,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetOverview {
    pub current_month_key: MonthKey,
    pub current_budget: f64,
    pub total_budget: f64,
    /// Sum over budgeted months of budget minus that month's expense-kind spend.
    /// Autopay rows do not count against it and the sum is not clamped.
    pub savings_to_date: f64,
}

#[derive(Clone)]
pub struct AggregationService {
    store: LedgerStore,
}

impl AggregationService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    pub async fn current_month_summary(&self, owner: &str) -> LedgerResult<MonthSummary> {
        self.current_month_summary_as_of(owner, today()).await
    }

    pub async fn current_month_summary_as_of(&self, owner: &str, today: NaiveDate) -> LedgerResult<MonthSummary> {
        let owner = &require_owner(owner)?;
        let month = MonthKey::of(today);
        let entries = self
            .store
            .entries
            .list_entries_between(owner, month.first_day(), month.next().first_day())
            .await?;

        let (mut income, mut expense, mut autopay) = (0.0, 0.0, 0.0);
        for entry in &entries {
            match entry.kind {
                FinanceKind::Income => income += entry.amount,
                FinanceKind::Expense => expense += entry.amount,
                FinanceKind::Autopay => autopay += entry.amount,
            }
        }

        Ok(MonthSummary {
            month_key: month,
            income,
            expense,
            autopay,
            savings: f64::max(0.0, income - expense - autopay),
        })
    }

    /// Trailing `months` totals for one kind, oldest first, zero-filled
    pub async fn monthly_totals(&self, owner: &str, kind: FinanceKind, months: usize) -> LedgerResult<Vec<MonthlyTotal>> {
        self.monthly_totals_as_of(owner, kind, months, today()).await
    }

    pub async fn monthly_totals_as_of(
        &self,
        owner: &str,
        kind: FinanceKind,
        months: usize,
        today: NaiveDate,
    ) -> LedgerResult<Vec<MonthlyTotal>> {
        let owner = &require_owner(owner)?;
        let current = MonthKey::of(today);
        let window = trailing_months(current, months);
        let Some(first) = window.first() else {
            return Ok(Vec::new());
        };

        let entries = self
            .store
            .entries
            .list_entries_between(owner, first.first_day(), current.next().first_day())
            .await?;

        let mut by_month: HashMap<MonthKey, f64> = HashMap::new();
        for entry in entries.iter().filter(|e| e.kind == kind) {
            *by_month.entry(MonthKey::of(entry.entry_date)).or_insert(0.0) += entry.amount;
        }

        Ok(window
            .into_iter()
            .map(|month_key| MonthlyTotal {
                month_key,
                total: by_month.get(&month_key).copied().unwrap_or(0.0),
            })
            .collect())
    }

    pub async fn budget_overview(&self, owner: &str) -> LedgerResult<BudgetOverview> {
        self.budget_overview_as_of(owner, today()).await
    }

    pub async fn budget_overview_as_of(&self, owner: &str, today: NaiveDate) -> LedgerResult<BudgetOverview> {
        let owner = &require_owner(owner)?;
        let current_month_key = MonthKey::of(today);
        let budgets = self.store.budgets.list_budgets(owner).await?;

        let mut expense_by_month: HashMap<MonthKey, f64> = HashMap::new();
        if !budgets.is_empty() {
            let entries = self.store.entries.list_all_entries(owner).await?;
            for entry in entries.iter().filter(|e| e.kind == FinanceKind::Expense) {
                *expense_by_month.entry(MonthKey::of(entry.entry_date)).or_insert(0.0) += entry.amount;
            }
        }

        let current_budget = budgets
            .iter()
            .find(|b| b.month_key == current_month_key)
            .map(|b| b.amount)
            .unwrap_or(0.0);
        let total_budget: f64 = budgets.iter().map(|b| b.amount).sum();
        let savings_to_date: f64 = budgets
            .iter()
            .map(|b| b.amount - expense_by_month.get(&b.month_key).copied().unwrap_or(0.0))
            .sum();

        Ok(BudgetOverview {
            current_month_key,
            current_budget,
            total_budget,
            savings_to_date,
        })
    }

    /// Lifetime income minus expense and autopay
    pub async fn available_balance(&self, owner: &str) -> LedgerResult<f64> {
        let owner = &require_owner(owner)?;
        let entries = self.store.entries.list_all_entries(owner).await?;
        Ok(entries.iter().map(FinanceEntry::signed_amount).sum())
    }

    pub async fn dynamic_score(&self, owner: &str) -> LedgerResult<i64> {
        self.dynamic_score_as_of(owner, today()).await
    }

    pub async fn dynamic_score_as_of(&self, owner: &str, today: NaiveDate) -> LedgerResult<i64> {
        let income = self
            .monthly_totals_as_of(owner, FinanceKind::Income, DEFAULT_SERIES_MONTHS, today)
            .await?;
        let expense = self
            .monthly_totals_as_of(owner, FinanceKind::Expense, DEFAULT_SERIES_MONTHS, today)
            .await?;
        let autopay = self
            .monthly_totals_as_of(owner, FinanceKind::Autopay, DEFAULT_SERIES_MONTHS, today)
            .await?;

        let score = score_from_series(&series_totals(&income), &series_totals(&expense), &series_totals(&autopay));
        debug!("Dynamic score for {} as of {}: {}", owner, today, score);
        Ok(score)
    }
}

/// Bare values of a series, in order
pub fn series_totals(series: &[MonthlyTotal]) -> Vec<f64> {
    series.iter().map(|m| m.total).collect()
}

/// Composite score in `[300, 850]` from aligned monthly series.
/// Missing trailing values in `expense` or `autopay` count as zero.
pub fn score_from_series(income: &[f64], expense: &[f64], autopay: &[f64]) -> i64 {
    let outflow_at = |i: usize| expense.get(i).copied().unwrap_or(0.0) + autopay.get(i).copied().unwrap_or(0.0);

    let total_income: f64 = income.iter().sum();
    let total_outflow: f64 = expense.iter().sum::<f64>() + autopay.iter().sum::<f64>();
    if total_income <= 0.0 || income.is_empty() {
        return NEUTRAL_SCORE;
    }

    let savings_rate = f64::max(0.0, (total_income - total_outflow) / total_income);
    let expense_ratio = total_outflow / total_income;
    let positive_months = income
        .iter()
        .enumerate()
        .filter(|(i, month_income)| **month_income - outflow_at(*i) >= 0.0)
        .count();
    let consistency = positive_months as f64 / income.len() as f64;

    let raw = 540.0 + savings_rate * 180.0 + consistency * 100.0 - expense_ratio * 70.0;
    (raw.round() as i64).clamp(MIN_SCORE, MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::NewFinanceEntry;

    const OWNER: &str = "sam@example.com";

    async fn setup_test() -> (AggregationService, LedgerStore) {
        let store = LedgerStore::init_test().await.expect("Failed to create test store");
        (AggregationService::new(store.clone()), store)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    async fn add(store: &LedgerStore, kind: FinanceKind, amount: f64, entry_date: NaiveDate) {
        store
            .entries
            .insert_entry(&NewFinanceEntry {
                user_email: OWNER.to_string(),
                kind,
                title: "Entry".to_string(),
                amount,
                category: "General".to_string(),
                entry_date,
                source_key: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_current_month_summary_uses_half_open_month() {
        let (service, store) = setup_test().await;
        add(&store, FinanceKind::Income, 3000.0, date(2024, 4, 1)).await;
        add(&store, FinanceKind::Expense, 400.0, date(2024, 4, 30)).await;
        add(&store, FinanceKind::Autopay, 100.0, date(2024, 4, 15)).await;
        add(&store, FinanceKind::Expense, 999.0, date(2024, 3, 31)).await;
        add(&store, FinanceKind::Expense, 999.0, date(2024, 5, 1)).await;

        let summary = service.current_month_summary_as_of(OWNER, date(2024, 4, 15)).await.unwrap();

        assert_eq!(summary.month_key, month(2024, 4));
        assert_eq!(summary.month_key.long_name(), "April");
        assert_eq!(summary.income, 3000.0);
        assert_eq!(summary.expense, 400.0);
        assert_eq!(summary.autopay, 100.0);
        assert_eq!(summary.savings, 2500.0);
    }

    #[tokio::test]
    async fn test_summary_savings_never_negative() {
        let (service, store) = setup_test().await;
        add(&store, FinanceKind::Income, 100.0, date(2024, 4, 1)).await;
        add(&store, FinanceKind::Expense, 250.0, date(2024, 4, 2)).await;

        let summary = service.current_month_summary_as_of(OWNER, date(2024, 4, 15)).await.unwrap();
        assert_eq!(summary.savings, 0.0);
    }

    #[tokio::test]
    async fn test_monthly_totals_zero_fill_and_order() {
        let (service, store) = setup_test().await;
        add(&store, FinanceKind::Expense, 10.0, date(2023, 11, 5)).await;
        add(&store, FinanceKind::Expense, 15.0, date(2023, 11, 20)).await;
        add(&store, FinanceKind::Expense, 40.0, date(2024, 2, 29)).await;
        add(&store, FinanceKind::Income, 500.0, date(2024, 2, 1)).await;
        // Outside the window
        add(&store, FinanceKind::Expense, 77.0, date(2023, 8, 31)).await;

        let series = service
            .monthly_totals_as_of(OWNER, FinanceKind::Expense, 6, date(2024, 2, 10))
            .await
            .unwrap();

        let keys: Vec<String> = series.iter().map(|m| m.month_key.to_string()).collect();
        assert_eq!(keys, vec!["2023-09", "2023-10", "2023-11", "2023-12", "2024-01", "2024-02"]);
        let values: Vec<f64> = series.iter().map(|m| m.total).collect();
        assert_eq!(values, vec![0.0, 0.0, 25.0, 0.0, 0.0, 40.0]);
        assert_eq!(series[2].month_key.short_name(), "Nov");

        let empty = service
            .monthly_totals_as_of(OWNER, FinanceKind::Expense, 0, date(2024, 2, 10))
            .await
            .unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_budget_overview_cases() {
        let (service, store) = setup_test().await;
        let today = date(2024, 4, 15);

        // Budget with partial spend
        store.budgets.upsert_budget(OWNER, month(2024, 4), 1000.0).await.unwrap();
        add(&store, FinanceKind::Expense, 300.0, date(2024, 4, 3)).await;
        let overview = service.budget_overview_as_of(OWNER, today).await.unwrap();
        assert_eq!(overview.savings_to_date, 700.0);
        assert_eq!(overview.current_budget, 1000.0);

        // Budget without spend adds in full
        store.budgets.upsert_budget(OWNER, month(2024, 2), 1000.0).await.unwrap();
        let overview = service.budget_overview_as_of(OWNER, today).await.unwrap();
        assert_eq!(overview.savings_to_date, 1700.0);
        assert_eq!(overview.total_budget, 2000.0);

        // Spend in an unbudgeted month contributes nothing
        add(&store, FinanceKind::Expense, 300.0, date(2024, 3, 3)).await;
        let overview = service.budget_overview_as_of(OWNER, today).await.unwrap();
        assert_eq!(overview.savings_to_date, 1700.0);
    }

    #[tokio::test]
    async fn test_budget_overview_ignores_autopay_and_goes_negative() {
        let (service, store) = setup_test().await;
        store.budgets.upsert_budget(OWNER, month(2024, 4), 100.0).await.unwrap();
        add(&store, FinanceKind::Autopay, 500.0, date(2024, 4, 3)).await;
        add(&store, FinanceKind::Expense, 250.0, date(2024, 4, 4)).await;

        let overview = service.budget_overview_as_of(OWNER, date(2024, 5, 2)).await.unwrap();

        assert_eq!(overview.current_month_key, month(2024, 5));
        assert_eq!(overview.current_budget, 0.0);
        assert_eq!(overview.savings_to_date, -150.0);
    }

    #[tokio::test]
    async fn test_budget_overview_without_budgets_is_zero() {
        let (service, store) = setup_test().await;
        add(&store, FinanceKind::Expense, 300.0, date(2024, 4, 3)).await;

        let overview = service.budget_overview_as_of(OWNER, date(2024, 4, 15)).await.unwrap();
        assert_eq!(overview.total_budget, 0.0);
        assert_eq!(overview.savings_to_date, 0.0);
    }

    #[tokio::test]
    async fn test_available_balance_is_lifetime() {
        let (service, store) = setup_test().await;
        add(&store, FinanceKind::Income, 2000.0, date(2020, 1, 1)).await;
        add(&store, FinanceKind::Expense, 300.0, date(2023, 6, 1)).await;
        add(&store, FinanceKind::Autopay, 200.0, date(2024, 4, 1)).await;

        assert_eq!(service.available_balance(OWNER).await.unwrap(), 1500.0);
        assert_eq!(service.available_balance("nobody@example.com").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_dynamic_score_from_stored_entries() {
        let (service, store) = setup_test().await;
        let today = date(2024, 6, 10);
        assert_eq!(service.dynamic_score_as_of(OWNER, today).await.unwrap(), 500);

        for m in 1..=6 {
            add(&store, FinanceKind::Income, 1000.0, date(2024, m, 1)).await;
            add(&store, FinanceKind::Expense, 500.0, date(2024, m, 2)).await;
        }

        // savings 0.5, consistency 1, expense ratio 0.5: 540 + 90 + 100 - 35
        assert_eq!(service.dynamic_score_as_of(OWNER, today).await.unwrap(), 695);
    }

    #[test]
    fn test_score_without_income_is_neutral() {
        assert_eq!(score_from_series(&[0.0; 6], &[100.0; 6], &[0.0; 6]), 500);
        assert_eq!(score_from_series(&[], &[], &[]), 500);
    }

    #[test]
    fn test_score_known_values() {
        // No outflow at all: 540 + 180 + 100
        assert_eq!(score_from_series(&[1000.0; 6], &[0.0; 6], &[0.0; 6]), 820);
        // Outflow equals income every month: 540 + 0 + 100 - 70
        assert_eq!(score_from_series(&[1000.0; 6], &[600.0; 6], &[400.0; 6]), 570);
        // Heavy overspend clamps at the floor
        assert_eq!(score_from_series(&[10.0; 6], &[1000.0; 6], &[0.0; 6]), 300);
    }

    #[test]
    fn test_score_stays_in_bounds() {
        let levels = [0.0, 1.0, 50.0, 500.0, 1000.0, 10_000.0];
        for income in levels {
            for expense in levels {
                for autopay in levels {
                    let score = score_from_series(&[income; 6], &[expense; 6], &[autopay; 6]);
                    assert!((300..=850).contains(&score), "{} {} {} -> {}", income, expense, autopay, score);
                }
            }
        }
    }

    #[test]
    fn test_score_does_not_rise_with_spending() {
        let mut previous = i64::MAX;
        for expense in [0.0, 100.0, 250.0, 500.0, 900.0, 1000.0, 1500.0, 5000.0] {
            let score = score_from_series(&[1000.0; 6], &[expense; 6], &[0.0; 6]);
            assert!(score <= previous, "score rose at expense {}", expense);
            previous = score;
        }
    }

    #[test]
    fn test_consistency_counts_positive_months() {
        // Three of six months overspent; totals balance exactly
        let income = [1000.0, 1000.0, 1000.0, 1000.0, 1000.0, 1000.0];
        let expense = [0.0, 0.0, 0.0, 2000.0, 2000.0, 2000.0];
        // savings 0, ratio 1, consistency 0.5: 540 + 0 + 50 - 70
        assert_eq!(score_from_series(&income, &expense, &[0.0; 6]), 520);
    }
}
