//! Dashboard refresh.
//!
//! One refresh runs the whole read pipeline for an owner: the demo-data guard,
//! the autopay catch-up, then every aggregation the home screen shows. The
//! first two steps are also exposed on their own so standalone reads see the
//! same ledger the dashboard does.

use chrono::NaiveDate;
use shared::FinanceKind;
use tracing::info;

use crate::domain::aggregation_service::{
    score_from_series, series_totals, AggregationService, BudgetOverview, MonthSummary, MonthlyTotal, DEFAULT_SERIES_MONTHS,
};
use crate::domain::autopay_service::AutopayService;
use crate::domain::commands::autopay::AutopayRunReport;
use crate::domain::dates::today;
use crate::domain::demo_guard::DemoDataGuard;
use crate::domain::entry_service::EntryService;
use crate::domain::errors::{require_owner, LedgerResult};
use crate::domain::goal_service::GoalService;
use crate::domain::models::{AutopayPlan, FinanceEntry, Goal, User};
use crate::domain::user_service::UserService;
use crate::storage::LedgerStore;

pub const DASHBOARD_ENTRY_LIMIT: u32 = 30;

/// Everything one refresh produces
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub user: Option<User>,
    pub summary: MonthSummary,
    pub budget: BudgetOverview,
    pub goals: Vec<Goal>,
    pub incomes: Vec<FinanceEntry>,
    pub expenses: Vec<FinanceEntry>,
    pub autopay_plans: Vec<AutopayPlan>,
    pub income_series: Vec<MonthlyTotal>,
    pub expense_series: Vec<MonthlyTotal>,
    pub autopay_series: Vec<MonthlyTotal>,
    pub available_balance: f64,
    pub score: i64,
    pub active_goal_ids: Vec<i64>,
    pub autopay_run: AutopayRunReport,
}

#[derive(Clone)]
pub struct DashboardService {
    demo_guard: DemoDataGuard,
    autopay_service: AutopayService,
    aggregation_service: AggregationService,
    entry_service: EntryService,
    goal_service: GoalService,
    user_service: UserService,
}

impl DashboardService {
    pub fn new(store: LedgerStore) -> Self {
        Self {
            demo_guard: DemoDataGuard::new(store.clone()),
            autopay_service: AutopayService::new(store.clone()),
            aggregation_service: AggregationService::new(store.clone()),
            entry_service: EntryService::new(store.clone()),
            goal_service: GoalService::new(store.clone()),
            user_service: UserService::new(store),
        }
    }

    pub async fn refresh_dashboard(&self, owner: &str) -> LedgerResult<DashboardView> {
        self.refresh_dashboard_as_of(owner, today()).await
    }

    pub async fn refresh_dashboard_as_of(&self, owner: &str, today: NaiveDate) -> LedgerResult<DashboardView> {
        info!("Refreshing dashboard for {} as of {}", owner, today);
        let owner = &require_owner(owner)?;

        let autopay_run = self.prepare_reads_as_of(owner, today).await?;

        let summary = self.aggregation_service.current_month_summary_as_of(owner, today).await?;
        let budget = self.aggregation_service.budget_overview_as_of(owner, today).await?;
        let income_series = self.series(owner, FinanceKind::Income, today).await?;
        let expense_series = self.series(owner, FinanceKind::Expense, today).await?;
        let autopay_series = self.series(owner, FinanceKind::Autopay, today).await?;
        let score = score_from_series(
            &series_totals(&income_series),
            &series_totals(&expense_series),
            &series_totals(&autopay_series),
        );

        Ok(DashboardView {
            user: self.user_service.find_user(owner).await?,
            summary,
            budget,
            goals: self.goal_service.list_goals(owner).await?,
            incomes: self
                .entry_service
                .list_entries(owner, FinanceKind::Income, Some(DASHBOARD_ENTRY_LIMIT))
                .await?,
            expenses: self
                .entry_service
                .list_entries(owner, FinanceKind::Expense, Some(DASHBOARD_ENTRY_LIMIT))
                .await?,
            autopay_plans: self.autopay_service.list_active_plans(owner).await?,
            income_series,
            expense_series,
            autopay_series,
            available_balance: self.aggregation_service.available_balance(owner).await?,
            score,
            active_goal_ids: self.goal_service.active_goal_ids(owner).await?,
            autopay_run,
        })
    }

    /// Purge demo data, then materialize every autopay occurrence already due
    pub async fn prepare_reads(&self, owner: &str) -> LedgerResult<AutopayRunReport> {
        self.prepare_reads_as_of(owner, today()).await
    }

    pub async fn prepare_reads_as_of(&self, owner: &str, today: NaiveDate) -> LedgerResult<AutopayRunReport> {
        let owner = &require_owner(owner)?;
        self.demo_guard.purge_demo_data(owner).await?;
        self.autopay_service.process_due_plans_as_of(owner, today).await
    }

    async fn series(&self, owner: &str, kind: FinanceKind, today: NaiveDate) -> LedgerResult<Vec<MonthlyTotal>> {
        self.aggregation_service
            .monthly_totals_as_of(owner, kind, DEFAULT_SERIES_MONTHS, today)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::AutopayCadence;

    use crate::domain::models::{NewAutopayPlan, NewFinanceEntry};

    const OWNER: &str = "sam@example.com";

    async fn setup_test() -> (DashboardService, LedgerStore) {
        let store = LedgerStore::init_test().await.expect("Failed to create test store");
        (DashboardService::new(store.clone()), store)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn add(store: &LedgerStore, kind: FinanceKind, title: &str, amount: f64, entry_date: NaiveDate) {
        store
            .entries
            .insert_entry(&NewFinanceEntry {
                user_email: OWNER.to_string(),
                kind,
                title: title.to_string(),
                amount,
                category: "General".to_string(),
                entry_date,
                source_key: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_refresh_catches_up_autopay_before_aggregating() {
        let (service, store) = setup_test().await;
        add(&store, FinanceKind::Income, "Paycheck", 3000.0, date(2024, 4, 1)).await;
        store
            .autopay
            .insert_plan(&NewAutopayPlan {
                user_email: OWNER.to_string(),
                title: "Rent".to_string(),
                amount: 1000.0,
                cadence: AutopayCadence::Monthly,
                start_date: date(2024, 3, 5),
                next_payment_date: date(2024, 3, 5),
            })
            .await
            .unwrap();

        let view = service.refresh_dashboard_as_of(OWNER, date(2024, 4, 20)).await.unwrap();

        assert_eq!(view.autopay_run.entries_materialized, 2);
        assert_eq!(view.summary.income, 3000.0);
        assert_eq!(view.summary.expense, 1000.0);
        assert_eq!(view.available_balance, 1000.0);
        assert_eq!(view.expenses.len(), 2);
        assert_eq!(view.incomes.len(), 1);
        assert_eq!(view.autopay_plans[0].next_payment_date, date(2024, 5, 5));
        assert_eq!(view.income_series.len(), 6);
        assert_eq!(view.income_series[5].total, 3000.0);
        assert!((300..=850).contains(&view.score));
        assert!(view.user.is_none());
    }

    #[tokio::test]
    async fn test_demo_guard_runs_on_every_refresh() {
        let (service, store) = setup_test().await;
        add(&store, FinanceKind::Income, "Salary", 4000.0, date(2024, 4, 1)).await;

        let first = service.refresh_dashboard_as_of(OWNER, date(2024, 4, 20)).await.unwrap();
        assert!(first.incomes.is_empty());
        assert_eq!(first.score, 500);

        // Sample rows that reappear are purged again
        add(&store, FinanceKind::Income, "Salary", 4000.0, date(2024, 4, 2)).await;
        let second = service.refresh_dashboard_as_of(OWNER, date(2024, 4, 20)).await.unwrap();
        assert!(second.incomes.is_empty());

        // Once a real title sits next to them they are kept
        add(&store, FinanceKind::Income, "Salary", 4000.0, date(2024, 4, 3)).await;
        add(&store, FinanceKind::Expense, "Rent", 1200.0, date(2024, 4, 4)).await;
        let third = service.refresh_dashboard_as_of(OWNER, date(2024, 4, 20)).await.unwrap();
        assert_eq!(third.incomes.len(), 1);
        assert_eq!(third.expenses.len(), 1);
        assert_eq!(third.available_balance, 2800.0);
    }

    #[tokio::test]
    async fn test_prepare_reads_purges_then_catches_up() {
        let (service, store) = setup_test().await;
        add(&store, FinanceKind::Expense, "Groceries", 80.0, date(2024, 4, 1)).await;
        store
            .autopay
            .insert_plan(&NewAutopayPlan {
                user_email: OWNER.to_string(),
                title: "Gym".to_string(),
                amount: 40.0,
                cadence: AutopayCadence::Weekly,
                start_date: date(2024, 4, 1),
                next_payment_date: date(2024, 4, 1),
            })
            .await
            .unwrap();

        let report = service.prepare_reads_as_of(OWNER, date(2024, 4, 10)).await.unwrap();

        assert_eq!(report.entries_materialized, 2);
        let titles = store.entries.distinct_titles(OWNER).await.unwrap();
        assert_eq!(titles, vec!["Gym".to_string()]);
    }
}
