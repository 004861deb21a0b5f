use shared::{BudgetOverview, Dashboard, MonthSummary, MonthlyTotal};

use super::{AutopayMapper, EntryMapper, GoalMapper, UserMapper};
use crate::domain::aggregation_service::{
    BudgetOverview as DomainBudgetOverview, MonthSummary as DomainMonthSummary,
    MonthlyTotal as DomainMonthlyTotal,
};
use crate::domain::dates::MonthKey;
use crate::domain::errors::ValidationError;
use crate::domain::DashboardView;

pub struct ReportMapper;

impl ReportMapper {
    /// Optional `YYYY-MM`; blank counts as missing
    pub fn parse_month_key(value: Option<&str>) -> Result<Option<MonthKey>, ValidationError> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(v) => MonthKey::parse(v).map(Some),
            None => Ok(None),
        }
    }

    pub fn to_summary_dto(domain: DomainMonthSummary) -> MonthSummary {
        MonthSummary {
            month: domain.month_key.long_name(),
            income: domain.income,
            expense: domain.expense,
            autopay: domain.autopay,
            savings: domain.savings,
        }
    }

    pub fn to_series_dto(domain: Vec<DomainMonthlyTotal>) -> Vec<MonthlyTotal> {
        domain
            .into_iter()
            .map(|m| MonthlyTotal {
                month: m.month_key.short_name(),
                month_key: m.month_key.to_string(),
                total: m.total,
            })
            .collect()
    }

    pub fn to_budget_dto(domain: DomainBudgetOverview) -> BudgetOverview {
        BudgetOverview {
            current_month_key: domain.current_month_key.to_string(),
            current_budget: domain.current_budget,
            total_budget: domain.total_budget,
            savings_to_date: domain.savings_to_date,
        }
    }

    pub fn to_dashboard_dto(view: DashboardView) -> Dashboard {
        Dashboard {
            user: view.user.map(UserMapper::to_profile),
            summary: Self::to_summary_dto(view.summary),
            budget: Self::to_budget_dto(view.budget),
            goals: GoalMapper::to_dto_list(view.goals),
            incomes: EntryMapper::to_dto_list(view.incomes),
            expenses: EntryMapper::to_dto_list(view.expenses),
            autopay_plans: AutopayMapper::to_dto_list(view.autopay_plans),
            income_series: Self::to_series_dto(view.income_series),
            expense_series: Self::to_series_dto(view.expense_series),
            autopay_series: Self::to_series_dto(view.autopay_series),
            available_balance: view.available_balance,
            score: view.score,
            active_goal_ids: view.active_goal_ids,
        }
    }
}
