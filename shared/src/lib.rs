use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of ledger movement. The sign of an entry is implied by its kind,
/// amounts themselves are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinanceKind {
    /// Money coming in
    Income,
    /// One-off spending
    Expense,
    /// Recurring spending
    Autopay,
}

impl FinanceKind {
    pub const ALL: [FinanceKind; 3] = [FinanceKind::Income, FinanceKind::Expense, FinanceKind::Autopay];

    pub fn as_str(&self) -> &'static str {
        match self {
            FinanceKind::Income => "income",
            FinanceKind::Expense => "expense",
            FinanceKind::Autopay => "autopay",
        }
    }
}

impl fmt::Display for FinanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinanceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(FinanceKind::Income),
            "expense" => Ok(FinanceKind::Expense),
            "autopay" => Ok(FinanceKind::Autopay),
            other => Err(format!("Unknown finance kind: {}", other)),
        }
    }
}

/// Recurrence interval of an autopay plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutopayCadence {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "7d")]
    Weekly,
    #[serde(rename = "15d")]
    Fortnightly,
    #[serde(rename = "monthly")]
    Monthly,
}

impl AutopayCadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            AutopayCadence::Daily => "1d",
            AutopayCadence::Weekly => "7d",
            AutopayCadence::Fortnightly => "15d",
            AutopayCadence::Monthly => "monthly",
        }
    }

    /// Human-readable label for list rendering
    pub fn label(&self) -> &'static str {
        match self {
            AutopayCadence::Daily => "1 day",
            AutopayCadence::Weekly => "7 day",
            AutopayCadence::Fortnightly => "15 day",
            AutopayCadence::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for AutopayCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AutopayCadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(AutopayCadence::Daily),
            "7d" => Ok(AutopayCadence::Weekly),
            "15d" => Ok(AutopayCadence::Fortnightly),
            "monthly" => Ok(AutopayCadence::Monthly),
            other => Err(format!("Unknown autopay cadence: {}", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Ledger rows as seen by the UI. Dates are `YYYY-MM-DD` strings.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinanceEntry {
    pub id: i64,
    pub user_email: String,
    pub kind: FinanceKind,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub entry_date: String,
    pub source_key: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub user_email: String,
    pub name: String,
    pub current_amount: f64,
    pub target_amount: f64,
    pub target_date: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopayPlan {
    pub id: i64,
    pub user_email: String,
    pub title: String,
    pub amount: f64,
    pub cadence: AutopayCadence,
    pub cadence_label: String,
    pub start_date: String,
    pub next_payment_date: String,
    pub active: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub email: String,
    pub username: String,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddEntryRequest {
    pub kind: FinanceKind,
    pub title: String,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    /// Optional `YYYY-MM-DD`; today when omitted
    #[serde(default)]
    pub entry_date: Option<String>,
    #[serde(default)]
    pub source_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePlanRequest {
    pub title: String,
    pub amount: f64,
    pub cadence: AutopayCadence,
    /// `YYYY-MM-DD`
    pub start_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddGoalRequest {
    pub name: String,
    #[serde(default)]
    pub current_amount: f64,
    pub target_amount: f64,
    #[serde(default)]
    pub target_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustGoalRequest {
    /// Signed delta; negative values reverse earlier allocations
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocateToGoalRequest {
    pub amount: f64,
    #[serde(default)]
    pub entry_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertBudgetRequest {
    pub amount: f64,
    /// `YYYY-MM`; the current month when omitted
    #[serde(default)]
    pub month_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub username: String,
    pub credential: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub credential: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetCredentialRequest {
    pub email: String,
    pub credential: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    /// Full month name, e.g. "April"
    pub month: String,
    pub income: f64,
    pub expense: f64,
    pub autopay: f64,
    pub savings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// Short month name, e.g. "Apr"
    pub month: String,
    pub month_key: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetOverview {
    pub current_month_key: String,
    pub current_budget: f64,
    pub total_budget: f64,
    pub savings_to_date: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub available_balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopayRunResponse {
    pub plans_examined: usize,
    pub entries_materialized: usize,
    pub failed_plan_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveGoalsResponse {
    pub active_goal_ids: Vec<i64>,
}

/// Everything the home screen renders after one refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub user: Option<UserProfile>,
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finance_kind_wire_format() {
        for kind in FinanceKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<FinanceKind>().unwrap(), kind);
        }
        assert!("Income".parse::<FinanceKind>().is_err());
    }

    #[test]
    fn test_cadence_wire_format() {
        let cases = [
            (AutopayCadence::Daily, "1d", "1 day"),
            (AutopayCadence::Weekly, "7d", "7 day"),
            (AutopayCadence::Fortnightly, "15d", "15 day"),
            (AutopayCadence::Monthly, "monthly", "Monthly"),
        ];
        for (cadence, wire, label) in cases {
            assert_eq!(serde_json::to_string(&cadence).unwrap(), format!("\"{}\"", wire));
            assert_eq!(serde_json::from_str::<AutopayCadence>(&format!("\"{}\"", wire)).unwrap(), cadence);
            assert_eq!(cadence.label(), label);
        }
        assert!("30d".parse::<AutopayCadence>().is_err());
    }

    #[test]
    fn test_add_entry_request_optional_fields_default() {
        let request: AddEntryRequest =
            serde_json::from_str(r#"{"kind":"expense","title":"Coffee","amount":4.5}"#).unwrap();
        assert_eq!(request.kind, FinanceKind::Expense);
        assert!(request.category.is_none());
        assert!(request.entry_date.is_none());
        assert!(request.source_key.is_none());
    }
}
