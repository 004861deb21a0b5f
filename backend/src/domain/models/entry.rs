use chrono::NaiveDate;
use shared::FinanceKind;

pub const DEFAULT_CATEGORY: &str = "General";
pub const AUTOPAY_CATEGORY: &str = "autopay";
pub const GOAL_CATEGORY: &str = "goal";

const AUTOPAY_KEY_PREFIX: &str = "autopay:";
const GOAL_KEY_PREFIX: &str = "goal:";

/// One ledger movement
#[derive(Debug, Clone, PartialEq)]
pub struct FinanceEntry {
    pub id: i64,
    pub user_email: String,
    pub kind: FinanceKind,
    pub title: String,
    /// Always positive; the sign comes from `kind`
    pub amount: f64,
    pub category: String,
    pub entry_date: NaiveDate,
    /// Idempotency token for generated entries
    pub source_key: Option<String>,
    pub created_at: String,
}

impl FinanceEntry {
    /// Contribution to the available balance
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            FinanceKind::Income => self.amount,
            FinanceKind::Expense | FinanceKind::Autopay => -self.amount,
        }
    }

    /// Expense rows written by a goal allocation
    pub fn is_goal_allocation(&self) -> bool {
        self.kind == FinanceKind::Expense && self.category.trim().eq_ignore_ascii_case(GOAL_CATEGORY)
    }
}

/// An entry that has not been stored yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewFinanceEntry {
    pub user_email: String,
    pub kind: FinanceKind,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub entry_date: NaiveDate,
    pub source_key: Option<String>,
}

/// `autopay:<planId>:<YYYY-MM-DD>`
pub fn autopay_source_key(plan_id: i64, due_date: NaiveDate) -> String {
    format!("{}{}:{}", AUTOPAY_KEY_PREFIX, plan_id, due_date.format("%Y-%m-%d"))
}

/// `goal:<goalId>`
pub fn goal_source_key(goal_id: i64) -> String {
    format!("{}{}", GOAL_KEY_PREFIX, goal_id)
}

/// Goal id carried by a `goal:<id>` source key
pub fn goal_id_from_source_key(source_key: &str) -> Option<i64> {
    source_key
        .strip_prefix(GOAL_KEY_PREFIX)
        .and_then(|id| id.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
}
