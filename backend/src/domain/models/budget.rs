use crate::domain::dates::MonthKey;

/// Declared spending limit for one month
#[derive(Debug, Clone, PartialEq)]
pub struct Budget {
    pub id: i64,
    pub user_email: String,
    pub month_key: MonthKey,
    pub amount: f64,
}
