// Repository modules
pub mod autopay_repository;
pub mod budget_repository;
pub mod entry_repository;
pub mod goal_repository;
pub mod settings_repository;
pub mod user_repository;

// Re-export repository types
pub use autopay_repository::AutopayRepository;
pub use budget_repository::BudgetRepository;
pub use entry_repository::EntryRepository;
pub use goal_repository::GoalRepository;
pub use settings_repository::SettingsRepository;
pub use user_repository::UserRepository;

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

use crate::domain::dates::{format_date, DATE_FORMAT};

/// Decode a `YYYY-MM-DD` column
pub(crate) fn decode_date(column: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| anyhow!("Invalid {} '{}' in database: {}", column, value, e))
}

pub(crate) fn encode_date(date: NaiveDate) -> String {
    format_date(date)
}
