//! Conversions between `shared` DTOs and domain types.
//!
//! Inbound mappers parse wire strings (dates, month keys, kinds) and report
//! malformed input as [`ValidationError`](crate::domain::ValidationError), so
//! handlers can answer 400 before any service runs.

pub mod autopay_mapper;
pub mod entry_mapper;
pub mod goal_mapper;
pub mod report_mapper;
pub mod user_mapper;

pub use autopay_mapper::AutopayMapper;
pub use entry_mapper::EntryMapper;
pub use goal_mapper::GoalMapper;
pub use report_mapper::ReportMapper;
pub use user_mapper::UserMapper;

use chrono::NaiveDate;

use crate::domain::dates::parse_date;
use crate::domain::errors::ValidationError;

/// Optional `YYYY-MM-DD`; blank counts as missing
pub(crate) fn parse_optional_date(value: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_date(v).map(Some),
        None => Ok(None),
    }
}
