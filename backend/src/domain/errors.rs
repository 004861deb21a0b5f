//! Error types surfaced by the domain services.
//!
//! Storage code keeps returning `anyhow::Result`; anything coming out of a
//! repository is folded into [`LedgerError::Storage`] by `?`.

use thiserror::Error;

/// Input rejected before any storage write
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Owner email cannot be empty")]
    EmptyOwner,
    #[error("Title cannot be empty")]
    EmptyTitle,
    #[error("Name cannot be empty")]
    EmptyName,
    #[error("Amount must be a positive number, got {0}")]
    NonPositiveAmount(f64),
    #[error("Current amount cannot be negative")]
    NegativeCurrentAmount,
    #[error("Adjustment must be a finite number")]
    NonFiniteDelta,
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    MalformedDate(String),
    #[error("Invalid month '{0}', expected YYYY-MM")]
    MalformedMonthKey(String),
    #[error("Unknown finance kind '{0}'")]
    UnknownKind(String),
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Username must be at least 3 characters")]
    UsernameTooShort,
    #[error("Credential must be at least 6 characters")]
    CredentialTooShort,
}

/// Every failure a ledger operation can report to its caller
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{0}")]
    Conflict(String),
    #[error("Incorrect credential")]
    Unauthorized,
    #[error("Storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

impl LedgerError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        LedgerError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Positive, finite amount check shared by entries, plans, budgets and goals
pub fn require_positive_amount(amount: f64) -> Result<f64, ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(ValidationError::NonPositiveAmount(amount))
    }
}

/// Owners are account emails, compared the way sign-up stores them
pub fn require_owner(owner: &str) -> Result<String, ValidationError> {
    let owner = owner.trim();
    if owner.is_empty() {
        return Err(ValidationError::EmptyOwner);
    }
    Ok(owner.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive_amount() {
        assert_eq!(require_positive_amount(12.5), Ok(12.5));
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(require_positive_amount(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_require_owner_matches_stored_emails() {
        assert_eq!(require_owner(" Sam@Example.COM ").unwrap(), "sam@example.com");
        assert_eq!(require_owner(" \t"), Err(ValidationError::EmptyOwner));
    }

    #[test]
    fn test_storage_errors_keep_their_message() {
        let err: LedgerError = anyhow::anyhow!("disk full").into();
        assert!(matches!(err, LedgerError::Storage(_)));
        assert_eq!(err.to_string(), "Storage failure: disk full");
    }

    #[test]
    fn test_validation_message_is_human_readable() {
        let err: LedgerError = ValidationError::MalformedDate("2024/01/01".to_string()).into();
        assert_eq!(err.to_string(), "Invalid date '2024/01/01', expected YYYY-MM-DD");
    }
}
