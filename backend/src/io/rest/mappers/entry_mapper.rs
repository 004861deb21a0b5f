use shared::{AddEntryRequest, FinanceEntry, FinanceKind};

use super::parse_optional_date;
use crate::domain::commands::entries::AddEntryCommand;
use crate::domain::dates::format_date;
use crate::domain::errors::ValidationError;
use crate::domain::models::FinanceEntry as DomainFinanceEntry;

pub struct EntryMapper;

impl EntryMapper {
    /// Convert an add-entry request into a domain command
    pub fn to_add_command(request: AddEntryRequest) -> Result<AddEntryCommand, ValidationError> {
        Ok(AddEntryCommand {
            kind: request.kind,
            title: request.title,
            amount: request.amount,
            category: request.category,
            entry_date: parse_optional_date(request.entry_date.as_deref())?,
            source_key: request.source_key,
        })
    }

    /// Parse a kind from a query string
    pub fn parse_kind(value: &str) -> Result<FinanceKind, ValidationError> {
        value
            .trim()
            .to_lowercase()
            .parse::<FinanceKind>()
            .map_err(|_| ValidationError::UnknownKind(value.to_string()))
    }

    pub fn to_dto(domain: DomainFinanceEntry) -> FinanceEntry {
        FinanceEntry {
            id: domain.id,
            user_email: domain.user_email,
            kind: domain.kind,
            title: domain.title,
            amount: domain.amount,
            category: domain.category,
            entry_date: format_date(domain.entry_date),
            source_key: domain.source_key,
            created_at: domain.created_at,
        }
    }

    pub fn to_dto_list(domain_entries: Vec<DomainFinanceEntry>) -> Vec<FinanceEntry> {
        domain_entries.into_iter().map(Self::to_dto).collect()
    }
}
