//! Entry service for the ledger.
//!
//! Records and removes individual income, expense and autopay rows. Deleting
//! an entry written by a goal allocation hands the money back by reversing
//! the goal's progress.

use chrono::NaiveDate;
use shared::FinanceKind;
use tracing::{info, warn};

use crate::domain::commands::entries::{AddEntryCommand, DeleteEntryResult};
use crate::domain::dates::today;
use crate::domain::errors::{require_owner, require_positive_amount, LedgerResult, ValidationError};
use crate::domain::models::entry::{goal_id_from_source_key, DEFAULT_CATEGORY};
use crate::domain::models::goal::goal_name_from_title;
use crate::domain::models::{FinanceEntry, NewFinanceEntry};
use crate::storage::LedgerStore;

pub const DEFAULT_LIST_LIMIT: u32 = 12;

#[derive(Clone)]
pub struct EntryService {
    store: LedgerStore,
}

impl EntryService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    /// Record a new entry dated today unless the command says otherwise
    pub async fn add_entry(&self, owner: &str, command: AddEntryCommand) -> LedgerResult<i64> {
        self.add_entry_on(owner, command, today()).await
    }

    pub async fn add_entry_on(&self, owner: &str, command: AddEntryCommand, today: NaiveDate) -> LedgerResult<i64> {
        info!("Adding entry for {}: {:?}", owner, command);
        let owner = &require_owner(owner)?;

        let title = command.title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        let amount = require_positive_amount(command.amount)?;
        let category = command
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CATEGORY);

        let entry = NewFinanceEntry {
            user_email: owner.to_string(),
            kind: command.kind,
            title: title.to_string(),
            amount,
            category: category.to_string(),
            entry_date: command.entry_date.unwrap_or(today),
            source_key: command.source_key.filter(|k| !k.trim().is_empty()),
        };

        let id = self.store.entries.insert_entry(&entry).await?;
        info!("Stored {} entry {} for {}", entry.kind, id, owner);
        Ok(id)
    }

    /// Delete an entry. Unknown ids are a no-op.
    pub async fn delete_entry(&self, owner: &str, entry_id: i64) -> LedgerResult<DeleteEntryResult> {
        info!("Deleting entry {} for {}", entry_id, owner);
        let owner = &require_owner(owner)?;

        let Some(entry) = self.store.entries.get_entry(owner, entry_id).await? else {
            info!("Entry {} not found for {}, nothing to delete", entry_id, owner);
            return Ok(DeleteEntryResult {
                deleted: false,
                reversed_goal_id: None,
            });
        };

        if entry.is_goal_allocation() {
            match self.resolve_allocation_goal(owner, &entry).await? {
                Some(goal_id) => {
                    let deleted = self
                        .store
                        .goals
                        .delete_allocation(owner, entry_id, goal_id, entry.amount)
                        .await?;
                    if deleted {
                        info!("Reversed {:.2} from goal {} after deleting entry {}", entry.amount, goal_id, entry_id);
                    }
                    return Ok(DeleteEntryResult {
                        deleted,
                        reversed_goal_id: deleted.then_some(goal_id),
                    });
                }
                None => warn!("No goal matches allocation entry {} ('{}')", entry_id, entry.title),
            }
        }

        let deleted = self.store.entries.delete_entry(owner, entry_id).await?;
        Ok(DeleteEntryResult {
            deleted,
            reversed_goal_id: None,
        })
    }

    /// Entries of one kind, newest first
    pub async fn list_entries(&self, owner: &str, kind: FinanceKind, limit: Option<u32>) -> LedgerResult<Vec<FinanceEntry>> {
        let owner = &require_owner(owner)?;
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        Ok(self.store.entries.list_entries_by_kind(owner, kind, limit).await?)
    }

    /// The source key wins; the `Goal: <name>` title is the fallback
    async fn resolve_allocation_goal(&self, owner: &str, entry: &FinanceEntry) -> LedgerResult<Option<i64>> {
        if let Some(goal_id) = entry.source_key.as_deref().and_then(goal_id_from_source_key) {
            if self.store.goals.get_goal(owner, goal_id).await?.is_some() {
                return Ok(Some(goal_id));
            }
        }

        let Some(name) = goal_name_from_title(&entry.title) else {
            return Ok(None);
        };
        let wanted = name.to_lowercase();
        let goals = self.store.goals.list_goals(owner).await?;
        Ok(goals
            .iter()
            .find(|goal| goal.name.trim().to_lowercase() == wanted)
            .map(|goal| goal.id))
    }
}
