//! Goal progress tracker.
//!
//! Goals accumulate money through signed adjustments clamped at zero. An
//! allocation writes the matching `Goal: <name>` expense together with the
//! progress change in one storage transaction.
//!
//! The owner can also pin goals on the dashboard. Pinned ids live in the
//! settings table under `active_goals_<email>` as a sorted, comma-separated
//! list; ids whose goal has since disappeared are dropped on read.

use chrono::NaiveDate;
use shared::FinanceKind;
use std::collections::{BTreeSet, HashSet};
use tracing::{info, warn};

use crate::domain::commands::goals::{AddGoalCommand, AllocateToGoalCommand};
use crate::domain::dates::today;
use crate::domain::errors::{require_owner, require_positive_amount, LedgerError, LedgerResult, ValidationError};
use crate::domain::models::entry::{goal_source_key, GOAL_CATEGORY};
use crate::domain::models::{Goal, NewFinanceEntry, NewGoal};
use crate::storage::LedgerStore;

const ACTIVE_GOALS_KEY_PREFIX: &str = "active_goals_";

/// Settings key holding the owner's pinned goal ids
pub fn active_goals_key(owner: &str) -> String {
    format!("{}{}", ACTIVE_GOALS_KEY_PREFIX, owner)
}

/// Parse a stored id list, skipping anything that is not a positive integer
pub fn parse_goal_id_list(value: &str) -> BTreeSet<i64> {
    value
        .split(',')
        .filter_map(|token| token.trim().parse::<i64>().ok())
        .filter(|id| *id > 0)
        .collect()
}

fn format_goal_id_list(ids: &BTreeSet<i64>) -> String {
    ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",")
}

#[derive(Clone)]
pub struct GoalService {
    store: LedgerStore,
}

impl GoalService {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    pub async fn add_goal(&self, owner: &str, command: AddGoalCommand) -> LedgerResult<i64> {
        info!("Adding goal for {}: {:?}", owner, command);
        let owner = &require_owner(owner)?;

        let name = command.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        if !command.current_amount.is_finite() || command.current_amount < 0.0 {
            return Err(ValidationError::NegativeCurrentAmount.into());
        }
        let target_amount = require_positive_amount(command.target_amount)?;

        let goal = NewGoal {
            user_email: owner.to_string(),
            name: name.to_string(),
            current_amount: command.current_amount,
            target_amount,
            target_date: command.target_date,
        };
        let id = self.store.goals.insert_goal(&goal).await?;
        info!("Created goal {} for {}", id, owner);
        Ok(id)
    }

    /// Goals newest first
    pub async fn list_goals(&self, owner: &str) -> LedgerResult<Vec<Goal>> {
        let owner = &require_owner(owner)?;
        Ok(self.store.goals.list_goals(owner).await?)
    }

    /// Delete a goal and unpin it. Unknown ids are a no-op.
    pub async fn delete_goal(&self, owner: &str, goal_id: i64) -> LedgerResult<bool> {
        info!("Deleting goal {} for {}", goal_id, owner);
        let owner = &require_owner(owner)?;

        let deleted = self.store.goals.delete_goal(owner, goal_id).await?;
        let mut pinned = self.stored_active_ids(owner).await?;
        if pinned.remove(&goal_id) {
            self.write_active_ids(owner, &pinned).await?;
        }
        Ok(deleted)
    }

    /// `current_amount = max(0, current_amount + delta)`; unknown goals are a no-op
    pub async fn adjust_goal(&self, owner: &str, goal_id: i64, delta: f64) -> LedgerResult<bool> {
        info!("Adjusting goal {} for {} by {}", goal_id, owner, delta);
        let owner = &require_owner(owner)?;
        if !delta.is_finite() {
            return Err(ValidationError::NonFiniteDelta.into());
        }

        let adjusted = self.store.goals.adjust_goal_progress(owner, goal_id, delta).await?;
        if !adjusted {
            warn!("Goal {} not found for {}, adjustment ignored", goal_id, owner);
        }
        Ok(adjusted)
    }

    /// Move money into a goal, recording the paired expense entry
    pub async fn allocate_to_goal(&self, owner: &str, command: AllocateToGoalCommand) -> LedgerResult<i64> {
        self.allocate_to_goal_on(owner, command, today()).await
    }

    pub async fn allocate_to_goal_on(&self, owner: &str, command: AllocateToGoalCommand, today: NaiveDate) -> LedgerResult<i64> {
        info!("Allocating to goal for {}: {:?}", owner, command);
        let owner = &require_owner(owner)?;
        let amount = require_positive_amount(command.amount)?;

        let goal = self
            .store
            .goals
            .get_goal(owner, command.goal_id)
            .await?
            .ok_or_else(|| LedgerError::not_found("Goal", command.goal_id))?;

        let entry = NewFinanceEntry {
            user_email: owner.to_string(),
            kind: FinanceKind::Expense,
            title: goal.allocation_title(),
            amount,
            category: GOAL_CATEGORY.to_string(),
            entry_date: command.entry_date.unwrap_or(today),
            source_key: Some(goal_source_key(goal.id)),
        };

        // The goal can vanish between the read above and the transaction
        let entry_id = self
            .store
            .goals
            .allocate_to_goal(goal.id, &entry)
            .await?
            .ok_or_else(|| LedgerError::not_found("Goal", goal.id))?;

        info!("Allocated {:.2} to goal {} as entry {}", amount, goal.id, entry_id);
        Ok(entry_id)
    }

    /// Pin or unpin a goal, returning the resulting pinned ids
    pub async fn toggle_active_goal(&self, owner: &str, goal_id: i64) -> LedgerResult<Vec<i64>> {
        info!("Toggling active goal {} for {}", goal_id, owner);
        let owner = &require_owner(owner)?;

        let mut active = self.live_active_ids(owner).await?;
        if !active.remove(&goal_id) {
            if self.store.goals.get_goal(owner, goal_id).await?.is_none() {
                return Err(LedgerError::not_found("Goal", goal_id));
            }
            active.insert(goal_id);
        }

        self.write_active_ids(owner, &active).await?;
        Ok(active.into_iter().collect())
    }

    /// Pinned goal ids, ascending, restricted to goals that still exist
    pub async fn active_goal_ids(&self, owner: &str) -> LedgerResult<Vec<i64>> {
        let owner = &require_owner(owner)?;
        Ok(self.live_active_ids(owner).await?.into_iter().collect())
    }

    async fn stored_active_ids(&self, owner: &str) -> LedgerResult<BTreeSet<i64>> {
        let stored = self.store.settings.get_setting(&active_goals_key(owner)).await?;
        Ok(stored.as_deref().map(parse_goal_id_list).unwrap_or_default())
    }

    async fn live_active_ids(&self, owner: &str) -> LedgerResult<BTreeSet<i64>> {
        let stored = self.stored_active_ids(owner).await?;
        if stored.is_empty() {
            return Ok(stored);
        }
        let existing: HashSet<i64> = self
            .store
            .goals
            .list_goals(owner)
            .await?
            .iter()
            .map(|goal| goal.id)
            .collect();
        Ok(stored.into_iter().filter(|id| existing.contains(id)).collect())
    }

    async fn write_active_ids(&self, owner: &str, ids: &BTreeSet<i64>) -> LedgerResult<()> {
        let key = active_goals_key(owner);
        if ids.is_empty() {
            self.store.settings.delete_setting(&key).await?;
        } else {
            self.store.settings.set_setting(&key, &format_goal_id_list(ids)).await?;
        }
        Ok(())
    }
}
