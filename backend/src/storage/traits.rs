//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer. Every
//! method is owner-scoped: a row that belongs to another owner behaves as if
//! it does not exist.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::FinanceKind;

use crate::domain::dates::MonthKey;
use crate::domain::models::{
    AutopayPlan, Budget, FinanceEntry, Goal, NewAutopayPlan, NewFinanceEntry, NewGoal, User,
};

/// Trait defining the interface for finance entry storage operations
#[async_trait]
pub trait EntryStorage: Send + Sync {
    /// Store a new entry and return its id
    async fn insert_entry(&self, entry: &NewFinanceEntry) -> Result<i64>;

    /// Retrieve a specific entry by id
    async fn get_entry(&self, owner: &str, entry_id: i64) -> Result<Option<FinanceEntry>>;

    /// Find the entry carrying an idempotency key
    async fn find_by_source_key(&self, owner: &str, source_key: &str) -> Result<Option<FinanceEntry>>;

    /// Entries of one kind, newest first (entry date, then id)
    async fn list_entries_by_kind(&self, owner: &str, kind: FinanceKind, limit: u32) -> Result<Vec<FinanceEntry>>;

    /// Entries dated in `[start, end)`, oldest first
    async fn list_entries_between(&self, owner: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<FinanceEntry>>;

    /// Every entry of the owner, oldest first
    async fn list_all_entries(&self, owner: &str) -> Result<Vec<FinanceEntry>>;

    /// Distinct entry titles of the owner
    async fn distinct_titles(&self, owner: &str) -> Result<Vec<String>>;

    /// Delete a single entry
    /// Returns true if the entry was found and deleted, false otherwise
    async fn delete_entry(&self, owner: &str, entry_id: i64) -> Result<bool>;

    /// Delete every entry of the owner, returning how many went away
    async fn delete_all_entries(&self, owner: &str) -> Result<u64>;
}

/// Trait defining the interface for goal storage operations
#[async_trait]
pub trait GoalStorage: Send + Sync {
    async fn insert_goal(&self, goal: &NewGoal) -> Result<i64>;

    async fn get_goal(&self, owner: &str, goal_id: i64) -> Result<Option<Goal>>;

    /// Goals newest first
    async fn list_goals(&self, owner: &str) -> Result<Vec<Goal>>;

    /// Returns true if the goal was found and deleted
    async fn delete_goal(&self, owner: &str, goal_id: i64) -> Result<bool>;

    async fn delete_all_goals(&self, owner: &str) -> Result<u64>;

    /// Atomically apply `current_amount = max(0, current_amount + delta)`
    /// Returns false when the goal does not exist
    async fn adjust_goal_progress(&self, owner: &str, goal_id: i64, delta: f64) -> Result<bool>;

    /// Store the allocation entry and raise the goal by its amount in one
    /// storage transaction. Returns the entry id, or `None` (with nothing
    /// written) when the goal does not exist.
    async fn allocate_to_goal(&self, goal_id: i64, entry: &NewFinanceEntry) -> Result<Option<i64>>;

    /// Delete an allocation entry and take its amount back off the goal
    /// (clamped at zero) in one storage transaction. Returns false, with
    /// nothing written, when the entry does not exist.
    async fn delete_allocation(&self, owner: &str, entry_id: i64, goal_id: i64, amount: f64) -> Result<bool>;
}

/// Trait defining the interface for monthly budget storage operations
#[async_trait]
pub trait BudgetStorage: Send + Sync {
    /// Insert or overwrite the budget for `(owner, month)`
    async fn upsert_budget(&self, owner: &str, month_key: MonthKey, amount: f64) -> Result<()>;

    /// Budgets ordered by month ascending
    async fn list_budgets(&self, owner: &str) -> Result<Vec<Budget>>;
}

/// Trait defining the interface for autopay plan storage operations
#[async_trait]
pub trait AutopayStorage: Send + Sync {
    async fn insert_plan(&self, plan: &NewAutopayPlan) -> Result<i64>;

    async fn get_plan(&self, owner: &str, plan_id: i64) -> Result<Option<AutopayPlan>>;

    /// Active plans, earliest next payment first, then newest
    async fn list_active_plans(&self, owner: &str) -> Result<Vec<AutopayPlan>>;

    /// Logical deletion. Returns true if an active plan was switched off
    async fn deactivate_plan(&self, owner: &str, plan_id: i64) -> Result<bool>;

    /// Persist the recurrence cursor
    async fn update_next_payment_date(&self, owner: &str, plan_id: i64, next_payment_date: NaiveDate) -> Result<bool>;
}

/// Trait defining the interface for user storage operations
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn insert_user(&self, email: &str, username: &str, credential: &str) -> Result<i64>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Returns true if a user with this email exists
    async fn update_credential(&self, email: &str, credential: &str) -> Result<bool>;
}

/// Trait defining the interface for the key/value settings table
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    async fn get_setting(&self, key: &str) -> Result<Option<String>>;

    async fn set_setting(&self, key: &str, value: &str) -> Result<()>;

    async fn delete_setting(&self, key: &str) -> Result<bool>;
}
