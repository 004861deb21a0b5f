use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use super::{decode_date, encode_date};
use crate::domain::models::{Goal, NewFinanceEntry, NewGoal};
use crate::storage::connection::DbConnection;
use crate::storage::traits::GoalStorage;

/// Repository for goal operations
#[derive(Clone)]
pub struct GoalRepository {
    db: DbConnection,
}

impl GoalRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_goal(row: &SqliteRow) -> Result<Goal> {
        let target_date: Option<String> = row.get("target_date");
        Ok(Goal {
            id: row.get("id"),
            user_email: row.get("user_email"),
            name: row.get("name"),
            current_amount: row.get("current_amount"),
            target_amount: row.get("target_amount"),
            target_date: target_date
                .as_deref()
                .map(|value| decode_date("target_date", value))
                .transpose()?,
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl GoalStorage for GoalRepository {
    async fn insert_goal(&self, goal: &NewGoal) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO goals (user_email, name, current_amount, target_amount, target_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&goal.user_email)
        .bind(&goal.name)
        .bind(goal.current_amount)
        .bind(goal.target_amount)
        .bind(goal.target_date.map(encode_date))
        .execute(self.db.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get_goal(&self, owner: &str, goal_id: i64) -> Result<Option<Goal>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_email, name, current_amount, target_amount, target_date, created_at
            FROM goals
            WHERE user_email = ? AND id = ?
            "#,
        )
        .bind(owner)
        .bind(goal_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_goal).transpose()
    }

    async fn list_goals(&self, owner: &str) -> Result<Vec<Goal>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_email, name, current_amount, target_amount, target_date, created_at
            FROM goals
            WHERE user_email = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_goal).collect()
    }

    async fn delete_goal(&self, owner: &str, goal_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE user_email = ? AND id = ?")
            .bind(owner)
            .bind(goal_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_goals(&self, owner: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM goals WHERE user_email = ?")
            .bind(owner)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected())
    }

    async fn adjust_goal_progress(&self, owner: &str, goal_id: i64, delta: f64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE goals
            SET current_amount = MAX(0, current_amount + ?)
            WHERE user_email = ? AND id = ?
            "#,
        )
        .bind(delta)
        .bind(owner)
        .bind(goal_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn allocate_to_goal(&self, goal_id: i64, entry: &NewFinanceEntry) -> Result<Option<i64>> {
        let mut tx = self.db.pool().begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE goals
            SET current_amount = MAX(0, current_amount + ?)
            WHERE user_email = ? AND id = ?
            "#,
        )
        .bind(entry.amount)
        .bind(&entry.user_email)
        .bind(goal_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        let inserted = match sqlx::query(
            r#"
            INSERT INTO finance_entries
                (user_email, kind, title, amount, category, entry_date, source_key)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.user_email)
        .bind(entry.kind.as_str())
        .bind(&entry.title)
        .bind(entry.amount)
        .bind(&entry.category)
        .bind(encode_date(entry.entry_date))
        .bind(&entry.source_key)
        .execute(&mut *tx)
        .await
        {
            Ok(result) => result,
            Err(e) => {
                tx.rollback().await?;
                return Err(e.into());
            }
        };

        tx.commit().await?;
        Ok(Some(inserted.last_insert_rowid()))
    }
    async fn delete_allocation(&self, owner: &str, entry_id: i64, goal_id: i64, amount: f64) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        let deleted = sqlx::query("DELETE FROM finance_entries WHERE user_email = ? AND id = ?")
            .bind(owner)
            .bind(entry_id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        if let Err(e) = sqlx::query(
            r#"
            UPDATE goals
            SET current_amount = MAX(0, current_amount - ?)
            WHERE user_email = ? AND id = ?
            "#,
        )
        .bind(amount)
        .bind(owner)
        .bind(goal_id)
        .execute(&mut *tx)
        .await
        {
            tx.rollback().await?;
            return Err(e.into());
        }

        tx.commit().await?;
        Ok(true)
    }
}
