use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::FinanceKind;
use sqlx::{sqlite::SqliteRow, Row};

use super::{decode_date, encode_date};
use crate::domain::models::{FinanceEntry, NewFinanceEntry};
use crate::storage::connection::DbConnection;
use crate::storage::traits::EntryStorage;

const ENTRY_COLUMNS: &str =
    "id, user_email, kind, title, amount, category, entry_date, source_key, created_at";

/// Repository for finance entry operations
#[derive(Clone)]
pub struct EntryRepository {
    db: DbConnection,
}

impl EntryRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_entry(row: &SqliteRow) -> Result<FinanceEntry> {
        let kind: String = row.get("kind");
        let entry_date: String = row.get("entry_date");
        Ok(FinanceEntry {
            id: row.get("id"),
            user_email: row.get("user_email"),
            kind: kind.parse::<FinanceKind>().map_err(|e| anyhow!(e))?,
            title: row.get("title"),
            amount: row.get("amount"),
            category: row.get("category"),
            entry_date: decode_date("entry_date", &entry_date)?,
            source_key: row.get("source_key"),
            created_at: row.get("created_at"),
        })
    }

    fn rows_to_entries(rows: &[SqliteRow]) -> Result<Vec<FinanceEntry>> {
        rows.iter().map(Self::row_to_entry).collect()
    }
}

#[async_trait]
impl EntryStorage for EntryRepository {
    async fn insert_entry(&self, entry: &NewFinanceEntry) -> Result<i64> {
        let result = sqlx::query(
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
        .execute(self.db.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get_entry(&self, owner: &str, entry_id: i64) -> Result<Option<FinanceEntry>> {
        let query = format!(
            "SELECT {} FROM finance_entries WHERE user_email = ? AND id = ?",
            ENTRY_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(owner)
            .bind(entry_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_entry).transpose()
    }

    async fn find_by_source_key(&self, owner: &str, source_key: &str) -> Result<Option<FinanceEntry>> {
        let query = format!(
            "SELECT {} FROM finance_entries WHERE user_email = ? AND source_key = ? LIMIT 1",
            ENTRY_COLUMNS
        );
        let row = sqlx::query(&query)
            .bind(owner)
            .bind(source_key)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(Self::row_to_entry).transpose()
    }

    async fn list_entries_by_kind(&self, owner: &str, kind: FinanceKind, limit: u32) -> Result<Vec<FinanceEntry>> {
        let query = format!(
            r#"
            SELECT {}
            FROM finance_entries
            WHERE user_email = ? AND kind = ?
            ORDER BY entry_date DESC, id DESC
            LIMIT ?
            "#,
            ENTRY_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(owner)
            .bind(kind.as_str())
            .bind(limit as i64)
            .fetch_all(self.db.pool())
            .await?;

        Self::rows_to_entries(&rows)
    }

    async fn list_entries_between(&self, owner: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<FinanceEntry>> {
        let query = format!(
            r#"
            SELECT {}
            FROM finance_entries
            WHERE user_email = ? AND entry_date >= ? AND entry_date < ?
            ORDER BY entry_date ASC, id ASC
            "#,
            ENTRY_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(owner)
            .bind(encode_date(start))
            .bind(encode_date(end))
            .fetch_all(self.db.pool())
            .await?;

        Self::rows_to_entries(&rows)
    }

    async fn list_all_entries(&self, owner: &str) -> Result<Vec<FinanceEntry>> {
        let query = format!(
            "SELECT {} FROM finance_entries WHERE user_email = ? ORDER BY entry_date ASC, id ASC",
            ENTRY_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(owner)
            .fetch_all(self.db.pool())
            .await?;

        Self::rows_to_entries(&rows)
    }

    async fn distinct_titles(&self, owner: &str) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT DISTINCT title FROM finance_entries WHERE user_email = ?")
            .bind(owner)
            .fetch_all(self.db.pool())
            .await?;

        Ok(rows.iter().map(|row| row.get("title")).collect())
    }

    async fn delete_entry(&self, owner: &str, entry_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM finance_entries WHERE user_email = ? AND id = ?")
            .bind(owner)
            .bind(entry_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all_entries(&self, owner: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM finance_entries WHERE user_email = ?")
            .bind(owner)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected())
    }
}
