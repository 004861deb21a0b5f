use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::dates::MonthKey;
use crate::domain::models::Budget;
use crate::storage::connection::DbConnection;
use crate::storage::traits::BudgetStorage;

/// Repository for monthly budget operations
#[derive(Clone)]
pub struct BudgetRepository {
    db: DbConnection,
}

impl BudgetRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_budget(row: &SqliteRow) -> Result<Budget> {
        let month_key: String = row.get("month_key");
        Ok(Budget {
            id: row.get("id"),
            user_email: row.get("user_email"),
            month_key: MonthKey::parse(&month_key)
                .map_err(|e| anyhow!("Invalid month_key in database: {}", e))?,
            amount: row.get("amount"),
        })
    }
}

#[async_trait]
impl BudgetStorage for BudgetRepository {
    async fn upsert_budget(&self, owner: &str, month_key: MonthKey, amount: f64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO budgets (user_email, month_key, amount)
            VALUES (?, ?, ?)
            ON CONFLICT (user_email, month_key) DO UPDATE SET amount = excluded.amount
            "#,
        )
        .bind(owner)
        .bind(month_key.to_string())
        .bind(amount)
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn list_budgets(&self, owner: &str) -> Result<Vec<Budget>> {
        let rows = sqlx::query(
            "SELECT id, user_email, month_key, amount FROM budgets WHERE user_email = ? ORDER BY month_key ASC",
        )
        .bind(owner)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_budget).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> BudgetRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        BudgetRepository::new(db)
    }

    fn month(y: i32, m: u32) -> MonthKey {
        MonthKey::new(y, m).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_overwrites_same_month() {
        let repo = setup_test().await;
        repo.upsert_budget("a@b.co", month(2024, 3), 1000.0).await.unwrap();
        repo.upsert_budget("a@b.co", month(2024, 3), 1200.0).await.unwrap();

        let budgets = repo.list_budgets("a@b.co").await.unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].month_key, month(2024, 3));
        assert_eq!(budgets[0].amount, 1200.0);
    }

    #[tokio::test]
    async fn test_list_budgets_orders_by_month() {
        let repo = setup_test().await;
        repo.upsert_budget("a@b.co", month(2024, 2), 300.0).await.unwrap();
        repo.upsert_budget("a@b.co", month(2023, 12), 100.0).await.unwrap();
        repo.upsert_budget("a@b.co", month(2024, 1), 200.0).await.unwrap();
        repo.upsert_budget("other@b.co", month(2024, 1), 999.0).await.unwrap();

        let months: Vec<String> = repo
            .list_budgets("a@b.co")
            .await
            .unwrap()
            .iter()
            .map(|b| b.month_key.to_string())
            .collect();
        assert_eq!(months, vec!["2023-12", "2024-01", "2024-02"]);
    }
}
