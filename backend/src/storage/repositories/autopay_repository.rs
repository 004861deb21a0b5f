use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::AutopayCadence;
use sqlx::{sqlite::SqliteRow, Row};

use super::{decode_date, encode_date};
use crate::domain::models::{AutopayPlan, NewAutopayPlan};
use crate::storage::connection::DbConnection;
use crate::storage::traits::AutopayStorage;

/// Repository for autopay plan operations
#[derive(Clone)]
pub struct AutopayRepository {
    db: DbConnection,
}

impl AutopayRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_plan(row: &SqliteRow) -> Result<AutopayPlan> {
        let cadence: String = row.get("cadence");
        let start_date: String = row.get("start_date");
        let next_payment_date: String = row.get("next_payment_date");
        let active: i64 = row.get("active");
        Ok(AutopayPlan {
            id: row.get("id"),
            user_email: row.get("user_email"),
            title: row.get("title"),
            amount: row.get("amount"),
            cadence: cadence.parse::<AutopayCadence>().map_err(|e| anyhow!(e))?,
            start_date: decode_date("start_date", &start_date)?,
            next_payment_date: decode_date("next_payment_date", &next_payment_date)?,
            active: active != 0,
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl AutopayStorage for AutopayRepository {
    async fn insert_plan(&self, plan: &NewAutopayPlan) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO autopay_plans
                (user_email, title, amount, cadence, start_date, next_payment_date, active)
            VALUES (?, ?, ?, ?, ?, ?, 1)
            "#,
        )
        .bind(&plan.user_email)
        .bind(&plan.title)
        .bind(plan.amount)
        .bind(plan.cadence.as_str())
        .bind(encode_date(plan.start_date))
        .bind(encode_date(plan.next_payment_date))
        .execute(self.db.pool())
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get_plan(&self, owner: &str, plan_id: i64) -> Result<Option<AutopayPlan>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_email, title, amount, cadence, start_date, next_payment_date, active, created_at
            FROM autopay_plans
            WHERE user_email = ? AND id = ?
            "#,
        )
        .bind(owner)
        .bind(plan_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_plan).transpose()
    }

    async fn list_active_plans(&self, owner: &str) -> Result<Vec<AutopayPlan>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_email, title, amount, cadence, start_date, next_payment_date, active, created_at
            FROM autopay_plans
            WHERE user_email = ? AND active = 1
            ORDER BY next_payment_date ASC, created_at DESC, id DESC
            "#,
        )
        .bind(owner)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_plan).collect()
    }

    async fn deactivate_plan(&self, owner: &str, plan_id: i64) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE autopay_plans SET active = 0 WHERE user_email = ? AND id = ? AND active = 1",
        )
        .bind(owner)
        .bind(plan_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_next_payment_date(&self, owner: &str, plan_id: i64, next_payment_date: NaiveDate) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE autopay_plans SET next_payment_date = ? WHERE user_email = ? AND id = ?",
        )
        .bind(encode_date(next_payment_date))
        .bind(owner)
        .bind(plan_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> AutopayRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        AutopayRepository::new(db)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_plan(title: &str, cadence: AutopayCadence, start: NaiveDate) -> NewAutopayPlan {
        NewAutopayPlan {
            user_email: "a@b.co".to_string(),
            title: title.to_string(),
            amount: 15.0,
            cadence,
            start_date: start,
            next_payment_date: start,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_plan() {
        let repo = setup_test().await;
        let id = repo
            .insert_plan(&new_plan("Streaming", AutopayCadence::Monthly, date(2024, 1, 31)))
            .await
            .unwrap();

        let plan = repo.get_plan("a@b.co", id).await.unwrap().expect("Plan should exist");
        assert_eq!(plan.cadence, AutopayCadence::Monthly);
        assert_eq!(plan.start_date, date(2024, 1, 31));
        assert_eq!(plan.next_payment_date, date(2024, 1, 31));
        assert!(plan.active);
        assert!(repo.get_plan("other@b.co", id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_active_plans_ordered_by_next_payment() {
        let repo = setup_test().await;
        let late = repo.insert_plan(&new_plan("Gym", AutopayCadence::Weekly, date(2024, 3, 20))).await.unwrap();
        let early = repo.insert_plan(&new_plan("Phone", AutopayCadence::Daily, date(2024, 3, 2))).await.unwrap();
        let gone = repo.insert_plan(&new_plan("Old", AutopayCadence::Daily, date(2024, 3, 1))).await.unwrap();

        assert!(repo.deactivate_plan("a@b.co", gone).await.unwrap());
        assert!(!repo.deactivate_plan("a@b.co", gone).await.unwrap());

        let ids: Vec<i64> = repo.list_active_plans("a@b.co").await.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![early, late]);
    }

    #[tokio::test]
    async fn test_update_next_payment_date() {
        let repo = setup_test().await;
        let id = repo
            .insert_plan(&new_plan("Rent", AutopayCadence::Fortnightly, date(2024, 3, 1)))
            .await
            .unwrap();

        assert!(repo.update_next_payment_date("a@b.co", id, date(2024, 3, 16)).await.unwrap());
        let plan = repo.get_plan("a@b.co", id).await.unwrap().unwrap();
        assert_eq!(plan.next_payment_date, date(2024, 3, 16));
        assert_eq!(plan.start_date, date(2024, 3, 1));
        assert!(!repo.update_next_payment_date("a@b.co", 999, date(2024, 3, 16)).await.unwrap());
    }
}
