use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};

use crate::domain::models::User;
use crate::storage::connection::DbConnection;
use crate::storage::traits::UserStorage;

/// Repository for user accounts
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_user(row: &SqliteRow) -> User {
        User {
            id: row.get("id"),
            email: row.get("email"),
            username: row.get("username"),
            credential: row.get("credential"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn insert_user(&self, email: &str, username: &str, credential: &str) -> Result<i64> {
        let result = sqlx::query("INSERT INTO users (email, username, credential) VALUES (?, ?, ?)")
            .bind(email)
            .bind(username)
            .bind(credential)
            .execute(self.db.pool())
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, email, username, credential, created_at FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.as_ref().map(Self::row_to_user))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT id, email, username, credential, created_at FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?;
        Ok(row.as_ref().map(Self::row_to_user))
    }

    async fn update_credential(&self, email: &str, credential: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET credential = ? WHERE email = ?")
            .bind(credential)
            .bind(email)
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test() -> UserRepository {
        let db = DbConnection::init_test().await.expect("Failed to create test database");
        UserRepository::new(db)
    }

    #[tokio::test]
    async fn test_insert_and_lookup_user() {
        let repo = setup_test().await;
        repo.insert_user("a@b.co", "alice", "secret1").await.unwrap();

        let by_email = repo.get_user_by_email("a@b.co").await.unwrap().expect("User should exist");
        assert_eq!(by_email.username, "alice");
        let by_name = repo.get_user_by_username("alice").await.unwrap().expect("User should exist");
        assert_eq!(by_name.email, "a@b.co");
        assert!(repo.get_user_by_email("nobody@b.co").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let repo = setup_test().await;
        repo.insert_user("a@b.co", "alice", "secret1").await.unwrap();
        assert!(repo.insert_user("a@b.co", "alice2", "secret1").await.is_err());
    }

    #[tokio::test]
    async fn test_update_credential() {
        let repo = setup_test().await;
        repo.insert_user("a@b.co", "alice", "secret1").await.unwrap();

        assert!(repo.update_credential("a@b.co", "secret2").await.unwrap());
        assert!(!repo.update_credential("nobody@b.co", "secret2").await.unwrap());
        let user = repo.get_user_by_email("a@b.co").await.unwrap().unwrap();
        assert_eq!(user.credential, "secret2");
    }
}
