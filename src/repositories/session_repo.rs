use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{FromSqliteRow, User};
use crate::session::SESSION_TTL_DAYS;

#[derive(Clone)]
pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new session for a user. Returns the session token.
    pub async fn create(&self, user_id: &str) -> Result<String> {
        let pool = self.pool.clone();
        let token = Uuid::new_v4().to_string();
        let user_id = user_id.to_string();
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(SESSION_TTL_DAYS);

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![token, user_id, now, expires_at],
            )?;
            Ok(token)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Find the user behind a valid (non-expired) session.
    /// Lazily deletes the session if it has expired.
    pub async fn find_user(&self, token: &str) -> Result<Option<User>> {
        let pool = self.pool.clone();
        let token = token.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let result: Option<(User, chrono::DateTime<Utc>)> = conn
                .query_row(
                    "SELECT u.*, s.expires_at AS session_expires_at
                     FROM sessions s
                     JOIN users u ON s.user_id = u.id
                     WHERE s.token = ?",
                    [&token],
                    |row| Ok((User::from_row(row)?, row.get("session_expires_at")?)),
                )
                .optional()?;

            match result {
                Some((user, expires_at)) if expires_at > now => Ok(Some(user)),
                Some(_) => {
                    conn.execute("DELETE FROM sessions WHERE token = ?", [&token])?;
                    Ok(None)
                }
                None => Ok(None),
            }
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete a single session (logout).
    pub async fn delete(&self, token: &str) -> Result<()> {
        let pool = self.pool.clone();
        let token = token.to_string();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            conn.execute("DELETE FROM sessions WHERE token = ?", [&token])?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Batch delete all expired sessions. Returns how many were removed.
    pub async fn cleanup_expired(&self) -> Result<usize> {
        let pool = self.pool.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let removed = conn.execute(
                "DELETE FROM sessions WHERE expires_at <= ?",
                rusqlite::params![now],
            )?;
            Ok(removed)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{create_test_user, setup_test_db};

    fn expire_all(pool: &DbPool) {
        let conn = pool.get().unwrap();
        let past = Utc::now() - chrono::Duration::days(1);
        conn.execute("UPDATE sessions SET expires_at = ?", rusqlite::params![past])
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = SessionRepository::new(pool);

        let token = repo.create("user1").await.unwrap();
        let user = repo.find_user(&token).await.unwrap().unwrap();

        assert_eq!(user.id, "user1");
        assert_eq!(user.email, "user1@example.com");
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let repo = SessionRepository::new(setup_test_db());
        assert!(repo.find_user("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_removed() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = SessionRepository::new(pool.clone());

        let token = repo.create("user1").await.unwrap();
        expire_all(&pool);

        assert!(repo.find_user(&token).await.unwrap().is_none());

        let conn = pool.get().unwrap();
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = SessionRepository::new(pool);

        let token = repo.create("user1").await.unwrap();
        repo.delete(&token).await.unwrap();

        assert!(repo.find_user(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cleanup_expired() {
        let pool = setup_test_db();
        create_test_user(&pool, "user1");
        let repo = SessionRepository::new(pool.clone());

        repo.create("user1").await.unwrap();
        repo.create("user1").await.unwrap();
        expire_all(&pool);
        let fresh = repo.create("user1").await.unwrap();

        assert_eq!(repo.cleanup_expired().await.unwrap(), 2);
        assert!(repo.find_user(&fresh).await.unwrap().is_some());
    }
}
