use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{DraftSet, FromSqliteRow, SetEntry};

/// Sets logged but not yet saved, kept per user between requests.
#[derive(Clone)]
pub struct DraftRepository {
    pool: DbPool,
}

impl DraftRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Draft sets in logging order.
    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<DraftSet>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT id, exercise, weight, reps FROM draft_sets WHERE user_id = ? ORDER BY id",
            )?;
            let sets = stmt
                .query_map([&user_id], DraftSet::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sets)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn add(&self, user_id: &str, set: &SetEntry) -> Result<DraftSet> {
        self.append(user_id, std::slice::from_ref(set))
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("draft insert returned no rows".to_string()))
    }

    /// Append several sets at once, e.g. when duplicating a saved workout.
    pub async fn append(&self, user_id: &str, sets: &[SetEntry]) -> Result<Vec<DraftSet>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let sets = sets.to_vec();
        tokio::task::spawn_blocking(move || -> Result<Vec<DraftSet>> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            let mut added = Vec::with_capacity(sets.len());
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO draft_sets (user_id, exercise, weight, reps) VALUES (?, ?, ?, ?)",
                )?;
                for set in sets {
                    stmt.execute(rusqlite::params![user_id, set.exercise, set.weight, set.reps])?;
                    added.push(DraftSet {
                        id: tx.last_insert_rowid(),
                        exercise: set.exercise,
                        weight: set.weight,
                        reps: set.reps,
                    });
                }
            }
            tx.commit()?;
            Ok(added)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn remove(&self, id: i64, user_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM draft_sets WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
