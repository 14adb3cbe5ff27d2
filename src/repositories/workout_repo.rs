use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Transaction};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{DraftSet, FromSqliteRow, SetEntry, WorkoutRecord};

const SELECT_RECORD_ROWS: &str = "SELECT w.id, w.user_id, w.date, s.exercise, s.weight, s.reps
     FROM workouts w
     JOIN workout_sets s ON s.workout_id = w.id";

#[derive(Clone)]
pub struct WorkoutRepository {
    pool: DbPool,
}

impl WorkoutRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Save a new workout dated now.
    pub async fn create(&self, user_id: &str, sets: Vec<SetEntry>) -> Result<WorkoutRecord> {
        self.create_at(user_id, Utc::now(), sets).await
    }

    /// Save a new workout with an explicit date. Sets are stored in the given order.
    pub async fn create_at(
        &self,
        user_id: &str,
        date: DateTime<Utc>,
        sets: Vec<SetEntry>,
    ) -> Result<WorkoutRecord> {
        if sets.is_empty() {
            return Err(AppError::Validation(
                "A workout needs at least one set".to_string(),
            ));
        }

        let record = WorkoutRecord {
            id: Uuid::new_v4().to_string(),
            owner_id: user_id.to_string(),
            date,
            sets,
        };
        let record_clone = record.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;
            insert_record(&tx, &record_clone)?;
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(record)
    }

    /// Turn the user's draft into a saved workout and clear the draft.
    ///
    /// Returns `None` when the draft is empty. Both steps share one
    /// transaction, so a failed save leaves the draft as it was.
    pub async fn create_from_draft(&self, user_id: &str) -> Result<Option<WorkoutRecord>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();

        tokio::task::spawn_blocking(move || -> Result<Option<WorkoutRecord>> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let sets = {
                let mut stmt = tx.prepare(
                    "SELECT id, exercise, weight, reps FROM draft_sets WHERE user_id = ? ORDER BY id",
                )?;
                let drafts = stmt
                    .query_map([&user_id], DraftSet::from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                drafts.iter().map(DraftSet::to_entry).collect::<Vec<_>>()
            };

            if sets.is_empty() {
                return Ok(None);
            }

            let record = WorkoutRecord {
                id: Uuid::new_v4().to_string(),
                owner_id: user_id.clone(),
                date: Utc::now(),
                sets,
            };
            insert_record(&tx, &record)?;
            tx.execute("DELETE FROM draft_sets WHERE user_id = ?", [&user_id])?;
            tx.commit()?;

            Ok(Some(record))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// All workouts of a user, newest first.
    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<WorkoutRecord>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(&format!(
                "{} WHERE w.user_id = ? ORDER BY w.date DESC, w.id, s.position",
                SELECT_RECORD_ROWS
            ))?;
            let rows = stmt
                .query_map([&user_id], RecordRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(assemble_records(rows))
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_id(&self, id: &str, user_id: &str) -> Result<Option<WorkoutRecord>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(&format!(
                "{} WHERE w.id = ? AND w.user_id = ? ORDER BY s.position",
                SELECT_RECORD_ROWS
            ))?;
            let rows = stmt
                .query_map([&id, &user_id], RecordRow::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(assemble_records(rows).into_iter().next())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Delete a workout owned by `user_id`. Returns false if nothing matched.
    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || -> Result<bool> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let owned: Option<String> = tx
                .query_row(
                    "SELECT id FROM workouts WHERE id = ? AND user_id = ?",
                    [&id, &user_id],
                    |row| row.get(0),
                )
                .optional()?;
            if owned.is_none() {
                return Ok(false);
            }

            tx.execute("DELETE FROM workout_sets WHERE workout_id = ?", [&id])?;
            tx.execute("DELETE FROM workouts WHERE id = ?", [&id])?;
            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

fn insert_record(tx: &Transaction<'_>, record: &WorkoutRecord) -> rusqlite::Result<()> {
    tx.execute(
        "INSERT INTO workouts (id, user_id, date) VALUES (?, ?, ?)",
        rusqlite::params![record.id, record.owner_id, record.date],
    )?;

    let mut stmt = tx.prepare(
        "INSERT INTO workout_sets (workout_id, position, exercise, weight, reps)
         VALUES (?, ?, ?, ?, ?)",
    )?;
    for (position, set) in record.sets.iter().enumerate() {
        stmt.execute(rusqlite::params![
            record.id,
            position as i64,
            set.exercise,
            set.weight,
            set.reps
        ])?;
    }
    Ok(())
}

/// One joined workout/set row.
struct RecordRow {
    id: String,
    owner_id: String,
    date: DateTime<Utc>,
    set: SetEntry,
}

impl FromSqliteRow for RecordRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            owner_id: row.get("user_id")?,
            date: row.get("date")?,
            set: SetEntry::from_row(row)?,
        })
    }
}

/// Fold rows (grouped by workout id) back into records.
fn assemble_records(rows: Vec<RecordRow>) -> Vec<WorkoutRecord> {
    let mut records: Vec<WorkoutRecord> = Vec::new();
    for row in rows {
        match records.last_mut() {
            Some(last) if last.id == row.id => last.sets.push(row.set),
            _ => records.push(WorkoutRecord {
                id: row.id,
                owner_id: row.owner_id,
                date: row.date,
                sets: vec![row.set],
            }),
        }
    }
    records
}
