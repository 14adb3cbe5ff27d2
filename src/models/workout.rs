use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// One performed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
}

impl SetEntry {
    pub fn new(exercise: impl Into<String>, weight: f64, reps: u32) -> Self {
        Self {
            exercise: exercise.into(),
            weight,
            reps,
        }
    }

    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }

    /// Trim the exercise name and check the set can be persisted.
    pub fn validated(self) -> Result<Self, String> {
        let exercise = self.exercise.trim().to_string();
        if exercise.is_empty() {
            return Err("Exercise is required".to_string());
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err("Weight must be zero or more".to_string());
        }
        if self.reps == 0 {
            return Err("Reps must be at least 1".to_string());
        }
        Ok(Self { exercise, ..self })
    }
}

impl FromSqliteRow for SetEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            exercise: row.get("exercise")?,
            weight: row.get("weight")?,
            reps: row.get("reps")?,
        })
    }
}

/// One logged session. Immutable once saved; only deletion is supported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutRecord {
    pub id: String,
    pub owner_id: String,
    pub date: DateTime<Utc>,
    pub sets: Vec<SetEntry>,
}

impl WorkoutRecord {
    pub fn volume(&self) -> f64 {
        crate::aggregator::compute_volume(&self.sets)
    }
}

/// JSON body for creating a workout. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
pub struct CreateWorkout {
    pub sets: Vec<SetEntry>,
}
