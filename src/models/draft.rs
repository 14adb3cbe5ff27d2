use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{FromSqliteRow, SetEntry};

/// A set logged in the current session that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSet {
    pub id: i64,
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
}

impl DraftSet {
    pub fn to_entry(&self) -> SetEntry {
        SetEntry::new(self.exercise.clone(), self.weight, self.reps)
    }
}

impl FromSqliteRow for DraftSet {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            exercise: row.get("exercise")?,
            weight: row.get("weight")?,
            reps: row.get("reps")?,
        })
    }
}

/// Raw logger form input. Numbers arrive as text so that blank or malformed
/// values can be reported on the page instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewSetForm {
    pub exercise: String,
    pub weight: String,
    pub reps: String,
}

impl NewSetForm {
    /// Parse and validate the form into a set ready for the draft.
    pub fn into_entry(self) -> Result<SetEntry, String> {
        let weight: f64 = self
            .weight
            .trim()
            .parse()
            .map_err(|_| "Weight must be a number".to_string())?;
        let reps: u32 = self
            .reps
            .trim()
            .parse()
            .map_err(|_| "Reps must be at least 1".to_string())?;

        SetEntry::new(self.exercise, weight, reps).validated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(exercise: &str, weight: &str, reps: &str) -> NewSetForm {
        NewSetForm {
            exercise: exercise.to_string(),
            weight: weight.to_string(),
            reps: reps.to_string(),
        }
    }

    #[test]
    fn test_into_entry_parses_numbers() {
        let entry = form(" Leg Press ", "137.5", " 8 ").into_entry().unwrap();
        assert_eq!(entry, SetEntry::new("Leg Press", 137.5, 8));
    }

    #[test]
    fn test_into_entry_rejects_blank_or_negative_numbers() {
        assert_eq!(
            form("Leg Press", "", "8").into_entry(),
            Err("Weight must be a number".to_string())
        );
        assert_eq!(
            form("Leg Press", "135", "").into_entry(),
            Err("Reps must be at least 1".to_string())
        );
        assert_eq!(
            form("Leg Press", "135", "-1").into_entry(),
            Err("Reps must be at least 1".to_string())
        );
        assert_eq!(
            form("Leg Press", "-5", "8").into_entry(),
            Err("Weight must be zero or more".to_string())
        );
    }

    #[test]
    fn test_missing_fields_deserialize_as_blank() {
        let form: NewSetForm = serde_json::from_str(r#"{"exercise": "Leg Press"}"#).unwrap();
        assert_eq!(form.into_entry(), Err("Weight must be a number".to_string()));
    }
}
