pub mod draft;
pub mod exercise;
pub mod from_row;
pub mod user;
pub mod workout;

pub use draft::{DraftSet, NewSetForm};
pub use exercise::EXERCISES;
pub use from_row::FromSqliteRow;
pub use user::{LoginCredentials, RegisterForm, User};
pub use workout::{CreateWorkout, SetEntry, WorkoutRecord};
