pub mod draft_repo;
pub mod session_repo;
pub mod user_repo;
pub mod workout_repo;

pub use draft_repo::DraftRepository;
pub use session_repo::SessionRepository;
pub use user_repo::UserRepository;
pub use workout_repo::WorkoutRepository;
