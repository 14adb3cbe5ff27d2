#![allow(dead_code)]

use axum::body::Body;
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;

use gymlog::auth_provider::AuthProvider;
use gymlog::db::{create_memory_pool, DbPool};
use gymlog::migrations::run_migrations_for_tests;
use gymlog::models::{SetEntry, User, WorkoutRecord};
use gymlog::repositories::{DraftRepository, SessionRepository, UserRepository, WorkoutRepository};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn create_test_app(pool: DbPool) -> Router {
    use gymlog::handlers::{api, auth, history, logger};

    // Create repositories
    let user_repo = UserRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let draft_repo = DraftRepository::new(pool.clone());

    // Create handler states
    let auth_state = auth::AuthState {
        auth: AuthProvider::new(user_repo, session_repo),
    };
    let logger_state = logger::LoggerState {
        workout_repo: workout_repo.clone(),
        draft_repo: draft_repo.clone(),
    };
    let history_state = history::HistoryState {
        workout_repo: workout_repo.clone(),
        draft_repo,
    };
    let api_state = api::ApiState { workout_repo };

    gymlog::routes::create_router(auth_state, logger_state, history_state, api_state)
}

pub async fn create_test_user(pool: &DbPool, email: &str, password: &str) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo.create(email, password, None).await.unwrap()
}

pub async fn create_session_cookie(pool: &DbPool, user: &User) -> String {
    let session_repo = SessionRepository::new(pool.clone());
    let token = session_repo.create(&user.id).await.unwrap();
    format!("session={}", token)
}

pub fn extract_cookie_header(set_cookie: &str) -> String {
    // Extract just the cookie name=value part for use in Cookie header
    set_cookie.split(';').next().unwrap_or("").to_string()
}

pub async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// Test data creation helpers
pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

pub async fn create_test_workout(
    pool: &DbPool,
    user_id: &str,
    date: &str,
    sets: &[(&str, f64, u32)],
) -> WorkoutRecord {
    let workout_repo = WorkoutRepository::new(pool.clone());
    let sets = sets
        .iter()
        .map(|(exercise, weight, reps)| SetEntry::new(*exercise, *weight, *reps))
        .collect();
    workout_repo
        .create_at(user_id, utc(date), sets)
        .await
        .unwrap()
}

pub async fn add_draft_set(pool: &DbPool, user_id: &str, exercise: &str, weight: f64, reps: u32) {
    let draft_repo = DraftRepository::new(pool.clone());
    draft_repo
        .add(user_id, &SetEntry::new(exercise, weight, reps))
        .await
        .unwrap();
}
