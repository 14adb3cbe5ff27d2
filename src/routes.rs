use axum::{
    routing::{delete, get, post},
    Extension, Router,
};

use crate::auth_provider::AuthProvider;
use crate::handlers::{api, auth, health, history, logger};

pub fn create_router(
    auth_state: auth::AuthState,
    logger_state: logger::LoggerState,
    history_state: history::HistoryState,
    api_state: api::ApiState,
) -> Router {
    let auth_provider: AuthProvider = auth_state.auth.clone();

    Router::new()
        // Auth routes
        .route(
            "/auth/login",
            get(auth::login_page).post(auth::login_submit),
        )
        .route(
            "/auth/register",
            get(auth::register_page).post(auth::register_submit),
        )
        .route("/auth/logout", post(auth::logout))
        .with_state(auth_state)
        // Logger and progress
        .route("/", get(logger::index))
        .route("/draft/sets", post(logger::add_set))
        .route("/draft/sets/{id}/delete", post(logger::remove_set))
        .route("/draft/save", post(logger::save))
        .with_state(logger_state)
        // History
        .route("/workouts", get(history::index))
        .route("/workouts/{id}/delete", post(history::delete))
        .route("/workouts/{id}/duplicate", post(history::duplicate))
        .with_state(history_state)
        // JSON API
        .route(
            "/api/workouts",
            get(api::list_workouts).post(api::create_workout),
        )
        .route("/api/workouts/{id}", delete(api::delete_workout))
        .route("/api/history", get(api::history))
        .route("/api/progress", get(api::progress))
        .with_state(api_state)
        .route("/health", get(health::health_check))
        // Session resolution for the auth extractors
        .layer(Extension(auth_provider))
}
