use askama::Template;
use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};

use crate::aggregator::{build_exercise_time_series, ExerciseTimeSeries};
use crate::error::{AppError, Result};
use crate::handlers::render;
use crate::middleware::AuthUser;
use crate::models::{DraftSet, NewSetForm, EXERCISES};
use crate::repositories::{DraftRepository, WorkoutRepository};

pub const DEFAULT_WEIGHT: f64 = 135.0;
pub const DEFAULT_REPS: u32 = 8;

#[derive(Clone)]
pub struct LoggerState {
    pub workout_repo: WorkoutRepository,
    pub draft_repo: DraftRepository,
}

#[derive(Template)]
#[template(path = "logger/index.html")]
struct LoggerTemplate {
    user: AuthUser,
    exercises: &'static [&'static str],
    draft: Vec<DraftSet>,
    progress: Vec<ExerciseTimeSeries>,
    default_weight: f64,
    default_reps: u32,
    error: Option<String>,
}

async fn render_logger(
    state: &LoggerState,
    auth_user: AuthUser,
    error: Option<String>,
) -> Result<Response> {
    let draft = state.draft_repo.find_by_user(&auth_user.id).await?;
    let records = state.workout_repo.find_by_user(&auth_user.id).await?;
    let progress = build_exercise_time_series(&records).into_values().collect();

    render(&LoggerTemplate {
        user: auth_user,
        exercises: EXERCISES,
        draft,
        progress,
        default_weight: DEFAULT_WEIGHT,
        default_reps: DEFAULT_REPS,
        error,
    })
}

pub async fn index(State(state): State<LoggerState>, auth_user: AuthUser) -> Result<Response> {
    render_logger(&state, auth_user, None).await
}

pub async fn add_set(
    State(state): State<LoggerState>,
    auth_user: AuthUser,
    Form(form): Form<NewSetForm>,
) -> Result<Response> {
    let set = match form.into_entry() {
        Ok(set) => set,
        Err(message) => return render_logger(&state, auth_user, Some(message)).await,
    };

    state.draft_repo.add(&auth_user.id, &set).await?;

    Ok(Redirect::to("/").into_response())
}

pub async fn remove_set(
    State(state): State<LoggerState>,
    auth_user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response> {
    if !state.draft_repo.remove(id, &auth_user.id).await? {
        return Err(AppError::NotFound("Set not found".to_string()));
    }

    Ok(Redirect::to("/").into_response())
}

pub async fn save(State(state): State<LoggerState>, auth_user: AuthUser) -> Result<Response> {
    match state.workout_repo.create_from_draft(&auth_user.id).await {
        Ok(Some(record)) => {
            tracing::info!(
                "Saved workout {} with {} sets for user {}",
                record.id,
                record.sets.len(),
                auth_user.id
            );
        }
        Ok(None) => {
            tracing::debug!("Nothing to save for user {}", auth_user.id);
        }
        Err(e) => {
            tracing::error!("Save failed for user {}: {}", auth_user.id, e);
            return Err(e);
        }
    }

    Ok(Redirect::to("/").into_response())
}
