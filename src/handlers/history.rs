use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::aggregator::{filter_records, group_by_day, DayGroup, RecordFilter};
use crate::error::{AppError, Result};
use crate::handlers::render;
use crate::middleware::AuthUser;
use crate::repositories::{DraftRepository, WorkoutRepository};

#[derive(Clone)]
pub struct HistoryState {
    pub workout_repo: WorkoutRepository,
    pub draft_repo: DraftRepository,
}

#[derive(Template)]
#[template(path = "history/index.html")]
struct HistoryTemplate {
    user: AuthUser,
    groups: Vec<DayGroup>,
    exercise: String,
    date_from: String,
    date_to: String,
}

/// Raw filter input, echoed back into the form.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub exercise: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl HistoryQuery {
    pub fn to_filter(&self) -> RecordFilter {
        RecordFilter::parse(
            self.exercise.as_deref(),
            self.from.as_deref(),
            self.to.as_deref(),
        )
    }
}

/// Load the user's records and shape them into day groups.
pub(crate) async fn load_day_groups(
    workout_repo: &WorkoutRepository,
    user_id: &str,
    query: &HistoryQuery,
) -> Result<Vec<DayGroup>> {
    let records = workout_repo.find_by_user(user_id).await?;
    Ok(group_by_day(filter_records(records, &query.to_filter())))
}

pub async fn index(
    State(state): State<HistoryState>,
    auth_user: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Response> {
    let groups = load_day_groups(&state.workout_repo, &auth_user.id, &query).await?;

    render(&HistoryTemplate {
        user: auth_user,
        groups,
        exercise: query.exercise.unwrap_or_default(),
        date_from: query.from.unwrap_or_default(),
        date_to: query.to.unwrap_or_default(),
    })
}

pub async fn delete(
    State(state): State<HistoryState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    if !state.workout_repo.delete(&id, &auth_user.id).await? {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }
    tracing::info!("Deleted workout {} for user {}", id, auth_user.id);

    Ok(Redirect::to("/workouts").into_response())
}

/// Copy a saved workout's sets into the logger so saving creates a new record.
pub async fn duplicate(
    State(state): State<HistoryState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let record = state
        .workout_repo
        .find_by_id(&id, &auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Workout not found".to_string()))?;

    state.draft_repo.append(&auth_user.id, &record.sets).await?;

    Ok(Redirect::to("/").into_response())
}
