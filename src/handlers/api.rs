use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::aggregator::{build_exercise_time_series, ChartData, DayGroup};
use crate::error::{AppError, Result};
use crate::handlers::history::{load_day_groups, HistoryQuery};
use crate::middleware::ApiUser;
use crate::models::{CreateWorkout, SetEntry, WorkoutRecord};
use crate::repositories::WorkoutRepository;

#[derive(Clone)]
pub struct ApiState {
    pub workout_repo: WorkoutRepository,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

pub async fn list_workouts(
    State(state): State<ApiState>,
    ApiUser(auth_user): ApiUser,
) -> Result<Json<Vec<WorkoutRecord>>> {
    let records = state.workout_repo.find_by_user(&auth_user.id).await?;
    Ok(Json(records))
}

pub async fn create_workout(
    State(state): State<ApiState>,
    ApiUser(auth_user): ApiUser,
    Json(body): Json<CreateWorkout>,
) -> Result<Response> {
    if body.sets.is_empty() {
        return Err(AppError::BadRequest(
            "A workout needs at least one set".to_string(),
        ));
    }

    let sets = body
        .sets
        .into_iter()
        .map(SetEntry::validated)
        .collect::<std::result::Result<Vec<_>, String>>()
        .map_err(AppError::Validation)?;

    let record = state.workout_repo.create(&auth_user.id, sets).await?;
    tracing::info!("Created workout {} via API for user {}", record.id, auth_user.id);

    Ok((StatusCode::CREATED, Json(CreatedResponse { id: record.id })).into_response())
}

pub async fn delete_workout(
    State(state): State<ApiState>,
    ApiUser(auth_user): ApiUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    if !state.workout_repo.delete(&id, &auth_user.id).await? {
        return Err(AppError::NotFound("Workout not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn history(
    State(state): State<ApiState>,
    ApiUser(auth_user): ApiUser,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<DayGroup>>> {
    let groups = load_day_groups(&state.workout_repo, &auth_user.id, &query).await?;
    Ok(Json(groups))
}

pub async fn progress(
    State(state): State<ApiState>,
    ApiUser(auth_user): ApiUser,
) -> Result<Json<Vec<ChartData>>> {
    let records = state.workout_repo.find_by_user(&auth_user.id).await?;
    let charts = build_exercise_time_series(&records)
        .values()
        .map(|series| series.chart_data())
        .collect();
    Ok(Json(charts))
}
