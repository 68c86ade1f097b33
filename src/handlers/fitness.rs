use super::now;
use crate::errors::{AppError, AppResult};
use crate::models::{Routine, fitness::{self, ExerciseDraft}};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CreateRoutineRequest {
    pub name: String,
    pub exercises: Vec<ExerciseDraft>,
}

#[derive(Debug, Serialize)]
pub struct RoutineView {
    #[serde(flatten)]
    pub routine: Routine,
    pub progress: u32,
}

#[derive(Debug, Serialize)]
pub struct HistoryItem {
    pub id: String,
    pub name: String,
    pub last_completed: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub struct FitnessResponse {
    pub routines: Vec<RoutineView>,
    pub history: Vec<HistoryItem>,
}

pub async fn get_routines(State(state): State<AppState>) -> Json<FitnessResponse> {
    let routines = state.records.load::<Routine>().await;
    Json(to_response(routines))
}

pub async fn create_routine(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoutineRequest>,
) -> AppResult<Json<FitnessResponse>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("routine name is required"));
    }
    if payload.exercises.is_empty() {
        return Err(AppError::bad_request("a routine needs at least one exercise"));
    }
    validate_draft(&payload.exercises)?;

    let routine = Routine::new(&payload.name, payload.exercises);
    let id = routine.id.clone();
    let routines = state
        .records
        .mutate(|routines: &mut Vec<Routine>| {
            routines.push(routine);
            Ok(routines.clone())
        })
        .await?;
    info!(%id, "routine created");

    Ok(Json(to_response(routines)))
}

pub async fn toggle_exercise(
    State(state): State<AppState>,
    Path((id, exercise_id)): Path<(String, String)>,
) -> AppResult<Json<FitnessResponse>> {
    edit_routine(&state, &id, |routine| {
        if routine.toggle_exercise(&exercise_id) {
            Ok(())
        } else {
            Err(exercise_not_found(&exercise_id))
        }
    })
    .await
}

pub async fn edit_exercise(
    State(state): State<AppState>,
    Path((id, exercise_id)): Path<(String, String)>,
    Json(draft): Json<ExerciseDraft>,
) -> AppResult<Json<FitnessResponse>> {
    validate_draft(std::slice::from_ref(&draft))?;
    edit_routine(&state, &id, |routine| {
        if routine.edit_exercise(&exercise_id, draft) {
            Ok(())
        } else {
            Err(exercise_not_found(&exercise_id))
        }
    })
    .await
}

pub async fn delete_exercise(
    State(state): State<AppState>,
    Path((id, exercise_id)): Path<(String, String)>,
) -> AppResult<Json<FitnessResponse>> {
    edit_routine(&state, &id, |routine| {
        if routine.delete_exercise(&exercise_id) {
            Ok(())
        } else {
            Err(exercise_not_found(&exercise_id))
        }
    })
    .await
}

pub async fn complete_routine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FitnessResponse>> {
    let at = now();
    let response = edit_routine(&state, &id, |routine| {
        routine.complete(at);
        Ok(())
    })
    .await?;
    info!(%id, "routine completed");
    Ok(response)
}

pub async fn reset_routine(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<FitnessResponse>> {
    edit_routine(&state, &id, |routine| {
        routine.reset();
        Ok(())
    })
    .await
}

async fn edit_routine<F>(state: &AppState, id: &str, edit: F) -> AppResult<Json<FitnessResponse>>
where
    F: FnOnce(&mut Routine) -> AppResult<()>,
{
    let routines = state
        .records
        .mutate(|routines: &mut Vec<Routine>| {
            let routine = fitness::find_routine(routines, id)
                .ok_or_else(|| AppError::not_found(format!("routine {id} not found")))?;
            edit(routine)?;
            Ok(routines.clone())
        })
        .await?;
    Ok(Json(to_response(routines)))
}

fn validate_draft(drafts: &[ExerciseDraft]) -> AppResult<()> {
    if drafts.iter().any(|draft| draft.name.trim().is_empty()) {
        return Err(AppError::bad_request("every exercise needs a name"));
    }
    Ok(())
}

fn exercise_not_found(exercise_id: &str) -> AppError {
    AppError::not_found(format!("exercise {exercise_id} not found"))
}

fn to_response(routines: Vec<Routine>) -> FitnessResponse {
    let history = fitness::history(&routines)
        .into_iter()
        .map(|routine| HistoryItem {
            id: routine.id.clone(),
            name: routine.name.clone(),
            last_completed: routine.last_completed,
        })
        .collect();
    let routines = routines
        .into_iter()
        .map(|routine| RoutineView {
            progress: routine.progress(),
            routine,
        })
        .collect();

    FitnessResponse { routines, history }
}
