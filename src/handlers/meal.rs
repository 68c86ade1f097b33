use super::{DateQuery, now, today};
use crate::errors::{AppError, AppResult};
use crate::models::{DailyMeals, Meal, meal, new_id, non_blank, sleep::parse_clock};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct AddMealRequest {
    pub date: Option<NaiveDate>,
    pub name: String,
    pub time: Option<String>,
    pub calories: u32,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub notes: Option<String>,
    pub day_notes: Option<String>,
}

pub async fn get_meals(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Json<meal::MealSummary> {
    let days = state.records.load::<DailyMeals>().await;
    Json(meal::summarize(&days, query.day(), state.config.goals.calories))
}

pub async fn add_meal(
    State(state): State<AppState>,
    Json(payload): Json<AddMealRequest>,
) -> AppResult<Json<meal::MealSummary>> {
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("meal name is required"));
    }
    if payload.calories > meal::MAX_CALORIES {
        return Err(AppError::bad_request(format!(
            "calories must be at most {}",
            meal::MAX_CALORIES
        )));
    }
    let time = match payload.time.as_deref() {
        Some(raw) => parse_clock(raw)
            .ok_or_else(|| AppError::bad_request("time must be HH:MM"))?
            .format("%H:%M")
            .to_string(),
        None => meal::default_meal_time(now()),
    };

    let date = payload.date.unwrap_or_else(today);
    let entry = Meal {
        id: new_id(),
        name: name.to_string(),
        time,
        calories: payload.calories,
        protein: grams(payload.protein),
        carbs: grams(payload.carbs),
        fat: grams(payload.fat),
        notes: non_blank(payload.notes),
    };
    let day_notes = non_blank(payload.day_notes);

    let days = state
        .records
        .mutate(|days: &mut Vec<DailyMeals>| {
            meal::add_meal(days, date, entry, day_notes);
            Ok(days.clone())
        })
        .await?;
    info!(%date, calories = payload.calories, "meal added");

    Ok(Json(meal::summarize(&days, date, state.config.goals.calories)))
}

pub async fn remove_meal(
    State(state): State<AppState>,
    Path((date, meal_id)): Path<(NaiveDate, String)>,
) -> AppResult<Json<meal::MealSummary>> {
    let days = state
        .records
        .mutate(|days: &mut Vec<DailyMeals>| {
            if !meal::remove_meal(days, date, &meal_id) {
                return Err(AppError::not_found(format!("meal {meal_id} not found on {date}")));
            }
            Ok(days.clone())
        })
        .await?;

    Ok(Json(meal::summarize(&days, date, state.config.goals.calories)))
}

/// Missing or nonsensical macro values count as zero.
fn grams(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite() && *v >= 0.0).unwrap_or(0.0)
}
