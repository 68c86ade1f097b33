use super::{DateQuery, now};
use crate::errors::{AppError, AppResult};
use crate::models::{WaterEntry, water};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct AddWaterRequest {
    pub amount: u32,
    pub time: Option<NaiveDateTime>,
}

pub async fn get_water(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Json<water::WaterSummary> {
    let entries = state.records.load::<WaterEntry>().await;
    Json(water::summarize(&entries, query.day(), state.config.goals.water_ml))
}

pub async fn add_water(
    State(state): State<AppState>,
    Json(payload): Json<AddWaterRequest>,
) -> AppResult<Json<water::WaterSummary>> {
    if payload.amount == 0 {
        return Err(AppError::bad_request("amount must be greater than zero"));
    }
    if payload.amount > water::MAX_AMOUNT_ML {
        return Err(AppError::bad_request(format!(
            "amount must be at most {} ml",
            water::MAX_AMOUNT_ML
        )));
    }

    let entry = WaterEntry {
        time: payload.time.unwrap_or_else(now),
        amount: payload.amount,
    };
    let day = entry.day();

    let entries = state
        .records
        .mutate(|entries: &mut Vec<WaterEntry>| {
            entries.push(entry);
            Ok(entries.clone())
        })
        .await?;
    info!(%day, amount = payload.amount, "water logged");

    Ok(Json(water::summarize(&entries, day, state.config.goals.water_ml)))
}
