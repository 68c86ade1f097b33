use super::today;
use crate::errors::{AppError, AppResult};
use crate::models::{WeightEntry, non_blank, weight::{self, WeightUnit}};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct WeightQuery {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub unit: WeightUnit,
}

#[derive(Debug, Deserialize)]
pub struct SaveWeightRequest {
    pub date: Option<NaiveDate>,
    /// Kilograms.
    pub weight: f64,
    pub notes: Option<String>,
}

pub async fn get_weight(
    State(state): State<AppState>,
    Query(query): Query<WeightQuery>,
) -> Json<weight::WeightSummary> {
    let entries = state.records.load::<WeightEntry>().await;
    let date = query.date.unwrap_or_else(today);
    Json(weight::summarize(&entries, date, query.unit))
}

pub async fn save_weight(
    State(state): State<AppState>,
    Json(payload): Json<SaveWeightRequest>,
) -> AppResult<Json<weight::WeightSummary>> {
    if !payload.weight.is_finite() || payload.weight <= 0.0 {
        return Err(AppError::bad_request("weight must be a positive number"));
    }

    let date = payload.date.unwrap_or_else(today);
    let entry = WeightEntry {
        date,
        weight: payload.weight,
        notes: non_blank(payload.notes),
    };

    let entries = state
        .records
        .mutate(|entries: &mut Vec<WeightEntry>| {
            let outcome = weight::save_weight(entries, entry);
            info!(%date, ?outcome, "weight saved");
            Ok(entries.clone())
        })
        .await?;

    Ok(Json(weight::summarize(&entries, date, WeightUnit::Kg)))
}

pub async fn delete_weight(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<weight::WeightSummary>> {
    let entries = state
        .records
        .mutate(|entries: &mut Vec<WeightEntry>| {
            if !weight::remove_weight(entries, date) {
                return Err(AppError::not_found(format!("no weight logged on {date}")));
            }
            Ok(entries.clone())
        })
        .await?;

    Ok(Json(weight::summarize(&entries, date, WeightUnit::Kg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(d: u32, weight: f64) -> Json<SaveWeightRequest> {
        Json(SaveWeightRequest {
            date: NaiveDate::from_ymd_opt(2025, 3, d),
            weight,
            notes: None,
        })
    }

    #[tokio::test]
    async fn entries_stay_in_date_order() {
        let state = AppState::in_memory();
        let Json(_) = save_weight(State(state.clone()), request(20, 80.0)).await.unwrap();
        let Json(_) = save_weight(State(state.clone()), request(5, 82.0)).await.unwrap();
        let Json(summary) = save_weight(State(state.clone()), request(20, 79.5)).await.unwrap();

        let days: Vec<u32> = summary.entries.iter().map(|e| chrono::Datelike::day(&e.date)).collect();
        assert_eq!(days, vec![5, 20]);
        let change = summary.change.unwrap();
        assert_eq!(change.direction, weight::Direction::Loss);
        assert_eq!(change.value, 2.5);
    }

    #[tokio::test]
    async fn pounds_are_converted_for_display() {
        let state = AppState::in_memory();
        let Json(_) = save_weight(State(state.clone()), request(1, 100.0)).await.unwrap();
        let query = WeightQuery {
            date: NaiveDate::from_ymd_opt(2025, 3, 1),
            unit: WeightUnit::Lb,
        };
        let Json(summary) = get_weight(State(state), Query(query)).await;
        assert_eq!(summary.display_weight, Some(220.5));
        assert_eq!(summary.monthly[2].weight, 220.5);
    }

    #[tokio::test]
    async fn non_positive_weight_is_rejected() {
        let state = AppState::in_memory();
        assert!(save_weight(State(state.clone()), request(1, 0.0)).await.is_err());
        assert!(save_weight(State(state.clone()), request(1, f64::NAN)).await.is_err());
        assert!(state.records.load::<WeightEntry>().await.is_empty());
    }
}
