use super::{DateQuery, today};
use crate::errors::{AppError, AppResult};
use crate::models::{SleepEntry, non_blank, sleep};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct SaveSleepRequest {
    pub date: Option<NaiveDate>,
    pub bed_time: String,
    pub wake_time: String,
    pub quality: u8,
    pub notes: Option<String>,
}

pub async fn get_sleep(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Json<sleep::SleepSummary> {
    let entries = state.records.load::<SleepEntry>().await;
    Json(sleep::summarize(&entries, query.day()))
}

pub async fn save_sleep(
    State(state): State<AppState>,
    Json(payload): Json<SaveSleepRequest>,
) -> AppResult<Json<sleep::SleepSummary>> {
    let bed = sleep::parse_clock(&payload.bed_time)
        .ok_or_else(|| AppError::bad_request("bed_time must be HH:MM"))?;
    let wake = sleep::parse_clock(&payload.wake_time)
        .ok_or_else(|| AppError::bad_request("wake_time must be HH:MM"))?;
    if !(1..=5).contains(&payload.quality) {
        return Err(AppError::bad_request("quality must be between 1 and 5"));
    }

    let date = payload.date.unwrap_or_else(today);
    let entry = SleepEntry {
        date,
        bed_time: bed.format("%H:%M").to_string(),
        wake_time: wake.format("%H:%M").to_string(),
        duration: sleep::duration_minutes(bed, wake),
        quality: payload.quality,
        notes: non_blank(payload.notes),
    };

    let entries = state
        .records
        .mutate(|entries: &mut Vec<SleepEntry>| {
            let outcome = sleep::save_sleep(entries, entry);
            info!(%date, ?outcome, "sleep saved");
            Ok(entries.clone())
        })
        .await?;

    Ok(Json(sleep::summarize(&entries, date)))
}

pub async fn delete_sleep(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<sleep::SleepSummary>> {
    let entries = state
        .records
        .mutate(|entries: &mut Vec<SleepEntry>| {
            if !sleep::remove_sleep(entries, date) {
                return Err(AppError::not_found(format!("no sleep logged on {date}")));
            }
            Ok(entries.clone())
        })
        .await?;

    Ok(Json(sleep::summarize(&entries, date)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(bed: &str, wake: &str, quality: u8) -> Json<SaveSleepRequest> {
        Json(SaveSleepRequest {
            date: NaiveDate::from_ymd_opt(2025, 5, 5),
            bed_time: bed.into(),
            wake_time: wake.into(),
            quality,
            notes: None,
        })
    }

    #[tokio::test]
    async fn overnight_sleep_is_eight_hours() {
        let state = AppState::in_memory();
        let Json(summary) = save_sleep(State(state), request("23:00", "07:00", 4)).await.unwrap();
        let entry = summary.entry.unwrap();
        assert_eq!(entry.duration, 480);
        assert_eq!(summary.entry_duration.as_deref(), Some("8h 0m"));
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let state = AppState::in_memory();
        assert!(save_sleep(State(state.clone()), request("23:00", "7am", 4)).await.is_err());
        assert!(save_sleep(State(state.clone()), request("23:00", "07:00", 0)).await.is_err());
        assert!(state.records.load::<SleepEntry>().await.is_empty());
    }
}
