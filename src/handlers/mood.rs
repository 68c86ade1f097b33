use super::{DateQuery, today};
use crate::errors::{AppError, AppResult};
use crate::models::{Mood, MoodEntry, mood, non_blank};
use crate::state::AppState;
use crate::stats;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct SaveMoodRequest {
    pub date: Option<NaiveDate>,
    pub mood: Mood,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MoodOption {
    pub mood: Mood,
    pub emoji: &'static str,
    pub label: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MoodResponse {
    pub date: NaiveDate,
    pub entry: Option<MoodEntry>,
    pub entries: Vec<MoodEntry>,
    pub moods: Vec<MoodOption>,
}

pub async fn get_mood(State(state): State<AppState>, Query(query): Query<DateQuery>) -> Json<MoodResponse> {
    let entries = state.records.load::<MoodEntry>().await;
    Json(to_response(query.day(), entries))
}

pub async fn save_mood(
    State(state): State<AppState>,
    Json(payload): Json<SaveMoodRequest>,
) -> AppResult<Json<MoodResponse>> {
    let date = payload.date.unwrap_or_else(today);
    let entry = MoodEntry {
        date,
        mood: payload.mood,
        note: non_blank(payload.note),
    };

    let entries = state
        .records
        .mutate(|entries: &mut Vec<MoodEntry>| {
            let outcome = mood::save_mood(entries, entry);
            info!(%date, ?outcome, "mood saved");
            Ok(entries.clone())
        })
        .await?;

    Ok(Json(to_response(date, entries)))
}

pub async fn delete_mood(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> AppResult<Json<MoodResponse>> {
    let entries = state
        .records
        .mutate(|entries: &mut Vec<MoodEntry>| {
            if !mood::remove_mood(entries, date) {
                return Err(AppError::not_found(format!("no mood logged on {date}")));
            }
            Ok(entries.clone())
        })
        .await?;

    Ok(Json(to_response(date, entries)))
}

fn to_response(date: NaiveDate, entries: Vec<MoodEntry>) -> MoodResponse {
    MoodResponse {
        date,
        entry: stats::filter_by_day(&entries, date, |e| e.date).cloned(),
        entries,
        moods: Mood::ALL
            .into_iter()
            .map(|mood| MoodOption {
                mood,
                emoji: mood.emoji(),
                label: mood.label(),
                color: mood.color(),
            })
            .collect(),
    }
}
