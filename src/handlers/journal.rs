use super::today;
use crate::errors::{AppError, AppResult};
use crate::models::{JournalEntry, journal, new_id};
use crate::state::AppState;
use crate::stats;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Default, Deserialize)]
pub struct JournalQuery {
    pub date: Option<NaiveDate>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveEntryRequest {
    pub date: Option<NaiveDate>,
    pub content: String,
    pub mood: u8,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JournalResponse {
    pub date: NaiveDate,
    pub entry: Option<JournalEntry>,
    pub entries: Vec<JournalEntry>,
    pub insights: journal::JournalInsights,
}

pub async fn get_journal(
    State(state): State<AppState>,
    Query(query): Query<JournalQuery>,
) -> Json<JournalResponse> {
    let entries = state.records.load::<JournalEntry>().await;
    let date = query.date.unwrap_or_else(today);
    Json(to_response(&entries, date, query.q.as_deref().unwrap_or("")))
}

pub async fn save_entry(
    State(state): State<AppState>,
    Json(payload): Json<SaveEntryRequest>,
) -> AppResult<Json<JournalResponse>> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(AppError::bad_request("journal content is required"));
    }
    if !journal::MOOD_SCALE.contains(&payload.mood) {
        return Err(AppError::bad_request("mood must be between 1 and 5"));
    }

    let date = payload.date.unwrap_or_else(today);
    let entry = JournalEntry {
        id: new_id(),
        date,
        content: content.to_string(),
        mood: payload.mood,
        tags: journal::normalize_tags(payload.tags),
    };

    let entries = state
        .records
        .mutate(|entries: &mut Vec<JournalEntry>| {
            let outcome = journal::save_entry(entries, entry);
            info!(%date, ?outcome, "journal entry saved");
            Ok(entries.clone())
        })
        .await?;

    Ok(Json(to_response(&entries, date, "")))
}

pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<JournalResponse>> {
    let entries = state
        .records
        .mutate(|entries: &mut Vec<JournalEntry>| {
            if !journal::delete_entry(entries, &id) {
                return Err(AppError::not_found(format!("journal entry {id} not found")));
            }
            Ok(entries.clone())
        })
        .await?;

    Ok(Json(to_response(&entries, today(), "")))
}

fn to_response(entries: &[JournalEntry], date: NaiveDate, query: &str) -> JournalResponse {
    JournalResponse {
        date,
        entry: stats::filter_by_day(entries, date, |e| e.date).cloned(),
        entries: journal::search(entries, query).into_iter().cloned().collect(),
        insights: journal::insights(entries, date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: &str, mood: u8, tags: &[&str]) -> Json<SaveEntryRequest> {
        Json(SaveEntryRequest {
            date: NaiveDate::from_ymd_opt(2025, 5, 7),
            content: content.into(),
            mood,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        })
    }

    #[tokio::test]
    async fn same_day_save_replaces_entry() {
        let state = AppState::in_memory();
        let Json(first) = save_entry(State(state.clone()), request("first draft", 2, &["work"])).await.unwrap();
        assert_eq!(first.entries.len(), 1);
        let Json(response) = save_entry(State(state.clone()), request("rewritten", 4, &[" Work ", "rest"]))
            .await
            .unwrap();

        assert_eq!(response.entries.len(), 1);
        let entry = response.entry.unwrap();
        assert_eq!(entry.content, "rewritten");
        assert_eq!(entry.tags, vec!["work", "rest"]);
        assert_eq!(response.insights.mood_distribution, [0, 0, 0, 1, 0]);
    }

    #[tokio::test]
    async fn search_filters_entries() {
        let state = AppState::in_memory();
        let Json(_) = save_entry(State(state.clone()), request("long walk by the river", 5, &["outdoors"])).await.unwrap();

        let query = |q: &str| {
            Query(JournalQuery {
                date: NaiveDate::from_ymd_opt(2025, 5, 7),
                q: Some(q.into()),
            })
        };
        let Json(hit) = get_journal(State(state.clone()), query("RIVER")).await;
        assert_eq!(hit.entries.len(), 1);
        let Json(miss) = get_journal(State(state), query("office")).await;
        assert!(miss.entries.is_empty());
        assert!(miss.entry.is_some());
    }

    #[tokio::test]
    async fn invalid_entries_are_rejected() {
        let state = AppState::in_memory();
        assert!(save_entry(State(state.clone()), request("   ", 3, &[])).await.is_err());
        assert!(save_entry(State(state.clone()), request("ok", 6, &[])).await.is_err());
        assert!(state.records.load::<JournalEntry>().await.is_empty());
    }
}
