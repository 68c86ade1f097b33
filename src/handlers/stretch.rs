use super::now;
use crate::errors::{AppError, AppResult};
use crate::models::{StretchSequence, stretch::{self, StretchDraft}};
use crate::state::{AppState, Records};
use crate::stats;
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct CreateSequenceRequest {
    pub name: String,
    pub stretches: Vec<StretchDraft>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Serialize)]
pub struct SequenceView {
    #[serde(flatten)]
    pub sequence: StretchSequence,
    pub total_duration: u32,
    pub total_label: String,
}

#[derive(Debug, Serialize)]
pub struct StretchResponse {
    pub sequences: Vec<SequenceView>,
}

pub async fn get_sequences(State(state): State<AppState>) -> Json<StretchResponse> {
    let sequences = state.records.load::<StretchSequence>().await;
    Json(to_response(sequences))
}

pub async fn create_sequence(
    State(state): State<AppState>,
    Json(payload): Json<CreateSequenceRequest>,
) -> AppResult<Json<StretchResponse>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::bad_request("sequence name is required"));
    }
    if payload.stretches.is_empty() {
        return Err(AppError::bad_request("a sequence needs at least one stretch"));
    }
    payload.stretches.iter().try_for_each(validate_draft)?;

    let sequence = StretchSequence::new(&payload.name, payload.stretches);
    let id = sequence.id.clone();
    let sequences = state
        .records
        .mutate(|sequences: &mut Vec<StretchSequence>| {
            sequences.push(sequence);
            Ok(sequences.clone())
        })
        .await?;
    info!(%id, "stretch sequence created");

    Ok(Json(to_response(sequences)))
}

pub async fn edit_stretch(
    State(state): State<AppState>,
    Path((id, stretch_id)): Path<(String, String)>,
    Json(draft): Json<StretchDraft>,
) -> AppResult<Json<StretchResponse>> {
    validate_draft(&draft)?;
    edit_sequence(&state.records, &id, |sequence| {
        if sequence.edit_stretch(&stretch_id, draft) {
            Ok(())
        } else {
            Err(stretch_not_found(&stretch_id))
        }
    })
    .await
    .map(|sequences| Json(to_response(sequences)))
}

pub async fn delete_stretch(
    State(state): State<AppState>,
    Path((id, stretch_id)): Path<(String, String)>,
) -> AppResult<Json<StretchResponse>> {
    edit_sequence(&state.records, &id, |sequence| {
        if sequence.delete_stretch(&stretch_id) {
            Ok(())
        } else {
            Err(stretch_not_found(&stretch_id))
        }
    })
    .await
    .map(|sequences| Json(to_response(sequences)))
}

pub async fn reorder_stretches(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReorderRequest>,
) -> AppResult<Json<StretchResponse>> {
    edit_sequence(&state.records, &id, |sequence| {
        if sequence.reorder(payload.from, payload.to) {
            Ok(())
        } else {
            Err(AppError::bad_request("stretch position out of range"))
        }
    })
    .await
    .map(|sequences| Json(to_response(sequences)))
}

pub async fn complete_sequence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<StretchResponse>> {
    let sequences = mark_performed(&state.records, &id).await?;
    Ok(Json(to_response(sequences)))
}

/// Stamps the sequence as performed now. Also called when a stretch
/// session runs to the end.
pub async fn mark_performed(records: &Records, id: &str) -> AppResult<Vec<StretchSequence>> {
    let at = now();
    let sequences = edit_sequence(records, id, |sequence| {
        sequence.last_performed = Some(at);
        Ok(())
    })
    .await?;
    info!(%id, "stretch sequence performed");
    Ok(sequences)
}

async fn edit_sequence<F>(records: &Records, id: &str, edit: F) -> AppResult<Vec<StretchSequence>>
where
    F: FnOnce(&mut StretchSequence) -> AppResult<()>,
{
    records
        .mutate(|sequences: &mut Vec<StretchSequence>| {
            let sequence = stretch::find_sequence(sequences, id)
                .ok_or_else(|| AppError::not_found(format!("stretch sequence {id} not found")))?;
            edit(sequence)?;
            Ok(sequences.clone())
        })
        .await
}

fn validate_draft(draft: &StretchDraft) -> AppResult<()> {
    if draft.name.trim().is_empty() {
        return Err(AppError::bad_request("every stretch needs a name"));
    }
    if draft.duration == 0 {
        return Err(AppError::bad_request("stretch duration must be greater than zero"));
    }
    if draft.duration > stretch::MAX_DURATION {
        return Err(AppError::bad_request(format!(
            "stretch duration must be at most {} seconds",
            stretch::MAX_DURATION
        )));
    }
    Ok(())
}

fn stretch_not_found(stretch_id: &str) -> AppError {
    AppError::not_found(format!("stretch {stretch_id} not found"))
}

fn to_response(sequences: Vec<StretchSequence>) -> StretchResponse {
    let sequences = sequences
        .into_iter()
        .map(|sequence| {
            let total_duration = sequence.total_duration();
            SequenceView {
                total_label: stats::format_clock(total_duration),
                total_duration,
                sequence,
            }
        })
        .collect();
    StretchResponse { sequences }
}
