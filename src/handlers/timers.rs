use super::stretch::mark_performed;
use crate::errors::{AppError, AppResult};
use crate::models::{Routine, StretchSequence};
use crate::state::{AppState, Records};
use crate::stats::format_clock;
use crate::timers::{BreathingPattern, BreathingSession, Countdown, StretchSession};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::{future::Future, pin::Pin};
use tracing::{info, warn};

type FinishHook = Pin<Box<dyn Future<Output = ()> + Send>>;

#[derive(Debug, Default, Deserialize)]
pub struct StartBreathingRequest {
    pub pattern: Option<BreathingPattern>,
    pub preset: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BreathingView {
    #[serde(flatten)]
    pub session: BreathingSession,
    pub instructions: &'static str,
    pub elapsed: String,
}

#[derive(Debug, Deserialize)]
pub struct StartExerciseRequest {
    pub routine_id: String,
    pub exercise_id: String,
}

#[derive(Debug, Serialize)]
pub struct CountdownView {
    #[serde(flatten)]
    pub countdown: Countdown,
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct StartStretchRequest {
    pub sequence_id: String,
}

#[derive(Debug, Serialize)]
pub struct StretchView {
    #[serde(flatten)]
    pub session: StretchSession,
    pub progress: u32,
    pub label: String,
}

// breathing

pub async fn get_breathing(State(state): State<AppState>) -> Json<BreathingView> {
    Json(breathing_view(&state).await)
}

pub async fn start_breathing(
    State(state): State<AppState>,
    payload: Option<Json<StartBreathingRequest>>,
) -> AppResult<Json<BreathingView>> {
    let payload = payload.map(|Json(payload)| payload).unwrap_or_default();
    let pattern = match (payload.preset.as_deref(), payload.pattern) {
        (Some(name), _) => Some(
            BreathingPattern::preset(name)
                .ok_or_else(|| AppError::bad_request(format!("unknown breathing preset {name}")))?,
        ),
        (None, Some(pattern)) => {
            pattern.validate().map_err(AppError::bad_request)?;
            Some(pattern)
        }
        (None, None) => None,
    };

    let ticker = &state.timers.breathing;
    ticker.stop().await;
    let mut session = match (pattern, ticker.snapshot().await) {
        (Some(pattern), _) => BreathingSession::new(pattern),
        (None, Some(current)) => current,
        (None, None) => BreathingSession::new(BreathingPattern::default()),
    };
    session.start();
    info!(pattern = ?session.pattern, "breathing started");
    ticker.start(session, |_| async {}).await;

    Ok(Json(breathing_view(&state).await))
}

pub async fn pause_breathing(State(state): State<AppState>) -> Json<BreathingView> {
    let ticker = &state.timers.breathing;
    ticker.stop().await;
    ticker.update(BreathingSession::pause).await;
    Json(breathing_view(&state).await)
}

pub async fn reset_breathing(State(state): State<AppState>) -> Json<BreathingView> {
    let ticker = &state.timers.breathing;
    ticker.stop().await;
    ticker.update(BreathingSession::reset).await;
    Json(breathing_view(&state).await)
}

async fn breathing_view(state: &AppState) -> BreathingView {
    let session = state
        .timers
        .breathing
        .snapshot()
        .await
        .unwrap_or_else(|| BreathingSession::new(BreathingPattern::default()));
    BreathingView {
        instructions: session.phase.instructions(),
        elapsed: format_clock(session.total_time),
        session,
    }
}

// exercise countdown

pub async fn get_exercise(State(state): State<AppState>) -> Json<Option<CountdownView>> {
    Json(countdown_view(&state).await)
}

pub async fn start_exercise(
    State(state): State<AppState>,
    Json(payload): Json<StartExerciseRequest>,
) -> AppResult<Json<Option<CountdownView>>> {
    let routines = state.records.load::<Routine>().await;
    let exercise = routines
        .iter()
        .find(|routine| routine.id == payload.routine_id)
        .ok_or_else(|| AppError::not_found(format!("routine {} not found", payload.routine_id)))?
        .exercises
        .iter()
        .find(|exercise| exercise.id == payload.exercise_id)
        .ok_or_else(|| AppError::not_found(format!("exercise {} not found", payload.exercise_id)))?;
    if exercise.duration == 0 {
        return Err(AppError::bad_request("exercise has no timed duration"));
    }

    let countdown = Countdown::new(payload.routine_id, payload.exercise_id, exercise.duration);
    info!(exercise = %exercise.name, seconds = exercise.duration, "exercise timer started");
    state.timers.exercise.start(countdown, |_| async {}).await;

    Ok(Json(countdown_view(&state).await))
}

pub async fn stop_exercise(State(state): State<AppState>) -> Json<Option<CountdownView>> {
    state.timers.exercise.clear().await;
    Json(None)
}

async fn countdown_view(state: &AppState) -> Option<CountdownView> {
    let countdown = state.timers.exercise.snapshot().await?;
    Some(CountdownView {
        label: format_clock(countdown.remaining),
        countdown,
    })
}

// stretch sequence

pub async fn get_stretch(State(state): State<AppState>) -> Json<Option<StretchView>> {
    Json(stretch_view(&state).await)
}

pub async fn start_stretch(
    State(state): State<AppState>,
    Json(payload): Json<StartStretchRequest>,
) -> AppResult<Json<Option<StretchView>>> {
    let sequences = state.records.load::<StretchSequence>().await;
    let sequence = sequences
        .iter()
        .find(|sequence| sequence.id == payload.sequence_id)
        .ok_or_else(|| AppError::not_found(format!("stretch sequence {} not found", payload.sequence_id)))?;
    let session = StretchSession::new(sequence.id.clone(), sequence.durations())
        .ok_or_else(|| AppError::bad_request("stretch sequence has no stretches"))?;

    info!(sequence = %sequence.name, "stretch session started");
    state
        .timers
        .stretch
        .start(session, on_stretch_finished(state.records.clone()))
        .await;

    Ok(Json(stretch_view(&state).await))
}

pub async fn pause_stretch(State(state): State<AppState>) -> AppResult<Json<Option<StretchView>>> {
    let ticker = &state.timers.stretch;
    ticker.stop().await;
    ticker
        .update(|session| session.running = false)
        .await
        .ok_or_else(no_stretch_session)?;
    Ok(Json(stretch_view(&state).await))
}

pub async fn resume_stretch(State(state): State<AppState>) -> AppResult<Json<Option<StretchView>>> {
    let ticker = &state.timers.stretch;
    let mut session = ticker.snapshot().await.ok_or_else(no_stretch_session)?;
    if session.finished {
        return Err(AppError::bad_request("stretch session already finished"));
    }
    session.running = true;
    ticker.start(session, on_stretch_finished(state.records.clone())).await;
    Ok(Json(stretch_view(&state).await))
}

pub async fn stop_stretch(State(state): State<AppState>) -> Json<Option<StretchView>> {
    state.timers.stretch.clear().await;
    Json(None)
}

/// Records the sequence as performed once its session runs to the end.
fn on_stretch_finished(records: Records) -> impl FnOnce(StretchSession) -> FinishHook + Send + 'static {
    move |session| -> FinishHook {
        Box::pin(async move {
            if let Err(err) = mark_performed(&records, &session.sequence_id).await {
                warn!(sequence = %session.sequence_id, error = %err.message, "could not record stretch session");
            }
        })
    }
}

fn no_stretch_session() -> AppError {
    AppError::not_found("no stretch session")
}

async fn stretch_view(state: &AppState) -> Option<StretchView> {
    let session = state.timers.stretch.snapshot().await?;
    Some(StretchView {
        progress: session.progress(),
        label: format_clock(session.timer),
        session,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::stretch::StretchDraft;
    use crate::storage::Store;
    use std::time::Duration;

    fn short_sequence() -> StretchSequence {
        let draft = |name: &str| StretchDraft { name: name.into(), duration: 2, description: None };
        StretchSequence::new("Quick", vec![draft("Reach"), draft("Twist")])
    }

    fn fast_state() -> AppState {
        let config = Config {
            tick: Duration::from_millis(5),
            ..Config::default()
        };
        AppState::new(config, Store::memory())
    }

    #[tokio::test]
    async fn breathing_rejects_bad_patterns() {
        let state = AppState::in_memory();
        let preset = StartBreathingRequest { pattern: None, preset: Some("panic".into()) };
        assert!(start_breathing(State(state.clone()), Some(Json(preset))).await.is_err());

        let pattern = BreathingPattern { inhale: 9, ..BreathingPattern::BOX };
        let custom = StartBreathingRequest { pattern: Some(pattern), preset: None };
        assert!(start_breathing(State(state.clone()), Some(Json(custom))).await.is_err());

        let Json(view) = get_breathing(State(state)).await;
        assert!(!view.session.active);
        assert_eq!(view.session.pattern, BreathingPattern::default());
    }

    #[tokio::test]
    async fn breathing_start_pause_reset() {
        let state = AppState::in_memory();
        let request = StartBreathingRequest { pattern: None, preset: Some("4-7-8".into()) };
        let Json(view) = start_breathing(State(state.clone()), Some(Json(request))).await.unwrap();
        assert!(view.session.active);
        assert_eq!(view.session.pattern, BreathingPattern::RELAXING);
        assert_eq!(view.instructions, "Breathe in slowly through your nose");

        let Json(paused) = pause_breathing(State(state.clone())).await;
        assert!(!paused.session.active);

        let Json(reset) = reset_breathing(State(state)).await;
        assert_eq!(reset.session.total_time, 0);
        assert_eq!(reset.elapsed, "0:00");
        assert_eq!(reset.session.pattern, BreathingPattern::RELAXING);
    }

    #[tokio::test]
    async fn rep_based_exercise_has_no_timer() {
        let state = AppState::in_memory();
        let request = StartExerciseRequest { routine_id: "1".into(), exercise_id: "1-1".into() };
        let err = start_exercise(State(state), Json(request)).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn exercise_countdown_starts_and_stops() {
        let state = AppState::in_memory();
        let request = StartExerciseRequest { routine_id: "1".into(), exercise_id: "1-3".into() };
        let Json(view) = start_exercise(State(state.clone()), Json(request)).await.unwrap();
        let view = view.unwrap();
        assert_eq!(view.countdown.remaining, 60);
        assert_eq!(view.label, "1:00");

        let Json(stopped) = stop_exercise(State(state.clone())).await;
        assert!(stopped.is_none());
        assert!(get_exercise(State(state)).await.0.is_none());
    }

    #[tokio::test]
    async fn finished_stretch_session_is_recorded() {
        let state = fast_state();
        let sequence = short_sequence();
        let id = sequence.id.clone();
        state
            .records
            .mutate(|sequences: &mut Vec<StretchSequence>| {
                sequences.push(sequence);
                Ok(())
            })
            .await
            .unwrap();

        let Json(started) = start_stretch(State(state.clone()), Json(StartStretchRequest { sequence_id: id.clone() }))
            .await
            .unwrap();
        assert!(started.is_some_and(|view| view.session.durations == vec![2, 2]));

        let mut performed = false;
        for _ in 0..200 {
            let stored = state.records.load::<StretchSequence>().await;
            if stored.iter().any(|s| s.id == id && s.last_performed.is_some()) {
                performed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(performed);

        let view = get_stretch(State(state)).await.0.unwrap();
        assert!(view.session.finished);
        assert_eq!(view.progress, 100);
    }

    #[tokio::test]
    async fn pause_without_session_is_not_found() {
        let state = AppState::in_memory();
        let err = pause_stretch(State(state)).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }
}
