//! Countdown sessions driven by a periodic tick.
//!
//! Each session is a plain state machine advanced one second at a time by
//! [`Tick::tick`]. A [`Ticker`] owns at most one running tick task per
//! session kind; starting a new session aborts the previous task.

use serde::{Deserialize, Serialize};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    Finished,
}

pub trait Tick {
    fn tick(&mut self) -> TickOutcome;
}

/// Single countdown used by the exercise timer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Countdown {
    pub routine_id: String,
    pub exercise_id: String,
    pub remaining: u32,
    pub running: bool,
}

impl Countdown {
    pub fn new(routine_id: String, exercise_id: String, seconds: u32) -> Self {
        Self {
            routine_id,
            exercise_id,
            remaining: seconds,
            running: seconds > 0,
        }
    }
}

impl Tick for Countdown {
    fn tick(&mut self) -> TickOutcome {
        if !self.running || self.remaining <= 1 {
            self.remaining = 0;
            self.running = false;
            return TickOutcome::Finished;
        }
        self.remaining -= 1;
        TickOutcome::Running
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Inhale,
    Hold,
    Exhale,
    Rest,
}

impl Phase {
    pub fn next(self) -> Self {
        match self {
            Phase::Inhale => Phase::Hold,
            Phase::Hold => Phase::Exhale,
            Phase::Exhale => Phase::Rest,
            Phase::Rest => Phase::Inhale,
        }
    }

    pub fn instructions(self) -> &'static str {
        match self {
            Phase::Inhale => "Breathe in slowly through your nose",
            Phase::Hold => "Hold your breath",
            Phase::Exhale => "Exhale slowly through your mouth",
            Phase::Rest => "Rest before the next breath",
        }
    }
}

/// Seconds spent in each phase of one breath.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPattern {
    pub inhale: u32,
    pub hold: u32,
    pub exhale: u32,
    pub rest: u32,
}

impl Default for BreathingPattern {
    fn default() -> Self {
        Self {
            inhale: 4,
            hold: 4,
            exhale: 4,
            rest: 2,
        }
    }
}

impl BreathingPattern {
    pub const BOX: Self = Self { inhale: 4, hold: 4, exhale: 4, rest: 4 };
    pub const RELAXING: Self = Self { inhale: 4, hold: 7, exhale: 8, rest: 0 };
    pub const ENERGIZING: Self = Self { inhale: 6, hold: 0, exhale: 2, rest: 0 };

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "box" => Some(Self::BOX),
            "relaxing" | "4-7-8" => Some(Self::RELAXING),
            "energizing" => Some(Self::ENERGIZING),
            _ => None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(2..=8).contains(&self.inhale) {
            return Err("inhale must be between 2 and 8 seconds".into());
        }
        if self.hold > 8 {
            return Err("hold must be at most 8 seconds".into());
        }
        if !(2..=8).contains(&self.exhale) {
            return Err("exhale must be between 2 and 8 seconds".into());
        }
        if self.rest > 4 {
            return Err("rest must be at most 4 seconds".into());
        }
        Ok(())
    }

    pub fn seconds(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.inhale,
            Phase::Hold => self.hold,
            Phase::Exhale => self.exhale,
            Phase::Rest => self.rest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreathingSession {
    pub pattern: BreathingPattern,
    pub phase: Phase,
    pub seconds_left: u32,
    pub total_time: u32,
    pub active: bool,
}

impl BreathingSession {
    pub fn new(pattern: BreathingPattern) -> Self {
        Self {
            pattern,
            phase: Phase::Inhale,
            seconds_left: pattern.inhale,
            total_time: 0,
            active: false,
        }
    }

    /// Begins again from the inhale phase; elapsed time carries over.
    pub fn start(&mut self) {
        self.active = true;
        self.phase = Phase::Inhale;
        self.seconds_left = self.pattern.inhale;
    }

    pub fn pause(&mut self) {
        self.active = false;
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.pattern);
    }
}

impl Tick for BreathingSession {
    fn tick(&mut self) -> TickOutcome {
        if !self.active {
            return TickOutcome::Finished;
        }
        if self.seconds_left <= 1 {
            self.phase = self.phase.next();
            self.seconds_left = self.pattern.seconds(self.phase);
        } else {
            self.seconds_left -= 1;
        }
        self.total_time += 1;
        TickOutcome::Running
    }
}

/// Walks through a stretch sequence one stretch at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StretchSession {
    pub sequence_id: String,
    pub durations: Vec<u32>,
    pub index: usize,
    pub timer: u32,
    pub running: bool,
    pub finished: bool,
}

impl StretchSession {
    /// `None` when the sequence has no stretches.
    pub fn new(sequence_id: String, durations: Vec<u32>) -> Option<Self> {
        let first = *durations.first()?;
        Some(Self {
            sequence_id,
            durations,
            index: 0,
            timer: first,
            running: true,
            finished: false,
        })
    }

    pub fn total(&self) -> u32 {
        crate::stats::saturating_total(&self.durations, |seconds| *seconds)
    }

    /// Share of the whole sequence already performed.
    pub fn progress(&self) -> u32 {
        if self.finished {
            return 100;
        }
        let done = crate::stats::saturating_total(&self.durations[..self.index], |seconds| *seconds);
        let current = self.durations[self.index].saturating_sub(self.timer);
        crate::stats::percentage(f64::from(done.saturating_add(current)), f64::from(self.total()))
    }
}

impl Tick for StretchSession {
    fn tick(&mut self) -> TickOutcome {
        if self.finished {
            return TickOutcome::Finished;
        }
        if self.timer > 1 {
            self.timer -= 1;
            return TickOutcome::Running;
        }

        let next = self.index + 1;
        if next < self.durations.len() {
            self.index = next;
            self.timer = self.durations[next];
            TickOutcome::Running
        } else {
            self.timer = 0;
            self.running = false;
            self.finished = true;
            TickOutcome::Finished
        }
    }
}

/// Owns one session and the task ticking it.
pub struct Ticker<S> {
    session: Arc<Mutex<Option<S>>>,
    task: Mutex<Option<JoinHandle<()>>>,
    period: Duration,
}

impl<S> Ticker<S>
where
    S: Tick + Clone + Send + 'static,
{
    pub fn new(period: Duration) -> Self {
        Self {
            session: Arc::new(Mutex::new(None)),
            task: Mutex::new(None),
            period,
        }
    }

    pub async fn snapshot(&self) -> Option<S> {
        self.session.lock().await.clone()
    }

    /// Installs `session` and ticks it every period until it finishes,
    /// then hands the final state to `on_finish`. Any running task is
    /// cancelled first. The task slot stays locked until the new handle is
    /// stored, so overlapping starts and stops serialize.
    pub async fn start<F, Fut>(&self, session: S, on_finish: F)
    where
        F: FnOnce(S) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut task = self.task.lock().await;
        if let Some(previous) = task.take() {
            previous.abort();
        }
        *self.session.lock().await = Some(session);

        let shared = Arc::clone(&self.session);
        let period = self.period;
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // the first tick completes immediately
            interval.tick().await;

            let last = loop {
                interval.tick().await;
                let mut guard = shared.lock().await;
                let Some(session) = guard.as_mut() else {
                    return;
                };
                if session.tick() == TickOutcome::Finished {
                    break session.clone();
                }
            };

            debug!("timer session finished");
            on_finish(last).await;
        });

        *task = Some(handle);
    }

    /// Cancels the tick task, leaving the session state in place.
    pub async fn stop(&self) {
        if let Some(handle) = self.task.lock().await.take() {
            handle.abort();
        }
    }

    /// Applies `edit` to the current session, if any.
    pub async fn update<R>(&self, edit: impl FnOnce(&mut S) -> R) -> Option<R> {
        self.session.lock().await.as_mut().map(edit)
    }

    /// Cancels the tick task and forgets the session.
    pub async fn clear(&self) {
        self.stop().await;
        *self.session.lock().await = None;
    }
}

impl<S> Drop for Ticker<S> {
    fn drop(&mut self) {
        if let Some(handle) = self.task.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn countdown_stops_at_zero() {
        let mut countdown = Countdown::new("r".into(), "e".into(), 3);
        assert_eq!(countdown.tick(), TickOutcome::Running);
        assert_eq!(countdown.tick(), TickOutcome::Running);
        assert_eq!(countdown.remaining, 1);
        assert_eq!(countdown.tick(), TickOutcome::Finished);
        assert_eq!(countdown.remaining, 0);
        assert!(!countdown.running);
    }

    #[test]
    fn breathing_cycles_through_phases() {
        let mut session = BreathingSession::new(BreathingPattern { inhale: 2, hold: 1, exhale: 2, rest: 0 });
        session.start();

        let mut phases = Vec::new();
        for _ in 0..6 {
            session.tick();
            phases.push((session.phase, session.seconds_left));
        }
        assert_eq!(
            phases,
            vec![
                (Phase::Inhale, 1),
                (Phase::Hold, 1),
                (Phase::Exhale, 2),
                (Phase::Exhale, 1),
                (Phase::Rest, 0),
                (Phase::Inhale, 2),
            ]
        );
        assert_eq!(session.total_time, 6);

        session.pause();
        session.start();
        assert_eq!(session.total_time, 6);
        session.reset();
        assert_eq!(session.total_time, 0);
        assert!(!session.active);
    }

    #[test]
    fn breathing_pattern_limits() {
        assert!(BreathingPattern::RELAXING.validate().is_ok());
        assert!(BreathingPattern::preset("box").unwrap().validate().is_ok());
        assert!(BreathingPattern { inhale: 1, ..BreathingPattern::BOX }.validate().is_err());
        assert!(BreathingPattern { rest: 5, ..BreathingPattern::BOX }.validate().is_err());
        assert!(BreathingPattern::preset("unknown").is_none());
    }

    #[test]
    fn stretch_session_advances_and_finishes() {
        assert!(StretchSession::new("s".into(), Vec::new()).is_none());

        let mut session = StretchSession::new("s".into(), vec![2, 2]).unwrap();
        assert_eq!(session.progress(), 0);
        assert_eq!(session.tick(), TickOutcome::Running);
        assert_eq!(session.progress(), 25);
        assert_eq!(session.tick(), TickOutcome::Running);
        assert_eq!((session.index, session.timer), (1, 2));
        assert_eq!(session.progress(), 50);
        assert_eq!(session.tick(), TickOutcome::Running);
        assert_eq!(session.tick(), TickOutcome::Finished);
        assert!(session.finished);
        assert_eq!(session.progress(), 100);
    }

    #[test]
    fn stretch_session_total_saturates() {
        let mut session = StretchSession::new("s".into(), vec![u32::MAX, u32::MAX]).unwrap();
        assert_eq!(session.total(), u32::MAX);
        session.index = 1;
        assert_eq!(session.progress(), 100);
    }

    #[tokio::test]
    async fn ticker_runs_until_finished() {
        let ticker = Ticker::new(Duration::from_millis(5));
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);

        ticker
            .start(Countdown::new("r".into(), "e".into(), 3), move |last| async move {
                assert_eq!(last.remaining, 0);
                flag.store(true, Ordering::SeqCst);
            })
            .await;

        for _ in 0..100 {
            if done.load(Ordering::SeqCst) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(done.load(Ordering::SeqCst));
        assert_eq!(ticker.snapshot().await.unwrap().remaining, 0);
    }

    #[tokio::test]
    async fn stopped_ticker_does_not_advance() {
        let ticker = Ticker::new(Duration::from_millis(5));
        ticker
            .start(Countdown::new("r".into(), "e".into(), 1000), |_| async {})
            .await;
        tokio::time::sleep(Duration::from_millis(30)).await;
        ticker.stop().await;

        let paused = ticker.snapshot().await.unwrap().remaining;
        assert!(paused < 1000);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(ticker.snapshot().await.unwrap().remaining, paused);

        ticker.clear().await;
        assert!(ticker.snapshot().await.is_none());
    }

    #[tokio::test]
    async fn overlapping_starts_leave_nothing_running_after_stop() {
        let ticker = Arc::new(Ticker::new(Duration::from_millis(5)));
        let guard = ticker.session.lock().await;
        let starts: Vec<_> = (0..2)
            .map(|_| {
                let ticker = Arc::clone(&ticker);
                tokio::spawn(async move {
                    ticker
                        .start(Countdown::new("r".into(), "e".into(), 100_000), |_| async {})
                        .await;
                })
            })
            .collect();
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(guard);
        for start in starts {
            start.await.unwrap();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        ticker.stop().await;
        let paused = ticker.snapshot().await.unwrap().remaining;
        assert!(paused < 100_000);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(ticker.snapshot().await.unwrap().remaining, paused);
    }
}
