use crate::config::Config;
use crate::errors::AppResult;
use crate::storage::{Record, Store};
use crate::timers::{BreathingSession, Countdown, StretchSession, Ticker};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Load/save boundary shared by every tracker. Mutations run one at a time:
/// load the full list, edit it, write it all back.
#[derive(Clone)]
pub struct Records {
    store: Store,
    writes: Arc<Mutex<()>>,
}

impl Records {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            writes: Arc::new(Mutex::new(())),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub async fn load<T: Record>(&self) -> Vec<T> {
        self.store.load().await
    }

    /// Applies `edit` to the stored list and persists the result. Nothing is
    /// written when `edit` fails.
    pub async fn mutate<T, R, F>(&self, edit: F) -> AppResult<R>
    where
        T: Record,
        F: FnOnce(&mut Vec<T>) -> AppResult<R>,
    {
        let _guard = self.writes.lock().await;
        let mut records = self.store.load::<T>().await;
        let outcome = edit(&mut records)?;
        self.store.save(&records).await?;
        Ok(outcome)
    }
}

pub struct Timers {
    pub breathing: Ticker<BreathingSession>,
    pub exercise: Ticker<Countdown>,
    pub stretch: Ticker<StretchSession>,
}

impl Timers {
    pub fn new(config: &Config) -> Self {
        Self {
            breathing: Ticker::new(config.tick),
            exercise: Ticker::new(config.tick),
            stretch: Ticker::new(config.tick),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub records: Records,
    pub config: Arc<Config>,
    pub timers: Arc<Timers>,
}

impl AppState {
    pub fn new(config: Config, store: Store) -> Self {
        Self {
            records: Records::new(store),
            timers: Arc::new(Timers::new(&config)),
            config: Arc::new(config),
        }
    }

    /// In-memory state for tests.
    pub fn in_memory() -> Self {
        Self::new(Config::default(), Store::memory())
    }
}
