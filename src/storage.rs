use crate::errors::AppResult;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tokio::fs;
use tracing::{debug, error, warn};

/// A record kind persisted as one JSON array under a fixed key.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    const KEY: &'static str;

    /// Records used when the key has never been written.
    fn seed() -> Vec<Self> {
        Vec::new()
    }
}

#[derive(Clone, Debug)]
pub enum Backend {
    Dir(PathBuf),
    Memory(Arc<Mutex<HashMap<String, String>>>),
}

#[derive(Clone, Debug)]
pub struct Store {
    backend: Backend,
}

impl Store {
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Dir(path.into()),
        }
    }

    pub fn memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::default()),
        }
    }

    /// Reads the whole array for `T::KEY`. Never fails: a missing key yields
    /// the seed records and unreadable or malformed data yields an empty list.
    pub async fn load<T: Record>(&self) -> Vec<T> {
        let Some(raw) = self.read_raw(T::KEY).await else {
            return T::seed();
        };

        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                error!("failed to parse {} data: {err}", T::KEY);
                Vec::new()
            }
        }
    }

    /// Replaces the whole array for `T::KEY`.
    pub async fn save<T: Record>(&self, records: &[T]) -> AppResult<()> {
        let payload = serde_json::to_string_pretty(records)?;
        self.write_raw(T::KEY, payload).await?;
        debug!("persisted {} {} records", records.len(), T::KEY);
        Ok(())
    }

    pub async fn read_raw(&self, key: &str) -> Option<String> {
        match &self.backend {
            Backend::Dir(dir) => {
                let path = key_path(dir, key);
                match fs::read_to_string(&path).await {
                    Ok(raw) => Some(raw),
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
                    Err(err) => {
                        error!("failed to read {}: {err}", path.display());
                        Some(String::new())
                    }
                }
            }
            Backend::Memory(map) => match map.lock() {
                Ok(map) => map.get(key).cloned(),
                Err(_) => {
                    warn!("memory store poisoned while reading {key}");
                    Some(String::new())
                }
            },
        }
    }

    pub async fn write_raw(&self, key: &str, payload: String) -> AppResult<()> {
        match &self.backend {
            Backend::Dir(dir) => {
                fs::create_dir_all(dir).await?;
                fs::write(key_path(dir, key), payload).await?;
            }
            Backend::Memory(map) => {
                let mut map = map.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                map.insert(key.to_string(), payload);
            }
        }
        Ok(())
    }
}

fn key_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{key}.json"))
}
