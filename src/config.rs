use std::{env, path::PathBuf, str::FromStr, time::Duration};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_DIR: &str = "data";

/// Daily targets the trackers and the dashboard measure progress against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Goals {
    pub water_ml: u32,
    pub calories: u32,
    pub sleep_minutes: u32,
}

impl Default for Goals {
    fn default() -> Self {
        Self {
            water_ml: 2500,
            calories: 2200,
            sleep_minutes: 480,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub goals: Goals,
    pub tick: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            goals: Goals::default(),
            tick: Duration::from_secs(1),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_var("PORT").unwrap_or(defaults.port),
            data_dir: env::var("WELLNESS_DATA_DIR")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            goals: Goals {
                water_ml: parse_var("WATER_GOAL_ML").unwrap_or(defaults.goals.water_ml),
                calories: parse_var("CALORIE_GOAL").unwrap_or(defaults.goals.calories),
                sleep_minutes: parse_var("SLEEP_GOAL_MINUTES")
                    .unwrap_or(defaults.goals.sleep_minutes),
            },
            tick: parse_var::<u64>("TICK_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.trim().parse::<T>().ok())
}
