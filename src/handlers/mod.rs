pub mod dashboard;
pub mod fitness;
pub mod journal;
pub mod meal;
pub mod mood;
pub mod sleep;
pub mod stretch;
pub mod timers;
pub mod water;
pub mod weight;

use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
    pub date: Option<NaiveDate>,
}

impl DateQuery {
    pub fn day(&self) -> NaiveDate {
        self.date.unwrap_or_else(today)
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
