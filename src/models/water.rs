use crate::stats::{self, Bucket, WEEKDAY_LABELS};
use crate::storage::Record;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Displayed intake stops growing at this multiple of the goal.
pub const DISPLAY_CAP: f64 = 1.5;
/// Largest single intake accepted, in millilitres.
pub const MAX_AMOUNT_ML: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterEntry {
    pub time: NaiveDateTime,
    /// Millilitres.
    pub amount: u32,
}

impl WaterEntry {
    pub fn day(&self) -> NaiveDate {
        self.time.date()
    }
}

impl Record for WaterEntry {
    const KEY: &'static str = "water";
}

#[derive(Debug, Serialize)]
pub struct WeekdayLitres {
    pub day: &'static str,
    pub litres: f64,
}

#[derive(Debug, Serialize)]
pub struct WaterSummary {
    pub date: NaiveDate,
    pub goal_ml: u32,
    pub total_ml: u32,
    pub displayed_ml: u32,
    pub percent: u32,
    pub entries: Vec<WaterEntry>,
    pub week: Vec<WeekdayLitres>,
}

pub fn total_for_day(entries: &[WaterEntry], date: NaiveDate) -> u32 {
    let today: Vec<&WaterEntry> = entries.iter().filter(|e| e.day() == date).collect();
    stats::saturating_total(&today, |e| e.amount)
}

pub fn summarize(entries: &[WaterEntry], date: NaiveDate, goal_ml: u32) -> WaterSummary {
    let total_ml = total_for_day(entries, date);
    let cap = (f64::from(goal_ml) * DISPLAY_CAP) as u32;

    // every logged entry counts toward its weekday, whatever the week
    let buckets = stats::bucket_by_weekday(entries, |e| e.day(), |e| f64::from(e.amount), Bucket::Sum);

    let displayed_ml = total_ml.min(cap);

    WaterSummary {
        date,
        goal_ml,
        total_ml,
        displayed_ml,
        percent: stats::percentage(f64::from(displayed_ml), f64::from(goal_ml)),
        entries: entries.iter().filter(|e| e.day() == date).cloned().collect(),
        week: WEEKDAY_LABELS
            .into_iter()
            .zip(buckets)
            .map(|(day, ml)| WeekdayLitres {
                day,
                litres: stats::round_to(ml / 1000.0, 1),
            })
            .collect(),
    }
}
