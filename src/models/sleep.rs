use crate::stats::{self, Bucket, WEEKDAY_LABELS};
use crate::storage::Record;
use crate::upsert::{SortOrder, Upserted, upsert_by_day};
use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: i64 = 24 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepEntry {
    pub date: NaiveDate,
    /// `HH:MM`
    pub bed_time: String,
    /// `HH:MM`
    pub wake_time: String,
    /// Minutes, derived from the two clock times.
    pub duration: u32,
    pub quality: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for SleepEntry {
    const KEY: &'static str = "sleep";
}

pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").ok()
}

/// Minutes from bed to wake, wrapping past midnight.
pub fn duration_minutes(bed: NaiveTime, wake: NaiveTime) -> u32 {
    let to_minutes = |t: NaiveTime| i64::from(t.hour() * 60 + t.minute());
    let mut minutes = to_minutes(wake) - to_minutes(bed);
    if minutes < 0 {
        minutes += MINUTES_PER_DAY;
    }
    minutes as u32
}

pub fn save_sleep(entries: &mut Vec<SleepEntry>, entry: SleepEntry) -> Upserted {
    upsert_by_day(entries, entry, |e| e.date, SortOrder::Descending)
}

pub fn remove_sleep(entries: &mut Vec<SleepEntry>, date: NaiveDate) -> bool {
    let before = entries.len();
    entries.retain(|entry| entry.date != date);
    entries.len() != before
}

#[derive(Debug, Serialize)]
pub struct WeekdayHours {
    pub day: &'static str,
    pub hours: f64,
}

#[derive(Debug, Serialize)]
pub struct SleepSummary {
    pub entry: Option<SleepEntry>,
    pub entry_duration: Option<String>,
    pub average_duration: u32,
    pub average_duration_label: String,
    pub average_quality: f64,
    pub week: Vec<WeekdayHours>,
    pub entries: Vec<SleepEntry>,
}

pub fn average_duration(entries: &[SleepEntry]) -> u32 {
    stats::average_field(entries, |e| f64::from(e.duration)).round() as u32
}

pub fn summarize(entries: &[SleepEntry], date: NaiveDate) -> SleepSummary {
    let entry = stats::filter_by_day(entries, date, |e| e.date).cloned();
    let average = average_duration(entries);
    let buckets = stats::bucket_by_weekday(
        entries,
        |e| e.date,
        |e| stats::round_to(f64::from(e.duration) / 60.0, 1),
        Bucket::First,
    );

    SleepSummary {
        entry_duration: entry.as_ref().map(|e| stats::format_duration(e.duration)),
        entry,
        average_duration: average,
        average_duration_label: stats::format_duration(average),
        average_quality: stats::round_to(
            stats::average_field(entries, |e| f64::from(e.quality)),
            1,
        ),
        week: WEEKDAY_LABELS
            .into_iter()
            .zip(buckets)
            .map(|(day, hours)| WeekdayHours { day, hours })
            .collect(),
        entries: entries.to_vec(),
    }
}
