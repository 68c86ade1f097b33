use chrono::{Datelike, Duration, NaiveDate};
use std::iter::Sum;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// How records landing in the same chart bucket are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Sum,
    /// Keep the value of the first matching record in list order.
    First,
}

pub fn sum_field<T, N, F>(list: &[T], field: F) -> N
where
    N: Sum<N>,
    F: Fn(&T) -> N,
{
    list.iter().map(field).sum()
}

/// Sum of whole-number fields that stops at `u32::MAX` instead of overflowing.
pub fn saturating_total<T, F>(list: &[T], field: F) -> u32
where
    F: Fn(&T) -> u32,
{
    list.iter().map(field).fold(0, u32::saturating_add)
}

/// Mean of `field` over `list`, 0.0 for an empty list.
pub fn average_field<T, F>(list: &[T], field: F) -> f64
where
    F: Fn(&T) -> f64,
{
    if list.is_empty() {
        return 0.0;
    }
    list.iter().map(field).sum::<f64>() / list.len() as f64
}

pub fn filter_by_day<T, F>(list: &[T], day: NaiveDate, day_of: F) -> Option<&T>
where
    F: Fn(&T) -> NaiveDate,
{
    list.iter().find(|record| day_of(record) == day)
}

/// Seven buckets, Monday first.
pub fn bucket_by_weekday<T, D, V>(list: &[T], day_of: D, value_of: V, mode: Bucket) -> [f64; 7]
where
    D: Fn(&T) -> NaiveDate,
    V: Fn(&T) -> f64,
{
    let mut buckets = [0.0; 7];
    let mut filled = [false; 7];
    for record in list {
        let index = day_of(record).weekday().num_days_from_monday() as usize;
        fill(&mut buckets[index], &mut filled[index], value_of(record), mode);
    }
    buckets
}

/// Twelve buckets, January first.
pub fn bucket_by_month<T, D, V>(list: &[T], day_of: D, value_of: V, mode: Bucket) -> [f64; 12]
where
    D: Fn(&T) -> NaiveDate,
    V: Fn(&T) -> f64,
{
    let mut buckets = [0.0; 12];
    let mut filled = [false; 12];
    for record in list {
        let index = day_of(record).month0() as usize;
        fill(&mut buckets[index], &mut filled[index], value_of(record), mode);
    }
    buckets
}

fn fill(bucket: &mut f64, filled: &mut bool, value: f64, mode: Bucket) {
    match mode {
        Bucket::Sum => *bucket += value,
        Bucket::First if !*filled => *bucket = value,
        Bucket::First => {}
    }
    *filled = true;
}

/// `round(actual / goal * 100)`; a zero goal reports 0.
pub fn percentage(actual: f64, goal: f64) -> u32 {
    if goal <= 0.0 || !actual.is_finite() {
        return 0;
    }
    (actual / goal * 100.0).round().max(0.0) as u32
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn format_duration(minutes: u32) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The Monday-to-Sunday week containing `date`.
pub fn week_of(date: NaiveDate) -> [NaiveDate; 7] {
    let start = week_start(date);
    std::array::from_fn(|offset| start + Duration::days(offset as i64))
}

/// The seven days ending with `today`, oldest first.
pub fn last_7_days(today: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|index| today - Duration::days(6 - index as i64))
}
