use crate::stats::{self, Bucket, MONTH_LABELS};
use crate::storage::Record;
use crate::upsert::{SortOrder, Upserted, upsert_by_day};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const LB_PER_KG: f64 = 2.20462;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub date: NaiveDate,
    /// Kilograms.
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for WeightEntry {
    const KEY: &'static str = "weight";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    pub fn convert(self, kg: f64) -> f64 {
        match self {
            WeightUnit::Kg => kg,
            WeightUnit::Lb => kg * LB_PER_KG,
        }
    }
}

pub fn save_weight(entries: &mut Vec<WeightEntry>, entry: WeightEntry) -> Upserted {
    upsert_by_day(entries, entry, |e| e.date, SortOrder::Ascending)
}

pub fn remove_weight(entries: &mut Vec<WeightEntry>, date: NaiveDate) -> bool {
    let before = entries.len();
    entries.retain(|entry| entry.date != date);
    entries.len() != before
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Gain,
    Loss,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightChange {
    /// Absolute change in kilograms, one decimal.
    pub value: f64,
    pub direction: Direction,
    /// Change relative to the first entry, one decimal.
    pub percentage: f64,
}

/// Change from the first to the last entry; needs at least two entries.
pub fn change(entries: &[WeightEntry]) -> Option<WeightChange> {
    let (first, last) = match entries {
        [first, .., last] => (first.weight, last.weight),
        _ => return None,
    };
    let delta = last - first;
    let percentage = if first > 0.0 {
        stats::round_to(delta.abs() / first * 100.0, 1)
    } else {
        0.0
    };

    Some(WeightChange {
        value: stats::round_to(delta.abs(), 1),
        direction: if delta < 0.0 { Direction::Loss } else { Direction::Gain },
        percentage,
    })
}

#[derive(Debug, Serialize)]
pub struct MonthWeight {
    pub month: &'static str,
    pub weight: f64,
}

/// Latest recorded weight per month of `year`, 0 where nothing was logged.
pub fn monthly(entries: &[WeightEntry], year: i32, unit: WeightUnit) -> Vec<MonthWeight> {
    let mut in_year: Vec<&WeightEntry> = entries.iter().filter(|e| e.date.year() == year).collect();
    in_year.sort_by(|a, b| b.date.cmp(&a.date));
    let buckets = stats::bucket_by_month(&in_year, |e| e.date, |e| unit.convert(e.weight), Bucket::First);

    MONTH_LABELS
        .into_iter()
        .zip(buckets)
        .map(|(month, weight)| MonthWeight {
            month,
            weight: stats::round_to(weight, 1),
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct WeightSummary {
    pub unit: WeightUnit,
    pub entry: Option<WeightEntry>,
    pub display_weight: Option<f64>,
    pub change: Option<WeightChange>,
    pub monthly: Vec<MonthWeight>,
    pub entries: Vec<WeightEntry>,
}

pub fn summarize(entries: &[WeightEntry], date: NaiveDate, unit: WeightUnit) -> WeightSummary {
    let entry = stats::filter_by_day(entries, date, |e| e.date).cloned();
    WeightSummary {
        unit,
        display_weight: entry.as_ref().map(|e| stats::round_to(unit.convert(e.weight), 1)),
        entry,
        change: change(entries),
        monthly: monthly(entries, date.year(), unit),
        entries: entries.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(m: u32, d: u32, weight: f64) -> WeightEntry {
        WeightEntry {
            date: NaiveDate::from_ymd_opt(2025, m, d).unwrap(),
            weight,
            notes: None,
        }
    }

    #[test]
    fn entries_stay_sorted_ascending() {
        let mut entries = Vec::new();
        save_weight(&mut entries, entry(5, 10, 71.0));
        save_weight(&mut entries, entry(5, 1, 72.0));
        save_weight(&mut entries, entry(5, 5, 71.5));
        let days: Vec<u32> = entries.iter().map(|e| e.date.day()).collect();
        assert_eq!(days, vec![1, 5, 10]);

        assert_eq!(save_weight(&mut entries, entry(5, 5, 70.9)), Upserted::Replaced(1));
        assert_eq!(entries.len(), 3);
    }

    #[test]
    fn change_needs_two_entries() {
        assert!(change(&[entry(5, 1, 80.0)]).is_none());

        let loss = change(&[entry(5, 1, 80.0), entry(5, 9, 78.0)]).unwrap();
        assert_eq!(loss.direction, Direction::Loss);
        assert_eq!(loss.value, 2.0);
        assert_eq!(loss.percentage, 2.5);
    }

    #[test]
    fn monthly_takes_latest_in_month() {
        let entries = vec![entry(1, 3, 80.0), entry(1, 28, 79.0), entry(3, 2, 78.0)];
        let chart = monthly(&entries, 2025, WeightUnit::Kg);
        assert_eq!(chart.len(), 12);
        assert_eq!(chart[0].weight, 79.0);
        assert_eq!(chart[1].weight, 0.0);
        assert_eq!(chart[2].weight, 78.0);
        assert!(monthly(&entries, 2024, WeightUnit::Kg).iter().all(|m| m.weight == 0.0));
    }

    #[test]
    fn pounds_conversion() {
        let summary = summarize(&[entry(5, 1, 70.0)], NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(), WeightUnit::Lb);
        assert_eq!(summary.display_weight, Some(154.3));
    }
}
