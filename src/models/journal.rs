use crate::stats;
use crate::storage::Record;
use crate::upsert::{SortOrder, Upserted, upsert_by_day};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MOOD_SCALE: std::ops::RangeInclusive<u8> = 1..=5;
const TOP_TAGS: usize = 5;
const TAGS_WITH_MOOD: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub date: NaiveDate,
    pub content: String,
    /// 1 (low) to 5 (high).
    pub mood: u8,
    pub tags: Vec<String>,
}

impl Record for JournalEntry {
    const KEY: &'static str = "mental";
}

/// Trimmed, lowercased, deduplicated tags in first-seen order.
pub fn normalize_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

pub fn save_entry(entries: &mut Vec<JournalEntry>, entry: JournalEntry) -> Upserted {
    upsert_by_day(entries, entry, |e| e.date, SortOrder::Descending)
}

pub fn delete_entry(entries: &mut Vec<JournalEntry>, id: &str) -> bool {
    let before = entries.len();
    entries.retain(|entry| entry.id != id);
    entries.len() != before
}

/// Case-insensitive match on content or any tag; a blank query matches all.
pub fn search<'a>(entries: &'a [JournalEntry], query: &str) -> Vec<&'a JournalEntry> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return entries.iter().collect();
    }
    entries
        .iter()
        .filter(|entry| {
            entry.content.to_lowercase().contains(&query)
                || entry.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodTrend {
    MostlyHappy,
    MostlyLow,
    Balanced,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagMood {
    pub tag: String,
    pub average_mood: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub has_entry: bool,
}

#[derive(Debug, Serialize)]
pub struct JournalInsights {
    pub mood_distribution: [usize; 5],
    pub trend: MoodTrend,
    pub top_tags: Vec<TagCount>,
    pub mood_by_tag: Vec<TagMood>,
    pub week: Vec<WeekDay>,
}

pub fn mood_distribution(entries: &[JournalEntry]) -> [usize; 5] {
    let mut distribution = [0; 5];
    for entry in entries.iter().filter(|e| MOOD_SCALE.contains(&e.mood)) {
        distribution[usize::from(entry.mood - 1)] += 1;
    }
    distribution
}

/// The first bucket holding the maximum count decides the trend.
pub fn trend(distribution: &[usize; 5]) -> MoodTrend {
    let max = distribution.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return MoodTrend::Balanced;
    }
    match distribution.iter().position(|count| *count == max) {
        Some(4) => MoodTrend::MostlyHappy,
        Some(0) => MoodTrend::MostlyLow,
        _ => MoodTrend::Balanced,
    }
}

pub fn top_tags(entries: &[JournalEntry]) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    for tag in entries.iter().flat_map(|entry| entry.tags.iter()) {
        match counts.iter_mut().find(|count| &count.tag == tag) {
            Some(count) => count.count += 1,
            None => counts.push(TagCount {
                tag: tag.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_TAGS);
    counts
}

pub fn insights(entries: &[JournalEntry], date: NaiveDate) -> JournalInsights {
    let distribution = mood_distribution(entries);
    let top = top_tags(entries);
    let mood_by_tag = top
        .iter()
        .take(TAGS_WITH_MOOD)
        .map(|count| {
            let tagged: Vec<&JournalEntry> = entries
                .iter()
                .filter(|entry| entry.tags.contains(&count.tag))
                .collect();
            TagMood {
                tag: count.tag.clone(),
                average_mood: stats::round_to(
                    stats::average_field(&tagged, |entry| f64::from(entry.mood)),
                    1,
                ),
            }
        })
        .collect();

    JournalInsights {
        trend: trend(&distribution),
        mood_distribution: distribution,
        top_tags: top,
        mood_by_tag,
        week: stats::week_of(date)
            .into_iter()
            .map(|day| WeekDay {
                date: day,
                has_entry: stats::filter_by_day(entries, day, |e| e.date).is_some(),
            })
            .collect(),
    }
}
