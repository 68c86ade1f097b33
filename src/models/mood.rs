use crate::storage::Record;
use crate::upsert::{SortOrder, Upserted, upsert_by_day};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
    Angry,
    Tired,
    Thoughtful,
    Excited,
    Calm,
}

impl Mood {
    pub const ALL: [Mood; 8] = [
        Mood::Happy,
        Mood::Neutral,
        Mood::Sad,
        Mood::Angry,
        Mood::Tired,
        Mood::Thoughtful,
        Mood::Excited,
        Mood::Calm,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Neutral => "😐",
            Mood::Sad => "😢",
            Mood::Angry => "😡",
            Mood::Tired => "😴",
            Mood::Thoughtful => "🤔",
            Mood::Excited => "😀",
            Mood::Calm => "😌",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Neutral => "Neutral",
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::Tired => "Tired",
            Mood::Thoughtful => "Thoughtful",
            Mood::Excited => "Excited",
            Mood::Calm => "Calm",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Mood::Happy => "green",
            Mood::Neutral => "blue",
            Mood::Sad => "indigo",
            Mood::Angry => "red",
            Mood::Tired => "purple",
            Mood::Thoughtful => "amber",
            Mood::Excited => "emerald",
            Mood::Calm => "teal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub date: NaiveDate,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Record for MoodEntry {
    const KEY: &'static str = "mood";
}

pub fn save_mood(entries: &mut Vec<MoodEntry>, entry: MoodEntry) -> Upserted {
    upsert_by_day(entries, entry, |e| e.date, SortOrder::Unsorted)
}

/// Drops the entry for `date`; returns whether one existed.
pub fn remove_mood(entries: &mut Vec<MoodEntry>, date: NaiveDate) -> bool {
    let before = entries.len();
    entries.retain(|entry| entry.date != date);
    entries.len() != before
}
