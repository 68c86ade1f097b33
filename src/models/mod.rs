pub mod fitness;
pub mod journal;
pub mod meal;
pub mod mood;
pub mod sleep;
pub mod stretch;
pub mod water;
pub mod weight;

pub use fitness::{Exercise, Routine};
pub use journal::JournalEntry;
pub use meal::{DailyMeals, Meal};
pub use mood::{Mood, MoodEntry};
pub use sleep::SleepEntry;
pub use stretch::{Stretch, StretchSequence};
pub use water::WaterEntry;
pub use weight::WeightEntry;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Trims optional free text, treating blank input as absent.
pub fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
