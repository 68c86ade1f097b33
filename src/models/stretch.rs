use crate::storage::Record;
use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Longest single stretch accepted, in seconds.
pub const MAX_DURATION: u32 = 3_600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stretch {
    pub id: String,
    pub name: String,
    /// Seconds.
    pub duration: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StretchSequence {
    pub id: String,
    pub name: String,
    /// Performed in this order.
    pub stretches: Vec<Stretch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_performed: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StretchDraft {
    pub name: String,
    pub duration: u32,
    #[serde(default)]
    pub description: Option<String>,
}

impl Record for StretchSequence {
    const KEY: &'static str = "stretch";

    fn seed() -> Vec<Self> {
        let stretch = |id: &str, name: &str, duration, description: &str| Stretch {
            id: id.into(),
            name: name.into(),
            duration,
            description: Some(description.into()),
        };

        vec![
            StretchSequence {
                id: "1".into(),
                name: "Morning Flexibility".into(),
                stretches: vec![
                    stretch("1-1", "Neck Rolls", 30, "Gently roll your neck in a circle, five times each way."),
                    stretch("1-2", "Shoulder Stretch", 45, "Pull each arm across your chest and hold, then switch."),
                    stretch("1-3", "Standing Forward Bend", 60, "Fold forward from the hips with soft knees."),
                    stretch("1-4", "Quad Stretch", 30, "Stand on one leg and draw the other heel toward you."),
                ],
                last_performed: Some(Local::now().naive_local() - Duration::days(1)),
            },
            StretchSequence {
                id: "2".into(),
                name: "Post-Workout Cool Down".into(),
                stretches: vec![
                    stretch("2-1", "Child's Pose", 60, "Sit back on your heels and lay your torso down."),
                    stretch("2-2", "Butterfly Stretch", 45, "Soles of the feet together, knees out to the sides."),
                    stretch("2-3", "Seated Forward Bend", 60, "Legs extended, reach from the hips toward your feet."),
                ],
                last_performed: None,
            },
        ]
    }
}

impl StretchSequence {
    pub fn new(name: &str, drafts: Vec<StretchDraft>) -> Self {
        let id = super::new_id();
        let stretches = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| Stretch {
                id: format!("{id}-{index}"),
                name: draft.name.trim().to_string(),
                duration: draft.duration,
                description: super::non_blank(draft.description),
            })
            .collect();

        Self {
            id,
            name: name.trim().to_string(),
            stretches,
            last_performed: None,
        }
    }

    pub fn total_duration(&self) -> u32 {
        crate::stats::saturating_total(&self.stretches, |stretch| stretch.duration)
    }

    pub fn durations(&self) -> Vec<u32> {
        self.stretches.iter().map(|stretch| stretch.duration).collect()
    }

    pub fn edit_stretch(&mut self, stretch_id: &str, draft: StretchDraft) -> bool {
        let Some(stretch) = self.stretches.iter_mut().find(|s| s.id == stretch_id) else {
            return false;
        };
        stretch.name = draft.name.trim().to_string();
        stretch.duration = draft.duration;
        stretch.description = super::non_blank(draft.description);
        true
    }

    pub fn delete_stretch(&mut self, stretch_id: &str) -> bool {
        let before = self.stretches.len();
        self.stretches.retain(|stretch| stretch.id != stretch_id);
        self.stretches.len() != before
    }

    /// Moves the stretch at `from` so it ends up at index `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.stretches.len() || to >= self.stretches.len() {
            return false;
        }
        let stretch = self.stretches.remove(from);
        self.stretches.insert(to, stretch);
        true
    }
}

pub fn find_sequence<'a>(sequences: &'a mut [StretchSequence], id: &str) -> Option<&'a mut StretchSequence> {
    sequences.iter_mut().find(|sequence| sequence.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, duration: u32) -> StretchDraft {
        StretchDraft {
            name: name.into(),
            duration,
            description: Some("  ".into()),
        }
    }

    fn names(sequence: &StretchSequence) -> Vec<&str> {
        sequence.stretches.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn new_sequence_totals_durations() {
        let sequence = StretchSequence::new("Evening", vec![draft("A", 30), draft("B", 45)]);
        assert_eq!(sequence.total_duration(), 75);
        assert_eq!(sequence.stretches[0].description, None);
        assert_ne!(sequence.stretches[0].id, sequence.stretches[1].id);
    }

    #[test]
    fn total_duration_saturates() {
        let sequence = StretchSequence::new("Long", vec![draft("A", u32::MAX), draft("B", 60)]);
        assert_eq!(sequence.total_duration(), u32::MAX);
    }

    #[test]
    fn reorder_moves_one_stretch() {
        let mut sequence = StretchSequence::new("Evening", vec![draft("A", 1), draft("B", 1), draft("C", 1)]);
        assert!(sequence.reorder(0, 2));
        assert_eq!(names(&sequence), vec!["B", "C", "A"]);
        assert!(sequence.reorder(2, 0));
        assert_eq!(names(&sequence), vec!["A", "B", "C"]);
        assert!(!sequence.reorder(0, 3));
    }

    #[test]
    fn edit_and_delete() {
        let mut sequence = StretchSequence::new("Evening", vec![draft("A", 30), draft("B", 45)]);
        let id = sequence.stretches[1].id.clone();
        let edited = StretchDraft { name: "B2".into(), duration: 20, description: Some("slow".into()) };

        assert!(sequence.edit_stretch(&id, edited));
        assert_eq!(sequence.stretches[1].description.as_deref(), Some("slow"));
        assert_eq!(sequence.total_duration(), 50);

        assert!(sequence.delete_stretch(&id));
        assert!(!sequence.delete_stretch(&id));
        assert_eq!(names(&sequence), vec!["A"]);
    }
}
