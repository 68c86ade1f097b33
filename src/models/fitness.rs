use crate::stats;
use crate::storage::Record;
use chrono::{Duration, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    /// Seconds; 0 for rep-based exercises.
    pub duration: u32,
    pub sets: u32,
    pub reps: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed: Option<NaiveDateTime>,
}

/// Exercise fields supplied when building or editing a routine.
#[derive(Debug, Clone, Deserialize)]
pub struct ExerciseDraft {
    pub name: String,
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
}

impl Record for Routine {
    const KEY: &'static str = "fitness";

    fn seed() -> Vec<Self> {
        let exercise = |id: &str, name: &str, duration, sets, reps| Exercise {
            id: id.into(),
            name: name.into(),
            duration,
            sets,
            reps,
            completed: false,
        };

        vec![
            Routine {
                id: "1".into(),
                name: "Morning Workout".into(),
                exercises: vec![
                    exercise("1-1", "Push-ups", 0, 3, 15),
                    exercise("1-2", "Squats", 0, 3, 20),
                    exercise("1-3", "Plank", 60, 3, 0),
                    exercise("1-4", "Jumping Jacks", 60, 2, 0),
                ],
                last_completed: None,
            },
            Routine {
                id: "2".into(),
                name: "Quick HIIT".into(),
                exercises: vec![
                    exercise("2-1", "Burpees", 30, 3, 0),
                    exercise("2-2", "Mountain Climbers", 30, 3, 0),
                    exercise("2-3", "High Knees", 30, 3, 0),
                ],
                last_completed: Some(Local::now().naive_local() - Duration::days(2)),
            },
        ]
    }
}

impl Routine {
    pub fn new(name: &str, drafts: Vec<ExerciseDraft>) -> Self {
        let id = super::new_id();
        let exercises = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| Exercise {
                id: format!("{id}-{index}"),
                name: draft.name.trim().to_string(),
                duration: draft.duration,
                sets: draft.sets,
                reps: draft.reps,
                completed: false,
            })
            .collect();

        Self {
            id,
            name: name.trim().to_string(),
            exercises,
            last_completed: None,
        }
    }

    pub fn exercise_mut(&mut self, exercise_id: &str) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|exercise| exercise.id == exercise_id)
    }

    pub fn toggle_exercise(&mut self, exercise_id: &str) -> bool {
        match self.exercise_mut(exercise_id) {
            Some(exercise) => {
                exercise.completed = !exercise.completed;
                true
            }
            None => false,
        }
    }

    pub fn complete(&mut self, at: NaiveDateTime) {
        self.last_completed = Some(at);
        self.exercises.iter_mut().for_each(|exercise| exercise.completed = true);
    }

    pub fn reset(&mut self) {
        self.exercises.iter_mut().for_each(|exercise| exercise.completed = false);
    }

    pub fn edit_exercise(&mut self, exercise_id: &str, draft: ExerciseDraft) -> bool {
        let Some(exercise) = self.exercise_mut(exercise_id) else {
            return false;
        };
        exercise.name = draft.name.trim().to_string();
        exercise.duration = draft.duration;
        exercise.sets = draft.sets;
        exercise.reps = draft.reps;
        true
    }

    pub fn delete_exercise(&mut self, exercise_id: &str) -> bool {
        let before = self.exercises.len();
        self.exercises.retain(|exercise| exercise.id != exercise_id);
        self.exercises.len() != before
    }

    /// Percentage of exercises marked complete; 0 for an empty routine.
    pub fn progress(&self) -> u32 {
        let completed = self.exercises.iter().filter(|e| e.completed).count();
        stats::percentage(completed as f64, self.exercises.len() as f64)
    }
}

pub fn find_routine<'a>(routines: &'a mut [Routine], id: &str) -> Option<&'a mut Routine> {
    routines.iter_mut().find(|routine| routine.id == id)
}

/// Routines that have been completed at least once, most recent first.
pub fn history(routines: &[Routine]) -> Vec<&Routine> {
    let mut done: Vec<&Routine> = routines
        .iter()
        .filter(|routine| routine.last_completed.is_some())
        .collect();
    done.sort_by(|a, b| b.last_completed.cmp(&a.last_completed));
    done
}
