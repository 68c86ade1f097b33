use crate::stats;
use crate::storage::Record;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Largest calorie count accepted for one meal.
pub const MAX_CALORIES: u32 = 20_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    /// `HH:MM`
    pub time: String,
    pub calories: u32,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMeals {
    pub date: NaiveDate,
    pub meals: Vec<Meal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Record for DailyMeals {
    const KEY: &'static str = "meal";
}

/// The default meal time: the start of the current hour.
pub fn default_meal_time(now: NaiveDateTime) -> String {
    now.format("%H:00").to_string()
}

/// Appends `meal` to the record for `date`, creating the day if needed.
/// Non-blank `day_notes` replace the day's notes; blank ones keep them.
pub fn add_meal(days: &mut Vec<DailyMeals>, date: NaiveDate, meal: Meal, day_notes: Option<String>) {
    if let Some(day) = days.iter_mut().find(|day| day.date == date) {
        day.meals.push(meal);
        if day_notes.is_some() {
            day.notes = day_notes;
        }
        return;
    }

    days.push(DailyMeals {
        date,
        meals: vec![meal],
        notes: day_notes,
    });
}

/// Removes one meal; a day left without meals is dropped entirely.
/// Returns whether a meal was removed.
pub fn remove_meal(days: &mut Vec<DailyMeals>, date: NaiveDate, meal_id: &str) -> bool {
    let Some(index) = days.iter().position(|day| day.date == date) else {
        return false;
    };

    let day = &mut days[index];
    let before = day.meals.len();
    day.meals.retain(|meal| meal.id != meal_id);
    let removed = day.meals.len() != before;

    if day.meals.is_empty() {
        days.remove(index);
    }
    removed
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct MacroSplit {
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

#[derive(Debug, Serialize)]
pub struct MealSummary {
    pub date: NaiveDate,
    pub meals: Vec<Meal>,
    pub notes: Option<String>,
    pub calorie_goal: u32,
    pub total_calories: u32,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub calorie_percent: u32,
    /// Positive while under goal, negative once over.
    pub calories_remaining: i64,
    pub macro_split: Option<MacroSplit>,
}

pub fn day_calories(days: &[DailyMeals], date: NaiveDate) -> u32 {
    stats::filter_by_day(days, date, |day| day.date)
        .map(|day| stats::saturating_total(&day.meals, |meal| meal.calories))
        .unwrap_or(0)
}

pub fn summarize(days: &[DailyMeals], date: NaiveDate, calorie_goal: u32) -> MealSummary {
    let day = stats::filter_by_day(days, date, |day| day.date);
    let mut meals = day.map(|day| day.meals.clone()).unwrap_or_default();
    meals.sort_by(|a, b| a.time.cmp(&b.time));

    let total_calories = stats::saturating_total(&meals, |meal| meal.calories);
    let total_protein = stats::sum_field(&meals, |meal| meal.protein);
    let total_carbs = stats::sum_field(&meals, |meal| meal.carbs);
    let total_fat = stats::sum_field(&meals, |meal| meal.fat);

    MealSummary {
        date,
        notes: day.and_then(|day| day.notes.clone()),
        calorie_goal,
        total_calories,
        total_protein,
        total_carbs,
        total_fat,
        calorie_percent: stats::percentage(f64::from(total_calories), f64::from(calorie_goal))
            .min(100),
        calories_remaining: i64::from(calorie_goal) - i64::from(total_calories),
        macro_split: macro_split(total_protein, total_carbs, total_fat),
        meals,
    }
}

/// Share of energy from each macronutrient (4/4/9 kcal per gram).
pub fn macro_split(protein: f64, carbs: f64, fat: f64) -> Option<MacroSplit> {
    let energy = protein * 4.0 + carbs * 4.0 + fat * 9.0;
    if energy <= 0.0 {
        return None;
    }
    Some(MacroSplit {
        protein: stats::percentage(protein * 4.0, energy),
        carbs: stats::percentage(carbs * 4.0, energy),
        fat: stats::percentage(fat * 9.0, energy),
    })
}
