use crate::config::Goals;
use crate::models::{DailyMeals, MoodEntry, SleepEntry, WaterEntry, meal, sleep, water};
use crate::stats;
use chrono::{Local, NaiveDate};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MoodCard {
    pub emoji: &'static str,
    pub label: &'static str,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WaterCard {
    pub total_ml: u32,
    pub goal_ml: u32,
    pub percent: u32,
}

#[derive(Debug, Serialize)]
pub struct SleepCard {
    pub duration: u32,
    pub label: String,
    /// Tonight's duration minus the all-time average, in minutes.
    pub vs_average: i64,
}

#[derive(Debug, Serialize)]
pub struct CaloriesCard {
    pub total: u32,
    pub goal: u32,
    pub percent: u32,
}

#[derive(Debug, Serialize)]
pub struct WeeklyGoals {
    pub average_sleep_minutes: u32,
    pub sleep_percent: u32,
    pub average_water_ml: u32,
    pub water_percent: u32,
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub mood: Option<MoodCard>,
    pub water: WaterCard,
    pub sleep: Option<SleepCard>,
    pub calories: CaloriesCard,
    pub weekly: WeeklyGoals,
}

/// Everything the dashboard reads, loaded fresh for each request.
#[derive(Debug, Default)]
pub struct DashboardInputs {
    pub moods: Vec<MoodEntry>,
    pub water: Vec<WaterEntry>,
    pub sleep: Vec<SleepEntry>,
    pub meals: Vec<DailyMeals>,
}

pub fn build_dashboard(inputs: &DashboardInputs, goals: &Goals) -> Dashboard {
    build_dashboard_at(Local::now().date_naive(), inputs, goals)
}

pub fn build_dashboard_at(today: NaiveDate, inputs: &DashboardInputs, goals: &Goals) -> Dashboard {
    let mood = stats::filter_by_day(&inputs.moods, today, |e| e.date).map(|entry| MoodCard {
        emoji: entry.mood.emoji(),
        label: entry.mood.label(),
        note: entry.note.clone(),
    });

    let water_today = water::total_for_day(&inputs.water, today);
    let average_sleep = sleep::average_duration(&inputs.sleep);
    let sleep_card = stats::filter_by_day(&inputs.sleep, today, |e| e.date).map(|entry| SleepCard {
        duration: entry.duration,
        label: stats::format_duration(entry.duration),
        vs_average: i64::from(entry.duration) - i64::from(average_sleep),
    });

    let calories = meal::day_calories(&inputs.meals, today);

    let week = stats::last_7_days(today);
    let week_sleep: Vec<&SleepEntry> = inputs
        .sleep
        .iter()
        .filter(|entry| week.contains(&entry.date))
        .collect();
    let weekly_sleep = stats::average_field(&week_sleep, |entry| f64::from(entry.duration));
    let daily_water: Vec<u32> = week
        .iter()
        .map(|day| water::total_for_day(&inputs.water, *day))
        .collect();
    let weekly_water = stats::average_field(&daily_water, |ml| f64::from(*ml));

    Dashboard {
        date: today,
        mood,
        water: WaterCard {
            total_ml: water_today,
            goal_ml: goals.water_ml,
            percent: stats::percentage(f64::from(water_today), f64::from(goals.water_ml)),
        },
        sleep: sleep_card,
        calories: CaloriesCard {
            total: calories,
            goal: goals.calories,
            percent: stats::percentage(f64::from(calories), f64::from(goals.calories)),
        },
        weekly: WeeklyGoals {
            average_sleep_minutes: weekly_sleep.round() as u32,
            sleep_percent: stats::percentage(weekly_sleep, f64::from(goals.sleep_minutes)),
            average_water_ml: weekly_water.round() as u32,
            water_percent: stats::percentage(weekly_water, f64::from(goals.water_ml)),
        },
    }
}
