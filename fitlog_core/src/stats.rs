//! Aggregation over logged workouts and goals.

use crate::{WeeklyTargets, WeightGoal, WorkoutEntry};
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Totals and averages over a set of workouts
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct WorkoutTotals {
    pub total_calories: f64,
    pub total_duration: f64,
    pub average_duration: f64,
    pub average_calories: f64,
}

/// Sum calories and minutes and average them per workout.
///
/// Empty input yields all zeros.
pub fn total_and_average(entries: &[WorkoutEntry]) -> WorkoutTotals {
    if entries.is_empty() {
        return WorkoutTotals::default();
    }

    let total_calories: f64 = entries.iter().map(|e| e.calories_burned).sum();
    let total_duration: f64 = entries.iter().map(|e| e.duration_minutes).sum();
    let count = entries.len() as f64;

    WorkoutTotals {
        total_calories,
        total_duration,
        average_duration: total_duration / count,
        average_calories: total_calories / count,
    }
}

/// Calories burned per workout type.
///
/// Types are grouped by their exact label: "Running" and "running" are
/// separate categories.
pub fn per_category_calories(entries: &[WorkoutEntry]) -> BTreeMap<String, f64> {
    let mut by_type = BTreeMap::new();
    for entry in entries {
        *by_type.entry(entry.workout_type.clone()).or_insert(0.0) += entry.calories_burned;
    }
    by_type
}

/// Workout duration over time, one point per entry in log order
pub fn duration_timeline(entries: &[WorkoutEntry]) -> Vec<(NaiveDate, f64)> {
    entries
        .iter()
        .map(|e| (e.date, e.duration_minutes))
        .collect()
}

/// Progress towards a weight goal as a percentage.
///
/// Below target this is `current / target * 100`. At or above target it is
/// reported as 100, never more.
pub fn goal_progress(goal: &WeightGoal) -> f64 {
    if goal.current_weight_kg < goal.target_weight_kg {
        goal.current_weight_kg / goal.target_weight_kg * 100.0
    } else {
        100.0
    }
}

/// Activity within one ISO week measured against weekly targets
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WeeklyProgress {
    /// Monday of the week
    pub week_start: NaiveDate,
    pub workouts: usize,
    pub calories: f64,
    pub minutes: f64,
    pub calories_percent: f64,
    pub minutes_percent: f64,
}

/// Sum the workouts logged in the ISO week containing `today`
pub fn weekly_progress(
    entries: &[WorkoutEntry],
    targets: &WeeklyTargets,
    today: NaiveDate,
) -> WeeklyProgress {
    let week = today.iso_week();
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));

    let this_week: Vec<_> = entries
        .iter()
        .filter(|e| e.date.iso_week() == week)
        .collect();

    let calories: f64 = this_week.iter().map(|e| e.calories_burned).sum();
    let minutes: f64 = this_week.iter().map(|e| e.duration_minutes).sum();

    WeeklyProgress {
        week_start,
        workouts: this_week.len(),
        calories,
        minutes,
        calories_percent: capped_percent(calories, targets.weekly_calories),
        minutes_percent: capped_percent(minutes, targets.weekly_minutes),
    }
}

fn capped_percent(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 100.0;
    }
    (value / target * 100.0).min(100.0)
}
