#![forbid(unsafe_code)]

//! Core domain model and business logic for the fitlog workout tracker.
//!
//! This crate provides:
//! - Domain types (workout entries, weight goals, health status)
//! - Persistence (CSV workout log, single-slot goal file)
//! - BMI calculation
//! - Aggregation (totals, per-category calories, goal and weekly progress)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod health;
pub mod workout_log;
pub mod goal;
pub mod store;
pub mod stats;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::{Config, WeeklyTargets};
pub use health::{calculate_bmi, round2};
pub use workout_log::{CsvWorkoutLog, WorkoutSink};
pub use store::RecordStore;
pub use stats::{
    duration_timeline, goal_progress, per_category_calories, total_and_average, weekly_progress,
    WeeklyProgress, WorkoutTotals,
};
