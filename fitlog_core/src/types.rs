//! Core domain types for fitlog.
//!
//! - Workout entries and the fields captured per session
//! - The single weight goal
//! - Health status buckets derived from BMI

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Gender
// ============================================================================

/// Gender recorded alongside a workout
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`Gender`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown gender '{0}' (expected Male, Female or Other)")]
pub struct ParseGenderError(pub String);

impl FromStr for Gender {
    type Err = ParseGenderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "o" => Ok(Gender::Other),
            _ => Err(ParseGenderError(s.to_string())),
        }
    }
}

// ============================================================================
// Workout Entry
// ============================================================================

/// One logged workout session.
///
/// `bmi` is derived from height and weight when the entry is created and is
/// never recomputed afterwards, so it has no setter.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutEntry {
    pub date: NaiveDate,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub workout_type: String,
    pub duration_minutes: f64,
    pub calories_burned: f64,
    bmi: f64,
}

impl WorkoutEntry {
    /// Build a new entry, computing its BMI (rounded to 2 decimals).
    ///
    /// Fails with [`crate::Error::Computation`] if `height_cm` is not positive.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        date: NaiveDate,
        age: u32,
        gender: Gender,
        height_cm: f64,
        weight_kg: f64,
        workout_type: impl Into<String>,
        duration_minutes: f64,
        calories_burned: f64,
    ) -> crate::Result<Self> {
        let reading = crate::health::calculate_bmi(height_cm, weight_kg)?;
        Ok(Self {
            date,
            age,
            gender,
            height_cm,
            weight_kg,
            workout_type: workout_type.into(),
            duration_minutes,
            calories_burned,
            bmi: crate::health::round2(reading.bmi),
        })
    }

    /// Rebuild an entry from persisted fields, keeping the stored BMI as-is
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_stored(
        date: NaiveDate,
        age: u32,
        gender: Gender,
        height_cm: f64,
        weight_kg: f64,
        workout_type: String,
        duration_minutes: f64,
        calories_burned: f64,
        bmi: f64,
    ) -> Self {
        Self {
            date,
            age,
            gender,
            height_cm,
            weight_kg,
            workout_type,
            duration_minutes,
            calories_burned,
            bmi,
        }
    }

    /// BMI as computed when the entry was created
    pub fn bmi(&self) -> f64 {
        self.bmi
    }
}

// ============================================================================
// Weight Goal
// ============================================================================

/// The single active weight goal.
///
/// Goals are weight-gain oriented: progress is measured as the baseline
/// weight relative to the target.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WeightGoal {
    pub target_weight_kg: f64,
    pub current_weight_kg: f64,
    pub height_cm: f64,
    pub start_date: NaiveDate,
}

impl WeightGoal {
    pub fn new(
        target_weight_kg: f64,
        current_weight_kg: f64,
        height_cm: f64,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            target_weight_kg,
            current_weight_kg,
            height_cm,
            start_date,
        }
    }

    /// Whether the target is at or above the baseline weight
    pub fn is_gain_oriented(&self) -> bool {
        self.target_weight_kg >= self.current_weight_kg
    }
}

// ============================================================================
// Health Status
// ============================================================================

/// Health category derived from a BMI value
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum HealthStatus {
    Underweight,
    NormalWeight,
    Overweight,
    Obese,
}

impl HealthStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Underweight => "Underweight",
            HealthStatus::NormalWeight => "Normal weight",
            HealthStatus::Overweight => "Overweight",
            HealthStatus::Obese => "Obese",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a BMI calculation
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct BmiReading {
    pub bmi: f64,
    pub status: HealthStatus,
}
