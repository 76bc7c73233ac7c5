//! Single-slot weight goal persistence.
//!
//! The goal file holds one header row and at most one data row. Saving
//! replaces the file atomically, so a reader never sees a half-written goal.

use crate::{Error, Result, WeightGoal};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use tempfile::NamedTempFile;

/// Column header of the goal file, in file order
pub const GOAL_HEADERS: [&str; 4] = [
    "Target Weight (kg)",
    "Current Weight (kg)",
    "Height (cm)",
    "Start Date",
];

#[derive(Debug, Serialize, Deserialize)]
struct GoalRow {
    #[serde(rename = "Target Weight (kg)")]
    target_weight_kg: f64,
    #[serde(rename = "Current Weight (kg)")]
    current_weight_kg: f64,
    #[serde(rename = "Height (cm)")]
    height_cm: f64,
    #[serde(rename = "Start Date")]
    start_date: NaiveDate,
}

impl From<&WeightGoal> for GoalRow {
    fn from(goal: &WeightGoal) -> Self {
        GoalRow {
            target_weight_kg: goal.target_weight_kg,
            current_weight_kg: goal.current_weight_kg,
            height_cm: goal.height_cm,
            start_date: goal.start_date,
        }
    }
}

impl From<GoalRow> for WeightGoal {
    fn from(row: GoalRow) -> Self {
        WeightGoal::new(
            row.target_weight_kg,
            row.current_weight_kg,
            row.height_cm,
            row.start_date,
        )
    }
}

impl WeightGoal {
    /// Load the goal from a file with shared locking.
    ///
    /// Returns `None` if the file doesn't exist, has no data row, or can't
    /// be parsed (the latter is logged).
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No goal file found at {:?}", path);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(&file);
        let first = reader.deserialize::<GoalRow>().next();

        file.unlock()?;

        match first {
            None => {
                tracing::debug!("Goal file {:?} has no goal row", path);
                Ok(None)
            }
            Some(Ok(row)) => {
                tracing::debug!("Loaded weight goal from {:?}", path);
                Ok(Some(row.into()))
            }
            Some(Err(e)) if matches!(e.kind(), csv::ErrorKind::Io(_)) => Err(e.into()),
            Some(Err(e)) => {
                tracing::warn!("Failed to parse goal file {:?}: {}. Ignoring goal.", path, e);
                Ok(None)
            }
        }
    }

    /// Save the goal, replacing any previous one.
    ///
    /// Atomically writes the goal by:
    /// 1. Writing header and row to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;

        // Serialize concurrent writers on the temp file
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(true)
                .from_writer(temp.as_file());
            writer.serialize(GoalRow::from(self))?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Storage(e.error))?;

        tracing::debug!("Saved weight goal to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let goal_path = temp_dir.path().join("goal.csv");

        let goal = WeightGoal::new(80.0, 70.0, 175.0, start_date());
        goal.save(&goal_path).unwrap();

        let loaded = WeightGoal::load(&goal_path).unwrap();
        assert_eq!(loaded, Some(goal));
    }

    #[test]
    fn test_file_layout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let goal_path = temp_dir.path().join("goal.csv");

        WeightGoal::new(80.0, 70.5, 175.0, start_date())
            .save(&goal_path)
            .unwrap();

        let content = std::fs::read_to_string(&goal_path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], GOAL_HEADERS.join(","));
        assert_eq!(lines[1], "80.0,70.5,175.0,2024-01-08");
    }

    #[test]
    fn test_save_overwrites_previous_goal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let goal_path = temp_dir.path().join("goal.csv");

        WeightGoal::new(80.0, 70.0, 175.0, start_date())
            .save(&goal_path)
            .unwrap();
        let replacement = WeightGoal::new(90.0, 75.0, 180.0, start_date());
        replacement.save(&goal_path).unwrap();

        let content = std::fs::read_to_string(&goal_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert_eq!(WeightGoal::load(&goal_path).unwrap(), Some(replacement));
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let goal = WeightGoal::load(&temp_dir.path().join("nonexistent.csv")).unwrap();
        assert!(goal.is_none());
    }

    #[test]
    fn test_load_empty_and_header_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let goal_path = temp_dir.path().join("goal.csv");

        std::fs::write(&goal_path, "").unwrap();
        assert!(WeightGoal::load(&goal_path).unwrap().is_none());

        std::fs::write(&goal_path, format!("{}\n", GOAL_HEADERS.join(","))).unwrap();
        assert!(WeightGoal::load(&goal_path).unwrap().is_none());
    }

    #[test]
    fn test_corrupted_goal_returns_none() {
        let temp_dir = tempfile::tempdir().unwrap();
        let goal_path = temp_dir.path().join("goal.csv");

        std::fs::write(
            &goal_path,
            "Target Weight (kg),Current Weight (kg),Height (cm),Start Date\nheavy,70,175,yesterday\n",
        )
        .unwrap();

        assert!(WeightGoal::load(&goal_path).unwrap().is_none());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let goal_path = temp_dir.path().join("goal.csv");

        WeightGoal::new(80.0, 70.0, 175.0, start_date())
            .save(&goal_path)
            .unwrap();

        let extras: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name() != "goal.csv")
            .collect();
        assert!(
            extras.is_empty(),
            "Expected only goal.csv, found extras: {:?}",
            extras
        );
    }
}
