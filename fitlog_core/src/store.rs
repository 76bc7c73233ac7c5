//! Record store: the workout log and weight goal under one data directory.
//!
//! Nothing is cached between calls; every read goes back to disk.

use crate::workout_log::{CsvWorkoutLog, WorkoutSink};
use crate::{Result, WeightGoal, WorkoutEntry};
use std::path::{Path, PathBuf};

/// File name of the workout log inside the data directory
pub const WORKOUTS_FILE: &str = "workouts.csv";

/// File name of the goal record inside the data directory
pub const GOAL_FILE: &str = "goal.csv";

#[derive(Clone, Debug)]
pub struct RecordStore {
    log: CsvWorkoutLog,
    goal_path: PathBuf,
}

impl RecordStore {
    /// Store rooted at `data_dir`
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self::with_paths(data_dir.join(WORKOUTS_FILE), data_dir.join(GOAL_FILE))
    }

    /// Store with explicit file locations
    pub fn with_paths(workouts_path: impl Into<PathBuf>, goal_path: impl Into<PathBuf>) -> Self {
        Self {
            log: CsvWorkoutLog::new(workouts_path),
            goal_path: goal_path.into(),
        }
    }

    pub fn workouts_path(&self) -> &Path {
        self.log.path()
    }

    pub fn goal_path(&self) -> &Path {
        &self.goal_path
    }

    /// Create the workout log with its header if it doesn't exist yet
    pub fn initialize(&self) -> Result<()> {
        self.log.initialize()
    }

    /// Append one entry to the end of the workout log
    pub fn append_workout(&mut self, entry: &WorkoutEntry) -> Result<()> {
        self.log.append(entry)
    }

    /// All logged workouts, oldest first
    pub fn read_all_workouts(&self) -> Result<Vec<WorkoutEntry>> {
        self.log.read_all()
    }

    /// Replace the stored goal
    pub fn save_goal(&self, goal: &WeightGoal) -> Result<()> {
        goal.save(&self.goal_path)
    }

    /// The stored goal, if any
    pub fn read_goal(&self) -> Result<Option<WeightGoal>> {
        WeightGoal::load(&self.goal_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{goal_progress, total_and_average, Gender};
    use chrono::NaiveDate;

    fn entry(calories: f64) -> WorkoutEntry {
        WorkoutEntry::new(
            NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            41,
            Gender::Male,
            180.0,
            82.0,
            "Running",
            calories / 10.0,
            calories,
        )
        .unwrap()
    }

    #[test]
    fn test_fresh_store_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());

        assert!(store.read_all_workouts().unwrap().is_empty());
        assert!(store.read_goal().unwrap().is_none());
    }

    #[test]
    fn test_append_then_read_last() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::new(temp_dir.path());
        store.initialize().unwrap();

        store.append_workout(&entry(100.0)).unwrap();
        let last = entry(250.0);
        store.append_workout(&last).unwrap();

        let entries = store.read_all_workouts().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.last(), Some(&last));
    }

    #[test]
    fn test_initialize_twice_keeps_data() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::new(temp_dir.path());

        store.initialize().unwrap();
        store.append_workout(&entry(100.0)).unwrap();
        store.initialize().unwrap();

        let content = std::fs::read_to_string(store.workouts_path()).unwrap();
        assert_eq!(content.lines().filter(|l| l.starts_with("Date,")).count(), 1);
        assert_eq!(store.read_all_workouts().unwrap().len(), 1);
    }

    #[test]
    fn test_calorie_totals_scenario() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut store = RecordStore::new(temp_dir.path());
        store.initialize().unwrap();

        for calories in [100.0, 200.0, 300.0] {
            store.append_workout(&entry(calories)).unwrap();
        }

        let totals = total_and_average(&store.read_all_workouts().unwrap());
        assert_eq!(totals.total_calories, 600.0);
        assert_eq!(totals.average_calories, 200.0);
    }

    #[test]
    fn test_goal_scenarios() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(temp_dir.path());
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();

        store
            .save_goal(&WeightGoal::new(80.0, 70.0, 175.0, date))
            .unwrap();
        assert!(store.goal_path().exists());
        let goal = store.read_goal().unwrap().unwrap();
        assert_eq!(goal_progress(&goal), 87.5);

        store
            .save_goal(&WeightGoal::new(80.0, 85.0, 175.0, date))
            .unwrap();
        let goal = store.read_goal().unwrap().unwrap();
        assert_eq!(goal_progress(&goal), 100.0);
    }

    #[test]
    #[cfg(unix)]
    fn test_unwritable_directory_is_storage_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = tempfile::tempdir().unwrap();
        let locked = temp_dir.path().join("locked");
        std::fs::create_dir(&locked).unwrap();
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o500)).unwrap();

        // Root ignores directory permissions; nothing to assert there
        if std::fs::write(locked.join("write_check"), b"").is_ok() {
            return;
        }

        let mut store = RecordStore::new(&locked);
        let err = store.append_workout(&entry(100.0)).unwrap_err();
        assert!(err.is_storage());

        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o700)).unwrap();
    }
}
