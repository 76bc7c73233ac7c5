//! Append-only CSV workout log.
//!
//! Entries are appended as rows of a single CSV file with a fixed header.
//! Writers take an exclusive file lock, readers a shared one.

use crate::{Gender, Result, WorkoutEntry};
use chrono::NaiveDate;
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Column header of the workout log, in file order
pub const WORKOUT_HEADERS: [&str; 9] = [
    "Date",
    "Age",
    "Gender",
    "Height (cm)",
    "Weight (kg)",
    "Workout Type",
    "Duration (mins)",
    "Calories Burned",
    "BMI",
];

/// A row in the workout CSV
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: NaiveDate,
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "Gender")]
    gender: Gender,
    #[serde(rename = "Height (cm)")]
    height_cm: f64,
    #[serde(rename = "Weight (kg)")]
    weight_kg: f64,
    #[serde(rename = "Workout Type")]
    workout_type: String,
    #[serde(rename = "Duration (mins)")]
    duration_minutes: f64,
    #[serde(rename = "Calories Burned")]
    calories_burned: f64,
    #[serde(rename = "BMI")]
    bmi: f64,
}

impl From<&WorkoutEntry> for CsvRow {
    fn from(entry: &WorkoutEntry) -> Self {
        CsvRow {
            date: entry.date,
            age: entry.age,
            gender: entry.gender,
            height_cm: entry.height_cm,
            weight_kg: entry.weight_kg,
            workout_type: entry.workout_type.clone(),
            duration_minutes: entry.duration_minutes,
            calories_burned: entry.calories_burned,
            bmi: entry.bmi(),
        }
    }
}

impl From<CsvRow> for WorkoutEntry {
    fn from(row: CsvRow) -> Self {
        WorkoutEntry::from_stored(
            row.date,
            row.age,
            row.gender,
            row.height_cm,
            row.weight_kg,
            row.workout_type,
            row.duration_minutes,
            row.calories_burned,
            row.bmi,
        )
    }
}

/// Destination for newly logged workouts
pub trait WorkoutSink {
    fn append(&mut self, entry: &WorkoutEntry) -> Result<()>;
}

/// CSV-file-backed workout log with file locking
#[derive(Clone, Debug)]
pub struct CsvWorkoutLog {
    path: PathBuf,
}

impl CsvWorkoutLog {
    /// Create a log handle for the given path (nothing is touched on disk)
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the log file exists and starts with the column header.
    ///
    /// A file that already has content is left untouched, so calling this
    /// repeatedly is harmless.
    pub fn initialize(&self) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = self.open_for_append()?;
        file.lock_exclusive()?;

        if file.metadata()?.len() == 0 {
            let mut writer = csv::WriterBuilder::new().from_writer(&file);
            writer.write_record(WORKOUT_HEADERS)?;
            writer.flush()?;
            drop(writer);
            tracing::info!("Initialized workout log at {:?}", self.path);
        } else {
            tracing::debug!("Workout log at {:?} already initialized", self.path);
        }

        file.unlock()?;
        Ok(())
    }

    /// Read every entry in file order (oldest first)
    pub fn read_all(&self) -> Result<Vec<WorkoutEntry>> {
        read_workouts(&self.path)
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn open_for_append(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;
        Ok(file)
    }
}

impl WorkoutSink for CsvWorkoutLog {
    fn append(&mut self, entry: &WorkoutEntry) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = self.open_for_append()?;
        file.lock_exclusive()?;

        // A log that was never initialized still gets its header
        let len = file.metadata()?.len();
        let needs_headers = len == 0;
        if len > 0 {
            terminate_last_line(&file)?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_headers)
            .from_writer(&file);
        writer.serialize(CsvRow::from(entry))?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!(
            "Appended {} workout on {} to {:?}",
            entry.workout_type,
            entry.date,
            self.path
        );
        Ok(())
    }
}

/// Make sure a non-empty log ends with a newline.
///
/// A row cut short by a crash is left in place (readers skip it) but must
/// not swallow the next appended row.
fn terminate_last_line(mut file: &File) -> Result<()> {
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    if last[0] != b'\n' {
        file.write_all(b"\n")?;
        tracing::warn!("Workout log did not end with a newline; terminated partial row");
    }
    Ok(())
}

/// Read all workouts from a CSV log.
///
/// A missing file yields an empty list. Rows that cannot be parsed are
/// logged and skipped.
pub fn read_workouts(path: &Path) -> Result<Vec<WorkoutEntry>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!("No workout log at {:?}", path);
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    file.lock_shared()?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(&file);

    let mut entries = Vec::new();
    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        match result {
            Ok(row) => entries.push(WorkoutEntry::from(row)),
            Err(e) if is_io_error(&e) => {
                let _ = file.unlock();
                return Err(e.into());
            }
            Err(e) => {
                // +2: one for the header, one for 1-based numbering
                tracing::warn!("Skipping malformed workout row {}: {}", index + 2, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} workouts from {:?}", entries.len(), path);
    Ok(entries)
}

fn is_io_error(e: &csv::Error) -> bool {
    matches!(e.kind(), csv::ErrorKind::Io(_))
}
