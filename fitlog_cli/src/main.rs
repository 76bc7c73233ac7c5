use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fitlog_core::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

const CHART_WIDTH: usize = 30;

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "Personal fitness tracker: log workouts, check BMI, follow your goals", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a workout session
    Log {
        /// Age in years (1-120)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=120))]
        age: u32,

        /// Male, Female or Other
        #[arg(long)]
        gender: Gender,

        /// Height in cm (50-250)
        #[arg(long, value_parser = parse_height)]
        height: f64,

        /// Weight in kg (20-200)
        #[arg(long, value_parser = parse_weight)]
        weight: f64,

        /// Workout type (e.g. Running, Cycling, Yoga)
        #[arg(long, value_parser = parse_workout_type)]
        workout_type: String,

        /// Duration in minutes (1-300)
        #[arg(long, value_parser = parse_duration)]
        duration: f64,

        /// Estimated calories burned (1-2000)
        #[arg(long, value_parser = parse_calories)]
        calories: f64,

        /// Session date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show all logged workouts
    History {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show workout statistics and charts
    Stats {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Calculate BMI and health status
    Bmi {
        /// Height in cm (50-250)
        #[arg(long, value_parser = parse_height)]
        height: f64,

        /// Weight in kg (20-200)
        #[arg(long, value_parser = parse_weight)]
        weight: f64,
    },

    /// Set or show the weight goal
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Set or show weekly calorie and duration targets
    Targets {
        #[command(subcommand)]
        action: TargetsAction,
    },
}

#[derive(Subcommand)]
enum GoalAction {
    /// Save a new goal, replacing the current one
    Set {
        /// Target weight in kg (20-200)
        #[arg(long, value_parser = parse_weight)]
        target: f64,

        /// Current weight in kg (20-200)
        #[arg(long, value_parser = parse_weight)]
        current: f64,

        /// Height in cm (50-250)
        #[arg(long, value_parser = parse_height)]
        height: f64,

        /// Start date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        start_date: Option<NaiveDate>,
    },

    /// Show the current goal and progress
    Show,
}

#[derive(Subcommand)]
enum TargetsAction {
    /// Save weekly targets to the config file
    Set {
        /// Calories to burn per week (100-10000)
        #[arg(long, value_parser = parse_weekly_calories)]
        calories: f64,

        /// Workout minutes per week (10-1000)
        #[arg(long, value_parser = parse_weekly_minutes)]
        minutes: f64,
    },

    /// Show weekly targets and this week's progress
    Show {
        /// Report the week containing this date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        week_of: Option<NaiveDate>,
    },
}

fn main() -> Result<()> {
    fitlog_core::logging::init();

    let cli = Cli::parse();

    let config_path = cli.config.unwrap_or_else(Config::default_config_path);
    let config = Config::load_or_default(&config_path)?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    tracing::debug!("Using data directory {:?}", data_dir);

    let mut store = RecordStore::new(&data_dir);
    store.initialize()?;

    match cli.command {
        Commands::Log {
            age,
            gender,
            height,
            weight,
            workout_type,
            duration,
            calories,
            date,
        } => {
            let entry = WorkoutEntry::new(
                date.unwrap_or_else(today),
                age,
                gender,
                height,
                weight,
                workout_type,
                duration,
                calories,
            )?;
            cmd_log(&mut store, &entry)
        }
        Commands::History { json } => cmd_history(&store, json),
        Commands::Stats { json } => cmd_stats(&store, json),
        Commands::Bmi { height, weight } => cmd_bmi(height, weight),
        Commands::Goal { action } => match action {
            GoalAction::Set {
                target,
                current,
                height,
                start_date,
            } => {
                let goal =
                    WeightGoal::new(target, current, height, start_date.unwrap_or_else(today));
                cmd_goal_set(&store, &goal)
            }
            GoalAction::Show => cmd_goal_show(&store),
        },
        Commands::Targets { action } => match action {
            TargetsAction::Set { calories, minutes } => {
                cmd_targets_set(config, &config_path, calories, minutes)
            }
            TargetsAction::Show { week_of } => {
                cmd_targets_show(&store, &config, week_of.unwrap_or_else(today))
            }
        },
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn cmd_log(store: &mut RecordStore, entry: &WorkoutEntry) -> Result<()> {
    store.append_workout(entry)?;

    println!("✓ Workout logged successfully!");
    println!(
        "  {} on {}: {} mins, {} cal",
        entry.workout_type, entry.date, entry.duration_minutes, entry.calories_burned
    );
    println!(
        "  BMI: {:.2} ({})",
        entry.bmi(),
        health::classify(entry.bmi())
    );
    Ok(())
}

fn cmd_history(store: &RecordStore, json: bool) -> Result<()> {
    let entries = store.read_all_workouts()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No workout history found. Start logging workouts!");
        return Ok(());
    }

    println!(
        "{:<10}  {:>3}  {:<6}  {:>7}  {:>7}  {:<16}  {:>7}  {:>8}  {:>6}",
        "Date", "Age", "Gender", "Height", "Weight", "Workout Type", "Mins", "Calories", "BMI"
    );
    println!("{}", "─".repeat(90));
    for e in &entries {
        println!(
            "{:<10}  {:>3}  {:<6}  {:>7.1}  {:>7.1}  {:<16}  {:>7.1}  {:>8.1}  {:>6.2}",
            e.date.to_string(),
            e.age,
            e.gender.as_str(),
            e.height_cm,
            e.weight_kg,
            e.workout_type,
            e.duration_minutes,
            e.calories_burned,
            e.bmi()
        );
    }
    println!("\n{} workouts", entries.len());
    Ok(())
}

fn cmd_stats(store: &RecordStore, json: bool) -> Result<()> {
    let entries = store.read_all_workouts()?;
    let totals = total_and_average(&entries);
    let by_type = per_category_calories(&entries);
    let timeline = duration_timeline(&entries);

    if json {
        let timeline: Vec<_> = timeline
            .iter()
            .map(|(date, minutes)| serde_json::json!({ "date": date, "minutes": minutes }))
            .collect();
        let report = serde_json::json!({
            "workouts": entries.len(),
            "totals": totals,
            "calories_by_type": by_type,
            "duration_timeline": timeline,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No data available. Start logging workouts!");
        return Ok(());
    }

    println!("Workouts logged: {}", entries.len());
    println!("Average Workout Duration: {:.2} mins", totals.average_duration);
    println!("Total Workout Time: {:.2} mins", totals.total_duration);
    println!("Total Calories Burned: {:.2} cal", totals.total_calories);

    println!("\nCalories by workout type");
    print_bar_chart(&by_type);

    println!("\nDuration over time (mins)");
    let max = timeline.iter().map(|(_, m)| *m).fold(0.0, f64::max);
    for (date, minutes) in &timeline {
        println!("  {}  {} {:.1}", date, bar(*minutes, max), minutes);
    }
    Ok(())
}

fn print_bar_chart(values: &BTreeMap<String, f64>) {
    let label_width = values.keys().map(|k| k.chars().count()).max().unwrap_or(0);
    let max = values.values().copied().fold(0.0, f64::max);
    for (label, value) in values {
        println!(
            "  {:<width$}  {} {:.2}",
            label,
            bar(*value, max),
            value,
            width = label_width
        );
    }
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    // Any positive value gets at least one block
    let len = ((value / max) * CHART_WIDTH as f64).round() as usize;
    "█".repeat(len.max(1))
}

fn cmd_bmi(height: f64, weight: f64) -> Result<()> {
    let reading = calculate_bmi(height, weight)?;
    println!("Your BMI: {:.2}", reading.bmi);
    println!("Health Status: {}", reading.status);
    Ok(())
}

fn cmd_goal_set(store: &RecordStore, goal: &WeightGoal) -> Result<()> {
    if !goal.is_gain_oriented() {
        eprintln!(
            "Note: current weight is already above the target; progress will show as complete."
        );
    }

    store.save_goal(goal)?;

    println!("✓ Goal saved!");
    print_goal(goal)
}

fn cmd_goal_show(store: &RecordStore) -> Result<()> {
    match store.read_goal()? {
        Some(goal) => print_goal(&goal),
        None => {
            println!("No weight goal set. Use `fitlog goal set` to create one.");
            Ok(())
        }
    }
}

fn print_goal(goal: &WeightGoal) -> Result<()> {
    let reading = calculate_bmi(goal.height_cm, goal.current_weight_kg)?;
    println!("  Target weight:  {:.1} kg", goal.target_weight_kg);
    println!("  Current weight: {:.1} kg", goal.current_weight_kg);
    println!("  Height:         {:.1} cm", goal.height_cm);
    println!("  Started:        {}", goal.start_date);
    println!("  BMI at start:   {:.2} ({})", reading.bmi, reading.status);
    println!("  Progress:       {:.2}%", goal_progress(goal));
    Ok(())
}

fn cmd_targets_set(
    mut config: Config,
    config_path: &std::path::Path,
    calories: f64,
    minutes: f64,
) -> Result<()> {
    config.targets = WeeklyTargets {
        weekly_calories: calories,
        weekly_minutes: minutes,
    };
    config.save_to(config_path)?;

    println!(
        "✓ Goal set: Burn {} calories & work out for {} mins per week!",
        calories, minutes
    );
    Ok(())
}

fn cmd_targets_show(store: &RecordStore, config: &Config, week_of: NaiveDate) -> Result<()> {
    let entries = store.read_all_workouts()?;
    let progress = weekly_progress(&entries, &config.targets, week_of);

    println!("Week of {}: {} workouts", progress.week_start, progress.workouts);
    println!(
        "  Calories: {:.0} / {:.0} cal ({:.1}%)",
        progress.calories, config.targets.weekly_calories, progress.calories_percent
    );
    println!(
        "  Duration: {:.0} / {:.0} mins ({:.1}%)",
        progress.minutes, config.targets.weekly_minutes, progress.minutes_percent
    );
    Ok(())
}

// Input range checks

fn parse_in_range(s: &str, min: f64, max: f64, what: &str) -> std::result::Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a number", what))?;
    if !(min..=max).contains(&value) {
        return Err(format!("{} must be between {} and {}", what, min, max));
    }
    Ok(value)
}

fn parse_height(s: &str) -> std::result::Result<f64, String> {
    parse_in_range(s, 50.0, 250.0, "height")
}

fn parse_weight(s: &str) -> std::result::Result<f64, String> {
    parse_in_range(s, 20.0, 200.0, "weight")
}

fn parse_duration(s: &str) -> std::result::Result<f64, String> {
    parse_in_range(s, 1.0, 300.0, "duration")
}

fn parse_calories(s: &str) -> std::result::Result<f64, String> {
    parse_in_range(s, 1.0, 2000.0, "calories")
}

fn parse_weekly_calories(s: &str) -> std::result::Result<f64, String> {
    parse_in_range(s, 100.0, 10000.0, "weekly calories")
}

fn parse_weekly_minutes(s: &str) -> std::result::Result<f64, String> {
    parse_in_range(s, 10.0, 1000.0, "weekly minutes")
}

fn parse_workout_type(s: &str) -> std::result::Result<String, String> {
    if s.trim().is_empty() {
        return Err("workout type must not be empty".into());
    }
    Ok(s.to_string())
}
