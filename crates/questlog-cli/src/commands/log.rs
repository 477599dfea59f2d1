//! Daily log commands for CLI.

use clap::{Args, Subcommand};
use questlog_core::entry::{parse_date, LogEntryInput};
use questlog_core::storage::Database;
use questlog_core::LogRepository;

#[derive(Subcommand)]
pub enum LogAction {
    /// Save the log for a date, replacing any existing entry
    Save(SaveArgs),
    /// Show the log for a date
    Show {
        /// Date (YYYY-MM-DD)
        date: String,
    },
    /// List every logged date
    List {
        /// Print the full entries as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the log for a date
    Delete {
        /// Date (YYYY-MM-DD)
        date: String,
    },
}

#[derive(Args)]
pub struct SaveArgs {
    /// Date (YYYY-MM-DD)
    #[arg(long)]
    date: String,
    /// Lifted weights
    #[arg(long)]
    weighted: bool,
    #[arg(long)]
    cardio: bool,
    /// Planned rest day
    #[arg(long)]
    rest: bool,
    /// Sick or on period
    #[arg(long)]
    sick: bool,
    /// Recorded a clip or photo
    #[arg(long)]
    clip: bool,
    /// Tried a new activity
    #[arg(long)]
    new_activity: bool,
    #[arg(long)]
    injured: bool,
    /// Stuck to the diet
    #[arg(long)]
    diet: bool,
    #[arg(long)]
    showered: bool,
    /// Personal records set
    #[arg(long, default_value = "")]
    prs: String,
    /// Minutes read
    #[arg(long, default_value = "")]
    read: String,
    /// Minutes stretched
    #[arg(long, default_value = "")]
    stretch: String,
    #[arg(long, default_value = "")]
    calories: String,
    /// Protein in grams
    #[arg(long, default_value = "")]
    protein: String,
    /// Workout minutes
    #[arg(long, default_value = "")]
    minutes: String,
    /// Water in ounces
    #[arg(long, default_value = "")]
    water_oz: String,
    /// Water in 8 oz cups (takes precedence over --water-oz)
    #[arg(long, default_value = "")]
    water_cups: String,
    /// Hours slept last night; omit for no data
    #[arg(long, default_value = "")]
    sleep: String,
    /// Mile pace as mm:ss
    #[arg(long, default_value = "")]
    pace: String,
}

impl From<SaveArgs> for LogEntryInput {
    fn from(a: SaveArgs) -> Self {
        LogEntryInput {
            date: a.date,
            weighted_workout: a.weighted,
            cardio: a.cardio,
            rest_day: a.rest,
            sick_or_period: a.sick,
            clip_recorded: a.clip,
            new_activity: a.new_activity,
            injured: a.injured,
            diet_adherence: a.diet,
            showered: a.showered,
            prs_count: a.prs,
            read_minutes: a.read,
            stretching_minutes: a.stretch,
            calories: a.calories,
            protein_total: a.protein,
            workout_minutes: a.minutes,
            water_oz: a.water_oz,
            water_cups: a.water_cups,
            sleep_last_night_hours: a.sleep,
            mile_pace: a.pace,
        }
    }
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;

    match action {
        LogAction::Save(args) => {
            let entry = LogEntryInput::from(args).into_entry()?;
            let date = entry.date;
            let previous = db.save(entry.clone())?;
            if previous.is_some() {
                println!("Log replaced: {date}");
            } else {
                println!("Log saved: {date}");
            }
            println!("{}", serde_json::to_string_pretty(&entry)?);
        }
        LogAction::Show { date } => {
            let date = parse_date(&date)?;
            match db.get(date)? {
                Some(entry) => println!("{}", serde_json::to_string_pretty(&entry)?),
                None => return Err(format!("no log for {date}").into()),
            }
        }
        LogAction::List { json } => {
            let entries = db.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No logs found.");
            } else {
                for e in &entries {
                    let mut tags = Vec::new();
                    if e.weighted_workout {
                        tags.push("weighted");
                    }
                    if e.cardio {
                        tags.push("cardio");
                    }
                    if e.rest_day {
                        tags.push("rest");
                    }
                    if e.sick_or_period {
                        tags.push("sick");
                    }
                    if e.showered {
                        tags.push("shower");
                    }
                    println!("{}  {}", e.date, tags.join(", "));
                }
            }
        }
        LogAction::Delete { date } => {
            let date = parse_date(&date)?;
            if db.delete(date)? {
                println!("Log deleted: {date}");
            } else {
                return Err(format!("no log for {date}").into());
            }
        }
    }
    Ok(())
}
