use clap::Subcommand;
use questlog_core::Axis;

use super::load_report;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Lifetime stat totals
    Totals {
        #[arg(long)]
        json: bool,
    },
    /// Per-date derived series (hygiene, streaks, week)
    Series,
    /// Per-date scores with multipliers
    Scores,
    /// Hidden trait unlocks
    Traits {
        #[arg(long)]
        json: bool,
    },
    /// Explanation of the most recent day's gains
    Today {
        #[arg(long)]
        json: bool,
    },
    /// Weekly balance and today's vitals
    Dashboard {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let report = load_report()?;

    match action {
        StatsAction::Totals { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report.totals)?);
            } else {
                for (axis, value) in report.totals.stats.iter() {
                    println!("{:<4} {value}", axis.code());
                }
                println!("Max streak: {}", report.totals.max_streak);
            }
        }
        StatsAction::Series => {
            println!("{}", serde_json::to_string_pretty(&report.series)?);
        }
        StatsAction::Scores => {
            println!("{}", serde_json::to_string_pretty(&report.scores)?);
        }
        StatsAction::Traits { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&report.traits)?);
            } else {
                for (name, unlocked) in report.traits.entries() {
                    let mark = if unlocked { "x" } else { " " };
                    println!("[{mark}] {name}");
                }
            }
        }
        StatsAction::Today { json } => {
            let Some(explanation) = report.explanation else {
                println!("No logs yet.");
                return Ok(());
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&explanation)?);
                return Ok(());
            }
            println!("Today: {}", explanation.date);
            for notice in &explanation.global {
                println!("  {}", notice.text);
            }
            for axis in Axis::ALL {
                let badges: Vec<&str> = explanation
                    .notices_for(axis)
                    .iter()
                    .map(|n| n.text.as_str())
                    .collect();
                if !badges.is_empty() {
                    println!("{:<4} {}", axis.code(), badges.join("  "));
                }
            }
        }
        StatsAction::Dashboard { json } => {
            let dashboard = report.dashboard;
            if json {
                println!("{}", serde_json::to_string_pretty(&dashboard)?);
                return Ok(());
            }
            let w = &dashboard.weekly;
            println!(
                "Weekly workouts: {}/{} ({})",
                w.workout_days,
                w.workout_target,
                w.workout_advice()
            );
            println!("Weekly rests: {}/{} ({})", w.rest_days, w.rest_target, w.rest_advice());
            println!("Sick/period (7 logged days): {}", w.sick_days);
            println!("Overtraining: {}", w.overtraining_label());
            match &dashboard.beginners_luck_started {
                Some(start) => println!("Beginner's Luck: unlocked ({start})"),
                None => println!("Beginner's Luck: locked"),
            }
            if let Some(best) = &dashboard.best_mile_pace {
                println!("Best mile pace: {best}");
            }
            if let Some(v) = &dashboard.today {
                println!("Today ({}):", v.date);
                println!("  Calories: {}/{}", v.calories, v.maintenance_calories);
                println!("  HP: {}{}", v.hp, if v.injured { " (injured)" } else { "" });
                println!("  Sleep: {}", v.sleep_label());
                println!("  Protein: {}/{} g", v.protein_g, v.protein_target);
                println!("  Minutes: {}", v.workout_minutes);
                println!("  Pace: {}", v.mile_pace.as_deref().unwrap_or("-"));
                println!("  Diet streak: {}", v.diet_streak);
                println!("  Hygiene: {}%", v.hygiene);
                println!("  Water: {}/{} oz", v.water_oz, v.water_target_oz);
            }
        }
    }
    Ok(())
}
