//! Daily Garden Demo
//!
//! One visit to a persistent garden: settle the missed days, tick off
//! today's habits, pour the earned water on the first tree and print the
//! dashboard. Run it again tomorrow to watch the garden move on.
//!
//! Environment:
//! - `HABITREE_DB`: database file (default `habitree.db`)
//! - `HABITREE_CONFIG`: RON configuration file, e.g. `demos/daily_garden/garden.ron`
//!   (defaults when unset)
//! - `RUST_LOG`: log filter (default `info`)

use habitree_core::{
    Completion, Config, DaySet, Engine, Error, HabitSpec, Result, SystemClock, TreeSlot,
};
use habitree_db::Store;
use tracing::{info, warn};

const DEFAULT_DB: &str = "habitree.db";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::var("HABITREE_CONFIG") {
        Ok(path) => Config::load(path)?,
        Err(_) => Config::default(),
    };
    let db_path = std::env::var("HABITREE_DB").unwrap_or_else(|_| DEFAULT_DB.to_string());
    let store = Store::open(&db_path)?;
    let engine = Engine::open(store, SystemClock, config)?;

    let days = engine.catch_up()?;
    println!("=== Habitree: Daily Garden ===\n");
    println!("Days since last visit: {}", days);

    let dash = engine.dashboard()?;
    if dash.active_habits.is_empty() && dash.scheduled_habits.is_empty() {
        info!("seeding starter habits");
        engine.add_habit(HabitSpec::new("Drink water", 0, DaySet::every_day()))?;
        engine.add_habit(HabitSpec::new("Stretch", 2, "Mon,Wed,Fri".parse()?))?;
        engine.add_habit(HabitSpec::new("Long walk", 4, "Sat,Sun".parse()?))?;
    }
    if !dash.trees.iter().any(TreeSlot::is_planted) {
        let slot = engine.plant_tree()?;
        println!("Planted a tree in slot {}", slot);
    }

    let dash = engine.dashboard()?;
    for habit in dash.active_habits.iter().filter(|h| !h.completed) {
        match engine.complete_habit(&habit.name) {
            Ok(Completion::Rewarded {
                water,
                experience,
                levels_gained,
            }) => {
                println!(
                    "Completed '{}': +{} water, +{} XP{}",
                    habit.name,
                    water,
                    experience,
                    if levels_gained > 0 { " (level up!)" } else { "" }
                );
            }
            Ok(other) => println!("Completed '{}': {:?}", habit.name, other),
            Err(Error::DailyLimitReached { earned, limit }) => {
                println!("Daily water limit reached ({}/{})", earned, limit);
                break;
            }
            Err(e) => return Err(e),
        }
    }

    let water = engine.dashboard()?.garden.water;
    if water > 0 {
        match engine.water_tree(0, water) {
            Ok(w) => println!(
                "Watered slot 0 with {} ({} absorbed), stage {}, moisture {}",
                w.spent, w.effective, w.stage, w.moisture
            ),
            Err(e) => warn!(error = %e, "could not water the first tree"),
        }
    }

    print_dashboard(&engine)?;
    Ok(())
}

fn print_dashboard(engine: &Engine<Store>) -> Result<()> {
    let dash = engine.dashboard()?;
    let g = &dash.garden;

    println!("\n--- Garden (since {}) ---", g.created_on);
    println!(
        "Level {}  XP {}/{}  Water {}",
        g.level, g.experience, g.experience_required, g.water
    );
    println!(
        "Earned today {}/{} (remaining {})",
        g.daily_water_earned, g.daily_pool, g.remaining_today
    );
    println!("Day ends in: {}", dash.time_until_day_ends);

    println!("\n--- Trees ---");
    for (slot, entry) in dash.trees.iter().enumerate() {
        match entry {
            TreeSlot::Planted { tree, .. } => println!(
                "  [{}] {} - stage {}, water {}/{}, moisture {} ({})",
                slot,
                tree.name,
                tree.stage,
                tree.water,
                tree.water_required,
                tree.moisture,
                tree.moisture_status
            ),
            TreeSlot::Open { .. } => println!("  [{}] empty", slot),
            TreeSlot::Locked { required_level } => {
                println!("  [{}] locked until level {}", slot, required_level)
            }
        }
    }

    println!("\n--- Habits today ---");
    for h in &dash.active_habits {
        let mark = if h.completed { "x" } else { " " };
        let projected = h
            .projected_water
            .map(|w| format!(" (+{} water)", w))
            .unwrap_or_default();
        println!("  [{}] {} (priority {}){}", mark, h.name, h.priority, projected);
    }
    println!("--- Other days ---");
    for h in &dash.scheduled_habits {
        println!("  {} on {}", h.name, h.days);
    }

    println!("\n--- Weather ---");
    for day in &dash.weather {
        println!(
            "  {:>5.1}C  humidity {:>5.1}%  {}",
            day.temperature, day.humidity, day.label
        );
    }
    Ok(())
}
