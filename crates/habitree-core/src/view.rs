//! Dashboard view model
//!
//! Plain serializable data for the request layer to render or send as JSON.

use crate::config::Config;
use crate::economy;
use crate::habit::{DaySet, Habit};
use crate::rollover;
use crate::weather::SkyState;
use crate::world::World;
use chrono::{DateTime, Duration, NaiveDate, Utc, Weekday};
use serde::Serialize;

/// Everything the main page shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub garden: GardenView,
    /// One entry per slot, in slot order
    pub trees: Vec<TreeSlot>,
    pub active_habits: Vec<HabitView>,
    pub scheduled_habits: Vec<HabitView>,
    /// Oldest to newest
    pub weather: Vec<WeatherView>,
    pub time_until_day_ends: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GardenView {
    pub created_on: NaiveDate,
    pub level: u32,
    pub experience: u64,
    pub experience_required: u64,
    pub water: u64,
    pub daily_water_earned: u64,
    pub daily_pool: u64,
    pub remaining_today: u64,
}

/// State of one tree slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TreeSlot {
    Locked { required_level: u32 },
    Open { required_level: u32 },
    Planted { required_level: u32, tree: TreeView },
}

impl TreeSlot {
    pub fn is_planted(&self) -> bool {
        matches!(self, TreeSlot::Planted { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeView {
    pub name: String,
    pub stage: u32,
    pub water: u64,
    pub water_required: u64,
    pub last_watered: DateTime<Utc>,
    pub moisture: u32,
    pub moisture_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HabitView {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub priority: u8,
    pub days: DaySet,
    pub completed: bool,
    /// Water a completion would pay right now; only for today's habits
    pub projected_water: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    pub temperature: f64,
    pub humidity: f64,
    pub state: f64,
    pub sky: SkyState,
    pub label: &'static str,
}

impl Dashboard {
    /// Build the view from a loaded world
    pub fn build(world: &World, config: &Config, now: DateTime<Utc>, today: Weekday) -> Self {
        let garden = &world.garden;
        let pool = garden.daily_pool;
        let remaining = garden.headroom();

        let trees = (0..config.slots.count())
            .map(|slot| {
                let required_level = config.slots.required_level(slot).unwrap_or(u32::MAX);
                match world.trees().get(slot) {
                    Some(tree) if garden.level >= required_level => TreeSlot::Planted {
                        required_level,
                        tree: TreeView {
                            name: tree.name.clone(),
                            stage: tree.stage,
                            water: tree.water,
                            water_required: tree.water_required,
                            last_watered: tree.last_watered,
                            moisture: tree.moisture,
                            moisture_status: config.moisture.status_label(tree.moisture).to_string(),
                        },
                    },
                    _ if garden.level >= required_level => TreeSlot::Open { required_level },
                    _ => TreeSlot::Locked { required_level },
                }
            })
            .collect();

        let (active, scheduled) = world.habits.partition(today);
        let habit_view = |habit: &Habit, projected: Option<u64>| HabitView {
            name: habit.name.clone(),
            created_at: habit.created_at,
            priority: habit.priority,
            days: habit.days,
            completed: habit.completed,
            projected_water: projected,
        };
        let active_habits = active
            .iter()
            .map(|h| {
                let share = economy::reward_share(h, &active, pool, &config.economy);
                let projected = (!h.completed).then_some(share.min(remaining));
                habit_view(*h, projected)
            })
            .collect();
        let scheduled_habits = scheduled.iter().map(|h| habit_view(*h, None)).collect();

        let weather = world
            .weather
            .iter()
            .map(|d| WeatherView {
                temperature: d.temperature,
                humidity: d.humidity,
                state: d.state,
                sky: d.sky(),
                label: d.sky().label(),
            })
            .collect();

        Self {
            garden: GardenView {
                created_on: garden.created_on,
                level: garden.level,
                experience: garden.experience,
                experience_required: garden.experience_required,
                water: garden.water,
                daily_water_earned: garden.daily_water_earned,
                daily_pool: pool,
                remaining_today: remaining,
            },
            trees,
            active_habits,
            scheduled_habits,
            weather,
            time_until_day_ends: time_until_day_ends(rollover::last_run(world), now),
        }
    }
}

/// "Xh Ym" until the next rollover, "Day ended" once due, "Unknown" before the first run
pub fn time_until_day_ends(last_run: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last_run) = last_run else {
        return "Unknown".to_string();
    };
    let next_day = last_run + Duration::days(1);
    if now >= next_day {
        return "Day ended".to_string();
    }
    let left = next_day - now;
    format!("{}h {}m", left.num_hours(), left.num_minutes() % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::habit::HabitSpec;
    use chrono::TimeZone;

    fn monday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap()
    }

    fn world() -> (World, Config) {
        let config = Config {
            rng_seed: Some(1),
            ..Config::default()
        };
        let mut world = World::new();
        world.initialize(monday(), &config);
        rollover::catch_up(&mut world, monday(), &config).unwrap();
        (world, config)
    }

    #[test]
    fn test_tree_slots() {
        let (mut world, config) = world();
        world.garden.level = 2;
        world.plant_tree("Oak", monday(), &config).unwrap();

        let dash = Dashboard::build(&world, &config, monday(), Weekday::Mon);

        assert_eq!(dash.trees.len(), 10);
        assert!(dash.trees[0].is_planted());
        assert_eq!(dash.trees[1], TreeSlot::Open { required_level: 2 });
        assert_eq!(dash.trees[2], TreeSlot::Locked { required_level: 3 });
        if let TreeSlot::Planted { tree, .. } = &dash.trees[0] {
            assert_eq!(tree.name, "Oak");
            assert_eq!(tree.moisture_status, "Neutral");
        }
    }

    #[test]
    fn test_habit_partition_and_projection() {
        let (mut world, config) = world();
        world.plant_tree("Oak", monday(), &config).unwrap();
        let weekdays: DaySet = "Mon,Tue,Wed,Thu,Fri".parse().unwrap();
        world
            .habits
            .add(HabitSpec::new("Meditate", 0, weekdays), monday(), 5)
            .unwrap();
        world
            .habits
            .add(HabitSpec::new("Floss", 5, weekdays), monday(), 5)
            .unwrap();
        world
            .habits
            .add(HabitSpec::new("Hike", 1, "Sat".parse().unwrap()), monday(), 5)
            .unwrap();

        let dash = Dashboard::build(&world, &config, monday(), Weekday::Mon);

        assert_eq!(dash.garden.daily_pool, 51);
        assert_eq!(dash.active_habits.len(), 2);
        assert_eq!(dash.active_habits[0].projected_water, Some(43));
        assert_eq!(dash.active_habits[1].projected_water, Some(7));
        assert_eq!(dash.scheduled_habits[0].name, "Hike");
        assert_eq!(dash.scheduled_habits[0].projected_water, None);
    }

    #[test]
    fn test_weather_labels() {
        let (world, config) = world();
        let dash = Dashboard::build(&world, &config, monday(), Weekday::Mon);
        assert_eq!(dash.weather.len(), 4);
        assert_eq!(dash.weather[0].label, "Partly Cloudy");
    }

    #[test]
    fn test_time_until_day_ends() {
        let last = monday();
        assert_eq!(time_until_day_ends(None, last), "Unknown");
        assert_eq!(
            time_until_day_ends(Some(last), last + Duration::minutes(90)),
            "22h 30m"
        );
        assert_eq!(
            time_until_day_ends(Some(last), last + Duration::days(1)),
            "Day ended"
        );
    }
}
