//! Habit water economy
//!
//! Each day the garden can earn a fixed pool of water: a share per planted
//! tree plus a small bonus equal to the garden level. The pool is fixed when
//! the day starts (a tree planted during the day adds its share). Completing
//! an active habit pays its priority-weighted share of the pool, clipped to
//! whatever is left of today's limit.

use crate::config::{Config, EconomyConfig};
use crate::error::{Error, Result};
use crate::garden::Garden;
use crate::habit::{Habit, HabitBook};
use crate::ladder::Ladder;
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Water the garden may earn per day
pub fn daily_pool(planted_trees: usize, garden_level: u32, config: &EconomyConfig) -> u64 {
    (planted_trees as u64)
        .saturating_mul(config.water_per_tree)
        .saturating_add(u64::from(garden_level))
}

/// Weight of a priority; priority 0 weighs the most
pub fn habit_weight(priority: u8, config: &EconomyConfig) -> u64 {
    u64::from(config.max_priority.saturating_sub(priority)) + 1
}

/// Floor of `weight / total_weight * pool` over the active habits
pub fn reward_share(habit: &Habit, active: &[&Habit], pool: u64, config: &EconomyConfig) -> u64 {
    let total: u64 = active.iter().map(|h| habit_weight(h.priority, config)).sum();
    if total == 0 {
        return 0;
    }
    let weight = habit_weight(habit.priority, config);
    // widen so weight * pool cannot overflow
    (u128::from(weight) * u128::from(pool) / u128::from(total)) as u64
}

/// Outcome of completing a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Completion {
    /// Active habit completed and paid out
    Rewarded {
        water: u64,
        experience: u64,
        levels_gained: u32,
    },
    /// Habit is not on today's schedule; marked done without a reward
    NotScheduledToday,
    /// Habit was already completed today; nothing changed
    AlreadyCompleted,
}

/// Mark a habit completed and pay its reward
///
/// Nothing is changed when this returns an error.
pub fn complete_habit(
    habits: &mut HabitBook,
    garden: &mut Garden,
    name: &str,
    today: Weekday,
    config: &Config,
) -> Result<Completion> {
    let habit = habits
        .get(name)
        .ok_or_else(|| Error::NotFound(format!("habit '{}'", name)))?;

    if habit.completed {
        return Ok(Completion::AlreadyCompleted);
    }
    if !habit.is_active_on(today) {
        if let Some(habit) = habits.get_mut(name) {
            habit.completed = true;
        }
        return Ok(Completion::NotScheduledToday);
    }

    let pool = garden.daily_pool;
    let headroom = garden.headroom();
    if headroom == 0 {
        return Err(Error::DailyLimitReached {
            earned: garden.daily_water_earned,
            limit: pool,
        });
    }

    let (active, _) = habits.partition(today);
    let share = reward_share(habit, &active, pool, &config.economy);
    let water = share.min(headroom);
    debug!(habit = name, share, headroom, water, "habit reward");

    if let Some(habit) = habits.get_mut(name) {
        habit.completed = true;
    }
    garden.credit_water(water);
    let experience = config.progression.experience_per_habit;
    let ladder = Ladder::new(config.progression.experience_growth_percent);
    let levels_gained = garden.add_experience(experience, &ladder);

    Ok(Completion::Rewarded {
        water,
        experience,
        levels_gained,
    })
}
