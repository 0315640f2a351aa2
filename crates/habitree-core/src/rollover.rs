//! Daily rollover
//!
//! Replays one daily cycle for every whole day that passed since the stored
//! last-run timestamp, one day at a time and in order:
//! weather, tree moisture from that weather, habit reset, earnings reset.

use crate::config::Config;
use crate::error::Result;
use crate::time::whole_days_between;
use crate::world::World;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

/// Meta key holding the last rollover instant (RFC 3339)
pub const LAST_RUN_KEY: &str = "global_last_run";

/// Stored last-run instant, if present and readable
pub fn last_run(world: &World) -> Option<DateTime<Utc>> {
    let raw = world.meta.get(LAST_RUN_KEY)?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(instant) => Some(instant.with_timezone(&Utc)),
        Err(e) => {
            warn!(value = %raw, error = %e, "unreadable last run timestamp");
            None
        }
    }
}

fn set_last_run(world: &mut World, instant: DateTime<Utc>) {
    world
        .meta
        .insert(LAST_RUN_KEY.to_string(), instant.to_rfc3339());
}

/// Advance every system by one simulated day
pub fn run_daily_cycle(world: &mut World, config: &Config) {
    let day = world.weather.simulate(&mut world.rng, &config.weather);
    world.daily_tree_update(&day, config);
    world.habits.reset_daily();
    let pool = world.daily_pool(config);
    world.garden.start_day(pool);
}

/// Run the cycles owed since the last visit
///
/// The first call only records `now`. Later calls advance the stored
/// instant by whole days, so the sub-day remainder carries over.
/// Returns the number of cycles run.
pub fn catch_up(world: &mut World, now: DateTime<Utc>, config: &Config) -> Result<u32> {
    let Some(last) = last_run(world) else {
        set_last_run(world, now);
        return Ok(0);
    };
    if last > now {
        warn!(%last, %now, "last run is in the future; waiting for the clock");
        return Ok(0);
    }

    let days = whole_days_between(last, now);
    if days == 0 {
        return Ok(0);
    }

    for _ in 0..days {
        run_daily_cycle(world, config);
    }
    set_last_run(world, last + Duration::days(i64::from(days)));
    info!(days, "daily rollover");
    Ok(days)
}
