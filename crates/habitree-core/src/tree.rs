//! Trees: stage growth from water and moisture dynamics

use crate::config::{MoistureConfig, ProgressionConfig, WeatherConfig};
use crate::ladder::{Ladder, Rung};
use crate::weather::WeatherDay;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// Stable identity of a planted tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreeId(pub u64);

impl TreeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TreeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tree:{}", self.0)
    }
}

/// A planted tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tree {
    pub id: TreeId,
    pub name: String,
    pub planted_at: DateTime<Utc>,
    /// Growth stage, starts at 1
    pub stage: u32,
    /// Water accumulated toward the next stage
    pub water: u64,
    /// Water needed for the next stage
    pub water_required: u64,
    pub last_watered: DateTime<Utc>,
    /// Soil moisture, 0-100
    pub moisture: u32,
}

/// What a watering did to a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watering {
    /// Water taken from the garden reserve
    pub spent: u64,
    /// Water that counted toward growth
    pub effective: u64,
    /// Moisture after watering
    pub moisture: u32,
    /// Stage after watering
    pub stage: u32,
    pub stages_gained: u32,
}

impl Tree {
    /// A freshly planted stage 1 tree
    pub fn new(
        id: TreeId,
        name: impl Into<String>,
        now: DateTime<Utc>,
        progression: &ProgressionConfig,
        moisture: &MoistureConfig,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            planted_at: now,
            stage: 1,
            water: 0,
            water_required: progression.starting_water_required.max(1),
            last_watered: now,
            moisture: moisture.starting_moisture.min(100),
        }
    }

    /// Spend stored water on as many stages as it covers
    pub fn check_growth(&mut self, ladder: &Ladder) -> u32 {
        let mut rung = Rung {
            rank: self.stage,
            progress: self.water,
            required: self.water_required,
        };
        let gained = ladder.climb(&mut rung);
        self.stage = rung.rank;
        self.water = rung.progress;
        self.water_required = rung.required;

        if gained > 0 {
            info!(tree = %self.id, stage = self.stage, gained, "tree grew");
        }
        gained
    }

    /// Apply `amount` of water; the caller has already debited the reserve
    pub fn absorb(
        &mut self,
        amount: u64,
        now: DateTime<Utc>,
        config: &MoistureConfig,
        ladder: &Ladder,
    ) -> Watering {
        let efficiency = water_efficiency(self.moisture, config);
        let effective = (amount as f64 * efficiency).floor() as u64;
        let gain = moisture_gain(self.moisture, amount, config);
        let moisture = (f64::from(self.moisture) + gain).clamp(0.0, 100.0) as u32;

        debug!(
            tree = %self.id,
            amount,
            efficiency,
            effective,
            moisture,
            "watering tree"
        );

        self.water = self.water.saturating_add(effective);
        self.moisture = moisture;
        self.last_watered = now;
        let stages_gained = self.check_growth(ladder);

        Watering {
            spent: amount,
            effective,
            moisture: self.moisture,
            stage: self.stage,
            stages_gained,
        }
    }

    /// Move moisture with the day's weather and lose water when dry
    ///
    /// Returns the water lost.
    pub fn apply_weather(
        &mut self,
        day: &WeatherDay,
        config: &MoistureConfig,
        weather: &WeatherConfig,
    ) -> u64 {
        let moisture = (f64::from(self.moisture)
            + config.humidity_influence * (day.humidity - weather.default_humidity)
            + config.state_influence * (day.state - weather.default_state)
            - config.temperature_influence * (day.temperature - weather.default_temperature))
            .clamp(0.0, 100.0);
        self.moisture = moisture as u32;

        let fraction = if moisture < config.very_dry_threshold {
            config.very_dry_water_loss
        } else if moisture < config.dry_threshold {
            config.dry_water_loss
        } else {
            0.0
        };
        let loss = (self.water_required as f64 * fraction).floor() as u64;
        let lost = loss.min(self.water);
        self.water -= lost;
        lost
    }
}

/// Share of poured water that counts toward growth
///
/// Full efficiency up to the healthy threshold, then a linear penalty up to
/// the configured reduction at 100 moisture, never below the minimum.
pub fn water_efficiency(moisture: u32, config: &MoistureConfig) -> f64 {
    let m = f64::from(moisture);
    if m <= config.healthy_threshold {
        return 1.0;
    }
    let excess = m - config.healthy_threshold;
    let max_excess = 100.0 - config.healthy_threshold;
    let penalty = excess / max_excess * config.efficiency_reduction;
    (1.0 - penalty).max(config.minimum_efficiency)
}

/// Moisture points gained from pouring `amount` of water
pub fn moisture_gain(moisture: u32, amount: u64, config: &MoistureConfig) -> f64 {
    let base = amount as f64 / config.water_to_moisture_ratio;
    if f64::from(moisture) < config.boost_threshold {
        base * config.boost_multiplier
    } else {
        base
    }
}
