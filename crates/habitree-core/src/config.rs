//! RON configuration for the progression engine
//!
//! Every section falls back to its defaults, so a configuration file only
//! needs to name the values it changes:
//!
//! ```
//! use habitree_core::Config;
//!
//! let config = Config::from_ron_str("(economy: (water_per_tree: 80))").unwrap();
//! assert_eq!(config.economy.water_per_tree, 80);
//! assert_eq!(config.economy.max_priority, 5);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Experience and tree growth ladders
    pub progression: ProgressionConfig,
    /// Tree slot unlocking
    pub slots: SlotConfig,
    /// Weather simulation
    pub weather: WeatherConfig,
    /// Tree moisture dynamics
    pub moisture: MoistureConfig,
    /// Habit water economy
    pub economy: EconomyConfig,
    /// Fixed seed for the weather RNG (derived from the first run time when absent)
    pub rng_seed: Option<u64>,
}

impl Config {
    /// Parse a configuration from a RON string
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let config: Config = ron::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_ron_str(&content)
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        let p = &self.progression;
        if p.starting_experience_required == 0 || p.starting_water_required == 0 {
            return Err(Error::Config("starting thresholds must be positive".into()));
        }
        if self.slots.required_levels.is_empty() {
            return Err(Error::Config("at least one tree slot is required".into()));
        }
        if self.slots.default_tree_name.trim().is_empty() {
            return Err(Error::Config("default tree name must not be empty".into()));
        }

        let w = &self.weather;
        if w.window_days == 0 {
            return Err(Error::Config("weather window must hold at least one day".into()));
        }
        for (name, (low, high)) in [
            ("temperature bounds", w.temperature_bounds),
            ("humidity bounds", w.humidity_bounds),
            ("state bounds", w.state_bounds),
            ("temperature delta", w.temperature_delta),
            ("humidity delta", w.humidity_delta),
            ("state delta", w.state_delta),
        ] {
            finite(name, low)?;
            finite(name, high)?;
            if low > high {
                return Err(Error::Config(format!("{} range is inverted", name)));
            }
        }
        for (name, value) in [
            ("default_temperature", w.default_temperature),
            ("default_humidity", w.default_humidity),
            ("default_state", w.default_state),
            ("humidity_temp_influence", w.humidity_temp_influence),
            ("state_humidity_influence", w.state_humidity_influence),
            ("state_temp_influence", w.state_temp_influence),
            ("drift_temperature", w.drift_temperature),
            ("drift_humidity", w.drift_humidity),
            ("drift_state", w.drift_state),
        ] {
            finite(name, value)?;
        }

        let m = &self.moisture;
        for (name, value) in [
            ("humidity_influence", m.humidity_influence),
            ("temperature_influence", m.temperature_influence),
            ("state_influence", m.state_influence),
            ("very_dry_threshold", m.very_dry_threshold),
            ("dry_threshold", m.dry_threshold),
            ("neutral_threshold", m.neutral_threshold),
            ("healthy_threshold", m.healthy_threshold),
            ("efficiency_reduction", m.efficiency_reduction),
            ("minimum_efficiency", m.minimum_efficiency),
            ("water_to_moisture_ratio", m.water_to_moisture_ratio),
            ("boost_threshold", m.boost_threshold),
            ("boost_multiplier", m.boost_multiplier),
            ("very_dry_water_loss", m.very_dry_water_loss),
            ("dry_water_loss", m.dry_water_loss),
        ] {
            finite(name, value)?;
        }
        if m.water_to_moisture_ratio <= 0.0 {
            return Err(Error::Config("water to moisture ratio must be positive".into()));
        }
        if m.healthy_threshold >= 100.0 {
            return Err(Error::Config("healthy moisture threshold must be below 100".into()));
        }
        Ok(())
    }
}

fn finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::Config(format!("{} must be a finite number", name)))
    }
}

/// Growth ladder settings for the garden and its trees
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProgressionConfig {
    /// Extra experience needed per garden level, as a percentage
    pub experience_growth_percent: u32,
    /// Extra water needed per tree stage, as a percentage
    pub water_growth_percent: u32,
    /// Experience needed for the first level-up
    pub starting_experience_required: u64,
    /// Water needed for a new tree's first stage-up
    pub starting_water_required: u64,
    /// Experience awarded for each rewarded habit completion
    pub experience_per_habit: u64,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            experience_growth_percent: 50,
            water_growth_percent: 50,
            starting_experience_required: 100,
            starting_water_required: 50,
            experience_per_habit: 200,
        }
    }
}

/// Tree slot settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SlotConfig {
    /// Garden level required for each slot, in slot order
    pub required_levels: Vec<u32>,
    /// Name given to trees planted without one
    pub default_tree_name: String,
}

impl SlotConfig {
    /// Number of tree slots in the garden
    pub fn count(&self) -> usize {
        self.required_levels.len()
    }

    /// Garden level needed to unlock a slot
    pub fn required_level(&self, slot: usize) -> Option<u32> {
        self.required_levels.get(slot).copied()
    }
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            required_levels: (1..=10).collect(),
            default_tree_name: "My Tree".to_string(),
        }
    }
}

/// Weather simulation settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Number of days kept in the rolling window
    pub window_days: usize,
    /// Long-run temperature the walk drifts toward
    pub default_temperature: f64,
    /// Long-run humidity the walk drifts toward
    pub default_humidity: f64,
    /// Long-run sky state the walk drifts toward
    pub default_state: f64,
    /// Daily random temperature change range
    pub temperature_delta: (f64, f64),
    /// Daily random humidity change range
    pub humidity_delta: (f64, f64),
    /// Daily random sky state change range
    pub state_delta: (f64, f64),
    /// How much warming dries the air
    pub humidity_temp_influence: f64,
    /// How much humidity changes push the sky state
    pub state_humidity_influence: f64,
    /// How much temperature changes push the sky state
    pub state_temp_influence: f64,
    pub drift_temperature: f64,
    pub drift_humidity: f64,
    pub drift_state: f64,
    pub temperature_bounds: (f64, f64),
    pub humidity_bounds: (f64, f64),
    pub state_bounds: (f64, f64),
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            window_days: 4,
            default_temperature: 25.0,
            default_humidity: 50.0,
            default_state: 30.0,
            temperature_delta: (-5.0, 5.0),
            humidity_delta: (-5.0, 5.0),
            state_delta: (-5.0, 5.0),
            humidity_temp_influence: 0.5,
            state_humidity_influence: 0.4,
            state_temp_influence: 0.2,
            drift_temperature: 0.2,
            drift_humidity: 0.2,
            drift_state: 0.2,
            temperature_bounds: (-5.0, 35.0),
            humidity_bounds: (0.0, 100.0),
            state_bounds: (0.0, 100.0),
        }
    }
}

/// Tree moisture settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct MoistureConfig {
    /// Moisture of a freshly planted tree
    pub starting_moisture: u32,
    pub humidity_influence: f64,
    pub temperature_influence: f64,
    pub state_influence: f64,
    pub very_dry_threshold: f64,
    pub dry_threshold: f64,
    pub neutral_threshold: f64,
    pub healthy_threshold: f64,
    pub very_dry_label: String,
    pub dry_label: String,
    pub neutral_label: String,
    pub healthy_label: String,
    pub too_moist_label: String,
    /// Largest efficiency loss when watering a saturated tree (0.7 = 70%)
    pub efficiency_reduction: f64,
    /// Lowest watering efficiency
    pub minimum_efficiency: f64,
    /// Water units per moisture point
    pub water_to_moisture_ratio: f64,
    /// Below this moisture, watering gives boosted moisture
    pub boost_threshold: f64,
    pub boost_multiplier: f64,
    /// Fraction of the stage requirement lost per very dry day
    pub very_dry_water_loss: f64,
    /// Fraction of the stage requirement lost per dry day
    pub dry_water_loss: f64,
}

impl MoistureConfig {
    /// Display label for a moisture value
    pub fn status_label(&self, moisture: u32) -> &str {
        let m = f64::from(moisture);
        if m < self.very_dry_threshold {
            &self.very_dry_label
        } else if m < self.dry_threshold {
            &self.dry_label
        } else if m < self.neutral_threshold {
            &self.neutral_label
        } else if m < self.healthy_threshold {
            &self.healthy_label
        } else {
            &self.too_moist_label
        }
    }
}

impl Default for MoistureConfig {
    fn default() -> Self {
        Self {
            starting_moisture: 60,
            humidity_influence: 0.3,
            temperature_influence: 0.2,
            state_influence: 0.3,
            very_dry_threshold: 30.0,
            dry_threshold: 50.0,
            neutral_threshold: 70.0,
            healthy_threshold: 90.0,
            very_dry_label: "Very Dry".to_string(),
            dry_label: "Dry".to_string(),
            neutral_label: "Neutral".to_string(),
            healthy_label: "Healthy".to_string(),
            too_moist_label: "Too moist".to_string(),
            efficiency_reduction: 0.7,
            minimum_efficiency: 0.1,
            water_to_moisture_ratio: 2.0,
            boost_threshold: 30.0,
            boost_multiplier: 1.5,
            very_dry_water_loss: 0.15,
            dry_water_loss: 0.05,
        }
    }
}

/// Habit water economy settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Water that can be earned per planted tree each day
    pub water_per_tree: u64,
    /// Highest (least important) priority value; 0 is the most important
    pub max_priority: u8,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            water_per_tree: 50,
            max_priority: 5,
        }
    }
}
