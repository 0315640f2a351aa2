//! Single-row garden state: the garden record, RNG state and metadata.

use chrono::NaiveDate;
use habitree_core::{GameRng, Garden};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored garden record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 1, version = 1)]
#[native_db]
pub struct StoredGarden {
    /// Always "garden" - single row.
    #[primary_key]
    pub id: String,
    pub created_on: NaiveDate,
    pub level: u32,
    pub experience: u64,
    pub experience_required: u64,
    pub water: u64,
    pub daily_water_earned: u64,
    pub daily_pool: u64,
}

impl StoredGarden {
    pub const KEY: &'static str = "garden";

    /// Create from a Garden.
    pub fn from_garden(garden: &Garden) -> Self {
        Self {
            id: Self::KEY.to_string(),
            created_on: garden.created_on,
            level: garden.level,
            experience: garden.experience,
            experience_required: garden.experience_required,
            water: garden.water,
            daily_water_earned: garden.daily_water_earned,
            daily_pool: garden.daily_pool,
        }
    }

    /// Convert to a Garden.
    pub fn to_garden(&self) -> Garden {
        Garden {
            created_on: self.created_on,
            level: self.level,
            experience: self.experience,
            experience_required: self.experience_required,
            water: self.water,
            daily_water_earned: self.daily_water_earned,
            daily_pool: self.daily_pool,
        }
    }
}

/// Stored RNG state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 2, version = 1)]
#[native_db]
pub struct StoredRng {
    /// Always "rng" - single row.
    #[primary_key]
    pub id: String,
    pub state: u64,
}

impl StoredRng {
    pub const KEY: &'static str = "rng";

    pub fn from_rng(rng: &GameRng) -> Self {
        Self {
            id: Self::KEY.to_string(),
            state: rng.state(),
        }
    }

    pub fn to_rng(&self) -> GameRng {
        GameRng::from_state(self.state)
    }
}

/// Stored metadata entry, e.g. the last rollover timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 3, version = 1)]
#[native_db]
pub struct StoredMeta {
    #[primary_key]
    pub key: String,
    pub value: String,
}

impl StoredMeta {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
