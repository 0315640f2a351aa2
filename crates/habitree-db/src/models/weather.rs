//! Weather window rows, one per simulated day.

use habitree_core::WeatherDay;
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored weather day.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 5, version = 1)]
#[native_db]
pub struct StoredWeather {
    /// Primary key - simulated day number.
    #[primary_key]
    pub day: u64,
    pub temperature: f64,
    pub humidity: f64,
    pub state: f64,
}

impl StoredWeather {
    pub fn from_day(day: &WeatherDay) -> Self {
        Self {
            day: day.day,
            temperature: day.temperature,
            humidity: day.humidity,
            state: day.state,
        }
    }

    pub fn to_day(&self) -> WeatherDay {
        WeatherDay {
            day: self.day,
            temperature: self.temperature,
            humidity: self.humidity,
            state: self.state,
        }
    }
}
