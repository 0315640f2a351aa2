//! Rolling-window weather simulation
//!
//! Each day is derived from the previous one by a random walk with drift:
//! temperature moves first, humidity reacts to the temperature change, and
//! the sky state reacts to both. Drift terms pull every value back toward
//! its long-run default, and every value is clamped to its bounds.

use crate::config::WeatherConfig;
use crate::rng::GameRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use tracing::debug;

/// One simulated day of weather
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    /// Sequence number of the day since the garden started (0 = seed day)
    pub day: u64,
    pub temperature: f64,
    pub humidity: f64,
    /// Continuous sky state, 0 (clear) to 100 (storm)
    pub state: f64,
}

impl WeatherDay {
    /// Discrete sky label for this day
    pub fn sky(&self) -> SkyState {
        SkyState::from_value(self.state)
    }
}

/// Sky label derived from the continuous state by quintile bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkyState {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rainy,
    Thunderstorm,
}

impl SkyState {
    /// Map a 0-100 state value to its band
    pub fn from_value(state: f64) -> Self {
        if state <= 20.0 {
            SkyState::Sunny
        } else if state <= 40.0 {
            SkyState::PartlyCloudy
        } else if state <= 60.0 {
            SkyState::Cloudy
        } else if state <= 80.0 {
            SkyState::Rainy
        } else {
            SkyState::Thunderstorm
        }
    }

    /// Display text
    pub fn label(&self) -> &'static str {
        match self {
            SkyState::Sunny => "Sunny",
            SkyState::PartlyCloudy => "Partly Cloudy",
            SkyState::Cloudy => "Cloudy",
            SkyState::Rainy => "Rainy",
            SkyState::Thunderstorm => "Thunderstorm",
        }
    }
}

impl fmt::Display for SkyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn clamp(value: f64, bounds: (f64, f64)) -> f64 {
    value.clamp(bounds.0, bounds.1)
}

/// Recent weather, oldest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherWindow {
    days: VecDeque<WeatherDay>,
}

impl WeatherWindow {
    /// An empty window
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a window from stored days in any order
    pub fn from_days(days: impl IntoIterator<Item = WeatherDay>) -> Self {
        let mut days: Vec<WeatherDay> = days.into_iter().collect();
        days.sort_by_key(|d| d.day);
        Self { days: days.into() }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Most recent day
    pub fn latest(&self) -> Option<&WeatherDay> {
        self.days.back()
    }

    /// Days oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &WeatherDay> {
        self.days.iter()
    }

    /// Generate the next day and evict anything beyond the window size
    ///
    /// An empty window is seeded with the configured defaults instead.
    pub fn simulate(&mut self, rng: &mut GameRng, config: &WeatherConfig) -> WeatherDay {
        let next = match self.days.back() {
            None => WeatherDay {
                day: 0,
                temperature: clamp(config.default_temperature, config.temperature_bounds),
                humidity: clamp(config.default_humidity, config.humidity_bounds),
                state: clamp(config.default_state, config.state_bounds),
            },
            Some(prev) => next_day(prev, rng, config),
        };

        debug!(
            day = next.day,
            temperature = next.temperature,
            humidity = next.humidity,
            state = next.state,
            "weather simulated"
        );

        self.days.push_back(next);
        while self.days.len() > config.window_days.max(1) {
            self.days.pop_front();
        }
        next
    }

    /// Simulate until the window is full
    pub fn fill(&mut self, rng: &mut GameRng, config: &WeatherConfig) {
        while self.days.len() < config.window_days.max(1) {
            self.simulate(rng, config);
        }
    }
}

fn next_day(prev: &WeatherDay, rng: &mut GameRng, c: &WeatherConfig) -> WeatherDay {
    let temperature = clamp(
        prev.temperature
            + rng.uniform(c.temperature_delta)
            + c.drift_temperature * (c.default_temperature - prev.temperature),
        c.temperature_bounds,
    );
    let temp_change = temperature - prev.temperature;

    let humidity = clamp(
        prev.humidity + rng.uniform(c.humidity_delta)
            - c.humidity_temp_influence * temp_change
            + c.drift_humidity * (c.default_humidity - prev.humidity),
        c.humidity_bounds,
    );

    let state = clamp(
        prev.state
            + rng.uniform(c.state_delta)
            + c.state_humidity_influence * (humidity - prev.humidity)
            + c.state_temp_influence * temp_change
            + c.drift_state * (c.default_state - prev.state),
        c.state_bounds,
    );

    WeatherDay {
        day: prev.day + 1,
        temperature,
        humidity,
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_day() {
        let mut window = WeatherWindow::new();
        let mut rng = GameRng::new(1);
        let day = window.simulate(&mut rng, &WeatherConfig::default());

        assert_eq!(day.day, 0);
        assert_eq!(day.temperature, 25.0);
        assert_eq!(day.humidity, 50.0);
        assert_eq!(day.state, 30.0);
        assert_eq!(day.sky(), SkyState::PartlyCloudy);
    }

    #[test]
    fn test_bounds_over_many_days() {
        let config = WeatherConfig::default();
        let mut window = WeatherWindow::new();
        let mut rng = GameRng::new(2024);

        for _ in 0..10_000 {
            let d = window.simulate(&mut rng, &config);
            assert!((-5.0..=35.0).contains(&d.temperature));
            assert!((0.0..=100.0).contains(&d.humidity));
            assert!((0.0..=100.0).contains(&d.state));
        }
    }

    #[test]
    fn test_bounds_hold_with_wild_deltas() {
        let config = WeatherConfig {
            temperature_delta: (-80.0, 80.0),
            humidity_delta: (-80.0, 80.0),
            state_delta: (-80.0, 80.0),
            ..WeatherConfig::default()
        };
        let mut window = WeatherWindow::new();
        let mut rng = GameRng::new(3);

        for _ in 0..10_000 {
            let d = window.simulate(&mut rng, &config);
            assert!(d.temperature >= config.temperature_bounds.0);
            assert!(d.temperature <= config.temperature_bounds.1);
            assert!(d.humidity >= 0.0 && d.humidity <= 100.0);
            assert!(d.state >= 0.0 && d.state <= 100.0);
        }
    }

    #[test]
    fn test_window_size_and_order() {
        let config = WeatherConfig::default();
        let mut window = WeatherWindow::new();
        let mut rng = GameRng::new(5);

        window.fill(&mut rng, &config);
        assert_eq!(window.len(), 4);

        for _ in 0..10 {
            window.simulate(&mut rng, &config);
        }

        assert_eq!(window.len(), 4);
        let days: Vec<u64> = window.iter().map(|d| d.day).collect();
        assert_eq!(days, vec![10, 11, 12, 13]);
        assert_eq!(window.latest().map(|d| d.day), Some(13));
    }

    #[test]
    fn test_same_seed_same_weather() {
        let config = WeatherConfig::default();
        let mut a = WeatherWindow::new();
        let mut b = WeatherWindow::new();
        let mut rng_a = GameRng::new(77);
        let mut rng_b = GameRng::new(77);

        for _ in 0..20 {
            a.simulate(&mut rng_a, &config);
            b.simulate(&mut rng_b, &config);
        }
        assert_eq!(a, b);
    }

    #[test]
    fn test_drift_pulls_toward_default() {
        let config = WeatherConfig {
            temperature_delta: (0.0, 0.0),
            humidity_delta: (0.0, 0.0),
            state_delta: (0.0, 0.0),
            ..WeatherConfig::default()
        };
        let mut window = WeatherWindow::from_days([WeatherDay {
            day: 0,
            temperature: 35.0,
            humidity: 50.0,
            state: 30.0,
        }]);
        let mut rng = GameRng::new(9);

        let next = window.simulate(&mut rng, &config);
        // 35 + 0.2 * (25 - 35)
        assert!((next.temperature - 33.0).abs() < 1e-9);
        // warming fell by 2, so humidity rises by 0.5 * 2
        assert!((next.humidity - 51.0).abs() < 1e-9);
        // 0.4 * 1 + 0.2 * -2
        assert!((next.state - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_sky_bands() {
        assert_eq!(SkyState::from_value(0.0), SkyState::Sunny);
        assert_eq!(SkyState::from_value(20.0), SkyState::Sunny);
        assert_eq!(SkyState::from_value(20.5), SkyState::PartlyCloudy);
        assert_eq!(SkyState::from_value(55.0), SkyState::Cloudy);
        assert_eq!(SkyState::from_value(61.0), SkyState::Rainy);
        assert_eq!(SkyState::from_value(100.0), SkyState::Thunderstorm);
        assert_eq!(SkyState::Thunderstorm.to_string(), "Thunderstorm");
    }
}
