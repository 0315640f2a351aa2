//! Deterministic random number generator for the weather walk
//!
//! Uses xorshift64 so a stored state replays the same weather on every
//! platform. The state is persisted with the rest of the garden; an aborted
//! transaction therefore regenerates identical days on the next attempt.

use serde::{Deserialize, Serialize};

/// A deterministic random number generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRng {
    state: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        // xorshift never leaves the zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Create an RNG from a saved state
    pub fn from_state(state: u64) -> Self {
        Self::new(state)
    }

    /// Get the current state (useful for saving/loading)
    pub fn state(&self) -> u64 {
        self.state
    }

    /// Generate the next raw u64 value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Generate a random f64 in range [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        // top 53 bits keep the result strictly below 1.0
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a random f64 in range [min, max)
    pub fn range_f64(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Uniform draw from an inclusive-exclusive `(low, high)` pair
    pub fn uniform(&mut self, range: (f64, f64)) -> f64 {
        self.range_f64(range.0, range.1)
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::new(12345)
    }
}
