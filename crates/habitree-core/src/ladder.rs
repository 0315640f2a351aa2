//! Leveling ladder shared by garden levels and tree stages
//!
//! A ladder position is a rank, the progress accumulated toward the next
//! rank, and the threshold for that rank. Climbing spends whole thresholds
//! while progress covers them; every step grows the threshold by a fixed
//! percentage rounded to the nearest ten (ties to even).
//!
//! The increase is computed as `required / 100 * percent` in `f64` and the
//! rounding looks at the exact binary value, so 230 at 50% grows by
//! 114.99999999999999 and lands on 340, not 350.

use serde::{Deserialize, Serialize};

/// A position on a growth ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rung {
    /// Current rank (garden level, tree stage), starts at 1
    pub rank: u32,
    /// Progress toward the next rank
    pub progress: u64,
    /// Progress needed for the next rank, always > 0
    pub required: u64,
}

impl Rung {
    /// Start of a ladder with the given first threshold
    pub fn new(required: u64) -> Self {
        Self {
            rank: 1,
            progress: 0,
            required: required.max(1),
        }
    }

    /// True when progress is below the threshold
    pub fn is_normalized(&self) -> bool {
        self.progress < self.required
    }
}

/// Threshold growth rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ladder {
    growth_percent: u32,
}

impl Ladder {
    /// Create a ladder whose threshold grows by `growth_percent` per rank
    pub fn new(growth_percent: u32) -> Self {
        Self { growth_percent }
    }

    /// Threshold for the rank after one with threshold `required`
    pub fn next_required(&self, required: u64) -> u64 {
        let increase = required as f64 / 100.0 * f64::from(self.growth_percent);
        required.saturating_add(round_to_ten(increase) as u64)
    }

    /// Spend accumulated progress on as many ranks as it covers
    ///
    /// Returns the number of ranks gained.
    pub fn climb(&self, rung: &mut Rung) -> u32 {
        rung.required = rung.required.max(1);
        let mut gained = 0;
        while rung.progress >= rung.required {
            rung.progress -= rung.required;
            rung.rank += 1;
            rung.required = self.next_required(rung.required);
            gained += 1;
        }
        gained
    }

    /// Add progress and climb
    pub fn add(&self, rung: &mut Rung, amount: u64) -> u32 {
        rung.progress = rung.progress.saturating_add(amount);
        self.climb(rung)
    }
}

/// Round a non-negative value to the nearest multiple of ten, ties to even
///
/// `%` on `f64` is exact, so values a hair below a tie stay below it.
fn round_to_ten(value: f64) -> f64 {
    let rem = value % 10.0;
    let base = value - rem;
    if rem > 5.0 || (rem == 5.0 && (base / 10.0) % 2.0 == 1.0) {
        base + 10.0
    } else {
        base
    }
}
