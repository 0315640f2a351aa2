//! Garden record: level, experience and the water reserve

use crate::config::ProgressionConfig;
use crate::error::{Error, Result};
use crate::ladder::{Ladder, Rung};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

/// The singleton garden
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Garden {
    /// Day the garden was created
    pub created_on: NaiveDate,
    /// Garden level, starts at 1
    pub level: u32,
    /// Experience toward the next level
    pub experience: u64,
    /// Experience needed for the next level
    pub experience_required: u64,
    /// Spendable water reserve
    pub water: u64,
    /// Water earned from habits since the last rollover
    pub daily_water_earned: u64,
    /// Cap on today's habit water, fixed when the day starts
    pub daily_pool: u64,
}

impl Garden {
    /// A fresh level 1 garden
    pub fn new(created_on: NaiveDate, progression: &ProgressionConfig) -> Self {
        Self {
            created_on,
            level: 1,
            experience: 0,
            experience_required: progression.starting_experience_required.max(1),
            water: 0,
            daily_water_earned: 0,
            daily_pool: 0,
        }
    }

    fn rung(&self) -> Rung {
        Rung {
            rank: self.level,
            progress: self.experience,
            required: self.experience_required,
        }
    }

    /// Add experience and apply every level-up it pays for
    ///
    /// Returns the number of levels gained.
    pub fn add_experience(&mut self, amount: u64, ladder: &Ladder) -> u32 {
        let mut rung = self.rung();
        let gained = ladder.add(&mut rung, amount);
        self.level = rung.rank;
        self.experience = rung.progress;
        self.experience_required = rung.required;

        if gained > 0 {
            info!(level = self.level, gained, "garden leveled up");
        }
        gained
    }

    /// Credit water earned from a habit
    pub fn credit_water(&mut self, amount: u64) {
        self.water = self.water.saturating_add(amount);
        self.daily_water_earned = self.daily_water_earned.saturating_add(amount);
    }

    /// Take water from the reserve
    pub fn spend_water(&mut self, amount: u64) -> Result<()> {
        if amount > self.water {
            return Err(Error::InsufficientResource {
                requested: amount,
                available: self.water,
            });
        }
        self.water -= amount;
        Ok(())
    }

    /// Open a new day: forget today's earnings and fix the cap
    ///
    /// Level-ups during the day leave the cap alone until the next call.
    pub fn start_day(&mut self, pool: u64) {
        self.daily_water_earned = 0;
        self.daily_pool = pool;
    }

    /// Water that can still be earned today
    pub fn headroom(&self) -> u64 {
        self.daily_pool.saturating_sub(self.daily_water_earned)
    }
}

impl Default for Garden {
    fn default() -> Self {
        Self::new(NaiveDate::default(), &ProgressionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_experience_scenario() {
        let mut garden = Garden::default();
        let ladder = Ladder::new(50);

        let gained = garden.add_experience(250, &ladder);

        assert_eq!(gained, 2);
        assert_eq!(garden.level, 3);
        assert_eq!(garden.experience, 0);
        assert_eq!(garden.experience_required, 230);
    }

    #[test]
    fn test_experience_stays_below_threshold() {
        let ladder = Ladder::new(50);
        let mut garden = Garden::default();
        for award in [1, 50, 99, 200, 200, 5000, 3] {
            garden.add_experience(award, &ladder);
            assert!(garden.experience < garden.experience_required);
        }
    }

    #[test]
    fn test_spend_water() {
        let mut garden = Garden::default();
        garden.credit_water(30);
        assert_eq!(garden.daily_water_earned, 30);

        assert!(garden.spend_water(20).is_ok());
        assert_eq!(garden.water, 10);

        let err = garden.spend_water(11).unwrap_err();
        assert_eq!(
            err,
            Error::InsufficientResource {
                requested: 11,
                available: 10
            }
        );
        assert_eq!(garden.water, 10);

        garden.start_day(51);
        assert_eq!(garden.daily_water_earned, 0);
        assert_eq!(garden.headroom(), 51);
        assert_eq!(garden.water, 10);
    }

    #[test]
    fn test_level_up_keeps_daily_pool() {
        let mut garden = Garden::default();
        garden.start_day(51);
        garden.credit_water(51);

        garden.add_experience(200, &Ladder::new(50));

        assert_eq!(garden.level, 2);
        assert_eq!(garden.daily_pool, 51);
        assert_eq!(garden.headroom(), 0);
    }
}
