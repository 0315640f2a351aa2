//! Habit models for database storage.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use habitree_core::{DaySet, Habit};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored habit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 6, version = 1)]
#[native_db]
pub struct StoredHabit {
    /// Primary key - habit name.
    #[primary_key]
    pub name: String,
    /// Creation order within the habit list.
    #[secondary_key]
    pub position: u32,
    pub created_at: DateTime<Utc>,
    pub priority: u8,
    /// Weekday bitmask, Monday in the lowest bit.
    pub days: u8,
    pub completed: bool,
}

impl StoredHabit {
    /// Create from a Habit at its list position.
    pub fn from_habit(habit: &Habit, position: u32) -> Self {
        Self {
            name: habit.name.clone(),
            position,
            created_at: habit.created_at,
            priority: habit.priority,
            days: habit.days.bits(),
            completed: habit.completed,
        }
    }

    /// Convert to a Habit.
    pub fn to_habit(&self) -> Result<Habit> {
        if self.days == 0 || self.days > DaySet::every_day().bits() {
            return Err(Error::Corrupt(format!(
                "habit '{}' has invalid day mask {:#04x}",
                self.name, self.days
            )));
        }
        Ok(Habit {
            name: self.name.clone(),
            created_at: self.created_at,
            priority: self.priority,
            days: DaySet::from_bits(self.days),
            completed: self.completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn habit() -> Habit {
        Habit {
            name: "Read".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap(),
            priority: 2,
            days: "Mon,Wed".parse().unwrap(),
            completed: true,
        }
    }

    #[test]
    fn test_habit_conversion() {
        let stored = StoredHabit::from_habit(&habit(), 3);
        assert_eq!(stored.position, 3);
        assert_eq!(stored.days, 0b101);
        assert_eq!(stored.to_habit().unwrap(), habit());
    }

    #[test]
    fn test_bad_day_mask() {
        let mut stored = StoredHabit::from_habit(&habit(), 0);
        stored.days = 0;
        assert!(matches!(stored.to_habit(), Err(Error::Corrupt(_))));
        stored.days = 0x80;
        assert!(matches!(stored.to_habit(), Err(Error::Corrupt(_))));
    }
}
