//! Engine - the operations the request layer calls
//!
//! Every action first settles the daily rollover, then runs as a single
//! storage transaction. A failed action leaves the store untouched.
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use habitree_core::{Config, DaySet, Engine, HabitSpec, ManualClock, MemoryStorage};
//!
//! let clock = ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 6, 9, 0, 0).unwrap());
//! let engine = Engine::open(MemoryStorage::new(), clock, Config::default()).unwrap();
//!
//! engine.plant_tree().unwrap();
//! engine
//!     .add_habit(HabitSpec::new("Read", 0, DaySet::every_day()))
//!     .unwrap();
//! engine.complete_habit("Read").unwrap();
//!
//! let dashboard = engine.dashboard().unwrap();
//! assert_eq!(dashboard.garden.water, 51);
//! ```

use crate::config::Config;
use crate::economy::Completion;
use crate::error::Result;
use crate::habit::HabitSpec;
use crate::rollover;
use crate::time::{SystemClock, TimeSource};
use crate::tree::{TreeId, Watering};
use crate::view::Dashboard;
use crate::world::Storage;
use tracing::debug;

/// Progression engine bound to a store and a clock
pub struct Engine<S, C = SystemClock> {
    storage: S,
    clock: C,
    config: Config,
}

impl<S: Storage, C: TimeSource> Engine<S, C> {
    /// Open the engine, creating the garden on first run
    pub fn open(storage: S, clock: C, config: Config) -> Result<Self> {
        config.validate()?;
        let now = clock.now();
        storage.transact(|world| {
            world.initialize(now, &config);
            Ok(())
        })?;
        Ok(Self {
            storage,
            clock,
            config,
        })
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run any daily cycles owed; returns how many ran
    pub fn catch_up(&self) -> Result<u32> {
        let now = self.clock.now();
        self.storage
            .transact(|world| rollover::catch_up(world, now, &self.config))
    }

    /// Plant the default-named tree in the lowest open slot
    pub fn plant_tree(&self) -> Result<usize> {
        let name = self.config.slots.default_tree_name.clone();
        self.plant_named(&name)
    }

    /// Plant a named tree in the lowest open slot
    pub fn plant_named(&self, name: &str) -> Result<usize> {
        self.catch_up()?;
        let now = self.clock.now();
        self.storage
            .transact(|world| world.plant_tree(name, now, &self.config))
    }

    /// Rename the tree in a slot
    pub fn rename_tree(&self, slot: usize, name: &str) -> Result<()> {
        self.catch_up()?;
        self.storage.transact(|world| world.rename_tree(slot, name))
    }

    /// Water the tree in a slot from the garden reserve
    pub fn water_tree(&self, slot: usize, amount: u64) -> Result<Watering> {
        self.catch_up()?;
        let now = self.clock.now();
        self.storage
            .transact(|world| world.water_tree(slot, amount, now, &self.config))
    }

    /// Settle stage-ups for a tree; safe to call at any time
    pub fn check_tree_growth(&self, id: TreeId) -> Result<u32> {
        self.catch_up()?;
        self.storage
            .transact(|world| world.check_tree_growth(id, &self.config))
    }

    pub fn add_habit(&self, spec: HabitSpec) -> Result<()> {
        self.catch_up()?;
        let now = self.clock.now();
        let max_priority = self.config.economy.max_priority;
        self.storage
            .transact(|world| world.habits.add(spec, now, max_priority))
    }

    pub fn edit_habit(&self, existing: &str, spec: HabitSpec) -> Result<()> {
        self.catch_up()?;
        let max_priority = self.config.economy.max_priority;
        self.storage
            .transact(|world| world.habits.edit(existing, spec, max_priority))
    }

    pub fn delete_habit(&self, name: &str) -> Result<()> {
        self.catch_up()?;
        self.storage
            .transact(|world| world.habits.delete(name).map(|_| ()))
    }

    /// Complete a habit and collect its reward
    pub fn complete_habit(&self, name: &str) -> Result<Completion> {
        self.catch_up()?;
        let today = self.clock.weekday();
        let outcome = self
            .storage
            .transact(|world| world.complete_habit(name, today, &self.config))?;
        debug!(habit = name, ?outcome, "habit completed");
        Ok(outcome)
    }

    /// Current state for display
    pub fn dashboard(&self) -> Result<Dashboard> {
        self.catch_up()?;
        let world = self.storage.load()?;
        Ok(Dashboard::build(
            &world,
            &self.config,
            self.clock.now(),
            self.clock.weekday(),
        ))
    }
}
