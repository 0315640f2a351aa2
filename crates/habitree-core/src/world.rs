//! World state and the persistence contract
//!
//! A `World` is everything one logical action may read or write. Storage
//! backends load it, hand it to the action, and persist the result only when
//! the action succeeds.

use crate::config::Config;
use crate::economy::{self, Completion};
use crate::error::{Error, Result};
use crate::garden::Garden;
use crate::habit::HabitBook;
use crate::ladder::Ladder;
use crate::rng::GameRng;
use crate::tree::{Tree, TreeId, Watering};
use crate::weather::{WeatherDay, WeatherWindow};
use chrono::{DateTime, Utc, Weekday};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use tracing::info;

/// The complete garden state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub garden: Garden,
    /// Planted trees, oldest first
    trees: Vec<Tree>,
    pub habits: HabitBook,
    pub weather: WeatherWindow,
    /// Key-value metadata (last run timestamp)
    pub meta: IndexMap<String, String>,
    pub rng: GameRng,
    fresh: bool,
}

impl World {
    /// State of a garden that has never been initialized
    pub fn new() -> Self {
        Self {
            garden: Garden::default(),
            trees: Vec::new(),
            habits: HabitBook::new(),
            weather: WeatherWindow::new(),
            meta: IndexMap::new(),
            rng: GameRng::default(),
            fresh: true,
        }
    }

    /// Reassemble a stored world
    pub fn from_parts(
        garden: Garden,
        trees: Vec<Tree>,
        habits: HabitBook,
        weather: WeatherWindow,
        meta: IndexMap<String, String>,
        rng: GameRng,
    ) -> Self {
        let mut world = Self {
            garden,
            trees,
            habits,
            weather,
            meta,
            rng,
            fresh: false,
        };
        world.sort_trees();
        world
    }

    /// True until `initialize` has run
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// Create the garden record and fill the weather window on first run
    ///
    /// Returns false when the world was already initialized.
    pub fn initialize(&mut self, now: DateTime<Utc>, config: &Config) -> bool {
        if !self.fresh {
            return false;
        }
        self.garden = Garden::new(now.date_naive(), &config.progression);
        let seed = config
            .rng_seed
            .unwrap_or_else(|| now.timestamp_micros().unsigned_abs());
        self.rng = GameRng::new(seed);
        self.weather.fill(&mut self.rng, &config.weather);
        let pool = self.daily_pool(config);
        self.garden.start_day(pool);
        self.fresh = false;
        info!(created_on = %self.garden.created_on, "garden created");
        true
    }

    fn sort_trees(&mut self) {
        self.trees.sort_by_key(|t| (t.planted_at, t.id));
    }

    /// Planted trees, oldest first; the index is the slot
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Tree planted in a slot
    pub fn tree_at(&self, slot: usize) -> Result<&Tree> {
        self.trees
            .get(slot)
            .ok_or_else(|| Error::NotFound(format!("tree in slot {}", slot)))
    }

    fn tree_at_mut(&mut self, slot: usize) -> Result<&mut Tree> {
        self.trees
            .get_mut(slot)
            .ok_or_else(|| Error::NotFound(format!("tree in slot {}", slot)))
    }

    /// Whether a slot is open at the current garden level
    pub fn is_slot_unlocked(&self, slot: usize, config: &Config) -> bool {
        config
            .slots
            .required_level(slot)
            .is_some_and(|level| self.garden.level >= level)
    }

    /// Plant a tree in the lowest unplanted slot
    ///
    /// Returns the slot index.
    pub fn plant_tree(
        &mut self,
        name: &str,
        now: DateTime<Utc>,
        config: &Config,
    ) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("tree name must not be empty".into()));
        }
        let slot = self.trees.len();
        let required_level = config.slots.required_level(slot).ok_or_else(|| {
            Error::InvalidInput(format!("all {} tree slots are planted", config.slots.count()))
        })?;
        if self.garden.level < required_level {
            return Err(Error::SlotLocked {
                slot,
                required_level,
            });
        }

        let id = TreeId::new(self.trees.iter().map(|t| t.id.raw() + 1).max().unwrap_or(1));
        let tree = Tree::new(id, name, now, &config.progression, &config.moisture);
        self.trees.push(tree);
        self.sort_trees();
        // a new tree counts toward today's cap at once
        self.garden.daily_pool = self
            .garden
            .daily_pool
            .saturating_add(config.economy.water_per_tree);
        let slot = self.trees.iter().position(|t| t.id == id).unwrap_or(slot);
        info!(tree = %id, slot, name, "tree planted");
        Ok(slot)
    }

    /// Rename the tree in a slot
    pub fn rename_tree(&mut self, slot: usize, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("tree name must not be empty".into()));
        }
        self.tree_at_mut(slot)?.name = name.to_string();
        Ok(())
    }

    /// Pour water from the garden reserve onto the tree in a slot
    ///
    /// The reserve is always debited the full amount; moisture decides how
    /// much of it reaches the growth ladder.
    pub fn water_tree(
        &mut self,
        slot: usize,
        amount: u64,
        now: DateTime<Utc>,
        config: &Config,
    ) -> Result<Watering> {
        if amount == 0 {
            return Err(Error::InvalidInput("water amount must be positive".into()));
        }
        if amount > self.garden.water {
            return Err(Error::InsufficientResource {
                requested: amount,
                available: self.garden.water,
            });
        }
        self.tree_at(slot)?;

        self.garden.spend_water(amount)?;
        let ladder = Ladder::new(config.progression.water_growth_percent);
        let tree = self.tree_at_mut(slot)?;
        Ok(tree.absorb(amount, now, &config.moisture, &ladder))
    }

    /// Settle stage-ups for a tree by identity
    pub fn check_tree_growth(&mut self, id: TreeId, config: &Config) -> Result<u32> {
        let ladder = Ladder::new(config.progression.water_growth_percent);
        let tree = self
            .trees
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        Ok(tree.check_growth(&ladder))
    }

    /// Apply one day of weather to every planted tree
    pub fn daily_tree_update(&mut self, day: &WeatherDay, config: &Config) {
        for tree in &mut self.trees {
            tree.apply_weather(day, &config.moisture, &config.weather);
        }
    }

    /// Complete a habit through the water economy
    pub fn complete_habit(
        &mut self,
        name: &str,
        today: Weekday,
        config: &Config,
    ) -> Result<Completion> {
        economy::complete_habit(&mut self.habits, &mut self.garden, name, today, config)
    }

    /// Earnable water for a day starting now
    ///
    /// The cap in force today is `garden.daily_pool`.
    pub fn daily_pool(&self, config: &Config) -> u64 {
        economy::daily_pool(self.trees.len(), self.garden.level, &config.economy)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Persistence contract for the engine
pub trait Storage {
    /// Load the world, run `action`, and persist the world if it returns `Ok`
    ///
    /// When `action` fails nothing is written.
    fn transact<T, F>(&self, action: F) -> Result<T>
    where
        F: FnOnce(&mut World) -> Result<T>;

    /// Read-only copy of the current world
    fn load(&self) -> Result<World>;
}

/// In-memory storage with the same all-or-nothing semantics as the database
#[derive(Debug, Default)]
pub struct MemoryStorage {
    world: RefCell<World>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing world
    pub fn with_world(world: World) -> Self {
        Self {
            world: RefCell::new(world),
        }
    }
}

impl Storage for MemoryStorage {
    fn transact<T, F>(&self, action: F) -> Result<T>
    where
        F: FnOnce(&mut World) -> Result<T>,
    {
        let mut draft = self.world.borrow().clone();
        let output = action(&mut draft)?;
        *self.world.borrow_mut() = draft;
        Ok(output)
    }

    fn load(&self) -> Result<World> {
        Ok(self.world.borrow().clone())
    }
}
