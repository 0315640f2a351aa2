//! Read-only queries that skip rebuilding the whole world.

use crate::error::{Error, Result};
use crate::models::*;
use crate::store::Store;
use habitree_core::{Garden, Habit, Tree, WeatherWindow};

impl Store {
    /// The garden record, if the garden was created.
    pub fn garden(&self) -> Result<Option<Garden>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredGarden> = r.get().primary(StoredGarden::KEY.to_string())?;
        Ok(stored.map(|s| s.to_garden()))
    }

    /// Planted trees, oldest first.
    pub fn trees(&self) -> Result<Vec<Tree>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredTree>()?;
        let iter = scan.all()?;
        let trees: std::result::Result<Vec<StoredTree>, _> = iter.collect();
        let trees = trees.map_err(|e| Error::Database(e.to_string()))?;
        let mut trees: Vec<Tree> = trees.iter().map(StoredTree::to_tree).collect();
        trees.sort_by_key(|t| (t.planted_at, t.id));
        Ok(trees)
    }

    /// Habits in creation order.
    pub fn habits(&self) -> Result<Vec<Habit>> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().secondary::<StoredHabit>(StoredHabitKey::position)?;
        let iter = scan.all()?;
        let habits: std::result::Result<Vec<StoredHabit>, _> = iter.collect();
        let habits = habits.map_err(|e| Error::Database(e.to_string()))?;
        habits.iter().map(StoredHabit::to_habit).collect()
    }

    /// The stored weather window, oldest first.
    pub fn weather_window(&self) -> Result<WeatherWindow> {
        let r = self.db.r_transaction()?;
        let scan = r.scan().primary::<StoredWeather>()?;
        let iter = scan.all()?;
        let days: std::result::Result<Vec<StoredWeather>, _> = iter.collect();
        let days = days.map_err(|e| Error::Database(e.to_string()))?;
        Ok(WeatherWindow::from_days(days.iter().map(StoredWeather::to_day)))
    }

    /// A metadata value by key.
    pub fn meta(&self, key: &str) -> Result<Option<String>> {
        let r = self.db.r_transaction()?;
        let stored: Option<StoredMeta> = r.get().primary(key.to_string())?;
        Ok(stored.map(|s| s.value))
    }
}
