//! Database store wrapper.

use crate::error::{Error, Result};
use crate::models::*;
use habitree_core::{HabitBook, Storage, WeatherWindow, World};
use indexmap::IndexMap;
use native_db::transaction::{RTransaction, RwTransaction};
use native_db::*;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info};

// Static models for the database
static MODELS: LazyLock<Models> = LazyLock::new(|| {
    let mut models = Models::new();
    models.define::<StoredGarden>().unwrap();
    models.define::<StoredRng>().unwrap();
    models.define::<StoredMeta>().unwrap();
    models.define::<StoredTree>().unwrap();
    models.define::<StoredWeather>().unwrap();
    models.define::<StoredHabit>().unwrap();
    models
});

/// Collect every row of a model through a read or read-write transaction.
macro_rules! scan_all {
    ($txn:expr, $model:ty) => {{
        let scan = $txn.scan().primary::<$model>()?;
        let iter = scan.all()?;
        let rows: std::result::Result<Vec<$model>, _> = iter.collect();
        rows.map_err(|e| Error::Database(e.to_string()))?
    }};
}

macro_rules! read_records {
    ($txn:expr) => {{
        let txn = $txn;
        Records {
            garden: txn
                .get()
                .primary::<StoredGarden>(StoredGarden::KEY.to_string())?,
            rng: txn.get().primary::<StoredRng>(StoredRng::KEY.to_string())?,
            meta: scan_all!(txn, StoredMeta),
            trees: scan_all!(txn, StoredTree),
            habits: scan_all!(txn, StoredHabit),
            weather: scan_all!(txn, StoredWeather),
        }
    }};
}

/// Every stored row, as read at the start of a transaction.
struct Records {
    garden: Option<StoredGarden>,
    rng: Option<StoredRng>,
    meta: Vec<StoredMeta>,
    trees: Vec<StoredTree>,
    habits: Vec<StoredHabit>,
    weather: Vec<StoredWeather>,
}

impl Records {
    fn read(r: &RTransaction<'_>) -> Result<Self> {
        Ok(read_records!(r))
    }

    fn read_rw(rw: &RwTransaction<'_>) -> Result<Self> {
        Ok(read_records!(rw))
    }

    /// Rebuild the world; without a garden row it is a fresh world.
    fn to_world(&self) -> Result<World> {
        let Some(garden) = &self.garden else {
            return Ok(World::new());
        };

        let trees = self.trees.iter().map(StoredTree::to_tree).collect();

        let mut ordered: Vec<&StoredHabit> = self.habits.iter().collect();
        ordered.sort_by_key(|h| h.position);
        let mut habits = HabitBook::new();
        for stored in ordered {
            habits.restore(stored.to_habit()?);
        }

        let weather = WeatherWindow::from_days(self.weather.iter().map(StoredWeather::to_day));
        let meta: IndexMap<String, String> = self
            .meta
            .iter()
            .map(|m| (m.key.clone(), m.value.clone()))
            .collect();
        let rng = self.rng.as_ref().map(StoredRng::to_rng).unwrap_or_default();

        Ok(World::from_parts(
            garden.to_garden(),
            trees,
            habits,
            weather,
            meta,
            rng,
        ))
    }

    /// Write `world` over these rows: remove what it dropped, upsert the rest.
    fn write(self, rw: &RwTransaction<'_>, world: &World) -> Result<()> {
        rw.upsert(StoredGarden::from_garden(&world.garden))?;
        rw.upsert(StoredRng::from_rng(&world.rng))?;

        for stored in self.meta {
            if !world.meta.contains_key(&stored.key) {
                rw.remove(stored)?;
            }
        }
        for (key, value) in &world.meta {
            rw.upsert(StoredMeta::new(key.as_str(), value.as_str()))?;
        }

        for stored in self.trees {
            if !world.trees().iter().any(|t| t.id.raw() == stored.id) {
                rw.remove(stored)?;
            }
        }
        for tree in world.trees() {
            rw.upsert(StoredTree::from_tree(tree))?;
        }

        for stored in self.habits {
            if world.habits.get(&stored.name).is_none() {
                rw.remove(stored)?;
            }
        }
        for (position, habit) in world.habits.iter().enumerate() {
            let position = u32::try_from(position)
                .map_err(|_| Error::Database("too many habits".to_string()))?;
            rw.upsert(StoredHabit::from_habit(habit, position))?;
        }

        for stored in self.weather {
            if !world.weather.iter().any(|d| d.day == stored.day) {
                rw.remove(stored)?;
            }
        }
        for day in world.weather.iter() {
            rw.upsert(StoredWeather::from_day(day))?;
        }

        Ok(())
    }
}

/// Database store for the garden.
pub struct Store {
    pub(crate) db: Database<'static>,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let db = Builder::new()
            .create(&MODELS, path)
            .map_err(|e| Error::Database(e.to_string()))?;
        info!(path = %path.display(), "store opened");
        Ok(Self { db })
    }

    /// Create an in-memory database.
    pub fn in_memory() -> Result<Self> {
        let db = Builder::new()
            .create_in_memory(&MODELS)
            .map_err(|e| Error::Database(e.to_string()))?;
        Ok(Self { db })
    }

    /// Load the whole world in one read transaction.
    pub fn load_world(&self) -> Result<World> {
        let r = self.db.r_transaction()?;
        Records::read(&r)?.to_world()
    }

    /// Clear all data.
    pub fn clear(&self) -> Result<()> {
        let rw = self.db.rw_transaction()?;
        let records = Records::read_rw(&rw)?;

        if let Some(garden) = records.garden {
            rw.remove(garden)?;
        }
        if let Some(rng) = records.rng {
            rw.remove(rng)?;
        }
        for meta in records.meta {
            rw.remove(meta)?;
        }
        for tree in records.trees {
            rw.remove(tree)?;
        }
        for habit in records.habits {
            rw.remove(habit)?;
        }
        for day in records.weather {
            rw.remove(day)?;
        }

        rw.commit()?;
        info!("store cleared");
        Ok(())
    }
}

impl Storage for Store {
    fn transact<T, F>(&self, action: F) -> habitree_core::Result<T>
    where
        F: FnOnce(&mut World) -> habitree_core::Result<T>,
    {
        let rw = self.db.rw_transaction().map_err(Error::from)?;
        let records = Records::read_rw(&rw)?;
        let mut world = records.to_world()?;
        let before = world.clone();

        // an error drops `rw` uncommitted, which aborts it
        let output = action(&mut world)?;

        if world != before {
            records.write(&rw, &world)?;
            rw.commit().map_err(Error::from)?;
            debug!("world saved");
        }
        Ok(output)
    }

    fn load(&self) -> habitree_core::Result<World> {
        Ok(self.load_world()?)
    }
}
