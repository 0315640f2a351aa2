//! Habitree Core - progression engine for a habit-tracking garden
//!
//! This crate holds the rules of the game, independent of any storage or UI:
//! - Garden levels driven by experience on a growth ladder
//! - Trees in level-gated slots that grow from water
//! - A rolling weather window that moves tree moisture
//! - A per-day water pool shared between habits by priority
//! - A daily rollover that replays every missed day in order
//!
//! ## Persistence
//!
//! Actions run against a [`World`] through the [`Storage`] trait. Each action
//! is all-or-nothing: the world is persisted only when the action succeeds.
//! [`MemoryStorage`] keeps it in memory; `habitree-db` stores it on disk.
//!
//! ## Time
//!
//! The engine reads the current instant and weekday from a [`TimeSource`].
//! Use [`SystemClock`] in production and [`ManualClock`] in tests.

mod config;
pub mod economy;
mod engine;
mod error;
mod garden;
mod habit;
mod ladder;
mod rng;
pub mod rollover;
pub mod time;
mod tree;
pub mod view;
mod weather;
mod world;

pub use config::{
    Config, EconomyConfig, MoistureConfig, ProgressionConfig, SlotConfig, WeatherConfig,
};
pub use economy::Completion;
pub use engine::Engine;
pub use error::{Error, Result};
pub use garden::Garden;
pub use habit::{DaySet, Habit, HabitBook, HabitSpec};
pub use ladder::{Ladder, Rung};
pub use rng::GameRng;
pub use time::{ManualClock, SystemClock, TimeSource};
pub use tree::{Tree, TreeId, Watering};
pub use view::{Dashboard, GardenView, HabitView, TreeSlot, TreeView, WeatherView};
pub use weather::{SkyState, WeatherDay, WeatherWindow};
pub use world::{MemoryStorage, Storage, World};
