//! Habitree DB - Database layer using native_db
//!
//! Provides persistent storage for:
//! - The garden record and its RNG state
//! - Planted trees
//! - Habits, in the order they were created
//! - The rolling weather window
//! - Metadata such as the last rollover timestamp
//!
//! `Store` implements `habitree_core::Storage`, so every engine action runs
//! inside a single read-write transaction.

mod error;
mod models;
mod queries;
mod store;

pub use error::{Error, Result};
pub use models::*;
pub use store::Store;
