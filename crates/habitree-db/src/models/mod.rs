//! Database models for persistent storage.

mod garden;
mod habit;
mod tree;
mod weather;

pub use garden::*;
pub use habit::*;
pub use tree::*;
pub use weather::*;
