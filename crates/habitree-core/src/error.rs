//! Error types for habitree-core

use thiserror::Error;

/// Core error type
///
/// The first group are expected, user-facing conditions. The request layer
/// maps each one to its own status via [`Error::status_code`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("A habit named '{0}' already exists")]
    DuplicateName(String),

    #[error("Not enough water: requested {requested}, available {available}")]
    InsufficientResource { requested: u64, available: u64 },

    #[error("Daily water limit reached: earned {earned} of {limit}")]
    DailyLimitReached { earned: u64, limit: u64 },

    #[error("Tree slot {slot} is locked until garden level {required_level}")]
    SlotLocked { slot: usize, required_level: u32 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// HTTP-style status for the request layer
    pub fn status_code(&self) -> u16 {
        match self {
            Error::NotFound(_) => 404,
            Error::DuplicateName(_) => 409,
            Error::InsufficientResource { .. } => 403,
            Error::DailyLimitReached { .. } => 429,
            Error::SlotLocked { .. } => 423,
            Error::InvalidInput(_) => 400,
            Error::Config(_) | Error::Storage(_) => 500,
        }
    }

    /// True for conditions caused by the request rather than the system
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Error::Config(_) | Error::Storage(_))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
