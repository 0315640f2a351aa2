//! Tree models for database storage.

use chrono::{DateTime, Utc};
use habitree_core::{Tree, TreeId};
use native_db::*;
use native_model::{native_model, Model};
use serde::{Deserialize, Serialize};

/// Stored planted tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[native_model(id = 4, version = 1)]
#[native_db]
pub struct StoredTree {
    /// Primary key - tree ID.
    #[primary_key]
    pub id: u64,
    pub name: String,
    pub planted_at: DateTime<Utc>,
    pub stage: u32,
    pub water: u64,
    pub water_required: u64,
    pub last_watered: DateTime<Utc>,
    pub moisture: u32,
}

impl StoredTree {
    /// Create from a Tree.
    pub fn from_tree(tree: &Tree) -> Self {
        Self {
            id: tree.id.raw(),
            name: tree.name.clone(),
            planted_at: tree.planted_at,
            stage: tree.stage,
            water: tree.water,
            water_required: tree.water_required,
            last_watered: tree.last_watered,
            moisture: tree.moisture,
        }
    }

    /// Convert to a Tree.
    pub fn to_tree(&self) -> Tree {
        Tree {
            id: TreeId::new(self.id),
            name: self.name.clone(),
            planted_at: self.planted_at,
            stage: self.stage,
            water: self.water,
            water_required: self.water_required,
            last_watered: self.last_watered,
            moisture: self.moisture.min(100),
        }
    }
}
