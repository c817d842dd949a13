//! ItemStack type held in equipment slots and item metadata.
//!
//! Item ids are numeric and version-specific; resolving them to names belongs to the
//! game-data catalog, not to this crate.

use serde::{Deserialize, Serialize};

/// A single item stack as delivered by the packet decoder.
///
/// An absent slot is modelled as `Option<ItemStack>::None` by callers, never as a
/// zero-count stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStack {
    /// Numeric item id (`blockId` on 1.8 captures).
    #[serde(alias = "blockId")]
    pub item_id: i32,
    /// Number of items in this stack.
    #[serde(default = "default_count")]
    pub item_count: i8,
    /// Damage/variant value (pre-1.13 only).
    #[serde(default)]
    pub item_damage: i16,
    /// Already-decoded NBT payload, if any (enchantments, custom names, ...).
    #[serde(default, alias = "nbtData", skip_serializing_if = "Option::is_none")]
    pub nbt: Option<serde_json::Value>,
}

fn default_count() -> i8 {
    1
}

impl ItemStack {
    /// Create a simple item stack with no NBT or damage.
    pub fn new(item_id: i32, item_count: i8) -> Self {
        Self {
            item_id,
            item_count,
            item_damage: 0,
            nbt: None,
        }
    }

    /// Whether this stack holds no items. Some servers send `count = 0` instead of an
    /// absent slot.
    pub fn is_empty(&self) -> bool {
        self.item_count <= 0
    }
}
