//! Entity metadata entries.
//!
//! Metadata arrives as a sparse list of `(key, value)` pairs; only the keys present in an
//! update change, everything else keeps its previous value.

use serde::{Deserialize, Serialize};

use crate::item_stack::ItemStack;
use crate::types::Vec3;

/// Shared entity flags byte (on fire, crouching, sprinting, ...).
pub const KEY_SHARED_FLAGS: u8 = 0;
/// Entity pose (1.14+).
pub const KEY_POSE: u8 = 6;

/// Bit in the shared flags byte set while the entity is crouching.
pub const FLAG_CROUCHING: i8 = 0x02;

/// Entity pose values carried under [`KEY_POSE`].
pub mod pose {
    pub const STANDING: i32 = 0;
    pub const FALL_FLYING: i32 = 1;
    pub const SLEEPING: i32 = 2;
    pub const SWIMMING: i32 = 3;
    pub const SPIN_ATTACK: i32 = 4;
    pub const SNEAKING: i32 = 5;
    pub const DYING: i32 = 6;
}

/// A decoded metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MetadataValue {
    Byte(i8),
    Int(i32),
    Long(i64),
    Float(f32),
    String(String),
    /// Raw chat component JSON.
    Chat(String),
    Slot(Option<ItemStack>),
    Boolean(bool),
    Rotation(Vec3),
    Pose(i32),
    /// Anything the decoder classified but this crate does not model.
    Other(serde_json::Value),
}

/// A single entity metadata entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub key: u8,
    pub value: MetadataValue,
}

impl MetadataEntry {
    pub fn new(key: u8, value: MetadataValue) -> Self {
        Self { key, value }
    }
}

/// Derive the crouch state from a metadata update, if the update says anything about it.
///
/// The pose entry wins over the shared flags byte when both are present.
pub fn crouch_state(entries: &[MetadataEntry]) -> Option<bool> {
    let mut from_flags = None;
    for entry in entries {
        match (entry.key, &entry.value) {
            (KEY_POSE, MetadataValue::Pose(p)) => return Some(*p == pose::SNEAKING),
            (KEY_SHARED_FLAGS, MetadataValue::Byte(flags)) => {
                from_flags = Some(flags & FLAG_CROUCHING != 0)
            }
            _ => {}
        }
    }
    from_flags
}
