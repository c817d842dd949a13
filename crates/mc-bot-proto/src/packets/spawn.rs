//! Entity spawn packets — Server → Client.
//!
//! `named_entity_spawn` introduces a player entity by UUID; the username comes from the
//! tab list. `spawn_entity` introduces every other kind, already classified by the
//! game-data catalog.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metadata::MetadataEntry;

/// Broad entity classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Player,
    Mob,
    Object,
    Global,
    Orb,
    Other,
    #[default]
    Unknown,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Mob => "mob",
            EntityKind::Object => "object",
            EntityKind::Global => "global",
            EntityKind::Orb => "orb",
            EntityKind::Other => "other",
            EntityKind::Unknown => "unknown",
        }
    }
}

/// Spawn a remote player.
///
/// Positions are raw protocol numbers: fixed-point integers or doubles depending on the
/// connection's version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedEntitySpawn {
    pub entity_id: i32,
    #[serde(rename = "playerUUID")]
    pub player_uuid: Uuid,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: i8,
    pub pitch: i8,
    /// Opaque data blobs some versions attach to the spawn.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub metadata: Vec<MetadataEntry>,
}

/// Spawn any non-player entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnEntity {
    pub entity_id: i32,
    #[serde(default, rename = "objectUUID")]
    pub object_uuid: Option<Uuid>,
    #[serde(default)]
    pub kind: EntityKind,
    /// Catalog name, e.g. `"zombie"` or `"item"`.
    #[serde(default)]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub yaw: i8,
    #[serde(default)]
    pub pitch: i8,
    #[serde(default)]
    pub head_yaw: Option<i8>,
}
