//! Tracked entity records.

use std::collections::BTreeMap;

use mc_bot_proto::item_stack::ItemStack;
use mc_bot_proto::metadata::{MetadataEntry, MetadataValue};
use mc_bot_proto::packets::entity_state::slot;
use mc_bot_proto::packets::EntityKind;
use mc_bot_proto::types::Vec3;
use uuid::Uuid;

/// Numeric entity id assigned by the server.
pub type EntityId = i32;

/// Eye height the protocol reports for a standing player.
pub const PLAYER_HEIGHT: f64 = 1.62;
pub const PLAYER_WIDTH: f64 = 0.6;
/// How much crouching lowers the reported height.
pub const CROUCH_OFFSET: f64 = 0.08;
pub const PLAYER_CROUCH_HEIGHT: f64 = PLAYER_HEIGHT - CROUCH_OFFSET;

/// An active status effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Effect {
    pub id: i32,
    pub amplifier: i32,
    /// Remaining duration in ticks, as last reported.
    pub duration: i32,
}

/// Everything the client knows about one world entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    /// Catalog name for non-player entities.
    pub name: Option<String>,
    /// Present only for players.
    pub username: Option<String>,
    pub uuid: Option<Uuid>,
    pub position: Vec3,
    /// Blocks per tick.
    pub velocity: Vec3,
    /// Degrees in `[0, 360)`.
    pub yaw: f32,
    /// Degrees in `[-180, 180)`.
    pub pitch: f32,
    pub head_yaw: f32,
    pub on_ground: bool,
    pub height: f64,
    pub width: f64,
    standing_height: f64,
    pub crouching: bool,
    /// Slot number to held item. Empty slots are absent.
    pub equipment: BTreeMap<i32, ItemStack>,
    pub effects: BTreeMap<i32, Effect>,
    pub metadata: BTreeMap<u8, MetadataValue>,
    /// Opaque spawn data some versions send with player spawns.
    pub data_blobs: Option<serde_json::Value>,
    pub vehicle: Option<EntityId>,
    pub passengers: Vec<EntityId>,
    /// Cleared once the entity is destroyed.
    pub is_valid: bool,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            kind: EntityKind::Unknown,
            name: None,
            username: None,
            uuid: None,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            head_yaw: 0.0,
            on_ground: false,
            height: 0.0,
            width: 0.0,
            standing_height: 0.0,
            crouching: false,
            equipment: BTreeMap::new(),
            effects: BTreeMap::new(),
            metadata: BTreeMap::new(),
            data_blobs: None,
            vehicle: None,
            passengers: Vec::new(),
            is_valid: true,
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == EntityKind::Player
    }

    /// Set the standing bounding box. The reported height follows the crouch state.
    pub fn set_dimensions(&mut self, height: f64, width: f64) {
        self.standing_height = height;
        self.width = width;
        self.apply_height();
    }

    /// Update the crouch state. Returns `true` if it changed.
    pub fn set_crouching(&mut self, crouching: bool) -> bool {
        if self.crouching == crouching {
            return false;
        }
        self.crouching = crouching;
        self.apply_height();
        true
    }

    fn apply_height(&mut self) {
        self.height = if self.crouching {
            (self.standing_height - CROUCH_OFFSET).max(0.0)
        } else {
            self.standing_height
        };
    }

    /// Replace (or clear, with `None`) the item in one equipment slot.
    pub fn set_equipment(&mut self, slot: i32, item: Option<ItemStack>) {
        match item.filter(|i| !i.is_empty()) {
            Some(item) => {
                self.equipment.insert(slot, item);
            }
            None => {
                self.equipment.remove(&slot);
            }
        }
    }

    pub fn held_item(&self) -> Option<&ItemStack> {
        self.equipment.get(&slot::MAIN_HAND)
    }

    /// Merge a metadata update; keys absent from the update keep their old values.
    pub fn merge_metadata(&mut self, entries: &[MetadataEntry]) {
        for entry in entries {
            self.metadata.insert(entry.key, entry.value.clone());
        }
    }
}
