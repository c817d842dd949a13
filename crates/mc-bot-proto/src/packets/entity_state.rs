//! Entity state packets — Server → Client.
//!
//! Equipment, effects, status/animation bytes, metadata, riding, pickup and despawn.

use serde::{Deserialize, Serialize};

use crate::item_stack::ItemStack;
use crate::metadata::MetadataEntry;

/// Well-known equipment slot numbers (1.9+ layout).
pub mod slot {
    pub const MAIN_HAND: i32 = 0;
    pub const OFF_HAND: i32 = 1;
    pub const BOOTS: i32 = 2;
    pub const LEGGINGS: i32 = 3;
    pub const CHESTPLATE: i32 = 4;
    pub const HELMET: i32 = 5;
}

/// One slot write inside a batched equipment packet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentEntry {
    pub slot: i32,
    #[serde(default)]
    pub item: Option<ItemStack>,
}

/// Equipment change. Older versions send a single `slot`/`item` pair, newer versions a
/// batch under `equipments`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityEquipment {
    pub entity_id: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<ItemStack>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipments: Option<Vec<EquipmentEntry>>,
}

impl EntityEquipment {
    /// Flatten both wire shapes into a list of slot writes. A packet with neither shape
    /// yields nothing.
    pub fn entries(&self) -> Vec<EquipmentEntry> {
        match (&self.equipments, self.slot) {
            (Some(batch), _) => batch.clone(),
            (None, Some(slot)) => vec![EquipmentEntry {
                slot,
                item: self.item.clone(),
            }],
            (None, None) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityEffect {
    pub entity_id: i32,
    pub effect_id: i32,
    pub amplifier: i32,
    /// Duration in ticks.
    pub duration: i32,
    #[serde(default)]
    pub hide_particles: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveEntityEffect {
    pub entity_id: i32,
    pub effect_id: i32,
}

/// Entity status byte (hurt, death, taming, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStatus {
    pub entity_id: i32,
    pub entity_status: i32,
}

/// Animation byte (swing arm, wake up, critical hit, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub entity_id: i32,
    pub animation: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    pub entity_id: i32,
    pub metadata: Vec<MetadataEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDestroy {
    pub entity_ids: Vec<i32>,
}

/// Item/arrow/orb pickup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collect {
    pub collected_entity_id: i32,
    pub collector_entity_id: i32,
    #[serde(default)]
    pub pickup_item_count: Option<i32>,
}

/// Full passenger list of a vehicle; replaces the previous list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetPassengers {
    pub entity_id: i32,
    pub passengers: Vec<i32>,
}

/// Pre-1.9 riding and leash link. A `vehicle_id` of `-1` ends the link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachEntity {
    pub entity_id: i32,
    pub vehicle_id: i32,
    #[serde(default)]
    pub leash: bool,
}

impl AttachEntity {
    /// Vehicle being ridden, or `None` when the packet ends the ride.
    pub fn vehicle(&self) -> Option<i32> {
        (self.vehicle_id >= 0).then_some(self.vehicle_id)
    }
}
