//! Typed packet events.
//!
//! Clientbound packets arrive already decoded from the transport and are only modelled
//! here; serverbound packets also carry their body encoding.

pub mod arm_animation;
pub mod entity_state;
pub mod login;
pub mod movement;
pub mod player_info;
pub mod spawn;
pub mod steer_vehicle;
pub mod use_entity;

use bytes::BufMut;
use serde::{Deserialize, Serialize};

use crate::codec::ProtoEncode;

pub use arm_animation::{ArmAnimation, Hand};
pub use entity_state::{
    Animation, AttachEntity, Collect, EntityDestroy, EntityEffect, EntityEquipment,
    EntityMetadata, EntityStatus, EquipmentEntry, RemoveEntityEffect, SetPassengers,
};
pub use login::Login;
pub use movement::{
    EntityHeadRotation, EntityLook, EntityMoveLook, EntityTeleport, EntityVelocity,
    RelEntityMove,
};
pub use player_info::{PlayerInfo, PlayerInfoAction, PlayerInfoEntry};
pub use spawn::{EntityKind, NamedEntitySpawn, SpawnEntity};
pub use steer_vehicle::SteerVehicle;
pub use use_entity::{InteractPoint, Mouse, UseEntity};

/// Every inbound event the entity tracker consumes.
///
/// Serialized as `{"name": "<packet>", "params": {...}}`, the shape recorded captures use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "params", rename_all = "snake_case")]
pub enum ClientboundPacket {
    Login(Login),
    /// The client finished (re)spawning into the world.
    Spawn,
    NamedEntitySpawn(NamedEntitySpawn),
    SpawnEntity(SpawnEntity),
    EntityEquipment(EntityEquipment),
    EntityEffect(EntityEffect),
    RemoveEntityEffect(RemoveEntityEffect),
    Animation(Animation),
    EntityStatus(EntityStatus),
    EntityMetadata(EntityMetadata),
    EntityVelocity(EntityVelocity),
    EntityDestroy(EntityDestroy),
    PlayerInfo(PlayerInfo),
    RelEntityMove(RelEntityMove),
    EntityLook(EntityLook),
    EntityMoveLook(EntityMoveLook),
    EntityTeleport(EntityTeleport),
    EntityHeadRotation(EntityHeadRotation),
    Collect(Collect),
    SetPassengers(SetPassengers),
    AttachEntity(AttachEntity),
}

impl ClientboundPacket {
    /// Protocol name of the packet, as used in captures and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Spawn => "spawn",
            Self::NamedEntitySpawn(_) => "named_entity_spawn",
            Self::SpawnEntity(_) => "spawn_entity",
            Self::EntityEquipment(_) => "entity_equipment",
            Self::EntityEffect(_) => "entity_effect",
            Self::RemoveEntityEffect(_) => "remove_entity_effect",
            Self::Animation(_) => "animation",
            Self::EntityStatus(_) => "entity_status",
            Self::EntityMetadata(_) => "entity_metadata",
            Self::EntityVelocity(_) => "entity_velocity",
            Self::EntityDestroy(_) => "entity_destroy",
            Self::PlayerInfo(_) => "player_info",
            Self::RelEntityMove(_) => "rel_entity_move",
            Self::EntityLook(_) => "entity_look",
            Self::EntityMoveLook(_) => "entity_move_look",
            Self::EntityTeleport(_) => "entity_teleport",
            Self::EntityHeadRotation(_) => "entity_head_rotation",
            Self::Collect(_) => "collect",
            Self::SetPassengers(_) => "set_passengers",
            Self::AttachEntity(_) => "attach_entity",
        }
    }
}

/// Every outbound write the interaction commands produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", content = "params", rename_all = "snake_case")]
pub enum ServerboundPacket {
    ArmAnimation(ArmAnimation),
    UseEntity(UseEntity),
    SteerVehicle(SteerVehicle),
}

impl ServerboundPacket {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ArmAnimation(_) => "arm_animation",
            Self::UseEntity(_) => "use_entity",
            Self::SteerVehicle(_) => "steer_vehicle",
        }
    }
}

/// Encodes the packet body only; framing and packet ids belong to the transport.
impl ProtoEncode for ServerboundPacket {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        match self {
            Self::ArmAnimation(p) => p.proto_encode(buf),
            Self::UseEntity(p) => p.proto_encode(buf),
            Self::SteerVehicle(p) => p.proto_encode(buf),
        }
    }
}
