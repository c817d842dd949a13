//! The single owner of tracked world state.
//!
//! [`EntityTracker::handle`] applies one inbound packet to the registry and roster, then
//! delivers every notification the packet produced. Nothing is dispatched until the whole
//! packet has been applied.

use mc_bot_proto::features::SupportFeature;
use mc_bot_proto::metadata::crouch_state;
use mc_bot_proto::packets::{
    AttachEntity, ClientboundPacket, Collect, EntityDestroy, EntityEffect, EntityKind,
    EntityMetadata, Login, NamedEntitySpawn, RemoveEntityEffect, ServerboundPacket,
    SetPassengers, SpawnEntity,
};
use tracing::{debug, trace};

use crate::conversions::{pitch_from_byte, velocity_from_notch, yaw_from_byte, ConversionScheme};
use crate::entity::{Effect, Entity, EntityId, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::events::{EntityEvent, EventDispatcher, Listener, WorldView};
use crate::registry::EntityRegistry;
use crate::roster::{Player, PlayerRoster, RosterContext};

pub struct EntityTracker {
    entities: EntityRegistry,
    players: PlayerRoster,
    scheme: ConversionScheme,
    username: String,
    local_entity: Option<EntityId>,
    dispatcher: EventDispatcher,
    /// Notifications produced by the packet being applied.
    pub(crate) pending: Vec<EntityEvent>,
    /// Writes produced by interaction commands, waiting for the transport.
    pub(crate) outgoing: Vec<ServerboundPacket>,
}

impl EntityTracker {
    /// The conversion scheme is fixed here for the lifetime of the tracker.
    pub fn new(username: impl Into<String>, features: &impl SupportFeature) -> Self {
        Self {
            entities: EntityRegistry::new(),
            players: PlayerRoster::new(),
            scheme: ConversionScheme::from_features(features),
            username: username.into(),
            local_entity: None,
            dispatcher: EventDispatcher::new(),
            pending: Vec::new(),
            outgoing: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: impl Listener + 'static) {
        self.dispatcher.subscribe(listener);
    }

    pub fn subscribe_fn<F>(&mut self, f: F)
    where
        F: FnMut(&EntityEvent, &WorldView<'_>) + Send + 'static,
    {
        self.dispatcher.subscribe_fn(f);
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn players(&self) -> &PlayerRoster {
        &self.players
    }

    pub fn scheme(&self) -> ConversionScheme {
        self.scheme
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Id of the entity this client controls, once logged in.
    pub fn local_entity_id(&self) -> Option<EntityId> {
        self.local_entity
    }

    pub fn local_entity(&self) -> Option<&Entity> {
        self.local_entity.and_then(|id| self.entities.get(id))
    }

    pub fn local_player(&self) -> Option<&Player> {
        self.players.local_player()
    }

    pub fn view(&self) -> WorldView<'_> {
        WorldView {
            entities: &self.entities,
            players: &self.players,
            local_entity: self.local_entity,
        }
    }

    /// Take every write queued since the last call, in issue order.
    pub fn drain_outgoing(&mut self) -> Vec<ServerboundPacket> {
        std::mem::take(&mut self.outgoing)
    }

    /// Apply one inbound packet, then notify listeners.
    pub fn handle(&mut self, packet: &ClientboundPacket) {
        trace!(packet = packet.name(), "handling packet");
        match packet {
            ClientboundPacket::Login(p) => self.on_login(p),
            ClientboundPacket::Spawn => self.on_spawn(),
            ClientboundPacket::NamedEntitySpawn(p) => self.on_named_entity_spawn(p),
            ClientboundPacket::SpawnEntity(p) => self.on_spawn_entity(p),
            ClientboundPacket::EntityEquipment(p) => {
                let entity = self.entities.get_or_create(p.entity_id);
                for entry in p.entries() {
                    entity.set_equipment(entry.slot, entry.item);
                }
                self.pending.push(EntityEvent::EntityEquip(p.entity_id));
            }
            ClientboundPacket::EntityEffect(p) => self.on_entity_effect(p),
            ClientboundPacket::RemoveEntityEffect(p) => self.on_remove_entity_effect(p),
            ClientboundPacket::Animation(p) => {
                self.entities.get_or_create(p.entity_id);
                match EntityEvent::from_animation(p.entity_id, p.animation) {
                    Some(event) => self.pending.push(event),
                    None => debug!(entity = p.entity_id, code = p.animation, "unmapped animation"),
                }
            }
            ClientboundPacket::EntityStatus(p) => {
                self.entities.get_or_create(p.entity_id);
                match EntityEvent::from_status(p.entity_id, p.entity_status) {
                    Some(event) => self.pending.push(event),
                    None => {
                        debug!(entity = p.entity_id, code = p.entity_status, "unmapped status")
                    }
                }
            }
            ClientboundPacket::EntityMetadata(p) => self.on_entity_metadata(p),
            ClientboundPacket::EntityVelocity(p) => {
                self.entities.get_or_create(p.entity_id).velocity =
                    velocity_from_notch(p.velocity_x, p.velocity_y, p.velocity_z);
            }
            ClientboundPacket::EntityDestroy(p) => self.on_entity_destroy(p),
            ClientboundPacket::PlayerInfo(p) => {
                let ctx = RosterContext {
                    entities: &self.entities,
                    local_entity: self.local_entity,
                };
                self.players.apply_player_info(p, &ctx, &mut self.pending);
            }
            ClientboundPacket::RelEntityMove(p) => {
                let delta = self.scheme.delta(p.d_x, p.d_y, p.d_z);
                let entity = self.entities.get_or_create(p.entity_id);
                entity.position += delta;
                entity.on_ground = p.on_ground;
                self.pending.push(EntityEvent::EntityMoved(p.entity_id));
            }
            ClientboundPacket::EntityLook(p) => {
                let entity = self.entities.get_or_create(p.entity_id);
                entity.yaw = yaw_from_byte(p.yaw);
                entity.pitch = pitch_from_byte(p.pitch);
                entity.on_ground = p.on_ground;
                self.pending.push(EntityEvent::EntityMoved(p.entity_id));
            }
            ClientboundPacket::EntityMoveLook(p) => {
                let delta = self.scheme.delta(p.d_x, p.d_y, p.d_z);
                let entity = self.entities.get_or_create(p.entity_id);
                entity.position += delta;
                entity.yaw = yaw_from_byte(p.yaw);
                entity.pitch = pitch_from_byte(p.pitch);
                entity.on_ground = p.on_ground;
                self.pending.push(EntityEvent::EntityMoved(p.entity_id));
            }
            ClientboundPacket::EntityTeleport(p) => {
                let position = self.scheme.position(p.x, p.y, p.z);
                let entity = self.entities.get_or_create(p.entity_id);
                entity.position = position;
                entity.yaw = yaw_from_byte(p.yaw);
                entity.pitch = pitch_from_byte(p.pitch);
                entity.on_ground = p.on_ground;
                self.pending.push(EntityEvent::EntityMoved(p.entity_id));
            }
            ClientboundPacket::EntityHeadRotation(p) => {
                self.entities.get_or_create(p.entity_id).head_yaw = yaw_from_byte(p.head_yaw);
                self.pending.push(EntityEvent::EntityMoved(p.entity_id));
            }
            ClientboundPacket::Collect(p) => self.on_collect(p),
            ClientboundPacket::SetPassengers(p) => self.on_set_passengers(p),
            ClientboundPacket::AttachEntity(p) => self.on_attach_entity(p),
        }
        self.flush();
    }

    /// Deliver pending notifications against the current state.
    pub(crate) fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let events = std::mem::take(&mut self.pending);
        let view = WorldView {
            entities: &self.entities,
            players: &self.players,
            local_entity: self.local_entity,
        };
        self.dispatcher.dispatch(&events, &view);
    }

    fn on_login(&mut self, p: &Login) {
        if let Some(current) = self.local_entity {
            debug!(current, ignored = p.entity_id, "ignoring repeated login");
            return;
        }
        let entity = self.entities.get_or_create(p.entity_id);
        entity.kind = EntityKind::Player;
        entity.username = Some(self.username.clone());
        entity.set_dimensions(PLAYER_HEIGHT, PLAYER_WIDTH);
        self.local_entity = Some(p.entity_id);
        debug!(entity = p.entity_id, username = %self.username, "logged in");
    }

    fn on_spawn(&mut self) {
        match self.local_entity {
            Some(id) => self.pending.push(EntityEvent::EntitySpawn(id)),
            None => debug!("spawn before login"),
        }
    }

    fn on_named_entity_spawn(&mut self, p: &NamedEntitySpawn) {
        // Roster add must arrive first; a spawn that races ahead of it is dropped.
        let Some(username) = self.players.username_for(&p.player_uuid).map(str::to_string) else {
            debug!(entity = p.entity_id, uuid = %p.player_uuid, "named spawn for unknown uuid");
            return;
        };
        let position = self.scheme.position(p.x, p.y, p.z);
        let entity = self.entities.get_or_create(p.entity_id);
        entity.kind = EntityKind::Player;
        entity.username = Some(username.clone());
        entity.uuid = Some(p.player_uuid);
        entity.data_blobs = p.data.clone();
        entity.position = position;
        entity.yaw = yaw_from_byte(p.yaw);
        entity.pitch = pitch_from_byte(p.pitch);
        entity.set_dimensions(PLAYER_HEIGHT, PLAYER_WIDTH);
        entity.merge_metadata(&p.metadata);
        if let Some(crouching) = crouch_state(&p.metadata) {
            entity.set_crouching(crouching);
        }
        self.players.link_if_unlinked(&username, p.entity_id);
        self.pending.push(EntityEvent::EntitySpawn(p.entity_id));
    }

    fn on_spawn_entity(&mut self, p: &SpawnEntity) {
        let position = self.scheme.position(p.x, p.y, p.z);
        let entity = self.entities.get_or_create(p.entity_id);
        entity.kind = p.kind;
        entity.name = p.name.clone();
        if p.object_uuid.is_some() {
            entity.uuid = p.object_uuid;
        }
        entity.position = position;
        entity.yaw = yaw_from_byte(p.yaw);
        entity.pitch = pitch_from_byte(p.pitch);
        if let Some(head_yaw) = p.head_yaw {
            entity.head_yaw = yaw_from_byte(head_yaw);
        }
        self.pending.push(EntityEvent::EntitySpawn(p.entity_id));
    }

    fn on_entity_effect(&mut self, p: &EntityEffect) {
        let effect = Effect {
            id: p.effect_id,
            amplifier: p.amplifier,
            duration: p.duration,
        };
        self.entities
            .get_or_create(p.entity_id)
            .effects
            .insert(effect.id, effect);
        self.pending.push(EntityEvent::EntityEffect {
            entity: p.entity_id,
            effect,
        });
    }

    fn on_remove_entity_effect(&mut self, p: &RemoveEntityEffect) {
        let entity = self.entities.get_or_create(p.entity_id);
        match entity.effects.remove(&p.effect_id) {
            Some(effect) => self.pending.push(EntityEvent::EntityEffectEnd {
                entity: p.entity_id,
                effect,
            }),
            None => debug!(entity = p.entity_id, effect = p.effect_id, "effect was not active"),
        }
    }

    fn on_entity_metadata(&mut self, p: &EntityMetadata) {
        let entity = self.entities.get_or_create(p.entity_id);
        entity.merge_metadata(&p.metadata);
        if let Some(crouching) = crouch_state(&p.metadata) {
            if entity.set_crouching(crouching) {
                self.pending.push(if crouching {
                    EntityEvent::EntityCrouch(p.entity_id)
                } else {
                    EntityEvent::EntityUncrouch(p.entity_id)
                });
            }
        }
        self.pending.push(EntityEvent::EntityUpdate(p.entity_id));
    }

    fn on_entity_destroy(&mut self, p: &EntityDestroy) {
        for &id in &p.entity_ids {
            if Some(id) == self.local_entity {
                debug!(entity = id, "ignoring destroy of the local entity");
                continue;
            }
            let Some(gone) = self.entities.destroy(id) else {
                debug!(entity = id, "destroy for unknown entity");
                continue;
            };
            self.players.unlink_entity(id);
            for &passenger in &gone.passengers {
                if let Some(e) = self.entities.get_mut(passenger) {
                    if e.vehicle == Some(id) {
                        e.vehicle = None;
                    }
                }
            }
            if let Some(vehicle) = gone.vehicle.and_then(|v| self.entities.get_mut(v)) {
                vehicle.passengers.retain(|&p| p != id);
            }
            self.pending.push(EntityEvent::EntityGone(Box::new(gone)));
        }
    }

    fn on_collect(&mut self, p: &Collect) {
        self.entities.get_or_create(p.collected_entity_id);
        self.entities.get_or_create(p.collector_entity_id);
        self.pending.push(EntityEvent::PlayerCollect {
            collector: p.collector_entity_id,
            collected: p.collected_entity_id,
        });
    }

    fn on_set_passengers(&mut self, p: &SetPassengers) {
        let vehicle = p.entity_id;
        let previous = std::mem::replace(
            &mut self.entities.get_or_create(vehicle).passengers,
            p.passengers.clone(),
        );

        for &old in previous.iter().filter(|id| !p.passengers.contains(id)) {
            if let Some(e) = self.entities.get_mut(old) {
                if e.vehicle == Some(vehicle) {
                    e.vehicle = None;
                }
            }
            self.pending.push(EntityEvent::EntityDetach {
                entity: old,
                vehicle,
            });
        }

        for &passenger in &p.passengers {
            let entity = self.entities.get_or_create(passenger);
            let former = entity.vehicle.replace(vehicle);
            if former == Some(vehicle) {
                continue;
            }
            if let Some(other) = former.and_then(|v| self.entities.get_mut(v)) {
                other.passengers.retain(|&id| id != passenger);
                self.pending.push(EntityEvent::EntityDetach {
                    entity: passenger,
                    vehicle: other.id,
                });
            }
            self.pending.push(EntityEvent::EntityAttach {
                entity: passenger,
                vehicle,
            });
        }
    }

    /// Single-rider link used before passenger lists existed.
    fn on_attach_entity(&mut self, p: &AttachEntity) {
        if p.leash {
            trace!(entity = p.entity_id, holder = p.vehicle_id, "leash link");
            return;
        }
        let rider = p.entity_id;
        let next = p.vehicle();
        let former = std::mem::replace(&mut self.entities.get_or_create(rider).vehicle, next);
        if former == next {
            return;
        }
        if let Some(old) = former {
            if let Some(v) = self.entities.get_mut(old) {
                v.passengers.retain(|&id| id != rider);
            }
            self.pending.push(EntityEvent::EntityDetach {
                entity: rider,
                vehicle: old,
            });
        }
        if let Some(vehicle) = next {
            let v = self.entities.get_or_create(vehicle);
            if !v.passengers.contains(&rider) {
                v.passengers.push(rider);
            }
            self.pending.push(EntityEvent::EntityAttach {
                entity: rider,
                vehicle,
            });
        }
    }
}
