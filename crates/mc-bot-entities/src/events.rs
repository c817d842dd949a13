//! Notifications emitted after the tracker has applied an inbound packet.
//!
//! Events name entities by id; listeners read the post-mutation record through the
//! [`WorldView`] they are handed. Records that no longer exist (destroyed entities, removed
//! players) travel inside the event instead.

use tracing::debug;

use crate::entity::{Effect, Entity, EntityId};
use crate::error::InteractionError;
use crate::registry::EntityRegistry;
use crate::roster::{Player, PlayerRoster};

#[derive(Debug, Clone, PartialEq)]
pub enum EntityEvent {
    EntitySpawn(EntityId),
    EntityGone(Box<Entity>),
    EntityMoved(EntityId),
    EntityEquip(EntityId),
    EntityEffect { entity: EntityId, effect: Effect },
    EntityEffectEnd { entity: EntityId, effect: Effect },
    EntityUpdate(EntityId),
    EntityCrouch(EntityId),
    EntityUncrouch(EntityId),
    EntityAttach { entity: EntityId, vehicle: EntityId },
    EntityDetach { entity: EntityId, vehicle: EntityId },

    // Animation codes.
    EntitySwingArm(EntityId),
    EntityHurt(EntityId),
    EntityWake(EntityId),
    EntityEat(EntityId),
    EntityCriticalEffect(EntityId),
    EntityMagicCriticalEffect(EntityId),

    // Status codes.
    EntityDead(EntityId),
    EntityTaming(EntityId),
    EntityTamed(EntityId),
    EntityShakingOffWater(EntityId),
    EntityEatingGrass(EntityId),

    /// Carries the username; the record is in the roster.
    PlayerJoined(String),
    PlayerUpdated(String),
    PlayerLeft(Box<Player>),
    PlayerCollect { collector: EntityId, collected: EntityId },

    Error(InteractionError),
}

impl EntityEvent {
    /// Listener-facing event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::EntitySpawn(_) => "entitySpawn",
            Self::EntityGone(_) => "entityGone",
            Self::EntityMoved(_) => "entityMoved",
            Self::EntityEquip(_) => "entityEquip",
            Self::EntityEffect { .. } => "entityEffect",
            Self::EntityEffectEnd { .. } => "entityEffectEnd",
            Self::EntityUpdate(_) => "entityUpdate",
            Self::EntityCrouch(_) => "entityCrouch",
            Self::EntityUncrouch(_) => "entityUncrouch",
            Self::EntityAttach { .. } => "entityAttach",
            Self::EntityDetach { .. } => "entityDetach",
            Self::EntitySwingArm(_) => "entitySwingArm",
            Self::EntityHurt(_) => "entityHurt",
            Self::EntityWake(_) => "entityWake",
            Self::EntityEat(_) => "entityEat",
            Self::EntityCriticalEffect(_) => "entityCriticalEffect",
            Self::EntityMagicCriticalEffect(_) => "entityMagicCriticalEffect",
            Self::EntityDead(_) => "entityDead",
            Self::EntityTaming(_) => "entityTaming",
            Self::EntityTamed(_) => "entityTamed",
            Self::EntityShakingOffWater(_) => "entityShakingOffWater",
            Self::EntityEatingGrass(_) => "entityEatingGrass",
            Self::PlayerJoined(_) => "playerJoined",
            Self::PlayerUpdated(_) => "playerUpdated",
            Self::PlayerLeft(_) => "playerLeft",
            Self::PlayerCollect { .. } => "playerCollect",
            Self::Error(_) => "error",
        }
    }

    /// Event for an `animation` code, if the code is one the client understands.
    pub fn from_animation(entity: EntityId, code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::EntitySwingArm(entity)),
            1 => Some(Self::EntityHurt(entity)),
            2 => Some(Self::EntityWake(entity)),
            3 => Some(Self::EntityEat(entity)),
            4 => Some(Self::EntityCriticalEffect(entity)),
            5 => Some(Self::EntityMagicCriticalEffect(entity)),
            _ => None,
        }
    }

    /// Event for an `entity_status` code, if the code is one the client understands.
    pub fn from_status(entity: EntityId, code: i32) -> Option<Self> {
        match code {
            2 => Some(Self::EntityHurt(entity)),
            3 => Some(Self::EntityDead(entity)),
            6 => Some(Self::EntityTaming(entity)),
            7 => Some(Self::EntityTamed(entity)),
            8 => Some(Self::EntityShakingOffWater(entity)),
            10 => Some(Self::EntityEatingGrass(entity)),
            _ => None,
        }
    }
}

/// Read-only access to tracker state for listeners.
#[derive(Clone, Copy)]
pub struct WorldView<'a> {
    pub entities: &'a EntityRegistry,
    pub players: &'a PlayerRoster,
    pub local_entity: Option<EntityId>,
}

impl<'a> WorldView<'a> {
    pub fn entity(&self, id: EntityId) -> Option<&'a Entity> {
        self.entities.get(id)
    }

    pub fn player(&self, username: &str) -> Option<&'a Player> {
        self.players.get(username)
    }
}

/// Receives every notification, in emission order.
pub trait Listener: Send {
    fn on_event(&mut self, event: &EntityEvent, world: &WorldView<'_>);
}

struct FnListener<F>(F);

impl<F> Listener for FnListener<F>
where
    F: FnMut(&EntityEvent, &WorldView<'_>) + Send,
{
    fn on_event(&mut self, event: &EntityEvent, world: &WorldView<'_>) {
        (self.0)(event, world)
    }
}

/// Synchronous fan-out to registered listeners.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl Listener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn subscribe_fn<F>(&mut self, f: F)
    where
        F: FnMut(&EntityEvent, &WorldView<'_>) + Send + 'static,
    {
        self.subscribe(FnListener(f));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver `events` to every listener. Each listener sees all events of one batch
    /// before the next listener runs.
    pub fn dispatch(&mut self, events: &[EntityEvent], world: &WorldView<'_>) {
        if events.is_empty() {
            return;
        }
        debug!(count = events.len(), listeners = self.listeners.len(), "dispatching events");
        for listener in &mut self.listeners {
            for event in events {
                listener.on_event(event, world);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn animation_codes() {
        assert_eq!(
            EntityEvent::from_animation(4, 0),
            Some(EntityEvent::EntitySwingArm(4))
        );
        assert_eq!(
            EntityEvent::from_animation(4, 5).map(|e| e.name()),
            Some("entityMagicCriticalEffect")
        );
        assert_eq!(EntityEvent::from_animation(4, 6), None);
    }

    #[test]
    fn status_codes() {
        assert_eq!(EntityEvent::from_status(1, 3), Some(EntityEvent::EntityDead(1)));
        assert_eq!(
            EntityEvent::from_status(1, 10).map(|e| e.name()),
            Some("entityEatingGrass")
        );
        for unmapped in [0, 1, 4, 5, 9, 11, 255] {
            assert_eq!(EntityEvent::from_status(1, unmapped), None);
        }
    }

    #[test]
    fn hurt_shared_between_animation_and_status() {
        assert_eq!(
            EntityEvent::from_animation(9, 1),
            EntityEvent::from_status(9, 2)
        );
    }

    #[test]
    fn dispatch_preserves_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe_fn(move |event, _| {
            sink.lock().unwrap().push(event.name());
        });
        assert_eq!(dispatcher.listener_count(), 1);

        let entities = EntityRegistry::new();
        let players = PlayerRoster::new();
        let view = WorldView {
            entities: &entities,
            players: &players,
            local_entity: None,
        };
        dispatcher.dispatch(
            &[EntityEvent::EntitySpawn(1), EntityEvent::EntityMoved(1)],
            &view,
        );
        assert_eq!(*seen.lock().unwrap(), vec!["entitySpawn", "entityMoved"]);
    }
}
