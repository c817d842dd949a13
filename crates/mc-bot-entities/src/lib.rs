//! Client-side entity and player tracking: registry, tab-list roster, notifications,
//! and the interaction commands that target entities.

pub mod chat;
pub mod conversions;
pub mod entity;
pub mod error;
pub mod events;
pub mod interaction;
pub mod query;
pub mod registry;
pub mod roster;
pub mod tracker;

pub use entity::{Effect, Entity, EntityId};
pub use error::InteractionError;
pub use events::{EntityEvent, Listener, WorldView};
pub use query::{PlayerFilter, PlayerMatches};
pub use registry::EntityRegistry;
pub use roster::{Player, PlayerRoster};
pub use tracker::EntityTracker;
