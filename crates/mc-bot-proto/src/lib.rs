//! Minecraft Java Edition protocol types and typed packet events for the bot client.

pub mod codec;
pub mod error;
pub mod features;
pub mod item_stack;
pub mod metadata;
pub mod packets;
pub mod types;

pub use uuid::Uuid;
