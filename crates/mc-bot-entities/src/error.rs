//! Errors surfaced by interaction commands.

use thiserror::Error;

/// A command whose precondition does not hold. Recoverable: the tracker also delivers
/// it to listeners as [`crate::EntityEvent::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("not mounted")]
    NotMounted,
}
