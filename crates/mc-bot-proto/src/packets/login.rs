//! Login (Join Game) — Server → Client.
//!
//! Assigns the local player its entity id for the session.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    pub entity_id: i32,
}
