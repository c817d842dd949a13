//! Entity motion packets — Server → Client.
//!
//! All numeric fields are raw protocol units; the tracker converts them with the
//! session's conversion scheme.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityVelocity {
    pub entity_id: i32,
    pub velocity_x: i16,
    pub velocity_y: i16,
    pub velocity_z: i16,
}

/// Position delta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelEntityMove {
    pub entity_id: i32,
    pub d_x: f64,
    pub d_y: f64,
    pub d_z: f64,
    #[serde(default)]
    pub on_ground: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityLook {
    pub entity_id: i32,
    pub yaw: i8,
    pub pitch: i8,
    #[serde(default)]
    pub on_ground: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMoveLook {
    pub entity_id: i32,
    pub d_x: f64,
    pub d_y: f64,
    pub d_z: f64,
    pub yaw: i8,
    pub pitch: i8,
    #[serde(default)]
    pub on_ground: bool,
}

/// Absolute position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityTeleport {
    pub entity_id: i32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: i8,
    pub pitch: i8,
    #[serde(default)]
    pub on_ground: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityHeadRotation {
    pub entity_id: i32,
    pub head_yaw: i8,
}
