//! PlayerInfo (tab list) — Server → Client.
//!
//! One action code applies to every entry of the packet.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tab-list action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInfoAction {
    Add,
    UpdateGamemode,
    UpdatePing,
    UpdateDisplayName,
    Remove,
}

impl PlayerInfoAction {
    /// Map a wire action code. Codes outside `0..=4` have no meaning.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Add),
            1 => Some(Self::UpdateGamemode),
            2 => Some(Self::UpdatePing),
            3 => Some(Self::UpdateDisplayName),
            4 => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Add => 0,
            Self::UpdateGamemode => 1,
            Self::UpdatePing => 2,
            Self::UpdateDisplayName => 3,
            Self::Remove => 4,
        }
    }
}

/// A single tab-list entry. Which fields are meaningful depends on the action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerInfoEntry {
    #[serde(rename = "UUID")]
    pub uuid: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub ping: i32,
    #[serde(default)]
    pub gamemode: i32,
    /// Raw chat component JSON.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    /// Raw action code; see [`PlayerInfoAction::from_code`].
    pub action: i32,
    pub data: Vec<PlayerInfoEntry>,
}

impl PlayerInfo {
    pub fn action(&self) -> Option<PlayerInfoAction> {
        PlayerInfoAction::from_code(self.action)
    }
}
