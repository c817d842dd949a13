//! ArmAnimation (Swing Arm) — Client → Server.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::codec::{ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::types::VarInt;

/// Which hand performs an action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    #[default]
    Main,
    Off,
}

impl Hand {
    pub fn code(&self) -> i32 {
        match self {
            Hand::Main => 0,
            Hand::Off => 1,
        }
    }

    pub fn from_code(code: i32) -> Result<Self, ProtoError> {
        match code {
            0 => Ok(Hand::Main),
            1 => Ok(Hand::Off),
            other => Err(ProtoError::InvalidData(format!("hand {other}"))),
        }
    }
}

impl ProtoEncode for Hand {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarInt(self.code()).proto_encode(buf);
    }
}

impl ProtoDecode for Hand {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Hand::from_code(VarInt::proto_decode(buf)?.0)
    }
}

/// Swing the given arm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmAnimation {
    pub hand: Hand,
}

impl ProtoEncode for ArmAnimation {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        self.hand.proto_encode(buf);
    }
}

impl ProtoDecode for ArmAnimation {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        Ok(Self {
            hand: Hand::proto_decode(buf)?,
        })
    }
}
