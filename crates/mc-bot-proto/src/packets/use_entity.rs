//! UseEntity (Interact) — Client → Server.
//!
//! Attacks or interacts with an entity. Interactions may carry the exact point on the
//! target's hitbox that was clicked.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::codec::{ensure_remaining, read_bool, write_bool, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;
use crate::packets::arm_animation::Hand;
use crate::types::VarInt;

/// Wire type: right click.
pub const TYPE_INTERACT: i32 = 0;
/// Wire type: left click.
pub const TYPE_ATTACK: i32 = 1;
/// Wire type: right click at a point on the hitbox.
pub const TYPE_INTERACT_AT: i32 = 2;

/// Mouse button the interaction emulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mouse {
    /// Right click (`mouse = 0`).
    Use,
    /// Left click (`mouse = 1`).
    Hit,
}

impl Mouse {
    pub fn code(&self) -> i32 {
        match self {
            Mouse::Use => 0,
            Mouse::Hit => 1,
        }
    }
}

/// A point relative to the target's feet, in blocks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl InteractPoint {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseEntity {
    pub target: i32,
    pub mouse: Mouse,
    /// Present only for right-clicks at a point; a zero coordinate is a real point.
    pub point: Option<InteractPoint>,
    pub hand: Hand,
    pub sneaking: bool,
}

impl UseEntity {
    pub fn attack(target: i32) -> Self {
        Self {
            target,
            mouse: Mouse::Hit,
            point: None,
            hand: Hand::Main,
            sneaking: false,
        }
    }

    pub fn interact(target: i32, point: Option<InteractPoint>) -> Self {
        Self {
            target,
            mouse: Mouse::Use,
            point,
            hand: Hand::Main,
            sneaking: false,
        }
    }

    /// Wire type code implied by the mouse button and point.
    pub fn wire_type(&self) -> i32 {
        match (self.mouse, self.point) {
            (Mouse::Hit, _) => TYPE_ATTACK,
            (Mouse::Use, Some(_)) => TYPE_INTERACT_AT,
            (Mouse::Use, None) => TYPE_INTERACT,
        }
    }
}

impl ProtoEncode for UseEntity {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        VarInt(self.target).proto_encode(buf);
        let wire_type = self.wire_type();
        VarInt(wire_type).proto_encode(buf);
        if let (TYPE_INTERACT_AT, Some(point)) = (wire_type, self.point) {
            buf.put_f32(point.x);
            buf.put_f32(point.y);
            buf.put_f32(point.z);
        }
        if wire_type != TYPE_ATTACK {
            self.hand.proto_encode(buf);
        }
        write_bool(buf, self.sneaking);
    }
}

impl ProtoDecode for UseEntity {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        let target = VarInt::proto_decode(buf)?.0;
        let wire_type = VarInt::proto_decode(buf)?.0;
        let (mouse, point) = match wire_type {
            TYPE_INTERACT => (Mouse::Use, None),
            TYPE_ATTACK => (Mouse::Hit, None),
            TYPE_INTERACT_AT => {
                ensure_remaining(buf, 12)?;
                let point = InteractPoint::new(buf.get_f32(), buf.get_f32(), buf.get_f32());
                (Mouse::Use, Some(point))
            }
            other => {
                return Err(ProtoError::InvalidData(format!("use_entity type {other}")));
            }
        };
        let hand = if wire_type == TYPE_ATTACK {
            Hand::Main
        } else {
            Hand::proto_decode(buf)?
        };
        let sneaking = read_bool(buf)?;
        Ok(Self {
            target,
            mouse,
            point,
            hand,
            sneaking,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn encode_attack() {
        let mut buf = BytesMut::new();
        UseEntity::attack(5).proto_encode(&mut buf);
        // target, type=1, sneaking=false. No hand for attacks.
        assert_eq!(&buf[..], &[0x05, 0x01, 0x00]);
    }

    #[test]
    fn encode_plain_interact() {
        let mut buf = BytesMut::new();
        UseEntity::interact(7, None).proto_encode(&mut buf);
        assert_eq!(&buf[..], &[0x07, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn zero_point_is_still_interact_at() {
        let pkt = UseEntity::interact(7, Some(InteractPoint::new(0.0, 0.0, 0.0)));
        assert_eq!(pkt.wire_type(), TYPE_INTERACT_AT);
        let mut buf = BytesMut::new();
        pkt.proto_encode(&mut buf);
        // target(1) + type(1) + 3 floats(12) + hand(1) + sneaking(1)
        assert_eq!(buf.len(), 16);
        let decoded = UseEntity::proto_decode(&mut buf.freeze()).unwrap();
        assert_eq!(decoded, pkt);
    }

    #[test]
    fn reject_unknown_type() {
        let mut bytes = bytes::Bytes::from_static(&[0x01, 0x03, 0x00]);
        assert!(UseEntity::proto_decode(&mut bytes).is_err());
    }
}
