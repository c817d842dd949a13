//! SteerVehicle — Client → Server.
//!
//! Movement input while riding, including the request to dismount.

use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};

use crate::codec::{ensure_remaining, ProtoDecode, ProtoEncode};
use crate::error::ProtoError;

/// Jump (or the vehicle's primary action).
pub const FLAG_JUMP: u8 = 0x01;
/// Leave the vehicle.
pub const FLAG_UNMOUNT: u8 = 0x02;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteerVehicle {
    /// Positive to the left.
    pub sideways: f32,
    /// Positive forward.
    pub forward: f32,
    pub flags: u8,
}

impl SteerVehicle {
    pub fn unmount() -> Self {
        Self {
            sideways: 0.0,
            forward: 0.0,
            flags: FLAG_UNMOUNT,
        }
    }
}

impl ProtoEncode for SteerVehicle {
    fn proto_encode(&self, buf: &mut impl BufMut) {
        buf.put_f32(self.sideways);
        buf.put_f32(self.forward);
        buf.put_u8(self.flags);
    }
}

impl ProtoDecode for SteerVehicle {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError> {
        ensure_remaining(buf, 9)?;
        Ok(Self {
            sideways: buf.get_f32(),
            forward: buf.get_f32(),
            flags: buf.get_u8(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn encode_unmount() {
        let mut buf = BytesMut::new();
        SteerVehicle::unmount().proto_encode(&mut buf);
        assert_eq!(buf.len(), 9);
        assert_eq!(buf[8], FLAG_UNMOUNT);
    }

    #[test]
    fn decode_steering() {
        let mut buf = BytesMut::new();
        let pkt = SteerVehicle {
            sideways: -0.98,
            forward: 0.98,
            flags: FLAG_JUMP,
        };
        pkt.proto_encode(&mut buf);
        assert_eq!(SteerVehicle::proto_decode(&mut buf.freeze()).unwrap(), pkt);
    }

    #[test]
    fn decode_truncated() {
        let mut bytes = bytes::Bytes::from_static(&[0, 0, 0, 0]);
        assert!(SteerVehicle::proto_decode(&mut bytes).is_err());
    }
}
