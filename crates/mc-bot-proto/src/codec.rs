//! Protocol encoding/decoding traits and helpers.

use bytes::{Buf, BufMut};

use crate::error::ProtoError;

/// Encode a value onto a buffer.
pub trait ProtoEncode {
    fn proto_encode(&self, buf: &mut impl BufMut);
}

/// Decode a value from a buffer.
pub trait ProtoDecode: Sized {
    fn proto_decode(buf: &mut impl Buf) -> Result<Self, ProtoError>;
}

/// Fail with `BufferTooShort` unless `needed` bytes remain.
pub fn ensure_remaining(buf: &impl Buf, needed: usize) -> Result<(), ProtoError> {
    if buf.remaining() < needed {
        return Err(ProtoError::BufferTooShort {
            needed,
            remaining: buf.remaining(),
        });
    }
    Ok(())
}

/// Write a Java protocol boolean (one byte, 0 or 1).
pub fn write_bool(buf: &mut impl BufMut, value: bool) {
    buf.put_u8(value as u8);
}

/// Read a Java protocol boolean. Any non-zero byte is `true`.
pub fn read_bool(buf: &mut impl Buf) -> Result<bool, ProtoError> {
    ensure_remaining(buf, 1)?;
    Ok(buf.get_u8() != 0)
}
