//! Protocol-native numbers to world units.
//!
//! Which position and delta encodings apply depends on the connection's version. The
//! [`ConversionScheme`] is picked once from the feature flags and never changes for the
//! rest of the session.

use mc_bot_proto::features::{
    SupportFeature, DOUBLE_DELTA, FIXED_POINT_DELTA, FIXED_POINT_POSITION,
};
use mc_bot_proto::types::Vec3;

/// Fixed-point positions and legacy deltas are in 1/32 block.
pub const FIXED_POINT_SCALE: f64 = 32.0;
/// Modern relative moves are in 1/4096 block.
pub const HIGH_PRECISION_DELTA_SCALE: f64 = 128.0 * 32.0;
/// Velocity is in 1/8000 block per tick.
pub const VELOCITY_SCALE: f64 = 8000.0;

/// Degrees per byte-angle step.
pub const DEGREES_PER_STEP: f32 = 360.0 / 256.0;

/// Encoding of absolute entity positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionScheme {
    FixedPoint,
    Double,
}

/// Encoding of relative entity moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaScheme {
    FixedPoint,
    HighPrecision,
    Double,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionScheme {
    pub position: PositionScheme,
    pub delta: DeltaScheme,
}

impl ConversionScheme {
    pub fn from_features(features: &impl SupportFeature) -> Self {
        let position = if features.support_feature(FIXED_POINT_POSITION) {
            PositionScheme::FixedPoint
        } else {
            PositionScheme::Double
        };
        let delta = if features.support_feature(FIXED_POINT_DELTA) {
            DeltaScheme::FixedPoint
        } else if features.support_feature(DOUBLE_DELTA) {
            DeltaScheme::Double
        } else {
            DeltaScheme::HighPrecision
        };
        Self { position, delta }
    }

    /// Absolute position from raw packet fields.
    pub fn position(&self, x: f64, y: f64, z: f64) -> Vec3 {
        match self.position {
            PositionScheme::FixedPoint => Vec3::new(x, y, z) / FIXED_POINT_SCALE,
            PositionScheme::Double => Vec3::new(x, y, z),
        }
    }

    /// Relative move from raw packet fields.
    pub fn delta(&self, dx: f64, dy: f64, dz: f64) -> Vec3 {
        let raw = Vec3::new(dx, dy, dz);
        match self.delta {
            DeltaScheme::FixedPoint => raw / FIXED_POINT_SCALE,
            DeltaScheme::HighPrecision => raw / HIGH_PRECISION_DELTA_SCALE,
            DeltaScheme::Double => raw,
        }
    }

    /// Inverse of [`Self::position`], rounding to the nearest representable step.
    pub fn encode_position(&self, position: Vec3) -> Vec3 {
        match self.position {
            PositionScheme::FixedPoint => round_vec(position * FIXED_POINT_SCALE),
            PositionScheme::Double => position,
        }
    }

    /// Inverse of [`Self::delta`], rounding to the nearest representable step.
    pub fn encode_delta(&self, delta: Vec3) -> Vec3 {
        match self.delta {
            DeltaScheme::FixedPoint => round_vec(delta * FIXED_POINT_SCALE),
            DeltaScheme::HighPrecision => round_vec(delta * HIGH_PRECISION_DELTA_SCALE),
            DeltaScheme::Double => delta,
        }
    }

    /// Size of one step of the delta encoding, in blocks. Zero for doubles.
    pub fn delta_resolution(&self) -> f64 {
        match self.delta {
            DeltaScheme::FixedPoint => 1.0 / FIXED_POINT_SCALE,
            DeltaScheme::HighPrecision => 1.0 / HIGH_PRECISION_DELTA_SCALE,
            DeltaScheme::Double => 0.0,
        }
    }
}

fn round_vec(v: Vec3) -> Vec3 {
    Vec3::new(v.x.round(), v.y.round(), v.z.round())
}

/// Velocity in blocks per tick.
pub fn velocity_from_notch(x: i16, y: i16, z: i16) -> Vec3 {
    Vec3::new(x as f64, y as f64, z as f64) / VELOCITY_SCALE
}

/// Yaw byte to degrees in `[0, 360)`.
pub fn yaw_from_byte(raw: i8) -> f32 {
    (raw as f32 * DEGREES_PER_STEP).rem_euclid(360.0)
}

/// Pitch byte to degrees in `[-180, 180)`. Looking down is positive.
pub fn pitch_from_byte(raw: i8) -> f32 {
    (raw as f32 * DEGREES_PER_STEP + 180.0).rem_euclid(360.0) - 180.0
}

/// Degrees to the nearest byte angle. Any input angle is accepted and wrapped.
pub fn angle_to_byte(degrees: f32) -> i8 {
    let steps = (degrees.rem_euclid(360.0) / DEGREES_PER_STEP).round() as i32;
    // 256 steps wraps to 0; the cast keeps the two's complement byte.
    (steps & 0xFF) as u8 as i8
}
