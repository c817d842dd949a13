//! Per-version protocol feature flags.
//!
//! The version negotiation layer hands the client a feature lookup once the connection's
//! version is known; everything that depends on the wire encoding of a field asks it
//! through [`SupportFeature`].

use std::collections::BTreeSet;

use crate::error::ProtoError;

/// Entity positions are 1/32 fixed-point integers.
pub const FIXED_POINT_POSITION: &str = "fixedPointPosition";
/// Entity positions are native doubles.
pub const DOUBLE_POSITION: &str = "doublePosition";
/// Relative moves are 1/32 fixed-point bytes.
pub const FIXED_POINT_DELTA: &str = "fixedPointDelta";
/// Relative moves are native doubles.
pub const DOUBLE_DELTA: &str = "doubleDelta";

/// Oldest minor version of `1.x` this client understands.
const MIN_MINOR: u32 = 8;

/// Feature lookup keyed by feature name.
pub trait SupportFeature {
    fn support_feature(&self, name: &str) -> bool;
}

/// A fixed set of enabled feature names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    enabled: BTreeSet<String>,
}

impl FeatureSet {
    /// Build a set from explicit feature names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Features for a `1.x[.y]` version string.
    pub fn for_version(version: &str) -> Result<Self, ProtoError> {
        let minor = parse_minor(version)
            .ok_or_else(|| ProtoError::UnsupportedVersion(version.to_string()))?;
        if minor < MIN_MINOR {
            return Err(ProtoError::UnsupportedVersion(version.to_string()));
        }
        let names: &[&str] = if minor == 8 {
            &[FIXED_POINT_POSITION, FIXED_POINT_DELTA]
        } else {
            &[DOUBLE_POSITION]
        };
        Ok(Self::from_names(names.iter().copied()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(String::as_str)
    }
}

impl SupportFeature for FeatureSet {
    fn support_feature(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }
}

fn parse_minor(version: &str) -> Option<u32> {
    let mut parts = version.trim().split('.');
    if parts.next()? != "1" {
        return None;
    }
    let minor = parts.next()?.parse().ok()?;
    // A patch component, when present, must be numeric.
    match parts.next() {
        Some(patch) => patch.parse::<u32>().ok().map(|_| minor),
        None => Some(minor),
    }
}
