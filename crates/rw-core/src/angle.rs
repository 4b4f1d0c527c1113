//! 12-bit angle accumulators (4096 units per turn).

use serde::{Deserialize, Serialize};

use crate::attract::attract_toward;

/// Units in a full turn.
pub const ANGLE_UNITS: i32 = 4096;

/// Mask applied after every angle update.
pub const ANGLE_MASK: u16 = 0x0FFF;

/// An angle stored masked to 12 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub struct Angle12(u16);

impl Angle12 {
    /// Wrap a raw value into the 12-bit domain.
    pub fn new(raw: u16) -> Self {
        Self(raw & ANGLE_MASK)
    }

    /// Wrap a signed value into the 12-bit domain.
    pub fn from_signed(raw: i32) -> Self {
        Self((raw & i32::from(ANGLE_MASK)) as u16)
    }

    /// The stored value, always below 4096.
    pub fn raw(self) -> u16 {
        self.0
    }

    /// Add a signed delta, wrapping at a full turn.
    pub fn rotate(&mut self, delta: i16) {
        *self = Self::from_signed(i32::from(self.0) + i32::from(delta));
    }

    /// One bounded pursuit step toward `target`, then re-mask.
    /// Returns whether the stored angle now equals `target`.
    pub fn attract(&mut self, target: Angle12, max_step: i32) -> bool {
        let step = attract_toward(self.0 as i16, i32::from(target.0), max_step);
        *self = Self::from_signed(i32::from(step.value));
        *self == target
    }
}

impl From<u16> for Angle12 {
    fn from(raw: u16) -> Self {
        Self::new(raw)
    }
}

impl From<Angle12> for u16 {
    fn from(angle: Angle12) -> Self {
        angle.0
    }
}

/// Fold a signed angle difference into `0..4096` by adding one turn when negative.
pub fn wrap_delta(delta: i32) -> i32 {
    if delta < 0 { delta + ANGLE_UNITS } else { delta }
}

/// Per-tick spin added to each accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AngleDelta {
    /// Added to yaw each tick.
    pub yaw: i16,
    /// Added to roll each tick.
    pub roll: i16,
}

/// The two independent accumulators of a record's orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnglePair {
    /// Heading accumulator.
    pub yaw: Angle12,
    /// Rotor roll accumulator.
    pub roll: Angle12,
}

impl AnglePair {
    /// Add `spin` to both accumulators, masking each to 12 bits.
    pub fn accumulate(&mut self, spin: AngleDelta) {
        self.yaw.rotate(spin.yaw);
        self.roll.rotate(spin.roll);
    }
}
