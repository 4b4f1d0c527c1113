//! Seeding a fresh record from spawn parameters.

use std::collections::BTreeMap;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::angle::{Angle12, AngleDelta, AnglePair};
use crate::attract::Pursuit;
use crate::entity::{EntityId, EventCode};
use crate::error::{CoreError, CoreResult};
use crate::flags::ControlFlags;
use crate::record::{EntityRecord, Mode};
use crate::timer::TimerId;

/// Everything needed to bring an actor into the simulation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnParams {
    /// Display name.
    pub name: String,
    /// Raw mode selector (0..=7; 4..=7 select the fallback).
    pub mode: u8,
    /// Packed sub-mode (0..=3).
    pub sub_mode: u8,
    /// Initial control flags. `SUB_MODE` bits are overwritten by `sub_mode`.
    pub flags: ControlFlags,
    /// Starting position.
    pub position: IVec3,
    /// Starting yaw (masked to 12 bits).
    pub yaw: u16,
    /// Starting roll (masked to 12 bits).
    pub roll: u16,
    /// Per-tick spin.
    pub spin: AngleDelta,
    /// Starting altitude and its target.
    pub altitude: Pursuit,
    /// Initial countdowns per slot.
    pub timers: BTreeMap<TimerId, i16>,
    /// Event code overrides per slot.
    pub events: BTreeMap<TimerId, u16>,
    /// Asset key for the waypoint path.
    pub path_asset: Option<String>,
}

impl SpawnParams {
    /// Create spawn parameters with everything else defaulted.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the raw mode selector.
    pub fn with_mode(mut self, mode: u8) -> Self {
        self.mode = mode;
        self
    }

    /// Set the packed sub-mode.
    pub fn with_sub_mode(mut self, sub_mode: u8) -> Self {
        self.sub_mode = sub_mode;
        self
    }

    /// Add control flags.
    pub fn with_flags(mut self, flags: ControlFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Seed one countdown slot.
    pub fn with_timer(mut self, id: TimerId, ticks: i16) -> Self {
        self.timers.insert(id, ticks);
        self
    }

    /// Reject parameters no record could faithfully carry.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("spawn name must not be empty".into()));
        }
        if self.mode > 7 {
            return Err(CoreError::Validation(format!(
                "{}: mode selector {} does not fit in 3 bits",
                self.name, self.mode
            )));
        }
        if self.sub_mode > 3 {
            return Err(CoreError::Validation(format!(
                "{}: sub-mode {} does not fit in 2 bits",
                self.name, self.sub_mode
            )));
        }
        if let Some((id, ticks)) = self.timers.iter().find(|(_, t)| **t < 0) {
            return Err(CoreError::Validation(format!(
                "{}: timer {id} seeded with negative value {ticks}",
                self.name
            )));
        }
        Ok(())
    }
}

impl EntityRecord {
    /// Create a zeroed record and seed it from `params`.
    pub fn spawn(id: EntityId, params: &SpawnParams) -> CoreResult<Self> {
        params.validate()?;

        let mut record = Self::new(id, params.name.clone());
        record.position = params.position;
        record.orientation = AnglePair {
            yaw: Angle12::new(params.yaw),
            roll: Angle12::new(params.roll),
        };
        record.spin = params.spin;
        record.altitude = params.altitude;
        record.flags = params.flags;
        record.flags.set_sub_mode(params.sub_mode);
        record.set_mode(Mode::from_raw(params.mode));
        for (&timer, &ticks) in &params.timers {
            record.timers.arm(timer, ticks);
        }
        for (&timer, &code) in &params.events {
            record.timers.slot_mut(timer).event = EventCode(code);
        }
        record.path_asset = params.path_asset.clone();
        Ok(record)
    }
}
