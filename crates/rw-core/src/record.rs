use std::fmt;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::angle::{AngleDelta, AnglePair};
use crate::attract::Pursuit;
use crate::entity::{ComponentId, EntityId, EventCode};
use crate::flags::ControlFlags;
use crate::timer::TimerBank;

/// Bytes reserved for a record's waypoint path.
pub const PATH_CAPACITY: usize = 64;

const MODE_SHIFT: u16 = 8;
const MODE_MASK: u16 = 0b111 << MODE_SHIFT;

/// Behavior branch selected by the status word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Seed derived fields from the shared reference.
    Init,
    /// Close distance on a reference target.
    Pursue,
    /// Bank toward the reference bearing.
    AdjustLeft,
    /// Bank away from the reference bearing.
    AdjustRight,
    /// Any selector outside `0..=3`; carries the raw value.
    Fallback(u8),
}

impl Mode {
    /// Decode a raw selector.
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Init,
            1 => Self::Pursue,
            2 => Self::AdjustLeft,
            3 => Self::AdjustRight,
            other => Self::Fallback(other),
        }
    }

    /// The raw selector this mode was decoded from.
    pub fn raw(self) -> u8 {
        match self {
            Self::Init => 0,
            Self::Pursue => 1,
            Self::AdjustLeft => 2,
            Self::AdjustRight => 3,
            Self::Fallback(raw) => raw,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::Pursue => write!(f, "pursue"),
            Self::AdjustLeft => write!(f, "adjust-left"),
            Self::AdjustRight => write!(f, "adjust-right"),
            Self::Fallback(raw) => write!(f, "fallback({raw})"),
        }
    }
}

/// Packed status word. Bits 8..=10 hold the mode selector; the low byte
/// is free for host use and is carried untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusWord(pub u16);

impl StatusWord {
    /// The 3-bit mode selector.
    pub fn mode_raw(self) -> u8 {
        ((self.0 & MODE_MASK) >> MODE_SHIFT) as u8
    }

    /// The decoded mode.
    pub fn mode(self) -> Mode {
        Mode::from_raw(self.mode_raw())
    }

    /// Overwrite the mode selector. Only the low 3 bits of `raw` are kept.
    pub fn set_mode_raw(&mut self, raw: u8) {
        self.0 = (self.0 & !MODE_MASK) | ((u16::from(raw) << MODE_SHIFT) & MODE_MASK);
    }
}

/// Values the dispatcher derives each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Derived {
    /// Anchor point seeded from the shared origin.
    pub anchor: IVec3,
    /// Pursuit velocity along x.
    pub velocity: i32,
    /// Turn rate toward the bearing.
    pub turn_rate: i32,
    /// Bank angle paired with the turn rate.
    pub bank: i32,
}

/// The mutable state of one simulated actor.
///
/// Created zeroed by [`EntityRecord::new`] and seeded by
/// [`EntityRecord::spawn`]. A record is mutated by exactly
/// one tick pass at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    /// Stable identity.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// World position.
    pub position: IVec3,
    /// Yaw and roll accumulators.
    pub orientation: AnglePair,
    /// Added to `orientation` every tick.
    pub spin: AngleDelta,
    /// Control word.
    pub flags: ControlFlags,
    /// Status word holding the mode selector.
    pub status: StatusWord,
    /// Countdown slots.
    pub timers: TimerBank,
    /// Altitude chasing its target.
    pub altitude: Pursuit,
    /// Auxiliary component handle; never owned.
    pub component: Option<ComponentId>,
    /// Most recently fired event code.
    pub pending_event: Option<EventCode>,
    /// Dispatcher outputs.
    pub derived: Derived,
    /// Asset key the path buffer is filled from.
    pub path_asset: Option<String>,
    /// Waypoint bytes.
    pub path: Vec<u8>,
    /// Valid bytes at the front of `path`.
    pub path_len: usize,
}

impl EntityRecord {
    /// Create a record with every counter zeroed and every flag cleared.
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position: IVec3::ZERO,
            orientation: AnglePair::default(),
            spin: AngleDelta::default(),
            flags: ControlFlags::empty(),
            status: StatusWord::default(),
            timers: TimerBank::default(),
            altitude: Pursuit::default(),
            component: None,
            pending_event: None,
            derived: Derived::default(),
            path_asset: None,
            path: vec![0; PATH_CAPACITY],
            path_len: 0,
        }
    }

    /// Set every bit of `mask`.
    pub fn set_flag(&mut self, mask: ControlFlags) {
        self.flags.insert(mask);
    }

    /// Clear every bit of `mask`.
    pub fn clear_flag(&mut self, mask: ControlFlags) {
        self.flags.remove(mask);
    }

    /// `true` if any bit of `mask` is set.
    pub fn test_flag(&self, mask: ControlFlags) -> bool {
        self.flags.intersects(mask)
    }

    /// The decoded mode.
    pub fn mode(&self) -> Mode {
        self.status.mode()
    }

    /// Select the mode for the next dispatch.
    pub fn set_mode(&mut self, mode: Mode) {
        self.status.set_mode_raw(mode.raw());
    }

    /// The valid part of the path buffer.
    pub fn path_bytes(&self) -> &[u8] {
        &self.path[..self.path_len.min(self.path.len())]
    }
}
