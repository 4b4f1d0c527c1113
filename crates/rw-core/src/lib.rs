//! Core types for Rotorwerk: the per-actor entity record and the integer
//! primitives every behavior routine is built from.
//!
//! Nothing here knows about clocks, collaborators, or other entities. The
//! engine crate sequences these pieces once per frame.

/// 12-bit angle accumulators.
pub mod angle;
/// Bounded pursuit solver.
pub mod attract;
/// Counted bulk copy between byte buffers.
pub mod copy;
/// Entity, component, and event identifiers.
pub mod entity;
/// Error types used throughout the crate.
pub mod error;
/// Fixed-point arithmetic and guarded division.
pub mod fixed;
/// The packed control word.
pub mod flags;
/// The entity record and its mode selector.
pub mod record;
/// Spawn parameters and record seeding.
pub mod spawn;
/// Countdown timers and periodic triggers.
pub mod timer;

/// Re-export angle types.
pub use angle::{Angle12, AngleDelta, AnglePair};
/// Re-export solver types.
pub use attract::{Attraction, Pursuit, attract_toward};
/// Re-export identifiers.
pub use entity::{ComponentId, EntityId, EventCode};
/// Re-export error types.
pub use error::{CopyError, CoreError, CoreResult, DivisionFault};
/// Re-export the control word.
pub use flags::ControlFlags;
/// Re-export record types.
pub use record::{Derived, EntityRecord, Mode, StatusWord};
/// Re-export spawn parameters.
pub use spawn::SpawnParams;
/// Re-export timer types.
pub use timer::{Timer, TimerBank, TimerId, is_periodic};
