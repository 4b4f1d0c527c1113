//! Per-tick behavior engine for Rotorwerk actors.
//!
//! An [`Engine`] owns the entity records and runs a fixed pipeline of
//! [`Stage`]s over each of them once per frame: timers, motion, mode
//! dispatch, path transfer. Everything outside the record (clock, reference
//! frame, component store, config) is shared read-only through a
//! [`TickContext`]. Side effects leave the engine through the traits in
//! [`collab`].

/// Global tick counter.
pub mod clock;
/// Traits for the subsystems the engine calls out to.
pub mod collab;
/// Auxiliary components referenced by handle.
pub mod component;
/// Engine configuration.
pub mod config;
/// Per-record view of shared state passed to stages.
pub mod context;
/// Mode dispatcher and its stage.
pub mod dispatch;
/// Top-level orchestrator.
pub mod engine;
/// Error types for the engine crate.
pub mod error;
/// Engine event types and the event log.
pub mod event;
/// Orientation accumulation and attraction.
pub mod motion;
/// Shared per-frame reference vectors.
pub mod reference;
/// The trait every pipeline stage implements.
pub mod stage;
/// Countdown timers and event forwarding.
pub mod timers;
/// Asset-backed path reloads.
pub mod transfer;

/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-exports of the collaborator traits and their defaults.
pub use collab::{
    AssetLoader, Collaborators, EventDispatcher, Finalizer, IdentityTransform, MemoryAssets,
    NullDispatcher, NullFinalizer, TransformHelper,
};
/// Re-exports of [`component::ComponentStore`] and [`component::Turret`].
pub use component::{ComponentStore, Turret};
/// Re-export of [`config::EngineConfig`].
pub use config::EngineConfig;
/// Re-export of [`context::TickContext`].
pub use context::TickContext;
/// Re-exports of the dispatcher.
pub use dispatch::{DispatchStage, dispatch};
/// Re-exports of [`engine::Engine`] and [`engine::TickReport`].
pub use engine::{Engine, TickReport};
/// Re-exports of [`error::EngineError`] and [`error::EngineResult`].
pub use error::{EngineError, EngineResult};
/// Re-exports of [`event::EventLog`], [`event::EngineEvent`], and [`event::EngineEventKind`].
pub use event::{EngineEvent, EngineEventKind, EventLog};
/// Re-exports of the motion stage.
pub use motion::{ALTITUDE_REACHED, MotionStage};
/// Re-export of [`reference::ReferenceFrame`].
pub use reference::ReferenceFrame;
/// Re-export of [`stage::Stage`].
pub use stage::Stage;
/// Re-export of [`timers::TimerStage`].
pub use timers::TimerStage;
/// Re-export of [`transfer::TransferStage`].
pub use transfer::TransferStage;
