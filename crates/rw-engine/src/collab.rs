//! Contracts for the subsystems the engine calls out to.
//!
//! The engine never inspects what a collaborator does with a call. All
//! calls are synchronous and are made at most once per trigger; nothing is
//! retried.

use std::collections::HashMap;

use glam::IVec3;
use rw_core::{EntityId, EntityRecord, EventCode};

/// Receives forwarded events (audio cues, animation triggers, scripting hooks).
pub trait EventDispatcher {
    /// Fire-and-forget delivery of `code` addressed to `target`.
    fn forward(&mut self, target: EntityId, code: EventCode, param_count: u8);
}

/// Opaque in-place transform applied to a vector owned by a record.
pub trait TransformHelper {
    /// Transform `vector` in place.
    fn apply(&mut self, vector: &mut IVec3);
}

/// Called exactly once per dispatch, after the branch has run or faulted.
pub trait Finalizer {
    /// Observe the record at the end of its dispatch.
    fn finalize(&mut self, record: &EntityRecord);
}

/// Resolves asset keys to raw bytes.
pub trait AssetLoader {
    /// Load an asset. `None` means the asset is unavailable this tick.
    fn load(&self, key: &str) -> Option<Vec<u8>>;
}

/// Dispatcher that drops every event.
#[derive(Debug, Default)]
pub struct NullDispatcher;

impl EventDispatcher for NullDispatcher {
    fn forward(&mut self, _target: EntityId, _code: EventCode, _param_count: u8) {}
}

/// Transform that leaves vectors untouched.
#[derive(Debug, Default)]
pub struct IdentityTransform;

impl TransformHelper for IdentityTransform {
    fn apply(&mut self, _vector: &mut IVec3) {}
}

/// Finalizer that does nothing.
#[derive(Debug, Default)]
pub struct NullFinalizer;

impl Finalizer for NullFinalizer {
    fn finalize(&mut self, _record: &EntityRecord) {}
}

/// In-memory asset table.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an asset.
    pub fn insert(&mut self, key: impl Into<String>, bytes: Vec<u8>) {
        self.assets.insert(key.into(), bytes);
    }
}

impl AssetLoader for MemoryAssets {
    fn load(&self, key: &str) -> Option<Vec<u8>> {
        self.assets.get(key).cloned()
    }
}

/// The full set of collaborators an engine calls into.
pub struct Collaborators {
    /// Event sink.
    pub dispatcher: Box<dyn EventDispatcher>,
    /// Transform applied by the init branch.
    pub transform: Box<dyn TransformHelper>,
    /// Dispatch finalizer.
    pub finalizer: Box<dyn Finalizer>,
    /// Asset source for path reloads.
    pub loader: Box<dyn AssetLoader>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            dispatcher: Box::new(NullDispatcher),
            transform: Box::new(IdentityTransform),
            finalizer: Box::new(NullFinalizer),
            loader: Box::new(MemoryAssets::new()),
        }
    }
}

impl Collaborators {
    /// Replace the event dispatcher.
    pub fn with_dispatcher(mut self, dispatcher: impl EventDispatcher + 'static) -> Self {
        self.dispatcher = Box::new(dispatcher);
        self
    }

    /// Replace the transform helper.
    pub fn with_transform(mut self, transform: impl TransformHelper + 'static) -> Self {
        self.transform = Box::new(transform);
        self
    }

    /// Replace the finalizer.
    pub fn with_finalizer(mut self, finalizer: impl Finalizer + 'static) -> Self {
        self.finalizer = Box::new(finalizer);
        self
    }

    /// Replace the asset loader.
    pub fn with_loader(mut self, loader: impl AssetLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}
