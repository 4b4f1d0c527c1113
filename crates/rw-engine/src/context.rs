use rw_core::{EntityId, EventCode};
use tracing::debug;

use crate::clock::SimClock;
use crate::collab::Collaborators;
use crate::component::ComponentStore;
use crate::config::EngineConfig;
use crate::event::{EngineEvent, EngineEventKind, EventLog};
use crate::reference::ReferenceFrame;

/// Everything a stage may touch besides the record it is working on.
///
/// Shared frame state is read-only; only the event log and the
/// collaborators are mutable.
pub struct TickContext<'a> {
    /// Global clock.
    pub clock: &'a SimClock,
    /// Engine configuration.
    pub config: &'a EngineConfig,
    /// Shared reference vectors for this frame.
    pub reference: &'a ReferenceFrame,
    /// Auxiliary components.
    pub components: &'a ComponentStore,
    /// Event log.
    pub events: &'a mut EventLog,
    /// External collaborators.
    pub collab: &'a mut Collaborators,
}

impl TickContext<'_> {
    /// Record an event at the current tick.
    pub fn emit(&mut self, kind: EngineEventKind, description: impl Into<String>) {
        self.events
            .push(EngineEvent::new(self.clock.tick(), kind, description));
    }

    /// Forward `code` to the external dispatcher and log it.
    pub fn forward(&mut self, entity: EntityId, code: EventCode) {
        let param_count = self.config.event_param_count;
        debug!(tick = self.clock.tick(), %entity, %code, "forwarding event");
        self.collab.dispatcher.forward(entity, code, param_count);
        self.emit(
            EngineEventKind::Forwarded {
                entity,
                code,
                param_count,
            },
            format!("{entity} <- {code}"),
        );
    }

    /// The current tick.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }
}

/// Owns everything a [`TickContext`] borrows, for unit tests of single stages.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct Harness {
    pub clock: SimClock,
    pub config: EngineConfig,
    pub reference: ReferenceFrame,
    pub components: ComponentStore,
    pub events: EventLog,
    pub collab: Collaborators,
}

#[cfg(test)]
impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ctx(&mut self) -> TickContext<'_> {
        TickContext {
            clock: &self.clock,
            config: &self.config,
            reference: &self.reference,
            components: &self.components,
            events: &mut self.events,
            collab: &mut self.collab,
        }
    }
}
