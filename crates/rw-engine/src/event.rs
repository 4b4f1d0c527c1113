use rw_core::{DivisionFault, EntityId, EventCode};

/// What kind of engine event occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEventKind {
    // Lifecycle
    /// A record was created.
    Spawned {
        /// The new entity.
        entity: EntityId,
    },
    /// A record was released.
    Despawned {
        /// The removed entity.
        entity: EntityId,
    },

    // Forwarding
    /// An event code was handed to the external dispatcher.
    Forwarded {
        /// The addressed entity.
        entity: EntityId,
        /// The code that was forwarded.
        code: EventCode,
        /// Parameter count passed along.
        param_count: u8,
    },

    // Failures
    /// A guarded division aborted an entity's tick.
    DivisionFault {
        /// The entity whose tick was aborted.
        entity: EntityId,
        /// The refused division.
        fault: DivisionFault,
    },
    /// An asset could not be loaded; dependent writes were skipped.
    AssetUnavailable {
        /// The entity that requested the asset.
        entity: EntityId,
        /// The asset key.
        key: String,
    },
    /// An asset loaded but could not be copied into the record.
    CopyFailed {
        /// The entity that requested the asset.
        entity: EntityId,
        /// The asset key.
        key: String,
    },

    // Custom
    /// A host- or stage-defined event.
    Custom {
        /// A label identifying the custom event type.
        label: String,
        /// The entities involved in this custom event.
        entities: Vec<EntityId>,
    },
}

impl EngineEventKind {
    /// Check whether a given entity is involved in this event.
    pub fn involves(&self, id: EntityId) -> bool {
        match self {
            Self::Spawned { entity }
            | Self::Despawned { entity }
            | Self::Forwarded { entity, .. }
            | Self::DivisionFault { entity, .. }
            | Self::AssetUnavailable { entity, .. }
            | Self::CopyFailed { entity, .. } => *entity == id,
            Self::Custom { entities, .. } => entities.contains(&id),
        }
    }
}

/// A record of something that happened during a run.
#[derive(Debug, Clone)]
pub struct EngineEvent {
    /// The tick when this event occurred.
    pub tick: u64,
    /// The specific kind of event that occurred.
    pub kind: EngineEventKind,
    /// A human-readable description of the event.
    pub description: String,
}

impl EngineEvent {
    /// Create a new event with the given tick, kind, and description.
    pub fn new(tick: u64, kind: EngineEventKind, description: impl Into<String>) -> Self {
        Self {
            tick,
            kind,
            description: description.into(),
        }
    }
}

/// Accumulates events during a run.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<EngineEvent>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Vec::new(),
            max_events,
        }
    }

    /// Append an event, dropping the oldest events if the log exceeds its capacity.
    pub fn push(&mut self, event: EngineEvent) {
        self.events.push(event);
        if self.max_events > 0 && self.events.len() > self.max_events {
            let drain_count = self.events.len() - self.max_events;
            self.events.drain(..drain_count);
        }
    }

    /// Return a slice of all recorded events.
    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    /// Return all events that occurred at the given tick.
    pub fn events_at_tick(&self, tick: u64) -> Vec<&EngineEvent> {
        self.events.iter().filter(|e| e.tick == tick).collect()
    }

    /// Return all events involving the given entity.
    pub fn events_for_entity(&self, id: EntityId) -> Vec<&EngineEvent> {
        self.events.iter().filter(|e| e.kind.involves(id)).collect()
    }

    /// Return the codes forwarded to the given entity, oldest first.
    pub fn forwarded_codes(&self, id: EntityId) -> Vec<EventCode> {
        self.events
            .iter()
            .filter_map(|e| match e.kind {
                EngineEventKind::Forwarded { entity, code, .. } if entity == id => Some(code),
                _ => None,
            })
            .collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
