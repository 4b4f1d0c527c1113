use rw_core::{ComponentId, ControlFlags, EntityId, EntityRecord, SpawnParams};
use tracing::{debug, info, warn};

use crate::clock::SimClock;
use crate::collab::Collaborators;
use crate::component::{ComponentStore, Turret};
use crate::config::EngineConfig;
use crate::context::TickContext;
use crate::dispatch::DispatchStage;
use crate::error::{EngineError, EngineResult};
use crate::event::{EngineEvent, EngineEventKind, EventLog};
use crate::motion::MotionStage;
use crate::reference::ReferenceFrame;
use crate::stage::Stage;
use crate::timers::TimerStage;
use crate::transfer::TransferStage;

/// Outcome of one tick.
#[derive(Debug)]
pub struct TickReport {
    /// The tick that was run.
    pub tick: u64,
    /// Records whose stages all completed.
    pub processed: usize,
    /// Records whose tick was cut short, with the reason.
    pub faults: Vec<(EntityId, EngineError)>,
}

impl TickReport {
    fn new(tick: u64) -> Self {
        Self {
            tick,
            processed: 0,
            faults: Vec::new(),
        }
    }

    /// `true` if every record completed its tick.
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// The per-frame behavior engine.
///
/// Owns every record, the shared frame state, and the stage pipeline. Each
/// tick advances the clock and then runs every stage over one record before
/// moving on to the next. A failing stage stops that record's tick only.
pub struct Engine {
    entities: Vec<EntityRecord>,
    components: ComponentStore,
    reference: ReferenceFrame,
    clock: SimClock,
    config: EngineConfig,
    events: EventLog,
    collab: Collaborators,
    stages: Vec<Box<dyn Stage>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("tick", &self.clock.tick())
            .field("entities", &self.entities.len())
            .field("stages", &self.stages.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Engine {
    /// Create an engine with the standard pipeline: timers, motion,
    /// dispatch, transfer.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let mut engine = Self::bare(config)?;
        engine.add_stage(TimerStage::new());
        engine.add_stage(MotionStage::new());
        engine.add_stage(DispatchStage::new());
        engine.add_stage(TransferStage::new());
        Ok(engine)
    }

    /// Create an engine with no stages registered.
    pub fn bare(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let events = EventLog::new(config.max_events);
        Ok(Self {
            entities: Vec::new(),
            components: ComponentStore::new(),
            reference: ReferenceFrame::default(),
            clock: SimClock::new(),
            config,
            events,
            collab: Collaborators::default(),
            stages: Vec::new(),
        })
    }

    /// Replace the external collaborators.
    pub fn with_collaborators(mut self, collab: Collaborators) -> Self {
        self.collab = collab;
        self
    }

    /// Register a stage. Stages run in registration order.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) {
        self.stages.push(Box::new(stage));
    }

    /// Create a record from `params` and add it to the end of the tick order.
    pub fn spawn(&mut self, params: &SpawnParams) -> EngineResult<EntityId> {
        let id = EntityId::new();
        let record = EntityRecord::spawn(id, params)?;
        info!(entity = %id, name = %record.name, mode = %record.mode(), "spawned");
        self.events.push(EngineEvent::new(
            self.clock.tick(),
            EngineEventKind::Spawned { entity: id },
            format!("{} spawned", record.name),
        ));
        self.entities.push(record);
        Ok(id)
    }

    /// Remove a record. Components it referred to stay in the store.
    pub fn despawn(&mut self, id: EntityId) -> EngineResult<EntityRecord> {
        let index = self
            .entities
            .iter()
            .position(|r| r.id == id)
            .ok_or(EngineError::EntityNotFound(id))?;
        let record = self.entities.remove(index);
        info!(entity = %id, name = %record.name, "despawned");
        self.events.push(EngineEvent::new(
            self.clock.tick(),
            EngineEventKind::Despawned { entity: id },
            format!("{} despawned", record.name),
        ));
        Ok(record)
    }

    /// Look up a record.
    pub fn entity(&self, id: EntityId) -> Option<&EntityRecord> {
        self.entities.iter().find(|r| r.id == id)
    }

    /// Look up a record mutably.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut EntityRecord> {
        self.entities.iter_mut().find(|r| r.id == id)
    }

    /// All records in tick order.
    pub fn entities(&self) -> &[EntityRecord] {
        &self.entities
    }

    /// Insert a turret and point the record's component handle at it.
    pub fn attach_turret(&mut self, id: EntityId, turret: Turret) -> EngineResult<ComponentId> {
        let record = self
            .entities
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(EngineError::EntityNotFound(id))?;
        let component = self.components.insert(turret);
        record.component = Some(component);
        Ok(component)
    }

    /// The component store.
    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    /// The component store, for inserting or removing components between ticks.
    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    /// Replace the shared reference frame used from the next tick on.
    pub fn set_reference(&mut self, reference: ReferenceFrame) {
        self.reference = reference;
    }

    /// The shared reference frame.
    pub fn reference(&self) -> &ReferenceFrame {
        &self.reference
    }

    /// Clear a record's latched event so it is no longer re-forwarded.
    pub fn acknowledge(&mut self, id: EntityId) -> EngineResult<()> {
        let record = self.entity_mut(id).ok_or(EngineError::EntityNotFound(id))?;
        record.clear_flag(ControlFlags::EVENT_LATCH);
        record.pending_event = None;
        Ok(())
    }

    /// Advance the clock and run every stage over every record.
    pub fn tick(&mut self) -> TickReport {
        let tick = self.clock.advance();
        let mut report = TickReport::new(tick);

        for record in &mut self.entities {
            let mut ctx = TickContext {
                clock: &self.clock,
                config: &self.config,
                reference: &self.reference,
                components: &self.components,
                events: &mut self.events,
                collab: &mut self.collab,
            };
            match run_stages(&mut self.stages, record, &mut ctx) {
                Ok(()) => report.processed += 1,
                Err(e) => {
                    warn!(tick, entity = %record.id, error = %e, "entity tick aborted");
                    let kind = match &e {
                        EngineError::Division(fault) => EngineEventKind::DivisionFault {
                            entity: record.id,
                            fault: *fault,
                        },
                        _ => EngineEventKind::Custom {
                            label: "stage_error".into(),
                            entities: vec![record.id],
                        },
                    };
                    ctx.emit(kind, format!("{}: {e}", record.name));
                    report.faults.push((record.id, e));
                }
            }
        }

        debug!(
            tick,
            processed = report.processed,
            faults = report.faults.len(),
            "tick complete"
        );
        report
    }

    /// Advance by `n` ticks.
    pub fn run(&mut self, n: u64) -> Vec<TickReport> {
        (0..n).map(|_| self.tick()).collect()
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The global clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Access a stage by downcasting to a concrete type.
    pub fn get_stage<T: Stage + 'static>(&self) -> Option<&T> {
        self.stages
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Access a stage mutably by downcasting to a concrete type.
    pub fn get_stage_mut<T: Stage + 'static>(&mut self) -> Option<&mut T> {
        self.stages
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }

    /// The tick most recently run; 0 before the first.
    pub fn current_tick(&self) -> u64 {
        self.clock.tick()
    }
}

fn run_stages(
    stages: &mut [Box<dyn Stage>],
    record: &mut EntityRecord,
    ctx: &mut TickContext<'_>,
) -> EngineResult<()> {
    for stage in stages {
        stage.run(record, ctx)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::IVec3;
    use rw_core::copy::counted;
    use rw_core::{Angle12, DivisionFault, EventCode, Mode, Pursuit, TimerId};

    use super::*;
    use crate::collab::{EventDispatcher, MemoryAssets};

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<(EntityId, EventCode, u8)>>>);

    impl EventDispatcher for Recorder {
        fn forward(&mut self, target: EntityId, code: EventCode, param_count: u8) {
            self.0.borrow_mut().push((target, code, param_count));
        }
    }

    fn engine() -> Engine {
        Engine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn empty_engine_ticks() {
        let mut engine = engine();
        let reports = engine.run(10);
        assert_eq!(reports.len(), 10);
        assert_eq!(engine.current_tick(), 10);
        assert!(reports.iter().all(|r| r.processed == 0 && r.is_clean()));
    }

    #[test]
    fn quiet_record_is_stable_across_ticks() {
        let mut engine = engine();
        let id = engine.spawn(&SpawnParams::new("Hind")).unwrap();

        engine.tick();
        let after_first = engine.entity(id).unwrap().clone();
        engine.tick();
        assert_eq!(engine.entity(id).unwrap(), &after_first);
        assert!(after_first.test_flag(ControlFlags::DIVISION_SAFE));
    }

    #[test]
    fn timer_fires_on_third_tick_and_is_rebroadcast() {
        let recorder = Recorder::default();
        let calls = recorder.0.clone();
        let mut engine =
            engine().with_collaborators(Collaborators::default().with_dispatcher(recorder));
        let id = engine
            .spawn(&SpawnParams::new("Hind").with_timer(TimerId::Fire, 3))
            .unwrap();
        let code = TimerId::Fire.default_event();

        engine.run(2);
        assert!(calls.borrow().is_empty());

        engine.tick();
        assert_eq!(*calls.borrow(), vec![(id, code, 1)]);
        assert_eq!(engine.entity(id).unwrap().timers.remaining(TimerId::Fire), 0);

        // Tick 4 is periodic and the code is still latched.
        engine.tick();
        assert_eq!(calls.borrow().len(), 2);

        engine.acknowledge(id).unwrap();
        engine.run(8);
        assert_eq!(calls.borrow().len(), 2);
        assert_eq!(engine.events().forwarded_codes(id), vec![code, code]);
    }

    #[test]
    fn division_fault_is_isolated_to_one_entity() {
        let config = EngineConfig::default().with_pursuit_divisor(0);
        let mut engine = Engine::new(config).unwrap();
        let bad = engine
            .spawn(
                &SpawnParams::new("Bad")
                    .with_mode(1)
                    .with_flags(ControlFlags::RELOAD_PATH),
            )
            .unwrap();
        let good = engine.spawn(&SpawnParams::new("Good")).unwrap();

        let report = engine.tick();
        assert_eq!(report.processed, 1);
        assert_eq!(report.faults.len(), 1);
        assert_eq!(report.faults[0].0, bad);
        assert!(matches!(
            report.faults[0].1,
            EngineError::Division(DivisionFault::ByZero { .. })
        ));

        let bad_record = engine.entity(bad).unwrap();
        assert!(!bad_record.test_flag(ControlFlags::DIVISION_SAFE));
        // Transfer never ran for the faulted record.
        assert!(bad_record.test_flag(ControlFlags::RELOAD_PATH));
        assert!(
            engine
                .entity(good)
                .unwrap()
                .test_flag(ControlFlags::DIVISION_SAFE)
        );
        assert_eq!(
            engine
                .events()
                .events_for_entity(bad)
                .iter()
                .filter(|e| matches!(e.kind, EngineEventKind::DivisionFault { .. }))
                .count(),
            1
        );
    }

    #[test]
    fn unknown_mode_takes_fallback() {
        let mut engine = engine();
        let id = engine.spawn(&SpawnParams::new("Hind").with_mode(4)).unwrap();
        engine.tick();
        let record = engine.entity(id).unwrap();
        assert_eq!(record.mode(), Mode::Fallback(4));
        assert!(record.test_flag(ControlFlags::TRANSITIONED));
        assert_eq!(engine.get_stage::<DispatchStage>().unwrap().fallbacks(), 1);
    }

    #[test]
    fn turret_pulls_yaw_until_removed() {
        let mut engine = engine();
        let id = engine
            .spawn(&SpawnParams::new("Hind").with_flags(ControlFlags::ATTRACTION_ACTIVE))
            .unwrap();
        let turret = engine
            .attach_turret(id, Turret { aim: Angle12::new(64) })
            .unwrap();

        engine.run(2);
        assert_eq!(engine.entity(id).unwrap().orientation.yaw.raw(), 64);

        engine.components_mut().remove(turret);
        engine.entity_mut(id).unwrap().orientation.yaw = Angle12::new(0);
        let report = engine.tick();
        assert!(report.is_clean());
        assert_eq!(engine.entity(id).unwrap().orientation.yaw.raw(), 0);
        assert_eq!(engine.get_stage::<MotionStage>().unwrap().skipped_aims(), 1);
    }

    #[test]
    fn altitude_climbs_while_attraction_active() {
        let mut engine = engine();
        let mut params = SpawnParams::new("Hind").with_flags(ControlFlags::ATTRACTION_ACTIVE);
        params.altitude = Pursuit::new(0, 40);
        let id = engine.spawn(&params).unwrap();

        engine.run(3);
        assert!(engine.entity(id).unwrap().altitude.is_settled());
        assert_eq!(
            engine.events().forwarded_codes(id),
            vec![crate::motion::ALTITUDE_REACHED]
        );
    }

    #[test]
    fn path_asset_is_copied_on_reload() {
        let mut assets = MemoryAssets::new();
        assets.insert("route-a", counted(&[9, 8, 7, 6, 5, 4]));
        let mut engine = engine().with_collaborators(Collaborators::default().with_loader(assets));
        let mut params = SpawnParams::new("Hind").with_flags(ControlFlags::RELOAD_PATH);
        params.path_asset = Some("route-a".into());
        let id = engine.spawn(&params).unwrap();

        engine.tick();
        let record = engine.entity(id).unwrap();
        assert_eq!(record.path_bytes(), &[9, 8, 7, 6, 5, 4]);
        assert!(!record.test_flag(ControlFlags::RELOAD_PATH));
        assert_eq!(engine.get_stage::<TransferStage>().unwrap().bytes_copied(), 6);
    }

    #[test]
    fn init_anchor_follows_reference() {
        let mut engine = engine();
        let id = engine.spawn(&SpawnParams::new("Hind")).unwrap();
        engine.set_reference(ReferenceFrame {
            origin: IVec3::new(5, 6, 7),
            ..ReferenceFrame::default()
        });
        engine.tick();
        assert_eq!(engine.entity(id).unwrap().derived.anchor, IVec3::new(5, 6, 7));
    }

    #[test]
    fn spawn_and_despawn() {
        let mut engine = engine();
        let id = engine.spawn(&SpawnParams::new("Hind")).unwrap();
        assert_eq!(engine.entities().len(), 1);

        let record = engine.despawn(id).unwrap();
        assert_eq!(record.name, "Hind");
        assert!(engine.entities().is_empty());
        assert!(matches!(
            engine.despawn(id),
            Err(EngineError::EntityNotFound(_))
        ));
        assert_eq!(engine.events().events_for_entity(id).len(), 2);
    }

    #[test]
    fn invalid_spawn_is_rejected() {
        let mut engine = engine();
        let err = engine.spawn(&SpawnParams::new("  ")).unwrap_err();
        assert!(matches!(err, EngineError::Core(_)));
        assert!(engine.entities().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = EngineConfig::default().with_attraction_step(-1);
        assert!(matches!(
            Engine::new(config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn custom_stage_registration() {
        #[derive(Debug, Default)]
        struct Counter {
            seen: usize,
        }
        impl Stage for Counter {
            fn name(&self) -> &str {
                "counter"
            }
            fn run(
                &mut self,
                _record: &mut EntityRecord,
                _ctx: &mut TickContext<'_>,
            ) -> EngineResult<()> {
                self.seen += 1;
                Ok(())
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }

        let mut engine = Engine::bare(EngineConfig::default()).unwrap();
        engine.add_stage(Counter::default());
        engine.spawn(&SpawnParams::new("A")).unwrap();
        engine.spawn(&SpawnParams::new("B")).unwrap();
        engine.run(3);
        assert_eq!(engine.get_stage::<Counter>().unwrap().seen, 6);
        assert!(engine.get_stage::<TimerStage>().is_none());
    }

    #[test]
    fn stage_error_is_logged_as_custom_event() {
        #[derive(Debug)]
        struct Failing;
        impl Stage for Failing {
            fn name(&self) -> &str {
                "failing"
            }
            fn run(
                &mut self,
                _record: &mut EntityRecord,
                _ctx: &mut TickContext<'_>,
            ) -> EngineResult<()> {
                Err(EngineError::StageError("boom".into()))
            }
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
            fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
                self
            }
        }

        let mut engine = Engine::bare(EngineConfig::default()).unwrap();
        engine.add_stage(Failing);
        let id = engine.spawn(&SpawnParams::new("A")).unwrap();
        let report = engine.tick();
        assert_eq!(report.faults.len(), 1);
        let last = engine.events().events().last().unwrap();
        assert!(matches!(
            &last.kind,
            EngineEventKind::Custom { label, entities } if label == "stage_error" && entities == &vec![id]
        ));
    }
}
