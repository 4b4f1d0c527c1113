use rw_core::{ControlFlags, EntityRecord, EventCode};
use tracing::debug;

use crate::context::TickContext;
use crate::error::EngineResult;
use crate::stage::Stage;

/// Forwarded the tick the altitude first settles on its target.
pub const ALTITUDE_REACHED: EventCode = EventCode(0x0201);

/// Spins the orientation accumulators, then runs the pursuit solver when
/// `ATTRACTION_ACTIVE` is set.
///
/// Altitude always pursues its target. Yaw pursues the turret's aim only
/// while the record's component handle still resolves.
#[derive(Debug, Default)]
pub struct MotionStage {
    skipped_aims: u64,
}

impl MotionStage {
    /// Create a motion stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aim steps skipped because the component handle was empty or dead.
    pub fn skipped_aims(&self) -> u64 {
        self.skipped_aims
    }
}

impl Stage for MotionStage {
    fn name(&self) -> &str {
        "motion"
    }

    fn run(&mut self, record: &mut EntityRecord, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        record.orientation.accumulate(record.spin);

        if !record.test_flag(ControlFlags::ATTRACTION_ACTIVE) {
            return Ok(());
        }

        let was_settled = record.altitude.is_settled();
        if record.altitude.step(ctx.config.attraction_step) && !was_settled {
            ctx.forward(record.id, ALTITUDE_REACHED);
        }

        match record.component.and_then(|id| ctx.components.get(id)) {
            Some(turret) => {
                record.orientation.yaw.attract(turret.aim, ctx.config.aim_step);
            }
            None => {
                debug!(
                    tick = ctx.tick(),
                    entity = %record.id,
                    component = ?record.component,
                    "no live component, skipping aim"
                );
                self.skipped_aims += 1;
            }
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use rw_core::{Angle12, AngleDelta, EntityId, Pursuit};

    use super::*;
    use crate::component::Turret;
    use crate::context::Harness;

    fn record() -> EntityRecord {
        EntityRecord::new(EntityId::new(), "Hind")
    }

    #[test]
    fn spin_accumulates_every_tick() {
        let mut h = Harness::new();
        let mut r = record();
        r.spin = AngleDelta { yaw: 1000, roll: -10 };
        let mut stage = MotionStage::new();
        for _ in 0..5 {
            stage.run(&mut r, &mut h.ctx()).unwrap();
        }
        assert_eq!(r.orientation.yaw.raw(), 5000 & 0xFFF);
        assert_eq!(r.orientation.roll.raw(), 4096 - 50);
    }

    #[test]
    fn attraction_gated_by_flag() {
        let mut h = Harness::new();
        let mut r = record();
        r.altitude = Pursuit::new(0, 100);
        MotionStage::new().run(&mut r, &mut h.ctx()).unwrap();
        assert_eq!(r.altitude.current, 0);

        r.set_flag(ControlFlags::ATTRACTION_ACTIVE);
        MotionStage::new().run(&mut r, &mut h.ctx()).unwrap();
        assert_eq!(r.altitude.current, 16);
    }

    #[test]
    fn altitude_reached_forwards_once() {
        let mut h = Harness::new();
        let mut r = record();
        r.set_flag(ControlFlags::ATTRACTION_ACTIVE);
        r.altitude = Pursuit::new(0, 40);
        let mut stage = MotionStage::new();
        for _ in 0..6 {
            stage.run(&mut r, &mut h.ctx()).unwrap();
        }
        assert!(r.altitude.is_settled());
        assert_eq!(h.events.forwarded_codes(r.id), vec![ALTITUDE_REACHED]);
    }

    #[test]
    fn yaw_aims_at_live_turret() {
        let mut h = Harness::new();
        let id = h.components.insert(Turret { aim: Angle12::new(100) });
        let mut r = record();
        r.set_flag(ControlFlags::ATTRACTION_ACTIVE);
        r.component = Some(id);
        let mut stage = MotionStage::new();

        stage.run(&mut r, &mut h.ctx()).unwrap();
        assert_eq!(r.orientation.yaw.raw(), 32);
        for _ in 0..3 {
            stage.run(&mut r, &mut h.ctx()).unwrap();
        }
        assert_eq!(r.orientation.yaw.raw(), 100);
        assert_eq!(stage.skipped_aims(), 0);
    }

    #[test]
    fn dead_component_is_skipped() {
        let mut h = Harness::new();
        let id = h.components.insert(Turret { aim: Angle12::new(100) });
        h.components.remove(id);
        let mut r = record();
        r.set_flag(ControlFlags::ATTRACTION_ACTIVE);
        r.component = Some(id);
        let mut stage = MotionStage::new();

        stage.run(&mut r, &mut h.ctx()).unwrap();
        assert_eq!(r.orientation.yaw.raw(), 0);
        assert_eq!(stage.skipped_aims(), 1);
    }
}
