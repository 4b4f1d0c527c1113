use rw_core::{ControlFlags, EntityRecord};
use tracing::debug;

use crate::context::TickContext;
use crate::error::EngineResult;
use crate::stage::Stage;

/// Counts down every timer slot and forwards the codes that fire.
///
/// A fired code is latched on the record. While the latch is set and no
/// timer fired this tick, the latched code is re-forwarded on every
/// periodic tick until the host acknowledges it.
#[derive(Debug, Default)]
pub struct TimerStage {
    fired: u64,
    rebroadcasts: u64,
}

impl TimerStage {
    /// Create a timer stage with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Timer firings forwarded so far.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Periodic re-forwards of latched codes so far.
    pub fn rebroadcasts(&self) -> u64 {
        self.rebroadcasts
    }
}

impl Stage for TimerStage {
    fn name(&self) -> &str {
        "timers"
    }

    fn run(&mut self, record: &mut EntityRecord, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        let fired = record.timers.tick_all();
        let any_fired = !fired.is_empty();

        for (timer, code) in fired {
            debug!(tick = ctx.tick(), entity = %record.id, %timer, %code, "timer fired");
            record.pending_event = Some(code);
            record.set_flag(ControlFlags::EVENT_LATCH);
            ctx.forward(record.id, code);
            self.fired += 1;
        }

        let rebroadcast = record.pending_event.filter(|_| {
            !any_fired
                && record.test_flag(ControlFlags::EVENT_LATCH)
                && ctx.clock.is_periodic(ctx.config.periodic_period)
        });
        if let Some(code) = rebroadcast {
            ctx.forward(record.id, code);
            self.rebroadcasts += 1;
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
