use rw_core::angle::wrap_delta;
use rw_core::fixed::{rounded_half, safe_divide};
use rw_core::{ControlFlags, DivisionFault, EntityRecord, Mode};
use tracing::debug;

use crate::context::TickContext;
use crate::error::EngineResult;
use crate::stage::Stage;

/// Run the branch selected by the record's mode, then finalize.
///
/// The finalizer is called exactly once whether the branch succeeded or
/// faulted. `DIVISION_SAFE` mirrors the outcome of the last dispatch.
pub fn dispatch(
    record: &mut EntityRecord,
    ctx: &mut TickContext<'_>,
) -> Result<Mode, DivisionFault> {
    let mode = record.mode();
    let outcome = run_branch(mode, record, ctx);

    match outcome {
        Ok(()) => record.set_flag(ControlFlags::DIVISION_SAFE),
        Err(_) => record.clear_flag(ControlFlags::DIVISION_SAFE),
    }
    ctx.collab.finalizer.finalize(record);

    outcome.map(|()| mode)
}

fn run_branch(
    mode: Mode,
    record: &mut EntityRecord,
    ctx: &mut TickContext<'_>,
) -> Result<(), DivisionFault> {
    match mode {
        Mode::Init => {
            record.clear_flag(ControlFlags::SECONDARY_PATH);
            record.derived.anchor = ctx.reference.origin;
            ctx.collab.transform.apply(&mut record.derived.anchor);
        }
        Mode::Pursue => {
            let sub_mode = usize::from(record.flags.sub_mode());
            let threshold = ctx.config.pursuit_thresholds[sub_mode];
            let primary = ctx.reference.primary_target.x.wrapping_sub(record.position.x);
            let use_primary = !record.test_flag(ControlFlags::SECONDARY_PATH)
                && i64::from(primary).abs() >= i64::from(threshold);

            let offset = if use_primary {
                primary
            } else {
                ctx.reference.secondary_target.x.wrapping_sub(record.position.x)
            };
            record.derived.velocity = safe_divide(offset, ctx.config.pursuit_divisor)?;
        }
        Mode::AdjustLeft => {
            let delta = i32::from(ctx.reference.bearing.raw())
                - i32::from(record.orientation.yaw.raw());
            apply_bank(record, wrap_delta(delta));
        }
        Mode::AdjustRight => {
            let delta = i32::from(record.orientation.yaw.raw())
                - i32::from(ctx.reference.bearing.raw());
            apply_bank(record, wrap_delta(delta));
        }
        Mode::Fallback(raw) => {
            debug!(tick = ctx.tick(), entity = %record.id, raw, "unknown mode, falling back");
            record.set_flag(ControlFlags::TRANSITIONED);
        }
    }
    Ok(())
}

fn apply_bank(record: &mut EntityRecord, delta: i32) {
    record.derived.turn_rate = delta >> 3;
    record.derived.bank = rounded_half((delta >> 2) + (delta >> 4));
}

/// Stage wrapper around [`dispatch`] that keeps per-run counters.
#[derive(Debug, Default)]
pub struct DispatchStage {
    dispatched: u64,
    faults: u64,
    fallbacks: u64,
}

impl DispatchStage {
    /// Create a dispatch stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches that completed.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Dispatches aborted by a division fault.
    pub fn faults(&self) -> u64 {
        self.faults
    }

    /// Dispatches that took the fallback branch.
    pub fn fallbacks(&self) -> u64 {
        self.fallbacks
    }
}

impl Stage for DispatchStage {
    fn name(&self) -> &str {
        "dispatch"
    }

    fn run(&mut self, record: &mut EntityRecord, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        match dispatch(record, ctx) {
            Ok(mode) => {
                self.dispatched += 1;
                if matches!(mode, Mode::Fallback(_)) {
                    self.fallbacks += 1;
                }
                Ok(())
            }
            Err(fault) => {
                self.faults += 1;
                Err(fault.into())
            }
        }
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
