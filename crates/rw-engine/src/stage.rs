use rw_core::EntityRecord;

use crate::context::TickContext;
use crate::error::EngineResult;

/// One step of the per-entity tick pipeline.
///
/// Stages run in registration order for each entity before the next entity
/// is touched. An `Err` aborts the remaining stages for that entity only.
pub trait Stage: std::fmt::Debug {
    /// Human-readable name for this stage.
    fn name(&self) -> &str;

    /// Run this stage for one record.
    fn run(&mut self, record: &mut EntityRecord, ctx: &mut TickContext<'_>) -> EngineResult<()>;

    /// Support downcasting to concrete types for reading stage statistics.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Support downcasting to concrete types for reading stage statistics.
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
