use rw_core::copy::bulk_copy;
use rw_core::{ControlFlags, EntityRecord};
use tracing::{debug, warn};

use crate::context::TickContext;
use crate::error::EngineResult;
use crate::event::EngineEventKind;
use crate::stage::Stage;

/// Reloads a record's waypoint path when `RELOAD_PATH` is set.
///
/// The flag is consumed whether or not the load succeeds. An unavailable
/// asset or a malformed buffer is logged and skipped; it never aborts the
/// entity's tick.
#[derive(Debug, Default)]
pub struct TransferStage {
    bytes_copied: u64,
    unavailable: u64,
}

impl TransferStage {
    /// Create a transfer stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total bytes copied into record paths.
    pub fn bytes_copied(&self) -> u64 {
        self.bytes_copied
    }

    /// Loads that came back empty.
    pub fn unavailable(&self) -> u64 {
        self.unavailable
    }
}

impl Stage for TransferStage {
    fn name(&self) -> &str {
        "transfer"
    }

    fn run(&mut self, record: &mut EntityRecord, ctx: &mut TickContext<'_>) -> EngineResult<()> {
        if !record.test_flag(ControlFlags::RELOAD_PATH) {
            return Ok(());
        }
        record.clear_flag(ControlFlags::RELOAD_PATH);

        let Some(key) = record.path_asset.clone() else {
            debug!(tick = ctx.tick(), entity = %record.id, "reload requested without a path asset");
            return Ok(());
        };

        let Some(bytes) = ctx.collab.loader.load(&key) else {
            debug!(tick = ctx.tick(), entity = %record.id, %key, "path asset unavailable");
            self.unavailable += 1;
            ctx.emit(
                EngineEventKind::AssetUnavailable {
                    entity: record.id,
                    key: key.clone(),
                },
                format!("{} could not load '{key}'", record.name),
            );
            return Ok(());
        };

        match bulk_copy(&bytes, &mut record.path) {
            Ok(copied) => {
                record.path_len = copied;
                self.bytes_copied += copied as u64;
                debug!(tick = ctx.tick(), entity = %record.id, %key, copied, "path reloaded");
            }
            Err(e) => {
                warn!(tick = ctx.tick(), entity = %record.id, %key, error = %e, "path copy failed");
                ctx.emit(
                    EngineEventKind::CopyFailed {
                        entity: record.id,
                        key: key.clone(),
                    },
                    format!("{} could not copy '{key}': {e}", record.name),
                );
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
