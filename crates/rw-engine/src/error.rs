use rw_core::{CopyError, CoreError, DivisionFault, EntityId};

/// Alias for `Result<T, EngineError>`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the engine and its stages.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// No record with this ID is loaded.
    #[error("entity not found in engine: {0}")]
    EntityNotFound(EntityId),

    /// A guarded division failed during dispatch.
    #[error(transparent)]
    Division(#[from] DivisionFault),

    /// A counted copy into a record buffer failed.
    #[error(transparent)]
    Copy(#[from] CopyError),

    /// A record could not be built or validated.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The engine configuration is unusable.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A custom stage failed.
    #[error("stage error: {0}")]
    StageError(String),
}
