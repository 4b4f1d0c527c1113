/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// A guarded integer division that refused to run.
///
/// Raised instead of trapping or wrapping. The operands are kept so the
/// host can report what was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DivisionFault {
    /// The denominator was zero.
    #[error("division by zero: {numerator} / 0")]
    ByZero {
        /// The numerator that was being divided.
        numerator: i32,
    },

    /// `i32::MIN / -1` does not fit in an `i32`.
    #[error("division overflow: {numerator} / -1")]
    Overflow {
        /// The numerator that was being divided (always `i32::MIN`).
        numerator: i32,
    },
}

/// Failures of the counted bulk-copy helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CopyError {
    /// The source is shorter than its 4-byte count header.
    #[error("source buffer has no count header ({len} bytes)")]
    MissingHeader {
        /// Actual source length in bytes.
        len: usize,
    },

    /// The header promises more payload than the source holds.
    #[error("source payload truncated: header says {expected} bytes, found {actual}")]
    SourceTruncated {
        /// Payload length announced by the header.
        expected: usize,
        /// Payload bytes actually present.
        actual: usize,
    },

    /// The destination cannot hold the payload.
    #[error("destination too small: need {needed} bytes, have {capacity}")]
    DestinationTooSmall {
        /// Bytes the copy would write.
        needed: usize,
        /// Destination length in bytes.
        capacity: usize,
    },
}

/// Errors raised while building or validating entity records.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A guarded division failed.
    #[error(transparent)]
    Division(#[from] DivisionFault),

    /// A bulk copy could not be performed.
    #[error(transparent)]
    Copy(#[from] CopyError),

    /// Spawn parameters or other record input failed validation.
    #[error("validation error: {0}")]
    Validation(String),
}
