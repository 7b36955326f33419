//! Error types for the revolver engine.

/// Errors that can occur while configuring or loading a revolver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RevolverError {
    /// A cylinder must have at least one chamber.
    #[error("a cylinder needs at least one chamber")]
    InvalidChamberCount,

    /// The live-round count range does not fit the cylinder.
    #[error("invalid load range {min}..={max} for a {chambers}-chamber cylinder")]
    InvalidLoadRange {
        /// Requested minimum number of live rounds.
        min: usize,
        /// Requested maximum number of live rounds.
        max: usize,
        /// Number of chambers in the cylinder.
        chambers: usize,
    },

    /// A reload named a chamber that does not exist.
    #[error("chamber {position} is out of range for a {chambers}-chamber cylinder")]
    PositionOutOfRange {
        /// The offending chamber index.
        position: usize,
        /// Number of chambers in the cylinder.
        chambers: usize,
    },

    /// A reload named the same chamber twice.
    #[error("chamber {0} was loaded more than once")]
    DuplicatePosition(usize),
}

/// Convenience result type for revolver operations.
pub type RevolverResult<T> = Result<T, RevolverError>;
