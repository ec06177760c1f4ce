//! Niche Core - Shared data structures for short-form video niche analysis

pub mod item;
pub mod channel;
pub mod duration;
pub mod niche;

pub use item::{Item, ItemMetrics, RawCount, RawItem, ScoredItem};
pub use channel::{Channel, RawChannel};
pub use duration::parse_iso8601_duration;
pub use niche::Niche;

/// Result type for Niche Core operations
pub type Result<T> = std::result::Result<T, NicheCoreError>;

/// Error types for Niche Core operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NicheCoreError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Unparsable timestamp: {0}")]
    UnparsableTimestamp(String),

    #[error("Invalid count for {field}: {value}")]
    InvalidCount { field: String, value: String },

    #[error("Vectorization failed: {0}")]
    VectorizationFailure(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl NicheCoreError {
    /// Whether this error describes bad upstream data rather than a caller bug.
    /// Data faults are absorbed and defaulted by the analysis stages.
    pub fn is_data_fault(&self) -> bool {
        matches!(
            self,
            NicheCoreError::MissingField(_)
                | NicheCoreError::UnparsableTimestamp(_)
                | NicheCoreError::VectorizationFailure(_)
        )
    }
}
