use thiserror::Error;

/// Convenient result alias for the rentdesk library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// These errors never escape [`crate::Datastore::load`]; the loader converts
/// them into a fixture fallback. They are surfaced by the lower-level readers
/// in [`crate::loader`] so callers that want strict behavior can opt in.
#[derive(Debug, Error)]
pub enum Error {
    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the data directory")]
    ProjectDirsUnavailable,

    /// The header row did not contain a single recognised column.
    #[error("{dataset} sheet has no recognised columns; found: {found}")]
    UnrecognisedHeaders { dataset: &'static str, found: String },

    /// Wrapper for CSV parsing errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
