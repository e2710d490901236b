use thiserror::Error;

/// Convenience alias used across the engine.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Everything that can go wrong between a raw upload and a served page.
///
/// Validation failures carry enough context to fix the offending file
/// (1-based data-row number plus every missing field of that row). Auth
/// failures are deliberately vague.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// A bulk-upload row failed required-field validation.
    #[error("row {} is missing required fields: {}", .row, .missing.join(", "))]
    MissingFields { row: usize, missing: Vec<String> },

    /// A manually built record failed the same required-field invariant.
    #[error("record is missing required fields: {}", .missing.join(", "))]
    IncompleteRecord { missing: Vec<String> },

    /// Structurally malformed CSV input, e.g. ragged rows or a broken quote.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Undecodable JSON, either a corrupt collection file or bad input.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The staged upload would exceed the store's atomic batch ceiling.
    #[error("staged batch of {staged} records exceeds the atomic batch limit of {max}")]
    BatchTooLarge { staged: usize, max: usize },

    #[error("no record with id {id}")]
    NotFound { id: String },

    /// Bad credentials. No hint which half was wrong.
    #[error("sign-in failed, check your credentials")]
    AuthFailed,

    /// A gated operation was attempted without an admin session.
    #[error("admin operations require an active session")]
    SessionRequired,
}
