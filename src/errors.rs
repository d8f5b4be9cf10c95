use thiserror::Error;

/// Failures of the outline loader and the CLI. Context lookups themselves
/// never fail; absence is reported as `None`.
#[derive(Debug, Error)]
pub enum ContextError {
    // Outline file could not be read
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // Outline text is not valid JSON
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    // Fact with the wrong shape in an outline, e.g. a non-string alias target.
    #[error("invalid outline: {0}")]
    Outline(String),
}

// Result alias used by the loader and the CLI
pub type Result<T> = std::result::Result<T, ContextError>;
