use thiserror::Error;

/// Unified error type for the finance-tracker-core library.
///
/// The calculators and the migrator are total and never return it; only the
/// state container and the storage plumbing do.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage ─────────────────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── State updates ───────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Row not found in {collection}: {id}")]
    RowNotFound { collection: String, id: String },

    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Holding not found: {0}")]
    HoldingNotFound(String),

    #[error("Field '{field}' does not apply to {collection}")]
    InvalidPatch { field: String, collection: String },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
