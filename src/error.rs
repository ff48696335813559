//! Error types for the quote engine.
//!
//! Validation failures are deliberately NOT represented here: they are
//! reported as a `Vec<FieldError>` so the caller can re-display the form
//! (see [`crate::model::validation`]).

/// Result type alias for quote engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while storing quotes or rendering documents.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (output directory, file write, logo read)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or embedding error
    #[error("Image error: {0}")]
    Image(String),

    /// Uploaded logo exceeds the size cap
    #[error("Logo too large: {size} bytes (max {max})")]
    LogoTooLarge {
        /// Actual upload size in bytes
        size: usize,
        /// Maximum allowed size in bytes
        max: usize,
    },

    /// Quote not found in the store
    #[error("Quote not found: {0}")]
    NotFound(u64),

    /// Quote exists but belongs to another owner
    #[error("Access denied to quote {0}")]
    AccessDenied(u64),

    /// Unique quote-number constraint violated; clear the number and
    /// regenerate before retrying the save
    #[error("Quote number already exists: {0}")]
    DuplicateQuoteNumber(String),
}
