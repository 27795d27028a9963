//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the reporting pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// A finish-type event carried a result status outside the closed
    /// vocabulary. Deliberately unrecoverable: there is no safe default
    /// mapping for an unknown verdict, and guessing would corrupt
    /// downstream pass/fail accounting.
    #[error("the status '{status}' is not an implemented test status. Event: '{event}'")]
    UnknownStatus { status: String, event: String },

    /// A recognized event was missing an attribute the input contract
    /// promises (e.g. a `start-test` without an `id`).
    #[error("malformed test event: {0}")]
    MalformedEvent(String),

    /// XML fragment parsing errors.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors (transport sends, relay input).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

// Convenience constructors
impl Error {
    pub fn unknown_status(status: impl Into<String>, event: impl Into<String>) -> Self {
        Self::UnknownStatus {
            status: status.into(),
            event: event.into(),
        }
    }

    pub fn malformed_event(msg: impl Into<String>) -> Self {
        Self::MalformedEvent(msg.into())
    }
}
