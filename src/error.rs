//! Classified error types for the sync pipeline
//!
//! The analysis pipeline records per-file failures as plain strings on
//! [`crate::analysis::FileAnalysis`]; only the sync pipeline needs error
//! classes a caller can match on to decide between aborting and continuing.

use thiserror::Error;

/// Fatal failure classes surfaced by the documentation sync run
#[derive(Debug, Error)]
pub enum SyncError {
    /// Required credential missing; checked before any network call
    #[error("no API credential configured (set GEMINI_API_KEY)")]
    MissingCredential,

    /// The service rejected the request; retrying would not help
    #[error("generation request rejected with status {status}: {message}")]
    Client { status: u16, message: String },

    /// The retry budget was spent on transient failures
    #[error("generation failed after {attempts} attempts, last cause: {cause}")]
    RetriesExhausted { attempts: u32, cause: String },

    /// The service acknowledged success but produced no usable text
    #[error("generation response carried no generated text")]
    InvalidResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_cause() {
        let err = SyncError::RetriesExhausted {
            attempts: 3,
            cause: "status 503".to_string(),
        };
        assert!(err.to_string().contains("3 attempts"));
        assert!(err.to_string().contains("503"));

        let err = SyncError::Client {
            status: 404,
            message: "model not found".to_string(),
        };
        assert!(err.to_string().contains("404"));
    }
}
