//! Error types for the digest pipeline.
//!
//! Two families exist:
//! - [`DigestError`]: fatal startup problems and the few I/O failures that
//!   end a run (writing the digest, saving the ledger). Per-feed failures
//!   also use it, but the pipeline logs and skips those instead of
//!   propagating them.
//! - [`ServiceError`]: failures of the summarization capability. These are
//!   always converted into a placeholder summary by the pipeline.

use thiserror::Error;

/// Errors raised by configuration, feeds, the ledger and output writing.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error("CLAUDE_API_KEY not found in environment variables. Please set it in your .env file.")]
    MissingCredential,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error for {url}: {reason}")]
    FeedParse { url: String, reason: String },

    #[error("Ledger error: {0}")]
    Ledger(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by a [`crate::api::Summarizer`].
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

pub type Result<T> = std::result::Result<T, DigestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message_names_variable() {
        let msg = DigestError::MissingCredential.to_string();
        assert!(msg.contains("CLAUDE_API_KEY"));
    }

    #[test]
    fn test_service_error_api_display() {
        let err = ServiceError::Api {
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "API returned 429: rate limited");
    }
}
