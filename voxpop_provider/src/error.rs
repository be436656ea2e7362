//! Provider error types.

use thiserror::Error;

/// Errors raised while producing text through a provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The call did not complete within its deadline.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The endpoint answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never reached the endpoint.
    #[error("transport error: {0}")]
    Transport(String),

    /// The endpoint answered but the payload was unusable.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// No API key was configured.
    #[error("missing API key (set OPENAI_API_KEY)")]
    MissingApiKey,
}

impl ProviderError {
    /// Classifies a reqwest failure, preserving the deadline for
    /// timeout reporting.
    pub fn from_reqwest(err: reqwest::Error, timeout_secs: u64) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(timeout_secs)
        } else if err.is_decode() {
            ProviderError::Malformed(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ProviderError::Timeout(45);
        assert_eq!(err.to_string(), "request timed out after 45s");

        let err = ProviderError::Http {
            status: 429,
            body: "rate limited".into(),
        };
        assert!(err.to_string().contains("429"));
    }
}
