//! Response providers: the capability seam between survey orchestration
//! and whatever produces respondent text.
//!
//! The [`ResponseProvider`] trait covers the three operations a survey
//! needs (persona responses, search summarization, corpus analysis).
//! [`LiveProvider`] speaks to an OpenAI-compatible chat endpoint;
//! deterministic offline providers implement the same trait elsewhere.

pub mod error;
pub mod live;
pub mod prompt;
pub mod provider;
pub mod types;

pub use error::ProviderError;
pub use live::LiveProvider;
pub use provider::ResponseProvider;
pub use types::{
    estimate_tokens, truncate_chars, GenerationOutcome, SearchResult, ANALYSIS_CHAR_CAP,
    ERROR_CHAR_CAP, RESPONSE_CHAR_CAP, SUMMARY_CHAR_CAP,
};
