//! Shared provider data types and length caps.

use serde::{Deserialize, Serialize};

/// Character cap for one persona response.
pub const RESPONSE_CHAR_CAP: usize = 100;

/// Character cap for a search-context summary.
pub const SUMMARY_CHAR_CAP: usize = 300;

/// Character cap for a full corpus analysis.
pub const ANALYSIS_CHAR_CAP: usize = 3600;

/// Character cap for the error reason embedded in a failed outcome.
pub const ERROR_CHAR_CAP: usize = 50;

/// Marker appended when text is cut at a cap.
pub const ELLIPSIS: &str = "...";

/// One search hit fed into context summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Headline of the article
    pub title: String,

    /// Short article excerpt
    pub snippet: String,

    /// Source URL
    pub url: String,

    /// Publication date, as the source reports it
    pub date: String,
}

/// The result of one provider call, successful or not.
///
/// Failures are data, not errors: a failed call still carries its token
/// estimate and cost so the ledger and the survey totals stay honest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationOutcome {
    /// Whether the call produced usable text
    pub success: bool,

    /// Generated text, or a capped error description on failure
    pub text: String,

    /// Input tokens, from the endpoint when reported, estimated otherwise
    pub input_tokens: u64,

    /// Output tokens, from the endpoint when reported, estimated otherwise
    pub output_tokens: u64,

    /// Cost of this call in USD at the provider's rates
    pub cost_usd: f64,
}

impl GenerationOutcome {
    /// Successful outcome.
    pub fn ok(text: String, input_tokens: u64, output_tokens: u64, cost_usd: f64) -> Self {
        Self {
            success: true,
            text,
            input_tokens,
            output_tokens,
            cost_usd,
        }
    }

    /// Failed outcome. The reason is capped so one huge error body cannot
    /// flood exports; the input-token estimate is kept because the
    /// request was still sent.
    pub fn failed(prefix: &str, reason: &str, input_tokens: u64, cost_usd: f64) -> Self {
        Self {
            success: false,
            text: format!("{prefix}: {}", truncate_chars(reason, ERROR_CHAR_CAP)),
            input_tokens,
            output_tokens: 0,
            cost_usd,
        }
    }
}

/// Caps text at `cap` characters (not bytes), replacing the tail with
/// the ellipsis marker. Text at or under the cap passes through
/// unchanged.
pub fn truncate_chars(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        return text.to_string();
    }
    let kept: String = text.chars().take(cap.saturating_sub(ELLIPSIS.len())).collect();
    format!("{kept}{ELLIPSIS}")
}

/// Like [`truncate_chars`], but backs up to the last space in the final
/// fifth of the kept text so the cut lands on a word boundary when one
/// is close enough.
pub fn trim_snippet(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        return text.to_string();
    }
    let mut kept: Vec<char> = text.chars().take(cap.saturating_sub(ELLIPSIS.len())).collect();
    let floor = kept.len().saturating_sub(kept.len() / 5);
    if let Some(pos) = kept.iter().rposition(|c| *c == ' ') {
        if pos >= floor {
            kept.truncate(pos);
        }
    }
    let kept: String = kept.into_iter().collect();
    format!("{kept}{ELLIPSIS}")
}

/// Rough token estimate from whitespace word count.
pub fn estimate_tokens(text: &str) -> u64 {
    (text.split_whitespace().count() as f64 * 1.3) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_chars("hello", 100), "hello");
    }

    #[test]
    fn test_truncate_caps_at_char_count() {
        let text = "a".repeat(150);
        let capped = truncate_chars(&text, 100);
        assert_eq!(capped.chars().count(), 100);
        assert!(capped.ends_with("..."));
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let text = "あ".repeat(120);
        let capped = truncate_chars(&text, 100);
        assert_eq!(capped.chars().count(), 100);
    }

    #[test]
    fn test_trim_snippet_backs_up_to_word_boundary() {
        let text = "one two three four five six seven eight nine ten eleven twelve";
        let trimmed = trim_snippet(text, 30);
        assert!(trimmed.chars().count() <= 30);
        assert!(trimmed.ends_with("..."));
        // Nothing between the last full word and the marker.
        assert!(!trimmed.trim_end_matches("...").ends_with(' '));
    }

    #[test]
    fn test_trim_snippet_without_nearby_space_hard_cuts() {
        let text = "x".repeat(200);
        let trimmed = trim_snippet(&text, 50);
        assert_eq!(trimmed.chars().count(), 50);
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens("one two three four"), 5); // 4 * 1.3 = 5.2
        assert_eq!(estimate_tokens(""), 0);
    }

    #[test]
    fn test_failed_outcome_caps_reason() {
        let reason = "e".repeat(500);
        let outcome = GenerationOutcome::failed("API error", &reason, 42, 0.001);
        assert!(!outcome.success);
        assert!(outcome.text.starts_with("API error: "));
        assert!(outcome.text.chars().count() <= "API error: ".len() + ERROR_CHAR_CAP);
        assert_eq!(outcome.input_tokens, 42);
        assert_eq!(outcome.output_tokens, 0);
    }
}
