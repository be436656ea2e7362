//! Live provider speaking to an OpenAI-compatible chat endpoint.

use crate::error::ProviderError;
use crate::prompt;
use crate::provider::ResponseProvider;
use crate::types::{
    estimate_tokens, truncate_chars, GenerationOutcome, SearchResult, ANALYSIS_CHAR_CAP,
    RESPONSE_CHAR_CAP, SUMMARY_CHAR_CAP,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use voxpop_core::{CostLedger, Persona};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Deadline for persona and summary calls.
const CALL_TIMEOUT_SECS: u64 = 45;

/// Deadline for the corpus analysis call, which carries a much larger
/// prompt.
const ANALYSIS_TIMEOUT_SECS: u64 = 60;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: MessageBody,
}

#[derive(Deserialize)]
struct MessageBody {
    content: String,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

/// Per-call tuning: output cap, request parameters, deadline.
struct CallParams {
    char_cap: usize,
    max_tokens: u32,
    temperature: f64,
    timeout_secs: u64,
}

/// Provider backed by a chat-completion HTTP endpoint.
///
/// Holds its own [`CostLedger`] at live rates; every request, including
/// failed ones, is recorded there.
pub struct LiveProvider {
    api_key: String,
    model: String,
    base_url: String,
    http: reqwest::Client,
    ledger: CostLedger,
}

impl LiveProvider {
    /// Provider against the default endpoint and model.
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: OPENAI_API_URL.to_string(),
            http: reqwest::Client::new(),
            ledger: CostLedger::live(),
        }
    }

    /// Provider configured from the `OPENAI_API_KEY` environment
    /// variable.
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::MissingApiKey)?;
        Ok(Self::new(api_key))
    }

    /// Overrides the endpoint base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Overrides the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// One chat-completion round trip. Returns the reply text plus the
    /// endpoint-reported token usage when present.
    async fn chat(
        &self,
        prompt: &str,
        params: &CallParams,
    ) -> Result<(String, Option<(u64, u64)>), ProviderError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![WireMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: params.max_tokens,
            temperature: params.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(params.timeout_secs))
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, params.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::from_reqwest(e, params.timeout_secs))?;

        let ChatResponse { choices, usage } = parsed;
        let text = choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| ProviderError::Malformed("no choices in response".into()))?;

        Ok((
            text,
            usage.map(|u| (u.prompt_tokens, u.completion_tokens)),
        ))
    }

    /// Runs one call end to end: estimate, request, cap, record.
    async fn run_call(
        &mut self,
        prompt: String,
        params: CallParams,
        error_prefix: &str,
    ) -> GenerationOutcome {
        let estimated_input = estimate_tokens(&prompt);

        match self.chat(&prompt, &params).await {
            Ok((text, usage)) => {
                let text = truncate_chars(text.trim(), params.char_cap);
                let (input_tokens, output_tokens) = match usage {
                    Some((input, output)) => (input, output),
                    None => (estimated_input, estimate_tokens(&text)),
                };
                self.ledger.add_usage(input_tokens, output_tokens);
                let cost = self.ledger.cost_of(input_tokens, output_tokens);
                GenerationOutcome::ok(text, input_tokens, output_tokens, cost)
            }
            Err(err) => {
                debug!(error = %err, "{error_prefix}");
                // The request went out, so its input side is billed.
                self.ledger.add_usage(estimated_input, 0);
                let cost = self.ledger.cost_of(estimated_input, 0);
                GenerationOutcome::failed(error_prefix, &err.to_string(), estimated_input, cost)
            }
        }
    }
}

#[async_trait]
impl ResponseProvider for LiveProvider {
    async fn generate(
        &mut self,
        persona: &Persona,
        question: &str,
        context: Option<&str>,
    ) -> GenerationOutcome {
        let prompt = prompt::persona_prompt(persona, question, context);
        self.run_call(
            prompt,
            CallParams {
                char_cap: RESPONSE_CHAR_CAP,
                max_tokens: 120,
                temperature: 0.9,
                timeout_secs: CALL_TIMEOUT_SECS,
            },
            "API error",
        )
        .await
    }

    async fn summarize_search(
        &mut self,
        results: &[SearchResult],
        question: &str,
    ) -> GenerationOutcome {
        let prompt = prompt::summary_prompt(results, question);
        self.run_call(
            prompt,
            CallParams {
                char_cap: SUMMARY_CHAR_CAP,
                max_tokens: 150,
                temperature: 0.3,
                timeout_secs: CALL_TIMEOUT_SECS,
            },
            "Summary error",
        )
        .await
    }

    async fn analyze_corpus(
        &mut self,
        responses: &[String],
        question: &str,
    ) -> GenerationOutcome {
        let prompt = prompt::analysis_prompt(responses, question);
        self.run_call(
            prompt,
            CallParams {
                char_cap: ANALYSIS_CHAR_CAP,
                max_tokens: 3000,
                temperature: 0.3,
                timeout_secs: ANALYSIS_TIMEOUT_SECS,
            },
            "Analysis error",
        )
        .await
    }

    fn ledger(&self) -> &CostLedger {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxpop_core::{DemographicProfile, PersonaFactory};

    #[test]
    fn test_new_uses_defaults() {
        let provider = LiveProvider::new("key".into());
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert_eq!(provider.base_url, OPENAI_API_URL);
        assert_eq!(provider.ledger().requests_count(), 0);
    }

    #[test]
    fn test_builders_override_endpoint_and_model() {
        let provider = LiveProvider::new("key".into())
            .with_base_url("http://localhost:8080")
            .with_model("gpt-4o");
        assert_eq!(provider.base_url, "http://localhost:8080");
        assert_eq!(provider.model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_yields_failed_outcome() {
        let mut provider =
            LiveProvider::new("key".into()).with_base_url("http://127.0.0.1:1");
        let mut factory = PersonaFactory::new(DemographicProfile::japan(), 1);
        let persona = factory.generate(1).unwrap();

        let outcome = provider.generate(&persona, "Q?", None).await;

        assert!(!outcome.success);
        assert!(outcome.text.starts_with("API error: "));
        // The failed request is still on the ledger.
        assert_eq!(provider.ledger().requests_count(), 1);
        assert!(provider.ledger().total_input_tokens() > 0);
        assert_eq!(provider.ledger().total_output_tokens(), 0);
    }
}
