//! Survey orchestration: drives a persona population through a
//! provider and assembles the session report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use voxpop_core::{
    CoreError, CostSummary, DemographicProfile, KeywordCount, Persona, PersonaFactory,
    ResponseAnalyzer, SentimentSplit,
};
use voxpop_provider::{GenerationOutcome, ResponseProvider, SearchResult};

/// One persona's pass through the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseRecord {
    /// Persona that answered
    pub persona_id: u64,

    /// The question as asked
    pub question: String,

    /// Response text, or a capped error description
    pub response: String,

    /// Whether the provider call succeeded
    pub success: bool,

    /// Cost of this single call in USD
    pub cost_usd: f64,

    /// When the response was recorded
    pub timestamp: DateTime<Utc>,

    /// Whether a context summary was included in the prompt
    pub context_used: bool,
}

/// All records from one orchestrator pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyOutcome {
    pub records: Vec<ResponseRecord>,
}

impl SurveyOutcome {
    /// Number of successful responses.
    pub fn successful_count(&self) -> usize {
        self.records.iter().filter(|r| r.success).count()
    }

    /// Summed per-call cost in USD.
    pub fn total_cost(&self) -> f64 {
        self.records.iter().map(|r| r.cost_usd).sum()
    }

    /// Texts of the successful responses only, in survey order.
    pub fn successful_texts(&self) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.success)
            .map(|r| r.response.clone())
            .collect()
    }
}

/// Asks every persona the question, one at a time.
///
/// A failed call is recorded and the survey moves on; one bad
/// respondent never aborts the run.
pub struct SurveyOrchestrator;

impl SurveyOrchestrator {
    /// Runs the question past each persona in order.
    pub async fn run<P: ResponseProvider>(
        provider: &mut P,
        personas: &[Persona],
        question: &str,
        context: Option<&str>,
    ) -> SurveyOutcome {
        let mut records = Vec::with_capacity(personas.len());

        for persona in personas {
            let outcome = provider.generate(persona, question, context).await;
            if outcome.success {
                debug!(persona = persona.id, "response collected");
            } else {
                warn!(persona = persona.id, text = %outcome.text, "response failed");
            }
            records.push(ResponseRecord {
                persona_id: persona.id,
                question: question.to_string(),
                response: outcome.text,
                success: outcome.success,
                cost_usd: outcome.cost_usd,
                timestamp: Utc::now(),
                context_used: context.is_some(),
            });
        }

        SurveyOutcome { records }
    }
}

/// Everything one full session needs.
pub struct SessionConfig {
    /// RNG seed for persona generation and simulated responses
    pub seed: u64,

    /// How many personas to survey
    pub persona_count: usize,

    /// The survey question
    pub question: String,

    /// Search hits to condense into context; empty skips the summary step
    pub search_results: Vec<SearchResult>,

    /// Whether to run the full corpus analysis at the end
    pub analyze: bool,
}

/// Complete exported result of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    /// The survey question
    pub question: String,

    /// Seed the session ran with
    pub seed: u64,

    /// The generated persona population
    pub personas: Vec<Persona>,

    /// Per-persona response records
    pub records: Vec<ResponseRecord>,

    /// How many responses succeeded
    pub successful_count: usize,

    /// Context summary fed to respondents, when one was produced
    pub context_summary: Option<String>,

    /// Corpus analysis outcome, when requested. A failed analysis is
    /// carried here with `success = false` and its capped error text,
    /// so collaborators can render the failure next to the survey data.
    pub analysis: Option<GenerationOutcome>,

    /// Top keywords across successful responses
    pub keywords: Vec<KeywordCount>,

    /// Sentiment split across successful responses
    pub sentiment: SentimentSplit,

    /// Provider cost snapshot
    pub cost: CostSummary,

    /// Summed cost in USD, including summary and analysis calls
    pub total_cost_usd: f64,
}

/// Runs one survey end to end: personas, optional context, responses,
/// aggregation, optional analysis.
pub struct SurveySession;

impl SurveySession {
    pub async fn run<P: ResponseProvider>(
        provider: &mut P,
        config: SessionConfig,
    ) -> Result<SessionReport, CoreError> {
        let mut factory = PersonaFactory::new(DemographicProfile::japan(), config.seed);
        let personas = factory.generate_population(config.persona_count)?;
        info!(count = personas.len(), "persona population generated");

        // Context only flows into prompts when summarization succeeded.
        let mut extra_cost = 0.0;
        let context_summary = if config.search_results.is_empty() {
            None
        } else {
            let outcome = provider
                .summarize_search(&config.search_results, &config.question)
                .await;
            extra_cost += outcome.cost_usd;
            if outcome.success {
                info!("search context summarized");
                Some(outcome.text)
            } else {
                warn!(text = %outcome.text, "context summary failed, running without context");
                None
            }
        };

        let outcome = SurveyOrchestrator::run(
            provider,
            &personas,
            &config.question,
            context_summary.as_deref(),
        )
        .await;
        let successful_count = outcome.successful_count();
        info!(
            successful = successful_count,
            total = outcome.records.len(),
            "survey complete"
        );

        let texts = outcome.successful_texts();
        let analyzer = ResponseAnalyzer::new();
        let keywords = analyzer.extract_keywords(&texts);
        let sentiment = analyzer.analyze_sentiment(&texts);

        // The analysis outcome travels whole, failed or not; a failed
        // analysis must stay visible and must not touch the survey data.
        let analysis = if config.analyze && !texts.is_empty() {
            let result = provider.analyze_corpus(&texts, &config.question).await;
            extra_cost += result.cost_usd;
            if !result.success {
                warn!(text = %result.text, "corpus analysis failed");
            }
            Some(result)
        } else {
            None
        };

        let total_cost_usd = outcome.total_cost() + extra_cost;
        let cost = provider.ledger().summary();

        Ok(SessionReport {
            question: config.question,
            seed: config.seed,
            personas,
            records: outcome.records,
            successful_count,
            context_summary,
            analysis,
            keywords,
            sentiment,
            cost,
            total_cost_usd,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::demo_search_results;
    use crate::simulated::SimulatedProvider;
    use async_trait::async_trait;
    use voxpop_core::CostLedger;
    use voxpop_provider::GenerationOutcome;

    /// Provider that fails every Nth persona call, and optionally the
    /// analysis call.
    struct FailingProvider {
        inner: SimulatedProvider,
        calls: usize,
        fail_every: usize,
        fail_analysis: bool,
    }

    impl FailingProvider {
        fn new(seed: u64, fail_every: usize) -> Self {
            Self {
                inner: SimulatedProvider::new(seed).without_latency(),
                calls: 0,
                fail_every,
                fail_analysis: false,
            }
        }

        fn failing_analysis(seed: u64) -> Self {
            let mut provider = Self::new(seed, usize::MAX);
            provider.fail_analysis = true;
            provider
        }
    }

    #[async_trait]
    impl ResponseProvider for FailingProvider {
        async fn generate(
            &mut self,
            persona: &Persona,
            question: &str,
            context: Option<&str>,
        ) -> GenerationOutcome {
            self.calls += 1;
            if self.calls % self.fail_every == 0 {
                GenerationOutcome::failed("API error", "injected failure", 10, 0.0)
            } else {
                self.inner.generate(persona, question, context).await
            }
        }

        async fn summarize_search(
            &mut self,
            results: &[SearchResult],
            question: &str,
        ) -> GenerationOutcome {
            self.inner.summarize_search(results, question).await
        }

        async fn analyze_corpus(
            &mut self,
            responses: &[String],
            question: &str,
        ) -> GenerationOutcome {
            if self.fail_analysis {
                GenerationOutcome::failed("Analysis error", "injected failure", 10, 0.0)
            } else {
                self.inner.analyze_corpus(responses, question).await
            }
        }

        fn ledger(&self) -> &CostLedger {
            self.inner.ledger()
        }
    }

    fn config(count: usize) -> SessionConfig {
        SessionConfig {
            seed: 42,
            persona_count: count,
            question: "Should the consumption tax change?".to_string(),
            search_results: Vec::new(),
            analyze: false,
        }
    }

    #[tokio::test]
    async fn test_session_produces_one_record_per_persona() {
        let mut provider = SimulatedProvider::new(42).without_latency();
        let report = SurveySession::run(&mut provider, config(25)).await.unwrap();

        assert_eq!(report.personas.len(), 25);
        assert_eq!(report.records.len(), 25);
        assert_eq!(report.successful_count, 25);
        assert!(report.context_summary.is_none());
        assert!(report.analysis.is_none());
        assert!(!report.keywords.is_empty());
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_the_survey() {
        let mut provider = FailingProvider::new(42, 3);
        let report = SurveySession::run(&mut provider, config(12)).await.unwrap();

        assert_eq!(report.records.len(), 12);
        assert_eq!(report.successful_count, 8);
        // Failed responses stay out of the aggregates.
        for keyword in &report.keywords {
            assert_ne!(keyword.word, "injected");
        }
    }

    #[tokio::test]
    async fn test_context_flows_into_report() {
        let mut provider = SimulatedProvider::new(42).without_latency();
        let mut cfg = config(10);
        cfg.search_results = demo_search_results(&cfg.question, 5);
        let report = SurveySession::run(&mut provider, cfg).await.unwrap();

        let summary = report.context_summary.unwrap();
        assert!(summary.contains("5 articles"));
        for record in &report.records {
            assert!(record.context_used);
        }
    }

    #[tokio::test]
    async fn test_analysis_step_runs_when_requested() {
        let mut provider = SimulatedProvider::new(42).without_latency();
        let mut cfg = config(10);
        cfg.analyze = true;
        let report = SurveySession::run(&mut provider, cfg).await.unwrap();

        let analysis = report.analysis.unwrap();
        assert!(analysis.success);
        assert!(analysis.text.contains("10 responses"));
    }

    #[tokio::test]
    async fn test_failed_analysis_stays_visible_in_report() {
        let mut provider = FailingProvider::failing_analysis(42);
        let mut cfg = config(10);
        cfg.analyze = true;
        let report = SurveySession::run(&mut provider, cfg).await.unwrap();

        // The failure is surfaced as its own outcome, distinct from
        // "analysis not requested".
        let analysis = report.analysis.unwrap();
        assert!(!analysis.success);
        assert!(analysis.text.starts_with("Analysis error: "));
        assert!(analysis.text.contains("injected failure"));

        // The survey data collected before the failure is untouched.
        assert_eq!(report.records.len(), 10);
        assert_eq!(report.successful_count, 10);
        assert!(!report.keywords.is_empty());
    }

    #[tokio::test]
    async fn test_same_seed_replays_whole_session() {
        let mut p1 = SimulatedProvider::new(7).without_latency();
        let mut p2 = SimulatedProvider::new(7).without_latency();
        let mut c1 = config(15);
        let mut c2 = config(15);
        c1.seed = 7;
        c2.seed = 7;

        let r1 = SurveySession::run(&mut p1, c1).await.unwrap();
        let r2 = SurveySession::run(&mut p2, c2).await.unwrap();

        for (a, b) in r1.records.iter().zip(&r2.records) {
            assert_eq!(a.persona_id, b.persona_id);
            assert_eq!(a.response, b.response);
        }
    }

    #[tokio::test]
    async fn test_simulated_session_costs_nothing() {
        let mut provider = SimulatedProvider::new(42).without_latency();
        let mut cfg = config(10);
        cfg.analyze = true;
        cfg.search_results = demo_search_results(&cfg.question, 3);
        let report = SurveySession::run(&mut provider, cfg).await.unwrap();

        assert_eq!(report.total_cost_usd, 0.0);
        assert_eq!(report.cost.total_cost_usd, 0.0);
        // Tokens are still metered even at zero cost.
        assert!(report.cost.total_tokens > 0);
        assert_eq!(report.cost.requests_count, 12);
    }
}
