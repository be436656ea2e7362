//! The provider capability trait.

use crate::types::{GenerationOutcome, SearchResult};
use async_trait::async_trait;
use voxpop_core::{CostLedger, Persona};

/// A source of survey text: persona responses, context summaries, and
/// corpus analyses.
///
/// All three operations return a [`GenerationOutcome`] rather than a
/// `Result`: one failed respondent must not abort a survey, so failures
/// travel as data and the caller decides what to do with them. Every
/// call, failed or not, is recorded in the provider's ledger.
#[async_trait]
pub trait ResponseProvider: Send {
    /// Produces one persona's answer to the survey question, optionally
    /// conditioned on a context summary.
    async fn generate(
        &mut self,
        persona: &Persona,
        question: &str,
        context: Option<&str>,
    ) -> GenerationOutcome;

    /// Condenses search results into a short background summary.
    async fn summarize_search(
        &mut self,
        results: &[SearchResult],
        question: &str,
    ) -> GenerationOutcome;

    /// Produces a structured analysis of the collected response corpus.
    async fn analyze_corpus(
        &mut self,
        responses: &[String],
        question: &str,
    ) -> GenerationOutcome;

    /// The cost ledger this provider records into.
    fn ledger(&self) -> &CostLedger;
}
