//! Deterministic offline provider.
//!
//! Responses are drawn from fixed per-generation pattern tables, keyed
//! by a coarse sentiment bucket derived from cue words in the question.
//! The same seed always produces the same survey. Token counts follow a
//! fixed arithmetic so cost-flow paths can be exercised without spend.

use async_trait::async_trait;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand::SeedableRng;
use std::time::Duration;
use tracing::debug;
use voxpop_core::{CostLedger, Generation, Persona, DISENGAGED};
use voxpop_provider::{
    truncate_chars, GenerationOutcome, ResponseProvider, SearchResult, ANALYSIS_CHAR_CAP,
    RESPONSE_CHAR_CAP, SUMMARY_CHAR_CAP,
};

/// Simulated per-call latency, so progress output paces like a live run.
const DEFAULT_LATENCY: Duration = Duration::from_millis(100);

/// Flat input-token overhead standing in for the prompt scaffolding.
const PROMPT_OVERHEAD_TOKENS: u64 = 100;

const SUMMARY_TOKENS: (u64, u64) = (50, 100);
const ANALYSIS_TOKENS: (u64, u64) = (200, 3000);

#[derive(Clone, Copy)]
enum SentimentBucket {
    Positive,
    Negative,
    Neutral,
}

const DISENGAGED_PATTERNS: &[&str] = &[
    "Not interested in politics, sorry. No strong opinion.",
    "I don't really follow this kind of thing.",
    "No particular opinion. It doesn't affect my daily life much.",
];

fn patterns(generation: Generation, bucket: SentimentBucket) -> &'static [&'static str] {
    use Generation::*;
    use SentimentBucket::*;
    match (generation, bucket) {
        (GenZ, Positive) => &[
            "Honestly this feels like a good move. We need this kind of cooperation going forward.",
            "I'm for it. It's important for people my age and long overdue.",
            "Seems good to me, especially the development side. Hope it actually happens.",
        ],
        (GenZ, Negative) => &[
            "Feels like a problem nobody my age asked for. Kind of gives me anxiety honestly.",
            "Not a fan. It sounds difficult and expensive, and we'll end up paying for it later.",
            "This seems dangerous for regular people. Hard pass from me.",
        ],
        (GenZ, Neutral) => &[
            "Haven't really thought about it much. Could go either way I guess.",
            "Depends on the details. I'd want to see how it works first.",
            "Not sure. My friends don't talk about this stuff much.",
        ],
        (Millennial, Positive) => &[
            "As a working parent I think it's good and necessary. The details matter though.",
            "Overall positive. Cooperation between generations is important here.",
            "I support it if the development is managed properly for families like mine.",
        ],
        (Millennial, Negative) => &[
            "Between work and kids this looks like another problem landing on my generation.",
            "I'm worried. It feels difficult to fund and a threat to household budgets.",
            "Skeptical. The anxiety around costs is real for people raising kids.",
        ],
        (Millennial, Neutral) => &[
            "I can see both sides. It depends on implementation.",
            "Too busy to follow it closely, but I'd want safeguards either way.",
            "Mixed feelings. Some parts make sense, others don't.",
        ],
        (GenX, Positive) => &[
            "From what I've seen at work, it's a necessary step. Good for stability.",
            "I back it. Protection of jobs and steady development matter at my age.",
            "Sensible, if a bit late. Important for the next generation too.",
        ],
        (GenX, Negative) => &[
            "Another burden on my generation. The funding problem is never explained.",
            "I doubt it. It looks difficult to execute and a threat to small businesses.",
            "Concerned. Decline in services is what usually follows plans like this.",
        ],
        (GenX, Neutral) => &[
            "I'd need to see the numbers before deciding.",
            "Neither for nor against. Depends who pays.",
            "Hard to say. These things change shape by the time they pass.",
        ],
        (Bubble, Positive) => &[
            "Having seen the bubble years, steady development like this is good for the country.",
            "I support it. Protection of livelihoods should come first and this helps.",
            "A necessary course correction, in my view. Better late than never.",
        ],
        (Bubble, Negative) => &[
            "We have seen this before. It ends in decline and broken promises.",
            "The costs worry me. It feels like a problem pushed onto people near retirement.",
            "I am against it. Too difficult to manage and a threat to savings.",
        ],
        (Bubble, Neutral) => &[
            "At my age I have learned to wait and see.",
            "It depends on execution. Plans are easy, follow-through is rare.",
            "No strong view yet. I would like more public debate first.",
        ],
        (Senior, Positive) => &[
            "For the grandchildren's sake this is necessary. Good to see some action at last.",
            "I am in favor. Protection for ordinary people is what matters most.",
            "A good direction. We managed harder things in my day with cooperation.",
        ],
        (Senior, Negative) => &[
            "My pension is my worry. This sounds like another problem for the elderly.",
            "Dangerous, if you ask me. The destruction of old systems rarely helps anyone.",
            "I oppose it. Such changes are difficult for people living alone.",
        ],
        (Senior, Neutral) => &[
            "I leave these matters to the younger people now.",
            "Hard to judge. The television says different things every day.",
            "No firm opinion. I mostly worry about daily life.",
        ],
    }
}

const POSITIVE_CUES: &[&str] = &["support", "improve", "promote", "protect", "cooperation"];
const NEGATIVE_CUES: &[&str] = &["problem", "risk", "danger", "threat", "concern"];

/// Classifies the question into a coarse sentiment bucket by cue-word
/// matching. Positive cues win ties.
fn question_bucket(question: &str) -> SentimentBucket {
    let lower = question.to_lowercase();
    if POSITIVE_CUES.iter().any(|cue| lower.contains(cue)) {
        SentimentBucket::Positive
    } else if NEGATIVE_CUES.iter().any(|cue| lower.contains(cue)) {
        SentimentBucket::Negative
    } else {
        SentimentBucket::Neutral
    }
}

/// Offline provider with seeded, reproducible output.
pub struct SimulatedProvider {
    rng: ChaCha8Rng,
    ledger: CostLedger,
    latency: Option<Duration>,
}

impl SimulatedProvider {
    /// Seeded provider with the default simulated latency.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            ledger: CostLedger::free(),
            latency: Some(DEFAULT_LATENCY),
        }
    }

    /// Drops the simulated latency. Used by tests.
    pub fn without_latency(mut self) -> Self {
        self.latency = None;
        self
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl ResponseProvider for SimulatedProvider {
    async fn generate(
        &mut self,
        persona: &Persona,
        question: &str,
        _context: Option<&str>,
    ) -> GenerationOutcome {
        self.pause().await;

        let text = if persona.political_leaning == DISENGAGED {
            let idx = self.rng.gen_range(0..DISENGAGED_PATTERNS.len());
            DISENGAGED_PATTERNS[idx].to_string()
        } else {
            let bucket = question_bucket(question);
            let table = patterns(persona.generation, bucket);
            let idx = self.rng.gen_range(0..table.len());
            table[idx].to_string()
        };
        let text = truncate_chars(&text, RESPONSE_CHAR_CAP);

        let input_tokens =
            question.split_whitespace().count() as u64 + PROMPT_OVERHEAD_TOKENS;
        let output_tokens = text.split_whitespace().count() as u64 * 2;
        self.ledger.add_usage(input_tokens, output_tokens);
        debug!(persona = persona.id, "simulated response generated");

        GenerationOutcome::ok(text, input_tokens, output_tokens, 0.0)
    }

    async fn summarize_search(
        &mut self,
        results: &[SearchResult],
        question: &str,
    ) -> GenerationOutcome {
        self.pause().await;

        let text = truncate_chars(
            &format!(
                "Recent coverage ({} articles) shows active debate around \"{question}\". \
                 Opinions split along age and regional lines; policy details are still \
                 being negotiated and further announcements are expected.",
                results.len()
            ),
            SUMMARY_CHAR_CAP,
        );
        let (input_tokens, output_tokens) = SUMMARY_TOKENS;
        self.ledger.add_usage(input_tokens, output_tokens);

        GenerationOutcome::ok(text, input_tokens, output_tokens, 0.0)
    }

    async fn analyze_corpus(
        &mut self,
        responses: &[String],
        question: &str,
    ) -> GenerationOutcome {
        self.pause().await;

        let text = truncate_chars(
            &format!(
                "Analysis of {} responses to \"{question}\".\n\n\
                 1. Overall landscape: opinion is divided, with support concentrated \
                 among respondents citing cooperation and development, and opposition \
                 driven by cost and funding concerns.\n\
                 2. Majority and minority positions: no single camp holds a clear \
                 majority; neutral and undecided voices are a substantial bloc.\n\
                 3. Generational differences: younger respondents weigh long-term \
                 impact, older respondents weigh pensions and stability.\n\
                 4. Urban and rural: urban respondents reference policy detail more \
                 often; rural respondents emphasize daily-life impact.\n\
                 5. Recurring themes: funding, fairness between generations, and \
                 trust in follow-through.\n\
                 6. Conclusion: views track age and economic exposure more than \
                 region; any consensus will depend on how costs are distributed.",
                responses.len()
            ),
            ANALYSIS_CHAR_CAP,
        );
        let (input_tokens, output_tokens) = ANALYSIS_TOKENS;
        self.ledger.add_usage(input_tokens, output_tokens);

        GenerationOutcome::ok(text, input_tokens, output_tokens, 0.0)
    }

    fn ledger(&self) -> &CostLedger {
        &self.ledger
    }
}
