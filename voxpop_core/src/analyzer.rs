//! Keyword and sentiment aggregation over response corpora.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Number of keywords reported.
const TOP_KEYWORDS: usize = 15;

/// Word-forming runs per script: ASCII words of three letters or more,
/// Hiragana/Katakana/Han runs of two characters or more.
const TOKEN_PATTERN: &str =
    r"[a-z]{3,}|\p{Hiragana}{2,}|\p{Katakana}{2,}|\p{Han}{2,}";

const STOP_WORDS: &[&str] = &[
    // English function words that survive the length filter
    "the", "and", "are", "which", "our", "for", "with", "that", "this",
    // Japanese particles
    "の", "は", "が", "を", "に", "で", "と", "から", "も",
];

const POSITIVE_WORDS: &[&str] = &[
    "good",
    "necessary",
    "important",
    "cooperation",
    "protection",
    "development",
    "prosperity",
];

const NEGATIVE_WORDS: &[&str] = &[
    "dangerous",
    "difficult",
    "threat",
    "anxiety",
    "problem",
    "decline",
    "destruction",
];

/// A keyword with its corpus frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Three-way sentiment split, as percentages of the response count.
///
/// The three figures come from independent divisions and are not forced
/// to sum to exactly 100 after rounding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SentimentSplit {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

/// Aggregates a response corpus into keywords and a sentiment split.
pub struct ResponseAnalyzer {
    token_pattern: Regex,
    stop_words: HashSet<&'static str>,
}

impl ResponseAnalyzer {
    /// Creates an analyzer with the built-in stop words and lexicons.
    pub fn new() -> Self {
        Self {
            token_pattern: Regex::new(TOKEN_PATTERN).expect("static pattern"),
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Extracts the 15 most frequent keywords across all responses.
    ///
    /// Tokens are lowercased word-forming runs; stop words are dropped.
    /// Ties are broken by first-encountered order (the counting pass is
    /// stable).
    pub fn extract_keywords(&self, responses: &[String]) -> Vec<KeywordCount> {
        let all_text = responses.join(" ").to_lowercase();

        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut order: Vec<String> = Vec::new();

        for token in self.token_pattern.find_iter(&all_text) {
            let word = token.as_str();
            if self.stop_words.contains(word) {
                continue;
            }
            if !counts.contains_key(word) {
                order.push(word.to_string());
            }
            *counts.entry(word.to_string()).or_insert(0) += 1;
        }

        let mut ranked: Vec<KeywordCount> = order
            .into_iter()
            .map(|word| {
                let count = counts[&word];
                KeywordCount { word, count }
            })
            .collect();
        // Stable sort keeps first-encounter order among equal counts.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(TOP_KEYWORDS);
        ranked
    }

    /// Classifies each response by lexicon hits (substring counting, not
    /// token matching) and returns the three classes as percentages of
    /// the response count. An empty corpus yields all zeros.
    pub fn analyze_sentiment(&self, responses: &[String]) -> SentimentSplit {
        if responses.is_empty() {
            return SentimentSplit {
                positive: 0.0,
                negative: 0.0,
                neutral: 0.0,
            };
        }

        let mut positive = 0usize;
        let mut negative = 0usize;
        let mut neutral = 0usize;

        for response in responses {
            let lower = response.to_lowercase();
            let pos_score: usize = POSITIVE_WORDS
                .iter()
                .map(|w| lower.matches(w).count())
                .sum();
            let neg_score: usize = NEGATIVE_WORDS
                .iter()
                .map(|w| lower.matches(w).count())
                .sum();

            if pos_score > neg_score {
                positive += 1;
            } else if neg_score > pos_score {
                negative += 1;
            } else {
                neutral += 1;
            }
        }

        let total = responses.len() as f64;
        SentimentSplit {
            positive: positive as f64 / total * 100.0,
            negative: negative as f64 / total * 100.0,
            neutral: neutral as f64 / total * 100.0,
        }
    }
}

impl Default for ResponseAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
