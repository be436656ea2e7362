//! Token and cost accounting for one provider instance.

use serde::{Deserialize, Serialize};

/// USD per 1000 input tokens (gpt-4o-mini pricing).
pub const INPUT_RATE_PER_1K: f64 = 0.00015;

/// USD per 1000 output tokens (gpt-4o-mini pricing).
pub const OUTPUT_RATE_PER_1K: f64 = 0.0006;

/// Fixed exchange rate for the secondary-currency display figure.
pub const USD_TO_JPY: f64 = 150.0;

/// Running token totals for one provider instance.
///
/// Totals are monotonically non-decreasing for the ledger's lifetime and
/// only [`add_usage`](Self::add_usage) mutates them. The cost is
/// recomputed from the totals on every call, never cached, so the two
/// can never drift apart.
#[derive(Debug, Clone)]
pub struct CostLedger {
    total_input_tokens: u64,
    total_output_tokens: u64,
    requests_count: u64,
    rate_in_per_1k: f64,
    rate_out_per_1k: f64,
}

impl CostLedger {
    /// Ledger with explicit per-1000-token rates.
    pub fn new(rate_in_per_1k: f64, rate_out_per_1k: f64) -> Self {
        Self {
            total_input_tokens: 0,
            total_output_tokens: 0,
            requests_count: 0,
            rate_in_per_1k,
            rate_out_per_1k,
        }
    }

    /// Ledger priced at the live endpoint rates.
    pub fn live() -> Self {
        Self::new(INPUT_RATE_PER_1K, OUTPUT_RATE_PER_1K)
    }

    /// Free ledger: tokens are still counted, cost is always zero.
    pub fn free() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Records one request's token usage.
    pub fn add_usage(&mut self, input_tokens: u64, output_tokens: u64) {
        self.total_input_tokens += input_tokens;
        self.total_output_tokens += output_tokens;
        self.requests_count += 1;
    }

    /// Total input tokens so far.
    pub fn total_input_tokens(&self) -> u64 {
        self.total_input_tokens
    }

    /// Total output tokens so far.
    pub fn total_output_tokens(&self) -> u64 {
        self.total_output_tokens
    }

    /// Number of recorded requests.
    pub fn requests_count(&self) -> u64 {
        self.requests_count
    }

    /// Total cost in USD, recomputed from the running totals.
    pub fn total_cost(&self) -> f64 {
        (self.total_input_tokens as f64 / 1000.0) * self.rate_in_per_1k
            + (self.total_output_tokens as f64 / 1000.0) * self.rate_out_per_1k
    }

    /// Cost of a single call at this ledger's rates, without recording it.
    pub fn cost_of(&self, input_tokens: u64, output_tokens: u64) -> f64 {
        (input_tokens as f64 / 1000.0) * self.rate_in_per_1k
            + (output_tokens as f64 / 1000.0) * self.rate_out_per_1k
    }

    /// Snapshot for display/export collaborators.
    pub fn summary(&self) -> CostSummary {
        let total_cost_usd = self.total_cost();
        CostSummary {
            total_input_tokens: self.total_input_tokens,
            total_output_tokens: self.total_output_tokens,
            total_tokens: self.total_input_tokens + self.total_output_tokens,
            requests_count: self.requests_count,
            total_cost_usd,
            total_cost_jpy: total_cost_usd * USD_TO_JPY,
        }
    }
}

/// Exported cost snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSummary {
    /// Total input tokens across all requests
    pub total_input_tokens: u64,

    /// Total output tokens across all requests
    pub total_output_tokens: u64,

    /// Input plus output
    pub total_tokens: u64,

    /// Number of requests recorded
    pub requests_count: u64,

    /// Total cost in USD
    pub total_cost_usd: f64,

    /// Total cost at the fixed JPY exchange rate
    pub total_cost_jpy: f64,
}
