//! voxpop core: synthetic respondent sampling and survey aggregation.
//!
//! This crate holds the deterministic heart of the survey simulator:
//! weighted categorical sampling, population-proportional integer
//! allocation, persona composition, token/cost accounting, and the
//! response-corpus analyzer. Everything here is reproducible given a
//! 64-bit seed: all entropy flows through [`WeightedSampler`], so a
//! whole persona population replays from one number.
//!
//! Provider implementations (live endpoint, offline simulation) and the
//! survey loop live in the `voxpop_provider` and `voxpop_sim` crates.

pub mod allocator;
pub mod analyzer;
pub mod demographics;
pub mod distribution;
pub mod error;
pub mod ledger;
pub mod persona;

pub use allocator::{PopulationAllocation, PopulationAllocator};
pub use analyzer::{KeywordCount, ResponseAnalyzer, SentimentSplit};
pub use demographics::{AgeBracket, DemographicProfile, Generation, DISENGAGED, STUDENT_AGE_CUTOFF};
pub use distribution::{CategoryDistribution, WeightedSampler};
pub use error::CoreError;
pub use ledger::{CostLedger, CostSummary, INPUT_RATE_PER_1K, OUTPUT_RATE_PER_1K, USD_TO_JPY};
pub use persona::{Locale, Persona, PersonaFactory};
