//! Survey simulation harness: a deterministic offline provider, the
//! orchestrator that drives a full survey session, demo search
//! results, and report export.

pub mod export;
pub mod runner;
pub mod search;
pub mod simulated;

pub use runner::{
    ResponseRecord, SessionConfig, SessionReport, SurveyOrchestrator, SurveyOutcome,
    SurveySession,
};
pub use simulated::SimulatedProvider;
