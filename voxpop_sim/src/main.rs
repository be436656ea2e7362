//! Voxpop survey simulator CLI
//!
//! Runs a synthetic opinion survey over a generated persona population.

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use voxpop_provider::LiveProvider;
use voxpop_sim::search::demo_search_results;
use voxpop_sim::{export, SessionConfig, SessionReport, SimulatedProvider, SurveySession};

const ALLOWED_COUNTS: [usize; 4] = [10, 25, 50, 100];

/// Voxpop synthetic opinion survey CLI
#[derive(Parser, Debug)]
#[command(name = "voxpop-sim")]
#[command(about = "Run synthetic opinion surveys over generated personas", long_about = None)]
struct Args {
    /// Master seed for determinism (0 = random from time)
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Number of personas to survey (10, 25, 50 or 100)
    #[arg(short, long, default_value = "25")]
    count: usize,

    /// The survey question
    #[arg(short, long)]
    question: String,

    /// Provider mode (sim, live)
    #[arg(short, long, default_value = "sim")]
    mode: String,

    /// Summarize demo search results into respondent context
    #[arg(long)]
    search: bool,

    /// Run a full corpus analysis after the survey
    #[arg(long)]
    analyze: bool,

    /// Export the full session report to a JSON file
    #[arg(long)]
    export: Option<PathBuf>,

    /// JSON summary output for CI parsing
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn print_summary(report: &SessionReport, json: bool) {
    if json {
        let summary = serde_json::json!({
            "question": report.question,
            "seed": report.seed,
            "personas": report.personas.len(),
            "successful": report.successful_count,
            "failed": report.records.len() - report.successful_count,
            "sentiment": {
                "positive": report.sentiment.positive,
                "negative": report.sentiment.negative,
                "neutral": report.sentiment.neutral,
            },
            "keywords": report.keywords.iter().map(|k| {
                serde_json::json!({ "word": k.word, "count": k.count })
            }).collect::<Vec<_>>(),
            "total_cost_usd": report.total_cost_usd,
            "total_cost_jpy": report.cost.total_cost_jpy,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{text}"),
            Err(e) => error!("failed to render summary: {e}"),
        }
        return;
    }

    info!("");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!(
        "Survey complete: {}/{} responses",
        report.successful_count,
        report.records.len()
    );
    info!(
        "Sentiment: {:.1}% positive / {:.1}% negative / {:.1}% neutral",
        report.sentiment.positive, report.sentiment.negative, report.sentiment.neutral
    );
    if !report.keywords.is_empty() {
        let top: Vec<String> = report
            .keywords
            .iter()
            .take(5)
            .map(|k| format!("{} ({})", k.word, k.count))
            .collect();
        info!("Top keywords: {}", top.join(", "));
    }
    info!(
        "Cost: ${:.4} (~{:.1} JPY), {} tokens over {} requests",
        report.total_cost_usd,
        report.cost.total_cost_jpy,
        report.cost.total_tokens,
        report.cost.requests_count
    );
    if let Some(analysis) = &report.analysis {
        info!("");
        if analysis.success {
            info!("{}", analysis.text);
        } else {
            error!("{}", analysis.text);
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if !ALLOWED_COUNTS.contains(&args.count) {
        eprintln!(
            "Error: --count must be one of {:?}, got {}",
            ALLOWED_COUNTS, args.count
        );
        std::process::exit(1);
    }

    let seed = if args.seed == 0 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    } else {
        args.seed
    };

    if !args.json {
        info!("Voxpop Survey Simulator v0.1.0");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!(
            "mode={} seed={} personas={} question={:?}",
            args.mode, seed, args.count, args.question
        );
    }

    let search_results = if args.search {
        demo_search_results(&args.question, 5)
    } else {
        Vec::new()
    };

    let config = SessionConfig {
        seed,
        persona_count: args.count,
        question: args.question.clone(),
        search_results,
        analyze: args.analyze,
    };

    let report = match args.mode.as_str() {
        "sim" => {
            let mut provider = SimulatedProvider::new(seed);
            SurveySession::run(&mut provider, config).await
        }
        "live" => {
            let mut provider = match LiveProvider::from_env() {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            };
            SurveySession::run(&mut provider, config).await
        }
        other => {
            eprintln!("Error: unknown mode {other:?} (expected sim or live)");
            std::process::exit(1);
        }
    };

    let report = match report {
        Ok(report) => report,
        Err(e) => {
            error!("survey failed: {e}");
            std::process::exit(1);
        }
    };

    print_summary(&report, args.json);

    if let Some(path) = &args.export {
        if let Err(e) = export::write_report(&report, path) {
            error!("Failed to write export: {e}");
            std::process::exit(1);
        }
    }

    if report.successful_count < report.records.len() {
        std::process::exit(1);
    }
}
