//! Batch command: compute matches for one user and print them.
//!
//! Profiles come from the configured storage backend, or from a JSON export
//! when `--profiles` is given.

use clap::{Parser, ValueEnum};
use cofounder_algo::config::{LoggingSettings, Settings, StorageBackend};
use cofounder_algo::core::Matcher;
use cofounder_algo::logging;
use cofounder_algo::models::{MatchReport, WeightOverrides};
use cofounder_algo::services::{
    strip_breakdown, DocumentStoreClient, InMemoryProfiles, MatchDefaults, MatchOutcome, MatchService,
    PostgresProfileStore, ProfileSource, StoreError,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, warn};
use validator::Validate;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(
    name = "run-matching",
    about = "Runs the co-founder matching algorithm for a specific user id"
)]
struct Cli {
    /// Id of the user to find matches for
    user_id: String,

    /// Number of top matches to return
    #[arg(long, default_value_t = 10)]
    top_n: usize,

    /// Weight overrides as JSON, e.g. '{"goal_alignment": 0.4}'
    #[arg(long)]
    weights: Option<String>,

    /// Read profiles from a JSON array instead of the configured store
    #[arg(long, env = "COFOUNDER_PROFILES_FILE")]
    profiles: Option<PathBuf>,

    /// Include per-factor scores in the output
    #[arg(long)]
    breakdown: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Debug, thiserror::Error)]
enum CommandError {
    #[error("invalid weights: {0}")]
    Weights(String),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("could not find active profile data for user id {0}")]
    TargetNotFound(String),
}

fn parse_weights(raw: Option<&str>) -> Result<Option<WeightOverrides>, CommandError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let weights: WeightOverrides =
        serde_json::from_str(raw).map_err(|e| CommandError::Weights(e.to_string()))?;
    weights
        .validate()
        .map_err(|e| CommandError::Weights(e.to_string()))?;
    Ok(Some(weights))
}

fn print_text(report: &MatchReport) {
    let target = &report.target;
    let join = |set: &std::collections::BTreeSet<String>| {
        set.iter().cloned().collect::<Vec<_>>().join(", ")
    };

    println!("--- Target User Profile ---");
    println!("Name: {}", target.name);
    println!("Experience: {}", target.experience_level);
    println!("Skills: {}", join(&target.skills));
    println!("Categories: {}", join(&target.skill_categories));
    println!("Industries: {}", join(&target.startup_industries));
    println!("Interests: {}", join(&target.interests));
    println!("Goals: {}", join(&target.startup_goals));
    println!();

    if report.matches.is_empty() {
        println!("No matches found for user id {}.", target.id);
        return;
    }

    println!("--- Top {} Matches ---", report.matches.len());
    for m in &report.matches {
        println!("- {} (User ID: {}, Score: {:.3})", m.name, m.id, m.score);
        if let Some(f) = &m.factors {
            println!(
                "    skills {:.3} | interests {:.3} | industries {:.3} | goals {:.3} | experience {:.3}",
                f.skill_complementarity,
                f.shared_interests,
                f.shared_industries,
                f.goal_alignment,
                f.experience_compatibility
            );
        }
    }
    if !report.complete {
        println!("(time budget expired; ranking covers a partial population)");
    }
}

/// Keep loaded settings, or warn and fall back to built-in defaults
fn optional_settings(loaded: Result<Settings, config::ConfigError>) -> Option<Settings> {
    match loaded {
        Ok(settings) => Some(settings),
        Err(e) => {
            warn!("Ignoring unreadable configuration, using built-in defaults: {}", e);
            None
        }
    }
}

async fn run_with<S: ProfileSource>(
    cli: &Cli,
    source: S,
    settings: Option<&Settings>,
    weights: Option<WeightOverrides>,
) -> Result<(), CommandError> {
    let (matcher, mut defaults) = match settings {
        Some(s) => (Matcher::new(s.matching.rank_options()), s.match_defaults()),
        None => (Matcher::default(), MatchDefaults::default()),
    };
    // An explicit --top-n is honored in full by the batch command
    defaults.max_top_n = defaults.max_top_n.max(cli.top_n);

    let weights = weights.map(|overrides| overrides.apply(&defaults.weights));
    let service = MatchService::new(source, matcher, defaults);

    let mut report = match service.compute_matches(&cli.user_id, weights, Some(cli.top_n)).await? {
        MatchOutcome::Found(report) => report,
        MatchOutcome::NotFound { target_id } => return Err(CommandError::TargetNotFound(target_id)),
    };
    if !cli.breakdown {
        strip_breakdown(&mut report);
    }

    match cli.format {
        OutputFormat::Text => print_text(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let weights = parse_weights(cli.weights.as_deref())?;

    if let Some(path) = &cli.profiles {
        let source = InMemoryProfiles::from_json_file(path)?;
        // Settings are optional when profiles come from a file
        let settings = optional_settings(Settings::load());
        return run_with(&cli, source, settings.as_ref(), weights).await;
    }

    let settings = Settings::load()?;
    match settings.storage.backend {
        StorageBackend::Postgres => {
            let db = settings
                .database
                .as_ref()
                .ok_or(CommandError::MissingConfig("[database] section is required"))?;
            let store = PostgresProfileStore::from_settings(
                &db.url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await?;
            run_with(&cli, store, Some(&settings), weights).await
        }
        StorageBackend::DocumentStore => {
            let doc = settings
                .document_store
                .as_ref()
                .ok_or(CommandError::MissingConfig("[document_store] section is required"))?;
            let store = DocumentStoreClient::new(doc.to_client_config())?;
            run_with(&cli, store, Some(&settings), weights).await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Diagnostics go to stderr so stdout carries only the report
    let logging_settings = LoggingSettings {
        level: "warn".to_string(),
        format: "compact".to_string(),
    };
    logging::init(&logging_settings);

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Matching failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
