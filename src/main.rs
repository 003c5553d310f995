//! Command line entry point for the foosball rating engine
//!
//! Replays a JSON match log through the rating engine and prints
//! leaderboards, or forecasts a single pairing.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use foosball_rating::config::AppConfig;
use foosball_rating::rating::{display_rating, InMemoryRatingStore, MatchRecorder, RatingEngine};
use foosball_rating::types::{MatchResult, RatingState, Scale};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

/// Foosball Rating - TrueSkill ratings for players and teams
#[derive(Parser)]
#[command(
    name = "foosball-rating",
    version,
    about = "TrueSkill rating engine for foosball players and teams",
    long_about = "Replays recorded foosball matches through a two-competitor TrueSkill \
                 engine and ranks players and teams by conservative rating (mu - 3*sigma)."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit")]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON array of match results and print leaderboards
    Replay {
        /// Match log file
        #[arg(value_name = "MATCHES")]
        matches: PathBuf,

        /// Only print this scale's leaderboard
        #[arg(short, long)]
        scale: Option<Scale>,

        /// Maximum rows per leaderboard
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Forecast a pairing of two rating states
    Predict {
        #[arg(long, default_value_t = Scale::Player)]
        scale: Scale,
        #[arg(long, allow_hyphen_values = true)]
        mu_a: f64,
        #[arg(long)]
        sigma_a: f64,
        #[arg(long, allow_hyphen_values = true)]
        mu_b: f64,
        #[arg(long)]
        sigma_b: f64,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load configuration from file or environment, then apply CLI overrides
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = if let Some(config_path) = &args.config {
        AppConfig::from_file(config_path)?
    } else {
        AppConfig::from_env()?
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }

    foosball_rating::config::validate_config(&config)?;
    Ok(config)
}

fn run_replay(
    engine: RatingEngine,
    matches_path: &Path,
    scale: Option<Scale>,
    limit: Option<usize>,
) -> Result<()> {
    let contents = std::fs::read_to_string(matches_path)
        .with_context(|| format!("Failed to read match log {}", matches_path.display()))?;
    let matches: Vec<MatchResult> = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid match log {}", matches_path.display()))?;
    info!("Loaded {} matches from {}", matches.len(), matches_path.display());

    let recorder = MatchRecorder::new(engine, Arc::new(InMemoryRatingStore::new()));
    recorder.record_matches(&matches)?;

    let scales: Vec<Scale> = match scale {
        Some(scale) => vec![scale],
        None => Scale::ALL.to_vec(),
    };

    for scale in scales {
        let rows = recorder.leaderboard(scale)?;
        if rows.is_empty() {
            continue;
        }

        println!("{} leaderboard", scale);
        for row in rows.iter().take(limit.unwrap_or(usize::MAX)) {
            println!("{}", row.display());
        }
        println!();
    }

    Ok(())
}

fn run_predict(engine: RatingEngine, scale: Scale, a: RatingState, b: RatingState) -> Result<()> {
    let probability = engine.predict_win_probability(scale, &a, &b)?;
    let quality = engine.match_quality(scale, &a, &b)?;

    println!("A wins: {}%", display_rating(probability * 100.0));
    println!("B wins: {}%", display_rating((1.0 - probability) * 100.0));
    println!("Match quality: {}%", display_rating(quality * 100.0));
    Ok(())
}

/// Run the selected subcommand
fn run(command: Option<Command>, config: AppConfig) -> Result<()> {
    let engine = RatingEngine::new(config.rating)?;

    match command {
        Some(Command::Replay {
            matches,
            scale,
            limit,
        }) => run_replay(engine, &matches, scale, limit),
        Some(Command::Predict {
            scale,
            mu_a,
            sigma_a,
            mu_b,
            sigma_b,
        }) => {
            let a = RatingState::new(mu_a, sigma_a)?;
            let b = RatingState::new(mu_b, sigma_b)?;
            run_predict(engine, scale, a, b)
        }
        None => {
            info!("No command given; see --help");
            Ok(())
        }
    }
}

/// Report a failed run once, through the log, and map it to an exit code
fn finish(outcome: Result<()>) -> ExitCode {
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {:#}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        return ExitCode::SUCCESS;
    }

    finish(run(args.command, config))
}
