//! Command-line front end for the weapon rankings engine
//!
//! Records duels one at a time, either from flags or through an interactive
//! loop, and prints the ranking table for a weapon.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{error, info, warn};
use weapon_rankings::config::{validate_config, AppConfig};
use weapon_rankings::rating::{JsonFileRankingStore, LevelClassifier, PresetLevels, RatingEngine};
use weapon_rankings::service::{format_committed, format_resolution, format_table, DuelService};
use weapon_rankings::{utils, DuelOutcome, Level, Weapon};

/// Weapon Rankings - Elo ratings for club fencing duels
#[derive(Parser)]
#[command(
    name = "weapon-rankings",
    version,
    about = "Record fencing duels and keep per-weapon Elo rankings",
    long_about = "Weapon Rankings keeps one ranking table per weapon (foil, epee, sabre). \
                 Each recorded duel updates both fencers with an Elo step, applies probation \
                 and win-streak adjustments, then decays every rating in the table."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Data directory override
    #[arg(long, global = true, value_name = "DIR", help = "Directory holding the ranking files")]
    data_dir: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        global = true,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Use the classic rule-set
    #[arg(
        long,
        global = true,
        help = "Integer ratings, level quantile seeds, no probation and no streaks"
    )]
    classic: bool,

    /// Dry run mode (validate config and exit)
    #[arg(long, help = "Validate configuration and exit without touching any data")]
    dry_run: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Record a single duel
    Record {
        #[arg(short, long)]
        weapon: Weapon,
        #[arg(long)]
        winner: String,
        #[arg(long)]
        loser: String,
        /// Duel date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Level for the winner if this is their first duel with the weapon
        #[arg(long)]
        winner_level: Option<Level>,
        /// Level for the loser if this is their first duel with the weapon
        #[arg(long)]
        loser_level: Option<Level>,
        /// Commit without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Enter duels one after another until told to quit
    Interactive,
    /// Print the ranking table for a weapon
    Show {
        #[arg(short, long)]
        weapon: Weapon,
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
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

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
    if let Some(data_dir) = &args.data_dir {
        config.storage.data_dir = data_dir.clone();
    }
    if args.classic {
        config.rating.apply_classic_rules();
    }

    validate_config(&config)?;
    Ok(config)
}

/// Print `message` and read one trimmed line; `None` on end of input
fn prompt(message: &str) -> Result<Option<String>> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn confirm(message: &str) -> Result<bool> {
    loop {
        match prompt(message)?.as_deref().map(str::to_lowercase).as_deref() {
            Some("y") | Some("yes") => return Ok(true),
            Some("n") | Some("no") | None => return Ok(false),
            Some(_) => println!("Please answer y or n."),
        }
    }
}

/// Answers from presets first, then asks on stdin when allowed
struct CliClassifier {
    presets: PresetLevels,
    interactive: bool,
}

impl LevelClassifier for CliClassifier {
    fn classify(&self, name: &str, weapon: Weapon) -> Option<Level> {
        if let Some(level) = self.presets.classify(name, weapon) {
            return Some(level);
        }
        if !self.interactive {
            return None;
        }

        let message = format!(
            "{} has no {} ranking yet. Level (beginner/experienced/advanced): ",
            name, weapon
        );
        loop {
            match prompt(&message) {
                Ok(Some(answer)) if answer.is_empty() => return None,
                Ok(Some(answer)) => match answer.parse::<Level>() {
                    Ok(level) => return Some(level),
                    Err(e) => println!("{}", e),
                },
                Ok(None) => return None,
                Err(e) => {
                    warn!("Failed to read level for '{}': {}", name, e);
                    return None;
                }
            }
        }
    }
}

fn record(
    service: &DuelService<JsonFileRankingStore>,
    outcome: DuelOutcome,
    classifier: &CliClassifier,
    yes: bool,
) -> Result<()> {
    let resolution = service.preview(&outcome, classifier)?;
    println!("{}", format_resolution(&resolution));

    if yes || confirm("Is this correct? (y/n): ")? {
        service.commit(&resolution)?;
        print!("{}", format_committed(&resolution));
    } else {
        info!("Discarded duel '{}' vs '{}'", outcome.winner, outcome.loser);
        println!("Duel discarded.");
    }
    Ok(())
}

fn interactive(service: &DuelService<JsonFileRankingStore>) -> Result<()> {
    let classifier = CliClassifier {
        presets: PresetLevels::new(),
        interactive: true,
    };

    loop {
        let weapon = match prompt("\nWeapon (foil/epee/sabre, q to quit): ")? {
            None => break,
            Some(answer) if answer.is_empty() || answer.eq_ignore_ascii_case("q") => break,
            Some(answer) => match answer.parse::<Weapon>() {
                Ok(weapon) => weapon,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            },
        };

        let Some(winner) = prompt("Winner: ")?.filter(|name| !name.is_empty()) else {
            break;
        };
        let Some(loser) = prompt("Loser: ")?.filter(|name| !name.is_empty()) else {
            break;
        };

        let outcome = DuelOutcome {
            winner,
            loser,
            weapon,
            date: utils::today(),
        };

        // A rejected duel only skips this entry
        if let Err(e) = record(service, outcome, &classifier, false) {
            error!("{}", e);
            println!("Duel not recorded: {}", e);
        }
    }

    info!("Leaving interactive mode");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if args.dry_run {
        info!("Configuration validation successful");
        info!("   Data directory: {}", config.storage.data_dir.display());
        info!("   Rating: {:?}", config.rating);
        return Ok(());
    }

    let store = JsonFileRankingStore::new(&config.storage.data_dir)?;
    let service = DuelService::new(RatingEngine::new(config.rating.clone())?, store);
    info!(
        "{} using data in {}",
        config.service.name,
        config.storage.data_dir.display()
    );

    match args.command.unwrap_or(Command::Interactive) {
        Command::Record {
            weapon,
            winner,
            loser,
            date,
            winner_level,
            loser_level,
            yes,
        } => {
            let mut presets = PresetLevels::new();
            if let Some(level) = winner_level {
                presets.insert(winner.clone(), level);
            }
            if let Some(level) = loser_level {
                presets.insert(loser.clone(), level);
            }
            let classifier = CliClassifier {
                presets,
                interactive: !yes,
            };
            let outcome = DuelOutcome {
                winner,
                loser,
                weapon,
                date: date.unwrap_or_else(utils::today),
            };
            record(&service, outcome, &classifier, yes)
        }
        Command::Interactive => interactive(&service),
        Command::Show { weapon } => {
            print!("{}", format_table(&service.table(weapon)?));
            Ok(())
        }
    }
}
