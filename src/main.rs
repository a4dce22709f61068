use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use qass_score::bounds::{ModelConfig, ScoringModel};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_VALIDATION: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every group in an assessment file (YAML, or JSON by extension)
    Score {
        /// Path to the assessment file
        input: PathBuf,

        /// Print results as JSON
        #[arg(long)]
        json: bool,

        /// Peer rating impact (overrides config)
        #[arg(long)]
        impact: Option<f64>,

        /// Tolerance (overrides config)
        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// Check a scoring model's bounds, group size and score constraint
    Validate {
        /// Scoring model (QASS or WebAVALIA)
        #[arg(long)]
        model: Option<ScoringModel>,

        /// Lower bound for an individual score
        #[arg(long)]
        lower: Option<f64>,

        /// Upper bound for an individual score
        #[arg(long)]
        upper: Option<f64>,

        /// Number of students in a group
        #[arg(long)]
        group_size: Option<u32>,

        /// Required total score for the group (marks the total as constrained)
        #[arg(long)]
        constraint: Option<f64>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "qass")]
#[command(about = "Peer-assessment scoring with the Quasi-Arithmetic Scoring System", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/qass/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    if let Err(e) = qass_score::logging::init_tracing(cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match qass_score::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = qass_score::output::should_use_colors();

    match cli.command {
        Commands::Score {
            input,
            json,
            impact,
            tolerance,
        } => {
            let scoring = config
                .scoring
                .clone()
                .unwrap_or_default()
                .with_overrides(impact, tolerance);

            // Validate scoring config at startup
            if let Err(errors) = qass_score::scoring::validate_scoring(&scoring) {
                eprintln!("Scoring config errors:");
                for error in errors {
                    eprintln!("  - {}", error);
                }
                std::process::exit(EXIT_CONFIG);
            }

            tracing::debug!(
                impact = scoring.impact(),
                tolerance = scoring.tolerance(),
                "effective scoring parameters"
            );

            let assessment = match qass_score::assessment::load_assessment(&input) {
                Ok(a) => a,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            let groups = match qass_score::assessment::score_assessment(&assessment, &scoring) {
                Ok(g) => g,
                Err(e) => {
                    eprintln!("Input error: {:#}", e);
                    std::process::exit(EXIT_INPUT);
                }
            };

            if json {
                match qass_score::output::format_scored_groups_json(&groups) {
                    Ok(output) => println!("{}", output),
                    Err(e) => {
                        eprintln!("{:#}", e);
                        std::process::exit(EXIT_INPUT);
                    }
                }
            } else {
                println!(
                    "{}",
                    qass_score::output::format_scored_groups(&groups, use_colors)
                );
            }

            tracing::info!(
                groups = groups.len(),
                elapsed = ?start_time.elapsed(),
                "scoring finished"
            );
        }
        Commands::Validate {
            model,
            lower,
            upper,
            group_size,
            constraint,
        } => {
            let model_config = match resolve_model_config(
                config.model.clone(),
                model,
                lower,
                upper,
                group_size,
                constraint,
            ) {
                Ok(m) => m,
                Err(e) => {
                    eprintln!("Config error: {}", e);
                    std::process::exit(EXIT_CONFIG);
                }
            };

            let outcome = model_config.check();
            println!(
                "{}",
                qass_score::output::format_bounds_report(&model_config, &outcome, use_colors)
            );
            if outcome.is_err() {
                std::process::exit(EXIT_VALIDATION);
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Combine the config file's model section with command-line overrides.
/// Without a model section, lower, upper and group size must all be given.
fn resolve_model_config(
    base: Option<ModelConfig>,
    model: Option<ScoringModel>,
    lower: Option<f64>,
    upper: Option<f64>,
    group_size: Option<u32>,
    constraint: Option<f64>,
) -> Result<ModelConfig, String> {
    let mut config = match base {
        Some(base) => base,
        None => ModelConfig {
            selected_model: ScoringModel::default(),
            lower_bound: lower.ok_or("missing --lower (no model section in config)")?,
            upper_bound: upper.ok_or("missing --upper (no model section in config)")?,
            group_size: group_size.ok_or("missing --group-size (no model section in config)")?,
            is_total_score_constrained: false,
            score_constraint: None,
        },
    };

    if let Some(model) = model {
        config.selected_model = model;
    }
    if let Some(lower) = lower {
        config.lower_bound = lower;
    }
    if let Some(upper) = upper {
        config.upper_bound = upper;
    }
    if let Some(group_size) = group_size {
        config.group_size = group_size;
    }
    if constraint.is_some() {
        config.is_total_score_constrained = true;
        config.score_constraint = constraint;
    }

    Ok(config)
}
