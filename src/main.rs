use anyhow::Context;
use clap::{Parser, Subcommand};
use shortlist::config::{Config, RunConfig};
use shortlist::judge::OllamaJudge;
use shortlist::pipeline::{deliver_report, Evaluation, Pipeline, RunStatus, EXIT_CONFIG};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank candidates and deliver the report (default if no subcommand)
    Rank {
        /// Print tab-separated output instead of the table
        #[arg(long)]
        tsv: bool,

        /// Skip email/file delivery of the report
        #[arg(long)]
        no_deliver: bool,
    },
    /// Show one candidate's score breakdown by its rank
    Show {
        /// Rank of the candidate (1-based, as shown by rank)
        index: usize,
    },
    /// Validate the configuration file and exit
    Check,
}

#[derive(Parser, Debug)]
#[command(name = "shortlist")]
#[command(about = "Candidate ranking and shortlist reporting CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/shortlist/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Rank {
        tsv: false,
        no_deliver: false,
    });
    let start_time = Instant::now();

    if let Err(e) = shortlist::logging::init(shortlist::logging::default_level(cli.verbose)) {
        eprintln!("Logging disabled: {}", e);
    }
    shortlist::delivery::load_dotenv();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match shortlist::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate everything at startup, before any candidate is touched
    if let Err(errors) = shortlist::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let run = match RunConfig::from_config(&config) {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Commands::Check = command {
        print_check(&config, &run);
        std::process::exit(RunStatus::Success.exit_code());
    }

    let judge = match build_judge(&config) {
        Ok(judge) => judge,
        Err(e) => {
            eprintln!("Judge error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let evaluation = match evaluate(&config, &run, judge.as_ref()).await {
        Ok(evaluation) => evaluation,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    let use_colors = shortlist::report::should_use_colors();

    // Route based on subcommand
    let status = match command {
        Commands::Rank { tsv, no_deliver } => {
            if tsv {
                print!("{}", shortlist::report::format_tsv(&evaluation.ranked));
            } else {
                println!(
                    "{}",
                    shortlist::report::format_scored_table(&evaluation.ranked, use_colors)
                );
            }

            if no_deliver || evaluation.status == RunStatus::NoData {
                evaluation.status
            } else {
                deliver(&config, &run, &evaluation).await
            }
        }
        Commands::Show { index } => {
            // Validate index bounds (1-based)
            if index < 1 || index > evaluation.ranked.len() {
                eprintln!(
                    "Invalid index {}. Must be between 1 and {}.",
                    index,
                    evaluation.ranked.len()
                );
                std::process::exit(EXIT_CONFIG);
            }

            let candidate = &evaluation.ranked[index - 1];
            println!(
                "{}",
                shortlist::report::format_candidate_detail(candidate, index, use_colors)
            );
            evaluation.status
        }
        Commands::Check => RunStatus::Success,
    };

    tracing::info!(
        candidates = evaluation.ranked.len(),
        degraded = evaluation.degraded(),
        elapsed = ?start_time.elapsed(),
        "run finished"
    );
    std::process::exit(status.exit_code());
}

/// Build the judge client when one is configured. Without one, judge-sourced
/// sub-scores count as zero for every candidate.
fn build_judge(config: &Config) -> anyhow::Result<Option<OllamaJudge>> {
    let Some(settings) = &config.judge else {
        if config.scoring.schema().has_judge_inputs() {
            tracing::warn!("no judge configured; judge sub-scores will count as 0");
        }
        return Ok(None);
    };

    let timeout = settings.timeout_duration().map_err(anyhow::Error::msg)?;
    let judge = OllamaJudge::new(&settings.endpoint, &settings.model, timeout)
        .with_context(|| format!("failed to create judge client for {}", settings.endpoint))?;
    tracing::info!(endpoint = %settings.endpoint, model = judge.model(), "judge ready");
    Ok(Some(judge))
}

async fn evaluate(
    config: &Config,
    run: &RunConfig,
    judge: Option<&OllamaJudge>,
) -> anyhow::Result<Evaluation> {
    let today = chrono::Local::now().date_naive();
    Pipeline::new(config, run, judge, today)
        .evaluate()
        .await
        .with_context(|| format!("failed to load candidates from {}", run.source.display()))
}

async fn deliver(config: &Config, run: &RunConfig, evaluation: &Evaluation) -> RunStatus {
    let sender = shortlist::delivery::sender_from_env();
    let router = shortlist::delivery::DeliveryRouter::from_settings(&config.delivery, sender);

    match deliver_report(config, run, evaluation, &router, chrono::Local::now()).await {
        Ok(receipt) => {
            match (&receipt.location, &receipt.error) {
                (Some(path), Some(error)) => eprintln!(
                    "Email failed ({}); report saved to {}",
                    error,
                    path.display()
                ),
                (Some(path), None) => eprintln!("Report saved to {}", path.display()),
                (None, _) => eprintln!(
                    "Report emailed to {}",
                    receipt.recipients.join(", ")
                ),
            }
            evaluation.status.with_receipt(&receipt)
        }
        Err(e) => {
            eprintln!("Delivery failed: {}", e);
            RunStatus::Partial
        }
    }
}

fn print_check(config: &Config, run: &RunConfig) {
    let schema = config.scoring.schema();
    println!("Configuration OK");
    println!("  source: {}", run.source.display());
    println!("  required skills: {}", run.required_skills.join(", "));
    println!("  scoring mode: {:?}", config.scoring.mode);
    for sub in &schema.sub_scores {
        println!("    {:<24} max {:>3}  ({:?})", sub.name, sub.max, sub.source);
    }
    if let Some(ref bonus) = schema.bonus {
        println!("    bonus on '{}' ({} categories)", bonus.field, bonus.points.len());
    }
    match config.judge {
        Some(ref judge) => println!("  judge: {} at {}", judge.model, judge.endpoint),
        None => println!("  judge: none"),
    }
    let delivery = if shortlist::delivery::sender_from_env().is_some() {
        format!("email via {}:{}", config.delivery.smtp_host, config.delivery.smtp_port)
    } else {
        format!("local file {}", config.delivery.output_path.display())
    };
    println!("  delivery: {}", delivery);
}
