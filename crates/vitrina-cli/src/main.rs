//! Vitrinero: command-line runner for vitrina storefront checks.
//!
//! ## Usage
//!
//! ```bash
//! vitrinero                          # run every configured capability set
//! vitrinero --config ci/config.yml   # alternate configuration file
//! vitrinero --filter chrome          # only sets whose name contains "chrome"
//! vitrinero -v                       # show strategy-level fallthrough logs
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use vitrina::{Config, Runner, VitrinaError, VitrinaResult};

mod output;

#[derive(Debug, Parser)]
#[command(
    name = "vitrinero",
    version,
    about = "Run storefront checks against a remote browser grid"
)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yml")]
    config: PathBuf,

    /// Only run capability sets whose name contains this string
    #[arg(short, long)]
    filter: Option<String>,

    /// Increase log verbosity (-v shows click-strategy fallthrough)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> VitrinaResult<bool> {
    let mut config = Config::load(&cli.config)?;

    if let Some(filter) = &cli.filter {
        let needle = filter.to_lowercase();
        config
            .capabilities
            .retain(|set| set.name().to_lowercase().contains(&needle));
        if config.capabilities.is_empty() {
            return Err(VitrinaError::Config {
                message: format!("no capability set matches '{filter}'"),
            });
        }
    }

    let runner = Runner::from_config(config);
    let summary = runner.run_all().await;
    output::print_summary(&summary);
    Ok(summary.all_passed())
}

fn init_tracing(cli: &Cli) {
    let default = if cli.quiet {
        "vitrina=warn"
    } else {
        match cli.verbose {
            0 => "vitrina=info",
            1 => "vitrina=debug",
            _ => "trace",
        }
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
