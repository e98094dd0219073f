//! Build Triage - surface the lines that matter from a build log.
//!
//! The main entry point for bt, handling:
//! - Build log diagnosis (run the build, print error/failure/exception lines)
//! - Interactive image scraping
//!
//! Every failure degrades to a single printed message; the process exit
//! status stays indistinguishable from a clean run.

use bt_common::format_error_human;
use bt_core::config::{BuildConfig, ScrapeConfig};
use bt_core::diagnose::Diagnoser;
use bt_core::logging::{init_logging, LogConfig, LogFormat};
use bt_core::runner::SystemRunner;
use bt_core::scrape::{self, BingFetcher};
use clap::{Args, Parser, Subcommand};
use std::io::{self, IsTerminal};

/// Build Triage - build log diagnosis and asset scraping
#[derive(Parser)]
#[command(name = "bt")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    global: GlobalOpts,
}

/// Global options available to all commands
#[derive(Args, Debug)]
struct GlobalOpts {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log output format on stderr
    #[arg(long, global = true, default_value = "human")]
    log_format: LogFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the build and print every error, failure, or exception line
    Build,

    /// Interactively download images for a search query
    Scrape,

    /// Print version information
    Version,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&LogConfig {
        format: cli.global.log_format,
        verbosity: cli.global.verbose,
        quiet: cli.global.quiet,
    });

    let use_color = !cli.global.no_color && io::stdout().is_terminal();

    // Running with no subcommand is the build diagnosis path.
    let result = match cli.command.unwrap_or(Commands::Build) {
        Commands::Build => run_build(),
        Commands::Scrape => run_scrape(),
        Commands::Version => {
            println!("bt {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(err) = result {
        println!("{}", format_error_human(&err, use_color));
    }
}

fn run_build() -> bt_common::Result<()> {
    let diagnoser = Diagnoser::new(SystemRunner, BuildConfig::default());
    let mut stdout = io::stdout().lock();
    let report = diagnoser.run(&mut stdout)?;
    tracing::debug!(
        matched = report.matched,
        status = ?report.status,
        "build diagnosis finished"
    );
    Ok(())
}

fn run_scrape() -> bt_common::Result<()> {
    let config = ScrapeConfig::default();
    let fetcher = BingFetcher::new(&config)?;
    let mut input = io::stdin().lock();
    let mut out = io::stdout().lock();
    scrape::run_interactive(&fetcher, &config, &mut input, &mut out)?;
    Ok(())
}
