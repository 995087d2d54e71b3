//! depwhy CLI - explain dependency relationships from the command line.
//!
//! Loads an edge list, then either answers one query (batch mode) or reads
//! queries from stdin (interactive mode).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use depwhy::{Config, Hierarchy};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::OutputMode;
use cli::validators::{parse_count, parse_separator};

/// depwhy: find why one dependency relates to another.
#[derive(Parser)]
#[command(name = "depwhy")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Edge list file, one `FROM<separator>TO` edge per line
    edges: PathBuf,

    /// Source node (dotted name); omit both names for interactive mode
    #[arg(requires = "to")]
    from: Option<String>,

    /// Destination node (dotted name)
    to: Option<String>,

    /// Number of paths to find per query
    #[arg(short = 'n', long, value_parser = parse_count)]
    count: Option<usize>,

    /// Field separator of the edge list (a single character, or "tab")
    #[arg(short, long, value_parser = parse_separator)]
    separator: Option<char>,

    /// YAML config file (defaults to $DEPWHY_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {e}", "error".red().bold());
            // Show cause chain for nested errors
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  {}: {cause}", "caused by".dimmed());
                source = std::error::Error::source(cause);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> depwhy::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(separator) = cli.separator {
        config = config.with_delimiter(separator)?;
    }
    if let Some(count) = cli.count {
        config = config.with_limit(count)?;
    }
    if cli.no_color {
        config = config.without_colors();
    }
    if !config.use_colors {
        colored::control::set_override(false);
    }

    let mut hierarchy = Hierarchy::new();
    let stats = depwhy::load_edges_from_path(&mut hierarchy, &cli.edges, &config.format)?;
    cli::display::print_warnings(&stats.warnings);

    let mode = OutputMode::from_json_flag(cli.json);
    match (cli.from, cli.to) {
        (Some(from), Some(to)) => cli::query::run(&hierarchy, &from, &to, config.limit, mode),
        _ => cli::interactive::run(&hierarchy, &stats, config.limit, mode),
    }
}
