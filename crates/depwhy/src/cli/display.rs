//! Common display utilities for CLI commands.

use std::io::{self, Write};

use colored::Colorize;
use depwhy::{Hierarchy, LoadStats, LoadWarning, SearchOutcome};
use serde::Serialize;

use super::OutputMode;

const MAX_DISPLAY_WARNINGS: usize = 10;

/// JSON shape of one answered query.
#[derive(Serialize)]
struct QueryReport<'a> {
    from: &'a str,
    to: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<&'a str>,
    paths: Vec<Vec<&'a str>>,
}

/// Write the result of one query in the requested mode.
pub fn write_outcome<W: Write>(
    out: &mut W,
    hierarchy: &Hierarchy,
    from: &str,
    to: &str,
    outcome: &SearchOutcome,
    mode: OutputMode,
) -> io::Result<()> {
    match mode {
        OutputMode::Text => write_outcome_text(out, hierarchy, outcome),
        OutputMode::Json => {
            let (status, missing) = match outcome {
                SearchOutcome::Found(_) => ("found", None),
                SearchOutcome::NoPath => ("no_path", None),
                SearchOutcome::NotFound { name, .. } => ("not_found", Some(name.as_str())),
            };
            let report = QueryReport {
                from,
                to,
                status,
                missing,
                paths: outcome
                    .paths()
                    .iter()
                    .map(|path| path.names(hierarchy))
                    .collect(),
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)
        }
    }
}

fn write_outcome_text<W: Write>(
    out: &mut W,
    hierarchy: &Hierarchy,
    outcome: &SearchOutcome,
) -> io::Result<()> {
    match outcome {
        SearchOutcome::NotFound { name, endpoint } => {
            writeln!(
                out,
                "{}: {} {}",
                "Node not found".red(),
                name.cyan(),
                format!("({endpoint})").dimmed()
            )
        }
        SearchOutcome::NoPath => writeln!(out, "{}", "No path found".yellow()),
        SearchOutcome::Found(paths) => {
            for (i, path) in paths.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                writeln!(
                    out,
                    "{}",
                    format!("Path {} (length = {})", i + 1, path.len())
                        .white()
                        .bold()
                )?;
                for (step, name) in path.names(hierarchy).into_iter().enumerate() {
                    if step == 0 {
                        writeln!(out, "{}", name.cyan())?;
                    } else {
                        writeln!(out, "{name}")?;
                    }
                }
            }
            Ok(())
        }
    }
}

/// Print skipped edge-list lines to stderr, truncated after a few.
pub fn print_warnings(warnings: &[LoadWarning]) {
    for warning in warnings.iter().take(MAX_DISPLAY_WARNINGS) {
        eprintln!("{}: {warning}", "warning".yellow().bold());
    }

    if warnings.len() > MAX_DISPLAY_WARNINGS {
        eprintln!(
            "{}: ... and {} more skipped lines",
            "warning".yellow().bold(),
            warnings.len() - MAX_DISPLAY_WARNINGS
        );
    }
}

/// Write a summary of the loaded graph.
pub fn write_stats<W: Write>(
    out: &mut W,
    hierarchy: &Hierarchy,
    stats: &LoadStats,
) -> io::Result<()> {
    writeln!(
        out,
        "{}: {} edges, {} leaves, {} groups ({} lines skipped)",
        "Loaded".dimmed(),
        hierarchy.edge_count().to_string().green(),
        hierarchy.leaf_count().to_string().green(),
        hierarchy.group_count(),
        stats.warnings.len()
    )
}
