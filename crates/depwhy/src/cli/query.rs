//! Batch mode: answer a single query and exit.

use std::io::{self, Write};

use depwhy::Hierarchy;

use super::OutputMode;
use super::display::write_outcome;

/// Run one query and print its result to stdout.
pub fn run(
    hierarchy: &Hierarchy,
    from: &str,
    to: &str,
    limit: usize,
    mode: OutputMode,
) -> depwhy::Result<()> {
    let mut out = io::stdout().lock();
    answer(&mut out, hierarchy, from, to, limit, mode)?;
    out.flush()?;
    Ok(())
}

/// Search and write the outcome.
pub fn answer<W: Write>(
    out: &mut W,
    hierarchy: &Hierarchy,
    from: &str,
    to: &str,
    limit: usize,
    mode: OutputMode,
) -> io::Result<()> {
    let outcome = depwhy::search(hierarchy, from, to, limit);
    write_outcome(out, hierarchy, from, to, &outcome, mode)
}
