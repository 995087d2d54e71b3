//! Interactive mode: read queries from stdin until end of input.
//!
//! Each line is `FROM TO [COUNT]` or one of the commands `help`, `stats`,
//! `quit`.

use std::io::{self, BufRead, IsTerminal, Write};

use colored::Colorize;
use depwhy::{Hierarchy, LoadStats};

use super::OutputMode;
use super::display::write_stats;
use super::query::answer;
use super::validators::parse_count;

const USAGE: &str = "usage: FROM TO [COUNT] | help | stats | quit";

/// One parsed input line.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Query {
        from: &'a str,
        to: &'a str,
        count: Option<usize>,
    },
    Help,
    Stats,
    Quit,
    Empty,
}

/// Run the query loop on stdin/stdout.
pub fn run(
    hierarchy: &Hierarchy,
    stats: &LoadStats,
    limit: usize,
    mode: OutputMode,
) -> depwhy::Result<()> {
    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    let mut out = io::stdout().lock();

    if prompt {
        write_stats(&mut out, hierarchy, stats)?;
        writeln!(out, "{}", "Type `help` for commands.".dimmed())?;
    }

    run_session(hierarchy, stats, limit, mode, stdin.lock(), &mut out, prompt)?;
    Ok(())
}

fn run_session<R: BufRead, W: Write>(
    hierarchy: &Hierarchy,
    stats: &LoadStats,
    limit: usize,
    mode: OutputMode,
    input: R,
    out: &mut W,
    prompt: bool,
) -> io::Result<()> {
    let mut lines = input.lines();
    loop {
        if prompt {
            write!(out, "{} ", ">".green().bold())?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(Command::Empty) => {}
            Ok(Command::Help) => writeln!(out, "{USAGE}")?,
            Ok(Command::Stats) => write_stats(out, hierarchy, stats)?,
            Ok(Command::Query { from, to, count }) => {
                answer(out, hierarchy, from, to, count.unwrap_or(limit), mode)?;
            }
            Err(message) => {
                writeln!(out, "{}: {message}", "error".red().bold())?;
                writeln!(out, "{}", USAGE.dimmed())?;
            }
        }
        out.flush()?;
    }
    Ok(())
}

fn parse_command(line: &str) -> Result<Command<'_>, String> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    match tokens[..] {
        [] => Ok(Command::Empty),
        ["quit" | "exit" | "q"] => Ok(Command::Quit),
        ["help" | "?"] => Ok(Command::Help),
        ["stats"] => Ok(Command::Stats),
        [from, to] => Ok(Command::Query {
            from,
            to,
            count: None,
        }),
        [from, to, count] => Ok(Command::Query {
            from,
            to,
            count: Some(parse_count(count)?),
        }),
        _ => Err(format!("expected 2 or 3 fields, got {}", tokens.len())),
    }
}
