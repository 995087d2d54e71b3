//! Edge-list loading.
//!
//! An edge list is UTF-8 text with one edge per line: two dotted node paths
//! separated by a delimiter character.
//!
//! ```text
//! # comment
//! app.core.session, lib.net.socket
//! lib.net.socket,   sys.io
//! ```
//!
//! Loading is resilient: malformed lines are skipped and returned as
//! [`LoadWarning`]s. A structural violation (a name used both as a leaf and
//! as a group) aborts the load, because the resulting tree would be corrupt.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::hierarchy::{Hierarchy, split_path};

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// Default line-comment prefix.
pub const DEFAULT_COMMENT_PREFIX: &str = "#";

/// How edge lines are split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeFormat {
    /// Character separating the two fields of a line.
    ///
    /// A whitespace delimiter also matches runs of itself, so column-aligned
    /// lists load as written. Any other delimiter is strict: `a,,b` has
    /// three fields.
    pub delimiter: char,
    /// Lines starting with this prefix (after leading whitespace) are ignored.
    pub comment_prefix: Option<String>,
}

impl Default for EdgeFormat {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            comment_prefix: Some(DEFAULT_COMMENT_PREFIX.to_string()),
        }
    }
}

impl EdgeFormat {
    /// Create a format with the given delimiter and the default comment prefix.
    #[must_use]
    pub fn with_delimiter(delimiter: char) -> Self {
        Self {
            delimiter,
            ..Self::default()
        }
    }
}

/// A non-fatal problem with one line of an edge list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// The line did not split into exactly two fields.
    WrongFieldCount {
        /// The 1-based line number.
        line_number: usize,
        /// How many fields were found.
        found: usize,
    },

    /// A field was empty or contained an empty dotted segment.
    InvalidName {
        /// The 1-based line number.
        line_number: usize,
        /// The offending field, trimmed.
        name: String,
    },
}

impl LoadWarning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::WrongFieldCount { line_number, .. } | Self::InvalidName { line_number, .. } => {
                *line_number
            }
        }
    }

    /// Returns a human-readable description of the warning.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::WrongFieldCount { line_number, found } => {
                format!("line {line_number}: expected 2 fields, found {found}")
            }
            Self::InvalidName { line_number, name } => {
                format!("line {line_number}: invalid node name '{name}'")
            }
        }
    }
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description())
    }
}

/// Summary of one load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Lines read, including blank, comment and skipped lines.
    pub lines_read: usize,
    /// Edges handed to the hierarchy.
    pub edges_added: usize,
    /// Lines skipped as malformed.
    pub warnings: Vec<LoadWarning>,
}

/// Load edges from a reader into a hierarchy.
///
/// # Errors
///
/// - [`Error::Io`] if reading fails.
/// - [`Error::AtLine`] wrapping a structural violation; edges from earlier
///   lines stay in the hierarchy.
pub fn load_edges<R: BufRead>(
    hierarchy: &mut Hierarchy,
    reader: R,
    format: &EdgeFormat,
) -> Result<LoadStats> {
    let mut stats = LoadStats::default();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_number = index + 1;
        stats.lines_read = line_number;

        let trimmed = line.trim();
        if trimmed.is_empty() || is_comment(trimmed, format) {
            continue;
        }

        let (from, to) = match parse_edge(trimmed, line_number, format.delimiter) {
            Ok(edge) => edge,
            Err(warning) => {
                warn!(line = line_number, "{}", warning.description());
                stats.warnings.push(warning);
                continue;
            }
        };

        hierarchy
            .add_edge(&split_path(from), &split_path(to))
            .map_err(|e| e.at_line(line_number))?;
        stats.edges_added += 1;
    }

    info!(
        edges = stats.edges_added,
        leaves = hierarchy.leaf_count(),
        skipped = stats.warnings.len(),
        "Loaded edge list"
    );
    Ok(stats)
}

/// Load edges from a file into a hierarchy.
///
/// # Errors
///
/// See [`load_edges`]. Failing to open the file is reported as
/// [`Error::Io`] naming the path.
pub fn load_edges_from_path(
    hierarchy: &mut Hierarchy,
    path: &Path,
    format: &EdgeFormat,
) -> Result<LoadStats> {
    debug!(path = %path.display(), "Opening edge list");
    let file = File::open(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("cannot open edge list {}: {e}", path.display()),
        ))
    })?;
    load_edges(hierarchy, BufReader::new(file), format)
}

fn is_comment(line: &str, format: &EdgeFormat) -> bool {
    format
        .comment_prefix
        .as_deref()
        .is_some_and(|prefix| !prefix.is_empty() && line.starts_with(prefix))
}

fn parse_edge(
    line: &str,
    line_number: usize,
    delimiter: char,
) -> std::result::Result<(&str, &str), LoadWarning> {
    let fields: Vec<&str> = if delimiter.is_whitespace() {
        line.split(delimiter)
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .collect()
    } else {
        line.split(delimiter).map(str::trim).collect()
    };
    let [from, to] = fields[..] else {
        return Err(LoadWarning::WrongFieldCount {
            line_number,
            found: fields.len(),
        });
    };

    for name in [from, to] {
        if !is_valid_name(name) {
            return Err(LoadWarning::InvalidName {
                line_number,
                name: name.to_string(),
            });
        }
    }
    Ok((from, to))
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && split_path(name).iter().all(|segment| !segment.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn load(text: &str) -> (Hierarchy, Result<LoadStats>) {
        let mut hierarchy = Hierarchy::new();
        let result = load_edges(&mut hierarchy, text.as_bytes(), &EdgeFormat::default());
        (hierarchy, result)
    }

    #[test]
    fn loads_edges_and_skips_blank_and_comment_lines() {
        let (hierarchy, result) = load("# header\n\na.b.c, x.y\n  x.y ,p.q  \n");
        let stats = result.expect("load should succeed");

        assert_eq!(stats.lines_read, 4);
        assert_eq!(stats.edges_added, 2);
        assert!(stats.warnings.is_empty());
        assert_eq!(hierarchy.edge_count(), 2);
        assert!(hierarchy.resolve_name("a.b.c").is_some());
    }

    #[rstest]
    #[case::single_field("a.b", 1)]
    #[case::three_fields("a,b,c", 3)]
    fn wrong_field_count_is_a_warning(#[case] line: &str, #[case] found: usize) {
        let (hierarchy, result) = load(line);
        let stats = result.expect("malformed lines should not abort");

        assert_eq!(stats.edges_added, 0);
        assert_eq!(
            stats.warnings,
            vec![LoadWarning::WrongFieldCount {
                line_number: 1,
                found
            }]
        );
        assert_eq!(hierarchy.node_ids().count(), 1);
    }

    #[rstest]
    #[case::empty_field("a.b,", "")]
    #[case::double_dot("a..b,x", "a..b")]
    #[case::leading_dot("x,.a", ".a")]
    #[case::trailing_dot("x,a.", "a.")]
    fn invalid_names_are_warnings(#[case] line: &str, #[case] name: &str) {
        let (_, result) = load(line);
        let stats = result.expect("malformed lines should not abort");

        assert_eq!(
            stats.warnings,
            vec![LoadWarning::InvalidName {
                line_number: 1,
                name: name.to_string()
            }]
        );
    }

    #[test]
    fn structural_violation_aborts_with_line_number() {
        let (hierarchy, result) = load("a.b,x\na.b.c,x\n");

        let err = result.expect_err("a.b cannot become a group");
        assert!(err.is_structural());
        assert!(matches!(err, Error::AtLine { line: 2, .. }));
        assert_eq!(hierarchy.edge_count(), 1, "earlier edges stay loaded");
    }

    #[test]
    fn custom_delimiter_and_disabled_comments() {
        let mut hierarchy = Hierarchy::new();
        let format = EdgeFormat {
            delimiter: '\t',
            comment_prefix: None,
        };

        let stats = load_edges(&mut hierarchy, "#a.b\tx.y\n".as_bytes(), &format)
            .expect("load should succeed");

        assert_eq!(stats.edges_added, 1);
        assert!(hierarchy.resolve_name("#a.b").is_some());
    }

    #[rstest]
    #[case::aligned_spaces(' ', "a.b    x.y")]
    #[case::repeated_tabs('\t', "a.b\t\tx.y")]
    #[case::mixed_padding(' ', "a.b \t x.y")]
    fn whitespace_delimiter_matches_runs(#[case] delimiter: char, #[case] line: &str) {
        let mut hierarchy = Hierarchy::new();

        let stats = load_edges(
            &mut hierarchy,
            line.as_bytes(),
            &EdgeFormat::with_delimiter(delimiter),
        )
        .expect("load should succeed");

        assert!(stats.warnings.is_empty(), "{:?}", stats.warnings);
        assert_eq!(stats.edges_added, 1);
        assert!(hierarchy.resolve_name("x.y").is_some());
    }

    #[test]
    fn whitespace_delimiter_still_counts_fields() {
        let mut hierarchy = Hierarchy::new();

        let stats = load_edges(
            &mut hierarchy,
            "a.b  x.y  p.q\n".as_bytes(),
            &EdgeFormat::with_delimiter(' '),
        )
        .expect("load should succeed");

        assert_eq!(
            stats.warnings,
            vec![LoadWarning::WrongFieldCount {
                line_number: 1,
                found: 3
            }]
        );
    }

    #[test]
    fn warning_description_includes_line_number() {
        let warning = LoadWarning::WrongFieldCount {
            line_number: 12,
            found: 3,
        };

        assert_eq!(warning.line_number(), 12);
        assert!(warning.description().contains("line 12"));
        assert!(warning.to_string().contains("found 3"));
    }

    #[test]
    fn missing_file_is_an_io_error_naming_the_path() {
        let mut hierarchy = Hierarchy::new();
        let err = load_edges_from_path(
            &mut hierarchy,
            Path::new("/definitely/not/here.csv"),
            &EdgeFormat::default(),
        )
        .expect_err("file does not exist");

        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("here.csv"));
    }
}
