//! CLI command implementations.

pub mod display;
pub mod interactive;
pub mod query;
pub mod validators;

/// How query results are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable, optionally colored text.
    Text,
    /// One JSON object per query.
    Json,
}

impl OutputMode {
    /// Pick the mode from the `--json` flag.
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}
