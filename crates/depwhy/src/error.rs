//! Error types for depwhy operations.
//!
//! Only genuine failures are errors here:
//!
//! - **Structural violations**: the edge data is inconsistent with a tree
//!   (a leaf reused as a group or the other way around). These abort the load.
//! - **Infrastructure failures**: I/O and configuration problems.
//!
//! ## What is *not* an error
//!
//! An unresolvable query name or a search that finds nothing are ordinary
//! outcomes, represented by [`SearchOutcome`](crate::SearchOutcome).
//! Malformed edge lines are skipped and reported as
//! [`LoadWarning`](crate::LoadWarning)s.

use thiserror::Error;

/// Result type for depwhy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for depwhy operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An intermediate path segment already exists as a leaf.
    #[error("structural violation: '{path}' is a leaf but is used as a group")]
    LeafUsedAsGroup {
        /// Qualified name of the offending leaf.
        path: String,
    },

    /// The final path segment already exists as a group.
    #[error("structural violation: '{path}' is a group but is used as a leaf")]
    GroupUsedAsLeaf {
        /// Qualified name of the offending group.
        path: String,
    },

    /// A node path is empty or contains an empty segment.
    #[error("invalid node path: {0}")]
    InvalidPath(String),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),

    /// An error raised while loading a specific line of an edge list.
    #[error("line {line}: {source}")]
    AtLine {
        /// 1-based line number in the edge list.
        line: usize,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Returns `true` if this error signals inconsistent graph data.
    ///
    /// Structural errors are fatal for the load that produced them; the tree
    /// would be corrupt if ingestion carried on.
    #[must_use]
    pub fn is_structural(&self) -> bool {
        match self {
            Self::LeafUsedAsGroup { .. } | Self::GroupUsedAsLeaf { .. } => true,
            Self::AtLine { source, .. } => source.is_structural(),
            Self::InvalidPath(_) | Self::Io(_) | Self::Config(_) => false,
        }
    }

    /// Attach the edge-list line number to an error.
    #[must_use]
    pub fn at_line(self, line: usize) -> Self {
        Self::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structural_categorization() {
        assert!(
            Error::LeafUsedAsGroup {
                path: "a.b".to_string()
            }
            .is_structural()
        );
        assert!(
            Error::GroupUsedAsLeaf {
                path: "a".to_string()
            }
            .is_structural()
        );
        assert!(!Error::InvalidPath(String::new()).is_structural());
        assert!(!Error::Config("bad".to_string()).is_structural());
    }

    #[test]
    fn at_line_keeps_structural_classification_and_source() {
        let error = Error::LeafUsedAsGroup {
            path: "a.b".to_string(),
        }
        .at_line(7);

        assert!(error.is_structural());
        let display = error.to_string();
        assert!(display.contains("line 7"));
        assert!(display.contains("a.b"));

        let source = std::error::Error::source(&error).expect("should have a source");
        assert!(source.to_string().contains("leaf but is used as a group"));
    }
}
