//! Domain types shared by the hierarchy and the search engine.
//!
//! - **Handles**: `NodeId` indexes into the hierarchy arena
//! - **Results**: `LeafPath`, `SearchOutcome` (query results)

use std::fmt;

use crate::hierarchy::Hierarchy;

// ============================================================================
// Strongly-typed ID wrapper
// ============================================================================

/// A handle to a node stored in a [`Hierarchy`].
///
/// Handles are only meaningful for the hierarchy that issued them. They are
/// used for every non-owning link in the model: parent back-references and
/// leaf successor lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Extract the raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Paths
// ============================================================================

/// A path through the leaf graph, from a source-group leaf to a
/// destination-group leaf, both inclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafPath {
    leaves: Vec<NodeId>,
}

impl LeafPath {
    /// Create a new leaf path.
    ///
    /// Returns `None` if `leaves` is empty.
    #[must_use]
    pub fn new(leaves: Vec<NodeId>) -> Option<Self> {
        if leaves.is_empty() {
            return None;
        }
        Some(Self { leaves })
    }

    /// Create a trivial path with a single leaf.
    #[must_use]
    pub fn single(leaf: NodeId) -> Self {
        Self { leaves: vec![leaf] }
    }

    /// Get the leaves in this path, source first.
    #[must_use]
    pub fn leaves(&self) -> &[NodeId] {
        &self.leaves
    }

    /// The path head: the source-side leaf.
    #[must_use]
    pub fn head(&self) -> NodeId {
        self.leaves[0]
    }

    /// The destination-side leaf.
    #[must_use]
    pub fn terminal(&self) -> NodeId {
        self.leaves[self.leaves.len() - 1]
    }

    /// Number of leaves on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// Always `false`; a path holds at least one leaf.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Number of leaf-to-leaf edges on the path.
    #[must_use]
    pub fn hops(&self) -> usize {
        self.leaves.len() - 1
    }

    /// Render the qualified name of every leaf on the path.
    #[must_use]
    pub fn names<'h>(&self, hierarchy: &'h Hierarchy) -> Vec<&'h str> {
        self.leaves
            .iter()
            .map(|&leaf| hierarchy.qualified_name(leaf))
            .collect()
    }
}

// ============================================================================
// Search results
// ============================================================================

/// Which side of a query a name was given for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// The `from` name.
    Source,
    /// The `to` name.
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => write!(f, "source"),
            Self::Destination => write!(f, "destination"),
        }
    }
}

/// Result of a [`search`](crate::search) query.
///
/// None of the variants is an error: callers inspect the outcome and decide
/// how to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// At least one path, in discovery order.
    Found(Vec<LeafPath>),
    /// Both names resolved, but the groups are not connected.
    NoPath,
    /// A query name does not exist in the hierarchy.
    NotFound {
        /// The name as given by the caller.
        name: String,
        /// Which side of the query it was given for.
        endpoint: Endpoint,
    },
}

impl SearchOutcome {
    /// The paths found, or an empty slice.
    #[must_use]
    pub fn paths(&self) -> &[LeafPath] {
        match self {
            Self::Found(paths) => paths,
            Self::NoPath | Self::NotFound { .. } => &[],
        }
    }

    /// Returns `true` if at least one path was found.
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Consume the outcome and return the paths (empty unless `Found`).
    #[must_use]
    pub fn into_paths(self) -> Vec<LeafPath> {
        match self {
            Self::Found(paths) => paths,
            Self::NoPath | Self::NotFound { .. } => Vec::new(),
        }
    }
}
