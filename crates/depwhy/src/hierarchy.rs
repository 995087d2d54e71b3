//! The hierarchy tree and the leaf edge store.
//!
//! Nodes live in an arena owned by [`Hierarchy`] and are addressed by
//! [`NodeId`]. Group nodes own a name-to-child map; leaf nodes own an ordered
//! successor list. Every link that is not ownership (the parent back-reference
//! and each successor entry) is a plain `NodeId`, so there are no reference
//! cycles between a group and its children.
//!
//! ## Lifecycle
//!
//! Nodes are created on demand by [`Hierarchy::resolve_or_create`] while edges
//! are ingested, and are never removed. Once ingestion is done the tree is
//! only read. Leaf sets are computed lazily and cached per node; creating a
//! node drops the cached sets of its ancestors, so all ingestion should happen
//! before the first search to get the benefit of the cache.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::trace;

use crate::error::{Error, Result};
use crate::types::NodeId;

/// Separator between segments of a qualified name.
pub const PATH_SEPARATOR: char = '.';

/// The root node is always the first arena slot.
const ROOT: NodeId = NodeId(0);

/// Split a dotted name into its segments.
///
/// No validation happens here; empty segments are preserved so callers can
/// reject them.
#[must_use]
pub fn split_path(name: &str) -> Vec<&str> {
    name.split(PATH_SEPARATOR).collect()
}

/// The two node variants.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A non-leaf path segment owning named children.
    Group {
        /// Children by simple name.
        children: BTreeMap<String, NodeId>,
    },
    /// A terminal segment carrying outgoing edges.
    Leaf {
        /// Successor leaves in insertion order, duplicates included.
        successors: Vec<NodeId>,
    },
}

/// A node of the hierarchy.
#[derive(Debug, Clone)]
pub struct TreeNode {
    name: String,
    parent: Option<NodeId>,
    qualified_name: OnceLock<String>,
    kind: NodeKind,
}

impl TreeNode {
    /// The simple (last-segment) name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owning group, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The variant and its owned data.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Returns `true` for leaf nodes.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }
}

/// A rooted tree of group and leaf nodes plus the directed graph over leaves.
///
/// `Hierarchy` is `Sync`: once ingestion is finished any number of searches
/// may read it concurrently, each with its own search state.
#[derive(Debug)]
pub struct Hierarchy {
    nodes: Vec<TreeNode>,
    leaf_cache: Vec<OnceLock<Vec<NodeId>>>,
    edge_count: usize,
}

impl Default for Hierarchy {
    fn default() -> Self {
        Self::new()
    }
}

impl Hierarchy {
    /// Create a hierarchy holding only the root group.
    #[must_use]
    pub fn new() -> Self {
        let root = TreeNode {
            name: String::new(),
            parent: None,
            qualified_name: OnceLock::from(String::new()),
            kind: NodeKind::Group {
                children: BTreeMap::new(),
            },
        };
        Self {
            nodes: vec![root],
            leaf_cache: vec![OnceLock::new()],
            edge_count: 0,
        }
    }

    // === Accessors ===

    /// The distinguished root group.
    #[must_use]
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Look up a node by handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different hierarchy and is out of range.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    /// Every node handle, root first, in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Fully-qualified dotted name of a node, from (excluding) the root.
    ///
    /// Built on first use and cached. Empty for the root.
    #[must_use]
    pub fn qualified_name(&self, id: NodeId) -> &str {
        self.node(id).qualified_name.get_or_init(|| {
            let mut segments = Vec::new();
            let mut current = id;
            while let Some(parent) = self.node(current).parent {
                segments.push(self.node(current).name.as_str());
                current = parent;
            }
            segments.reverse();
            segments.join(&PATH_SEPARATOR.to_string())
        })
    }

    /// Outgoing edges of a leaf, in insertion order. Empty for groups.
    #[must_use]
    pub fn successors(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).kind {
            NodeKind::Leaf { successors } => successors,
            NodeKind::Group { .. } => &[],
        }
    }

    /// Number of leaf nodes.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Number of group nodes, excluding the root.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.nodes.len() - 1 - self.leaf_count()
    }

    /// Number of edges added, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    // === Resolution ===

    /// Resolve a segment path to a leaf, creating missing nodes.
    ///
    /// Every segment but the last becomes a group, the last becomes a leaf.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidPath`] if the path or any segment is empty, or a
    ///   segment contains the path separator.
    /// - [`Error::LeafUsedAsGroup`] if an intermediate segment already exists
    ///   as a leaf.
    /// - [`Error::GroupUsedAsLeaf`] if the last segment already exists as a
    ///   group.
    pub fn resolve_or_create<S: AsRef<str>>(&mut self, segments: &[S]) -> Result<NodeId> {
        validate_segments(segments)?;
        let Some((last, groups)) = segments.split_last() else {
            return Err(Error::InvalidPath("empty path".to_string()));
        };

        let mut current = ROOT;
        for segment in groups {
            let segment = segment.as_ref();
            current = match self.child(current, segment) {
                Some(child) if self.node(child).is_leaf() => {
                    return Err(Error::LeafUsedAsGroup {
                        path: self.qualified_name(child).to_string(),
                    });
                }
                Some(child) => child,
                None => self.insert_child(
                    current,
                    segment,
                    NodeKind::Group {
                        children: BTreeMap::new(),
                    },
                ),
            };
        }

        let last = last.as_ref();
        match self.child(current, last) {
            Some(child) if self.node(child).is_leaf() => Ok(child),
            Some(child) => Err(Error::GroupUsedAsLeaf {
                path: self.qualified_name(child).to_string(),
            }),
            None => Ok(self.insert_child(
                current,
                last,
                NodeKind::Leaf {
                    successors: Vec::new(),
                },
            )),
        }
    }

    /// Look up an existing node without creating anything.
    ///
    /// The empty path resolves to the root. Returns `None` if any segment is
    /// absent or a leaf is addressed as if it had children.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, segments: &[S]) -> Option<NodeId> {
        segments
            .iter()
            .try_fold(ROOT, |current, segment| self.child(current, segment.as_ref()))
    }

    /// Look up an existing node by its dotted name.
    ///
    /// The empty string does not name any node.
    #[must_use]
    pub fn resolve_name(&self, name: &str) -> Option<NodeId> {
        if name.is_empty() {
            return None;
        }
        self.resolve(&split_path(name))
    }

    // === Edges ===

    /// Add a directed edge between two leaves, creating them as needed.
    ///
    /// Duplicate edges and self-loops are legal and stored as given.
    ///
    /// # Errors
    ///
    /// Propagates the [`resolve_or_create`](Self::resolve_or_create) errors of
    /// either endpoint.
    pub fn add_edge<S: AsRef<str>, T: AsRef<str>>(&mut self, from: &[S], to: &[T]) -> Result<()> {
        let from = self.resolve_or_create(from)?;
        let to = self.resolve_or_create(to)?;
        if let NodeKind::Leaf { successors } = &mut self.nodes[from.0].kind {
            successors.push(to);
        }
        self.edge_count += 1;
        Ok(())
    }

    /// Add a directed edge between two dotted names.
    ///
    /// # Errors
    ///
    /// See [`add_edge`](Self::add_edge).
    pub fn add_edge_names(&mut self, from: &str, to: &str) -> Result<()> {
        self.add_edge(&split_path(from), &split_path(to))
    }

    // === Tree queries ===

    /// Returns `true` if `ancestor` is `node` or lies on its parent chain.
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// All leaf descendants of a node; a leaf yields itself.
    ///
    /// Computed on first use and cached, together with the leaf set of every
    /// descendant. A warm node therefore never has a cold descendant.
    #[must_use]
    pub fn leaves(&self, id: NodeId) -> &[NodeId] {
        if let Some(leaves) = self.leaf_cache[id.0].get() {
            return leaves;
        }

        // Post-order walk: a group is filled once all of its children are.
        let mut stack = vec![(id, false)];
        while let Some((node, expanded)) = stack.pop() {
            let cell = &self.leaf_cache[node.0];
            if cell.get().is_some() {
                continue;
            }
            match &self.node(node).kind {
                NodeKind::Leaf { .. } => {
                    let _ = cell.set(vec![node]);
                }
                NodeKind::Group { children } if expanded => {
                    let leaves = children
                        .values()
                        .flat_map(|child| {
                            self.leaf_cache[child.0]
                                .get()
                                .map(Vec::as_slice)
                                .unwrap_or_default()
                        })
                        .copied()
                        .collect();
                    let _ = cell.set(leaves);
                }
                NodeKind::Group { children } => {
                    stack.push((node, true));
                    stack.extend(children.values().rev().map(|&child| (child, false)));
                }
            }
        }

        self.leaf_cache[id.0].get_or_init(Vec::new)
    }

    // === Internals ===

    fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        match &self.node(parent).kind {
            NodeKind::Group { children } => children.get(name).copied(),
            NodeKind::Leaf { .. } => None,
        }
    }

    fn insert_child(&mut self, parent: NodeId, name: &str, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let leaf = matches!(kind, NodeKind::Leaf { .. });
        self.nodes.push(TreeNode {
            name: name.to_string(),
            parent: Some(parent),
            qualified_name: OnceLock::new(),
            kind,
        });
        self.leaf_cache.push(OnceLock::new());
        trace!(node = %self.qualified_name(id), leaf, "Created node");

        if let NodeKind::Group { children } = &mut self.nodes[parent.0].kind {
            children.insert(name.to_string(), id);
        }

        // Ancestors' leaf sets now include the new node. A cold ancestor has
        // no warm ancestors, so the walk stops at the first one.
        let mut current = Some(parent);
        while let Some(ancestor) = current {
            if self.leaf_cache[ancestor.0].take().is_none() {
                break;
            }
            current = self.nodes[ancestor.0].parent;
        }

        id
    }
}

fn validate_segments<S: AsRef<str>>(segments: &[S]) -> Result<()> {
    if segments.is_empty() {
        return Err(Error::InvalidPath("empty path".to_string()));
    }
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            return Err(Error::InvalidPath(format!(
                "empty segment in '{}'",
                join_segments(segments)
            )));
        }
        if segment.contains(PATH_SEPARATOR) {
            return Err(Error::InvalidPath(format!(
                "segment '{segment}' contains '{PATH_SEPARATOR}'"
            )));
        }
    }
    Ok(())
}

fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::<str>::as_ref)
        .collect::<Vec<_>>()
        .join(&PATH_SEPARATOR.to_string())
}
