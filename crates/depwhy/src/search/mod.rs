//! Shortest-path search between two groups of the hierarchy.
//!
//! ## Operations
//!
//! | Operation | Algorithm |
//! |-----------|-----------|
//! | [`find_one_path`] | Multi-source Dijkstra with unit edge cost, stopping at first contact with the destination group |
//! | [`enumerate_paths`] | Repeated [`find_one_path`], excluding the heads of paths already found |
//! | [`search`] | Name resolution plus [`enumerate_paths`] |
//!
//! Each call owns its distance map, predecessor map and frontier; nothing is
//! shared between calls, so searches over the same [`Hierarchy`] may run in
//! parallel.
//!
//! ## Path diversity
//!
//! [`enumerate_paths`] guarantees that every returned path starts from a
//! distinct source leaf. It does not compute the k globally shortest paths:
//! only the source-side leaf of each found path is excluded from later
//! attempts, never intermediate or destination leaves.

mod frontier;

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::hierarchy::Hierarchy;
use crate::types::{Endpoint, LeafPath, NodeId, SearchOutcome};

use frontier::Frontier;

/// Find one shortest path from a leaf under `from` to a leaf under `to`.
///
/// Leaves in `excluded` keep distance 0 but are not used as starting points.
/// Returns `None` if no non-excluded source leaf connects to the destination
/// group.
///
/// When the groups overlap, the first non-excluded source leaf that also lies
/// under `to` is returned as a single-leaf path.
#[must_use]
pub fn find_one_path(
    hierarchy: &Hierarchy,
    from: NodeId,
    to: NodeId,
    excluded: &HashSet<NodeId>,
) -> Option<LeafPath> {
    let sources = hierarchy.leaves(from);
    let mut distance: HashMap<NodeId, usize> = HashMap::with_capacity(sources.len());
    let mut predecessor: HashMap<NodeId, NodeId> = HashMap::new();
    let mut frontier = Frontier::new();

    for &leaf in sources {
        distance.insert(leaf, 0);
        if !excluded.contains(&leaf) {
            frontier.push(leaf, 0);
        }
    }

    if frontier.is_empty() {
        debug!(
            from = %hierarchy.qualified_name(from),
            sources = sources.len(),
            "No usable source leaves"
        );
        return None;
    }

    if let Some(&leaf) = sources
        .iter()
        .find(|&&leaf| !excluded.contains(&leaf) && hierarchy.contains(to, leaf))
    {
        return Some(LeafPath::single(leaf));
    }

    debug!(
        from = %hierarchy.qualified_name(from),
        to = %hierarchy.qualified_name(to),
        seeded = frontier.len(),
        "Starting path search"
    );

    // Destination leaves in the order they first received a predecessor.
    let mut reached: Vec<NodeId> = Vec::new();
    let mut destination_reached = false;
    let mut extracted = 0usize;

    while !destination_reached {
        let Some((leaf, leaf_distance)) = frontier.pop() else {
            break;
        };
        extracted += 1;
        let candidate = leaf_distance + 1;

        for &next in hierarchy.successors(leaf) {
            if distance.get(&next).is_none_or(|&d| d > candidate) {
                let first_visit = predecessor.insert(next, leaf).is_none();
                if first_visit && hierarchy.contains(to, next) {
                    reached.push(next);
                }
                distance.insert(next, candidate);
                frontier.push(next, candidate);
            }

            if predecessor.contains_key(&next) && hierarchy.contains(to, next) {
                destination_reached = true;
            }
        }
    }

    let terminal = reached
        .into_iter()
        .min_by_key(|leaf| distance.get(leaf).copied().unwrap_or(usize::MAX))?;

    let mut leaves = vec![terminal];
    let mut current = terminal;
    while !hierarchy.contains(from, current) {
        let Some(&previous) = predecessor.get(&current) else {
            break;
        };
        leaves.push(previous);
        current = previous;
    }
    leaves.reverse();

    debug!(extracted, length = leaves.len(), "Path found");
    LeafPath::new(leaves)
}

/// Collect up to `limit` paths between two nodes with distinct heads.
///
/// Stops early when a search attempt finds nothing, so at most `limit`
/// searches run.
#[must_use]
pub fn enumerate_paths(
    hierarchy: &Hierarchy,
    from: NodeId,
    to: NodeId,
    limit: usize,
) -> Vec<LeafPath> {
    collect_paths(limit, |heads| find_one_path(hierarchy, from, to, heads))
}

/// Run `attempt` with a growing set of used heads until it fails or `limit`
/// paths are collected. Each attempt either adds a path or ends the loop.
fn collect_paths<F>(limit: usize, mut attempt: F) -> Vec<LeafPath>
where
    F: FnMut(&HashSet<NodeId>) -> Option<LeafPath>,
{
    let mut paths = Vec::new();
    let mut heads = HashSet::new();

    while paths.len() < limit {
        let Some(path) = attempt(&heads) else {
            break;
        };
        heads.insert(path.head());
        paths.push(path);
    }

    paths
}

/// Search for up to `limit` paths between two dotted names.
///
/// An unresolvable name is reported as [`SearchOutcome::NotFound`] (the
/// source name is checked first) and logged; it never fails the caller.
#[must_use]
pub fn search(hierarchy: &Hierarchy, from: &str, to: &str, limit: usize) -> SearchOutcome {
    let Some(from_node) = hierarchy.resolve_name(from) else {
        warn!(name = from, endpoint = %Endpoint::Source, "Node not found");
        return SearchOutcome::NotFound {
            name: from.to_string(),
            endpoint: Endpoint::Source,
        };
    };
    let Some(to_node) = hierarchy.resolve_name(to) else {
        warn!(name = to, endpoint = %Endpoint::Destination, "Node not found");
        return SearchOutcome::NotFound {
            name: to.to_string(),
            endpoint: Endpoint::Destination,
        };
    };

    let paths = enumerate_paths(hierarchy, from_node, to_node, limit);
    if paths.is_empty() {
        SearchOutcome::NoPath
    } else {
        SearchOutcome::Found(paths)
    }
}
