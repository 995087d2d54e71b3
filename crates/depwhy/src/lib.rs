//! # depwhy: why does one dependency relate to another?
//!
//! depwhy answers reachability questions over a *hierarchical graph*: leaf
//! nodes connected by directed edges, grouped into a tree by their dotted
//! names (`app.core.session` is a leaf under the groups `app.core` and `app`).
//!
//! A query names two nodes, each either a single leaf or a whole group, and
//! asks for the shortest chains of edges leading from any leaf of the first
//! to any leaf of the second.
//!
//! ## Design Philosophy
//!
//! - **Load once, query many** - the tree is frozen after ingestion; searches only read it
//! - **Outcomes, not exceptions** - an unknown name or a missing path is a [`SearchOutcome`], not an [`Error`]
//! - **Diverse over optimal** - additional paths start from distinct source leaves
//! - **Library first, CLI second**
//!
//! ## Quick Start
//!
//! ```
//! use depwhy::{Hierarchy, search};
//!
//! let mut hierarchy = Hierarchy::new();
//! hierarchy.add_edge_names("a.b.c", "x.y")?;
//! hierarchy.add_edge_names("x.y", "p.q")?;
//!
//! let outcome = search(&hierarchy, "a", "p", 1);
//! let path = &outcome.paths()[0];
//! assert_eq!(path.names(&hierarchy), vec!["a.b.c", "x.y", "p.q"]);
//! # Ok::<(), depwhy::Error>(())
//! ```

pub mod config;
mod error;
pub mod hierarchy;
pub mod ingest;
pub mod search;
mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use hierarchy::{Hierarchy, NodeKind, PATH_SEPARATOR, TreeNode};
pub use ingest::{EdgeFormat, LoadStats, LoadWarning, load_edges, load_edges_from_path};
pub use search::{enumerate_paths, find_one_path, search};
pub use types::{Endpoint, LeafPath, NodeId, SearchOutcome};
