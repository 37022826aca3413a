//! treelink: cross-tree node linking
//!
//! Several named trees, each addressed by paths of string segments, are
//! related node by node through a [`domain::ConnectionGraph`]. A query
//! returns, for every tree, the nodes linked to *all* nodes of the query.
//!
//! ```
//! use treelink::domain::{Batch, ConnectionGraph, NodePath, TreeName};
//!
//! let mut graph = ConnectionGraph::new([TreeName::from("form"), TreeName::from("view")]);
//! graph.connect(
//!     &Batch::new()
//!         .with("form", [NodePath::new(["f1"])])
//!         .with("view", [NodePath::new(["v1"]), NodePath::new(["v2"])]),
//! );
//!
//! let result = graph.query(&Batch::new().with("form", [NodePath::new(["f1"])]));
//! assert_eq!(result.get(&"form".into()), Some(&[][..]));
//! assert_eq!(result.get(&"view".into()).map(|p| p.len()), Some(2));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
