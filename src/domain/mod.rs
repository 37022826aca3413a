//! Domain layer: node identity and the cross-tree connection graph
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod graph;
pub mod linked;

pub use entities::*;
pub use error::DomainError;
pub use graph::ConnectionGraph;
pub use linked::LinkedTrees;
