//! Named trees bundled with the graph that relates their nodes.

use std::collections::BTreeMap;

use crate::domain::entities::{Batch, NodeId, TreeName};
use crate::domain::graph::ConnectionGraph;

/// A fixed set of named, opaque trees plus their connection graph.
///
/// The graph's known tree set is exactly the set of names given here, so
/// every [`LinkedTrees::connections`] result has one entry per tree.
#[derive(Debug, Clone)]
pub struct LinkedTrees<T> {
    trees: BTreeMap<TreeName, T>,
    graph: ConnectionGraph,
}

impl<T> LinkedTrees<T> {
    pub fn new(trees: BTreeMap<TreeName, T>) -> Self {
        let graph = ConnectionGraph::new(trees.keys().cloned());
        Self { trees, graph }
    }

    pub fn tree(&self, name: &TreeName) -> Option<&T> {
        self.trees.get(name)
    }

    pub fn trees(&self) -> impl Iterator<Item = (&TreeName, &T)> {
        self.trees.iter()
    }

    pub fn connect(&mut self, batch: &Batch) {
        self.graph.connect(batch);
    }

    /// Nodes linked to every node of `batch`; see [`ConnectionGraph::query`].
    pub fn connections(&self, batch: &Batch) -> Batch {
        self.graph.query(batch)
    }

    /// Direct links of one node, shaped like a query result.
    pub fn linked(&self, node: &NodeId) -> Batch {
        let mut result = Batch::with_trees(self.trees.keys().cloned());
        for other in self.graph.linked(node) {
            result.insert(other.clone());
        }
        result.sort_paths();
        result
    }

    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }
}

impl<T> FromIterator<(TreeName, T)> for LinkedTrees<T> {
    fn from_iter<I: IntoIterator<Item = (TreeName, T)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
