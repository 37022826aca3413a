//! Connection graph linking nodes across named trees.
//!
//! Vertices are [`NodeId`]s. Every link is stored in both directions, so
//! the adjacency map is symmetric at all times.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use tracing::{debug, instrument, trace};

use crate::domain::entities::{Batch, NodeId, TreeName};

/// Adjacency map from each node to the nodes it is linked to.
///
/// Grows only through [`ConnectionGraph::connect`]; links are never removed.
#[derive(Debug, Clone, Default)]
pub struct ConnectionGraph {
    /// Tree names known at construction; they shape every query result
    trees: BTreeSet<TreeName>,
    edges: HashMap<NodeId, HashSet<NodeId>>,
}

impl ConnectionGraph {
    pub fn new<I>(trees: I) -> Self
    where
        I: IntoIterator<Item = TreeName>,
    {
        Self {
            trees: trees.into_iter().collect(),
            edges: HashMap::new(),
        }
    }

    /// Link every node of each tree in `batch` with every node of every
    /// other tree in `batch`.
    ///
    /// Nodes of the same tree are never linked to each other, so a batch
    /// naming fewer than two trees adds nothing. Repeating a call is a no-op.
    #[instrument(level = "debug", skip(self, batch), fields(nodes = batch.node_count()))]
    pub fn connect(&mut self, batch: &Batch) {
        let groups: Vec<_> = batch.iter().collect();
        let mut added = 0usize;

        for (i, &(source_tree, sources)) in groups.iter().enumerate() {
            for &(target_tree, targets) in &groups[i + 1..] {
                for a in sources {
                    let a = NodeId::new(source_tree.clone(), a.clone());
                    for b in targets {
                        let b = NodeId::new(target_tree.clone(), b.clone());
                        trace!("link {} <-> {}", a, b);
                        if self.link(a.clone(), b) {
                            added += 1;
                        }
                    }
                }
            }
        }
        debug!("connect: {} new links, {} total", added, self.link_count());
    }

    /// Nodes linked to *every* node of `batch`, grouped by tree.
    ///
    /// The result lists every known tree, empty or not. A node that was
    /// never connected contributes an empty set, and a batch without nodes
    /// yields all-empty lists. Paths inside each list are sorted, but
    /// callers should treat the order as unspecified.
    #[instrument(level = "debug", skip(self, batch), fields(nodes = batch.node_count()))]
    pub fn query(&self, batch: &Batch) -> Batch {
        let mut survivors: Option<HashSet<&NodeId>> = None;

        for node in batch.nodes() {
            let current = match (survivors.take(), self.edges.get(&node)) {
                (_, None) => HashSet::new(),
                (None, Some(linked)) => linked.iter().collect(),
                (Some(acc), Some(linked)) => intersect(acc, linked),
            };
            let exhausted = current.is_empty();
            survivors = Some(current);
            if exhausted {
                trace!("query: intersection empty at {}", node);
                break;
            }
        }

        let mut result = Batch::with_trees(self.trees.iter().cloned());
        let mut matched = 0usize;
        for node in survivors.into_iter().flatten() {
            // Trees outside the known set get an entry on the fly
            result.extend(node.tree.clone(), [node.path.clone()]);
            matched += 1;
        }
        result.sort_paths();
        debug!("query: {} matching nodes", matched);
        result
    }

    /// Tree names known at construction.
    pub fn trees(&self) -> impl Iterator<Item = &TreeName> {
        self.trees.iter()
    }

    pub fn is_known_tree(&self, tree: &TreeName) -> bool {
        self.trees.contains(tree)
    }

    /// Direct neighbours of `node`; empty when it was never connected.
    pub fn linked<'a>(&'a self, node: &NodeId) -> impl Iterator<Item = &'a NodeId> + 'a {
        self.edges.get(node).into_iter().flatten()
    }

    pub fn is_linked(&self, a: &NodeId, b: &NodeId) -> bool {
        self.edges.get(a).is_some_and(|linked| linked.contains(b))
    }

    /// Number of nodes with at least one link.
    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of undirected links.
    pub fn link_count(&self) -> usize {
        self.edges.values().map(HashSet::len).sum::<usize>() / 2
    }

    /// Insert `a <-> b` in both directions. Returns true if it was new.
    fn link(&mut self, a: NodeId, b: NodeId) -> bool {
        let forward = self.edges.entry(a.clone()).or_default().insert(b.clone());
        let backward = self.edges.entry(b).or_default().insert(a);
        forward || backward
    }
}

/// Intersect by walking the smaller set and probing the larger one.
fn intersect<'a, T>(acc: HashSet<&'a T>, next: &'a HashSet<T>) -> HashSet<&'a T>
where
    T: Eq + Hash,
{
    if acc.len() <= next.len() {
        acc.into_iter().filter(|item| next.contains(*item)).collect()
    } else {
        next.iter().filter(|item| acc.contains(item)).collect()
    }
}
