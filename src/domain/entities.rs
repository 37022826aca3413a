//! Domain entities: tree names, node paths, compound node ids and batches

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::error::DomainError;

/// Default separator between path segments in the text form of a node.
pub const DEFAULT_SEPARATOR: &str = ".";

/// Name of one participating tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TreeName(String);

impl TreeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TreeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TreeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TreeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Ordered sequence of segments addressing a node inside a tree.
///
/// Segments are opaque strings. The empty path addresses the tree root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodePath(Vec<String>);

impl NodePath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// The root path (no segments).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Split `text` on `separator`. An empty string is the root path.
    pub fn parse(text: &str, separator: &str) -> Self {
        if text.is_empty() {
            return Self::root();
        }
        Self::new(text.split(separator))
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn join(&self, separator: &str) -> String {
        self.0.join(separator)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join(DEFAULT_SEPARATOR))
    }
}

impl<S: Into<String>> FromIterator<S> for NodePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Compound vertex identity: a path within a named tree.
///
/// Equality and hashing are structural over both parts, so separator
/// characters inside names or segments never cause collisions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub tree: TreeName,
    pub path: NodePath,
}

impl NodeId {
    pub fn new(tree: impl Into<TreeName>, path: NodePath) -> Self {
        Self {
            tree: tree.into(),
            path,
        }
    }

    /// Parse the text form `tree:seg<sep>seg`.
    ///
    /// Splits on the first `:`; everything after it is the path.
    pub fn parse(spec: &str, separator: &str) -> Result<Self, DomainError> {
        let (tree, path) = spec
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidNodeSpec {
                spec: spec.to_string(),
                reason: "expected <tree>:<path>".to_string(),
            })?;
        if tree.is_empty() {
            return Err(DomainError::InvalidNodeSpec {
                spec: spec.to_string(),
                reason: "empty tree name".to_string(),
            });
        }
        Ok(Self::new(tree, NodePath::parse(path, separator)))
    }

    pub fn to_spec(&self, separator: &str) -> String {
        format!("{}:{}", self.tree, self.path.join(separator))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tree, self.path)
    }
}

/// Paths grouped by tree: the input of `connect`/`query` and the shape of
/// a query result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch(BTreeMap<TreeName, Vec<NodePath>>);

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// A batch with an empty path list for every given tree.
    pub fn with_trees<I>(trees: I) -> Self
    where
        I: IntoIterator<Item = TreeName>,
    {
        Self(trees.into_iter().map(|t| (t, Vec::new())).collect())
    }

    /// Builder form of [`Batch::extend`].
    pub fn with<I>(mut self, tree: impl Into<TreeName>, paths: I) -> Self
    where
        I: IntoIterator<Item = NodePath>,
    {
        self.extend(tree, paths);
        self
    }

    /// Append `paths` to `tree`, creating the entry if absent.
    pub fn extend<I>(&mut self, tree: impl Into<TreeName>, paths: I)
    where
        I: IntoIterator<Item = NodePath>,
    {
        self.0.entry(tree.into()).or_default().extend(paths);
    }

    /// Append one path unless the tree already lists it.
    pub fn insert(&mut self, node: NodeId) {
        let paths = self.0.entry(node.tree).or_default();
        if !paths.contains(&node.path) {
            paths.push(node.path);
        }
    }

    pub fn get(&self, tree: &TreeName) -> Option<&[NodePath]> {
        self.0.get(tree).map(Vec::as_slice)
    }

    pub fn trees(&self) -> impl Iterator<Item = &TreeName> {
        self.0.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, TreeName, Vec<NodePath>> {
        self.0.iter()
    }

    /// Every node of the batch, trees first then paths.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.0.iter().flat_map(|(tree, paths)| {
            paths
                .iter()
                .map(move |path| NodeId::new(tree.clone(), path.clone()))
        })
    }

    /// True when the batch names no node at all.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    pub fn node_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub(crate) fn sort_paths(&mut self) {
        for paths in self.0.values_mut() {
            paths.sort();
        }
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = (&'a TreeName, &'a Vec<NodePath>);
    type IntoIter = btree_map::Iter<'a, TreeName, Vec<NodePath>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<NodeId> for Batch {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut batch = Batch::new();
        for node in iter {
            batch.insert(node);
        }
        batch
    }
}

/// Expand `~`, `$VAR` and `${VAR}` in a path string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_spec_splits_on_first_colon() {
        let node = NodeId::parse("view:a:b.c", ".").unwrap();
        assert_eq!(node.tree, TreeName::from("view"));
        assert_eq!(node.path, NodePath::new(["a:b", "c"]));
    }

    #[test]
    fn node_spec_with_empty_path_is_root() {
        let node = NodeId::parse("form:", ".").unwrap();
        assert!(node.path.is_root());
        assert_eq!(node.to_spec("."), "form:");
    }

    #[test]
    fn node_spec_without_tree_is_rejected() {
        assert!(NodeId::parse(":a.b", ".").is_err());
        assert!(NodeId::parse("no-colon", ".").is_err());
    }

    #[test]
    fn batch_insert_skips_duplicate_paths() {
        let mut batch = Batch::new();
        batch.insert(NodeId::new("form", NodePath::new(["f1"])));
        batch.insert(NodeId::new("form", NodePath::new(["f1"])));
        assert_eq!(batch.node_count(), 1);
    }

    #[test]
    fn batch_with_only_empty_lists_is_empty() {
        let batch = Batch::with_trees([TreeName::from("a"), TreeName::from("b")]);
        assert!(batch.is_empty());
        assert_eq!(batch.trees().count(), 2);
    }
}
