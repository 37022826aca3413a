//! Link service
//!
//! Loads a link manifest, builds the linked trees in memory and answers
//! queries given as node specs (`tree:seg.seg`).

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt, Manifest, TreeSpec};
use crate::domain::{Batch, DomainError, LinkedTrees, NodeId};
use crate::infrastructure::traits::FileSystem;

/// Service for building and querying cross-tree links.
pub struct LinkService {
    fs: Arc<dyn FileSystem>,
    separator: String,
}

impl LinkService {
    /// Create a new link service splitting path segments on `separator`.
    pub fn new(fs: Arc<dyn FileSystem>, separator: impl Into<String>) -> Self {
        Self {
            fs,
            separator: separator.into(),
        }
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Read the manifest at `path` and connect every declared link in order.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<LinkedTrees<TreeSpec>> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read manifest", path)?;
        let manifest = Manifest::parse(&content, path)?;
        Ok(self.build(&manifest))
    }

    /// Build linked trees from an already validated manifest.
    pub fn build(&self, manifest: &Manifest) -> LinkedTrees<TreeSpec> {
        let mut linked: LinkedTrees<TreeSpec> = manifest
            .tree_names()
            .zip(manifest.trees.values().cloned())
            .collect();
        for link in &manifest.links {
            linked.connect(&link.to_batch(&self.separator));
        }
        debug!(
            "build: {} trees, {} links, {} linked nodes",
            manifest.trees.len(),
            linked.graph().link_count(),
            linked.graph().node_count()
        );
        linked
    }

    pub fn parse_node(&self, spec: &str) -> Result<NodeId, DomainError> {
        NodeId::parse(spec, &self.separator)
    }

    /// Parse node specs and group them by tree. Repeated nodes are kept once.
    pub fn parse_batch<S: AsRef<str>>(&self, specs: &[S]) -> ApplicationResult<Batch> {
        let nodes = specs
            .iter()
            .map(|spec| self.parse_node(spec.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(nodes.into_iter().collect())
    }

    /// Nodes linked to all of `specs`, for every declared tree.
    #[instrument(level = "debug", skip(self, linked, specs), fields(count = specs.len()))]
    pub fn query<S: AsRef<str>>(
        &self,
        linked: &LinkedTrees<TreeSpec>,
        specs: &[S],
    ) -> ApplicationResult<Batch> {
        let batch = self.parse_batch(specs)?;
        Ok(linked.connections(&batch))
    }

    /// Direct links of one node, for every declared tree.
    #[instrument(level = "debug", skip(self, linked))]
    pub fn links_of(&self, linked: &LinkedTrees<TreeSpec>, spec: &str) -> ApplicationResult<Batch> {
        let node = self.parse_node(spec)?;
        Ok(linked.linked(&node))
    }
}
