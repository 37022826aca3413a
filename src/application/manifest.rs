//! Link manifest: the TOML document declaring trees and their links
//!
//! ```toml
//! [trees.form]
//! description = "form data model"
//!
//! [trees.view]
//!
//! [[links]]
//! form = ["f1"]
//! view = ["v1", ["v2", "deep"]]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Batch, NodePath, TreeName};

/// Metadata of one declared tree. The tree itself is opaque to linking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TreeSpec {
    pub description: Option<String>,
}

/// A path as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSpec {
    /// Segments joined by the configured separator (`""` is the root)
    Joined(String),
    /// Explicit segments, never split
    Segments(Vec<String>),
}

impl PathSpec {
    pub fn to_path(&self, separator: &str) -> NodePath {
        match self {
            PathSpec::Joined(text) => NodePath::parse(text, separator),
            PathSpec::Segments(segments) => NodePath::new(segments.iter().cloned()),
        }
    }
}

/// One `[[links]]` entry: tree name to the paths linked across trees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkSpec(pub BTreeMap<String, Vec<PathSpec>>);

impl LinkSpec {
    pub fn to_batch(&self, separator: &str) -> Batch {
        let mut batch = Batch::new();
        for (tree, paths) in &self.0 {
            batch.extend(tree.as_str(), paths.iter().map(|p| p.to_path(separator)));
        }
        batch
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default)]
    pub trees: BTreeMap<String, TreeSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
}

impl Manifest {
    /// Parse and validate manifest content. `path` is used for error context.
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        let manifest: Manifest = toml::from_str(content).map_err(|e| ApplicationError::Manifest {
            path: path.to_path_buf(),
            message: e.to_string().trim().to_string(),
        })?;
        manifest.validate(path)?;
        Ok(manifest)
    }

    /// Every link may only name declared trees; at least one tree is required.
    pub fn validate(&self, path: &Path) -> ApplicationResult<()> {
        if self.trees.is_empty() {
            return Err(ApplicationError::Manifest {
                path: path.to_path_buf(),
                message: "no trees declared".to_string(),
            });
        }
        for (index, link) in self.links.iter().enumerate() {
            if let Some(tree) = link.0.keys().find(|t| !self.trees.contains_key(*t)) {
                return Err(ApplicationError::UnknownTree {
                    tree: tree.clone(),
                    link: index + 1,
                });
            }
        }
        Ok(())
    }

    pub fn tree_names(&self) -> impl Iterator<Item = TreeName> + '_ {
        self.trees.keys().map(|name| TreeName::from(name.as_str()))
    }
}
