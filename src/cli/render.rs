//! Rendering of query results for the terminal

use itertools::Itertools;
use termtree::Tree;

use crate::domain::{Batch, NodePath};

const ROOT_LABEL: &str = "(root)";

fn path_label(path: &NodePath, separator: &str) -> String {
    if path.is_root() {
        ROOT_LABEL.to_string()
    } else {
        path.join(separator)
    }
}

/// One branch per tree (with its match count), one leaf per path.
pub fn render_tree(title: &str, batch: &Batch, separator: &str) -> Tree<String> {
    let branches = batch.iter().map(|(tree, paths)| {
        Tree::new(format!("{} ({})", tree, paths.len()))
            .with_leaves(paths.iter().map(|p| Tree::new(path_label(p, separator))))
    });
    Tree::new(title.to_string()).with_leaves(branches)
}

/// `tree:path` lines, trees in name order. Empty trees produce no lines.
///
/// Segments are joined with `separator` as-is. A segment that itself
/// contains the separator (possible through the manifest's segment-array
/// form) prints the same as the split path, so such lines do not parse
/// back into the original node.
pub fn render_plain(batch: &Batch, separator: &str) -> Vec<String> {
    batch
        .iter()
        .flat_map(|(tree, paths)| {
            paths
                .iter()
                .map(move |path| format!("{}:{}", tree, path.join(separator)))
        })
        .collect()
}

/// Title line for a query over `specs`.
pub fn query_title<S: AsRef<str>>(specs: &[S]) -> String {
    specs.iter().map(AsRef::<str>::as_ref).join(" & ")
}
