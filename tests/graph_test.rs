//! Tests for ConnectionGraph connect/query semantics

use rstest::{fixture, rstest};

use treelink::domain::{Batch, ConnectionGraph, NodeId, NodePath, TreeName};
use treelink::util::testing;

fn p(segments: &[&str]) -> NodePath {
    NodePath::new(segments.iter().copied())
}

fn tree(name: &str) -> TreeName {
    TreeName::from(name)
}

fn paths(result: &Batch, name: &str) -> Vec<NodePath> {
    result
        .get(&tree(name))
        .map(<[NodePath]>::to_vec)
        .unwrap_or_else(|| panic!("tree {} missing from result", name))
}

#[fixture]
fn form_view() -> ConnectionGraph {
    testing::init_test_setup();
    let mut graph = ConnectionGraph::new([tree("form"), tree("view")]);
    graph.connect(
        &Batch::new()
            .with("form", [p(&["f1"])])
            .with("view", [p(&["v1"]), p(&["v2"])]),
    );
    graph
}

/// a1, a2 -> b; a1 -> c only
#[fixture]
fn three_trees() -> ConnectionGraph {
    testing::init_test_setup();
    let mut graph = ConnectionGraph::new([tree("A"), tree("B"), tree("C")]);
    graph.connect(
        &Batch::new()
            .with("A", [p(&["a1"]), p(&["a2"])])
            .with("B", [p(&["b"])]),
    );
    graph.connect(&Batch::new().with("A", [p(&["a1"])]).with("C", [p(&["c"])]));
    graph
}

// ============================================================
// Scenario from the form/view pairing
// ============================================================

#[rstest]
fn given_form_linked_to_two_views_when_querying_form_then_returns_both_views(
    form_view: ConnectionGraph,
) {
    let result = form_view.query(&Batch::new().with("form", [p(&["f1"])]));

    assert_eq!(paths(&result, "form"), Vec::<NodePath>::new());
    let mut views = paths(&result, "view");
    views.sort();
    assert_eq!(views, vec![p(&["v1"]), p(&["v2"])]);
}

#[rstest]
fn given_form_linked_to_two_views_when_querying_one_view_then_returns_form(
    form_view: ConnectionGraph,
) {
    let result = form_view.query(&Batch::new().with("view", [p(&["v1"])]));

    assert_eq!(paths(&result, "form"), vec![p(&["f1"])]);
    assert!(paths(&result, "view").is_empty());
}

// ============================================================
// Symmetry
// ============================================================

#[rstest]
#[case("form", &["f1"], "view", &["v2"])]
#[case("view", &["v2"], "form", &["f1"])]
fn given_linked_pair_when_querying_either_side_then_other_side_is_found(
    form_view: ConnectionGraph,
    #[case] from_tree: &str,
    #[case] from_path: &[&str],
    #[case] to_tree: &str,
    #[case] to_path: &[&str],
) {
    let result = form_view.query(&Batch::new().with(from_tree, [p(from_path)]));

    assert!(paths(&result, to_tree).contains(&p(to_path)));
}

#[rstest]
fn given_connected_graph_then_every_edge_has_a_reverse(three_trees: ConnectionGraph) {
    let a1 = NodeId::new("A", p(&["a1"]));
    for other in three_trees.linked(&a1) {
        assert!(three_trees.is_linked(other, &a1), "missing {} -> {}", other, a1);
    }
}

// ============================================================
// No self-tree linking
// ============================================================

#[test]
fn given_batch_with_single_tree_when_connecting_then_no_links_are_created() {
    let mut graph = ConnectionGraph::new([tree("A"), tree("B")]);
    graph.connect(&Batch::new().with("A", [p(&["x"]), p(&["y"]), p(&["z"])]));

    assert_eq!(graph.link_count(), 0);
    let result = graph.query(&Batch::new().with("A", [p(&["x"])]));
    assert!(result.is_empty());
    assert_eq!(result.trees().count(), 2);
}

#[test]
fn given_empty_batch_when_connecting_then_graph_stays_empty() {
    let mut graph = ConnectionGraph::new([tree("A")]);
    graph.connect(&Batch::new());
    assert_eq!(graph.node_count(), 0);
}

#[rstest]
fn given_two_trees_when_connecting_then_same_tree_nodes_stay_unlinked(
    form_view: ConnectionGraph,
) {
    let v1 = NodeId::new("view", p(&["v1"]));
    let v2 = NodeId::new("view", p(&["v2"]));
    assert!(!form_view.is_linked(&v1, &v2));
    assert!(!form_view.is_linked(&v2, &v1));
}

// ============================================================
// Idempotence
// ============================================================

#[rstest]
fn given_repeated_connect_when_querying_then_results_match_single_connect(
    form_view: ConnectionGraph,
) {
    let mut twice = form_view.clone();
    twice.connect(
        &Batch::new()
            .with("form", [p(&["f1"])])
            .with("view", [p(&["v1"]), p(&["v2"])]),
    );

    let query = Batch::new().with("form", [p(&["f1"])]);
    assert_eq!(twice.query(&query), form_view.query(&query));
    assert_eq!(twice.link_count(), form_view.link_count());
}

// ============================================================
// Intersection
// ============================================================

#[rstest]
fn given_two_sources_when_querying_both_then_only_common_targets_survive(
    three_trees: ConnectionGraph,
) {
    let result = three_trees.query(&Batch::new().with("A", [p(&["a1"]), p(&["a2"])]));

    assert_eq!(paths(&result, "A"), Vec::<NodePath>::new());
    assert_eq!(paths(&result, "B"), vec![p(&["b"])]);
    assert_eq!(paths(&result, "C"), Vec::<NodePath>::new());
}

#[rstest]
fn given_single_source_when_querying_then_all_its_targets_are_returned(
    three_trees: ConnectionGraph,
) {
    let result = three_trees.query(&Batch::new().with("A", [p(&["a1"])]));

    assert_eq!(paths(&result, "B"), vec![p(&["b"])]);
    assert_eq!(paths(&result, "C"), vec![p(&["c"])]);
}

#[rstest]
fn given_nodes_across_trees_when_querying_then_intersection_spans_trees(
    three_trees: ConnectionGraph,
) {
    // Linked to both B:b and C:c -> only a1
    let result = three_trees.query(
        &Batch::new()
            .with("B", [p(&["b"])])
            .with("C", [p(&["c"])]),
    );

    assert_eq!(paths(&result, "A"), vec![p(&["a1"])]);
    assert!(paths(&result, "B").is_empty());
    assert!(paths(&result, "C").is_empty());
}

#[rstest]
fn given_unseen_node_in_batch_when_querying_then_intersection_is_empty(
    three_trees: ConnectionGraph,
) {
    let result = three_trees.query(&Batch::new().with("A", [p(&["a1"]), p(&["nope"])]));
    assert!(result.is_empty());
}

// ============================================================
// Result shape
// ============================================================

#[rstest]
fn given_query_on_one_tree_then_result_lists_every_known_tree(three_trees: ConnectionGraph) {
    let result = three_trees.query(&Batch::new().with("C", [p(&["c"])]));

    let trees: Vec<_> = result.trees().map(TreeName::as_str).collect();
    assert_eq!(trees, vec!["A", "B", "C"]);
}

#[rstest]
fn given_unknown_node_when_querying_then_every_tree_is_empty(form_view: ConnectionGraph) {
    let result = form_view.query(&Batch::new().with("form", [p(&["unseen"])]));

    assert!(result.is_empty());
    assert_eq!(result.trees().count(), 2);
}

#[rstest]
#[case::no_trees(Batch::new())]
#[case::trees_without_paths(Batch::new().with("form", Vec::new()).with("view", Vec::new()))]
fn given_batch_without_nodes_when_querying_then_all_empty(
    form_view: ConnectionGraph,
    #[case] batch: Batch,
) {
    let result = form_view.query(&batch);

    assert!(result.is_empty());
    assert_eq!(result, Batch::with_trees([tree("form"), tree("view")]));
}

#[test]
fn given_tree_unknown_at_construction_when_querying_then_entry_is_added() {
    let mut graph = ConnectionGraph::new([tree("known")]);
    graph.connect(
        &Batch::new()
            .with("known", [p(&["k"])])
            .with("extra", [p(&["e"])]),
    );

    let result = graph.query(&Batch::new().with("known", [p(&["k"])]));

    assert_eq!(paths(&result, "extra"), vec![p(&["e"])]);
    assert!(paths(&result, "known").is_empty());
    assert!(!graph.is_known_tree(&tree("extra")));
}

// ============================================================
// Structured keys
// ============================================================

#[test]
fn given_separator_characters_in_names_then_nodes_do_not_collide() {
    let mut graph = ConnectionGraph::new([tree("a"), tree("a:b"), tree("t")]);
    // Both would encode as "a:b:x.y" with joined string keys
    graph.connect(
        &Batch::new()
            .with("a:b", [p(&["x.y"])])
            .with("t", [p(&["one"])]),
    );
    graph.connect(
        &Batch::new()
            .with("a", [p(&["b:x", "y"])])
            .with("t", [p(&["two"])]),
    );

    let result = graph.query(&Batch::new().with("a:b", [p(&["x.y"])]));
    assert_eq!(paths(&result, "t"), vec![p(&["one"])]);

    let result = graph.query(&Batch::new().with("a", [p(&["b:x", "y"])]));
    assert_eq!(paths(&result, "t"), vec![p(&["two"])]);
}

#[test]
fn given_root_paths_when_connecting_then_roots_link_like_any_node() {
    let mut graph = ConnectionGraph::new([tree("a"), tree("b")]);
    graph.connect(
        &Batch::new()
            .with("a", [NodePath::root()])
            .with("b", [NodePath::root()]),
    );

    let result = graph.query(&Batch::new().with("a", [NodePath::root()]));
    assert_eq!(paths(&result, "b"), vec![NodePath::root()]);
}
