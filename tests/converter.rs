//! Tests for building the editor graph and walking it back into blocks.
mod common;
use common::*;
use flowdraft::converter::LOOP_BLOCKS;
use flowdraft::prelude::*;
use itertools::Itertools;
use serde_json::json;

#[test]
fn test_scenario_graph_has_two_nodes_and_one_edge() {
    let workflow = scenario_workflow();
    let graph = Converter::default().to_graph(workflow.blocks()).unwrap();

    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].source, NodeId::from("A"));
    assert_eq!(graph.edges[0].target, NodeId::from("B"));
}

#[test]
fn test_empty_block_list_gives_empty_graph() {
    let graph = Converter::default().to_graph(&[]).unwrap();
    assert!(graph.is_empty());
    assert!(graph.edges.is_empty());
    assert!(Converter::default().to_blocks(&graph).unwrap().is_empty());
}

#[test]
fn test_round_trip_reproduces_every_ordering() {
    let converter = Converter::default();
    let blocks = vec![
        task("open"),
        Block::new("wait", "wait").with_config("wait_sec", json!(5)),
        Block::new("mail", "send_email").with_continue_on_failure(true),
        for_loop("each", vec![task("visit"), task("extract")]),
    ];

    for ordering in blocks.iter().cloned().permutations(blocks.len()) {
        let graph = converter.to_graph(&ordering).unwrap();
        let recovered = converter.to_blocks(&graph).unwrap();
        assert_eq!(recovered, ordering);
    }
}

#[test]
fn test_round_trip_survives_shuffled_node_and_edge_order() {
    let converter = Converter::default();
    let blocks = vec![task("a"), task("b"), task("c"), task("d")];
    let mut graph = converter.to_graph(&blocks).unwrap();

    graph.nodes.reverse();
    graph.edges.rotate_left(1);

    assert_eq!(converter.to_blocks(&graph).unwrap(), blocks);
}

#[test]
fn test_node_ids_are_stable_across_reloads() {
    let converter = Converter::default();
    let blocks = vec![task("login"), for_loop("each", vec![task("visit")])];

    let first = converter.to_graph(&blocks).unwrap();
    let second = converter.to_graph(&blocks).unwrap();
    assert_eq!(first, second);

    let ids: Vec<_> = first.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["login", "each", "each/visit"]);
}

#[test]
fn test_for_loop_expands_into_nested_nodes() {
    let converter = Converter::default();
    let blocks = vec![
        task("start"),
        for_loop("each", vec![task("visit"), task("extract")]),
        task("finish"),
    ];
    let graph = converter.to_graph(&blocks).unwrap();

    assert_eq!(graph.nodes.len(), 5);
    let container = graph.node(&NodeId::from("each")).unwrap();
    assert!(container.data.config_value(LOOP_BLOCKS).is_none());
    assert_eq!(
        container.data.config_value("loop_over_parameter_key"),
        Some(&json!("urls"))
    );

    let body: Vec<_> = graph
        .children(Some(&container.id))
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(body, vec!["each/visit", "each/extract"]);

    let edges: Vec<_> = graph
        .edges
        .iter()
        .map(|e| (e.source.as_str(), e.target.as_str()))
        .collect();
    assert!(edges.contains(&("start", "each")));
    assert!(edges.contains(&("each", "finish")));
    assert!(edges.contains(&("each/visit", "each/extract")));
    assert_eq!(edges.len(), 3);
}

#[test]
fn test_layout_stacks_blocks_and_makes_room_for_loop_bodies() {
    let layout = LayoutOptions::default();
    let converter = Converter::builder().with_layout(layout).build();
    let graph = converter
        .to_graph(&[
            for_loop("each", vec![task("visit"), task("extract")]),
            task("after"),
        ])
        .unwrap();

    let each = graph.node(&NodeId::from("each")).unwrap();
    let visit = graph.node(&NodeId::from("each/visit")).unwrap();
    let extract = graph.node(&NodeId::from("each/extract")).unwrap();
    let after = graph.node(&NodeId::from("after")).unwrap();

    assert_eq!(each.position, layout.origin);
    assert_eq!(visit.position, layout.child_offset);
    assert_eq!(extract.position.y, layout.child_offset.y + layout.node_spacing);
    assert_eq!(
        after.position.y,
        layout.child_offset.y + 2.0 * layout.node_spacing
    );
}

#[test]
fn test_unsupported_block_kind_aborts_conversion() {
    let blocks = vec![task("a"), Block::new("b", "teleport"), task("c")];
    match Converter::default().to_graph(&blocks) {
        Err(ConversionError::UnsupportedBlockKind { label, block_type }) => {
            assert_eq!(label, "b");
            assert_eq!(block_type, "teleport");
        }
        other => panic!("Expected UnsupportedBlockKind, got {:?}", other),
    }
}

#[test]
fn test_unsupported_kind_inside_loop_body_aborts_conversion() {
    let blocks = vec![for_loop("each", vec![Block::new("inner", "teleport")])];
    assert!(matches!(
        Converter::default().to_graph(&blocks),
        Err(ConversionError::UnsupportedBlockKind { .. })
    ));
}

#[test]
fn test_duplicate_labels_are_rejected() {
    let blocks = vec![task("a"), task("a")];
    assert_eq!(
        Converter::default().to_graph(&blocks),
        Err(ConversionError::DuplicateBlockLabel {
            label: "a".to_string(),
            scope: "<root>".to_string(),
        })
    );
}

#[test]
fn test_for_loop_without_body_is_invalid() {
    let blocks = vec![Block::new("each", "for_loop")];
    assert!(matches!(
        Converter::default().to_graph(&blocks),
        Err(ConversionError::InvalidBlockConfig { ref label, .. }) if label == "each"
    ));
}

#[test]
fn test_kind_mapping_reuses_builtin_shape() {
    let converter = Converter::builder()
        .with_kind_mapping("browser_task", "task")
        .build();
    assert!(converter.supports("browser_task"));

    let blocks = vec![Block::new("a", "browser_task"), task("b")];
    let graph = converter.to_graph(&blocks).unwrap();
    assert_eq!(converter.to_blocks(&graph).unwrap(), blocks);
}

struct ConditionalShape;

impl BlockShape for ConditionalShape {
    fn block_type(&self) -> &str {
        "conditional"
    }
}

#[test]
fn test_custom_shape_registration() {
    let blocks = vec![Block::new("check", "conditional")];
    assert!(Converter::default().to_graph(&blocks).is_err());

    let converter = Converter::builder()
        .with_custom_shape(Box::new(ConditionalShape))
        .build();
    let graph = converter.to_graph(&blocks).unwrap();
    assert_eq!(graph.nodes[0].node_type, "conditional");
}

#[test]
fn test_edited_graph_yields_edited_blocks() {
    let converter = Converter::default();
    let blocks = vec![task("a"), task("b"), task("c")];
    let mut graph = converter.to_graph(&blocks).unwrap();

    graph
        .node_mut(&NodeId::from("a"))
        .unwrap()
        .data
        .config
        .insert("navigation_goal".to_string(), json!("changed"));
    assert!(graph.remove_node(&NodeId::from("b")));

    let recovered = converter.to_blocks(&graph).unwrap();
    let labels: Vec<_> = recovered.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["a", "c"]);
    assert_eq!(
        recovered[0].config_value("navigation_goal"),
        Some(&json!("changed"))
    );
}

#[test]
fn test_removing_a_loop_removes_its_body() {
    let converter = Converter::default();
    let mut graph = converter
        .to_graph(&[task("a"), for_loop("each", vec![task("visit")]), task("c")])
        .unwrap();

    assert!(graph.remove_node(&NodeId::from("each")));
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(
        converter.to_blocks(&graph).unwrap(),
        vec![task("a"), task("c")]
    );
}

#[test]
fn test_positions_can_be_cached_and_reapplied() {
    let converter = Converter::default();
    let blocks = vec![task("a"), task("b")];
    let mut graph = converter.to_graph(&blocks).unwrap();
    graph.node_mut(&NodeId::from("b")).unwrap().position = Position::new(400.0, 25.0);
    let cache = graph.positions();

    let mut reloaded = converter.to_graph(&blocks).unwrap();
    reloaded.apply_positions(&cache);
    assert_eq!(
        reloaded.node(&NodeId::from("b")).unwrap().position,
        Position::new(400.0, 25.0)
    );
}

#[test]
fn test_branching_graph_is_rejected() {
    let converter = Converter::default();
    let mut graph = converter.to_graph(&[task("a"), task("b"), task("c")]).unwrap();
    graph
        .edges
        .push(Edge::between(NodeId::from("a"), NodeId::from("c")));

    assert_eq!(
        converter.to_blocks(&graph),
        Err(ConversionError::Graph(GraphError::Branching("a".to_string())))
    );
}

#[test]
fn test_disconnected_graph_has_ambiguous_entry() {
    let converter = Converter::default();
    let mut graph = converter.to_graph(&[task("a"), task("b")]).unwrap();
    graph.edges.clear();

    assert!(matches!(
        converter.to_blocks(&graph),
        Err(ConversionError::Graph(GraphError::AmbiguousEntry { .. }))
    ));
}

#[test]
fn test_cycle_without_entry_is_rejected() {
    let converter = Converter::default();
    let mut graph = converter.to_graph(&[task("a"), task("b")]).unwrap();
    graph
        .edges
        .push(Edge::between(NodeId::from("b"), NodeId::from("a")));

    assert!(matches!(
        converter.to_blocks(&graph),
        Err(ConversionError::Graph(GraphError::MissingEntry { .. }))
    ));
}

#[test]
fn test_cycle_behind_entry_is_rejected() {
    let converter = Converter::default();
    let mut graph = converter
        .to_graph(&[task("a"), task("b"), task("c")])
        .unwrap();
    graph
        .edges
        .push(Edge::between(NodeId::from("c"), NodeId::from("b")));

    assert_eq!(
        converter.to_blocks(&graph),
        Err(ConversionError::Graph(GraphError::CycleDetected(
            "b".to_string()
        )))
    );
}

#[test]
fn test_dangling_and_cross_scope_edges_are_rejected() {
    let converter = Converter::default();
    let base = converter
        .to_graph(&[task("a"), for_loop("each", vec![task("visit")])])
        .unwrap();

    let mut dangling = base.clone();
    dangling
        .edges
        .push(Edge::between(NodeId::from("each"), NodeId::from("ghost")));
    assert!(matches!(
        converter.to_blocks(&dangling),
        Err(ConversionError::Graph(GraphError::DanglingEdge { ref node_id, .. })) if node_id == "ghost"
    ));

    let mut crossing = base;
    crossing
        .edges
        .push(Edge::between(NodeId::from("each"), NodeId::from("each/visit")));
    assert!(matches!(
        converter.to_blocks(&crossing),
        Err(ConversionError::Graph(GraphError::CrossScopeEdge { .. }))
    ));
}

#[test]
fn test_children_under_a_leaf_are_rejected() {
    let converter = Converter::default();
    let mut graph = converter.to_graph(&[task("a")]).unwrap();
    let mut stray = graph.nodes[0].clone();
    stray.id = NodeId::from("a/nested");
    stray.parent_id = Some(NodeId::from("a"));
    graph.nodes.push(stray);

    assert!(matches!(
        converter.to_blocks(&graph),
        Err(ConversionError::InvalidBlockConfig { ref label, .. }) if label == "a"
    ));
}

#[test]
fn test_graph_serializes_for_the_canvas() {
    let graph = Converter::default()
        .to_graph(&[for_loop("each", vec![task("visit")])])
        .unwrap();
    let value = serde_json::to_value(&graph).unwrap();

    assert_eq!(value["nodes"][0]["type"], json!("for_loop"));
    assert!(value["nodes"][0].get("parentId").is_none());
    assert_eq!(value["nodes"][1]["parentId"], json!("each"));
    assert_eq!(value["nodes"][1]["data"]["label"], json!("visit"));
}

#[test]
fn test_parent_cycle_is_rejected_instead_of_dropping_nodes() {
    let converter = Converter::default();
    let mut graph = converter
        .to_graph(&[task("a"), task("b"), task("c")])
        .unwrap();
    graph.edges.clear();
    graph.node_mut(&NodeId::from("b")).unwrap().parent_id = Some(NodeId::from("c"));
    graph.node_mut(&NodeId::from("c")).unwrap().parent_id = Some(NodeId::from("b"));

    assert!(matches!(
        converter.to_blocks(&graph),
        Err(ConversionError::Graph(GraphError::ParentCycle(_)))
    ));
}

#[test]
fn test_node_nested_in_itself_is_rejected() {
    let converter = Converter::default();
    let mut graph = converter.to_graph(&[task("a"), task("b")]).unwrap();
    graph.edges.clear();
    graph.node_mut(&NodeId::from("b")).unwrap().parent_id = Some(NodeId::from("b"));

    assert_eq!(
        converter.to_blocks(&graph),
        Err(ConversionError::Graph(GraphError::ParentCycle(
            "b".to_string()
        )))
    );
}

#[test]
fn test_labels_with_separators_get_distinct_ids() {
    let converter = Converter::default();
    let blocks = vec![task("a/b"), for_loop("a", vec![task("b")])];
    let graph = converter.to_graph(&blocks).unwrap();

    let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["a%2Fb", "a", "a/b"]);
    assert_eq!(converter.to_blocks(&graph).unwrap(), blocks);
}

#[test]
fn test_edge_ids_stay_unique_when_labels_contain_arrows() {
    let converter = Converter::default();
    let blocks = vec![task("a->b"), task("c"), task("a"), task("b->c")];
    let graph = converter.to_graph(&blocks).unwrap();

    let ids: std::collections::BTreeSet<_> = graph.edges.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids.len(), graph.edges.len());
    assert_eq!(converter.to_blocks(&graph).unwrap(), blocks);
}

#[test]
fn test_loop_body_from_a_record_round_trips_unchanged() {
    let raw = json!({
        "label": "each",
        "block_type": "for_loop",
        "loop_over_parameter_key": "urls",
        "loop_blocks": [
            {"label": "visit", "block_type": "task", "url": "https://example.com"},
            {"label": "grab", "block_type": "extraction", "continue_on_failure": true}
        ]
    });
    let block: Block = serde_json::from_value(raw.clone()).unwrap();

    let converter = Converter::default();
    let graph = converter.to_graph(std::slice::from_ref(&block)).unwrap();
    let recovered = converter.to_blocks(&graph).unwrap();

    assert_eq!(recovered, vec![block]);
    assert_eq!(serde_json::to_value(&recovered[0]).unwrap(), raw);
}
