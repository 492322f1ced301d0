use crate::*;
use serde_json::{Value, json};

fn registry() -> GraphRegistry<RecordingChannel> {
    GraphRegistry::new(RecordingChannel::new())
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn drawing_the_same_node_twice_keeps_one_entry() {
    let mut reg = registry();
    assert!(reg.draw_node(Node::new("n1", 10.0, 10.0, 80.0, 40.0, "rect")));
    assert!(!reg.draw_node(Node::new("n1", 50.0, 50.0, 80.0, 40.0, "ellipse")));

    assert_eq!(reg.nodes().len(), 1);
    assert_eq!(reg.channel().names(), vec!["drawNode", "drawNode"]);
    // The first registration stays the live one.
    assert_eq!(reg.node("n1").map(|n| n.shape.as_str()), Some("rect"));
    let second = reg.channel().commands()[1].payload().cloned().unwrap_or(Value::Null);
    assert_eq!(second["shape"], "ellipse");
}

#[test]
fn nodes_and_texts_share_one_id_space() {
    let mut reg = registry();
    assert!(reg.draw_node(Node::new("x", 0.0, 0.0, 10.0, 10.0, "rect")));
    assert!(!reg.draw_text(Node::text("x", "x", "label")));
    assert!(reg.draw_text(Node::text("t", "x", "label")));
    assert!(!reg.draw_node(Node::new("t", 0.0, 0.0, 10.0, 10.0, "rect")));
    assert_eq!((reg.nodes().len(), reg.texts().len()), (1, 1));
    // Colliding draws still reach the surface.
    assert_eq!(
        reg.channel().names(),
        vec!["drawNode", "drawText", "drawText", "drawNode"]
    );

    reg.set_node_style("x", "fillColor", "red").unwrap();
    assert_eq!(reg.node("x").map(|n| n.node_styles.fill_color.as_str()), Some("red"));
    assert_eq!(reg.text("t").map(|t| t.node_styles.fill_color.as_str()), Some("#ffffff"));

    assert!(matches!(reg.remove("x"), Some(Cell::Node(n)) if n.kind() == NodeKind::Plain));
    assert!(reg.remove("x").is_none());
    assert!(reg.nodes().is_empty());
    assert_eq!(reg.texts().len(), 1);
}

#[test]
fn edge_ids_are_checked_only_against_edges() {
    let mut reg = registry();
    reg.draw_node(Node::new("x", 0.0, 0.0, 10.0, 10.0, "rect"));
    assert!(reg.draw_edge(Edge::new("x", "x", "x")));
    assert!(!reg.draw_edge(Edge::new("x", "x", "x")));

    // Nodes are searched before edges.
    assert!(matches!(reg.remove("x"), Some(Cell::Node(_))));
    assert!(matches!(reg.remove("x"), Some(Cell::Edge(_))));
    assert!(reg.remove("x").is_none());
    assert_eq!(
        reg.channel().names()[3..],
        ["removeCell", "removeCell", "removeCell"]
    );
}

#[test]
fn unregistered_draw_dispatches_without_registering() {
    let mut reg = registry();
    let node = Node::new("ghost", 1.0, 2.0, 3.0, 4.0, "rect");
    reg.draw_node_unregistered(&node);
    reg.draw_node_unregistered(&node);

    assert!(reg.nodes().is_empty());
    assert!(reg.node("ghost").is_none());
    assert_eq!(reg.channel().names(), vec!["drawNode", "drawNode"]);
    assert_eq!(
        reg.channel().commands()[0].payload(),
        Some(&cellmirror_core::wire::node_to_json(&node))
    );
}

#[test]
fn removing_an_unknown_id_is_a_dispatching_no_op() {
    let mut reg = registry();
    reg.draw_node(Node::new("n1", 0.0, 0.0, 10.0, 10.0, "rect"));
    reg.channel_mut().clear();

    assert!(reg.remove("ghost").is_none());
    assert_eq!(reg.nodes().len(), 1);
    assert_eq!(
        reg.channel().commands(),
        &[RenderCommand::RemoveCell {
            id: "ghost".to_string()
        }]
    );
}

#[test]
fn clean_keeps_the_background() {
    let mut reg = registry();
    reg.draw_background(Node::background("bg", 0.0, 0.0, 800.0, 600.0, "floor.png"));
    reg.draw_node(Node::new("n1", 0.0, 0.0, 10.0, 10.0, "rect"));
    reg.draw_text(Node::text("t1", "n1", "hello"));
    reg.draw_edge(Edge::new("e1", "n1", "n1"));
    reg.channel_mut().clear();

    reg.clean();
    assert!(reg.nodes().is_empty() && reg.texts().is_empty() && reg.edges().is_empty());
    assert_eq!(reg.background().map(|b| b.id()), Some("bg"));
    assert_eq!(reg.channel().names(), vec!["cleanGraph"]);
}

#[test]
fn remove_background_resets_the_slot() {
    let mut reg = registry();
    reg.draw_background(Node::background("bg", 5.0, 5.0, 800.0, 600.0, "floor.png"));
    reg.remove_background();

    assert!(reg.background().is_none());
    assert_eq!(reg.channel().names(), vec!["drawBackground", "removeBackground"]);
    assert_eq!(reg.snapshot()["background"], Value::Null);
}

#[test]
fn redrawing_the_same_background_keeps_the_stored_one() {
    let mut reg = registry();
    assert!(reg.draw_background(Node::background("bg", 0.0, 0.0, 10.0, 10.0, "a.png")));
    assert!(!reg.draw_background(Node::background("bg", 0.0, 0.0, 10.0, 10.0, "b.png")));
    assert!(reg.draw_background(Node::background("bg2", 0.0, 0.0, 10.0, 10.0, "c.png")));
    assert_eq!(reg.background().map(|b| b.img_url.as_str()), Some("c.png"));
}

#[test]
fn refresh_redraws_in_layer_order() {
    let mut reg = registry();
    reg.draw_edge(Edge::new("e1", "n1", "n2"));
    reg.draw_text(Node::text("t1", "n1", "Router"));
    reg.draw_node(Node::new("n1", 100.0, 100.0, 80.0, 60.0, "rect"));
    reg.draw_node(Node::new("n2", 300.0, 100.0, 80.0, 60.0, "rect"));
    reg.draw_background(Node::background("bg", 0.0, 0.0, 800.0, 600.0, "floor.png"));
    reg.channel_mut().clear();

    reg.refresh();
    assert_eq!(
        reg.channel().names(),
        vec![
            "cleanGraph",
            "drawBackground",
            "drawNode",
            "drawNode",
            "drawText",
            "drawEdge"
        ]
    );
    let ids: Vec<&str> = reg.nodes().iter().map(|n| n.id()).collect();
    assert_eq!(ids, vec!["n1", "n2"]);
}

#[test]
fn refresh_derives_text_geometry_from_parent() {
    let mut reg = registry();
    reg.draw_node(Node::new("n1", 100.0, 100.0, 80.0, 60.0, "rect"));
    reg.draw_text(Node::text("t1", "n1", "Router"));
    reg.refresh();

    let text = reg.text("t1").map(|t| *t.geometry()).unwrap_or_default();
    // 6 chars * 12px * 0.6, one line * 12px * 1.2
    assert!(approx(text.width(), 43.2));
    assert!(approx(text.height(), 14.4));
    assert!(approx(text.x(), 100.0 + (80.0 - 43.2) / 2.0));
    assert!(approx(text.y(), 170.0));

    let payload = reg
        .channel()
        .commands()
        .iter()
        .rev()
        .find(|c| c.name() == "drawText")
        .and_then(|c| c.payload().cloned())
        .unwrap_or(Value::Null);
    assert_eq!(payload["geometry"]["coordinates"]["y"], json!(170.0));
}

#[test]
fn refresh_keeps_position_of_orphan_text() {
    let mut reg = registry();
    let mut text = Node::text("t1", "missing", "ab");
    text.geometry_mut().set_position(7.0, 9.0);
    reg.draw_text(text);
    reg.refresh();

    let g = reg.text("t1").map(|t| *t.geometry()).unwrap_or_default();
    assert_eq!((g.x(), g.y()), (7.0, 9.0));
    assert!(approx(g.width(), 2.0 * 12.0 * 0.6));
}

#[test]
fn refresh_honours_configured_text_placement() {
    let config = MirrorConfig::with_overrides(&json!({
        "text": { "position": "top", "margin": 4 }
    }));
    let mut reg = GraphRegistry::with_config(RecordingChannel::new(), config);
    reg.draw_node(Node::new("n1", 0.0, 100.0, 50.0, 50.0, "rect"));
    reg.draw_text(Node::text("t1", "n1", "x"));
    reg.refresh();

    let g = reg.text("t1").map(|t| *t.geometry()).unwrap_or_default();
    assert!(approx(g.y(), 100.0 - 14.4 - 4.0));
}

#[test]
fn node_style_edit_merges_locally_and_dispatches() {
    let mut reg = registry();
    reg.draw_node(Node::new("n1", 0.0, 0.0, 10.0, 10.0, "rect"));
    reg.set_node_style("n1", "fillColor", "#ff0000").unwrap();
    reg.set_node_style("n1", "dashed", "3").unwrap();

    let node = reg.node("n1").cloned().unwrap_or_else(|| Node::new("", 0.0, 0.0, 0.0, 0.0, ""));
    assert_eq!(node.node_styles.fill_color, "#ff0000");
    assert_eq!(node.node_styles.dash, "5");
    assert_eq!(node.node_styles.stroke_color, "black");
    assert_eq!(
        reg.channel().commands().last(),
        Some(&RenderCommand::SetNodeStyle {
            id: "n1".to_string(),
            style: "dashed".to_string(),
            value: "3".to_string()
        })
    );
}

#[test]
fn malformed_style_value_is_rejected_before_dispatch() {
    let mut reg = registry();
    reg.draw_edge(Edge::new("e1", "a", "b"));
    reg.channel_mut().clear();

    let err = reg.set_edge_style("e1", "strokeWidth", "wide").unwrap_err();
    assert!(matches!(err, Error::InvalidStyleValue { .. }));
    assert!(reg.channel().commands().is_empty());
    assert_eq!(reg.edge("e1").map(|e| e.edge_styles.stroke_width), Some(1.0));
}

#[test]
fn edge_label_style_targets_one_label() {
    let mut reg = registry();
    reg.draw_edge(Edge::with_labels(
        "e1",
        "a",
        "b",
        vec![EdgeLabel::new("near", 0.2), EdgeLabel::new("far", 0.8)],
    ));
    reg.set_edge_label_style("e1", "fontSize", "20", 1).unwrap();
    reg.set_edge_label_style("e1", "fontSize", "30", 5).unwrap();

    let edge = reg.edge("e1").cloned().unwrap_or_else(|| Edge::new("", "", ""));
    assert_eq!(edge.labels()[0].styles.font_size, 14.0);
    assert_eq!(edge.labels()[1].styles.font_size, 20.0);
    assert_eq!(
        reg.channel().commands().last().map(RenderCommand::args),
        Some(vec![json!("e1"), json!("fontSize"), json!("30"), json!(5)])
    );
}

#[test]
fn parent_and_label_changes_update_local_cells() {
    let mut reg = registry();
    reg.draw_node(Node::new("p", 0.0, 0.0, 10.0, 10.0, "rect"));
    reg.draw_node(Node::new("c", 0.0, 0.0, 10.0, 10.0, "rect"));
    reg.draw_text(Node::text("t", "c", "old"));

    reg.set_parent("p", "c");
    reg.change_node_label("t", "new");
    reg.set_parent("p", "ghost");

    assert_eq!(reg.node("c").and_then(|n| n.parent_id.as_deref()), Some("p"));
    assert_eq!(reg.text("t").map(|t| t.label.as_str()), Some("new"));
    assert_eq!(
        reg.channel().commands()[3].args(),
        vec![json!("p"), json!("c")]
    );
}

#[test]
fn surface_only_commands_leave_collections_alone() {
    let mut reg = registry();
    reg.draw_node(Node::new("n1", 0.0, 0.0, 10.0, 10.0, "rect"));
    let before = reg.snapshot();
    reg.select_cell("n1");
    reg.unselect_cell("n1");
    reg.hide_node("n1");
    reg.show_node("n1");
    reg.center_graph("n1");
    reg.refresh_graph();
    assert_eq!(reg.snapshot(), before);
    assert_eq!(
        reg.channel().names()[1..],
        [
            "selectCell",
            "unselectCell",
            "hideNode",
            "showNode",
            "centerGraph",
            "refreshGraph"
        ]
    );
}

#[test]
fn snapshot_lists_every_collection() {
    let mut reg = registry();
    reg.draw_node(Node::new("n1", 0.0, 0.0, 10.0, 10.0, "rect"));
    reg.draw_edge(Edge::with_label("e1", "n1", "n1", "self"));
    let snap = reg.snapshot();
    assert_eq!(snap["nodes"][0]["id"], "n1");
    assert_eq!(snap["texts"], json!([]));
    assert_eq!(snap["edges"][0]["edgeLabels"][0]["label"], "self");
    assert_eq!(
        snap.as_object().map(|o| o.keys().cloned().collect::<Vec<_>>()),
        Some(vec![
            "background".to_string(),
            "nodes".to_string(),
            "texts".to_string(),
            "edges".to_string()
        ])
    );
}
