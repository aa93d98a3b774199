//! Integration tests for the layout entry points
//!
//! These tests exercise the public API the way a caller would.

use trellis::{
    Diagnostic, LayoutBuilder, LayoutError,
    config::{AppConfig, CollisionConfig, LayoutConfig, SpineEngine},
    document::RoadmapDocument,
    element::{Handle, LayoutEdge, LayoutNode, LineStyle},
    geometry::{Point, Size},
    identifier::Id,
};

fn chain(ids: &[&str]) -> (Vec<LayoutNode>, Vec<LayoutEdge>) {
    let nodes = ids.iter().map(|id| LayoutNode::spine(*id)).collect();
    let edges = ids
        .windows(2)
        .map(|pair| LayoutEdge::new(&format!("{}-{}", pair[0], pair[1]), pair[0], pair[1]))
        .collect();
    (nodes, edges)
}

#[test]
fn test_builder_api_exists() {
    let builder = LayoutBuilder::default();
    assert_eq!(builder.config().layout().spine_engine(), SpineEngine::Layered);
}

#[test]
fn test_layout_default_config() {
    let (nodes, edges) = chain(&["a", "b", "c"]);
    let layout = trellis::layout(nodes, edges).expect("Failed to lay out chain");

    assert_eq!(layout.nodes().len(), 3);
    assert_eq!(layout.node("a").unwrap().position(), Point::new(0.0, 0.0));
    assert_eq!(layout.node("b").unwrap().position(), Point::new(0.0, 300.0));
    assert_eq!(layout.node("c").unwrap().position(), Point::new(0.0, 600.0));
    assert!(layout.diagnostics().is_empty());
}

#[test]
fn test_builder_with_custom_config() {
    let layout_config = LayoutConfig::default()
        .with_node_size(Size::new(200.0, 100.0))
        .with_spine_spacing(40.0, 100.0)
        .with_rib_spacing(100.0, 20.0);
    let builder = LayoutBuilder::new(AppConfig::new(layout_config, CollisionConfig::default()));

    let nodes = vec![
        LayoutNode::spine("root"),
        LayoutNode::spine("next"),
        LayoutNode::rib("r"),
    ];
    let edges = vec![
        LayoutEdge::new("e1", "root", "next"),
        LayoutEdge::new("e2", "root", "r"),
    ];
    let layout = builder.layout(nodes, edges).expect("Failed to lay out");

    assert_eq!(layout.node_size(), Size::new(200.0, 100.0));
    assert_eq!(layout.node("next").unwrap().position(), Point::new(0.0, 200.0));
    assert_eq!(layout.node("r").unwrap().position(), Point::new(300.0, 0.0));
}

#[test]
fn test_invalid_config_returns_error() {
    let layout_config = LayoutConfig::default().with_node_size(Size::new(-10.0, 150.0));
    let builder = LayoutBuilder::new(AppConfig::new(layout_config, CollisionConfig::default()));

    let result = builder.layout(vec![LayoutNode::spine("a")], vec![]);
    assert!(matches!(result, Err(LayoutError::Config(_))));
}

#[test]
fn test_duplicate_node_returns_error() {
    let result = trellis::layout(
        vec![LayoutNode::spine("a"), LayoutNode::rib("a")],
        vec![],
    );
    assert_eq!(
        result.unwrap_err(),
        LayoutError::DuplicateNode { id: Id::new("a") }
    );
}

#[test]
fn test_sugiyama_engine_chain() {
    let layout_config = LayoutConfig::default().with_spine_engine(SpineEngine::Sugiyama);
    let builder = LayoutBuilder::new(AppConfig::new(layout_config, CollisionConfig::default()));

    let (nodes, edges) = chain(&["a", "b", "c"]);
    let layout = builder.layout(nodes, edges).expect("Failed to lay out with sugiyama");

    let y = |id: &str| layout.node(id).unwrap().position().y();
    assert!(y("a") < y("b"));
    assert!(y("b") < y("c"));
    for edge in layout.edges() {
        assert_eq!(edge.source_handle(), Some(Handle::Bottom));
        assert_eq!(edge.target_handle(), Some(Handle::Top));
    }
}

#[test]
fn test_layout_document() {
    let mut document = RoadmapDocument::from_json(
        r##"{
            "nodes": [
                { "id": "root", "data": { "label": "Root", "color": "#ff0000" } },
                { "id": "leaf", "data": { "label": "Leaf", "isBranch": true } },
                { "id": "lost", "data": { "isSubNode": true } }
            ],
            "edges": [
                { "id": "e1", "source": "root", "target": "leaf" }
            ]
        }"##,
    )
    .expect("Failed to parse document");

    let diagnostics = LayoutBuilder::default()
        .layout_document(&mut document)
        .expect("Failed to lay out document");

    assert_eq!(
        diagnostics,
        vec![Diagnostic::OrphanRib {
            node: Id::new("lost")
        }]
    );
    assert_eq!(document.nodes[1].position, Point::new(450.0, 0.0));
    assert_eq!(document.nodes[2].position, Point::new(0.0, 0.0));
    assert_eq!(document.nodes[2].data.label.as_deref(), Some("Untitled"));
    assert_eq!(document.edges[0].source_handle, Some(Handle::Right));
    assert_eq!(document.edges[0].target_handle, Some(Handle::Left));
    assert_eq!(document.edges[0].data.line_style, Some(LineStyle::Dotted));

    let json = document.to_json_pretty().expect("Failed to serialize");
    assert!(json.contains("#ff0000"));
}

#[test]
fn test_layout_document_generated_id_does_not_clash() {
    let mut document =
        RoadmapDocument::from_json(r#"{"nodes":[{"data":{"label":"A"}},{"id":"node-0"}]}"#)
            .expect("Failed to parse document");

    LayoutBuilder::default()
        .layout_document(&mut document)
        .expect("Failed to lay out document");

    let first = document.nodes[0].id.as_deref().unwrap();
    let second = document.nodes[1].id.as_deref().unwrap();
    assert_ne!(first, second);
    assert_eq!(second, "node-0");
    assert_ne!(document.nodes[1].position, document.nodes[0].position);
}

#[test]
fn test_layout_document_error_leaves_positions() {
    let mut document = RoadmapDocument::from_json(
        r#"{
            "nodes": [
                { "id": "a", "position": { "x": 5, "y": 7 } },
                { "id": "b" }
            ],
            "edges": [
                { "source": "a", "target": "b" },
                { "source": "b", "target": "a" }
            ]
        }"#,
    )
    .expect("Failed to parse document");

    let result = LayoutBuilder::default().layout_document(&mut document);

    assert!(matches!(result, Err(LayoutError::CyclicSpine { .. })));
    assert_eq!(document.nodes[0].position, Point::new(5.0, 7.0));
}

#[test]
fn test_builder_reusability() {
    let builder = LayoutBuilder::default();

    let (nodes, edges) = chain(&["a", "b"]);
    let first = builder.layout(nodes, edges).expect("Failed first layout");
    let (nodes, edges) = chain(&["x", "y", "z"]);
    let second = builder.layout(nodes, edges).expect("Failed second layout");

    assert_eq!(first.nodes().len(), 2);
    assert_eq!(second.nodes().len(), 3);
}
