//! Roadmap documents in the node/edge JSON shape used by canvas front ends.
//!
//! ```json
//! {
//!   "nodes": [{ "id": "n1", "position": { "x": 0, "y": 0 },
//!               "data": { "label": "Basics", "isBranch": false } }],
//!   "edges": [{ "id": "e1", "source": "n1", "target": "n2",
//!               "data": { "lineStyle": "dashed", "hasArrow": true } }]
//! }
//! ```
//!
//! Only the fields the layout engine owns are typed. Everything else (labels,
//! descriptions, statuses, colours, arbitrary top-level keys) is carried
//! through untouched in flattened maps.
//!
//! Documents produced by text generators often arrive wrapped in a markdown
//! code fence; [`strip_code_fence`] unwraps them before parsing.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use trellis_core::{
    element::{Handle, LayoutEdge, LayoutNode, LineStyle, NodeRole},
    geometry::Point,
    identifier::Id,
};

use crate::layout::Layout;

/// Label given to nodes that arrive without one.
pub const UNTITLED_LABEL: &str = "Untitled";

/// Status given to the first node when it has none.
pub const ROOT_STATUS: &str = "none";

/// Status given to every other node that has none.
pub const TOPIC_STATUS: &str = "todo";

/// Returns the JSON body of `text`, without a surrounding markdown fence.
///
/// Both the bare form and the `json`-tagged form are accepted; text without
/// a fence is only trimmed.
///
/// # Examples
///
/// ```
/// # use trellis::document::strip_code_fence;
/// assert_eq!(strip_code_fence("```json\n{\"nodes\": []}\n```\n"), "{\"nodes\": []}");
/// assert_eq!(strip_code_fence("  {}  "), "{}");
/// ```
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Id of every entry: its own, or `<prefix>-<index>` when it has none.
///
/// A generated id that is already taken gets a `-<n>` suffix until it is
/// unique among all ids of the list.
fn resolve_ids<'a>(prefix: &str, ids: impl Iterator<Item = Option<&'a str>> + Clone) -> Vec<Id> {
    let mut taken: HashSet<String> = ids.clone().flatten().map(str::to_string).collect();

    ids.enumerate()
        .map(|(i, id)| {
            if let Some(id) = id {
                return Id::new(id);
            }
            let base = Id::generated(prefix, i).to_string();
            let mut candidate = base.clone();
            let mut suffix = 1;
            while taken.contains(&candidate) {
                candidate = format!("{base}-{suffix}");
                suffix += 1;
            }
            let id = Id::new(&candidate);
            taken.insert(candidate);
            id
        })
        .collect()
}

/// A complete roadmap document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoadmapDocument {
    #[serde(default)]
    pub nodes: Vec<DocumentNode>,

    #[serde(default)]
    pub edges: Vec<DocumentEdge>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A node entry of a [`RoadmapDocument`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub position: Point,

    #[serde(default)]
    pub data: NodeData,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `data` object of a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_branch: Option<bool>,

    /// Older documents mark ribs with `isSubNode` instead of `isBranch`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_sub_node: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An edge entry of a [`RoadmapDocument`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<Handle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<Handle>,

    #[serde(default)]
    pub data: EdgeData,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `data` object of an edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_style: Option<LineStyle>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_arrow: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NodeData {
    /// Role of the node: `isBranch`, falling back to `isSubNode`, else spine.
    pub fn role(&self) -> NodeRole {
        NodeRole::from_branch_flag(self.is_branch.or(self.is_sub_node).unwrap_or(false))
    }
}

impl RoadmapDocument {
    /// Parses a document from JSON text.
    pub fn from_json(source: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Serializes the document as indented JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Fills in the fields a content source may omit.
    ///
    /// Missing node ids become `node-<index>`, missing edge ids
    /// `edge-<index>`, suffixed when that id is already taken. Missing labels
    /// become [`UNTITLED_LABEL`]. A missing status becomes [`ROOT_STATUS`] on
    /// the first node and [`TOPIC_STATUS`] on the others. Edges default to a
    /// dashed line with an arrow.
    pub fn sanitize(&mut self) {
        let node_ids = self.node_ids();
        for (i, (node, id)) in self.nodes.iter_mut().zip(node_ids).enumerate() {
            node.id.get_or_insert_with(|| id.to_string());
            node.data
                .label
                .get_or_insert_with(|| UNTITLED_LABEL.to_string());
            node.data.extra.entry("status").or_insert_with(|| {
                let status = if i == 0 { ROOT_STATUS } else { TOPIC_STATUS };
                Value::from(status)
            });
        }

        let edge_ids = self.edge_ids();
        for (edge, id) in self.edges.iter_mut().zip(edge_ids) {
            edge.id.get_or_insert_with(|| id.to_string());
            edge.data.line_style.get_or_insert_with(LineStyle::default);
            edge.data.has_arrow.get_or_insert(true);
        }
    }

    /// Converts the document into layout engine input.
    ///
    /// Entries without an id get the same generated id [`Self::sanitize`]
    /// would assign.
    pub fn to_layout_input(&self) -> (Vec<LayoutNode>, Vec<LayoutEdge>) {
        let nodes = self
            .nodes
            .iter()
            .zip(self.node_ids())
            .map(|(node, id)| LayoutNode::new(id, node.data.role()))
            .collect();

        let edges = self
            .edges
            .iter()
            .zip(self.edge_ids())
            .map(|(edge, id)| {
                LayoutEdge::new(id, edge.source.as_str(), edge.target.as_str())
                    .with_line_style(edge.data.line_style.unwrap_or_default())
                    .with_arrow(edge.data.has_arrow.unwrap_or(true))
            })
            .collect();

        (nodes, edges)
    }

    /// Writes positions, handles, line styles and arrow flags back.
    ///
    /// `layout` must come from [`Self::to_layout_input`] of this document:
    /// entries are matched by position and skipped when the ids disagree.
    pub fn apply_layout(&mut self, layout: &Layout) {
        let node_ids = self.node_ids();
        for ((node, id), laid_out) in self.nodes.iter_mut().zip(node_ids).zip(layout.nodes()) {
            if id != laid_out.id() {
                continue;
            }
            node.position = laid_out.position();
        }

        let edge_ids = self.edge_ids();
        for ((edge, id), routed) in self.edges.iter_mut().zip(edge_ids).zip(layout.edges()) {
            if id != routed.id() {
                continue;
            }
            if routed.source_handle().is_some() {
                edge.source_handle = routed.source_handle();
                edge.target_handle = routed.target_handle();
            }
            edge.data.line_style = Some(routed.line_style());
            edge.data.has_arrow = Some(routed.has_arrow());
        }
    }

    fn node_ids(&self) -> Vec<Id> {
        resolve_ids("node", self.nodes.iter().map(|node| node.id.as_deref()))
    }

    fn edge_ids(&self) -> Vec<Id> {
        resolve_ids("edge", self.edges.iter().map(|edge| edge.id.as_deref()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SAMPLE: &str = r#"{
        "title": "Rust",
        "nodes": [
            { "id": "basics", "position": { "x": 10, "y": 20 },
              "data": { "label": "Basics", "description": "Start here" } },
            { "data": { "isSubNode": true, "status": "done" } }
        ],
        "edges": [
            { "source": "basics", "target": "node-1", "animated": true,
              "data": { "lineStyle": "solid" } }
        ]
    }"#;

    #[test]
    fn test_parse_keeps_unknown_fields() {
        let doc = RoadmapDocument::from_json(SAMPLE).unwrap();

        assert_eq!(doc.extra.get("title"), Some(&json!("Rust")));
        assert_eq!(doc.nodes[0].data.extra.get("description"), Some(&json!("Start here")));
        assert_eq!(doc.nodes[1].data.extra.get("status"), Some(&json!("done")));
        assert_eq!(doc.edges[0].extra.get("animated"), Some(&json!(true)));
        assert_eq!(doc.nodes[0].position, Point::new(10.0, 20.0));
    }

    #[test]
    fn test_role_flags() {
        let doc = RoadmapDocument::from_json(SAMPLE).unwrap();
        assert_eq!(doc.nodes[0].data.role(), NodeRole::Spine);
        assert_eq!(doc.nodes[1].data.role(), NodeRole::Rib);

        let data = NodeData {
            is_branch: Some(false),
            is_sub_node: Some(true),
            ..Default::default()
        };
        assert_eq!(data.role(), NodeRole::Spine);
    }

    #[test]
    fn test_sanitize_fills_defaults() {
        let mut doc = RoadmapDocument::from_json(SAMPLE).unwrap();
        doc.sanitize();

        assert_eq!(doc.nodes[1].id.as_deref(), Some("node-1"));
        assert_eq!(doc.nodes[1].data.label.as_deref(), Some(UNTITLED_LABEL));
        assert_eq!(doc.nodes[0].data.label.as_deref(), Some("Basics"));
        assert_eq!(doc.edges[0].id.as_deref(), Some("edge-0"));
        assert_eq!(doc.edges[0].data.line_style, Some(LineStyle::Solid));
        assert_eq!(doc.edges[0].data.has_arrow, Some(true));

        assert_eq!(doc.nodes[0].data.extra.get("status"), Some(&json!(ROOT_STATUS)));
        assert_eq!(doc.nodes[1].data.extra.get("status"), Some(&json!("done")));
    }

    #[test]
    fn test_sanitize_status_defaults() {
        let mut doc = RoadmapDocument::from_json(
            r#"{ "nodes": [{ "id": "a" }, { "id": "b" }, { "id": "c", "data": { "status": "done" } }] }"#,
        )
        .unwrap();
        doc.sanitize();

        let statuses: Vec<_> = doc
            .nodes
            .iter()
            .map(|node| node.data.extra["status"].clone())
            .collect();
        assert_eq!(statuses, vec![json!("none"), json!("todo"), json!("done")]);
    }

    #[test]
    fn test_generated_ids_skip_taken_ones() {
        let mut doc = RoadmapDocument::from_json(
            r#"{
                "nodes": [{ "data": { "label": "A" } }, { "id": "node-0" }, { "id": "node-0-1" }],
                "edges": [{ "source": "node-0", "target": "node-0-2" }, { "id": "edge-0", "source": "a", "target": "b" }]
            }"#,
        )
        .unwrap();

        let (nodes, edges) = doc.to_layout_input();
        assert_eq!(nodes[0].id(), "node-0-2");
        assert_eq!(edges[0].id(), "edge-0-1");

        doc.sanitize();
        assert_eq!(doc.nodes[0].id.as_deref(), Some("node-0-2"));
        assert_eq!(doc.nodes[1].id.as_deref(), Some("node-0"));
        assert_eq!(doc.edges[0].id.as_deref(), Some("edge-0-1"));
    }

    #[test]
    fn test_strip_code_fence() {
        let body = r#"{"nodes": []}"#;
        assert_eq!(strip_code_fence(body), body);
        assert_eq!(strip_code_fence(&format!("```json\n{body}\n```")), body);
        assert_eq!(strip_code_fence(&format!("\n```\n{body}\n```\n")), body);
        assert_eq!(strip_code_fence(&format!("```json {body}```")), body);

        let doc = RoadmapDocument::from_json(strip_code_fence("```json\n{\"nodes\": [{}]}\n```")).unwrap();
        assert_eq!(doc.nodes.len(), 1);
    }

    #[test]
    fn test_layout_input_uses_generated_ids() {
        let doc = RoadmapDocument::from_json(SAMPLE).unwrap();
        let (nodes, edges) = doc.to_layout_input();

        assert_eq!(nodes[1].id(), "node-1");
        assert_eq!(nodes[1].role(), NodeRole::Rib);
        assert_eq!(edges[0].id(), "edge-0");
        assert_eq!(edges[0].target(), "node-1");
        assert_eq!(edges[0].line_style(), LineStyle::Solid);
        assert!(edges[0].has_arrow());
    }

    #[test]
    fn test_serialize_uses_canvas_names() {
        let mut doc = RoadmapDocument::default();
        doc.edges.push(DocumentEdge {
            id: Some("e".to_string()),
            source: "a".to_string(),
            target: "b".to_string(),
            source_handle: Some(Handle::Bottom),
            target_handle: Some(Handle::Top),
            data: EdgeData {
                line_style: Some(LineStyle::Dashed),
                has_arrow: Some(true),
                ..Default::default()
            },
            ..Default::default()
        });

        let value: Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        let edge = &value["edges"][0];
        assert_eq!(edge["sourceHandle"], json!("bottom"));
        assert_eq!(edge["targetHandle"], json!("top"));
        assert_eq!(edge["data"]["lineStyle"], json!("dashed"));
        assert_eq!(edge["data"]["hasArrow"], json!(true));
    }
}
