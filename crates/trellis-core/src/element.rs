//! Layout elements: nodes, edges and the attributes the engine assigns.
//!
//! A roadmap is a directed graph whose nodes are either part of the main
//! vertical sequence (the *spine*) or branches hanging off a spine node
//! (the *ribs*). The role is fixed when a [`LayoutNode`] is constructed and
//! never re-derived afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{geometry::Point, identifier::Id};

/// Classification of a node within the roadmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Member of the primary top-to-bottom sequence.
    Spine,
    /// Branch placed to the left or right of its spine parent.
    Rib,
}

impl NodeRole {
    /// Maps the content source's "is-branch" flag to a role.
    ///
    /// # Examples
    ///
    /// ```
    /// # use trellis_core::element::NodeRole;
    /// assert_eq!(NodeRole::from_branch_flag(true), NodeRole::Rib);
    /// assert_eq!(NodeRole::from_branch_flag(false), NodeRole::Spine);
    /// ```
    pub fn from_branch_flag(is_branch: bool) -> Self {
        if is_branch { Self::Rib } else { Self::Spine }
    }

    pub fn is_spine(self) -> bool {
        self == Self::Spine
    }

    pub fn is_rib(self) -> bool {
        self == Self::Rib
    }
}

/// A named attachment point on a node's boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Top,
    Bottom,
    Left,
    Right,
}

impl Handle {
    /// Returns the lowercase name used by rendering surfaces.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stroke pattern of an edge.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// Solid continuous line
    Solid,
    /// Dashed line; the roadmap default for edges without an explicit style
    #[default]
    Dashed,
    /// Dotted line
    Dotted,
}

impl LineStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A roadmap node as seen by the layout engine.
///
/// Only the identity, the role and the top-left position are tracked; every
/// other attribute (labels, status, colours) belongs to the caller. All nodes
/// share one box size, configured on the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    id: Id,
    role: NodeRole,
    position: Point,
}

impl LayoutNode {
    /// Creates a node at the origin.
    pub fn new(id: impl Into<Id>, role: NodeRole) -> Self {
        Self {
            id: id.into(),
            role,
            position: Point::default(),
        }
    }

    /// Shorthand for a [`NodeRole::Spine`] node.
    pub fn spine(id: impl Into<Id>) -> Self {
        Self::new(id, NodeRole::Spine)
    }

    /// Shorthand for a [`NodeRole::Rib`] node.
    pub fn rib(id: impl Into<Id>) -> Self {
        Self::new(id, NodeRole::Rib)
    }

    /// Sets the position (builder style).
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Top-left corner of the node.
    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Moves the node by `offset`.
    pub fn translate(&mut self, offset: Point) {
        self.position = self.position.add_point(offset);
    }
}

/// A directed edge between two nodes, annotated by the edge router.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdge {
    id: Id,
    source: Id,
    target: Id,
    source_handle: Option<Handle>,
    target_handle: Option<Handle>,
    line_style: LineStyle,
    has_arrow: bool,
}

impl LayoutEdge {
    /// Creates an edge with the default dashed style, an arrow and no handles.
    pub fn new(id: impl Into<Id>, source: impl Into<Id>, target: impl Into<Id>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            line_style: LineStyle::default(),
            has_arrow: true,
        }
    }

    /// Sets the line style (builder style).
    pub fn with_line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    /// Sets the arrow flag (builder style).
    pub fn with_arrow(mut self, has_arrow: bool) -> Self {
        self.has_arrow = has_arrow;
        self
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn source(&self) -> Id {
        self.source
    }

    pub fn target(&self) -> Id {
        self.target
    }

    pub fn source_handle(&self) -> Option<Handle> {
        self.source_handle
    }

    pub fn target_handle(&self) -> Option<Handle> {
        self.target_handle
    }

    pub fn line_style(&self) -> LineStyle {
        self.line_style
    }

    pub fn has_arrow(&self) -> bool {
        self.has_arrow
    }

    pub fn set_handles(&mut self, source: Handle, target: Handle) {
        self.source_handle = Some(source);
        self.target_handle = Some(target);
    }

    pub fn set_line_style(&mut self, line_style: LineStyle) {
        self.line_style = line_style;
    }

    pub fn set_arrow(&mut self, has_arrow: bool) {
        self.has_arrow = has_arrow;
    }
}
