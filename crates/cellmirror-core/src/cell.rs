//! Drawable entities: nodes (plain, background, text) and edges (labeled, basic).
//!
//! Shared fields live in [`CellCommon`]; variant-specific data lives on [`Node`] or [`Edge`].
//! Constructors always populate the style objects, so serialization never sees a missing
//! style record.

use crate::geom::{Geometry, Vertex};
use crate::reconcile::{StyleMap, StyleRecord};
use crate::style::{EdgeLabelStyles, EdgeStyles, NodeLabelStyles, NodeStyles};
use crate::Result;

pub const SHAPE_IMAGE: &str = "image";
pub const SHAPE_RECT: &str = "rect";

/// Distance used when an edge is created with a single label.
pub const DEFAULT_LABEL_DISTANCE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    Node,
    Edge,
}

impl CellType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Edge => "edge",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "node" => Some(Self::Node),
            "edge" => Some(Self::Edge),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellCommon {
    id: String,
    pub geometry: Geometry,
    /// Overlay/export form of the typed styles.
    pub styles: StyleMap,
}

impl CellCommon {
    pub fn new(id: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: id.into(),
            geometry,
            styles: StyleMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_style(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.styles.insert(key.into(), value.into());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeKind {
    #[default]
    Plain,
    Background,
    /// Geometry is derived from the parent node and the label metrics.
    Text,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    common: CellCommon,
    kind: NodeKind,
    pub shape: String,
    pub img_url: String,
    pub movable: bool,
    /// Containing node, lookup-only.
    pub parent_id: Option<String>,
    pub label: String,
    pub node_styles: NodeStyles,
    pub label_styles: NodeLabelStyles,
    pub tools: Vec<String>,
    pub port: bool,
}

impl Node {
    fn with_kind(kind: NodeKind, id: impl Into<String>, geometry: Geometry, shape: &str) -> Self {
        Self {
            common: CellCommon::new(id, geometry),
            kind,
            shape: shape.to_string(),
            img_url: String::new(),
            movable: true,
            parent_id: None,
            label: String::new(),
            node_styles: NodeStyles::default(),
            label_styles: NodeLabelStyles::default(),
            tools: Vec::new(),
            port: false,
        }
    }

    pub fn new(
        id: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        shape: impl AsRef<str>,
    ) -> Self {
        Self::with_kind(
            NodeKind::Plain,
            id,
            Geometry::new(x, y, width, height),
            shape.as_ref(),
        )
    }

    pub fn background(
        id: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        img_url: impl Into<String>,
    ) -> Self {
        let mut node = Self::with_kind(
            NodeKind::Background,
            id,
            Geometry::new(x, y, width, height),
            SHAPE_IMAGE,
        );
        node.img_url = img_url.into();
        node
    }

    /// The empty background slot: blank id, zero geometry, no image.
    pub fn background_placeholder(shape: &str) -> Self {
        Self::with_kind(NodeKind::Background, "", Geometry::zero(), shape)
    }

    /// A text label attached to `parent_id`. Its geometry is computed on refresh.
    pub fn text(
        id: impl Into<String>,
        parent_id: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        let mut node = Self::with_kind(NodeKind::Text, id, Geometry::zero(), SHAPE_RECT);
        node.parent_id = Some(parent_id.into());
        node.label = label.into();
        node
    }

    /// Rebuilds a node of `kind` with an explicit id; used by the wire decoder.
    pub(crate) fn from_parts(kind: NodeKind, id: String, geometry: Geometry, shape: &str) -> Self {
        Self::with_kind(kind, id, geometry, shape)
    }

    pub fn id(&self) -> &str {
        self.common.id()
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn cell_type(&self) -> CellType {
        CellType::Node
    }

    pub fn common(&self) -> &CellCommon {
        &self.common
    }

    pub fn geometry(&self) -> &Geometry {
        &self.common.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.common.geometry
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.common.geometry = geometry;
    }

    pub fn styles(&self) -> &StyleMap {
        &self.common.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleMap {
        &mut self.common.styles
    }

    /// `true` for the empty background slot (blank id).
    pub fn is_placeholder(&self) -> bool {
        self.id().trim().is_empty()
    }

    pub fn add_tool(&mut self, tool: impl Into<String>) {
        self.tools.push(tool.into());
    }

    /// Normalizes the typed styles and writes them into the overlay map.
    pub fn sync_styles_to_map(&mut self) {
        self.node_styles = self.node_styles.normalized();
        self.label_styles = self.label_styles.normalized();
        let exported = self.exported_styles();
        self.common.styles.extend(exported);
    }

    /// Replaces the typed styles with the ones read from `map`.
    pub fn apply_style_map(&mut self, map: &StyleMap) -> Result<()> {
        let node_styles = NodeStyles::from_style_map(map)?;
        let label_styles = NodeLabelStyles::from_style_map(map)?;
        self.node_styles = node_styles;
        self.label_styles = label_styles;
        self.common
            .styles
            .extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    /// Applies one external style edit on top of the current styles.
    pub fn merge_style(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = self.exported_styles();
        map.insert(key.to_string(), value.to_string());
        self.apply_style_map(&map)
    }

    fn exported_styles(&self) -> StyleMap {
        let mut map = self.node_styles.to_style_map();
        map.extend(self.label_styles.to_style_map());
        map
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabel {
    pub label: String,
    /// Position along the path, 0 = source end, 1 = target end.
    pub distance: f64,
    pub styles: EdgeLabelStyles,
    pub overlay: StyleMap,
}

impl EdgeLabel {
    pub fn new(label: impl Into<String>, distance: f64) -> Self {
        Self {
            label: label.into(),
            distance,
            styles: EdgeLabelStyles::default(),
            overlay: StyleMap::new(),
        }
    }

    pub fn sync_styles_to_map(&mut self) {
        self.styles = self.styles.normalized();
        self.overlay.extend(self.styles.to_style_map());
    }

    pub fn apply_style_map(&mut self, map: &StyleMap) -> Result<()> {
        self.styles = EdgeLabelStyles::from_style_map(map)?;
        self.overlay
            .extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    pub fn merge_style(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = self.styles.to_style_map();
        map.insert(key.to_string(), value.to_string());
        self.apply_style_map(&map)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeKind {
    #[default]
    Labeled,
    /// No label sequence; `add_label` is ignored.
    Basic,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    common: CellCommon,
    kind: EdgeKind,
    /// Must name a live node; not checked here.
    pub source: String,
    /// Must name a live node; not checked here.
    pub target: String,
    vertices: Vec<Vertex>,
    labels: Vec<EdgeLabel>,
    pub edge_styles: EdgeStyles,
}

impl Edge {
    fn with_kind(
        kind: EdgeKind,
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            common: CellCommon::new(id, Geometry::zero()),
            kind,
            source: source.into(),
            target: target.into(),
            vertices: Vec::new(),
            labels: Vec::new(),
            edge_styles: EdgeStyles::default(),
        }
    }

    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::with_kind(EdgeKind::Labeled, id, source, target)
    }

    /// An edge with one label at [`DEFAULT_LABEL_DISTANCE`].
    pub fn with_label(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        let mut edge = Self::new(id, source, target);
        edge.labels.push(EdgeLabel::new(label, DEFAULT_LABEL_DISTANCE));
        edge
    }

    pub fn with_labels(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        labels: Vec<EdgeLabel>,
    ) -> Self {
        let mut edge = Self::new(id, source, target);
        edge.labels = labels;
        edge
    }

    pub fn basic(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::with_kind(EdgeKind::Basic, id, source, target)
    }

    pub fn id(&self) -> &str {
        self.common.id()
    }

    pub fn kind(&self) -> EdgeKind {
        self.kind
    }

    pub fn cell_type(&self) -> CellType {
        CellType::Edge
    }

    pub fn common(&self) -> &CellCommon {
        &self.common
    }

    pub fn geometry(&self) -> &Geometry {
        &self.common.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.common.geometry
    }

    pub fn styles(&self) -> &StyleMap {
        &self.common.styles
    }

    pub fn styles_mut(&mut self) -> &mut StyleMap {
        &mut self.common.styles
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn add_vertex(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub fn set_vertices(&mut self, vertices: Vec<Vertex>) {
        self.vertices = vertices;
    }

    pub fn labels(&self) -> &[EdgeLabel] {
        &self.labels
    }

    pub fn add_label(&mut self, label: impl Into<String>, distance: f64) {
        if self.kind == EdgeKind::Basic {
            tracing::debug!(id = %self.id(), "ignoring label on basic edge");
            return;
        }
        self.labels.push(EdgeLabel::new(label, distance));
    }

    pub fn label_at(&self, pos: usize) -> Option<&EdgeLabel> {
        self.labels.get(pos)
    }

    pub fn label_at_mut(&mut self, pos: usize) -> Option<&mut EdgeLabel> {
        self.labels.get_mut(pos)
    }

    pub fn sync_styles_to_map(&mut self) {
        self.edge_styles = self.edge_styles.normalized();
        self.common.styles.extend(self.edge_styles.to_style_map());
    }

    pub fn apply_style_map(&mut self, map: &StyleMap) -> Result<()> {
        self.edge_styles = EdgeStyles::from_style_map(map)?;
        self.common
            .styles
            .extend(map.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }

    pub fn merge_style(&mut self, key: &str, value: &str) -> Result<()> {
        let mut map = self.edge_styles.to_style_map();
        map.insert(key.to_string(), value.to_string());
        self.apply_style_map(&map)
    }

    /// Exports the styles of the label at `pos`; `false` when there is no such label.
    pub fn sync_label_styles_to_map(&mut self, pos: usize) -> bool {
        match self.labels.get_mut(pos) {
            Some(label) => {
                label.sync_styles_to_map();
                true
            }
            None => false,
        }
    }

    /// Applies one style edit to the label at `pos`; `Ok(false)` when there is no such label.
    pub fn merge_label_style(&mut self, pos: usize, key: &str, value: &str) -> Result<bool> {
        match self.labels.get_mut(pos) {
            Some(label) => label.merge_style(key, value).map(|()| true),
            None => Ok(false),
        }
    }
}

/// Any drawable entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Node(Node),
    Edge(Edge),
}

impl Cell {
    pub fn id(&self) -> &str {
        match self {
            Self::Node(n) => n.id(),
            Self::Edge(e) => e.id(),
        }
    }

    pub fn cell_type(&self) -> CellType {
        match self {
            Self::Node(_) => CellType::Node,
            Self::Edge(_) => CellType::Edge,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        match self {
            Self::Node(n) => n.geometry(),
            Self::Edge(e) => e.geometry(),
        }
    }

    pub fn styles(&self) -> &StyleMap {
        match self {
            Self::Node(n) => n.styles(),
            Self::Edge(e) => e.styles(),
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(n) => Some(n),
            Self::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&Edge> {
        match self {
            Self::Edge(e) => Some(e),
            Self::Node(_) => None,
        }
    }
}

impl From<Node> for Cell {
    fn from(value: Node) -> Self {
        Self::Node(value)
    }
}

impl From<Edge> for Cell {
    fn from(value: Edge) -> Self {
        Self::Edge(value)
    }
}
