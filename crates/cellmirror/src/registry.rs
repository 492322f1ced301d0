//! Stateful controller keeping the local collections in step with the rendering surface.
//!
//! Every operation dispatches first and mutates the local collections afterwards, without
//! waiting for any acknowledgement from the surface.

use cellmirror_core::text::{DeterministicTextMeasurer, LabelSide, label_dimensions, label_position};
use cellmirror_core::wire::{edge_to_json, node_to_json};
use cellmirror_core::{Cell, Edge, Geometry, MirrorConfig, Node, Result};
use serde_json::{Value, json};

use crate::channel::{RenderChannel, RenderCommand};

pub struct GraphRegistry<C: RenderChannel> {
    channel: C,
    config: MirrorConfig,
    measurer: DeterministicTextMeasurer,
    /// Placeholder (blank id) while no background is set.
    background: Node,
    nodes: Vec<Node>,
    texts: Vec<Node>,
    edges: Vec<Edge>,
}

impl<C: RenderChannel> GraphRegistry<C> {
    pub fn new(channel: C) -> Self {
        Self::with_config(channel, MirrorConfig::default())
    }

    pub fn with_config(channel: C, config: MirrorConfig) -> Self {
        let measurer =
            DeterministicTextMeasurer::new(config.char_width_factor(), config.line_height_factor());
        let background = Node::background_placeholder(config.background_shape());
        Self {
            channel,
            config,
            measurer,
            background,
            nodes: Vec::new(),
            texts: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn config(&self) -> &MirrorConfig {
        &self.config
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    fn send(&mut self, command: RenderCommand) {
        tracing::trace!(command = command.name(), "dispatch");
        self.channel.dispatch(command);
    }

    /// `true` when a node or a text already uses `id`; the two share one id space.
    fn node_like_registered(&self, id: &str) -> bool {
        self.node(id).is_some() || self.text(id).is_some()
    }

    /// Renders `node` and registers it unless a node or text with the same id is already known.
    ///
    /// Returns `true` when the node was added to the collection.
    pub fn draw_node(&mut self, node: Node) -> bool {
        self.send(RenderCommand::DrawNode(node_to_json(&node)));
        if self.node_like_registered(node.id()) {
            tracing::debug!(id = %node.id(), "id already registered; redraw only");
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Renders `node` without touching the collections.
    pub fn draw_node_unregistered(&mut self, node: &Node) {
        self.send(RenderCommand::DrawNode(node_to_json(node)));
    }

    pub fn draw_text(&mut self, text: Node) -> bool {
        self.send(RenderCommand::DrawText(node_to_json(&text)));
        if self.node_like_registered(text.id()) {
            tracing::debug!(id = %text.id(), "id already registered; redraw only");
            return false;
        }
        self.texts.push(text);
        true
    }

    pub fn draw_edge(&mut self, edge: Edge) -> bool {
        self.send(RenderCommand::DrawEdge(edge_to_json(&edge)));
        if self.edge(edge.id()).is_some() {
            tracing::debug!(id = %edge.id(), "edge already registered; redraw only");
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// Renders `background` and stores it in the background slot.
    ///
    /// A background with the id already held is redrawn but the stored one is kept.
    pub fn draw_background(&mut self, background: Node) -> bool {
        self.send(RenderCommand::DrawBackground(node_to_json(&background)));
        if !self.background.is_placeholder() && self.background.id() == background.id() {
            tracing::debug!(id = %background.id(), "background already set; redraw only");
            return false;
        }
        self.background = background;
        true
    }

    /// Removes the cell with `id` from the surface and from the first collection holding it
    /// (nodes, then texts, then edges).
    pub fn remove(&mut self, id: &str) -> Option<Cell> {
        self.send(RenderCommand::RemoveCell { id: id.to_string() });
        if let Some(pos) = self.nodes.iter().position(|n| n.id() == id) {
            return Some(Cell::Node(self.nodes.remove(pos)));
        }
        if let Some(pos) = self.texts.iter().position(|n| n.id() == id) {
            return Some(Cell::Node(self.texts.remove(pos)));
        }
        if let Some(pos) = self.edges.iter().position(|e| e.id() == id) {
            return Some(Cell::Edge(self.edges.remove(pos)));
        }
        tracing::debug!(id = %id, "remove: no registered cell");
        None
    }

    /// Removes the background from the surface and resets the slot to the placeholder.
    pub fn remove_background(&mut self) {
        self.send(RenderCommand::RemoveBackground);
        self.background = Node::background_placeholder(self.config.background_shape());
    }

    /// Forgets every node, text and edge, then clears the surface. The background slot is kept.
    pub fn clean(&mut self) {
        self.nodes.clear();
        self.texts.clear();
        self.edges.clear();
        self.send(RenderCommand::CleanGraph);
    }

    /// Clears the surface and redraws everything: background, nodes, texts, then edges.
    ///
    /// Text geometry is recomputed from the parent node and the label metrics.
    pub fn refresh(&mut self) {
        self.send(RenderCommand::CleanGraph);

        if !self.background.is_placeholder() {
            let payload = node_to_json(&self.background);
            self.send(RenderCommand::DrawBackground(payload));
        }

        let nodes = std::mem::take(&mut self.nodes);
        for node in &nodes {
            self.draw_node_unregistered(node);
        }
        self.nodes = nodes;

        for i in 0..self.texts.len() {
            let text = &self.texts[i];
            let parent = text
                .parent_id
                .as_deref()
                .and_then(|pid| self.node(pid))
                .map(|n| *n.geometry());
            let geometry = match parent {
                Some(parent) => self.text_geometry_for(&parent, &text.label),
                None => {
                    tracing::warn!(
                        id = %text.id(),
                        parent = text.parent_id.as_deref().unwrap_or(""),
                        "text parent is not a registered node; keeping its position"
                    );
                    let mut geometry =
                        label_dimensions(&self.measurer, &text.label, self.config.text_font_size());
                    geometry.set_position(text.geometry().x(), text.geometry().y());
                    geometry
                }
            };
            let text = &mut self.texts[i];
            text.set_geometry(geometry);
            let payload = node_to_json(text);
            self.send(RenderCommand::DrawText(payload));
        }

        let payloads: Vec<Value> = self.edges.iter().map(edge_to_json).collect();
        for payload in payloads {
            self.send(RenderCommand::DrawEdge(payload));
        }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id() == id)
    }

    pub fn text(&self, id: &str) -> Option<&Node> {
        self.texts.iter().find(|n| n.id() == id)
    }

    pub fn text_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.texts.iter_mut().find(|n| n.id() == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id() == id)
    }

    pub fn edge_mut(&mut self, id: &str) -> Option<&mut Edge> {
        self.edges.iter_mut().find(|e| e.id() == id)
    }

    /// `None` while the slot holds the placeholder.
    pub fn background(&self) -> Option<&Node> {
        (!self.background.is_placeholder()).then_some(&self.background)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn texts(&self) -> &[Node] {
        &self.texts
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    fn node_or_text_mut(&mut self, id: &str) -> Option<&mut Node> {
        if let Some(pos) = self.nodes.iter().position(|n| n.id() == id) {
            return self.nodes.get_mut(pos);
        }
        self.texts.iter_mut().find(|n| n.id() == id)
    }

    pub fn set_parent(&mut self, parent_id: &str, child_id: &str) {
        self.send(RenderCommand::SetParent {
            parent_id: parent_id.to_string(),
            child_id: child_id.to_string(),
        });
        match self.node_or_text_mut(child_id) {
            Some(child) => child.parent_id = Some(parent_id.to_string()),
            None => tracing::debug!(id = %child_id, "set_parent: child not registered"),
        }
    }

    /// Applies one style edit to a node or text, locally first, then on the surface.
    ///
    /// A value the local styles reject is not dispatched.
    pub fn set_node_style(&mut self, id: &str, style: &str, value: &str) -> Result<()> {
        if let Some(node) = self.node_or_text_mut(id) {
            node.merge_style(style, value)?;
        }
        self.send(RenderCommand::SetNodeStyle {
            id: id.to_string(),
            style: style.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    pub fn set_edge_style(&mut self, id: &str, style: &str, value: &str) -> Result<()> {
        if let Some(edge) = self.edge_mut(id) {
            edge.merge_style(style, value)?;
        }
        self.send(RenderCommand::SetEdgeStyle {
            id: id.to_string(),
            style: style.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    pub fn set_edge_label_style(
        &mut self,
        id: &str,
        style: &str,
        value: &str,
        label_pos: usize,
    ) -> Result<()> {
        if let Some(edge) = self.edge_mut(id) {
            if !edge.merge_label_style(label_pos, style, value)? {
                tracing::debug!(id = %id, label_pos, "edge has no label at position");
            }
        }
        self.send(RenderCommand::SetEdgeLabelStyle {
            id: id.to_string(),
            style: style.to_string(),
            value: value.to_string(),
            label_pos,
        });
        Ok(())
    }

    pub fn change_node_label(&mut self, node_id: &str, text: &str) {
        self.send(RenderCommand::ChangeNodeLabel {
            node_id: node_id.to_string(),
            text: text.to_string(),
        });
        if let Some(node) = self.node_or_text_mut(node_id) {
            node.label = text.to_string();
        }
    }

    pub fn select_cell(&mut self, id: &str) {
        self.send(RenderCommand::SelectCell { id: id.to_string() });
    }

    pub fn unselect_cell(&mut self, id: &str) {
        self.send(RenderCommand::UnselectCell { id: id.to_string() });
    }

    pub fn show_node(&mut self, id: &str) {
        self.send(RenderCommand::ShowNode { id: id.to_string() });
    }

    pub fn hide_node(&mut self, id: &str) {
        self.send(RenderCommand::HideNode { id: id.to_string() });
    }

    pub fn center_graph(&mut self, id: &str) {
        self.send(RenderCommand::CenterGraph { id: id.to_string() });
    }

    /// Asks the surface to re-layout itself. Collections are untouched.
    pub fn refresh_graph(&mut self) {
        self.send(RenderCommand::RefreshGraph);
    }

    /// Wire form of the whole registry state.
    pub fn snapshot(&self) -> Value {
        let background = self.background().map(node_to_json).unwrap_or(Value::Null);
        let nodes: Vec<Value> = self.nodes.iter().map(node_to_json).collect();
        let texts: Vec<Value> = self.texts.iter().map(node_to_json).collect();
        let edges: Vec<Value> = self.edges.iter().map(edge_to_json).collect();
        json!({
            "background": background,
            "nodes": nodes,
            "texts": texts,
            "edges": edges,
        })
    }

    /// Geometry a text labelled `label` would get next to `parent` under the current config.
    pub fn text_geometry_for(&self, parent: &Geometry, label: &str) -> Geometry {
        let mut geometry =
            label_dimensions(&self.measurer, label, self.config.text_font_size());
        let side = LabelSide::parse(self.config.text_position()).unwrap_or_default();
        label_position(parent, &mut geometry, side, self.config.text_margin());
        geometry
    }
}

impl<C: RenderChannel + Default> Default for GraphRegistry<C> {
    fn default() -> Self {
        Self::new(C::default())
    }
}
