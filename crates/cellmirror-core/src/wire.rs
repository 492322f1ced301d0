//! Canonical wire JSON exchanged with the rendering surface.
//!
//! Encoding is total: every known key is always present, absent optionals become `""`.
//! The surface does no null-coalescing of its own. Decoding is lenient and fills missing
//! keys with the documented defaults.

use crate::cell::{Edge, EdgeKind, EdgeLabel, Node, NodeKind, SHAPE_RECT};
use crate::geom::{Geometry, Vertex, point};
use crate::style::{EdgeLabelStyles, EdgeStyles, NodeLabelStyles, NodeStyles};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// JSON has no NaN or infinity; those go out as `0` so numeric keys are never `null`.
fn num(v: f64) -> f64 {
    if v.is_finite() { v } else { 0.0 }
}

fn geometry_json(g: &Geometry) -> Value {
    json!({
        "coordinates": { "x": num(g.x()), "y": num(g.y()) },
        "dimensions": { "width": num(g.width()), "height": num(g.height()) },
    })
}

fn node_styles_json(s: &NodeStyles) -> Value {
    json!({
        "fillColor": s.fill_color,
        "strokeColor": s.stroke_color,
        "strokeWidth": num(s.stroke_width),
        "dash": s.dash,
        "borderRadius": s.border_radius,
        "zIndex": s.z_index,
    })
}

fn node_label_styles_json(s: &NodeLabelStyles) -> Value {
    json!({
        "fontColor": s.font_color,
        "fontSize": num(s.font_size),
        "fontFamily": s.font_family,
        "labelPosition": s.label_position,
        "visibility": s.visibility,
    })
}

fn edge_label_json(l: &EdgeLabel) -> Value {
    let s = &l.styles;
    json!({
        "label": l.label,
        "distance": num(l.distance),
        "edgeLabelStyles": {
            "fillColor": s.fill_color,
            "fontColor": s.font_color,
            "fontSize": num(s.font_size),
            "fontFamily": s.font_family,
            "borderRadius": s.border_radius,
        },
    })
}

fn edge_styles_json(s: &EdgeStyles) -> Value {
    json!({
        "strokeColor": s.stroke_color,
        "strokeWidth": num(s.stroke_width),
        "dash": num(s.dash),
        "borderRadius": s.border_radius,
        "zIndex": s.z_index,
    })
}

/// Wire form of any node-like cell (plain node, text node, background).
pub fn node_to_json(node: &Node) -> Value {
    json!({
        "id": node.id(),
        "geometry": geometry_json(node.geometry()),
        "tools": node.tools,
        "shape": node.shape,
        "imgUrl": node.img_url,
        "movable": node.movable,
        "parentId": node.parent_id.as_deref().unwrap_or(""),
        "label": node.label,
        "nodeStyles": node_styles_json(&node.node_styles),
        "nodeLabelStyles": node_label_styles_json(&node.label_styles),
        "port": node.port,
    })
}

pub fn edge_to_json(edge: &Edge) -> Value {
    let vertices: Vec<Value> = edge
        .vertices()
        .iter()
        .map(|v| json!({ "x": num(v.x), "y": num(v.y) }))
        .collect();
    let labels: Vec<Value> = edge.labels().iter().map(edge_label_json).collect();
    json!({
        "id": edge.id(),
        "idSource": edge.source,
        "idTarget": edge.target,
        "vertices": vertices,
        "edgeLabels": labels,
        "edgeStyles": edge_styles_json(&edge.edge_styles),
    })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WirePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireDimensions {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireGeometry {
    pub coordinates: WirePoint,
    pub dimensions: WireDimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireNodeStyles {
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    pub dash: String,
    pub border_radius: i32,
    pub z_index: i32,
}

impl Default for WireNodeStyles {
    fn default() -> Self {
        let s = NodeStyles::default();
        Self {
            fill_color: s.fill_color,
            stroke_color: s.stroke_color,
            stroke_width: s.stroke_width,
            dash: s.dash,
            border_radius: s.border_radius,
            z_index: s.z_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireNodeLabelStyles {
    pub font_color: String,
    pub font_size: f64,
    pub font_family: String,
    pub label_position: String,
    pub visibility: String,
}

impl Default for WireNodeLabelStyles {
    fn default() -> Self {
        let s = NodeLabelStyles::default();
        Self {
            font_color: s.font_color,
            font_size: s.font_size,
            font_family: s.font_family,
            label_position: s.label_position,
            visibility: s.visibility,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireNode {
    pub id: String,
    pub geometry: WireGeometry,
    pub tools: Vec<String>,
    pub shape: String,
    pub img_url: String,
    pub movable: bool,
    pub parent_id: String,
    pub label: String,
    pub node_styles: WireNodeStyles,
    pub node_label_styles: WireNodeLabelStyles,
    pub port: bool,
}

impl Default for WireNode {
    fn default() -> Self {
        Self {
            id: String::new(),
            geometry: WireGeometry::default(),
            tools: Vec::new(),
            shape: SHAPE_RECT.to_string(),
            img_url: String::new(),
            movable: true,
            parent_id: String::new(),
            label: String::new(),
            node_styles: WireNodeStyles::default(),
            node_label_styles: WireNodeLabelStyles::default(),
            port: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireEdgeLabelStyles {
    pub fill_color: String,
    pub font_color: String,
    pub font_size: f64,
    pub font_family: String,
    pub border_radius: i32,
}

impl Default for WireEdgeLabelStyles {
    fn default() -> Self {
        let s = EdgeLabelStyles::default();
        Self {
            fill_color: s.fill_color,
            font_color: s.font_color,
            font_size: s.font_size,
            font_family: s.font_family,
            border_radius: s.border_radius,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireEdgeLabel {
    pub label: String,
    pub distance: f64,
    pub edge_label_styles: WireEdgeLabelStyles,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireEdgeStyles {
    pub stroke_color: String,
    pub stroke_width: f64,
    pub dash: f64,
    pub border_radius: i32,
    pub z_index: i32,
}

impl Default for WireEdgeStyles {
    fn default() -> Self {
        let s = EdgeStyles::default();
        Self {
            stroke_color: s.stroke_color,
            stroke_width: s.stroke_width,
            dash: s.dash,
            border_radius: s.border_radius,
            z_index: s.z_index,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WireEdge {
    pub id: String,
    pub id_source: String,
    pub id_target: String,
    pub vertices: Vec<WirePoint>,
    pub edge_labels: Vec<WireEdgeLabel>,
    pub edge_styles: WireEdgeStyles,
}

impl WireNode {
    pub fn into_node(self, kind: NodeKind) -> Node {
        let g = self.geometry;
        let geometry = Geometry::new(
            g.coordinates.x,
            g.coordinates.y,
            g.dimensions.width,
            g.dimensions.height,
        );
        let mut node = Node::from_parts(kind, self.id, geometry, &self.shape);
        node.img_url = self.img_url;
        node.movable = self.movable;
        node.parent_id = Some(self.parent_id).filter(|p| !p.is_empty());
        node.label = self.label;
        node.tools = self.tools;
        node.port = self.port;

        let s = self.node_styles;
        node.node_styles = NodeStyles {
            fill_color: s.fill_color,
            stroke_color: s.stroke_color,
            stroke_width: s.stroke_width,
            dash: s.dash,
            border_radius: s.border_radius,
            z_index: s.z_index,
        };
        let l = self.node_label_styles;
        node.label_styles = NodeLabelStyles {
            font_color: l.font_color,
            font_size: l.font_size,
            font_family: l.font_family,
            label_position: l.label_position,
            visibility: l.visibility,
        };
        node
    }
}

impl WireEdge {
    /// Builds an edge of `kind`; a basic edge drops any labels.
    pub fn into_edge(self, kind: EdgeKind) -> Edge {
        let labels: Vec<EdgeLabel> = self
            .edge_labels
            .into_iter()
            .map(|l| {
                let s = l.edge_label_styles;
                let mut label = EdgeLabel::new(l.label, l.distance);
                label.styles = EdgeLabelStyles {
                    fill_color: s.fill_color,
                    font_color: s.font_color,
                    font_size: s.font_size,
                    font_family: s.font_family,
                    border_radius: s.border_radius,
                };
                label
            })
            .collect();
        let mut edge = match kind {
            EdgeKind::Labeled => Edge::with_labels(self.id, self.id_source, self.id_target, labels),
            EdgeKind::Basic => {
                if !labels.is_empty() {
                    tracing::debug!(id = %self.id, "basic edge: ignoring wire labels");
                }
                Edge::basic(self.id, self.id_source, self.id_target)
            }
        };
        edge.set_vertices(self.vertices.iter().map(|p| point(p.x, p.y)).collect());

        let s = self.edge_styles;
        edge.edge_styles = EdgeStyles {
            stroke_color: s.stroke_color,
            stroke_width: s.stroke_width,
            dash: s.dash,
            border_radius: s.border_radius,
            z_index: s.z_index,
        };
        edge
    }
}

fn expect_object(kind: &'static str, value: &Value) -> Result<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(Error::InvalidWire {
            kind,
            message: format!("expected a JSON object, got {value}"),
        })
    }
}

/// Decodes a node-like wire object as a cell of `kind`.
pub fn node_from_wire(kind: NodeKind, value: &Value) -> Result<Node> {
    expect_object("node", value)?;
    let wire = WireNode::deserialize(value)?;
    Ok(wire.into_node(kind))
}

/// Decodes an edge wire object as an edge of `kind`.
pub fn edge_from_wire(kind: EdgeKind, value: &Value) -> Result<Edge> {
    expect_object("edge", value)?;
    let wire = WireEdge::deserialize(value)?;
    Ok(wire.into_edge(kind))
}

/// Parses a JSON array of `{x, y}` objects into ordered vertices.
pub fn vertices_from_json(raw: &str) -> Result<Vec<Vertex>> {
    let points: Vec<WirePoint> = serde_json::from_str(raw)?;
    Ok(points.into_iter().map(|p| point(p.x, p.y)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_json_has_every_key() {
        let node = Node::new("n1", 10.0, 20.0, 100.0, 50.0, "rect");
        let v = node_to_json(&node);
        assert_eq!(
            v,
            json!({
                "id": "n1",
                "geometry": {
                    "coordinates": { "x": 10.0, "y": 20.0 },
                    "dimensions": { "width": 100.0, "height": 50.0 }
                },
                "tools": [],
                "shape": "rect",
                "imgUrl": "",
                "movable": true,
                "parentId": "",
                "label": "",
                "nodeStyles": {
                    "fillColor": "#ffffff",
                    "strokeColor": "black",
                    "strokeWidth": 1.0,
                    "dash": "0",
                    "borderRadius": 0,
                    "zIndex": 1
                },
                "nodeLabelStyles": {
                    "fontColor": "black",
                    "fontSize": 12.0,
                    "fontFamily": "Arial",
                    "labelPosition": "bottom",
                    "visibility": "visible"
                },
                "port": false
            })
        );
    }

    #[test]
    fn key_order_is_stable() {
        let v = node_to_json(&Node::new("n1", 0.0, 0.0, 1.0, 1.0, "rect"));
        let keys: Vec<&str> = v
            .as_object()
            .map(|o| o.keys().map(String::as_str).collect())
            .unwrap_or_default();
        assert_eq!(
            keys,
            vec![
                "id",
                "geometry",
                "tools",
                "shape",
                "imgUrl",
                "movable",
                "parentId",
                "label",
                "nodeStyles",
                "nodeLabelStyles",
                "port"
            ]
        );
    }

    #[test]
    fn edge_json_preserves_sequence_order() {
        let mut edge = Edge::new("e1", "n1", "n2");
        edge.add_vertex(point(5.0, 5.0));
        edge.add_vertex(point(1.0, 2.0));
        edge.add_label("b", 0.75);
        edge.add_label("a", 0.25);
        let v = edge_to_json(&edge);
        assert_eq!(v["vertices"], json!([{ "x": 5.0, "y": 5.0 }, { "x": 1.0, "y": 2.0 }]));
        assert_eq!(v["edgeLabels"][0]["label"], "b");
        assert_eq!(v["edgeLabels"][1]["label"], "a");
        assert_eq!(
            v["edgeLabels"][1]["edgeLabelStyles"],
            json!({
                "fillColor": "#ffffff",
                "fontColor": "black",
                "fontSize": 14.0,
                "fontFamily": "Arial",
                "borderRadius": 0
            })
        );
        assert_eq!(
            v["edgeStyles"],
            json!({
                "strokeColor": "black",
                "strokeWidth": 1.0,
                "dash": 0.0,
                "borderRadius": 0,
                "zIndex": 1
            })
        );
    }

    #[test]
    fn serializing_does_not_touch_the_input() {
        let mut edge = Edge::with_label("e1", "a", "b", "cost");
        edge.edge_styles.stroke_color = String::new();
        let before = edge.clone();
        let v = edge_to_json(&edge);
        assert_eq!(edge, before);
        assert_eq!(v["edgeStyles"]["strokeColor"], "");
    }

    #[test]
    fn decoding_fills_missing_keys_with_defaults() {
        let node = node_from_wire(NodeKind::Plain, &json!({ "id": "n9", "label": "x" })).unwrap();
        assert_eq!(node.id(), "n9");
        assert_eq!(node.shape, "rect");
        assert!(node.movable);
        assert_eq!(node.parent_id, None);
        assert_eq!(node.node_styles, NodeStyles::default());

        let edge = edge_from_wire(EdgeKind::Labeled, &json!({
            "id": "e1",
            "idSource": "a",
            "idTarget": "b",
            "edgeLabels": [{ "label": "cost", "distance": 0.5 }]
        }))
        .unwrap();
        assert_eq!(edge.label_at(0).map(|l| l.distance), Some(0.5));
        assert_eq!(edge.labels()[0].styles, EdgeLabelStyles::default());
        assert_eq!(edge.edge_styles, EdgeStyles::default());
    }

    #[test]
    fn decoding_rejects_non_objects() {
        let err = node_from_wire(NodeKind::Plain, &json!([1, 2])).unwrap_err();
        assert!(err.to_string().starts_with("Invalid wire object (node)"));
        assert!(edge_from_wire(EdgeKind::Labeled, &json!({ "id": 3 })).is_err());
    }

    #[test]
    fn decode_of_encode_is_identity() {
        let mut node = Node::new("n1", 1.0, 2.0, 3.0, 4.0, "ellipse");
        node.parent_id = Some("p".to_string());
        node.add_tool("button-remove");
        node.port = true;
        let back = node_from_wire(NodeKind::Plain, &node_to_json(&node)).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn basic_edge_decode_drops_labels() {
        let wire = json!({
            "id": "e2",
            "idSource": "a",
            "idTarget": "b",
            "vertices": [{ "x": 4, "y": 5 }],
            "edgeLabels": [{ "label": "ignored", "distance": 0.3 }]
        });
        let edge = edge_from_wire(EdgeKind::Basic, &wire).unwrap();
        assert_eq!(edge.kind(), EdgeKind::Basic);
        assert!(edge.labels().is_empty());
        assert_eq!(edge.vertices(), &[point(4.0, 5.0)]);
        assert_eq!(edge_to_json(&edge)["edgeLabels"], json!([]));
    }

    #[test]
    fn non_finite_numbers_encode_as_zero() {
        let mut node = Node::new("n", f64::NAN, 1.0, f64::INFINITY, 1.0, "rect");
        node.node_styles.stroke_width = f64::NEG_INFINITY;
        node.label_styles.font_size = f64::NAN;
        let v = node_to_json(&node);
        assert_eq!(
            v["geometry"],
            json!({
                "coordinates": { "x": 0.0, "y": 1.0 },
                "dimensions": { "width": 0.0, "height": 1.0 }
            })
        );
        assert_eq!(v["nodeStyles"]["strokeWidth"], json!(0.0));
        assert_eq!(v["nodeLabelStyles"]["fontSize"], json!(0.0));

        let mut edge = Edge::with_label("e", "a", "b", "x");
        edge.add_vertex(point(f64::NAN, 2.0));
        edge.edge_styles.dash = f64::NAN;
        let v = edge_to_json(&edge);
        assert_eq!(v["vertices"], json!([{ "x": 0.0, "y": 2.0 }]));
        assert_eq!(v["edgeStyles"]["dash"], json!(0.0));
    }

    #[test]
    fn vertices_parse_in_order() {
        let v = vertices_from_json(r#"[{"x":1,"y":2},{"x":3.5,"y":-4}]"#).unwrap();
        assert_eq!(v, vec![point(1.0, 2.0), point(3.5, -4.0)]);
        assert!(vertices_from_json("{}").is_err());
    }
}
