//! Typed style value objects for nodes, edges and their labels.
//!
//! Each object carries hard-coded defaults (see the `DEFAULT_*` constants); blank or missing
//! values fall back to those defaults during reconciliation (see [`crate::reconcile`]).

pub const GRAPH_BACKGROUND_COLOR: &str = "#ffffff";
pub const DEFAULT_STROKE_COLOR: &str = "black";
pub const DEFAULT_FONT_COLOR: &str = "black";
pub const DEFAULT_FONT_FAMILY: &str = "Arial";
pub const DEFAULT_STROKE_WIDTH: f64 = 1.0;
pub const DEFAULT_Z_INDEX: i32 = 1;
pub const DEFAULT_NODE_FONT_SIZE: f64 = 12.0;
pub const DEFAULT_EDGE_LABEL_FONT_SIZE: f64 = 14.0;
pub const DEFAULT_LABEL_POSITION: &str = "bottom";
pub const DEFAULT_VISIBILITY: &str = "visible";

/// The single non-zero dash intensity; every other non-zero dash collapses onto it.
pub const DASHED: f64 = 5.0;
/// The single non-zero corner radius; every other non-zero radius collapses onto it.
pub const ROUNDED: i32 = 12;

/// Overlay map keys understood by the rendering surface.
pub mod keys {
    pub const FILL_COLOR: &str = "fillColor";
    pub const STROKE_COLOR: &str = "strokeColor";
    pub const STROKE_WIDTH: &str = "strokeWidth";
    pub const DASHED: &str = "dashed";
    pub const ROUNDED: &str = "rounded";
    pub const Z_INDEX: &str = "zIndex";
    pub const VISIBILITY: &str = "visibility";
    pub const LABEL_POSITION: &str = "labelPosition";
    pub const FONT_SIZE: &str = "fontSize";
    pub const FONT_COLOR: &str = "fontColor";
    pub const FONT_FAMILY: &str = "fontFamily";
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeStyles {
    pub fill_color: String,
    pub stroke_color: String,
    pub stroke_width: f64,
    /// SVG dash array as sent to the surface; `"0"` means solid.
    pub dash: String,
    pub border_radius: i32,
    pub z_index: i32,
}

impl Default for NodeStyles {
    fn default() -> Self {
        Self {
            fill_color: GRAPH_BACKGROUND_COLOR.to_string(),
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            dash: "0".to_string(),
            border_radius: 0,
            z_index: DEFAULT_Z_INDEX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NodeLabelStyles {
    pub font_color: String,
    pub font_size: f64,
    pub font_family: String,
    pub label_position: String,
    pub visibility: String,
}

impl Default for NodeLabelStyles {
    fn default() -> Self {
        Self {
            font_color: DEFAULT_FONT_COLOR.to_string(),
            font_size: DEFAULT_NODE_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            label_position: DEFAULT_LABEL_POSITION.to_string(),
            visibility: DEFAULT_VISIBILITY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeStyles {
    pub stroke_color: String,
    pub stroke_width: f64,
    pub dash: f64,
    pub border_radius: i32,
    pub z_index: i32,
}

impl Default for EdgeStyles {
    fn default() -> Self {
        Self {
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            dash: 0.0,
            border_radius: 0,
            z_index: DEFAULT_Z_INDEX,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabelStyles {
    pub fill_color: String,
    pub font_color: String,
    pub font_size: f64,
    pub font_family: String,
    pub border_radius: i32,
}

impl Default for EdgeLabelStyles {
    fn default() -> Self {
        Self {
            fill_color: GRAPH_BACKGROUND_COLOR.to_string(),
            font_color: DEFAULT_FONT_COLOR.to_string(),
            font_size: DEFAULT_EDGE_LABEL_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            border_radius: 0,
        }
    }
}
