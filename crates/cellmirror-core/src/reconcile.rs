//! Mapping between typed style objects and the string-keyed overlay map.
//!
//! Export (`to_style_map`) writes every field under its fixed key after normalizing blank
//! values to their defaults. Import (`from_style_map`) parses recognized keys and resets
//! missing or blank ones to defaults. Dash and corner radius are quantized on import: any
//! non-zero raw value becomes [`DASHED`] / [`ROUNDED`].
//!
//! Both directions are pure; callers that want the typed object and the overlay to agree
//! store the `normalized()` record next to the exported map (see `Node::sync_styles_to_map`).

use crate::style::{
    DASHED, DEFAULT_EDGE_LABEL_FONT_SIZE, DEFAULT_FONT_COLOR, DEFAULT_FONT_FAMILY,
    DEFAULT_LABEL_POSITION, DEFAULT_NODE_FONT_SIZE, DEFAULT_STROKE_COLOR, DEFAULT_STROKE_WIDTH,
    DEFAULT_VISIBILITY, DEFAULT_Z_INDEX, EdgeLabelStyles, EdgeStyles, GRAPH_BACKGROUND_COLOR,
    NodeLabelStyles, NodeStyles, ROUNDED, keys,
};
use crate::{Error, Result};
use indexmap::IndexMap;

pub type StyleMap = IndexMap<String, String>;

pub trait StyleRecord: Sized {
    /// Returns a copy with blank string fields replaced by their defaults.
    fn normalized(&self) -> Self;

    /// Exports the normalized fields into a fresh overlay map.
    fn to_style_map(&self) -> StyleMap;

    /// Builds a record from an overlay map, defaulting every absent or blank key.
    fn from_style_map(map: &StyleMap) -> Result<Self>;

    /// Applies a single external edit without resetting the other fields.
    fn merge_style(&self, key: &str, value: &str) -> Result<Self> {
        let mut map = self.to_style_map();
        map.insert(key.to_string(), value.to_string());
        Self::from_style_map(&map)
    }
}

fn present<'a>(map: &'a StyleMap, key: &str) -> Option<&'a str> {
    map.get(key)
        .map(String::as_str)
        .filter(|v| !v.trim().is_empty())
}

fn string_or(map: &StyleMap, key: &str, default: &str) -> String {
    present(map, key).unwrap_or(default).to_string()
}

fn f64_or(map: &StyleMap, key: &str, default: f64) -> Result<f64> {
    match present(map, key) {
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map_err(|_| Error::invalid_style(key, raw)),
        None => Ok(default),
    }
}

fn i32_or(map: &StyleMap, key: &str, default: i32) -> Result<i32> {
    match present(map, key) {
        Some(raw) => raw
            .trim()
            .parse::<i32>()
            .map_err(|_| Error::invalid_style(key, raw)),
        None => Ok(default),
    }
}

/// `true` when the raw dash value asks for a dashed stroke.
pub fn is_dashed(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None | Some("") | Some("0") | Some("0.0") => false,
        Some(_) => true,
    }
}

/// `true` when the raw corner radius asks for rounded corners.
pub fn is_rounded(raw: Option<&str>) -> bool {
    match raw.map(str::trim) {
        None | Some("") | Some("0") => false,
        Some(_) => true,
    }
}

fn quantized_radius(map: &StyleMap) -> i32 {
    if is_rounded(present(map, keys::ROUNDED)) {
        ROUNDED
    } else {
        0
    }
}

fn non_blank(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

fn insert(map: &mut StyleMap, key: &str, value: impl ToString) {
    map.insert(key.to_string(), value.to_string());
}

impl StyleRecord for EdgeStyles {
    fn normalized(&self) -> Self {
        Self {
            stroke_color: non_blank(&self.stroke_color, DEFAULT_STROKE_COLOR),
            ..self.clone()
        }
    }

    fn to_style_map(&self) -> StyleMap {
        let s = self.normalized();
        let mut map = StyleMap::new();
        insert(&mut map, keys::STROKE_COLOR, &s.stroke_color);
        insert(&mut map, keys::DASHED, s.dash);
        insert(&mut map, keys::ROUNDED, s.border_radius);
        insert(&mut map, keys::STROKE_WIDTH, s.stroke_width);
        insert(&mut map, keys::Z_INDEX, s.z_index);
        map
    }

    fn from_style_map(map: &StyleMap) -> Result<Self> {
        Ok(Self {
            stroke_color: string_or(map, keys::STROKE_COLOR, DEFAULT_STROKE_COLOR),
            dash: if is_dashed(present(map, keys::DASHED)) {
                DASHED
            } else {
                0.0
            },
            border_radius: quantized_radius(map),
            stroke_width: f64_or(map, keys::STROKE_WIDTH, DEFAULT_STROKE_WIDTH)?,
            z_index: i32_or(map, keys::Z_INDEX, DEFAULT_Z_INDEX)?,
        })
    }
}

impl StyleRecord for EdgeLabelStyles {
    fn normalized(&self) -> Self {
        Self {
            fill_color: non_blank(&self.fill_color, GRAPH_BACKGROUND_COLOR),
            font_color: non_blank(&self.font_color, DEFAULT_FONT_COLOR),
            font_family: non_blank(&self.font_family, DEFAULT_FONT_FAMILY),
            ..self.clone()
        }
    }

    fn to_style_map(&self) -> StyleMap {
        let s = self.normalized();
        let mut map = StyleMap::new();
        insert(&mut map, keys::FONT_SIZE, s.font_size);
        insert(&mut map, keys::FONT_COLOR, &s.font_color);
        insert(&mut map, keys::FONT_FAMILY, &s.font_family);
        insert(&mut map, keys::FILL_COLOR, &s.fill_color);
        insert(&mut map, keys::ROUNDED, s.border_radius);
        map
    }

    fn from_style_map(map: &StyleMap) -> Result<Self> {
        Ok(Self {
            font_size: f64_or(map, keys::FONT_SIZE, DEFAULT_EDGE_LABEL_FONT_SIZE)?,
            font_color: string_or(map, keys::FONT_COLOR, DEFAULT_FONT_COLOR),
            font_family: string_or(map, keys::FONT_FAMILY, DEFAULT_FONT_FAMILY),
            fill_color: string_or(map, keys::FILL_COLOR, GRAPH_BACKGROUND_COLOR),
            border_radius: quantized_radius(map),
        })
    }
}

impl StyleRecord for NodeStyles {
    fn normalized(&self) -> Self {
        Self {
            fill_color: non_blank(&self.fill_color, GRAPH_BACKGROUND_COLOR),
            stroke_color: non_blank(&self.stroke_color, DEFAULT_STROKE_COLOR),
            dash: non_blank(&self.dash, "0"),
            ..self.clone()
        }
    }

    fn to_style_map(&self) -> StyleMap {
        let s = self.normalized();
        let mut map = StyleMap::new();
        insert(&mut map, keys::FILL_COLOR, &s.fill_color);
        insert(&mut map, keys::STROKE_COLOR, &s.stroke_color);
        insert(&mut map, keys::STROKE_WIDTH, s.stroke_width);
        insert(&mut map, keys::DASHED, &s.dash);
        insert(&mut map, keys::ROUNDED, s.border_radius);
        insert(&mut map, keys::Z_INDEX, s.z_index);
        map
    }

    fn from_style_map(map: &StyleMap) -> Result<Self> {
        let dash = if is_dashed(present(map, keys::DASHED)) {
            DASHED.to_string()
        } else {
            "0".to_string()
        };
        Ok(Self {
            fill_color: string_or(map, keys::FILL_COLOR, GRAPH_BACKGROUND_COLOR),
            stroke_color: string_or(map, keys::STROKE_COLOR, DEFAULT_STROKE_COLOR),
            stroke_width: f64_or(map, keys::STROKE_WIDTH, DEFAULT_STROKE_WIDTH)?,
            dash,
            border_radius: quantized_radius(map),
            z_index: i32_or(map, keys::Z_INDEX, DEFAULT_Z_INDEX)?,
        })
    }
}

impl StyleRecord for NodeLabelStyles {
    fn normalized(&self) -> Self {
        Self {
            font_color: non_blank(&self.font_color, DEFAULT_FONT_COLOR),
            font_family: non_blank(&self.font_family, DEFAULT_FONT_FAMILY),
            label_position: non_blank(&self.label_position, DEFAULT_LABEL_POSITION),
            visibility: non_blank(&self.visibility, DEFAULT_VISIBILITY),
            ..self.clone()
        }
    }

    fn to_style_map(&self) -> StyleMap {
        let s = self.normalized();
        let mut map = StyleMap::new();
        insert(&mut map, keys::FONT_COLOR, &s.font_color);
        insert(&mut map, keys::FONT_SIZE, s.font_size);
        insert(&mut map, keys::FONT_FAMILY, &s.font_family);
        insert(&mut map, keys::LABEL_POSITION, &s.label_position);
        insert(&mut map, keys::VISIBILITY, &s.visibility);
        map
    }

    fn from_style_map(map: &StyleMap) -> Result<Self> {
        Ok(Self {
            font_color: string_or(map, keys::FONT_COLOR, DEFAULT_FONT_COLOR),
            font_size: f64_or(map, keys::FONT_SIZE, DEFAULT_NODE_FONT_SIZE)?,
            font_family: string_or(map, keys::FONT_FAMILY, DEFAULT_FONT_FAMILY),
            label_position: string_or(map, keys::LABEL_POSITION, DEFAULT_LABEL_POSITION),
            visibility: string_or(map, keys::VISIBILITY, DEFAULT_VISIBILITY),
        })
    }
}
