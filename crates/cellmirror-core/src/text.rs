//! Label metrics used to derive text-node geometry from a parent node.

use crate::geom::Geometry;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub line_count: usize,
}

pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics;
}

/// Font-independent measurer: every glyph is `char_width_factor` em wide and every line is
/// `line_height_factor` em tall.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl DeterministicTextMeasurer {
    pub fn new(char_width_factor: f64, line_height_factor: f64) -> Self {
        Self {
            char_width_factor,
            line_height_factor,
        }
    }

    pub fn normalized_text_lines(text: &str) -> Vec<String> {
        let t = text
            .replace("<br/>", "\n")
            .replace("<br />", "\n")
            .replace("<br>", "\n");
        t.split('\n').map(|s| s.to_string()).collect()
    }
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let lines = Self::normalized_text_lines(text);
        let font_size = font_size.max(1.0);
        let max_chars = lines
            .iter()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);

        TextMetrics {
            width: max_chars as f64 * font_size * char_width_factor,
            height: lines.len() as f64 * font_size * line_height_factor,
            line_count: lines.len(),
        }
    }
}

/// Side of the parent node a text label is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelSide {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
    Center,
}

impl LabelSide {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "top" => Some(Self::Top),
            "bottom" => Some(Self::Bottom),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "center" => Some(Self::Center),
            _ => None,
        }
    }
}

/// Geometry at the origin sized to fit `label` at `font_size`.
pub fn label_dimensions(measurer: &dyn TextMeasurer, label: &str, font_size: f64) -> Geometry {
    let m = measurer.measure(label, font_size);
    Geometry::new(0.0, 0.0, m.width, m.height)
}

/// Places `text` next to `parent` on `side`, `margin` pixels away, centered on the other axis.
pub fn label_position(parent: &Geometry, text: &mut Geometry, side: LabelSide, margin: f64) {
    let center_x = parent.x() + (parent.width() - text.width()) / 2.0;
    let center_y = parent.y() + (parent.height() - text.height()) / 2.0;
    let (x, y) = match side {
        LabelSide::Top => (center_x, parent.y() - text.height() - margin),
        LabelSide::Bottom => (center_x, parent.y() + parent.height() + margin),
        LabelSide::Left => (parent.x() - text.width() - margin, center_y),
        LabelSide::Right => (parent.x() + parent.width() + margin, center_y),
        LabelSide::Center => (center_x, center_y),
    };
    text.set_position(x, y);
}
