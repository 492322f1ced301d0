use serde_json::{Map, Value, json};

/// JSON-backed settings for a mirrored graph.
///
/// Overrides are deep-merged onto [`MirrorConfig::default`], so partial objects keep the
/// remaining defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct MirrorConfig(Value);

impl Default for MirrorConfig {
    fn default() -> Self {
        Self(json!({
            "text": {
                "fontSize": 12.0,
                "margin": 10.0,
                "position": "bottom",
                "charWidthFactor": 0.6,
                "lineHeightFactor": 1.2
            },
            "background": {
                "shape": "image"
            }
        }))
    }
}

impl MirrorConfig {
    /// Defaults with `overrides` merged on top.
    pub fn with_overrides(overrides: &Value) -> Self {
        let mut cfg = Self::default();
        cfg.deep_merge(overrides);
        cfg
    }

    fn lookup(&self, dotted_path: &str) -> Option<&Value> {
        let mut cur = &self.0;
        for segment in dotted_path.split('.') {
            cur = cur.as_object()?.get(segment)?;
        }
        Some(cur)
    }

    pub fn get_str(&self, dotted_path: &str) -> Option<&str> {
        self.lookup(dotted_path)?.as_str()
    }

    pub fn get_f64(&self, dotted_path: &str) -> Option<f64> {
        self.lookup(dotted_path)?.as_f64()
    }

    /// Writes `value` at `dotted_path`, replacing any non-object on the way.
    pub fn set_value(&mut self, dotted_path: &str, value: Value) {
        let path: Vec<&str> = dotted_path.split('.').collect();
        write_path(&mut self.0, &path, value);
    }

    pub fn deep_merge(&mut self, overrides: &Value) {
        merge_into(&mut self.0, overrides);
    }

    pub fn text_font_size(&self) -> f64 {
        self.get_f64("text.fontSize").unwrap_or(12.0)
    }

    pub fn text_margin(&self) -> f64 {
        self.get_f64("text.margin").unwrap_or(10.0)
    }

    pub fn text_position(&self) -> &str {
        self.get_str("text.position").unwrap_or("bottom")
    }

    pub fn char_width_factor(&self) -> f64 {
        self.get_f64("text.charWidthFactor").unwrap_or(0.6)
    }

    pub fn line_height_factor(&self) -> f64 {
        self.get_f64("text.lineHeightFactor").unwrap_or(1.2)
    }

    pub fn background_shape(&self) -> &str {
        self.get_str("background.shape").unwrap_or("image")
    }
}

fn write_path(target: &mut Value, path: &[&str], value: Value) {
    let Some((head, rest)) = path.split_first() else {
        *target = value;
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(map) = target {
        let child = map.entry(head.to_string()).or_insert(Value::Null);
        write_path(child, rest, value);
    }
}

/// Objects merge key by key; any other override replaces the base value.
fn merge_into(base: &mut Value, overrides: &Value) {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            for (key, value) in override_map {
                let slot = base_map.entry(key.clone()).or_insert(Value::Null);
                merge_into(slot, value);
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}
