//! Per-render settings snapshots and typed readers over them.
//!
//! A snapshot is whatever the page builder stored for one widget
//! instance: an element id plus a JSON object of setting values. Readers
//! never fail; a missing or malformed value reads as `None` and callers
//! fall back to schema defaults.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::html::is_css_safe;
use crate::schema::{FieldKind, FieldSpec, WidgetSchema};

/// Device suffixes used by responsive setting keys.
pub const RESPONSIVE_SUFFIXES: &[&str] = &["_tablet", "_mobile"];

/// Settings of one widget instance for one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsSnapshot {
    #[serde(default)]
    pub element_id: String,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

impl SettingsSnapshot {
    pub fn new(element_id: &str) -> Self {
        Self {
            element_id: element_id.to_string(),
            settings: Map::new(),
        }
    }

    /// Builder-style setter.
    pub fn with(mut self, key: &str, value: Value) -> Self {
        self.settings.insert(key.to_string(), value);
        self
    }

    /// Accept either `{"element_id": .., "settings": {..}}` or a bare
    /// settings object. Anything else yields an empty snapshot.
    pub fn from_json(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Self::default();
        };

        if let Some(Value::Object(settings)) = map.remove("settings") {
            let element_id = map
                .get("element_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            return Self {
                element_id,
                settings,
            };
        }

        Self {
            element_id: String::new(),
            settings: map,
        }
    }

    /// Raw value; JSON `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.settings.get(key).filter(|v| !v.is_null())
    }

    /// Keys the schema does not declare (responsive suffixes are allowed).
    pub fn unknown_keys<'a>(&'a self, schema: &WidgetSchema) -> Vec<&'a str> {
        self.settings
            .keys()
            .map(String::as_str)
            .filter(|&key| {
                let base = RESPONSIVE_SUFFIXES
                    .iter()
                    .find_map(|suffix| key.strip_suffix(suffix))
                    .unwrap_or(key);
                schema.field(key).is_none() && schema.field(base).is_none()
            })
            .collect()
    }
}

/// Format a number the way CSS expects (`10`, not `10.0`).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Scalar value as text: strings as-is, numbers formatted, bools as `yes`/``.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_f64().map(format_number),
        Value::Bool(true) => Some("yes".to_string()),
        Value::Bool(false) => Some(String::new()),
        _ => None,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Trimmed text that is non-empty and safe to place in a declaration.
fn non_empty_text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(value_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && is_css_safe(s))
}

/// `{size, unit}` slider value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SliderValue {
    pub size: Option<f64>,
    pub unit: Option<String>,
}

impl SliderValue {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                size: map.get("size").and_then(number),
                unit: non_empty_text(map.get("unit")),
            }),
            Value::Number(_) | Value::String(_) => Some(Self {
                size: number(value),
                unit: None,
            }),
            _ => None,
        }
    }

    /// Size text, `0` when absent.
    pub fn size_or_zero(&self) -> String {
        format_number(self.size.unwrap_or(0.0))
    }

    /// Size with unit, or `None` when the size is absent.
    pub fn css(&self, default_unit: &str) -> Option<String> {
        self.size.map(|size| {
            format!(
                "{}{}",
                format_number(size),
                self.unit.as_deref().unwrap_or(default_unit)
            )
        })
    }
}

/// Four-sided `{top, right, bottom, left, unit}` value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DimensionsValue {
    pub top: Option<String>,
    pub right: Option<String>,
    pub bottom: Option<String>,
    pub left: Option<String>,
    pub unit: Option<String>,
}

impl DimensionsValue {
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            top: non_empty_text(map.get("top")),
            right: non_empty_text(map.get("right")),
            bottom: non_empty_text(map.get("bottom")),
            left: non_empty_text(map.get("left")),
            unit: non_empty_text(map.get("unit")),
        })
    }

    /// True when no side carries a value.
    pub fn is_empty(&self) -> bool {
        self.top.is_none() && self.right.is_none() && self.bottom.is_none() && self.left.is_none()
    }

    /// `t r b l` with units; missing sides read as `0`.
    pub fn shorthand(&self, default_unit: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let unit = self.unit.as_deref().unwrap_or(default_unit);
        let side = |v: &Option<String>| format!("{}{}", v.as_deref().unwrap_or("0"), unit);
        Some(format!(
            "{} {} {} {}",
            side(&self.top),
            side(&self.right),
            side(&self.bottom),
            side(&self.left)
        ))
    }
}

/// Link value: `{url}` or a bare string.
pub fn url_value(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map.get("url").and_then(Value::as_str).map(str::to_string),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Schema-aware view over a snapshot: snapshot value first, field default second.
#[derive(Debug, Clone, Copy)]
pub struct EffectiveSettings<'a> {
    schema: &'a WidgetSchema,
    snapshot: &'a SettingsSnapshot,
}

impl<'a> EffectiveSettings<'a> {
    pub fn new(schema: &'a WidgetSchema, snapshot: &'a SettingsSnapshot) -> Self {
        Self { schema, snapshot }
    }

    pub fn schema(&self) -> &'a WidgetSchema {
        self.schema
    }

    pub fn snapshot(&self) -> &'a SettingsSnapshot {
        self.snapshot
    }

    /// Effective value of `key`: a valid snapshot value, else the default.
    ///
    /// Keys the schema does not declare read straight from the snapshot.
    pub fn value(&self, key: &str) -> Option<&'a Value> {
        let Some(field) = self.schema.field(key) else {
            return self.snapshot.get(key);
        };
        match self.snapshot.get(key) {
            Some(value) if is_valid_for(field, value) => Some(value),
            _ => field.default.as_ref(),
        }
    }

    /// Responsive override for a device suffix, without defaulting.
    pub fn device_value(&self, key: &str, suffix: &str) -> Option<&'a Value> {
        let field = self.schema.field(key)?;
        self.snapshot
            .get(&format!("{}{}", key, suffix))
            .filter(|value| is_valid_for(field, value))
    }

    /// Effective value as text, if any.
    pub fn text_opt(&self, key: &str) -> Option<String> {
        self.value(key).and_then(value_text)
    }

    /// Effective value as text, empty when absent.
    pub fn text(&self, key: &str) -> String {
        self.text_opt(key).unwrap_or_default()
    }

    /// Switch fields store `"yes"` when on.
    pub fn is_yes(&self, key: &str) -> bool {
        self.text_opt(key).is_some_and(|v| v == "yes")
    }

    pub fn slider(&self, key: &str) -> Option<SliderValue> {
        self.value(key).and_then(SliderValue::from_value)
    }

    pub fn url(&self, key: &str) -> String {
        self.value(key).and_then(url_value).unwrap_or_default()
    }

    /// Whether the section and field conditions of `key` both hold.
    pub fn is_active(&self, key: &str) -> bool {
        let lookup = |k: &str| self.text_opt(k);
        self.schema
            .fields()
            .find(|(_, f)| f.key == key)
            .is_some_and(|(section, field)| {
                section.condition.evaluate(lookup) && field.condition.evaluate(lookup)
            })
    }
}

/// Shallow type check of a stored value against its field.
fn is_valid_for(field: &FieldSpec, value: &Value) -> bool {
    match field.kind {
        FieldKind::Select => value_text(value).is_some_and(|v| field.accepts_option(&v)),
        FieldKind::Color => value_text(value).is_some_and(|v| is_css_safe(&v)),
        FieldKind::Text | FieldKind::Switch => value_text(value).is_some(),
        FieldKind::Slider => SliderValue::from_value(value).is_some(),
        FieldKind::Dimensions => value.is_object(),
        FieldKind::Url => url_value(value).is_some(),
        FieldKind::Icon
        | FieldKind::Typography
        | FieldKind::Border
        | FieldKind::Background
        | FieldKind::BoxShadow => value.is_object(),
        FieldKind::Divider => false,
    }
}
