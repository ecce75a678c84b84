//! Field definitions: one configurable control of a widget.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

use super::selector::{SelectorTemplate, StyleRule};

/// Kind of control a field represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Select,
    Switch,
    Slider,
    Icon,
    Color,
    Dimensions,
    Url,
    Typography,
    Border,
    Background,
    BoxShadow,
    Divider,
}

impl FieldKind {
    /// Group kinds generate their declarations from a structured value.
    pub fn is_group(self) -> bool {
        matches!(
            self,
            Self::Typography | Self::Border | Self::Background | Self::BoxShadow
        )
    }
}

/// Interaction state tab a style field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleState {
    Normal,
    Hover,
    Active,
}

/// Conjunction of exact-match terms on other settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Condition {
    terms: BTreeMap<String, String>,
}

impl Condition {
    pub fn when(key: &str, value: &str) -> Self {
        Self::default().and(key, value)
    }

    pub fn and(mut self, key: &str, value: &str) -> Self {
        self.terms.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Keys this condition depends on.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    /// Evaluate against a lookup. A key that cannot be resolved makes the
    /// whole condition false.
    pub fn evaluate(&self, lookup: impl Fn(&str) -> Option<String>) -> bool {
        self.terms
            .iter()
            .all(|(key, expected)| lookup(key).is_some_and(|actual| &actual == expected))
    }
}

/// Allowed range for one slider unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// One configurable control.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub key: String,
    pub kind: FieldKind,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub size_units: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub range: BTreeMap<String, SliderRange>,
    pub responsive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StyleState>,
    #[serde(skip_serializing_if = "Condition::is_empty")]
    pub condition: Condition,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<StyleRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_selector: Option<SelectorTemplate>,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, kind: FieldKind, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            kind,
            label: label.into(),
            default: None,
            options: Vec::new(),
            size_units: Vec::new(),
            range: BTreeMap::new(),
            responsive: false,
            state: None,
            condition: Condition::default(),
            rules: Vec::new(),
            group_selector: None,
        }
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn options(mut self, options: &[(&str, &str)]) -> Self {
        self.options = options
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    pub fn units(mut self, units: &[&str]) -> Self {
        self.size_units = units.iter().map(|u| u.to_string()).collect();
        self
    }

    pub fn range(mut self, unit: &str, min: f64, max: f64, step: f64) -> Self {
        self.range
            .insert(unit.to_string(), SliderRange { min, max, step });
        self
    }

    pub fn responsive(mut self) -> Self {
        self.responsive = true;
        self
    }

    pub fn state(mut self, state: StyleState) -> Self {
        self.state = Some(state);
        self
    }

    /// Add a condition term (`key == value`).
    pub fn when(mut self, key: &str, value: &str) -> Self {
        self.condition = self.condition.and(key, value);
        self
    }

    /// Add a selector/declaration rule. Blank selectors are dropped.
    pub fn rule(mut self, selector: &str, declarations: &str) -> Self {
        if let Some(rule) = StyleRule::new(selector, declarations) {
            self.rules.push(rule);
        }
        self
    }

    /// Set the selector receiving a group control's generated declarations.
    pub fn group(mut self, selector: Option<SelectorTemplate>) -> Self {
        self.group_selector = selector;
        self
    }

    /// First declared unit, used when a slider value omits one.
    pub fn default_unit(&self) -> &str {
        self.size_units.first().map(String::as_str).unwrap_or("px")
    }

    /// Whether `value` is one of the declared options. Fields without
    /// declared options accept anything.
    pub fn accepts_option(&self, value: &str) -> bool {
        self.options.is_empty() || self.options.iter().any(|(k, _)| k == value)
    }

    /// Whether this field can emit CSS at all.
    pub fn has_styles(&self) -> bool {
        !self.rules.is_empty() || self.group_selector.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_condition_all_terms_must_match() {
        let condition = Condition::when("enable_icon", "yes").and("layout", "row");

        assert!(condition.evaluate(|k| match k {
            "enable_icon" => Some("yes".into()),
            "layout" => Some("row".into()),
            _ => None,
        }));
        assert!(!condition.evaluate(|k| match k {
            "enable_icon" => Some("yes".into()),
            "layout" => Some("column".into()),
            _ => None,
        }));
    }

    #[test]
    fn test_condition_unresolved_key_is_false() {
        let condition = Condition::when("missing", "yes");
        assert!(!condition.evaluate(|_| None));
    }

    #[test]
    fn test_empty_condition_is_true() {
        assert!(Condition::default().evaluate(|_| None));
    }

    #[test]
    fn test_field_builder() {
        let field = FieldSpec::new("items_spacing", FieldKind::Slider, "Items spacing")
            .units(&["px", "%"])
            .range("px", 0.0, 200.0, 1.0)
            .default_value(json!({"size": 4, "unit": "px"}))
            .rule("{{WRAPPER}} li", "margin-right: {{SIZE}}{{UNIT}};")
            .rule("", "ignored: 1;");

        assert_eq!(field.default_unit(), "px");
        assert_eq!(field.rules.len(), 1);
        assert!(field.has_styles());
        assert!(field.range.contains_key("px"));
    }

    #[test]
    fn test_accepts_option() {
        let field = FieldSpec::new("tag", FieldKind::Select, "Tag").options(&[("h1", "H1")]);
        assert!(field.accepts_option("h1"));
        assert!(!field.accepts_option("script"));

        let open = FieldSpec::new("menu", FieldKind::Select, "Menu");
        assert!(open.accepts_option("anything"));
    }

    #[test]
    fn test_group_kinds() {
        assert!(FieldKind::Typography.is_group());
        assert!(FieldKind::BoxShadow.is_group());
        assert!(!FieldKind::Color.is_group());
    }
}
