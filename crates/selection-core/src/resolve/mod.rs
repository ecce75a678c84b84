//! Schema + settings resolution.
//!
//! `Resolver::resolve` turns a widget schema and one settings snapshot into
//! `RenderArgs`: the wrapper/title markup from the default-args builder and
//! the CSS rules generated by every active field. Resolution is total; a
//! missing or malformed value falls back to the field default or is skipped.

mod groups;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::BreakpointsConfig;
use crate::default_args::{DefaultArgsInput, IconSpec, build_default_args, orientation_wrapper};
use crate::html::{css_url, is_css_safe};
use crate::schema::{FieldKind, FieldSpec, Placeholder, WidgetSchema, Wrapper};
use crate::settings::{
    DimensionsValue, EffectiveSettings, SettingsSnapshot, SliderValue, url_value, value_text,
};

/// Viewport a CSS rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Desktop,
    Tablet,
    Mobile,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Self::Desktop, Self::Tablet, Self::Mobile];

    /// Suffix of the setting key carrying this breakpoint's override.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Desktop => "",
            Self::Tablet => "_tablet",
            Self::Mobile => "_mobile",
        }
    }

    pub fn max_width(self, breakpoints: &BreakpointsConfig) -> Option<u32> {
        match self {
            Self::Desktop => None,
            Self::Tablet => Some(breakpoints.tablet),
            Self::Mobile => Some(breakpoints.mobile),
        }
    }

    /// `@media` condition, `None` for desktop.
    pub fn media_query(self, breakpoints: &BreakpointsConfig) -> Option<String> {
        self.max_width(breakpoints)
            .map(|width| format!("(max-width: {}px)", width))
    }

    /// Breakpoints whose rules apply at this one, widest first.
    fn cascade(self) -> &'static [Breakpoint] {
        match self {
            Self::Desktop => &[Self::Desktop],
            Self::Tablet => &[Self::Desktop, Self::Tablet],
            Self::Mobile => &[Self::Desktop, Self::Tablet, Self::Mobile],
        }
    }
}

/// Declarations for one selector at one breakpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CssRule {
    pub breakpoint: Breakpoint,
    pub selector: String,
    pub declarations: Vec<String>,
}

/// All CSS generated for one widget instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedStyles {
    rules: Vec<CssRule>,
}

impl ResolvedStyles {
    /// Add a declaration block. Rules for the same selector and breakpoint
    /// are merged in insertion order.
    pub fn push(&mut self, breakpoint: Breakpoint, selector: &str, block: &str) {
        self.push_declarations(breakpoint, selector, split_declarations(block));
    }

    pub fn push_declarations(
        &mut self,
        breakpoint: Breakpoint,
        selector: &str,
        declarations: Vec<String>,
    ) {
        if declarations.is_empty() {
            return;
        }
        match self
            .rules
            .iter_mut()
            .find(|r| r.breakpoint == breakpoint && r.selector == selector)
        {
            Some(rule) => rule.declarations.extend(declarations),
            None => self.rules.push(CssRule {
                breakpoint,
                selector: selector.to_string(),
                declarations,
            }),
        }
    }

    pub fn rules(&self) -> &[CssRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Declarations emitted for exactly this selector and breakpoint.
    pub fn declarations(&self, selector: &str, breakpoint: Breakpoint) -> &[String] {
        self.rules
            .iter()
            .find(|r| r.breakpoint == breakpoint && r.selector == selector)
            .map(|r| r.declarations.as_slice())
            .unwrap_or(&[])
    }

    /// Declarations in effect for `selector` at `breakpoint`, after the
    /// desktop -> tablet -> mobile cascade. A narrower breakpoint replaces a
    /// property set by a wider one.
    pub fn effective(&self, selector: &str, breakpoint: Breakpoint) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for bp in breakpoint.cascade() {
            for declaration in self.declarations(selector, *bp) {
                let property = property_name(declaration);
                match out.iter_mut().find(|d| property_name(d) == property) {
                    Some(existing) => *existing = declaration.clone(),
                    None => out.push(declaration.clone()),
                }
            }
        }
        out
    }

    /// Render as a stylesheet: desktop rules first, then one media block
    /// per narrower breakpoint.
    pub fn to_css(&self, breakpoints: &BreakpointsConfig) -> String {
        let mut css = String::new();
        for bp in Breakpoint::ALL {
            let rules: Vec<&CssRule> = self.rules.iter().filter(|r| r.breakpoint == bp).collect();
            if rules.is_empty() {
                continue;
            }
            match bp.media_query(breakpoints) {
                None => {
                    for rule in rules {
                        write_rule(&mut css, rule, "");
                    }
                }
                Some(query) => {
                    css.push_str(&format!("@media {} {{\n", query));
                    for rule in rules {
                        write_rule(&mut css, rule, "    ");
                    }
                    css.push_str("}\n");
                }
            }
        }
        css
    }
}

fn write_rule(css: &mut String, rule: &CssRule, indent: &str) {
    css.push_str(&format!("{}{} {{\n", indent, rule.selector));
    for declaration in &rule.declarations {
        css.push_str(&format!("{}    {};\n", indent, declaration));
    }
    css.push_str(&format!("{}}}\n", indent));
}

fn property_name(declaration: &str) -> &str {
    declaration
        .split_once(':')
        .map(|(p, _)| p.trim())
        .unwrap_or(declaration)
}

/// Split a declaration block on `;` outside parentheses and quotes.
fn split_declarations(block: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut current = String::new();

    for ch in block.chars() {
        match (quote, ch) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                let declaration = current.trim();
                if !declaration.is_empty() {
                    out.push(declaration.to_string());
                }
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    let declaration = current.trim();
    if !declaration.is_empty() {
        out.push(declaration.to_string());
    }
    out
}

/// Output of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderArgs {
    pub before_widget_html: String,
    pub after_widget_html: String,
    pub before_title_html: String,
    pub after_title_html: String,
    pub resolved_css_rules: ResolvedStyles,
}

/// Resolves schemas against settings snapshots.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    breakpoints: BreakpointsConfig,
}

impl Resolver {
    pub fn new(breakpoints: BreakpointsConfig) -> Self {
        Self { breakpoints }
    }

    pub fn breakpoints(&self) -> &BreakpointsConfig {
        &self.breakpoints
    }

    /// Wrapper selector for a snapshot. Snapshots without an element id get
    /// a stable id derived from their settings.
    pub fn wrapper_for(schema: &WidgetSchema, snapshot: &SettingsSnapshot) -> Wrapper {
        if !snapshot.element_id.trim().is_empty() {
            return Wrapper::for_element(&snapshot.element_id);
        }
        let seed = serde_json::to_string(&snapshot.settings).unwrap_or_default();
        Wrapper::for_element(&Wrapper::derive_element_id(&schema.name, &seed))
    }

    pub fn resolve(&self, schema: &WidgetSchema, snapshot: &SettingsSnapshot) -> RenderArgs {
        let unknown = snapshot.unknown_keys(schema);
        if !unknown.is_empty() {
            debug!(
                "Widget '{}': ignoring unknown settings: {}",
                schema.name,
                unknown.join(", ")
            );
        }

        let settings = EffectiveSettings::new(schema, snapshot);
        let wrapper = Self::wrapper_for(schema, snapshot);
        let args = default_args(&settings);

        RenderArgs {
            before_widget_html: args.before_widget,
            after_widget_html: args.after_widget,
            before_title_html: args.before_title,
            after_title_html: args.after_title,
            resolved_css_rules: self.resolve_styles(schema, snapshot, &wrapper),
        }
    }

    /// CSS for every active field that declares rules.
    pub fn resolve_styles(
        &self,
        schema: &WidgetSchema,
        snapshot: &SettingsSnapshot,
        wrapper: &Wrapper,
    ) -> ResolvedStyles {
        let settings = EffectiveSettings::new(schema, snapshot);
        let mut styles = ResolvedStyles::default();

        for (_, field) in schema.fields() {
            if !field.has_styles() || !settings.is_active(&field.key) {
                continue;
            }
            for bp in Breakpoint::ALL {
                let value = match bp {
                    Breakpoint::Desktop => settings.value(&field.key),
                    _ if field.responsive => settings.device_value(&field.key, bp.suffix()),
                    _ => None,
                };
                if let Some(value) = value {
                    emit_field(&mut styles, field, value, bp, wrapper);
                }
            }
        }

        styles
    }
}

/// Default-args for the current settings, following the schema's title binding.
pub fn default_args(settings: &EffectiveSettings<'_>) -> crate::default_args::DefaultArgs {
    let binding = &settings.schema().title;
    let title_tag = settings.text(&binding.title_tag_key);
    let icon = settings
        .value(&binding.icon_key)
        .map(IconSpec::from_value)
        .unwrap_or_default();
    let icon_position = settings.text(&binding.icon_position_key);

    let extra_class = binding
        .extra_class
        .as_ref()
        .and_then(|c| {
            settings
                .text_opt(&c.key)
                .filter(|v| !v.trim().is_empty())
                .map(|v| format!("{}{}", c.prefix, v.trim()))
        })
        .unwrap_or_default();

    let wrapper = binding
        .wrapper_override
        .as_ref()
        .map(|o| {
            orientation_wrapper(
                binding.kind,
                &settings.text(&o.orientation_key),
                &settings.text(&o.alignment_key),
            )
        })
        .unwrap_or_default();

    let mut input = DefaultArgsInput::new(binding.kind, &title_tag, &icon);
    input.icon_enabled = settings.is_yes(&binding.icon_enabled_key);
    input.icon_position = &icon_position;
    input.extra_wrapper_class = &extra_class;
    input.wrapper_override = &wrapper;
    build_default_args(&input)
}

fn emit_field(
    styles: &mut ResolvedStyles,
    field: &FieldSpec,
    value: &Value,
    breakpoint: Breakpoint,
    wrapper: &Wrapper,
) {
    if field.kind.is_group() {
        if let Some(selector) = &field.group_selector {
            let declarations = groups::declarations(field.kind, value);
            styles.push_declarations(breakpoint, &selector.render(wrapper), declarations);
        }
        return;
    }

    for rule in &field.rules {
        if let Some(block) = rule
            .declarations
            .render(|slot| placeholder_value(field, value, slot))
        {
            styles.push(breakpoint, &rule.selector.render(wrapper), &block);
        }
    }
}

/// Text substituted for one placeholder, `None` when the value cannot fill it.
fn placeholder_value(field: &FieldSpec, value: &Value, slot: Placeholder) -> Option<String> {
    let unit = field.default_unit();
    match field.kind {
        FieldKind::Slider => {
            let slider = SliderValue::from_value(value)?;
            let slider_unit = slider.unit.clone().unwrap_or_else(|| unit.to_string());
            match slot {
                Placeholder::Size => Some(slider.size_or_zero()),
                Placeholder::Unit => Some(slider_unit),
                Placeholder::Value => Some(format!("{}{}", slider.size_or_zero(), slider_unit)),
                _ => None,
            }
        }
        FieldKind::Dimensions => {
            let dims = DimensionsValue::from_value(value).filter(|d| !d.is_empty())?;
            let side = |v: &Option<String>| Some(v.clone().unwrap_or_else(|| "0".to_string()));
            match slot {
                Placeholder::Top => side(&dims.top),
                Placeholder::Right => side(&dims.right),
                Placeholder::Bottom => side(&dims.bottom),
                Placeholder::Left => side(&dims.left),
                Placeholder::Unit => Some(dims.unit.clone().unwrap_or_else(|| unit.to_string())),
                Placeholder::Value => dims.shorthand(unit),
                Placeholder::Size => None,
            }
        }
        FieldKind::Url => match slot {
            Placeholder::Value => url_value(value)
                .map(|u| css_url(&u))
                .filter(|u| !u.is_empty()),
            _ => None,
        },
        _ => match slot {
            Placeholder::Value => value_text(value)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty() && is_css_safe(v)),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::default_args::WidgetKind;
    use crate::schema::{SectionSpec, StyleTarget, TitleBinding, spacing_controls};
    use serde_json::json;

    const W: &str = ".elementor-element-abc";

    fn schema() -> WidgetSchema {
        WidgetSchema::builder(
            "test-widget",
            TitleBinding::new(WidgetKind::Search, "tag", "icon_on", "icon", "pos"),
        )
        .section(
            SectionSpec::content("general", "General")
                .field(
                    FieldSpec::new("tag", FieldKind::Select, "Tag")
                        .options(&[("h2", "H2"), ("h5", "H5")])
                        .default_value(json!("h5")),
                )
                .field(FieldSpec::new("icon_on", FieldKind::Switch, "Icon").default_value(json!("")))
                .field(
                    FieldSpec::new("icon", FieldKind::Icon, "Icon")
                        .default_value(json!({"value": "fas fa-star", "library": "solid"}))
                        .when("icon_on", "yes"),
                )
                .field(
                    FieldSpec::new("align", FieldKind::Select, "Alignment")
                        .options(&[("left", "Left"), ("center", "Center")])
                        .default_value(json!("center"))
                        .rule("{{WRAPPER}} .title", "text-align: {{VALUE}};"),
                ),
        )
        .style_section(
            SectionSpec::style("style_title", "Title"),
            vec![
                FieldSpec::new("icon_size", FieldKind::Slider, "Icon size")
                    .units(&["px"])
                    .default_value(json!({"size": 20, "unit": "px"}))
                    .when("icon_on", "yes")
                    .rule("{{WRAPPER}} .icon", "height: {{SIZE}}{{UNIT}}; width: {{SIZE}}{{UNIT}};"),
            ]
            .into_iter()
            .chain(spacing_controls("style_title", "title"))
            .collect(),
            StyleTarget::new("title"),
        )
        .build()
    }

    fn resolve(snapshot: SettingsSnapshot) -> RenderArgs {
        Resolver::default().resolve(&schema(), &snapshot)
    }

    #[test]
    fn test_empty_snapshot_resolves_defaults() {
        let args = resolve(SettingsSnapshot::new("abc"));
        assert!(args.before_title_html.starts_with("<h5 "));
        assert_eq!(args.after_title_html, "</h5>");
        assert_eq!(args.after_widget_html, "</div>");
        let title = args
            .resolved_css_rules
            .declarations(&format!("{} .title", W), Breakpoint::Desktop);
        assert_eq!(title[0], "text-align: center");
        // Transition duration always has a default.
        assert!(title.iter().any(|d| d.starts_with("transition: color 0s")));
    }

    #[test]
    fn test_condition_gates_rules() {
        let selector = format!("{} .icon", W);

        let off = resolve(SettingsSnapshot::new("abc"));
        assert!(off
            .resolved_css_rules
            .declarations(&selector, Breakpoint::Desktop)
            .is_empty());
        assert!(!off.before_title_html.contains("fa-star"));

        let on = resolve(SettingsSnapshot::new("abc").with("icon_on", json!("yes")));
        assert_eq!(
            on.resolved_css_rules
                .declarations(&selector, Breakpoint::Desktop),
            ["height: 20px", "width: 20px"]
        );
        assert!(on.before_title_html.contains("fa-star"));
    }

    #[test]
    fn test_slider_without_size_renders_zero() {
        let args = resolve(
            SettingsSnapshot::new("abc")
                .with("icon_on", json!("yes"))
                .with("icon_size", json!({"unit": ""})),
        );
        assert_eq!(
            args.resolved_css_rules
                .declarations(&format!("{} .icon", W), Breakpoint::Desktop),
            ["height: 0px", "width: 0px"]
        );
    }

    #[test]
    fn test_garbage_snapshot_does_not_crash() {
        let garbage = SettingsSnapshot::from_json(json!({
            "element_id": "abc",
            "settings": {
                "tag": {"nested": true},
                "icon_on": [1, 2],
                "icon": "not an object",
                "align": 42,
                "icon_size": null,
                "style_title_margin": "10px",
                "style_title_typography": {"font_size": "huge"},
                "style_title_border_normal": 7
            }
        }));
        let args = resolve(garbage);
        assert_eq!(args.after_title_html, "</h5>");
        assert!(args.before_widget_html.starts_with("<div "));
        // An out-of-range select falls back to its default.
        assert!(args
            .resolved_css_rules
            .declarations(&format!("{} .title", W), Breakpoint::Desktop)
            .contains(&"text-align: center".to_string()));
    }

    #[test]
    fn test_responsive_cascade() {
        let args = resolve(SettingsSnapshot::new("abc").with(
            "style_title_margin",
            json!({"top": "1", "right": "2", "bottom": "3", "left": "4", "unit": "px"}),
        ));
        let styles = &args.resolved_css_rules;
        let selector = format!("{} .title", W);

        let desktop = styles.effective(&selector, Breakpoint::Desktop);
        assert!(desktop.contains(&"margin: 1px 2px 3px 4px !important".to_string()));
        assert_eq!(styles.effective(&selector, Breakpoint::Tablet), desktop);
        assert_eq!(styles.effective(&selector, Breakpoint::Mobile), desktop);
        assert!(styles.declarations(&selector, Breakpoint::Tablet).is_empty());
    }

    #[test]
    fn test_responsive_override() {
        let args = resolve(
            SettingsSnapshot::new("abc")
                .with("style_title_margin", json!({"top": "10", "unit": "px"}))
                .with("style_title_margin_mobile", json!({"top": "2", "unit": "px"})),
        );
        let styles = &args.resolved_css_rules;
        let selector = format!("{} .title", W);

        assert!(styles
            .effective(&selector, Breakpoint::Tablet)
            .contains(&"margin: 10px 0px 0px 0px !important".to_string()));
        let mobile = styles.effective(&selector, Breakpoint::Mobile);
        assert!(mobile.contains(&"margin: 2px 0px 0px 0px !important".to_string()));
        assert!(!mobile.contains(&"margin: 10px 0px 0px 0px !important".to_string()));

        let css = styles.to_css(&BreakpointsConfig::default());
        assert!(css.contains("@media (max-width: 767px) {\n    .elementor-element-abc .title {\n        margin: 2px 0px 0px 0px !important;\n    }\n}\n"));
    }

    #[test]
    fn test_empty_dimensions_are_skipped() {
        let args = resolve(
            SettingsSnapshot::new("abc")
                .with("style_title_padding", json!({"top": "", "right": "", "unit": "px"})),
        );
        assert!(!args
            .resolved_css_rules
            .effective(&format!("{} .title", W), Breakpoint::Desktop)
            .iter()
            .any(|d| d.starts_with("padding")));
    }

    #[test]
    fn test_group_fields_emit_declarations() {
        let args = resolve(
            SettingsSnapshot::new("abc")
                .with("style_title_typography", json!({"font_weight": "700"}))
                .with("style_title_normal_text_color", json!("#333")),
        );
        let declarations = args
            .resolved_css_rules
            .declarations(&format!("{} .title", W), Breakpoint::Desktop);
        assert!(declarations.contains(&"font-weight: 700".to_string()));
        assert!(declarations.contains(&"color: #333 !important".to_string()));
    }

    #[test]
    fn test_wrapper_is_derived_without_element_id() {
        let schema = schema();
        let snapshot = SettingsSnapshot::new("").with("tag", json!("h2"));
        let a = Resolver::wrapper_for(&schema, &snapshot);
        let b = Resolver::wrapper_for(&schema, &snapshot);
        assert_eq!(a, b);
        assert!(a.as_str().starts_with(".elementor-element-"));
    }

    #[test]
    fn test_split_declarations_respects_parentheses() {
        assert_eq!(
            split_declarations("background-image: url(\"a;b.png\"); color: red;"),
            vec!["background-image: url(\"a;b.png\")", "color: red"]
        );
        assert!(split_declarations(" ; ;").is_empty());
    }
}
