//! Parameterized style-control generators.
//!
//! Every style section of every widget is built from the same two
//! generators: `spacing_controls` (margin + padding) and `style_controls`
//! (typography followed by Normal / Hover / optional Active tabs). A
//! `StyleTarget` names the classes the generated rules apply to and which
//! control families to include.

use serde::Serialize;
use serde_json::json;

use super::field::{FieldKind, FieldSpec, StyleState};
use super::selector::{SelectorTemplate, WRAPPER_PLACEHOLDER};

const DIMENSION_UNITS: &[&str] = &["px", "%", "em"];

const BORDER_RADIUS: &str =
    "border-radius: {{TOP}}{{UNIT}} {{RIGHT}}{{UNIT}} {{BOTTOM}}{{UNIT}} {{LEFT}}{{UNIT}};";

const TRANSITION: &str = "transition: color {{SIZE}}{{UNIT}}, background {{SIZE}}{{UNIT}}, \
box-shadow {{SIZE}}{{UNIT}}, border-radius {{SIZE}}{{UNIT}}, border {{SIZE}}{{UNIT}}, \
filter {{SIZE}}{{UNIT}}, stroke {{SIZE}}{{UNIT}};";

/// Secondary color control (e.g. the title icon color).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryColor {
    pub name: String,
    pub class: String,
    pub hover_class: String,
    pub active_class: String,
}

/// Secondary background color control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecondaryBackground {
    pub name: String,
    pub class: String,
}

/// Which element a style section targets, and which controls it offers.
///
/// `StyleTarget::new` fills every option with its default once; the
/// builder methods override individual options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleTarget {
    pub html_class: String,
    pub active_class: String,
    pub typography_class: String,
    pub typography_name: String,
    pub color_prefix: String,
    pub color_class: String,
    pub color_hover_class: String,
    pub color_active_class: String,
    pub include_color: bool,
    pub include_background: bool,
    pub include_border: bool,
    pub include_box_shadow: bool,
    pub include_typography: bool,
    pub include_transition: bool,
    pub include_active_tab: bool,
    pub active_tab_name: String,
    pub secondary_color: Option<SecondaryColor>,
    pub secondary_background: Option<SecondaryBackground>,
    /// Extra selector (with its own `{{WRAPPER}}`) receiving the normal border radius.
    pub extra_border_radius_selector: String,
    /// Extra selector receiving the hover border radius.
    pub extra_border_radius_hover_selector: String,
    /// Extra selector receiving the hover transition.
    pub extra_transition_selector: String,
}

impl StyleTarget {
    /// Target `html_class` with default options: every family except the
    /// active tab, and color/typography classes following `html_class`.
    pub fn new(html_class: &str) -> Self {
        Self {
            html_class: html_class.to_string(),
            active_class: String::new(),
            typography_class: html_class.to_string(),
            typography_name: "Typography".to_string(),
            color_prefix: String::new(),
            color_class: html_class.to_string(),
            color_hover_class: format!("{}:hover", html_class),
            color_active_class: String::new(),
            include_color: true,
            include_background: true,
            include_border: true,
            include_box_shadow: true,
            include_typography: true,
            include_transition: true,
            include_active_tab: false,
            active_tab_name: "FOCUS".to_string(),
            secondary_color: None,
            secondary_background: None,
            extra_border_radius_selector: String::new(),
            extra_border_radius_hover_selector: String::new(),
            extra_transition_selector: String::new(),
        }
    }

    pub fn typography_class(mut self, class: &str) -> Self {
        self.typography_class = class.to_string();
        self
    }

    pub fn color_classes(mut self, normal: &str, hover: &str) -> Self {
        self.color_class = normal.to_string();
        self.color_hover_class = hover.to_string();
        self
    }

    /// Enable the active-state tab for `active_class`.
    pub fn active(mut self, tab_name: &str, active_class: &str, color_active_class: &str) -> Self {
        self.include_active_tab = true;
        self.active_tab_name = tab_name.to_string();
        self.active_class = active_class.to_string();
        self.color_active_class = color_active_class.to_string();
        self
    }

    pub fn without_color(mut self) -> Self {
        self.include_color = false;
        self
    }

    pub fn without_typography(mut self) -> Self {
        self.include_typography = false;
        self
    }

    pub fn without_background(mut self) -> Self {
        self.include_background = false;
        self
    }

    pub fn without_border(mut self) -> Self {
        self.include_border = false;
        self
    }

    pub fn without_transition(mut self) -> Self {
        self.include_transition = false;
        self
    }

    pub fn secondary_color(mut self, color: SecondaryColor) -> Self {
        self.secondary_color = Some(color);
        self
    }

    pub fn secondary_background(mut self, background: SecondaryBackground) -> Self {
        self.secondary_background = Some(background);
        self
    }

    pub fn extra_transition_selector(mut self, selector: &str) -> Self {
        self.extra_transition_selector = selector.to_string();
        self
    }

    pub fn extra_border_radius(mut self, normal: &str, hover: &str) -> Self {
        self.extra_border_radius_selector = normal.to_string();
        self.extra_border_radius_hover_selector = hover.to_string();
        self
    }
}

/// Turn a display name into a key fragment (`"Icon color"` -> `"icon_color"`).
fn slug(name: &str) -> String {
    let mut out = String::new();
    for ch in name.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

fn class_selector(class: &str) -> String {
    format!("{} .{}", WRAPPER_PLACEHOLDER, class)
}

fn dimensions_template(property: &str, important: bool) -> String {
    format!(
        "{}: {{{{TOP}}}}{{{{UNIT}}}} {{{{RIGHT}}}}{{{{UNIT}}}} {{{{BOTTOM}}}}{{{{UNIT}}}} {{{{LEFT}}}}{{{{UNIT}}}}{};",
        property,
        if important { " !important" } else { "" }
    )
}

/// Responsive margin and padding controls for `html_class`.
pub fn spacing_controls(section_id: &str, html_class: &str) -> Vec<FieldSpec> {
    vec![
        margin_control(section_id, html_class),
        padding_control(section_id, html_class),
    ]
}

/// Responsive margin control alone.
pub fn margin_control(section_id: &str, html_class: &str) -> FieldSpec {
    FieldSpec::new(format!("{}_margin", section_id), FieldKind::Dimensions, "Margin")
        .units(DIMENSION_UNITS)
        .responsive()
        .rule(&class_selector(html_class), &dimensions_template("margin", true))
}

/// Responsive padding control alone.
pub fn padding_control(section_id: &str, html_class: &str) -> FieldSpec {
    FieldSpec::new(format!("{}_padding", section_id), FieldKind::Dimensions, "Padding")
        .units(DIMENSION_UNITS)
        .responsive()
        .rule(&class_selector(html_class), &dimensions_template("padding", true))
}

/// Typography plus Normal / Hover / optional Active tab controls.
pub fn style_controls(section_id: &str, target: &StyleTarget) -> Vec<FieldSpec> {
    let mut fields = Vec::new();
    let id = section_id;

    if target.include_typography {
        fields.push(
            FieldSpec::new(
                format!("{}_typography", id),
                FieldKind::Typography,
                target.typography_name.as_str(),
            )
            .group(SelectorTemplate::class(&target.typography_class, "")),
        );
    }

    // Normal
    let normal = StyleState::Normal;
    if target.include_color {
        fields.push(color_field(
            format!("{}_normal_text_color", id),
            format!("{}Color", target.color_prefix),
            &target.color_class,
            normal,
        ));
    }
    if let Some(secondary) = &target.secondary_color {
        fields.push(color_field(
            format!("{}_{}_normal_text_color", id, slug(&secondary.name)),
            secondary.name.clone(),
            &secondary.class,
            normal,
        ));
    }
    if target.include_background {
        fields.push(
            FieldSpec::new(
                format!("{}_normal_background", id),
                FieldKind::Background,
                "Background type",
            )
            .state(normal)
            .group(SelectorTemplate::class(&target.html_class, "")),
        );
        if let Some(secondary) = &target.secondary_background {
            fields.push(
                FieldSpec::new(
                    format!("{}_{}_normal_background_color", id, slug(&secondary.name)),
                    FieldKind::Color,
                    secondary.name.as_str(),
                )
                .state(normal)
                .rule(&class_selector(&secondary.class), "background: {{VALUE}} !important;"),
            );
        }
    }
    fields.push(FieldSpec::new(format!("{}_separate_normal", id), FieldKind::Divider, "").state(normal));
    if target.include_border {
        fields.push(border_field(format!("{}_border_normal", id), &target.html_class, "", normal));
    }
    fields.push(
        radius_field(format!("{}_border_radius_normal", id), &target.html_class, "", normal)
            .rule(&target.extra_border_radius_selector, BORDER_RADIUS),
    );
    if target.include_box_shadow {
        fields.push(shadow_field(format!("{}_box_shadow_normal", id), &target.html_class, "", normal));
    }

    // Hover
    let hover = StyleState::Hover;
    if target.include_color {
        fields.push(color_field(
            format!("{}_hover_color", id),
            format!("{}Color", target.color_prefix),
            &target.color_hover_class,
            hover,
        ));
    }
    if let Some(secondary) = &target.secondary_color {
        fields.push(color_field(
            format!("{}_{}_hover_text_color", id, slug(&secondary.name)),
            secondary.name.clone(),
            &secondary.hover_class,
            hover,
        ));
    }
    if target.include_background {
        fields.push(
            FieldSpec::new(
                format!("{}_background_hover", id),
                FieldKind::Background,
                "Background type",
            )
            .state(hover)
            .group(SelectorTemplate::class(&target.html_class, ":hover")),
        );
        if let Some(secondary) = &target.secondary_background {
            fields.push(
                FieldSpec::new(
                    format!("{}_{}_hover_background_color", id, slug(&secondary.name)),
                    FieldKind::Color,
                    secondary.name.as_str(),
                )
                .state(hover)
                .rule(
                    &format!("{}:hover", class_selector(&secondary.class)),
                    "background: {{VALUE}} !important;",
                ),
            );
        }
    }
    if target.include_transition {
        fields.push(
            FieldSpec::new(
                format!("{}_hover_transition", id),
                FieldKind::Slider,
                "Hover transition duration",
            )
            .units(&["s"])
            .range("s", 0.1, 5.0, 0.1)
            .default_value(json!({"unit": "s", "size": 0}))
            .state(hover)
            .rule(&class_selector(&target.html_class), TRANSITION)
            .rule(&target.extra_transition_selector, TRANSITION),
        );
    }
    fields.push(FieldSpec::new(format!("{}_separate_hover", id), FieldKind::Divider, "").state(hover));
    if target.include_border {
        fields.push(border_field(format!("{}_border_hover", id), &target.html_class, ":hover", hover));
    }
    fields.push(
        radius_field(format!("{}_border_radius_hover", id), &target.html_class, ":hover", hover)
            .rule(&target.extra_border_radius_hover_selector, BORDER_RADIUS),
    );
    if target.include_box_shadow {
        fields.push(shadow_field(format!("{}_box_shadow_hover", id), &target.html_class, ":hover", hover));
    }

    // Active
    if target.include_active_tab {
        let active = StyleState::Active;
        if target.include_color {
            fields.push(color_field(
                format!("{}_active_color", id),
                format!("{}Color", target.color_prefix),
                &target.color_active_class,
                active,
            ));
        }
        if let Some(secondary) = &target.secondary_color {
            fields.push(color_field(
                format!("{}_{}_active_text_color", id, slug(&secondary.name)),
                secondary.name.clone(),
                &secondary.active_class,
                active,
            ));
        }
        if target.include_background {
            fields.push(
                FieldSpec::new(
                    format!("{}_background_active", id),
                    FieldKind::Background,
                    "Background type",
                )
                .state(active)
                .group(SelectorTemplate::class(&target.active_class, "")),
            );
        }
        fields.push(FieldSpec::new(format!("{}_separate_active", id), FieldKind::Divider, "").state(active));
        if target.include_border {
            fields.push(border_field(format!("{}_border_active", id), &target.active_class, "", active));
        }
        fields.push(radius_field(format!("{}_border_radius_active", id), &target.active_class, "", active));
        if target.include_box_shadow {
            fields.push(shadow_field(format!("{}_box_shadow_active", id), &target.active_class, "", active));
        }
    }

    fields
}

fn color_field(key: String, label: String, class: &str, state: StyleState) -> FieldSpec {
    let field = FieldSpec::new(key, FieldKind::Color, label).state(state);
    if class.trim().is_empty() {
        field
    } else {
        field.rule(&class_selector(class), "color: {{VALUE}} !important;")
    }
}

fn border_field(key: String, class: &str, suffix: &str, state: StyleState) -> FieldSpec {
    FieldSpec::new(key, FieldKind::Border, "Border Type")
        .state(state)
        .group(SelectorTemplate::class(class, suffix))
}

fn shadow_field(key: String, class: &str, suffix: &str, state: StyleState) -> FieldSpec {
    FieldSpec::new(key, FieldKind::BoxShadow, "Box Shadow")
        .state(state)
        .group(SelectorTemplate::class(class, suffix))
}

fn radius_field(key: String, class: &str, suffix: &str, state: StyleState) -> FieldSpec {
    let field = FieldSpec::new(key, FieldKind::Dimensions, "Border radius")
        .units(DIMENSION_UNITS)
        .responsive()
        .state(state);
    if class.trim().is_empty() {
        field
    } else {
        field.rule(&format!("{}{}", class_selector(class), suffix), BORDER_RADIUS)
    }
}
