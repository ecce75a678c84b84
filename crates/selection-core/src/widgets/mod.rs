//! Page-builder widgets.
//!
//! Each widget owns a `WidgetSchema` built once at construction and knows
//! how to turn effective settings into a `HostWidget` call: the arguments
//! handed to the host's markup emitter alongside the resolved wrapper and
//! title markup.
//!
//! # Adding a widget
//!
//! ```ignore
//! pub struct MyWidget {
//!     schema: WidgetSchema,
//! }
//!
//! impl Widget for MyWidget {
//!     fn name(&self) -> &'static str { "mdp-widgeter-my-elementor" }
//!     fn feature(&self) -> &'static str { "my" }
//!     // ...
//! }
//! ```
//!
//! Then add the feature key to `WidgetFactory::build` and `FEATURES`.

mod emitter;
mod menu;
mod rss;
mod search;

pub use emitter::{BasicEmitter, MarkupEmitter, MenuItem};
pub use menu::NavMenuWidget;
pub use rss::RssWidget;
pub use search::SearchWidget;

use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

use crate::default_args::VALID_ICON_POSITIONS;
use crate::schema::{FieldKind, FieldSpec, SecondaryColor, StyleTarget, WidgetSchema};
use crate::settings::EffectiveSettings;

/// Category every widget is listed under.
pub const WIDGET_CATEGORY: &str = "selection-category";

/// Display name and icon of `WIDGET_CATEGORY`.
pub const WIDGET_CATEGORY_TITLE: &str = "Selection Lite";
pub const WIDGET_CATEGORY_ICON: &str = "fa fa-plug";

pub const HELP_URL: &str = "https://docs.merkulov.design/tag/widgeter";

const KEYWORDS: &[&str] = &["Merkulove", "Widgeter"];

/// Feature keys with a widget implementation, in registration order.
pub const FEATURES: &[&str] = &["menu", "rss", "search"];

/// Arguments for one host widget call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "widget", rename_all = "snake_case")]
pub enum HostWidget {
    NavMenu {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        nav_menu: Option<String>,
    },
    Rss {
        title: String,
        url: String,
        items: String,
        show_summary: bool,
        show_author: bool,
        show_date: bool,
    },
    Search {
        title: String,
    },
}

impl HostWidget {
    /// The title argument, already sanitized.
    pub fn title(&self) -> &str {
        match self {
            Self::NavMenu { title, .. } | Self::Rss { title, .. } | Self::Search { title } => {
                title
            }
        }
    }
}

/// A widget the page builder can place.
pub trait Widget: Send + Sync {
    /// Unique widget name.
    fn name(&self) -> &'static str;

    /// Label shown in the builder panel.
    fn title(&self) -> &'static str;

    fn icon(&self) -> &'static str;

    /// Feature key enabling this widget.
    fn feature(&self) -> &'static str;

    fn categories(&self) -> &'static [&'static str] {
        &[WIDGET_CATEGORY]
    }

    fn keywords(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    /// Style handles the widget needs on the page.
    fn style_depends(&self) -> &'static [&'static str] {
        &["mdp-widgeter", "mdp-widgeter-elementor-admin"]
    }

    fn script_depends(&self) -> &'static [&'static str] {
        &["mdp-widgeter"]
    }

    fn help_url(&self) -> &'static str {
        HELP_URL
    }

    fn schema(&self) -> &WidgetSchema;

    /// Build the host call from effective settings.
    fn host_call(&self, settings: &EffectiveSettings<'_>) -> HostWidget;
}

/// Serializable summary of a widget, for listings.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetInfo {
    pub name: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub feature: &'static str,
    pub categories: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub style_depends: &'static [&'static str],
    pub script_depends: &'static [&'static str],
    pub help_url: &'static str,
    pub fields: usize,
}

impl WidgetInfo {
    pub fn of(widget: &dyn Widget) -> Self {
        Self {
            name: widget.name(),
            title: widget.title(),
            icon: widget.icon(),
            feature: widget.feature(),
            categories: widget.categories(),
            keywords: widget.keywords(),
            style_depends: widget.style_depends(),
            script_depends: widget.script_depends(),
            help_url: widget.help_url(),
            fields: widget.schema().fields().count(),
        }
    }
}

/// Constructs widgets from feature keys.
pub struct WidgetFactory;

impl WidgetFactory {
    /// Build the widget for a feature key.
    ///
    /// Returns `None` if no widget provides the feature.
    pub fn build(feature: &str) -> Option<Arc<dyn Widget>> {
        match feature {
            "menu" => Some(Arc::new(NavMenuWidget::new())),
            "rss" => Some(Arc::new(RssWidget::new())),
            "search" => Some(Arc::new(SearchWidget::new())),
            _ => None,
        }
    }
}

// Controls shared by all three widgets.

const TITLE_TAG_OPTIONS: &[(&str, &str)] = &[
    ("h1", "H1"),
    ("h2", "H2"),
    ("h3", "H3"),
    ("h4", "H4"),
    ("h5", "H5"),
    ("h6", "H6"),
    ("div", "div"),
    ("span", "span"),
    ("p", "p"),
];

const ALIGN_OPTIONS: &[(&str, &str)] = &[("left", "Left"), ("center", "Center"), ("right", "Right")];

fn title_text(key: &str) -> FieldSpec {
    FieldSpec::new(key, FieldKind::Text, "Title").default_value(json!(""))
}

fn title_tag(key: &str) -> FieldSpec {
    FieldSpec::new(key, FieldKind::Select, "Title HTML Tag")
        .options(TITLE_TAG_OPTIONS)
        .default_value(json!("h5"))
}

fn title_icon_switch(key: &str) -> FieldSpec {
    FieldSpec::new(key, FieldKind::Switch, "Enable title icon").default_value(json!(""))
}

fn title_icon(key: &str, enable_key: &str) -> FieldSpec {
    FieldSpec::new(key, FieldKind::Icon, "Title icon")
        .default_value(json!({"value": "fas fa-star", "library": "solid"}))
        .when(enable_key, "yes")
}

fn icon_position(key: &str, enable_key: &str) -> FieldSpec {
    let labels = [
        "Left",
        "Right",
        "Top left",
        "Top center",
        "Top right",
        "Bottom left",
        "Bottom center",
        "Bottom right",
    ];
    let options: Vec<(&str, &str)> = VALID_ICON_POSITIONS.iter().copied().zip(labels).collect();
    FieldSpec::new(key, FieldKind::Select, "Icon position")
        .options(&options)
        .default_value(json!("before"))
        .when(enable_key, "yes")
}

fn alignment(key: &str, label: &str, default: &str) -> FieldSpec {
    FieldSpec::new(key, FieldKind::Select, label)
        .options(ALIGN_OPTIONS)
        .default_value(json!(default))
}

fn title_alignment(key: &str, default: &str) -> FieldSpec {
    alignment(key, "Title alignment", default).rule(
        "{{WRAPPER}} .mdp-widgeter-elementor-title-wrapper",
        "text-align: {{VALUE}};",
    )
}

fn width(key: &str, selector: &str) -> FieldSpec {
    FieldSpec::new(key, FieldKind::Slider, "Width")
        .units(&["px", "%"])
        .range("px", 1.0, 1000.0, 1.0)
        .range("%", 1.0, 100.0, 1.0)
        .rule(selector, "width: {{SIZE}}{{UNIT}};")
}

fn title_icon_spacing(key: &str, enable_key: &str) -> FieldSpec {
    FieldSpec::new(key, FieldKind::Dimensions, "Icon spacing")
        .units(&["px", "%", "em"])
        .responsive()
        .when(enable_key, "yes")
        .rule(
            "{{WRAPPER}} .mdp-widgeter-elementor-title-icon",
            "margin: {{TOP}}{{UNIT}} {{RIGHT}}{{UNIT}} {{BOTTOM}}{{UNIT}} {{LEFT}}{{UNIT}};",
        )
}

fn title_icon_size(key: &str, enable_key: &str) -> FieldSpec {
    FieldSpec::new(key, FieldKind::Slider, "Icon size")
        .units(&["px"])
        .range("px", 0.0, 500.0, 1.0)
        .default_value(json!({"unit": "px", "size": 20}))
        .when(enable_key, "yes")
        .rule(
            "{{WRAPPER}} .mdp-widgeter-elementor-title-icon",
            "height: {{SIZE}}{{UNIT}}; width: {{SIZE}}{{UNIT}};",
        )
        .rule(
            "{{WRAPPER}} .mdp-widgeter-elementor-title-icon i",
            "font-size: {{SIZE}}{{UNIT}};",
        )
        .rule(
            "{{WRAPPER}} .mdp-widgeter-elementor-title-icon svg",
            "height: {{SIZE}}{{UNIT}}; width: {{SIZE}}{{UNIT}};",
        )
}

/// Title style target with the icon color as secondary color.
fn title_target(title_class: &str, color_class: &str, icon_hover_class: &str) -> StyleTarget {
    StyleTarget::new(title_class)
        .typography_class(color_class)
        .color_classes(color_class, &format!("{}:hover", color_class))
        .secondary_color(SecondaryColor {
            name: "Icon color".to_string(),
            class: "mdp-widgeter-elementor-title-icon".to_string(),
            hover_class: icon_hover_class.to_string(),
            active_class: String::new(),
        })
        .extra_transition_selector("{{WRAPPER}} .mdp-widgeter-elementor-title-icon")
}
