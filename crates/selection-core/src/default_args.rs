//! Wrapper markup shared by all widgets.
//!
//! Every widget is rendered inside the same box/title scaffolding; only
//! the kind name, title tag, optional icon and a few wrapper classes vary.

use serde::Serialize;
use serde_json::Value;

use crate::html::{esc_attr, esc_url};

/// Tags allowed for widget titles.
pub const VALID_TITLE_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "div", "span", "p"];

/// Tag used when the configured title tag is not allowed.
pub const FALLBACK_TITLE_TAG: &str = "h5";

/// Icon positions offered by the title icon controls.
pub const VALID_ICON_POSITIONS: &[&str] = &[
    "before",
    "after",
    "above-left",
    "above-center",
    "above-right",
    "under-left",
    "under-center",
    "under-right",
];

const FALLBACK_ICON_POSITION: &str = "before";

/// Widget kinds, as used in wrapper class names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    NavMenu,
    RssFeed,
    Search,
}

impl WidgetKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NavMenu => "nav-menu",
            Self::RssFeed => "rss-feed",
            Self::Search => "search",
        }
    }
}

/// A title icon setting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IconSpec {
    #[default]
    None,
    /// Icon font class list, e.g. `fas fa-star`.
    Font { class: String, library: String },
    /// Uploaded vector icon.
    Svg { url: String },
}

impl IconSpec {
    /// Read `{value, library}`; `library == "svg"` means `value` is `{url, id}`.
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::None;
        };
        let library = map
            .get("library")
            .and_then(Value::as_str)
            .unwrap_or_default();

        match (library, map.get("value")) {
            ("svg", Some(Value::Object(svg))) => svg
                .get("url")
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty())
                .map(|url| Self::Svg {
                    url: url.to_string(),
                })
                .unwrap_or(Self::None),
            (_, Some(Value::String(class))) if !class.trim().is_empty() => Self::Font {
                class: class.trim().to_string(),
                library: library.to_string(),
            },
            _ => Self::None,
        }
    }

    fn markup(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::Font { class, .. } => Some(format!(r#"<i class="{}"></i>"#, esc_attr(class))),
            Self::Svg { url } => {
                let url = esc_url(url);
                (!url.is_empty()).then(|| {
                    format!(
                        r#"<img class="mdp-widgeter-elementor-svg-icon" src="{}" alt="" />"#,
                        url
                    )
                })
            }
        }
    }
}

/// Title icon fragment; empty when disabled or when there is no icon.
pub fn title_icon(icon: &IconSpec, enabled: bool) -> String {
    if !enabled {
        return String::new();
    }
    icon.markup()
        .map(|markup| format!(r#"<div class="mdp-widgeter-elementor-title-icon">{}</div>"#, markup))
        .unwrap_or_default()
}

/// The allowed tag, or the `h5` fallback.
pub fn title_tag_or_fallback(tag: &str) -> &str {
    if VALID_TITLE_TAGS.contains(&tag) {
        tag
    } else {
        FALLBACK_TITLE_TAG
    }
}

fn icon_position_or_fallback(position: &str) -> &str {
    if VALID_ICON_POSITIONS.contains(&position) {
        position
    } else {
        FALLBACK_ICON_POSITION
    }
}

/// Inputs of `build_default_args`.
#[derive(Debug, Clone)]
pub struct DefaultArgsInput<'a> {
    pub kind: WidgetKind,
    pub title_tag: &'a str,
    pub icon_enabled: bool,
    pub icon: &'a IconSpec,
    pub icon_position: &'a str,
    /// Extra class on the widget box (may be empty).
    pub extra_wrapper_class: &'a str,
    /// Complete replacement for the opening box markup (may be empty).
    pub wrapper_override: &'a str,
}

impl<'a> DefaultArgsInput<'a> {
    pub fn new(kind: WidgetKind, title_tag: &'a str, icon: &'a IconSpec) -> Self {
        Self {
            kind,
            title_tag,
            icon_enabled: false,
            icon,
            icon_position: FALLBACK_ICON_POSITION,
            extra_wrapper_class: "",
            wrapper_override: "",
        }
    }
}

/// Markup placed around a widget and its title.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DefaultArgs {
    pub before_widget: String,
    pub after_widget: String,
    pub before_title: String,
    pub after_title: String,
}

/// Build the wrapper/title markup for one widget render.
///
/// An unknown title tag falls back to `h5`. `after_title` always closes
/// the tag opened by `before_title`.
pub fn build_default_args(input: &DefaultArgsInput<'_>) -> DefaultArgs {
    let kind = input.kind.as_str();
    let tag = title_tag_or_fallback(input.title_tag);
    let position = icon_position_or_fallback(input.icon_position);

    let before_widget = if input.wrapper_override.trim().is_empty() {
        let mut classes = vec![
            "mdp-widgeter-elementor-box".to_string(),
            format!("mdp-widgeter-{}-elementor-box", kind),
        ];
        let extra = input.extra_wrapper_class.trim();
        if !extra.is_empty() {
            classes.push(esc_attr(extra));
        }
        if input.kind == WidgetKind::RssFeed && input.icon_enabled {
            classes.push("mdp-widgeter-disable-default-icon".to_string());
        }
        format!(r#"<div class="{}">"#, classes.join(" "))
    } else {
        input.wrapper_override.to_string()
    };

    let before_title = format!(
        r#"<{tag} class="mdp-widgeter-elementor-title-wrapper mdp-widgeter-title mdp-widgeter-{kind}-title mdp-widgeter-elementor-icon-position-{position}">{icon}"#,
        icon = title_icon(input.icon, input.icon_enabled),
    );

    DefaultArgs {
        before_widget,
        after_widget: "</div>".to_string(),
        before_title,
        after_title: format!("</{}>", tag),
    }
}

/// Opening box markup for the navigation menu, carrying orientation and
/// alignment classes.
pub fn orientation_wrapper(kind: WidgetKind, orientation: &str, alignment: &str) -> String {
    format!(
        r#"<div class="mdp-widgeter-elementor-box mdp-widgeter-{}-elementor-box mdp-widgeter-elementor-orientation-{} mdp-widgeter-elementor-alignment-{}">"#,
        kind.as_str(),
        esc_attr(orientation),
        esc_attr(alignment)
    )
}
