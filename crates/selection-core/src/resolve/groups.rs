//! Declarations generated from structured group values.

use serde_json::{Map, Value};

use crate::html::{css_url, is_css_safe};
use crate::schema::FieldKind;
use crate::settings::{DimensionsValue, SliderValue, format_number, value_text};

/// Declarations for a group field, empty when the value carries nothing.
pub(super) fn declarations(kind: FieldKind, value: &Value) -> Vec<String> {
    let Some(map) = value.as_object() else {
        return Vec::new();
    };
    match kind {
        FieldKind::Typography => typography(map),
        FieldKind::Border => border(map),
        FieldKind::Background => background(map),
        FieldKind::BoxShadow => box_shadow(map),
        _ => Vec::new(),
    }
}

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(value_text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && is_css_safe(s))
}

fn slider(map: &Map<String, Value>, key: &str, default_unit: &str) -> Option<String> {
    map.get(key)
        .and_then(SliderValue::from_value)
        .and_then(|s| s.css(default_unit))
}

fn typography(map: &Map<String, Value>) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(family) = text(map, "font_family") {
        out.push(format!("font-family: \"{}\", Sans-serif", family.replace('"', "")));
    }
    if let Some(size) = slider(map, "font_size", "px") {
        out.push(format!("font-size: {}", size));
    }
    if let Some(weight) = text(map, "font_weight") {
        out.push(format!("font-weight: {}", weight));
    }
    for (key, property) in [
        ("text_transform", "text-transform"),
        ("font_style", "font-style"),
        ("text_decoration", "text-decoration"),
    ] {
        if let Some(v) = text(map, key) {
            out.push(format!("{}: {}", property, v));
        }
    }
    if let Some(line_height) = slider(map, "line_height", "em") {
        out.push(format!("line-height: {}", line_height));
    }
    if let Some(spacing) = slider(map, "letter_spacing", "px") {
        out.push(format!("letter-spacing: {}", spacing));
    }
    if let Some(spacing) = slider(map, "word_spacing", "px") {
        out.push(format!("word-spacing: {}", spacing));
    }
    out
}

fn border(map: &Map<String, Value>) -> Vec<String> {
    let Some(style) = text(map, "style") else {
        return Vec::new();
    };
    if style == "none" {
        return vec!["border-style: none".to_string()];
    }

    let mut out = vec![format!("border-style: {}", style)];
    if let Some(width) = map
        .get("width")
        .and_then(DimensionsValue::from_value)
        .and_then(|d| d.shorthand("px"))
    {
        out.push(format!("border-width: {}", width));
    }
    if let Some(color) = text(map, "color") {
        out.push(format!("border-color: {}", color));
    }
    out
}

fn background(map: &Map<String, Value>) -> Vec<String> {
    let kind = text(map, "type").unwrap_or_else(|| "classic".to_string());
    let color = text(map, "color");

    match kind.as_str() {
        "gradient" => {
            let Some(color) = color else {
                return Vec::new();
            };
            let color_b = text(map, "color_b").unwrap_or_else(|| "#f2295b".to_string());
            let stop = |key: &str, fallback: f64| {
                map.get(key)
                    .and_then(SliderValue::from_value)
                    .and_then(|s| s.size)
                    .unwrap_or(fallback)
            };
            let stops = format!(
                "{} {}%, {} {}%",
                color,
                format_number(stop("color_stop", 0.0)),
                color_b,
                format_number(stop("color_b_stop", 100.0))
            );
            let image = if text(map, "gradient_type").as_deref() == Some("radial") {
                let at = text(map, "gradient_position").unwrap_or_else(|| "center center".to_string());
                format!("radial-gradient(at {}, {})", at, stops)
            } else {
                format!(
                    "linear-gradient({}deg, {})",
                    format_number(stop("gradient_angle", 180.0)),
                    stops
                )
            };
            vec![
                "background-color: transparent".to_string(),
                format!("background-image: {}", image),
            ]
        }
        // Video backgrounds are markup; only the fallback color is CSS.
        "video" => color
            .map(|c| vec![format!("background-color: {}", c)])
            .unwrap_or_default(),
        _ => {
            let mut out = Vec::new();
            if let Some(color) = color {
                out.push(format!("background-color: {}", color));
            }
            let image = map
                .get("image")
                .and_then(|v| v.get("url"))
                .and_then(Value::as_str)
                .map(css_url)
                .filter(|url| !url.is_empty());
            if let Some(url) = image {
                out.push(format!("background-image: url(\"{}\")", url));
                for (key, property) in [
                    ("position", "background-position"),
                    ("attachment", "background-attachment"),
                    ("repeat", "background-repeat"),
                    ("size", "background-size"),
                ] {
                    if let Some(v) = text(map, key) {
                        out.push(format!("{}: {}", property, v));
                    }
                }
            }
            out
        }
    }
}

fn box_shadow(map: &Map<String, Value>) -> Vec<String> {
    if map.is_empty() {
        return Vec::new();
    }
    let px = |key: &str, fallback: f64| {
        map.get(key)
            .and_then(SliderValue::from_value)
            .and_then(|s| s.size)
            .unwrap_or(fallback)
    };
    let color = text(map, "color").unwrap_or_else(|| "rgba(0,0,0,0.5)".to_string());
    let mut shadow = format!(
        "{}px {}px {}px {}px {}",
        format_number(px("horizontal", 0.0)),
        format_number(px("vertical", 0.0)),
        format_number(px("blur", 10.0)),
        format_number(px("spread", 0.0)),
        color
    );
    if text(map, "position").as_deref() == Some("inset") {
        shadow.push_str(" inset");
    }
    vec![format!("box-shadow: {}", shadow)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typography() {
        let decls = declarations(
            FieldKind::Typography,
            &json!({
                "font_family": "Roboto",
                "font_size": {"size": 18, "unit": "px"},
                "font_weight": 600,
                "text_transform": "uppercase",
                "line_height": {"size": 1.5}
            }),
        );
        assert_eq!(
            decls,
            vec![
                "font-family: \"Roboto\", Sans-serif",
                "font-size: 18px",
                "font-weight: 600",
                "text-transform: uppercase",
                "line-height: 1.5em",
            ]
        );
    }

    #[test]
    fn test_border() {
        let decls = declarations(
            FieldKind::Border,
            &json!({"style": "solid", "width": {"top": 1, "right": 2, "bottom": 1, "left": 2, "unit": "px"}, "color": "#000"}),
        );
        assert_eq!(
            decls,
            vec![
                "border-style: solid",
                "border-width: 1px 2px 1px 2px",
                "border-color: #000"
            ]
        );
        assert_eq!(
            declarations(FieldKind::Border, &json!({"style": "none", "color": "#000"})),
            vec!["border-style: none"]
        );
        assert!(declarations(FieldKind::Border, &json!({"color": "#000"})).is_empty());
    }

    #[test]
    fn test_background_classic_and_gradient() {
        assert_eq!(
            declarations(FieldKind::Background, &json!({"color": "#fff"})),
            vec!["background-color: #fff"]
        );

        let gradient = declarations(
            FieldKind::Background,
            &json!({"type": "gradient", "color": "#000", "color_b": "#fff", "gradient_angle": {"size": 90, "unit": "deg"}}),
        );
        assert_eq!(
            gradient,
            vec![
                "background-color: transparent",
                "background-image: linear-gradient(90deg, #000 0%, #fff 100%)"
            ]
        );
    }

    #[test]
    fn test_background_image() {
        let decls = declarations(
            FieldKind::Background,
            &json!({"image": {"url": "https://example.com/a.png"}, "size": "cover"}),
        );
        assert_eq!(
            decls,
            vec![
                "background-image: url(\"https://example.com/a.png\")",
                "background-size: cover"
            ]
        );
    }

    #[test]
    fn test_box_shadow() {
        assert_eq!(
            declarations(
                FieldKind::BoxShadow,
                &json!({"horizontal": 2, "vertical": 3, "color": "red", "position": "inset"})
            ),
            vec!["box-shadow: 2px 3px 10px 0px red inset"]
        );
        assert!(declarations(FieldKind::BoxShadow, &json!({})).is_empty());
    }

    #[test]
    fn test_values_that_leave_the_declaration_are_skipped() {
        assert_eq!(
            declarations(
                FieldKind::Border,
                &json!({"style": "solid", "color": "red}*{color:red", "width": {"top": "1;x"}})
            ),
            vec!["border-style: solid"]
        );
        assert_eq!(
            declarations(
                FieldKind::Background,
                &json!({"image": {"url": "https://example.com/a.png\");}body{x:y"}})
            ),
            vec!["background-image: url(\"https://example.com/a.png%22%29%3B%7Dbody%7Bx:y\")"]
        );
    }

    #[test]
    fn test_non_object_is_empty() {
        assert!(declarations(FieldKind::Typography, &json!("Roboto")).is_empty());
        assert!(declarations(FieldKind::Color, &json!({"color": "red"})).is_empty());
    }
}
