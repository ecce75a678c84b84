//! Structured selector and declaration templates.
//!
//! Templates are parsed once when a schema is built. Rendering only
//! substitutes values into pre-split parts, so a rendered selector is
//! always scoped under the instance wrapper.

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;

/// Placeholder replaced by the per-instance wrapper selector.
pub const WRAPPER_PLACEHOLDER: &str = "{{WRAPPER}}";

/// Selector that scopes generated CSS to one widget instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Wrapper(String);

impl Wrapper {
    /// Wrapper for a page-builder element id (`.elementor-element-<id>`).
    pub fn for_element(element_id: &str) -> Self {
        let id: String = element_id
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        if id.is_empty() {
            return Self(format!(
                ".elementor-element-{}",
                Self::derive_element_id("element", element_id)
            ));
        }
        Self(format!(".elementor-element-{}", id))
    }

    /// Derive a stable seven-character element id from a widget name and a seed.
    pub fn derive_element_id(widget_name: &str, seed: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(widget_name.as_bytes());
        hasher.update(b":");
        hasher.update(seed.as_bytes());
        let digest = hasher.finalize();
        digest
            .iter()
            .flat_map(|b| [b >> 4, b & 0x0f])
            .take(7)
            .map(|nibble| char::from_digit(u32::from(nibble), 16).unwrap_or('0'))
            .collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Wrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SelectorPart {
    Wrapper,
    Text(String),
}

/// A CSS selector list with `{{WRAPPER}}` slots.
///
/// Every comma-separated selector in the list is scoped: one that does not
/// mention the wrapper gets it prepended as an ancestor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorTemplate {
    source: String,
    parts: Vec<SelectorPart>,
}

impl SelectorTemplate {
    /// Parse a selector template. Returns `None` for a blank template.
    pub fn parse(template: &str) -> Option<Self> {
        let scoped: Vec<String> = split_selector_list(template)
            .into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                if s.contains(WRAPPER_PLACEHOLDER) {
                    s.to_string()
                } else {
                    format!("{} {}", WRAPPER_PLACEHOLDER, s)
                }
            })
            .collect();

        if scoped.is_empty() {
            return None;
        }

        let source = scoped.join(", ");
        let mut parts = Vec::new();
        for (i, chunk) in source.split(WRAPPER_PLACEHOLDER).enumerate() {
            if i > 0 {
                parts.push(SelectorPart::Wrapper);
            }
            if !chunk.is_empty() {
                parts.push(SelectorPart::Text(chunk.to_string()));
            }
        }

        Some(Self { source, parts })
    }

    /// Template for `{{WRAPPER}} .<class>` with an optional suffix such as `:hover`.
    pub fn class(html_class: &str, suffix: &str) -> Option<Self> {
        let html_class = html_class.trim();
        if html_class.is_empty() {
            return None;
        }
        Self::parse(&format!("{} .{}{}", WRAPPER_PLACEHOLDER, html_class, suffix))
    }

    /// Substitute the wrapper into every slot.
    pub fn render(&self, wrapper: &Wrapper) -> String {
        let mut out = String::with_capacity(self.source.len() + 16);
        for part in &self.parts {
            match part {
                SelectorPart::Wrapper => out.push_str(wrapper.as_str()),
                SelectorPart::Text(text) => out.push_str(text),
            }
        }
        out
    }

    /// The normalized template text.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl Serialize for SelectorTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// Split a selector list on top-level commas (commas inside parentheses,
/// as in `:is(a, b)`, stay put).
fn split_selector_list(list: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in list.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(&list[start..]);
    out
}

/// Named value slot inside a declaration template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    Value,
    Size,
    Unit,
    Top,
    Right,
    Bottom,
    Left,
}

impl Placeholder {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "VALUE" => Self::Value,
            "SIZE" => Self::Size,
            "UNIT" => Self::Unit,
            "TOP" => Self::Top,
            "RIGHT" => Self::Right,
            "BOTTOM" => Self::Bottom,
            "LEFT" => Self::Left,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Self::Value => "VALUE",
            Self::Size => "SIZE",
            Self::Unit => "UNIT",
            Self::Top => "TOP",
            Self::Right => "RIGHT",
            Self::Bottom => "BOTTOM",
            Self::Left => "LEFT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum DeclarationPart {
    Text(String),
    Slot(Placeholder),
}

/// CSS declaration block text with `{{VALUE}}`-style slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationTemplate {
    parts: Vec<DeclarationPart>,
}

impl DeclarationTemplate {
    pub fn parse(template: &str) -> Self {
        let mut parts = Vec::new();
        let mut text = String::new();
        let mut rest = template;

        while let Some(open) = rest.find("{{") {
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                break;
            };
            let name = &after_open[..close];
            match Placeholder::from_name(name) {
                Some(slot) => {
                    text.push_str(&rest[..open]);
                    if !text.is_empty() {
                        parts.push(DeclarationPart::Text(std::mem::take(&mut text)));
                    }
                    parts.push(DeclarationPart::Slot(slot));
                }
                // Unknown names stay literal
                None => text.push_str(&rest[..open + 2 + close + 2]),
            }
            rest = &after_open[close + 2..];
        }
        text.push_str(rest);
        if !text.is_empty() {
            parts.push(DeclarationPart::Text(text));
        }

        Self { parts }
    }

    /// Placeholders used by this template.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.parts.iter().filter_map(|p| match p {
            DeclarationPart::Slot(slot) => Some(*slot),
            DeclarationPart::Text(_) => None,
        })
    }

    /// Fill every slot. Returns `None` if any slot has no value.
    pub fn render(&self, lookup: impl Fn(Placeholder) -> Option<String>) -> Option<String> {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                DeclarationPart::Text(text) => out.push_str(text),
                DeclarationPart::Slot(slot) => out.push_str(&lookup(*slot)?),
            }
        }
        Some(out)
    }

    fn source(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                DeclarationPart::Text(text) => out.push_str(text),
                DeclarationPart::Slot(slot) => {
                    out.push_str("{{");
                    out.push_str(slot.name());
                    out.push_str("}}");
                }
            }
        }
        out
    }
}

impl Serialize for DeclarationTemplate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source())
    }
}

/// One selector template paired with the declarations it receives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyleRule {
    pub selector: SelectorTemplate,
    pub declarations: DeclarationTemplate,
}

impl StyleRule {
    /// Build a rule; a blank selector yields `None`.
    pub fn new(selector: &str, declarations: &str) -> Option<Self> {
        Some(Self {
            selector: SelectorTemplate::parse(selector)?,
            declarations: DeclarationTemplate::parse(declarations),
        })
    }
}
