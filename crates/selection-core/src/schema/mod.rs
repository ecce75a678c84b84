//! Declarative widget schemas.
//!
//! A `WidgetSchema` is built once when a widget is registered and is
//! read-only afterwards; concurrent renders share it behind an `Arc`.
//!
//! Submodules:
//! - `selector` - parsed selector and declaration templates
//! - `field` - field specs, kinds and conditions
//! - `section` - content/style sections
//! - `style` - the StyleTarget-driven control generators

mod field;
mod section;
mod selector;
mod style;

pub use field::{Condition, FieldKind, FieldSpec, SliderRange, StyleState};
pub use section::{SectionSpec, Tab};
pub use selector::{
    DeclarationTemplate, Placeholder, SelectorTemplate, StyleRule, WRAPPER_PLACEHOLDER, Wrapper,
};
pub use style::{
    SecondaryBackground, SecondaryColor, StyleTarget, margin_control, padding_control,
    spacing_controls, style_controls,
};

use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

use crate::default_args::WidgetKind;

/// Extra wrapper class derived from a setting, e.g. a list alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassFromSetting {
    pub key: String,
    pub prefix: String,
}

/// Full wrapper markup derived from orientation/alignment settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrientationWrapper {
    pub orientation_key: String,
    pub alignment_key: String,
}

/// Which settings feed the default-args builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleBinding {
    pub kind: WidgetKind,
    pub title_tag_key: String,
    pub icon_enabled_key: String,
    pub icon_key: String,
    pub icon_position_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_class: Option<ClassFromSetting>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapper_override: Option<OrientationWrapper>,
}

impl TitleBinding {
    pub fn new(
        kind: WidgetKind,
        title_tag_key: &str,
        icon_enabled_key: &str,
        icon_key: &str,
        icon_position_key: &str,
    ) -> Self {
        Self {
            kind,
            title_tag_key: title_tag_key.to_string(),
            icon_enabled_key: icon_enabled_key.to_string(),
            icon_key: icon_key.to_string(),
            icon_position_key: icon_position_key.to_string(),
            extra_class: None,
            wrapper_override: None,
        }
    }

    pub fn extra_class(mut self, key: &str, prefix: &str) -> Self {
        self.extra_class = Some(ClassFromSetting {
            key: key.to_string(),
            prefix: prefix.to_string(),
        });
        self
    }

    pub fn wrapper_override(mut self, orientation_key: &str, alignment_key: &str) -> Self {
        self.wrapper_override = Some(OrientationWrapper {
            orientation_key: orientation_key.to_string(),
            alignment_key: alignment_key.to_string(),
        });
        self
    }
}

/// Ordered sections plus the title binding of one widget type.
#[derive(Debug, Clone, Serialize)]
pub struct WidgetSchema {
    pub name: String,
    pub title: TitleBinding,
    pub sections: Vec<SectionSpec>,
    /// Style subject name -> target, in declaration order.
    pub style_subjects: Vec<(String, StyleTarget)>,
}

impl WidgetSchema {
    pub fn builder(name: &str, title: TitleBinding) -> SchemaBuilder {
        SchemaBuilder {
            schema: WidgetSchema {
                name: name.to_string(),
                title,
                sections: Vec::new(),
                style_subjects: Vec::new(),
            },
        }
    }

    /// All fields with their owning section, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&SectionSpec, &FieldSpec)> {
        self.sections
            .iter()
            .flat_map(|section| section.fields.iter().map(move |field| (section, field)))
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields().map(|(_, f)| f).find(|f| f.key == key)
    }

    pub fn section(&self, id: &str) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn style_subject(&self, name: &str) -> Option<&StyleTarget> {
        self.style_subjects
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, t)| t)
    }

    /// Report structural problems: duplicate keys and conditions that
    /// reference keys the schema does not declare.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();

        for (section, field) in self.fields() {
            if !seen.insert(field.key.as_str()) {
                problems.push(format!(
                    "{}: duplicate field key '{}' in section '{}'",
                    self.name, field.key, section.id
                ));
            }
        }

        let conditions = self
            .sections
            .iter()
            .map(|s| (s.id.as_str(), &s.condition))
            .chain(self.fields().map(|(_, f)| (f.key.as_str(), &f.condition)));
        for (owner, condition) in conditions {
            for key in condition.keys() {
                if !seen.contains(key) {
                    problems.push(format!(
                        "{}: '{}' is conditioned on unknown key '{}'",
                        self.name, owner, key
                    ));
                }
            }
        }

        problems
    }
}

/// Assembles a `WidgetSchema`, dropping fields whose key was already used.
pub struct SchemaBuilder {
    schema: WidgetSchema,
}

impl SchemaBuilder {
    pub fn section(mut self, section: SectionSpec) -> Self {
        self.schema.sections.push(section);
        self
    }

    /// Add a style section whose body is `leading` fields followed by the
    /// generated style controls for `target`.
    pub fn style_section(
        mut self,
        section: SectionSpec,
        leading: Vec<FieldSpec>,
        target: StyleTarget,
    ) -> Self {
        let generated = style_controls(&section.id, &target);
        self.schema
            .style_subjects
            .push((section.id.clone(), target));
        self.schema
            .sections
            .push(section.fields(leading).fields(generated));
        self
    }

    pub fn build(mut self) -> WidgetSchema {
        let name = self.schema.name.clone();
        let mut seen = HashSet::new();
        for section in &mut self.schema.sections {
            section.fields.retain(|field| {
                let fresh = seen.insert(field.key.clone());
                if !fresh {
                    warn!(
                        "Widget '{}': dropping duplicate field key '{}'",
                        name, field.key
                    );
                }
                fresh
            });
        }
        self.schema
    }
}
