//! Sections group fields under a content or style tab.

use serde::Serialize;

use super::field::{Condition, FieldSpec};

/// Editor tab a section lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    Content,
    Style,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionSpec {
    pub id: String,
    pub label: String,
    pub tab: Tab,
    #[serde(skip_serializing_if = "Condition::is_empty")]
    pub condition: Condition,
    pub fields: Vec<FieldSpec>,
}

impl SectionSpec {
    pub fn content(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, Tab::Content)
    }

    pub fn style(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(id, label, Tab::Style)
    }

    fn new(id: impl Into<String>, label: impl Into<String>, tab: Tab) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            tab,
            condition: Condition::default(),
            fields: Vec::new(),
        }
    }

    /// Gate the whole section on another setting.
    pub fn when(mut self, key: &str, value: &str) -> Self {
        self.condition = self.condition.and(key, value);
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldSpec>) -> Self {
        self.fields.extend(fields);
        self
    }
}
