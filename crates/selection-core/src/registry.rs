//! Widget registration.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::widgets::{
    FEATURES, WIDGET_CATEGORY, WIDGET_CATEGORY_ICON, WIDGET_CATEGORY_TITLE, Widget, WidgetFactory,
};

/// Builder panel category the widgets are listed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetCategory {
    pub slug: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
}

/// Widgets enabled for this site, constructed once and shared read-only.
#[derive(Clone)]
pub struct WidgetRegistry {
    widgets: Vec<Arc<dyn Widget>>,
}

impl WidgetRegistry {
    /// Build every widget whose feature is switched on.
    pub fn new(config: &Config) -> Self {
        let widgets: Vec<Arc<dyn Widget>> = FEATURES
            .iter()
            .filter(|feature| {
                let on = config.features.is_on(feature);
                if !on {
                    debug!("Feature '{}' is off, skipping its widget", feature);
                }
                on
            })
            .filter_map(|feature| WidgetFactory::build(feature))
            .collect();

        info!("Registered {} widget(s)", widgets.len());
        Self { widgets }
    }

    pub fn from_widgets(widgets: Vec<Arc<dyn Widget>>) -> Self {
        Self { widgets }
    }

    pub fn category() -> WidgetCategory {
        WidgetCategory {
            slug: WIDGET_CATEGORY,
            title: WIDGET_CATEGORY_TITLE,
            icon: WIDGET_CATEGORY_ICON,
        }
    }

    /// Look a widget up by name or by feature key.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Widget>> {
        self.widgets
            .iter()
            .find(|w| w.name() == name || w.feature() == name)
            .cloned()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Widget>> {
        self.widgets.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.widgets.iter().map(|w| w.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("widgets", &self.names())
            .finish()
    }
}
