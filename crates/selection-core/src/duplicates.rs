//! Detection of standalone plugins whose functionality the bundle already
//! provides.
//!
//! A standalone plugin lives at `<slug>-elementor/<file>.php`. When the
//! bundle has the feature `<slug>` switched on, the standalone plugin is
//! redundant and the admin is told so.

use serde::Serialize;
use tracing::{debug, info};

use crate::admin::Screen;
use crate::config::{AdminConfig, FeaturesConfig};
use crate::html::{esc_html, ucfirst};

/// Marker identifying standalone page-builder plugins.
pub const MARKER: &str = "-elementor";

/// Redundant feature keys, in first-seen order, without repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DuplicateSet {
    keys: Vec<String>,
}

impl DuplicateSet {
    fn insert(&mut self, key: String) {
        if !self.keys.contains(&key) {
            self.keys.push(key);
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Display names, e.g. `Rss for Elementor`.
    pub fn plugin_names(&self) -> Vec<String> {
        self.keys
            .iter()
            .map(|key| format!("{} for Elementor", ucfirst(key)))
            .collect()
    }
}

/// Feature key a plugin path would duplicate, if it looks like a
/// standalone page-builder plugin.
pub fn candidate(plugin_path: &str) -> Option<String> {
    let slug = plugin_path.split('/').next().unwrap_or_default();
    match slug.find(MARKER) {
        Some(pos) if pos > 0 => Some(slug.replace(MARKER, "")),
        _ => None,
    }
}

/// Active plugins whose feature is switched on in the bundle.
pub fn detect<S: AsRef<str>>(active_plugins: &[S], features: &FeaturesConfig) -> DuplicateSet {
    let mut set = DuplicateSet::default();
    for path in active_plugins {
        let Some(key) = candidate(path.as_ref()) else {
            continue;
        };
        if features.is_on(&key) {
            debug!("Plugin '{}' duplicates feature '{}'", path.as_ref(), key);
            set.insert(key);
        }
    }
    set
}

/// Screen-gated duplicate scan for one admin page load.
#[derive(Debug, Clone)]
pub struct DuplicateScan<'a> {
    admin: &'a AdminConfig,
}

impl<'a> DuplicateScan<'a> {
    pub fn new(admin: &'a AdminConfig) -> Self {
        Self { admin }
    }

    /// Scan only on the configured screens; elsewhere yield nothing.
    pub fn run<S: AsRef<str>>(
        &self,
        screen: Option<&Screen>,
        active_plugins: &[S],
        features: &FeaturesConfig,
    ) -> DuplicateSet {
        let Some(screen) = screen else {
            return DuplicateSet::default();
        };
        if !screen.is_duplicate_scan(self.admin) {
            debug!("Screen '{}' is not scanned for duplicates", screen.id);
            return DuplicateSet::default();
        }

        let set = detect(active_plugins, features);
        if !set.is_empty() {
            info!("Found {} redundant plugin(s): {}", set.len(), set.keys().join(", "));
        }
        set
    }
}

const MESSAGE: &str = "already uses the functionality of these plugins: ";

/// Dismissible admin notice, or nothing when there are no duplicates.
pub fn notice_html(set: &DuplicateSet) -> String {
    if set.is_empty() {
        return String::new();
    }
    format!(
        concat!(
            r#"<div class="notice notice-warning is-dismissible"><p>"#,
            "<strong>Selection</strong> {}<strong>{}</strong>. ",
            "You can safely deactivate these plugins.</p></div>"
        ),
        MESSAGE,
        esc_html(&set.plugin_names().join(", "))
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnackbarAction {
    pub caption: String,
    pub link: String,
}

/// Settings-page snackbar payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snackbar {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Milliseconds; `-1` keeps it open until closed.
    pub timeout: i32,
    pub closable: bool,
    pub actions: Vec<SnackbarAction>,
}

pub fn snackbar(set: &DuplicateSet, site_url: &str) -> Option<Snackbar> {
    if set.is_empty() {
        return None;
    }
    Some(Snackbar {
        message: format!("Selection {}{}", MESSAGE, set.plugin_names().join(", ")),
        kind: "warning",
        timeout: -1,
        closable: true,
        actions: vec![SnackbarAction {
            caption: "Plugins".to_string(),
            link: format!("{}/wp-admin/plugins.php", site_url.trim_end_matches('/')),
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn features() -> FeaturesConfig {
        Config::load_with_defaults("[features]\nsearch = \"off\"\nmenu = \"on\"\n")
            .unwrap()
            .features
    }

    #[test]
    fn test_candidate() {
        assert_eq!(candidate("rss-elementor/rss.php").as_deref(), Some("rss"));
        assert_eq!(
            candidate("menu-elementor-elementor/x.php").as_deref(),
            Some("menu")
        );
        assert_eq!(candidate("-elementor/x.php"), None);
        assert_eq!(candidate("elementor/elementor.php"), None);
        assert_eq!(candidate("akismet/akismet.php"), None);
        assert_eq!(candidate(""), None);
    }

    #[test]
    fn test_detect_requires_feature_on() {
        let active = [
            "rss-elementor/rss-elementor.php",
            "search-elementor/search-elementor.php",
            "calendar-elementor/calendar.php",
            "elementor/elementor.php",
        ];
        let set = detect(&active, &features());
        assert_eq!(set.keys(), ["rss"]);
    }

    #[test]
    fn test_detect_collapses_repeats_in_first_seen_order() {
        let active = [
            "rss-elementor/a.php",
            "menu-elementor/menu.php",
            "rss-elementor/b.php",
        ];
        let set = detect(&active, &features());
        assert_eq!(set.keys(), ["rss", "menu"]);
        assert_eq!(set.plugin_names(), ["Rss for Elementor", "Menu for Elementor"]);
    }

    #[test]
    fn test_empty_inputs() {
        let none: [&str; 0] = [];
        assert!(detect(&none, &features()).is_empty());
        assert!(detect(&["rss-elementor/a.php"], &FeaturesConfig::default()).is_empty());
    }

    #[test]
    fn test_scan_is_screen_gated() {
        let admin = AdminConfig::default();
        let scan = DuplicateScan::new(&admin);
        let active = ["rss-elementor/a.php"];

        let plugins = Screen::new("plugins", "plugins");
        assert_eq!(scan.run(Some(&plugins), &active, &features()).len(), 1);

        let dashboard = Screen::new("dashboard", "dashboard");
        assert!(scan.run(Some(&dashboard), &active, &features()).is_empty());
        assert!(scan.run(None, &active, &features()).is_empty());
    }

    #[test]
    fn test_notice_and_snackbar() {
        let set = detect(&["rss-elementor/a.php", "menu-elementor/b.php"], &features());
        assert_eq!(
            notice_html(&set),
            concat!(
                r#"<div class="notice notice-warning is-dismissible"><p><strong>Selection</strong> "#,
                "already uses the functionality of these plugins: ",
                "<strong>Rss for Elementor, Menu for Elementor</strong>. ",
                "You can safely deactivate these plugins.</p></div>"
            )
        );

        let bar = snackbar(&set, "https://example.com/").unwrap();
        assert_eq!(
            bar.message,
            "Selection already uses the functionality of these plugins: Rss for Elementor, Menu for Elementor"
        );
        assert_eq!(bar.actions[0].link, "https://example.com/wp-admin/plugins.php");

        assert_eq!(notice_html(&DuplicateSet::default()), "");
        assert!(snackbar(&DuplicateSet::default(), "https://example.com").is_none());
    }
}
