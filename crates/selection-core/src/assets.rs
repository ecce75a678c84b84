//! Stylesheet and script handles shipped with the bundle.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::SiteConfig;
use crate::widgets::Widget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Style,
    Script,
}

impl AssetKind {
    fn extension(self) -> &'static str {
        match self {
            AssetKind::Style => "css",
            AssetKind::Script => "js",
        }
    }
}

/// A registered stylesheet or script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Asset {
    pub handle: &'static str,
    pub kind: AssetKind,
    pub url: String,
    pub deps: Vec<&'static str>,
    pub version: String,
    /// Scripts only: load in the footer.
    pub in_footer: bool,
}

/// Handle, kind, path relative to the assets base (no extension), deps.
const BUNDLED: &[(&str, AssetKind, &str, &[&str])] = &[
    ("mdp-widgeter", AssetKind::Style, "css/widgeter", &[]),
    ("mdp-widgeter", AssetKind::Script, "js/widgeter", &[]),
    ("mdp-widgeter-elementor", AssetKind::Style, "css/widgeter-elementor", &[]),
    ("mdp-widgeter-elementor-admin", AssetKind::Style, "css/elementor-admin", &[]),
    (
        "merkulov-ui",
        AssetKind::Style,
        "src/Merkulove/Unity/assets/css/merkulov-ui",
        &[],
    ),
    (
        "merkulov-ui",
        AssetKind::Script,
        "src/Merkulove/Unity/assets/js/merkulov-ui",
        &[],
    ),
    ("mdp-selection-edit", AssetKind::Style, "css/admin-edit", &[]),
    ("mdp-selection-edit", AssetKind::Script, "js/assignments", &["jquery"]),
];

/// Handles enqueued on the template editor screen.
pub const EDITOR_HANDLES: &[&str] = &["merkulov-ui", "mdp-selection-edit"];

#[derive(Debug, Clone)]
pub struct AssetRegistry {
    styles: BTreeMap<&'static str, Asset>,
    scripts: BTreeMap<&'static str, Asset>,
}

impl AssetRegistry {
    pub fn new(site: &SiteConfig) -> Self {
        let base = site.assets_url.trim_end_matches('/');
        let suffix = if site.debug_assets { "" } else { ".min" };

        let mut styles = BTreeMap::new();
        let mut scripts = BTreeMap::new();
        for &(handle, kind, path, deps) in BUNDLED {
            let asset = Asset {
                handle,
                kind,
                url: format!("{}/{}{}.{}", base, path, suffix, kind.extension()),
                deps: deps.to_vec(),
                version: site.version.clone(),
                in_footer: kind == AssetKind::Script,
            };
            match kind {
                AssetKind::Style => styles.insert(handle, asset),
                AssetKind::Script => scripts.insert(handle, asset),
            };
        }

        Self { styles, scripts }
    }

    pub fn style(&self, handle: &str) -> Option<&Asset> {
        self.styles.get(handle)
    }

    pub fn script(&self, handle: &str) -> Option<&Asset> {
        self.scripts.get(handle)
    }

    /// Styles then scripts a widget depends on, in declaration order.
    /// Handles the bundle does not ship are left to the host.
    pub fn depends_for(&self, widget: &dyn Widget) -> Vec<&Asset> {
        let styles = widget.style_depends().iter().filter_map(|h| {
            let found = self.style(h);
            if found.is_none() {
                debug!("Widget '{}': style handle '{}' is not bundled", widget.name(), h);
            }
            found
        });
        let scripts = widget.script_depends().iter().filter_map(|h| {
            let found = self.script(h);
            if found.is_none() {
                debug!("Widget '{}': script handle '{}' is not bundled", widget.name(), h);
            }
            found
        });
        styles.chain(scripts).collect()
    }

    /// Styles and scripts for the template editor screen.
    pub fn editor_assets(&self) -> Vec<&Asset> {
        let styles = EDITOR_HANDLES.iter().filter_map(|h| self.style(h));
        let scripts = EDITOR_HANDLES.iter().filter_map(|h| self.script(h));
        styles.chain(scripts).collect()
    }
}

/// `<link>` / `<script>` tag for an asset.
pub fn tag(asset: &Asset) -> String {
    let src = format!("{}?ver={}", asset.url, asset.version);
    match asset.kind {
        AssetKind::Style => format!(
            r#"<link rel="stylesheet" id="{}-css" href="{}" media="all" />"#,
            asset.handle, src
        ),
        AssetKind::Script => format!(r#"<script src="{}" id="{}-js"></script>"#, src, asset.handle),
    }
}
