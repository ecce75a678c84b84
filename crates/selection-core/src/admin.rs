//! Admin screens: which assets load where, and the custom CSS tab.

use serde::{Deserialize, Serialize};

use crate::assets::{Asset, AssetKind, AssetRegistry};
use crate::config::{AdminConfig, CustomCssConfig};
use crate::custom_css::{NONCE_FIELD, OPTION_FIELD, OPTION_NAME};
use crate::hooks::Hooks;
use crate::html::{esc_attr, esc_html, esc_textarea};

/// Code editor mode requested on screens with a code field.
pub const CODE_EDITOR_TYPE: &str = "application/x-httpd-php";

/// Class added to the editor screen's body so the bundle UI skips admin overrides.
pub const EDITOR_BODY_CLASS: &str = " mdc-disable ";

/// The admin screen being shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    pub id: String,
    pub base: String,
}

impl Screen {
    pub fn new(id: &str, base: &str) -> Self {
        Self {
            id: id.to_string(),
            base: base.to_string(),
        }
    }

    pub fn is_settings(&self, admin: &AdminConfig) -> bool {
        admin.settings_screen_bases.iter().any(|b| *b == self.base)
    }

    pub fn is_editor(&self, admin: &AdminConfig) -> bool {
        self.id == admin.editor_screen
    }

    pub fn is_duplicate_scan(&self, admin: &AdminConfig) -> bool {
        admin.duplicate_screens.iter().any(|s| *s == self.id)
    }
}

/// What a screen loads beyond core admin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScreenAssets<'a> {
    pub styles: Vec<&'a Asset>,
    pub scripts: Vec<&'a Asset>,
    pub code_editor: Option<&'static str>,
    pub body_class: &'static str,
}

pub fn screen_assets<'a>(
    screen: Option<&Screen>,
    admin: &AdminConfig,
    assets: &'a AssetRegistry,
) -> ScreenAssets<'a> {
    let Some(screen) = screen else {
        return ScreenAssets::default();
    };

    let mut out = ScreenAssets::default();
    if screen.is_settings(admin) {
        out.code_editor = Some(CODE_EDITOR_TYPE);
    }
    if screen.is_editor(admin) {
        let (styles, scripts): (Vec<&Asset>, Vec<&Asset>) = assets
            .editor_assets()
            .into_iter()
            .partition(|a| a.kind == AssetKind::Style);
        out.styles = styles;
        out.scripts = scripts;
        out.code_editor = Some(CODE_EDITOR_TYPE);
        out.body_class = EDITOR_BODY_CLASS;
    }
    out
}

/// Append the screen's body class to the host's list.
pub fn admin_body_class(classes: &str, screen_assets: &ScreenAssets<'_>) -> String {
    format!("{}{}", classes, screen_assets.body_class)
}

/// The "Custom CSS" settings tab.
#[derive(Debug, Clone)]
pub struct CustomCssTab<'a> {
    config: &'a CustomCssConfig,
    hooks: &'a Hooks,
}

impl<'a> CustomCssTab<'a> {
    pub fn new(config: &'a CustomCssConfig, hooks: &'a Hooks) -> Self {
        Self { config, hooks }
    }

    /// Editor markup, or nothing if the tab is disabled.
    pub fn render(&self, css: &str, nonce: &str) -> String {
        if !self.config.enabled {
            return String::new();
        }

        let mut html = String::from("<div><label>");
        html.push_str(&format!(
            r#"<textarea id="mdp_custom_css_fld" name="{}[{}]" class="mdp_custom_css_fld">{}</textarea>"#,
            OPTION_NAME,
            OPTION_FIELD,
            esc_textarea(css)
        ));
        html.push_str("</label>");

        if self.config.show_description {
            let description = self
                .hooks
                .custom_css_description(self.config.description.clone());
            html.push_str(&format!(
                r#"<p class="description">{}</p>"#,
                esc_html(&description)
            ));
        }

        html.push_str(&format!(
            r#"<input type="hidden" name="{}" value="{}" />"#,
            NONCE_FIELD,
            esc_attr(nonce)
        ));
        html.push_str("</div>");
        html
    }
}
