//! Configuration types and parsing.
//!
//! The `Config` type is the host-side settings record: site identity,
//! the per-feature enable map, storage locations and admin screen
//! gating. It stays serialization-friendly; derived values such as the
//! custom CSS file path are computed by the modules that need them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use toml::Table;

use crate::error::{Error, Result};

/// Known valid values for entries of the `[features]` map.
const VALID_FEATURE_STATES: &[&str] = &["on", "off"];

/// Embedded default configuration TOML, compiled into the binary.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../../config.toml");

/// Directory name used under XDG config locations.
const CONFIG_DIR_NAME: &str = "selection-lite";

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct ConfigLoadResult {
    /// The loaded configuration.
    pub config: Config,
    /// Path where config was found, if any.
    pub source: Option<PathBuf>,
    /// Whether defaults were used (no config file found).
    pub used_defaults: bool,
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Site identity and locations.
    pub site: SiteConfig,

    /// Per-feature enable map (`"on"` / `"off"`).
    pub features: FeaturesConfig,

    /// Options record storage.
    pub storage: StorageConfig,

    /// Custom CSS settings tab.
    pub custom_css: CustomCssConfig,

    /// Template kit import.
    pub template_kit: TemplateKitConfig,

    /// Admin screen gating.
    pub admin: AdminConfig,

    /// Responsive breakpoints.
    pub breakpoints: BreakpointsConfig,

    /// Form nonce settings.
    pub security: SecurityConfig,
}

impl Config {
    /// Load configuration from the embedded default TOML string.
    pub fn from_default_toml() -> Result<Self> {
        let config: Config = toml::from_str(DEFAULT_CONFIG_TOML)?;
        Ok(config)
    }

    /// Load configuration from a TOML file, merging with embedded defaults.
    ///
    /// Returns an error if the file doesn't exist or can't be parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_with_defaults(&content)
    }

    /// Load configuration from a TOML string, merging with embedded defaults.
    ///
    /// Both documents are parsed as TOML tables and deep-merged (user
    /// values win) before deserializing.
    pub fn load_with_defaults(user_toml: &str) -> Result<Self> {
        let mut base: Table = toml::from_str(DEFAULT_CONFIG_TOML)?;
        let user: Table = toml::from_str(user_toml)?;

        deep_merge_toml(&mut base, user);

        let config: Config = base.try_into()?;
        Ok(config)
    }

    /// Find and load configuration using the XDG lookup chain.
    ///
    /// If `explicit_path` is `Some`, that path is used directly and an error
    /// is returned if it doesn't exist or can't be parsed (no fallback).
    ///
    /// If `explicit_path` is `None`, searches in order:
    /// 1. `$XDG_CONFIG_HOME/selection-lite/config.toml`
    /// 2. `~/.config/selection-lite/config.toml`
    /// 3. `./config.toml` (current working directory)
    ///
    /// If no config file is found, the embedded defaults are used.
    pub fn find_and_load(explicit_path: Option<&Path>) -> Result<ConfigLoadResult> {
        if let Some(path) = explicit_path {
            let config = Self::load(path)?;
            return Ok(ConfigLoadResult {
                config,
                source: Some(path.to_path_buf()),
                used_defaults: false,
            });
        }

        // A config file that exists but fails to load is an error, never a
        // silent fallback to defaults.
        let search_paths = Self::config_search_paths();
        let mut first_error: Option<(PathBuf, Error)> = None;

        for path in &search_paths {
            if path.exists() {
                match Self::load(path) {
                    Ok(config) => {
                        return Ok(ConfigLoadResult {
                            config,
                            source: Some(path.clone()),
                            used_defaults: false,
                        });
                    }
                    Err(e) => {
                        if first_error.is_none() {
                            first_error = Some((path.clone(), e));
                        }
                    }
                }
            }
        }

        if let Some((path, error)) = first_error {
            tracing::error!("Config file {:?} exists but failed to load: {}", path, error);
            return Err(error);
        }

        tracing::info!("No config file found, using built-in default config");
        tracing::debug!(
            "Searched: {}",
            search_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(ConfigLoadResult {
            config: Self::from_default_toml()?,
            source: None,
            used_defaults: true,
        })
    }

    /// Get the list of paths to search for config files.
    pub fn config_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(
                PathBuf::from(xdg_config)
                    .join(CONFIG_DIR_NAME)
                    .join("config.toml"),
            );
        }

        if let Ok(home) = env::var("HOME") {
            paths.push(
                PathBuf::from(home)
                    .join(".config")
                    .join(CONFIG_DIR_NAME)
                    .join("config.toml"),
            );
        }

        paths.push(PathBuf::from("config.toml"));

        paths
    }

    /// Validate the configuration, returning errors for invalid values.
    ///
    /// Every problem is collected before returning.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        match url::Url::parse(&self.site.url) {
            Ok(parsed) if parsed.host_str().is_some() => {}
            Ok(_) => errors.push(format!("site.url: '{}' has no host", self.site.url)),
            Err(e) => errors.push(format!("site.url: invalid value '{}': {}", self.site.url, e)),
        }

        for (feature, state) in &self.features.entries {
            if !VALID_FEATURE_STATES.contains(&state.as_str()) {
                errors.push(format!(
                    "features.{}: invalid value '{}', expected one of: {}",
                    feature,
                    state,
                    VALID_FEATURE_STATES.join(", ")
                ));
            }
        }

        if self.template_kit.timeout_secs == 0 {
            errors.push("template_kit.timeout_secs: must be greater than 0".to_string());
        }

        if self.template_kit.enabled && self.template_kit.domain.trim().is_empty() {
            errors.push("template_kit.domain: must not be empty when enabled".to_string());
        }

        if self.breakpoints.mobile == 0 || self.breakpoints.mobile >= self.breakpoints.tablet {
            errors.push(format!(
                "breakpoints: mobile ({}) must be greater than 0 and less than tablet ({})",
                self.breakpoints.mobile, self.breakpoints.tablet
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::ConfigValidation(errors))
        }
    }

    /// Check for potential configuration issues and return warnings.
    ///
    /// `known_features` lists the feature keys that registered widgets
    /// provide; enabled features outside that list are probably typos.
    pub fn warnings(&self, known_features: &[&str]) -> Vec<String> {
        let mut warnings = Vec::new();

        for feature in self.features.enabled() {
            if !known_features.contains(&feature) {
                warnings.push(format!(
                    "features.{}: enabled but no widget provides it (possible typo?)",
                    feature
                ));
            }
        }

        if self.security.nonce_secret == SecurityConfig::default().nonce_secret {
            warnings.push(
                "security.nonce_secret: still set to the shipped default; set a site-specific secret"
                    .to_string(),
            );
        }

        warnings
    }

    /// Print a human-readable summary of the configuration.
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();

        lines.push("Site:".to_string());
        lines.push(format!("  url: {}", self.site.url));
        lines.push(format!("  name: {}", self.site.name));
        lines.push(format!("  uploads: {}", self.site.uploads_dir.display()));

        lines.push("\nFeatures:".to_string());
        for (feature, state) in &self.features.entries {
            lines.push(format!("  {}: {}", feature, state));
        }

        lines.push("\nCustom CSS:".to_string());
        lines.push(format!(
            "  tab: {}, description: {}",
            if self.custom_css.enabled {
                "enabled"
            } else {
                "disabled"
            },
            if self.custom_css.show_description {
                "shown"
            } else {
                "hidden"
            }
        ));

        lines.push("\nTemplate kit:".to_string());
        lines.push(format!(
            "  enabled: {}, domain: {}, timeout: {}s",
            self.template_kit.enabled, self.template_kit.domain, self.template_kit.timeout_secs
        ));

        lines.push("\nBreakpoints:".to_string());
        lines.push(format!(
            "  tablet: {}px, mobile: {}px",
            self.breakpoints.tablet, self.breakpoints.mobile
        ));

        lines.join("\n")
    }
}

/// Deep merge two TOML tables, with `overlay` values taking precedence.
///
/// For nested tables, recursively merges. For arrays and other values,
/// the overlay value completely replaces the base value.
fn deep_merge_toml(base: &mut Table, overlay: Table) {
    for (key, overlay_value) in overlay {
        match (base.get_mut(&key), overlay_value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge_toml(base_table, overlay_table);
            }
            (_, overlay_value) => {
                base.insert(key, overlay_value);
            }
        }
    }
}

/// Site identity and locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Public site URL; its host names the custom CSS file.
    pub url: String,

    /// Site name, used as the breadcrumb root label.
    pub name: String,

    /// Home URL used by search forms and breadcrumbs.
    pub home_url: String,

    /// Local uploads directory.
    pub uploads_dir: PathBuf,

    /// Public URL of the uploads directory.
    pub uploads_url: String,

    /// Base URL of the bundle's static assets.
    pub assets_url: String,

    /// Bundle version, used to version asset URLs.
    pub version: String,

    /// Serve unminified assets.
    pub debug_assets: bool,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "https://example.com".to_string(),
            name: "Example".to_string(),
            home_url: "https://example.com".to_string(),
            uploads_dir: PathBuf::from("uploads"),
            uploads_url: "https://example.com/wp-content/uploads".to_string(),
            assets_url: "https://example.com/wp-content/plugins/selection-lite".to_string(),
            version: "1.14".to_string(),
            debug_assets: false,
        }
    }
}

/// Per-feature enable map.
///
/// Stored flat: `[features] menu = "on"`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FeaturesConfig {
    #[serde(flatten)]
    pub entries: BTreeMap<String, String>,
}

impl FeaturesConfig {
    /// Whether a feature is switched on. Unknown features are off.
    pub fn is_on(&self, feature: &str) -> bool {
        self.entries.get(feature).is_some_and(|v| v == "on")
    }

    /// Keys of all features switched on.
    pub fn enabled(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, v)| v.as_str() == "on")
            .map(|(k, _)| k.as_str())
    }
}

/// Options record storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// JSON file holding the options record.
    pub options_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            options_path: PathBuf::from("selection-options.json"),
        }
    }
}

/// Custom CSS settings tab.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CustomCssConfig {
    pub enabled: bool,
    pub show_description: bool,
    pub description: String,
}

impl Default for CustomCssConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            show_description: true,
            description: "Add custom CSS here.".to_string(),
        }
    }
}

/// Template kit import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TemplateKitConfig {
    pub enabled: bool,

    /// Domain hosting the template kits.
    pub domain: String,

    /// Timeout for each remote request, in seconds.
    pub timeout_secs: u64,
}

impl Default for TemplateKitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            domain: "templatekit.co".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Admin screen gating.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminConfig {
    /// Screen ids on which the duplicate-plugin scan runs.
    pub duplicate_screens: Vec<String>,

    /// Screen bases that count as the plugin settings page.
    pub settings_screen_bases: Vec<String>,

    /// Screen id of the template editor.
    pub editor_screen: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            duplicate_screens: vec![
                "plugins".to_string(),
                "toplevel_page_mdp_selection_lite_settings".to_string(),
            ],
            settings_screen_bases: vec!["toplevel_page_mdp_selection_lite_settings".to_string()],
            editor_screen: "elementor_library".to_string(),
        }
    }
}

/// Responsive breakpoints (max widths in pixels).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct BreakpointsConfig {
    pub tablet: u32,
    pub mobile: u32,
}

impl Default for BreakpointsConfig {
    fn default() -> Self {
        Self {
            tablet: 1024,
            mobile: 767,
        }
    }
}

/// Form nonce settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityConfig {
    pub nonce_secret: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            nonce_secret: "change-me".to_string(),
        }
    }
}
