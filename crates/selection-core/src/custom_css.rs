//! Site-wide custom CSS.
//!
//! The CSS lives in two places: the settings option (source of truth for
//! the editor) and a file under the uploads directory named after the
//! site host (what the front end links to).

use serde::Serialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::html::esc_attr;
use crate::options::OptionsStore;

pub const OPTION_NAME: &str = "mdp_selection_lite_custom_css_settings";
pub const OPTION_FIELD: &str = "custom_css";
pub const NONCE_ACTION: &str = "selection-lite-settings-updated";
pub const NONCE_FIELD: &str = "selection_lite_settings_updated_nonce";
pub const STYLE_HANDLE: &str = "mdp-selection-lite-custom";
pub const INLINE_AFTER_HANDLE: &str = "elementor-frontend";

const UPLOADS_SUBDIR: &str = "selection-lite";

/// Nonces are valid for the current and the previous twelve-hour tick.
const NONCE_TICK_SECS: i64 = 12 * 60 * 60;

pub struct Nonce;

impl Nonce {
    pub fn create(secret: &str, action: &str) -> String {
        Self::create_at(secret, action, Self::tick(chrono::Utc::now().timestamp()))
    }

    pub fn verify(secret: &str, action: &str, nonce: &str) -> bool {
        let tick = Self::tick(chrono::Utc::now().timestamp());
        Self::verify_at(secret, action, nonce, tick)
    }

    fn tick(timestamp: i64) -> i64 {
        timestamp.div_euclid(NONCE_TICK_SECS)
    }

    fn create_at(secret: &str, action: &str, tick: i64) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.as_bytes());
        hasher.update(b"|");
        hasher.update(action.as_bytes());
        hasher.update(b"|");
        hasher.update(tick.to_string().as_bytes());
        let digest = hasher.finalize();
        digest[..10].iter().map(|b| format!("{:02x}", b)).collect()
    }

    fn verify_at(secret: &str, action: &str, nonce: &str, tick: i64) -> bool {
        !nonce.is_empty()
            && (Self::create_at(secret, action, tick) == nonce
                || Self::create_at(secret, action, tick - 1) == nonce)
    }
}

/// How the front end receives the custom CSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "delivery", rename_all = "snake_case")]
pub enum CustomStylesheet {
    Linked {
        handle: &'static str,
        url: String,
        version: String,
    },
    Inline {
        after: &'static str,
        css: String,
    },
    None,
}

impl CustomStylesheet {
    pub fn to_html(&self) -> String {
        match self {
            Self::Linked {
                handle,
                url,
                version,
            } => format!(
                r#"<link rel="stylesheet" id="{}-css" href="{}?ver={}" media="all" />"#,
                handle,
                esc_attr(url),
                esc_attr(version)
            ),
            Self::Inline { after, css } => {
                format!(r#"<style id="{}-inline-css">{}</style>"#, after, css)
            }
            Self::None => String::new(),
        }
    }
}

fn discard(staged: &Path) {
    if let Err(e) = fs::remove_file(staged) {
        debug!("Failed to remove {}: {}", staged.display(), e);
    }
}

/// Host name of a site URL, which names the CSS file.
pub fn css_file_name(site_url: &str) -> Result<String> {
    url::Url::parse(site_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .ok_or_else(|| Error::InvalidSiteUrl(site_url.to_string()))
}

pub struct CustomCssStore {
    options: Arc<dyn OptionsStore>,
    file_path: PathBuf,
    file_url: String,
    version: String,
    nonce_secret: String,
}

impl CustomCssStore {
    pub fn new(config: &Config, options: Arc<dyn OptionsStore>) -> Result<Self> {
        let name = css_file_name(&config.site.url)?;
        Ok(Self {
            options,
            file_path: config
                .site
                .uploads_dir
                .join(UPLOADS_SUBDIR)
                .join(format!("{}.css", name)),
            file_url: format!(
                "{}/{}/{}.css",
                config.site.uploads_url.trim_end_matches('/'),
                UPLOADS_SUBDIR,
                name
            ),
            version: config.site.version.clone(),
            nonce_secret: config.security.nonce_secret.clone(),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// A nonce for the settings form.
    pub fn nonce(&self) -> String {
        Nonce::create(&self.nonce_secret, NONCE_ACTION)
    }

    /// Current CSS from the option; empty when unset.
    pub fn load(&self) -> String {
        self.options
            .get(OPTION_NAME)
            .as_ref()
            .and_then(|v| v.get(OPTION_FIELD))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// Persist CSS to the option and the file.
    ///
    /// A nonce that is present must verify, otherwise nothing is written.
    /// The CSS is staged next to the file and only moved into place once
    /// the option is stored; a failed option write leaves both untouched.
    pub fn save(&self, css: &str, nonce: Option<&str>) -> Result<()> {
        if nonce.is_some_and(|n| !Nonce::verify(&self.nonce_secret, NONCE_ACTION, n)) {
            return Err(Error::NonceVerification);
        }

        if let Some(dir) = self.file_path.parent() {
            fs::create_dir_all(dir)?;
        }
        let staged = self.file_path.with_extension("css.tmp");
        fs::write(&staged, css)?;

        let previous = self.options.get(OPTION_NAME);
        let mut record = match previous.clone() {
            Some(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        record.insert(OPTION_FIELD.to_string(), json!(css));
        if let Err(e) = self.options.set(OPTION_NAME, Value::Object(record)) {
            discard(&staged);
            return Err(e);
        }

        if let Err(e) = fs::rename(&staged, &self.file_path) {
            debug!("Failed to move {} into place: {}", staged.display(), e);
            discard(&staged);
            if let Some(Err(restore)) = previous.map(|prev| self.options.set(OPTION_NAME, prev)) {
                debug!("Failed to restore the previous custom CSS option: {}", restore);
            }
            return Err(e.into());
        }
        debug!("Wrote {} bytes to {}", css.len(), self.file_path.display());

        info!("Custom CSS saved ({} bytes)", css.len());
        Ok(())
    }

    /// Append CSS after whatever is stored.
    pub fn append(&self, css: &str) -> Result<()> {
        let combined = format!("{}{}", self.load(), css);
        self.save(&combined, None)
    }

    fn file_has_content(&self) -> bool {
        fs::metadata(&self.file_path).is_ok_and(|m| m.is_file() && m.len() > 0)
    }

    pub fn stylesheet(&self) -> CustomStylesheet {
        if self.file_has_content() {
            return CustomStylesheet::Linked {
                handle: STYLE_HANDLE,
                url: self.file_url.clone(),
                version: self.version.clone(),
            };
        }
        let css = self.load();
        if css.is_empty() {
            CustomStylesheet::None
        } else {
            CustomStylesheet::Inline {
                after: INLINE_AFTER_HANDLE,
                css,
            }
        }
    }
}

impl std::fmt::Debug for CustomCssStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomCssStore")
            .field("file_path", &self.file_path)
            .field("file_url", &self.file_url)
            .finish_non_exhaustive()
    }
}
