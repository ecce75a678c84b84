//! Template kit style import.
//!
//! When a template kit is imported, the kit's custom CSS is fetched from
//! the kit's home network and appended to the site's custom CSS.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TemplateKitConfig;
use crate::custom_css::CustomCssStore;
use crate::error::{Error, Result};

/// Post type created by the template kit importer.
pub const IMPORT_POST_TYPE: &str = "envato_tk_import";

/// Blocking HTTP GET returning the body of a `200` response.
pub trait Fetch: Send + Sync {
    fn get(&self, url: &str) -> Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }
}

impl Fetch for HttpFetcher {
    fn get(&self, url: &str) -> Result<String> {
        let response = minreq::get(url)
            .with_timeout(self.timeout_secs)
            .send()
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

        if response.status_code != 200 {
            return Err(Error::Fetch(format!(
                "{}: HTTP {}",
                url, response.status_code
            )));
        }

        response
            .as_str()
            .map(str::to_string)
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))
    }
}

/// Who is importing and what is installed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportGate {
    pub can_manage_options: bool,
    pub import_plugin_active: bool,
}

/// A freshly inserted post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedPost {
    pub post_type: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ImportOutcome {
    Disabled,
    NotAllowed,
    NotAKit,
    NoData { slug: String },
    Imported { slug: String, bytes: usize },
}

pub struct TemplateKitImporter {
    config: TemplateKitConfig,
    fetcher: Box<dyn Fetch>,
}

impl TemplateKitImporter {
    pub fn new(config: &TemplateKitConfig, fetcher: Box<dyn Fetch>) -> Self {
        Self {
            config: config.clone(),
            fetcher,
        }
    }

    /// Importer over real HTTP, with the configured timeout.
    pub fn http(config: &TemplateKitConfig) -> Self {
        Self::new(config, Box::new(HttpFetcher::new(config.timeout_secs)))
    }

    pub fn id_url(&self, slug: &str) -> String {
        format!("https://{}.{}/wp-json/template-kit/v1/id", slug, self.config.domain)
    }

    pub fn css_url(&self, slug: &str, site_id: &str) -> String {
        format!(
            "https://{domain}/wp-content/uploads/sites/{id}/selection-lite/{slug}.{domain}.css",
            domain = self.config.domain,
            id = site_id,
            slug = slug
        )
    }

    /// Body of a single GET, or `None` on any failure or empty body.
    fn fetch(&self, url: &str) -> Option<String> {
        match self.fetcher.get(url) {
            Ok(body) if !body.trim().is_empty() => Some(body),
            Ok(_) => {
                debug!("Empty response from {}", url);
                None
            }
            Err(e) => {
                debug!("Template kit fetch failed: {}", e);
                None
            }
        }
    }

    /// Handle an inserted post; only template kit imports do anything.
    ///
    /// Remote failures are not errors: they yield `NoData` and leave the
    /// stored CSS alone. Only persistence failures are returned.
    pub fn after_insert_post(
        &self,
        gate: ImportGate,
        post: &InsertedPost,
        store: &CustomCssStore,
    ) -> Result<ImportOutcome> {
        if !self.config.enabled {
            return Ok(ImportOutcome::Disabled);
        }
        if !gate.can_manage_options || !gate.import_plugin_active {
            return Ok(ImportOutcome::NotAllowed);
        }
        if post.post_type != IMPORT_POST_TYPE {
            return Ok(ImportOutcome::NotAKit);
        }

        let slug = post.title.to_lowercase();

        let Some(site_id) = self
            .fetch(&self.id_url(&slug))
            .map(|id| id.trim().trim_matches('"').to_string())
            .filter(|id| !id.is_empty() && id != "0")
        else {
            return Ok(ImportOutcome::NoData { slug });
        };

        let Some(css) = self.fetch(&self.css_url(&slug, &site_id)) else {
            return Ok(ImportOutcome::NoData { slug });
        };

        store.append(&format!("\n/* Template Kit - {} */\n{}", slug, css))?;
        info!("Imported {} bytes of template kit CSS for '{}'", css.len(), slug);

        Ok(ImportOutcome::Imported {
            slug,
            bytes: css.len(),
        })
    }
}

impl std::fmt::Debug for TemplateKitImporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateKitImporter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::options::MemoryOptions;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeFetch {
        responses: HashMap<String, String>,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl FakeFetch {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.responses.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl Fetch for FakeFetch {
        fn get(&self, url: &str) -> Result<String> {
            self.requested.lock().push(url.to_string());
            self.responses
                .get(url)
                .cloned()
                .ok_or_else(|| Error::Fetch(format!("{}: HTTP 404", url)))
        }
    }

    const ID_URL: &str = "https://flora.templatekit.co/wp-json/template-kit/v1/id";
    const CSS_URL: &str =
        "https://templatekit.co/wp-content/uploads/sites/42/selection-lite/flora.templatekit.co.css";

    fn gate() -> ImportGate {
        ImportGate {
            can_manage_options: true,
            import_plugin_active: true,
        }
    }

    fn kit(title: &str) -> InsertedPost {
        InsertedPost {
            post_type: IMPORT_POST_TYPE.to_string(),
            title: title.to_string(),
        }
    }

    fn store(dir: &std::path::Path) -> CustomCssStore {
        let mut config = Config::default();
        config.site.uploads_dir = dir.to_path_buf();
        CustomCssStore::new(&config, Arc::new(MemoryOptions::new())).unwrap()
    }

    #[test]
    fn test_import_appends_css() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.save(".site{}", None).unwrap();

        let fetch = FakeFetch::default()
            .with(ID_URL, "42")
            .with(CSS_URL, ".kit{color:red}");
        let importer = TemplateKitImporter::new(&TemplateKitConfig::default(), Box::new(fetch));

        let outcome = importer.after_insert_post(gate(), &kit("Flora"), &store).unwrap();
        assert_eq!(
            outcome,
            ImportOutcome::Imported {
                slug: "flora".to_string(),
                bytes: 15
            }
        );
        let expected = ".site{}\n/* Template Kit - flora */\n.kit{color:red}";
        assert_eq!(store.load(), expected);
        assert_eq!(std::fs::read_to_string(store.file_path()).unwrap(), expected);
    }

    #[test]
    fn test_failed_id_request_stops() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let fetch = FakeFetch::default().with(CSS_URL, ".kit{}");
        let requested = fetch.requested.clone();
        let importer = TemplateKitImporter::new(&TemplateKitConfig::default(), Box::new(fetch));

        let outcome = importer.after_insert_post(gate(), &kit("flora"), &store).unwrap();
        assert_eq!(
            outcome,
            ImportOutcome::NoData {
                slug: "flora".to_string()
            }
        );
        assert_eq!(*requested.lock(), vec![ID_URL.to_string()]);
        assert_eq!(store.load(), "");
        assert!(!store.file_path().exists());
    }

    #[test]
    fn test_failed_css_request_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.save("a{}", None).unwrap();
        let fetch = FakeFetch::default().with(ID_URL, "42");
        let importer = TemplateKitImporter::new(&TemplateKitConfig::default(), Box::new(fetch));

        let outcome = importer.after_insert_post(gate(), &kit("flora"), &store).unwrap();
        assert!(matches!(outcome, ImportOutcome::NoData { .. }));
        assert_eq!(store.load(), "a{}");
    }

    #[test]
    fn test_gates() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let fetch = || Box::new(FakeFetch::default().with(ID_URL, "42").with(CSS_URL, "x{}"));

        let importer = TemplateKitImporter::new(&TemplateKitConfig::default(), fetch());
        let page = InsertedPost {
            post_type: "page".to_string(),
            title: "Flora".to_string(),
        };
        assert_eq!(
            importer.after_insert_post(gate(), &page, &store).unwrap(),
            ImportOutcome::NotAKit
        );
        assert_eq!(
            importer
                .after_insert_post(ImportGate::default(), &kit("Flora"), &store)
                .unwrap(),
            ImportOutcome::NotAllowed
        );

        let disabled = TemplateKitConfig {
            enabled: false,
            ..TemplateKitConfig::default()
        };
        let importer = TemplateKitImporter::new(&disabled, fetch());
        assert_eq!(
            importer.after_insert_post(gate(), &kit("Flora"), &store).unwrap(),
            ImportOutcome::Disabled
        );
        assert_eq!(store.load(), "");
    }
}
