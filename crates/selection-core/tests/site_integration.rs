//! Site-level features working together: options on disk, custom CSS,
//! template kit import, duplicate notices and breadcrumbs.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use selection_core::admin::{CustomCssTab, Screen};
use selection_core::breadcrumbs::{PageContext, breadcrumbs};
use selection_core::custom_css::{CustomStylesheet, OPTION_NAME};
use selection_core::duplicates::{self, DuplicateScan};
use selection_core::options::{JsonFileOptions, OptionsStore};
use selection_core::template_kit::{
    Fetch, IMPORT_POST_TYPE, ImportGate, ImportOutcome, InsertedPost, TemplateKitImporter,
};
use selection_core::{Config, CustomCssStore, Error, Hooks};

fn site_config(root: &Path) -> Config {
    let mut config = Config::from_default_toml().unwrap();
    config.site.url = "https://www.example.net".to_string();
    config.site.uploads_dir = root.join("uploads");
    config.site.uploads_url = "https://www.example.net/wp-content/uploads".to_string();
    config.storage.options_path = root.join("options.json");
    config.security.nonce_secret = "integration-secret".to_string();
    config
}

fn open_store(config: &Config) -> CustomCssStore {
    let options = JsonFileOptions::open(&config.storage.options_path).unwrap();
    CustomCssStore::new(config, Arc::new(options)).unwrap()
}

#[test]
fn test_custom_css_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let css = "body { margin: 0; }\n.x::after { content: \"\\201D\"; }\n";

    let store = open_store(&config);
    store.save(css, Some(&store.nonce())).unwrap();
    drop(store);

    let reopened = open_store(&config);
    assert_eq!(reopened.load(), css);
    assert_eq!(
        std::fs::read_to_string(
            dir.path()
                .join("uploads")
                .join("selection-lite")
                .join("www.example.net.css")
        )
        .unwrap(),
        css
    );
    assert!(matches!(reopened.stylesheet(), CustomStylesheet::Linked { .. }));

    // The options file holds the record under its option name
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.storage.options_path).unwrap())
            .unwrap();
    assert_eq!(raw[OPTION_NAME]["custom_css"], css);
}

#[test]
fn test_nonce_from_another_secret_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let store = open_store(&config);

    let mut other = config.clone();
    other.security.nonce_secret = "someone-else".to_string();
    let foreign_nonce = open_store(&other).nonce();

    let err = store.save("a{}", Some(&foreign_nonce)).unwrap_err();
    assert!(matches!(err, Error::NonceVerification));
    assert_eq!(store.load(), "");
    assert_eq!(store.stylesheet(), CustomStylesheet::None);
}

#[test]
fn test_inline_delivery_when_file_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let options = Arc::new(JsonFileOptions::open(&config.storage.options_path).unwrap());
    options
        .set(OPTION_NAME, serde_json::json!({"custom_css": "p{color:red}"}))
        .unwrap();

    let store = CustomCssStore::new(&config, options).unwrap();
    let sheet = store.stylesheet();
    assert_eq!(
        sheet.to_html(),
        r#"<style id="elementor-frontend-inline-css">p{color:red}</style>"#
    );
}

struct StaticFetch(HashMap<&'static str, &'static str>);

impl Fetch for StaticFetch {
    fn get(&self, url: &str) -> selection_core::Result<String> {
        self.0
            .get(url)
            .map(|body| body.to_string())
            .ok_or_else(|| Error::Fetch(format!("{}: HTTP 404", url)))
    }
}

#[test]
fn test_template_kit_import_updates_tab() {
    let dir = tempfile::tempdir().unwrap();
    let config = site_config(dir.path());
    let store = open_store(&config);

    let fetch = StaticFetch(HashMap::from([
        ("https://aurora.templatekit.co/wp-json/template-kit/v1/id", "\"12\""),
        (
            "https://templatekit.co/wp-content/uploads/sites/12/selection-lite/aurora.templatekit.co.css",
            ".hero{padding:4em}",
        ),
    ]));
    let importer = TemplateKitImporter::new(&config.template_kit, Box::new(fetch));
    let gate = ImportGate {
        can_manage_options: true,
        import_plugin_active: true,
    };
    let post = InsertedPost {
        post_type: IMPORT_POST_TYPE.to_string(),
        title: "Aurora".to_string(),
    };

    let outcome = importer.after_insert_post(gate, &post, &store).unwrap();
    assert!(matches!(outcome, ImportOutcome::Imported { ref slug, .. } if slug == "aurora"));

    let hooks = Hooks::new();
    let html = CustomCssTab::new(&config.custom_css, &hooks).render(&store.load(), "n");
    assert!(html.contains("/* Template Kit - aurora */\n.hero{padding:4em}</textarea>"));
}

#[test]
fn test_duplicate_notice_on_plugins_screen() {
    let config = Config::from_default_toml().unwrap();
    let active = vec![
        "elementor/elementor.php".to_string(),
        "search-elementor/search-elementor.php".to_string(),
        "menu-elementor/menu-elementor.php".to_string(),
        "search-elementor/search-elementor.php".to_string(),
    ];

    let scan = DuplicateScan::new(&config.admin);
    let set = scan.run(
        Some(&Screen::new("plugins", "plugins")),
        &active,
        &config.features,
    );
    assert_eq!(set.keys(), ["search", "menu"]);
    assert!(duplicates::notice_html(&set)
        .contains("<strong>Search for Elementor, Menu for Elementor</strong>"));

    let elsewhere = scan.run(
        Some(&Screen::new("edit-post", "edit")),
        &active,
        &config.features,
    );
    assert!(elsewhere.is_empty());
    assert_eq!(duplicates::notice_html(&elsewhere), "");
}

#[test]
fn test_breadcrumbs_from_json_context() {
    let context: PageContext = serde_json::from_str(
        r#"{
            "site_name": "Example",
            "site_url": "https://example.com",
            "query": {"kind": "month", "date": "2023-11-01"}
        }"#,
    )
    .unwrap();

    let trail = breadcrumbs(&context);
    let names: Vec<&str> = trail.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Example", "2023", "November"]);
    assert_eq!(trail[1].link, "https://example.com/2023/");
    assert!(trail[2].is_active);
}
