//! End-to-end rendering: registry, resolver, hooks and the reference emitter.

use serde_json::json;

use selection_core::widgets::MenuItem;
use selection_core::{
    BasicEmitter, Breakpoint, Config, Error, Hooks, HostWidget, Renderer, Resolver,
    SettingsSnapshot, WidgetRegistry,
};

fn renderer_with(config: &Config, hooks: Hooks) -> Renderer {
    let emitter = BasicEmitter::new(&config.site.home_url).with_menu(
        "main",
        vec![
            MenuItem::new("Home", "https://example.com/"),
            MenuItem::new("About", "https://example.com/about/")
                .child(MenuItem::new("Team", "https://example.com/about/team/")),
        ],
    );
    Renderer::new(
        WidgetRegistry::new(config),
        Resolver::new(config.breakpoints),
        hooks,
        Box::new(emitter),
    )
}

fn renderer() -> Renderer {
    renderer_with(&Config::from_default_toml().unwrap(), Hooks::new())
}

#[test]
fn test_every_widget_renders_with_empty_settings() {
    let renderer = renderer();
    for name in renderer.registry().names() {
        let rendered = renderer
            .render(name, &SettingsSnapshot::default())
            .unwrap_or_else(|e| panic!("{} failed: {}", name, e));
        assert_eq!(rendered.widget, name);
        // Every rule is scoped to the instance wrapper
        for rule in rendered.args.resolved_css_rules.rules() {
            assert!(
                rule.selector.starts_with(".elementor-element-"),
                "{}: unscoped selector {}",
                name,
                rule.selector
            );
        }
    }
}

#[test]
fn test_menu_render() {
    let snapshot = SettingsSnapshot::from_json(json!({
        "element_id": "7f3a",
        "settings": {
            "nav_menu_title": "Browse",
            "nav_menu_title_tag": "h3",
            "navigation_menu": "main",
            "nav_menu_orientation": "vertical",
            "section_style_menu_item_normal_text_color": "#123456",
            "section_style_menu_item_margin_tablet": {"top": "4", "unit": "px"}
        }
    }));

    let rendered = renderer().render("menu", &snapshot).unwrap();

    assert_eq!(
        rendered.call,
        HostWidget::NavMenu {
            title: "Browse".to_string(),
            nav_menu: Some("main".to_string()),
        }
    );
    assert!(rendered
        .args
        .before_widget_html
        .contains("mdp-widgeter-elementor-orientation-vertical"));
    assert!(rendered.html.contains("Browse</h3>"));
    assert!(rendered.html.contains(r#"<div class="menu-main-container">"#));
    assert!(rendered.html.contains(r#"<ul class="sub-menu">"#));

    let styles = &rendered.args.resolved_css_rules;
    let item = ".elementor-element-7f3a .menu-item a";
    assert!(styles
        .effective(item, Breakpoint::Desktop)
        .contains(&"color: #123456 !important".to_string()));
    assert!(styles
        .declarations(item, Breakpoint::Tablet)
        .contains(&"margin: 4px 0px 0px 0px !important".to_string()));
    assert!(rendered.css.contains("@media (max-width: 1024px) {"));
}

#[test]
fn test_rss_render_options() {
    let snapshot = SettingsSnapshot::new("r1")
        .with("rss_feed_title", json!("News & \"Views\""))
        .with("rss_feed_url", json!({"url": "https://example.com/feed/"}))
        .with("rss_feed_items_display", json!({"size": 5, "unit": "px"}))
        .with("display_item_author", json!("yes"));

    let rendered = renderer().render("rss", &snapshot).unwrap();

    assert_eq!(
        rendered.call,
        HostWidget::Rss {
            title: "News  Views".to_string(),
            url: "https://example.com/feed/".to_string(),
            items: "5".to_string(),
            show_summary: false,
            show_author: true,
            show_date: false,
        }
    );
    assert!(rendered.html.contains(r#"data-items="5""#));
    assert!(rendered.html.contains("rsswidget"));
}

#[test]
fn test_rss_without_url_renders_nothing() {
    let rendered = renderer()
        .render("rss", &SettingsSnapshot::new("r1"))
        .unwrap();
    assert_eq!(rendered.html, "");
    match rendered.call {
        HostWidget::Rss { items, .. } => assert_eq!(items, "0"),
        other => panic!("unexpected call {:?}", other),
    }
}

#[test]
fn test_disabled_feature_is_unknown() {
    let config = Config::load_with_defaults("[features]\nsearch = \"off\"\n").unwrap();
    let err = renderer_with(&config, Hooks::new())
        .render("search", &SettingsSnapshot::default())
        .unwrap_err();
    assert!(matches!(err, Error::UnknownWidget(_)));
}

#[test]
fn test_custom_breakpoints_reach_css() {
    let config = Config::load_with_defaults("[breakpoints]\ntablet = 900\nmobile = 500\n").unwrap();
    let snapshot = SettingsSnapshot::new("s1").with(
        "section_style_title_margin_mobile",
        json!({"top": "1", "right": "1", "bottom": "1", "left": "1", "unit": "em"}),
    );
    let rendered = renderer_with(&config, Hooks::new())
        .render("search", &snapshot)
        .unwrap();
    assert!(rendered.css.contains("@media (max-width: 500px) {"));
    assert!(rendered.css.contains("margin: 1em 1em 1em 1em !important;"));
}

#[test]
fn test_garbage_settings_fall_back_to_defaults() {
    let renderer = renderer();
    let clean = renderer.render("search", &SettingsSnapshot::new("g")).unwrap();
    let garbage = renderer
        .render(
            "search",
            &SettingsSnapshot::new("g")
                .with("search_title_tag", json!({"not": "a tag"}))
                .with("search_alignment", json!([1, 2, 3]))
                .with("no_such_control", json!(true)),
        )
        .unwrap();
    assert_eq!(clean.args, garbage.args);
    assert_eq!(clean.html, garbage.html);
}

#[test]
fn test_setting_values_cannot_escape_the_wrapper_rule() {
    let renderer = renderer();
    let clean = renderer.render("search", &SettingsSnapshot::new("abc")).unwrap();
    let hostile = renderer
        .render(
            "search",
            &SettingsSnapshot::new("abc")
                .with(
                    "section_style_title_normal_text_color",
                    json!("red} body{display:none"),
                )
                .with(
                    "section_style_title_typography",
                    json!({"font_family": "x</style><script>alert(1)</script>"}),
                )
                .with(
                    "section_style_title_margin",
                    json!({"top": "1px;}*{color:red", "unit": "px"}),
                ),
        )
        .unwrap();

    assert!(!hostile.css.contains("body"));
    assert!(!hostile.css.contains("</style>"));
    assert!(!hostile.css.contains("*{"));
    assert_eq!(clean.css, hostile.css);

    // Braces in the output only open and close wrapper-scoped rules
    for line in hostile.css.lines().filter(|l| l.contains('{')) {
        let line = line.trim();
        assert!(
            line.starts_with(".elementor-element-abc") || line.starts_with("@media"),
            "unscoped block: {}",
            line
        );
    }
}

#[test]
fn test_before_render_hook_sees_every_render() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let count = Arc::new(AtomicUsize::new(0));
    let seen = count.clone();
    let mut hooks = Hooks::new();
    hooks.on_before_render(move |_, _| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let renderer = renderer_with(&Config::from_default_toml().unwrap(), hooks);
    renderer.render("menu", &SettingsSnapshot::default()).unwrap();
    renderer.render("rss", &SettingsSnapshot::default()).unwrap();
    assert_eq!(count.load(Ordering::SeqCst), 2);
}
