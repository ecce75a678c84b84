//! Widget rendering pipeline.
//!
//! Looks the widget up, resolves its settings, runs the registered hooks
//! and hands the host call to the markup emitter.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::hooks::Hooks;
use crate::registry::WidgetRegistry;
use crate::resolve::{RenderArgs, Resolver};
use crate::settings::{EffectiveSettings, SettingsSnapshot};
use crate::widgets::{HostWidget, MarkupEmitter, Widget};

/// Result of rendering one widget instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rendered {
    pub widget: &'static str,
    pub html: String,
    pub css: String,
    pub args: RenderArgs,
    pub call: HostWidget,
}

pub struct Renderer {
    registry: WidgetRegistry,
    resolver: Resolver,
    hooks: Hooks,
    emitter: Box<dyn MarkupEmitter>,
}

impl Renderer {
    pub fn new(
        registry: WidgetRegistry,
        resolver: Resolver,
        hooks: Hooks,
        emitter: Box<dyn MarkupEmitter>,
    ) -> Self {
        Self {
            registry,
            resolver,
            hooks,
            emitter,
        }
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Render a registered widget by name or feature key.
    pub fn render(&self, name: &str, snapshot: &SettingsSnapshot) -> Result<Rendered> {
        let widget = self
            .registry
            .get(name)
            .ok_or_else(|| Error::UnknownWidget(name.to_string()))?;
        Ok(self.render_widget(widget.as_ref(), snapshot))
    }

    /// Render a widget directly. Never fails: bad settings fall back to
    /// schema defaults.
    pub fn render_widget(&self, widget: &dyn Widget, snapshot: &SettingsSnapshot) -> Rendered {
        self.hooks.before_render(widget, snapshot);

        let mut args = self.resolver.resolve(widget.schema(), snapshot);
        self.hooks.after_resolve(widget, &mut args);

        let call = widget.host_call(&EffectiveSettings::new(widget.schema(), snapshot));
        let html = self.emitter.emit(&call, &args);
        let css = args.resolved_css_rules.to_css(self.resolver.breakpoints());

        debug!(
            "Rendered '{}': {} bytes of markup, {} CSS rule(s)",
            widget.name(),
            html.len(),
            args.resolved_css_rules.rules().len()
        );

        Rendered {
            widget: widget.name(),
            html,
            css,
            args,
            call,
        }
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("registry", &self.registry)
            .field("resolver", &self.resolver)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::widgets::BasicEmitter;
    use serde_json::json;

    fn renderer(hooks: Hooks) -> Renderer {
        let config = Config::from_default_toml().unwrap();
        Renderer::new(
            WidgetRegistry::new(&config),
            Resolver::new(config.breakpoints),
            hooks,
            Box::new(BasicEmitter::new("https://example.com")),
        )
    }

    #[test]
    fn test_unknown_widget_is_an_error() {
        let err = renderer(Hooks::new())
            .render("mdp-widgeter-calendar-elementor", &SettingsSnapshot::default())
            .unwrap_err();
        assert!(matches!(err, Error::UnknownWidget(name) if name == "mdp-widgeter-calendar-elementor"));
    }

    #[test]
    fn test_render_search_defaults() {
        let rendered = renderer(Hooks::new())
            .render("search", &SettingsSnapshot::new("abc"))
            .unwrap();
        assert_eq!(rendered.widget, "mdp-widgeter-search-elementor");
        assert!(rendered.html.contains("<form role=\"search\""));
        assert!(rendered.html.starts_with(&rendered.args.before_widget_html));
        assert!(rendered.css.contains(".elementor-element-abc .search-form {"));
        assert!(rendered.css.contains("justify-content: center;"));
    }

    #[test]
    fn test_after_resolve_hook_reaches_markup() {
        let mut hooks = Hooks::new();
        hooks.on_after_resolve(|_, args| {
            args.before_title_html = "<p class=\"hooked\">".to_string();
            args.after_title_html = "</p>".to_string();
        });
        let snapshot = SettingsSnapshot::new("abc").with("search_title", json!("Find"));
        let rendered = renderer(hooks).render("search", &snapshot).unwrap();
        assert!(rendered.html.contains("<p class=\"hooked\">Find</p>"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = renderer(Hooks::new());
        let snapshot = SettingsSnapshot::new("")
            .with("rss_feed_url", json!({"url": "https://example.com/feed"}));
        let first = renderer.render("rss", &snapshot).unwrap();
        let second = renderer.render("rss", &snapshot).unwrap();
        assert_eq!(first, second);
    }
}
