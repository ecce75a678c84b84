//! Navigation menu widget.

use serde_json::json;

use super::{
    HostWidget, Widget, alignment, icon_position, title_alignment, title_icon, title_icon_size,
    title_icon_spacing, title_icon_switch, title_tag, title_target, title_text, width,
};
use crate::default_args::WidgetKind;
use crate::html::{esc_attr, esc_html};
use crate::schema::{
    FieldKind, FieldSpec, SectionSpec, StyleTarget, TitleBinding, WidgetSchema, spacing_controls,
};
use crate::settings::EffectiveSettings;

const TITLE_CLASS: &str = "mdp-widgeter-nav-menu-title";

/// Renders a site navigation menu with an optional title.
pub struct NavMenuWidget {
    schema: WidgetSchema,
}

impl NavMenuWidget {
    /// Widget without known menus; any menu id is accepted.
    pub fn new() -> Self {
        Self::with_menus(&[])
    }

    /// Widget offering `menus` (`(id, name)`) in its menu select. The first
    /// menu is the default.
    pub fn with_menus(menus: &[(&str, &str)]) -> Self {
        Self {
            schema: schema(menus),
        }
    }
}

impl Default for NavMenuWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for NavMenuWidget {
    fn name(&self) -> &'static str {
        "mdp-widgeter-menu-elementor"
    }

    fn title(&self) -> &'static str {
        "Navigation menu"
    }

    fn icon(&self) -> &'static str {
        "mdp-menu-elementor-widget-icon"
    }

    fn feature(&self) -> &'static str {
        "menu"
    }

    fn style_depends(&self) -> &'static [&'static str] {
        &["mdp-widgeter-elementor", "mdp-widgeter-elementor-admin"]
    }

    fn schema(&self) -> &WidgetSchema {
        &self.schema
    }

    fn host_call(&self, settings: &EffectiveSettings<'_>) -> HostWidget {
        let nav_menu = settings
            .text_opt("navigation_menu")
            .filter(|m| !m.trim().is_empty())
            .map(|m| esc_attr(&m));
        HostWidget::NavMenu {
            title: esc_html(&settings.text("nav_menu_title")),
            nav_menu,
        }
    }
}

fn schema(menus: &[(&str, &str)]) -> WidgetSchema {
    let binding = TitleBinding::new(
        WidgetKind::NavMenu,
        "nav_menu_title_tag",
        "enable_menu_title_icon",
        "menu_title_icon",
        "menu_icon_position",
    )
    .wrapper_override("nav_menu_orientation", "nav_menu_alignment");

    let mut navigation_menu =
        FieldSpec::new("navigation_menu", FieldKind::Select, "Select menu").options(menus);
    if let Some((id, _)) = menus.first() {
        navigation_menu = navigation_menu.default_value(json!(id));
    }

    let general = SectionSpec::content("section_content_general", "General")
        .field(title_text("nav_menu_title"))
        .field(title_tag("nav_menu_title_tag"))
        .field(title_icon_switch("enable_menu_title_icon"))
        .field(title_icon("menu_title_icon", "enable_menu_title_icon"))
        .field(icon_position("menu_icon_position", "enable_menu_title_icon"))
        .field(title_alignment("nav_menu_title_alignment", "left"))
        .field(alignment("nav_menu_alignment", "Menu alignment", "left"))
        .field(
            FieldSpec::new("menu_items_spacing", FieldKind::Slider, "Items spacing")
                .units(&["px", "%"])
                .range("px", 0.0, 200.0, 1.0)
                .range("%", 0.0, 100.0, 1.0)
                .rule(
                    "{{WRAPPER}} .mdp-widgeter-elementor-orientation-horizontal li",
                    "margin-right: {{SIZE}}{{UNIT}};",
                )
                .rule(
                    "{{WRAPPER}} .mdp-widgeter-elementor-orientation-vertical li",
                    "margin-bottom: {{SIZE}}{{UNIT}};",
                )
                .rule(
                    "{{WRAPPER}} .mdp-widgeter-elementor-orientation-horizontal li:last-child",
                    "margin-right: 0;",
                )
                .rule(
                    "{{WRAPPER}} .mdp-widgeter-elementor-orientation-vertical li:last-child",
                    "margin-bottom: 0;",
                ),
        )
        .field(
            FieldSpec::new("nav_menu_orientation", FieldKind::Select, "Orientation")
                .options(&[("vertical", "Vertical"), ("horizontal", "Horizontal")])
                .default_value(json!("vertical")),
        )
        .field(navigation_menu);

    let mut title_fields = spacing_controls("section_style_title", TITLE_CLASS);
    title_fields.extend([
        width("title_width", &format!("{{{{WRAPPER}}}} .{}", TITLE_CLASS)),
        title_icon_spacing("menu_title_icon_spacing", "enable_menu_title_icon"),
        title_icon_size("menu_title_icon_size", "enable_menu_title_icon"),
    ]);

    let boxed = |class: &str| StyleTarget::new(class).without_typography().without_color();
    let item = |class: &str| {
        StyleTarget::new(class).color_classes(class, &format!("{}:hover", class))
    };

    WidgetSchema::builder("mdp-widgeter-menu-elementor", binding)
        .section(general)
        .style_section(
            SectionSpec::style("section_style_title", "Title"),
            title_fields,
            title_target(
                TITLE_CLASS,
                TITLE_CLASS,
                "mdp-widgeter-nav-menu-title:hover .mdp-widgeter-elementor-title-icon",
            ),
        )
        .style_section(
            SectionSpec::style("section_style_menu", "Menu"),
            spacing_controls("section_style_menu", "mdp-widgeter-nav-menu-elementor-box ul"),
            boxed("mdp-widgeter-nav-menu-elementor-box ul"),
        )
        .style_section(
            SectionSpec::style("section_style_submenu", "Submenu"),
            spacing_controls(
                "section_style_submenu",
                "mdp-widgeter-nav-menu-elementor-box ul.sub-menu",
            ),
            boxed("mdp-widgeter-nav-menu-elementor-box ul.sub-menu"),
        )
        .style_section(
            SectionSpec::style("section_style_menu_item", "Menu item"),
            spacing_controls("section_style_menu_item", "menu-item a"),
            item("menu-item a"),
        )
        .style_section(
            SectionSpec::style("section_style_submenu_item", "Submenu item"),
            spacing_controls("section_style_submenu_item", "sub-menu .menu-item a"),
            item("sub-menu .menu-item a"),
        )
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{Breakpoint, Resolver};
    use crate::settings::SettingsSnapshot;

    #[test]
    fn test_default_render_args() {
        let widget = NavMenuWidget::new();
        let args = Resolver::default().resolve(widget.schema(), &SettingsSnapshot::new("m1"));
        assert_eq!(
            args.before_widget_html,
            r#"<div class="mdp-widgeter-elementor-box mdp-widgeter-nav-menu-elementor-box mdp-widgeter-elementor-orientation-vertical mdp-widgeter-elementor-alignment-left">"#
        );
        assert_eq!(args.after_widget_html, "</div>");
        assert!(args.before_title_html.contains("mdp-widgeter-nav-menu-title"));
    }

    #[test]
    fn test_host_call() {
        let widget = NavMenuWidget::with_menus(&[("12", "Main"), ("14", "Footer")]);
        let snapshot = SettingsSnapshot::new("m1").with("nav_menu_title", json!("<b>Menu</b>"));
        let call = widget.host_call(&EffectiveSettings::new(widget.schema(), &snapshot));
        assert_eq!(
            call,
            HostWidget::NavMenu {
                title: "&lt;b&gt;Menu&lt;/b&gt;".to_string(),
                nav_menu: Some("12".to_string()),
            }
        );
    }

    #[test]
    fn test_no_menu_selected() {
        let widget = NavMenuWidget::new();
        let snapshot = SettingsSnapshot::new("m1");
        let call = widget.host_call(&EffectiveSettings::new(widget.schema(), &snapshot));
        assert!(matches!(call, HostWidget::NavMenu { nav_menu: None, .. }));
    }

    #[test]
    fn test_items_spacing_rules() {
        let widget = NavMenuWidget::new();
        let snapshot = SettingsSnapshot::new("m1")
            .with("menu_items_spacing", json!({"size": 8, "unit": "px"}));
        let args = Resolver::default().resolve(widget.schema(), &snapshot);
        let styles = &args.resolved_css_rules;
        assert_eq!(
            styles.declarations(
                ".elementor-element-m1 .mdp-widgeter-elementor-orientation-horizontal li",
                Breakpoint::Desktop
            ),
            ["margin-right: 8px"]
        );
        assert_eq!(
            styles.declarations(
                ".elementor-element-m1 .mdp-widgeter-elementor-orientation-vertical li:last-child",
                Breakpoint::Desktop
            ),
            ["margin-bottom: 0"]
        );
    }

    #[test]
    fn test_style_sections_in_order() {
        let widget = NavMenuWidget::new();
        let ids: Vec<&str> = widget.schema().sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "section_content_general",
                "section_style_title",
                "section_style_menu",
                "section_style_submenu",
                "section_style_menu_item",
                "section_style_submenu_item",
            ]
        );
        let menu = widget.schema().style_subject("section_style_menu").unwrap();
        assert!(!menu.include_typography && !menu.include_color);
    }
}
