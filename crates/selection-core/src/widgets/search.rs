//! Search form widget.

use serde_json::json;

use super::{
    ALIGN_OPTIONS, HostWidget, Widget, icon_position, title_alignment, title_icon,
    title_icon_size, title_icon_spacing, title_icon_switch, title_tag, title_target, title_text,
    width,
};
use crate::default_args::WidgetKind;
use crate::html::{esc_attr, strip_title_chars};
use crate::schema::{
    FieldKind, FieldSpec, SectionSpec, StyleTarget, TitleBinding, WidgetSchema, spacing_controls,
};
use crate::settings::EffectiveSettings;

const TITLE_CLASS: &str = "mdp-widgeter-search-title";
const LABEL: &str = "mdp-widgeter-search-elementor-box label";

/// Renders the site search form.
pub struct SearchWidget {
    schema: WidgetSchema,
}

impl SearchWidget {
    pub fn new() -> Self {
        Self { schema: schema() }
    }
}

impl Default for SearchWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for SearchWidget {
    fn name(&self) -> &'static str {
        "mdp-widgeter-search-elementor"
    }

    fn title(&self) -> &'static str {
        "Search"
    }

    fn icon(&self) -> &'static str {
        "mdp-search-elementor-widget-icon"
    }

    fn feature(&self) -> &'static str {
        "search"
    }

    fn schema(&self) -> &WidgetSchema {
        &self.schema
    }

    fn host_call(&self, settings: &EffectiveSettings<'_>) -> HostWidget {
        HostWidget::Search {
            title: esc_attr(&strip_title_chars(&settings.text("search_title"))),
        }
    }
}

fn schema() -> WidgetSchema {
    let binding = TitleBinding::new(
        WidgetKind::Search,
        "search_title_tag",
        "enable_search_title_icon",
        "search_title_icon",
        "search_icon_position",
    );

    let flex_options: Vec<(&str, &str)> = ["flex-start", "center", "flex-end"]
        .into_iter()
        .zip(ALIGN_OPTIONS.iter().map(|(_, label)| *label))
        .collect();

    let general = SectionSpec::content("section_content_general", "General")
        .field(title_text("search_title"))
        .field(title_tag("search_title_tag"))
        .field(title_icon_switch("enable_search_title_icon"))
        .field(title_icon("search_title_icon", "enable_search_title_icon"))
        .field(icon_position("search_icon_position", "enable_search_title_icon"))
        .field(title_alignment("search_title_alignment", "center"))
        .field(
            FieldSpec::new("search_alignment", FieldKind::Select, "Search alignment")
                .options(&flex_options)
                .default_value(json!("center"))
                .rule("{{WRAPPER}} .search-form", "justify-content: {{VALUE}};"),
        );

    let mut title_fields = spacing_controls("section_style_title", TITLE_CLASS);
    title_fields.extend([
        width("title_width", &format!("{{{{WRAPPER}}}} .{}", TITLE_CLASS)),
        title_icon_spacing("search_title_icon_spacing", "enable_search_title_icon"),
        title_icon_size("search_title_icon_size", "enable_search_title_icon"),
    ]);

    let mut field_fields = spacing_controls("section_style_search_field", "search-field");
    field_fields.push(width("search_field_width", "{{WRAPPER}} .search-form label"));

    let mut button_fields = spacing_controls("section_style_search_button", "search-submit");
    button_fields.push(width(
        "search_submit_width",
        "{{WRAPPER}} .search-form .search-submit",
    ));

    WidgetSchema::builder("mdp-widgeter-search-elementor", binding)
        .section(general)
        .style_section(
            SectionSpec::style("section_style_title", "Title"),
            title_fields,
            title_target(
                TITLE_CLASS,
                TITLE_CLASS,
                "mdp-widgeter-search-title:hover .mdp-widgeter-elementor-title-icon",
            ),
        )
        .style_section(
            SectionSpec::style("section_style_search_label", "Search label"),
            spacing_controls("section_style_search_label", LABEL),
            StyleTarget::new(LABEL).color_classes(LABEL, &format!("{}:hover", LABEL)),
        )
        .style_section(
            SectionSpec::style("section_style_search_field", "Search field"),
            field_fields,
            StyleTarget::new("search-field")
                .color_classes("search-field", "search-field:hover")
                .active("FOCUS", "search-field:focus", "search-field:focus"),
        )
        .style_section(
            SectionSpec::style("section_style_search_button", "Search button"),
            button_fields,
            StyleTarget::new("mdp-widgeter-search-elementor-box .search-submit")
                .typography_class("search-submit")
                .color_classes("search-submit", "search-submit:hover"),
        )
        .build()
}
