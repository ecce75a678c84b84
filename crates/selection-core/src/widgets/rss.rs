//! RSS feed widget.

use serde_json::json;

use super::{
    HostWidget, Widget, alignment, icon_position, title_alignment, title_icon, title_icon_size,
    title_icon_spacing, title_icon_switch, title_tag, title_target, title_text, width,
};
use crate::default_args::WidgetKind;
use crate::html::{esc_attr, esc_url, strip_title_chars};
use crate::schema::{
    FieldKind, FieldSpec, SectionSpec, StyleTarget, TitleBinding, WidgetSchema, spacing_controls,
};
use crate::settings::EffectiveSettings;

const TITLE_CLASS: &str = "mdp-widgeter-rss-feed-title";
const ITEMS: &str = "mdp-widgeter-rss-feed-elementor-box ul";
const ITEM: &str = "mdp-widgeter-rss-feed-elementor-box ul li";

const LIST_STYLE_TYPES: &[(&str, &str)] = &[
    ("disc", "Disc"),
    ("armenian", "Armenian"),
    ("cjk-ideographic", "Cjk ideographic"),
    ("decimal", "Decimal"),
    ("decimal-leading-zero", "Decimal leading zero"),
    ("georgian", "Georgian"),
    ("hebrew", "Hebrew"),
    ("hiragana", "Hiragana"),
    ("hiragana-iroha", "Hiragana iroha"),
    ("katakana", "Katakana"),
    ("katakana-iroha", "Katakana iroha"),
    ("lower-alpha", "Lower alpha"),
    ("lower-greek", "Lower greek"),
    ("lower-latin", "Lower latin"),
    ("lower-roman", "Lower roman"),
    ("square", "Square"),
    ("upper-alpha", "Upper alpha"),
    ("upper-greek", "Upper greek"),
    ("upper-latin", "Upper latin"),
    ("upper-roman", "Upper roman"),
    ("none", "None"),
];

/// Renders entries of a remote RSS feed.
pub struct RssWidget {
    schema: WidgetSchema,
}

impl RssWidget {
    pub fn new() -> Self {
        Self { schema: schema() }
    }
}

impl Default for RssWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for RssWidget {
    fn name(&self) -> &'static str {
        "mdp-widgeter-rss-elementor"
    }

    fn title(&self) -> &'static str {
        "RSS"
    }

    fn icon(&self) -> &'static str {
        "mdp-rss-elementor-widget-icon"
    }

    fn feature(&self) -> &'static str {
        "rss"
    }

    fn schema(&self) -> &WidgetSchema {
        &self.schema
    }

    fn host_call(&self, settings: &EffectiveSettings<'_>) -> HostWidget {
        let items = settings
            .slider("rss_feed_items_display")
            .map(|s| s.size_or_zero())
            .unwrap_or_else(|| "0".to_string());

        HostWidget::Rss {
            title: esc_attr(&strip_title_chars(&settings.text("rss_feed_title"))),
            url: esc_url(&settings.url("rss_feed_url")),
            items: esc_attr(&items),
            show_summary: settings.is_yes("display_item_content"),
            show_author: settings.is_yes("display_item_author"),
            show_date: settings.is_yes("display_item_date"),
        }
    }
}

fn switch(key: &str, label: &str) -> FieldSpec {
    FieldSpec::new(key, FieldKind::Switch, label).default_value(json!("no"))
}

fn schema() -> WidgetSchema {
    let binding = TitleBinding::new(
        WidgetKind::RssFeed,
        "rss_title_tag",
        "enable_rss_title_icon",
        "rss_title_icon",
        "rss_icon_position",
    )
    .extra_class("rss_feed_list_alignment", "mdp-widgeter-elementor-list-align-");

    let general = SectionSpec::content("section_content_general", "General")
        .field(title_text("rss_feed_title"))
        .field(title_tag("rss_title_tag"))
        .field(title_icon_switch("enable_rss_title_icon"))
        .field(title_icon("rss_title_icon", "enable_rss_title_icon"))
        .field(icon_position("rss_icon_position", "enable_rss_title_icon"))
        .field(
            FieldSpec::new("rss_list_layout", FieldKind::Select, "List layout")
                .options(&[("column", "Column"), ("row", "Row")])
                .default_value(json!("column"))
                .rule(
                    "{{WRAPPER}} .mdp-widgeter-elementor-box ul",
                    "flex-direction: {{VALUE}};",
                ),
        )
        .field(alignment("rss_feed_list_alignment", "List alignment", "center"))
        .field(title_alignment("title_rss_feed_alignment", "center"))
        .field(
            FieldSpec::new("rss_feed_url", FieldKind::Url, "RSS feed URL")
                .default_value(json!({"url": ""})),
        )
        .field(
            FieldSpec::new("rss_feed_items_display", FieldKind::Slider, "Items to display")
                .units(&["px"])
                .range("px", 1.0, 20.0, 1.0),
        )
        .field(switch("display_item_content", "Display item content"))
        .field(switch("display_item_author", "Display item author(if available)"))
        .field(switch("display_item_date", "Display item date"));

    let mut title_fields = spacing_controls("section_style_title", TITLE_CLASS);
    title_fields.extend([
        width("title_width", &format!("{{{{WRAPPER}}}} .{}", TITLE_CLASS)),
        title_icon_spacing("rss_title_icon_spacing", "enable_rss_title_icon"),
        title_icon_size("rss_title_icon_size", "enable_rss_title_icon"),
    ]);

    let mut items_box = spacing_controls("section_style_rss_feed_items_block", ITEMS);
    items_box.extend([
        width("list_width", "{{WRAPPER}} .mdp-widgeter-elementor-box ul"),
        FieldSpec::new("rss_feed_list_style_type", FieldKind::Select, "List style type")
            .options(LIST_STYLE_TYPES)
            .default_value(json!("disc"))
            .rule(
                "{{WRAPPER}} .mdp-widgeter-rss-feed-elementor-box ul",
                "list-style-type: {{VALUE}};",
            ),
    ]);

    let boxed = |class: &str| StyleTarget::new(class).without_typography().without_color();
    let text = |class: &str| {
        StyleTarget::new(class).color_classes(class, &format!("{}:hover", class))
    };
    let author = format!("{} cite", ITEM);
    let item_title = format!("{} .rsswidget", ITEM);

    WidgetSchema::builder("mdp-widgeter-rss-elementor", binding)
        .section(general)
        .style_section(
            SectionSpec::style("section_style_title", "Title"),
            title_fields,
            title_target(
                TITLE_CLASS,
                "mdp-widgeter-rss-feed-title a",
                "mdp-widgeter-rss-title:hover .mdp-widgeter-elementor-title-icon",
            ),
        )
        .style_section(
            SectionSpec::style("section_style_rss_feed_items_block", "RSS feed items box"),
            items_box,
            boxed(ITEMS),
        )
        .style_section(
            SectionSpec::style("section_style_rss_feed_item_box", "RSS feed item box"),
            spacing_controls("section_style_rss_feed_item_box", ITEM),
            boxed(ITEM),
        )
        .style_section(
            SectionSpec::style("section_style_rss_feed_item_author", "RSS feed item author")
                .when("display_item_author", "yes"),
            vec![item_padding("section_style_rss_feed_item_author", "cite")],
            StyleTarget::new(&author).color_classes(
                &format!("{}, {{{{WRAPPER}}}} .{}", author, author),
                &format!("{}:hover", author),
            ),
        )
        .style_section(
            SectionSpec::style("section_style_rss_feed_item_title", "RSS feed item title"),
            vec![item_padding("section_style_rss_feed_item_title", ".rsswidget")],
            StyleTarget::new(&item_title).color_classes(
                &format!("{}, {{{{WRAPPER}}}} .{}", item_title, ITEM),
                &format!("{}:hover, {{{{WRAPPER}}}} .{}:hover", item_title, ITEM),
            ),
        )
        .style_section(
            SectionSpec::style("section_style_rss_feed_item_content", "RSS feed item content"),
            spacing_controls("section_style_rss_feed_item_content", "rssSummary"),
            text("rssSummary"),
        )
        .style_section(
            SectionSpec::style("section_style_rss_feed_item_date", "RSS feed item date"),
            spacing_controls("section_style_rss_feed_item_date", "rss-date"),
            text("rss-date"),
        )
        .build()
}

/// Padding-only control targeting a bare selector inside the wrapper.
fn item_padding(section_id: &str, selector: &str) -> FieldSpec {
    FieldSpec::new(format!("{}_padding", section_id), FieldKind::Dimensions, "Padding")
        .units(&["px", "%", "em"])
        .responsive()
        .rule(
            &format!("{{{{WRAPPER}}}} {}", selector),
            "padding: {{TOP}}{{UNIT}} {{RIGHT}}{{UNIT}} {{BOTTOM}}{{UNIT}} {{LEFT}}{{UNIT}} !important;",
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{Breakpoint, Resolver};
    use crate::settings::SettingsSnapshot;

    fn call(snapshot: &SettingsSnapshot) -> HostWidget {
        let widget = RssWidget::new();
        widget.host_call(&EffectiveSettings::new(widget.schema(), snapshot))
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            call(&SettingsSnapshot::new("r1")),
            HostWidget::Rss {
                title: String::new(),
                url: String::new(),
                items: "0".to_string(),
                show_summary: false,
                show_author: false,
                show_date: false,
            }
        );
    }

    #[test]
    fn test_title_is_stripped_and_items_read() {
        let snapshot = SettingsSnapshot::new("r1")
            .with("rss_feed_title", json!("News <\"today\"> & ‘more’"))
            .with("rss_feed_url", json!({"url": "https://example.com/feed"}))
            .with("rss_feed_items_display", json!({"size": 5, "unit": "px"}))
            .with("display_item_date", json!("yes"));
        let HostWidget::Rss {
            title,
            url,
            items,
            show_date,
            ..
        } = call(&snapshot)
        else {
            panic!("not an rss call");
        };
        assert_eq!(title, "News today  more’");
        assert_eq!(url, "https://example.com/feed");
        assert_eq!(items, "5");
        assert!(show_date);
    }

    #[test]
    fn test_unsafe_url_is_dropped() {
        let snapshot =
            SettingsSnapshot::new("r1").with("rss_feed_url", json!({"url": "javascript:alert(1)"}));
        assert!(matches!(call(&snapshot), HostWidget::Rss { url, .. } if url.is_empty()));
    }

    #[test]
    fn test_wrapper_classes() {
        let widget = RssWidget::new();
        let snapshot = SettingsSnapshot::new("r1")
            .with("rss_feed_list_alignment", json!("left"))
            .with("enable_rss_title_icon", json!("yes"));
        let args = Resolver::default().resolve(widget.schema(), &snapshot);
        assert_eq!(
            args.before_widget_html,
            r#"<div class="mdp-widgeter-elementor-box mdp-widgeter-rss-feed-elementor-box mdp-widgeter-elementor-list-align-left mdp-widgeter-disable-default-icon">"#
        );
        assert!(args.before_title_html.contains("fas fa-star"));
    }

    #[test]
    fn test_author_section_is_conditioned() {
        let widget = RssWidget::new();
        let selector = ".elementor-element-r1 cite";
        let padding = json!({"top": "4", "unit": "px"});

        let hidden = SettingsSnapshot::new("r1")
            .with("section_style_rss_feed_item_author_padding", padding.clone());
        let args = Resolver::default().resolve(widget.schema(), &hidden);
        assert!(args.resolved_css_rules.declarations(selector, Breakpoint::Desktop).is_empty());

        let shown = hidden.with("display_item_author", json!("yes"));
        let args = Resolver::default().resolve(widget.schema(), &shown);
        assert_eq!(
            args.resolved_css_rules.declarations(selector, Breakpoint::Desktop),
            ["padding: 4px 0px 0px 0px !important"]
        );
    }

    #[test]
    fn test_list_style_type() {
        let widget = RssWidget::new();
        let args = Resolver::default().resolve(widget.schema(), &SettingsSnapshot::new("r1"));
        assert!(args
            .resolved_css_rules
            .declarations(
                ".elementor-element-r1 .mdp-widgeter-rss-feed-elementor-box ul",
                Breakpoint::Desktop
            )
            .contains(&"list-style-type: disc".to_string()));
    }
}
