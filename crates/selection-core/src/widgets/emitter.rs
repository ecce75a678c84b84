//! Final markup emission.
//!
//! The host normally owns this step; `BasicEmitter` produces equivalent
//! markup for the command-line tool and for tests.

use serde::Deserialize;
use std::collections::BTreeMap;

use super::HostWidget;
use crate::html::{esc_attr, esc_html, esc_url};
use crate::resolve::RenderArgs;

/// Produces the final HTML for one host widget call.
pub trait MarkupEmitter: Send + Sync {
    fn emit(&self, call: &HostWidget, args: &RenderArgs) -> String;
}

/// One navigation menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub children: Vec<MenuItem>,
}

impl MenuItem {
    pub fn new(label: &str, url: &str) -> Self {
        Self {
            label: label.to_string(),
            url: url.to_string(),
            children: Vec::new(),
        }
    }

    pub fn child(mut self, item: MenuItem) -> Self {
        self.children.push(item);
        self
    }
}

/// Reference emitter following the stock widget markup.
#[derive(Debug, Clone, Default)]
pub struct BasicEmitter {
    home_url: String,
    menus: BTreeMap<String, Vec<MenuItem>>,
}

impl BasicEmitter {
    pub fn new(home_url: &str) -> Self {
        Self {
            home_url: home_url.trim_end_matches('/').to_string(),
            menus: BTreeMap::new(),
        }
    }

    pub fn with_menu(mut self, id: &str, items: Vec<MenuItem>) -> Self {
        self.menus.insert(id.to_string(), items);
        self
    }

    fn title(args: &RenderArgs, title: &str) -> String {
        if title.is_empty() {
            return String::new();
        }
        format!("{}{}{}", args.before_title_html, title, args.after_title_html)
    }

    fn menu_list(items: &[MenuItem], class: &str, out: &mut String) {
        out.push_str(&format!(r#"<ul class="{}">"#, class));
        for item in items {
            let classes = if item.children.is_empty() {
                "menu-item"
            } else {
                "menu-item menu-item-has-children"
            };
            out.push_str(&format!(
                r#"<li class="{}"><a href="{}">{}</a>"#,
                classes,
                esc_url(&item.url),
                esc_html(&item.label)
            ));
            if !item.children.is_empty() {
                Self::menu_list(&item.children, "sub-menu", out);
            }
            out.push_str("</li>");
        }
        out.push_str("</ul>");
    }
}

impl MarkupEmitter for BasicEmitter {
    fn emit(&self, call: &HostWidget, args: &RenderArgs) -> String {
        let body = match call {
            HostWidget::NavMenu { nav_menu, .. } => {
                // No menu selected renders nothing at all.
                let Some(id) = nav_menu else {
                    return String::new();
                };
                let mut out = format!(r#"<div class="menu-{}-container">"#, esc_attr(id));
                let items = self.menus.get(id).map(Vec::as_slice).unwrap_or(&[]);
                Self::menu_list(items, "menu", &mut out);
                out.push_str("</div>");
                out
            }
            HostWidget::Rss {
                url,
                items,
                show_summary,
                show_author,
                show_date,
                ..
            } => {
                if url.is_empty() {
                    return String::new();
                }
                format!(
                    r#"<ul data-feed="{}" data-items="{}" data-show-summary="{}" data-show-author="{}" data-show-date="{}"></ul>"#,
                    url,
                    items,
                    u8::from(*show_summary),
                    u8::from(*show_author),
                    u8::from(*show_date)
                )
            }
            HostWidget::Search { .. } => format!(
                concat!(
                    r#"<form role="search" method="get" class="search-form" action="{}/">"#,
                    r#"<label><span class="screen-reader-text">Search for:</span>"#,
                    r#"<input type="search" class="search-field" placeholder="Search &hellip;" value="" name="s" /></label>"#,
                    r#"<input type="submit" class="search-submit" value="Search" /></form>"#
                ),
                esc_url(&self.home_url)
            ),
        };

        let title = match call {
            HostWidget::Rss { url, title, .. } if !title.is_empty() => Self::title(
                args,
                &format!(r#"<a class="rsswidget rss-widget-title" href="{}">{}</a>"#, url, title),
            ),
            _ => Self::title(args, call.title()),
        };

        format!(
            "{}{}{}{}",
            args.before_widget_html, title, body, args.after_widget_html
        )
    }
}
