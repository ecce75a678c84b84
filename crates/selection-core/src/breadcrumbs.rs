//! Breadcrumb trail for the current front-end request.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::html::{esc_html, esc_url};

/// A linked page reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub title: String,
    pub link: String,
}

/// What the current request shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Query {
    FrontPage,
    /// A blog post. `categories` is the primary category's trail, root first.
    Post {
        title: String,
        #[serde(default)]
        categories: Vec<PageRef>,
    },
    /// A page. `ancestors` are nearest parent first.
    Page {
        title: String,
        #[serde(default)]
        ancestors: Vec<PageRef>,
        #[serde(default)]
        children: Vec<PageRef>,
    },
    Category {
        name: String,
    },
    Tag {
        name: String,
    },
    Day {
        date: NaiveDate,
    },
    Month {
        date: NaiveDate,
    },
    Year {
        year: i32,
    },
    TemplateLibrary {
        title: String,
    },
    Author {
        display_name: String,
    },
    NotFound,
    Shop,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    pub site_name: String,
    pub site_url: String,
    #[serde(default)]
    pub woocommerce_active: bool,
    /// The request is a WooCommerce page (shop, product, cart...).
    #[serde(default)]
    pub is_woocommerce: bool,
    #[serde(default = "first_page")]
    pub paged: u32,
    pub query: Query,
}

fn first_page() -> u32 {
    1
}

impl PageContext {
    fn on_shop_page(&self) -> bool {
        self.woocommerce_active && (self.is_woocommerce || self.query == Query::Shop)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub key: String,
    pub name: String,
    pub link: String,
    pub is_homepage: bool,
    pub is_parent: bool,
    pub is_child: bool,
    pub is_active: bool,
    /// Pre-rendered markup, used by category trail entries.
    pub element: String,
}

impl Breadcrumb {
    fn current(key: &str, name: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            is_active: true,
            ..Self::default()
        }
    }

    fn linked(key: &str, name: &str, link: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            link: link.to_string(),
            ..Self::default()
        }
    }
}

fn year_link(site: &str, year: i32) -> String {
    format!("{}/{}/", site, year)
}

fn month_link(site: &str, date: NaiveDate) -> String {
    format!("{}/{}/{:02}/", site, date.year(), date.month())
}

fn homepage(ctx: &PageContext, active: bool) -> Breadcrumb {
    Breadcrumb {
        key: "homepage".to_string(),
        name: ctx.site_name.clone(),
        link: ctx.site_url.trim_end_matches('/').to_string(),
        is_homepage: true,
        is_active: active,
        ..Breadcrumb::default()
    }
}

pub fn breadcrumbs(ctx: &PageContext) -> Vec<Breadcrumb> {
    let site = ctx.site_url.trim_end_matches('/');
    let mut crumbs = Vec::new();

    if ctx.query == Query::FrontPage {
        if ctx.paged > 1 {
            crumbs.push(homepage(ctx, true));
        }
        return crumbs;
    }

    if !ctx.on_shop_page() {
        crumbs.push(homepage(ctx, false));
    }

    match &ctx.query {
        Query::FrontPage => {}
        Query::Post { title, categories } => {
            for (i, category) in categories.iter().enumerate() {
                crumbs.push(Breadcrumb {
                    key: format!("element_{}", i),
                    element: format!(
                        r#"<a href="{}">{}</a>"#,
                        esc_url(&category.link),
                        esc_html(&category.title)
                    ),
                    ..Breadcrumb::default()
                });
            }
            crumbs.push(Breadcrumb::current("post", title));
        }
        Query::Page {
            title,
            ancestors,
            children,
        } => {
            for (i, parent) in ancestors.iter().rev().enumerate() {
                crumbs.push(Breadcrumb {
                    is_parent: true,
                    ..Breadcrumb::linked(&format!("parent_page_{}", i), &parent.title, &parent.link)
                });
            }
            crumbs.push(Breadcrumb::current("page", title));
            for (i, child) in children.iter().enumerate() {
                crumbs.push(Breadcrumb {
                    is_child: true,
                    ..Breadcrumb::linked(&format!("child_page_{}", i), &child.title, &child.link)
                });
            }
        }
        Query::Category { name } => crumbs.push(Breadcrumb::current("category", name)),
        Query::Tag { name } => crumbs.push(Breadcrumb::current("tag", name)),
        Query::Day { date } => {
            crumbs.push(Breadcrumb::linked(
                "year_archive",
                &date.year().to_string(),
                &year_link(site, date.year()),
            ));
            crumbs.push(Breadcrumb::linked(
                "month_archive",
                &date.format("%B").to_string(),
                &month_link(site, *date),
            ));
            crumbs.push(Breadcrumb::current(
                "day_archive",
                &date.format("%d").to_string(),
            ));
        }
        Query::Month { date } => {
            crumbs.push(Breadcrumb::linked(
                "year_archive",
                &date.year().to_string(),
                &year_link(site, date.year()),
            ));
            crumbs.push(Breadcrumb::current(
                "month_archive",
                &date.format("%B").to_string(),
            ));
        }
        Query::Year { year } => crumbs.push(Breadcrumb::current("year_archive", &year.to_string())),
        Query::TemplateLibrary { title } => {
            crumbs.push(Breadcrumb::current("elementor_library", title))
        }
        Query::Author { display_name } => {
            crumbs.push(Breadcrumb::current("author_archive", display_name))
        }
        Query::NotFound => crumbs.push(Breadcrumb::current("Error 404", "Error 404")),
        Query::Shop => {
            if ctx.on_shop_page() {
                crumbs.push(Breadcrumb {
                    key: "woocommerce".to_string(),
                    ..Breadcrumb::default()
                });
            }
        }
        Query::Other => {}
    }

    crumbs
}
