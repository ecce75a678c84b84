//! Core library for the Selection Lite widget bundle.
//!
//! Widgets describe their controls as declarative schemas; the resolver
//! turns a schema plus one instance's settings into wrapper markup and
//! scoped CSS. Around that sit the site-level pieces: custom CSS
//! persistence, template kit import, duplicate plugin notices and
//! breadcrumbs.

pub mod admin;
pub mod assets;
pub mod breadcrumbs;
pub mod config;
pub mod custom_css;
pub mod default_args;
pub mod duplicates;
pub mod error;
pub mod hooks;
pub mod html;
pub mod logging;
pub mod options;
pub mod registry;
pub mod render;
pub mod resolve;
pub mod schema;
pub mod settings;
pub mod template_kit;
pub mod widgets;

pub use config::{Config, ConfigLoadResult};
pub use custom_css::CustomCssStore;
pub use default_args::{DefaultArgs, DefaultArgsInput, IconSpec, WidgetKind, build_default_args};
pub use duplicates::{DuplicateScan, DuplicateSet};
pub use error::{Error, Result};
pub use hooks::Hooks;
pub use registry::WidgetRegistry;
pub use render::{Rendered, Renderer};
pub use resolve::{Breakpoint, RenderArgs, ResolvedStyles, Resolver};
pub use schema::WidgetSchema;
pub use settings::{EffectiveSettings, SettingsSnapshot};
pub use widgets::{BasicEmitter, HostWidget, MarkupEmitter, Widget};
