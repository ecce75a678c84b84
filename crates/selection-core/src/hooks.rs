//! Named extension points.
//!
//! The host registers callbacks here instead of the core reaching into a
//! global dispatcher. Callbacks run in registration order.

use std::fmt;

use crate::resolve::RenderArgs;
use crate::settings::SettingsSnapshot;
use crate::widgets::Widget;

type BeforeRender = Box<dyn Fn(&dyn Widget, &SettingsSnapshot) + Send + Sync>;
type AfterResolve = Box<dyn Fn(&dyn Widget, &mut RenderArgs) + Send + Sync>;
type TextFilter = Box<dyn Fn(String) -> String + Send + Sync>;

#[derive(Default)]
pub struct Hooks {
    before_render: Vec<BeforeRender>,
    after_resolve: Vec<AfterResolve>,
    custom_css_description: Vec<TextFilter>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Observe a widget and its snapshot before resolution.
    pub fn on_before_render(
        &mut self,
        callback: impl Fn(&dyn Widget, &SettingsSnapshot) + Send + Sync + 'static,
    ) -> &mut Self {
        self.before_render.push(Box::new(callback));
        self
    }

    /// Adjust resolved arguments before they reach the emitter.
    pub fn on_after_resolve(
        &mut self,
        callback: impl Fn(&dyn Widget, &mut RenderArgs) + Send + Sync + 'static,
    ) -> &mut Self {
        self.after_resolve.push(Box::new(callback));
        self
    }

    /// Filter the description shown under the custom CSS editor.
    pub fn filter_custom_css_description(
        &mut self,
        filter: impl Fn(String) -> String + Send + Sync + 'static,
    ) -> &mut Self {
        self.custom_css_description.push(Box::new(filter));
        self
    }

    pub fn before_render(&self, widget: &dyn Widget, snapshot: &SettingsSnapshot) {
        for callback in &self.before_render {
            callback(widget, snapshot);
        }
    }

    pub fn after_resolve(&self, widget: &dyn Widget, args: &mut RenderArgs) {
        for callback in &self.after_resolve {
            callback(widget, args);
        }
    }

    pub fn custom_css_description(&self, description: String) -> String {
        self.custom_css_description
            .iter()
            .fold(description, |text, filter| filter(text))
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_render", &self.before_render.len())
            .field("after_resolve", &self.after_resolve.len())
            .field("custom_css_description", &self.custom_css_description.len())
            .finish()
    }
}
