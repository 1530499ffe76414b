//! Partial rendering seam.
//!
//! Rules never format HTML themselves; they hand a template name and a data
//! map to a [`Partials`] implementation. Hosts plug in their own template
//! engine; [`BuiltinPartials`] covers the default template names.

mod builtin;

use std::future::Future;

pub use builtin::BuiltinPartials;

/// Data passed to a partial: field name to JSON value, in insertion order.
pub type TemplateData = serde_json::Map<String, serde_json::Value>;

/// Renders named templates.
///
/// The future does not need to be `Send`: documents are rendered on a
/// single-threaded executor.
pub trait Partials {
    fn render(
        &self,
        template: &str,
        data: &TemplateData,
    ) -> impl Future<Output = anyhow::Result<String>>;
}

impl<P: Partials> Partials for &P {
    fn render(
        &self,
        template: &str,
        data: &TemplateData,
    ) -> impl Future<Output = anyhow::Result<String>> {
        (**self).render(template, data)
    }
}
