//! Per-document metadata.
//!
//! [`Metadata`] is what the host knows about the page being rendered: its
//! render path, the site root URL, and free-form fields from front matter
//! (`title`, `description`, `publication_date`, ...). Rules only read it.

mod normalize;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::url::resolve_render_path;
use crate::error::Result;
use crate::partial::TemplateData;

pub use normalize::normalize;

/// Metadata for one render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Path the document renders to, relative to the site root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_path: Option<String>,

    /// Absolute site root URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_url: Option<String>,

    /// Everything else.
    #[serde(flatten)]
    pub fields: TemplateData,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_render_path(mut self, path: impl Into<String>) -> Self {
        self.render_path = Some(path.into());
        self
    }

    pub fn with_root_url(mut self, url: impl Into<String>) -> Self {
        self.root_url = Some(url.into());
        self
    }

    /// Set a free-form field.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Fill in the root URL from site configuration when the host left it out.
    pub fn or_root_url(mut self, fallback: Option<&str>) -> Self {
        if self.root_url().is_empty()
            && let Some(url) = fallback
        {
            self.root_url = Some(url.to_string());
        }
        self
    }

    /// A present field: not null, and not an empty string.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|v| is_present(v))
    }

    /// A present field holding a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Render path, if the document has a non-empty one.
    pub fn render_path(&self) -> Option<&str> {
        self.render_path
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }

    /// Site root URL, empty when unknown.
    pub fn root_url(&self) -> &str {
        self.root_url.as_deref().map_or("", str::trim)
    }

    /// Absolute URL of the rendered document.
    ///
    /// An explicit `rendered_url` field wins; otherwise the render path is
    /// resolved against the root URL. `None` without a render path.
    pub fn rendered_url(&self) -> Result<Option<String>> {
        if let Some(url) = self.get_str("rendered_url") {
            return Ok(Some(url.to_string()));
        }
        match self.render_path() {
            Some(path) => resolve_render_path(path, self.root_url()).map(Some),
            None => Ok(None),
        }
    }

    /// Parse metadata from a TOML front-matter table.
    ///
    /// TOML datetimes become strings so `publication_date = 2019-08-16`
    /// behaves like its quoted form.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        let table: toml::Table = toml::from_str(content)?;

        let mut meta = Self::default();
        for (key, value) in table {
            let value = toml_to_json(value);
            match value {
                Value::String(path) if key == "render_path" => meta.render_path = Some(path),
                Value::String(url) if key == "root_url" => meta.root_url = Some(url),
                value => {
                    meta.fields.insert(key, value);
                }
            }
        }
        Ok(meta)
    }
}

/// Truthiness used for metadata fallbacks.
pub(crate) fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}
