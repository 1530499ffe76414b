//! Sitemap generation configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SitemapConfig {
    /// Enable sitemap generation.
    pub enable: bool,
    /// `<changefreq>` for every entry.
    pub changefreq: ChangeFreq,
    /// `<priority>` for every entry, 0.0 to 1.0.
    pub priority: f32,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enable: false,
            changefreq: ChangeFreq::Weekly,
            priority: 0.5,
        }
    }
}

impl SitemapConfig {
    pub fn enabled() -> Self {
        Self {
            enable: true,
            ..Self::default()
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if !(0.0..=1.0).contains(&self.priority) {
            diag.error(
                FieldPath::new("sitemap.priority"),
                format!("must be between 0.0 and 1.0, got {}", self.priority),
            );
        }
    }
}

/// Values allowed in `<changefreq>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
