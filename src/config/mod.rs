//! Plugin configuration (`metahead.toml`).
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── authorship # [authorship]
//! │   ├── link_rel   # [[link-rel-tags]]
//! │   ├── nofollow   # [nofollow]
//! │   └── sitemap    # [sitemap]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # PluginOptions (this file)
//! ```
//!
//! # Keys
//!
//! | Key               | Purpose                                           |
//! |-------------------|---------------------------------------------------|
//! | `root-url`        | Site root URL when metadata carries none          |
//! | `max-passes`      | Pass budget for the pipeline (default 5)          |
//! | `link-rel-tags`   | `<link rel>` tags for `<ak-header-linkreltags>`   |
//! | `[authorship]`    | Enables `<author-link>`                           |
//! | `[nofollow]`      | Enables the external link `rel="nofollow"` rule   |
//! | `[sitemap]`       | Sitemap generation                                |

pub mod section;
pub mod types;

pub use section::{
    Author, AuthorshipConfig, ChangeFreq, LinkRelTag, NoFollowConfig, NoFollowMatcher,
    SitemapConfig,
};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use url::Url;

use crate::log;

/// Default pass budget.
pub const DEFAULT_MAX_PASSES: usize = 5;

// ============================================================================
// root configuration
// ============================================================================

/// Options captured by the rule set when it is registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PluginOptions {
    /// Site root URL, used when a document's metadata has none.
    pub root_url: Option<String>,

    /// Maximum number of pipeline passes per document (at least 1).
    pub max_passes: usize,

    /// Tags emitted by `<ak-header-linkreltags>`.
    pub link_rel_tags: Vec<LinkRelTag>,

    /// Author lookup; `<author-link>` is only handled when present.
    pub authorship: Option<AuthorshipConfig>,

    /// External link policy; the nofollow rule is only registered when present.
    pub nofollow: Option<NoFollowConfig>,

    /// Sitemap generation settings.
    pub sitemap: SitemapConfig,
}

impl Default for PluginOptions {
    fn default() -> Self {
        Self {
            root_url: None,
            max_passes: DEFAULT_MAX_PASSES,
            link_rel_tags: Vec::new(),
            authorship: None,
            nofollow: None,
            sitemap: SitemapConfig::default(),
        }
    }
}

impl PluginOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root_url(mut self, url: impl Into<String>) -> Self {
        self.root_url = Some(url.into());
        self
    }

    pub fn with_max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes;
        self
    }

    /// Add a tag for `<ak-header-linkreltags>`.
    pub fn with_link_rel_tag(mut self, tag: LinkRelTag) -> Self {
        self.link_rel_tags.push(tag);
        self
    }

    pub fn with_authorship(mut self, authorship: AuthorshipConfig) -> Self {
        self.authorship = Some(authorship);
        self
    }

    pub fn with_nofollow(mut self, nofollow: NoFollowConfig) -> Self {
        self.nofollow = Some(nofollow);
        self
    }

    pub fn with_sitemap(mut self, sitemap: SitemapConfig) -> Self {
        self.sitemap = sitemap;
        self
    }

    // ========================================================================
    // loading
    // ========================================================================

    /// Load and validate options from a TOML file.
    ///
    /// Unknown keys are reported as warnings, not errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (options, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        options.validate()?;
        Ok(options)
    }

    /// Parse (without validating) options from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let options = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((options, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate all sections, collecting every problem before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if self.max_passes == 0 {
            diag.error_with_hint(
                FieldPath::new("max-passes"),
                "must be at least 1",
                "the default is 5",
            );
        }

        if let Some(root) = &self.root_url {
            match Url::parse(root) {
                Ok(url) if url.cannot_be_a_base() => diag.error(
                    FieldPath::new("root-url"),
                    format!("`{root}` cannot be used as a base URL"),
                ),
                Ok(_) => {}
                Err(e) => diag.error_with_hint(
                    FieldPath::new("root-url"),
                    format!("`{root}` is not an absolute URL: {e}"),
                    "use the full site URL, e.g. https://example.com",
                ),
            }
        }

        LinkRelTag::validate(&self.link_rel_tags, &mut diag);
        if let Some(authorship) = &self.authorship {
            authorship.validate(&mut diag);
        }
        if let Some(nofollow) = &self.nofollow {
            nofollow.validate(&mut diag);
        }
        self.sitemap.validate(&mut diag);
        if self.sitemap.enable && self.root_url.is_none() {
            diag.error(
                FieldPath::new("sitemap.enable"),
                "sitemap generation needs `root-url`",
            );
        }

        diag.print_warnings();
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

// ============================================================================
// tests
// ============================================================================
