//! Error types for rule processing and pipeline execution.
//!
//! [`Error`] is what a single rule (or the URL resolver) produces.
//! [`PipelineError`] wraps it with the rule name and pass number so the host
//! can report which marker broke a document.

use thiserror::Error;

/// Result alias for rule-level operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

// ============================================================================
// Error
// ============================================================================

/// Rule-level errors.
#[derive(Debug, Error)]
pub enum Error {
    /// A retained legacy marker was found in the document.
    #[error("<{tag}> is no longer supported, use {replacement} instead")]
    DeprecatedFeature {
        tag: &'static str,
        replacement: &'static str,
    },

    /// A structural marker is missing a required attribute (or it is empty).
    #[error("<{tag}> requires a non-empty `{attribute}` attribute")]
    MissingAttribute {
        tag: &'static str,
        attribute: &'static str,
    },

    /// A URL or path could not be resolved.
    #[error("cannot resolve `{href}`: {reason}")]
    InvalidReference { href: String, reason: String },

    /// The partial renderer failed.
    #[error("failed to render partial `{template}`")]
    TemplateRenderFailure {
        template: String,
        #[source]
        source: anyhow::Error,
    },

    /// A selector assembled from marker attributes could not be compiled.
    #[error("invalid selector `{0}`")]
    InvalidSelector(String),
}

impl Error {
    pub fn invalid_reference(href: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            href: href.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-friendly name of the error category.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DeprecatedFeature { .. } => "deprecated-feature",
            Self::MissingAttribute { .. } => "missing-attribute",
            Self::InvalidReference { .. } => "invalid-reference",
            Self::TemplateRenderFailure { .. } => "template-render-failure",
            Self::InvalidSelector(_) => "invalid-selector",
        }
    }
}

// ============================================================================
// PipelineError
// ============================================================================

/// A rule failed and aborted the pipeline for one document.
#[derive(Debug, Error)]
#[error("rule `{rule}` failed in pass {pass}")]
pub struct PipelineError {
    /// Name of the failing rule (its marker tag or selector).
    pub rule: String,
    /// 1-based pass number.
    pub pass: usize,
    #[source]
    pub source: Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deprecated_display_names_replacement() {
        let err = Error::DeprecatedFeature {
            tag: "ak-sitemapxml",
            replacement: "a sitemap link-rel tag",
        };
        let display = err.to_string();
        assert!(display.contains("<ak-sitemapxml>"));
        assert!(display.contains("a sitemap link-rel tag"));
        assert_eq!(err.kind(), "deprecated-feature");
    }

    #[test]
    fn test_pipeline_error_keeps_source() {
        let err = PipelineError {
            rule: "toc-item".into(),
            pass: 2,
            source: Error::MissingAttribute {
                tag: "toc-item",
                attribute: "anchor",
            },
        };
        assert_eq!(err.to_string(), "rule `toc-item` failed in pass 2");
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("<toc-item> requires a non-empty `anchor` attribute")
        );
    }
}
