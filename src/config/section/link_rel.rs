//! `[[link-rel-tags]]` entries.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// One `<link rel href>` emitted for every `<ak-header-linkreltags>` marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LinkRelTag {
    /// Value of the `rel` attribute (`me`, `sitemap`, `webmention`, ...).
    pub relationship: String,
    /// Target; site-relative values are resolved against the root URL.
    pub url: String,
}

impl LinkRelTag {
    pub fn new(relationship: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            relationship: relationship.into(),
            url: url.into(),
        }
    }

    pub fn validate(tags: &[Self], diag: &mut ConfigDiagnostics) {
        const FIELD: FieldPath = FieldPath::new("link-rel-tags");
        for (i, tag) in tags.iter().enumerate() {
            if tag.relationship.trim().is_empty() {
                diag.error(FIELD, format!("entry {} has an empty `relationship`", i + 1));
            }
            if tag.url.trim().is_empty() {
                diag.error(FIELD, format!("entry {} has an empty `url`", i + 1));
            }
        }
    }
}
