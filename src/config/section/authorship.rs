//! `[authorship]` section.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AuthorshipConfig {
    /// Author used when a document has no `authorname`.
    pub default_author_name: Option<String>,
    /// Known authors, looked up by `name`.
    pub authors: Vec<Author>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Author {
    pub name: String,
    pub fullname: String,
    pub url: Option<String>,
}

impl AuthorshipConfig {
    /// Author for a document: its own `authorname`, else the default.
    pub fn author_for(&self, authorname: Option<&str>) -> Option<&Author> {
        let name = authorname.or(self.default_author_name.as_deref())?;
        self.authors.iter().find(|author| author.name == name)
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.authors.is_empty() {
            diag.warn(
                FieldPath::new("authorship.authors"),
                "no authors configured, <author-link> markers will be removed",
            );
        }
        if let Some(default) = &self.default_author_name
            && !self.authors.iter().any(|a| &a.name == default)
        {
            diag.error_with_hint(
                FieldPath::new("authorship.default-author-name"),
                format!("`{default}` is not listed in authorship.authors"),
                "add an [[authorship.authors]] entry with this name",
            );
        }
        for author in &self.authors {
            if author.name.trim().is_empty() {
                diag.error(
                    FieldPath::new("authorship.authors"),
                    "author entries need a non-empty `name`",
                );
            }
        }
    }
}
