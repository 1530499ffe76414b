//! `[nofollow]` section.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Host patterns deciding which external links get `rel="nofollow"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NoFollowConfig {
    /// Hosts matching any of these get `nofollow`...
    pub blacklist: Vec<String>,
    /// ...unless they also match one of these.
    pub whitelist: Vec<String>,
}

/// Compiled form of [`NoFollowConfig`].
#[derive(Debug, Clone)]
pub struct NoFollowMatcher {
    blacklist: Vec<Regex>,
    whitelist: Vec<Regex>,
}

impl NoFollowConfig {
    pub fn compile(&self) -> Result<NoFollowMatcher, regex::Error> {
        Ok(NoFollowMatcher {
            blacklist: compile_all(&self.blacklist)?,
            whitelist: compile_all(&self.whitelist)?,
        })
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let lists = [
            (FieldPath::new("nofollow.blacklist"), &self.blacklist),
            (FieldPath::new("nofollow.whitelist"), &self.whitelist),
        ];
        for (field, patterns) in lists {
            for pattern in patterns {
                if let Err(e) = Regex::new(pattern) {
                    diag.error(field, format!("invalid pattern `{pattern}`: {e}"));
                }
            }
        }
        if self.blacklist.is_empty() {
            diag.warn(
                FieldPath::new("nofollow.blacklist"),
                "empty blacklist, no link will get rel=\"nofollow\"",
            );
        }
    }
}

impl NoFollowMatcher {
    /// Whether links to `host` should carry `rel="nofollow"`.
    pub fn is_nofollow(&self, host: &str) -> bool {
        self.blacklist.iter().any(|re| re.is_match(host))
            && !self.whitelist.iter().any(|re| re.is_match(host))
    }
}

fn compile_all(patterns: &[String]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}
