//! Canonical metadata view for the header meta partial.
//!
//! | Derived key      | Fallback chain                         |
//! |------------------|----------------------------------------|
//! | `og_title`       | `og_title` → `pagetitle` → `title`     |
//! | `og_description` | `og_description` → `description`       |
//! | `dc_title`       | `dc_title` → `pagetitle` → `title`     |
//! | `page_name`      | `page_name` → `pagetitle` → `title`    |
//! | `meta_date`      | `meta_date` → `rendered_date` → `publication_date` |
//!
//! A key already present in the input is never overwritten, even when its
//! value is an empty string. Only `null` counts as missing. Empty values are
//! skipped when picking a fallback source.

use serde_json::Value;

use super::{Metadata, is_present};
use crate::partial::TemplateData;

const FALLBACKS: &[(&str, &[&str])] = &[
    ("og_title", &["pagetitle", "title"]),
    ("og_description", &["description"]),
    ("dc_title", &["pagetitle", "title"]),
    ("page_name", &["pagetitle", "title"]),
    ("meta_date", &["rendered_date", "publication_date"]),
];

/// Copy every field and fill derived keys from their fallback chains.
pub fn normalize(meta: &Metadata) -> TemplateData {
    let mut data = meta.fields.clone();

    if !is_set(&data, "render_path")
        && let Some(path) = meta.render_path()
    {
        data.insert("render_path".into(), Value::from(path));
    }
    if !is_set(&data, "root_url") && !meta.root_url().is_empty() {
        data.insert("root_url".into(), Value::from(meta.root_url()));
    }
    if !is_set(&data, "rendered_url")
        && let Ok(Some(url)) = meta.rendered_url()
    {
        data.insert("rendered_url".into(), Value::from(url));
    }

    for (key, chain) in FALLBACKS {
        if is_set(&data, key) {
            continue;
        }
        let fallback = chain
            .iter()
            .find_map(|source| data.get(*source).filter(|v| is_present(v)).cloned());
        if let Some(value) = fallback {
            data.insert((*key).to_string(), value);
        }
    }

    data
}

/// The caller supplied `key`, possibly as an empty string.
fn is_set(data: &TemplateData, key: &str) -> bool {
    data.get(key).is_some_and(|value| !value.is_null())
}
