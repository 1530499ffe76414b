//! Sitemap generation.
//!
//! Builds `sitemap.xml` from the host's list of rendered documents.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/index.html</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <changefreq>weekly</changefreq>
//!     <priority>0.5</priority>
//!   </url>
//! </urlset>
//! ```

use std::borrow::Cow;

use crate::config::SitemapConfig;
use crate::core::resolve_render_path;
use crate::debug;
use crate::error::Result;
use crate::utils::date::Date;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// One rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Path relative to the site root (`blog/post.html`).
    pub render_path: String,
    /// Last modification date, if known.
    pub modified: Option<Date>,
}

impl SitemapEntry {
    pub fn new(render_path: impl Into<String>, modified: Option<Date>) -> Self {
        Self {
            render_path: render_path.into(),
            modified,
        }
    }
}

/// Render sitemap XML for every `.html` entry.
///
/// Each `<loc>` is `root_url` with its path replaced by the entry's render
/// path. Fails when the root URL cannot serve as a base.
pub fn build_sitemap(
    root_url: &str,
    entries: &[SitemapEntry],
    config: &SitemapConfig,
) -> Result<String> {
    let mut urls = Vec::with_capacity(entries.len());
    for entry in entries {
        if !entry.render_path.trim().ends_with(".html") {
            debug!("sitemap"; "skipping {}", entry.render_path);
            continue;
        }
        urls.push(UrlEntry {
            loc: resolve_render_path(&entry.render_path, root_url)?,
            lastmod: entry.modified.map(Date::to_ymd),
        });
    }

    debug!("sitemap"; "{} url(s)", urls.len());
    Ok(into_xml(&urls, config))
}

struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
}

fn into_xml(urls: &[UrlEntry], config: &SitemapConfig) -> String {
    let mut xml = String::with_capacity(256 + urls.len() * 160);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"");
    xml.push_str(SITEMAP_NS);
    xml.push_str("\">\n");

    for entry in urls {
        xml.push_str("  <url>\n    <loc>");
        xml.push_str(&escape_xml(&entry.loc));
        xml.push_str("</loc>\n");
        if let Some(lastmod) = &entry.lastmod {
            xml.push_str("    <lastmod>");
            xml.push_str(lastmod);
            xml.push_str("</lastmod>\n");
        }
        xml.push_str("    <changefreq>");
        xml.push_str(config.changefreq.as_str());
        xml.push_str("</changefreq>\n");
        xml.push_str(&format!("    <priority>{}</priority>\n", config.priority));
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&apos;"),
    )
}
