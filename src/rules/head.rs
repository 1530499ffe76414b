//! `<head>` metadata rules.
//!
//! Header metatags, link-rel tags, canonical URL, RSS alternate links,
//! publication date and author links, plus the retired markers that now fail.

use kuchikiki::NodeRef;
use serde_json::Value;

use super::Context;
use crate::config::{AuthorshipConfig, LinkRelTag};
use crate::core::url::resolve;
use crate::dom::NodeExt;
use crate::dom::parse::new_element;
use crate::error::Result;
use crate::meta::normalize;
use crate::partial::{Partials, TemplateData};
use crate::utils::date::Date;
use crate::{debug, log};

/// Retired markers and what to use instead.
pub const DEPRECATED: [(&str, &str); 4] = [
    ("ak-page-title", "a <title> element in the page layout"),
    (
        "ak-siteverification",
        "a verification <meta> tag in the page layout",
    ),
    (
        "ak-google-analytics",
        "the analytics provider's snippet in the page layout",
    ),
    (
        "ak-sitemapxml",
        "a `sitemap` entry in link-rel-tags",
    ),
];

// ============================================================================
// Element rules
// ============================================================================

/// `<ak-header-metatags>`: one `<meta>` per known metadata key.
pub async fn header_metatags<P: Partials>(cx: &Context<'_, P>) -> Result<Option<String>> {
    let data = normalize(cx.metadata);
    cx.render("header-meta.html", &data).await.map(Some)
}

/// `<ak-header-linkreltags>`: one `<link rel>` per configured tag.
pub async fn link_rel_tags<P: Partials>(
    tags: &[LinkRelTag],
    cx: &Context<'_, P>,
) -> Result<Option<String>> {
    if tags.is_empty() {
        return Ok(None);
    }

    let mut out = Vec::with_capacity(tags.len());
    for tag in tags {
        let url = resolve(&tag.url, cx.render_path(), cx.metadata.root_url())?;
        out.push(render_link_rel(cx, &tag.relationship, url).await?);
    }
    Ok(Some(out.join("\n")))
}

/// `<ak-header-canonical-url>`: `<link rel="canonical">` to the rendered URL.
pub async fn canonical_url<P: Partials>(cx: &Context<'_, P>) -> Result<Option<String>> {
    match cx.metadata.rendered_url()? {
        Some(url) => render_link_rel(cx, "canonical", url).await.map(Some),
        None => {
            debug!("head"; "no render path, dropping <ak-header-canonical-url>");
            Ok(None)
        }
    }
}

/// `<publication-date>`: human-readable date from `publication_date`.
pub async fn publication_date<P: Partials>(cx: &Context<'_, P>) -> Result<Option<String>> {
    let Some(raw) = cx.metadata.get_str("publication_date") else {
        return Ok(None);
    };
    let formatted = match Date::parse(raw) {
        Some(date) => date.to_date_string(),
        None => raw.to_string(),
    };

    let mut data = TemplateData::new();
    data.insert("publication_date".into(), Value::from(formatted));
    cx.render("publication-date.html", &data).await.map(Some)
}

/// `<author-link>`: link to the document's author, or the configured default.
pub async fn author_link<P: Partials>(
    authorship: &AuthorshipConfig,
    cx: &Context<'_, P>,
) -> Result<Option<String>> {
    let authorname = cx.metadata.get_str("authorname");
    let Some(author) = authorship.author_for(authorname) else {
        debug!(
            "head";
            "no author data for {}, dropping <author-link>",
            authorname.unwrap_or("(default)")
        );
        return Ok(None);
    };

    let mut data = TemplateData::new();
    data.insert("name".into(), Value::from(author.name.as_str()));
    data.insert("fullname".into(), Value::from(author.fullname.as_str()));
    if let Some(url) = &author.url {
        data.insert("url".into(), Value::from(url.as_str()));
    }
    cx.render("author-link.html", &data).await.map(Some)
}

async fn render_link_rel<P: Partials>(
    cx: &Context<'_, P>,
    relationship: &str,
    url: String,
) -> Result<String> {
    let mut data = TemplateData::new();
    data.insert("relationship".into(), Value::from(relationship));
    data.insert("url".into(), Value::from(url));
    cx.render("link-rel.html", &data).await
}

// ============================================================================
// Mungers
// ============================================================================

/// `<rss-header-meta href>`: alternate feed link appended to `<head>`.
///
/// The marker is removed whether or not it carried an `href`.
pub fn rss_header_meta<P>(marker: &NodeRef, cx: &Context<'_, P>) -> Result<()> {
    match marker.non_empty_attr("href") {
        Some(href) => {
            let link = new_element(
                "link",
                &[
                    ("rel", "alternate"),
                    ("type", "application/rss+xml"),
                    ("href", href.trim()),
                ],
            );
            if !cx.document.append_node("head", link)? {
                log!("warn"; "no <head> for rss-header-meta {}", href);
            }
        }
        None => log!("warn"; "no href= in rss-header-meta, skipped"),
    }
    cx.document.remove(marker);
    Ok(())
}
