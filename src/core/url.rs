//! Href resolution against a document's render location.
//!
//! | Href | Render path | Result (root `https://example.com`) |
//! |------|-------------|-------------------------------------|
//! | `http://other.com/x.jpg` | any | unchanged |
//! | `/img/x.jpg` | any | `https://example.com/img/x.jpg` |
//! | `x.jpg` | `/blog/post.html` | `https://example.com/blog/x.jpg` |
//! | `x.jpg` | `/index.html` | `https://example.com/x.jpg` |
//!
//! Root-relative hrefs replace the whole path of the root URL; they are not
//! appended to it.

use url::Url;

use super::LinkKind;
use crate::error::{Error, Result};

/// Utility icons that are never promoted to `og:image`.
pub const DENYLISTED_IMAGES: [&str; 3] = [
    "/img/extlink.png",
    "/img/rss_button.png",
    "/img/rss_button.gif",
];

/// Check whether an image href is one of the denylisted utility icons.
#[inline]
pub fn is_denylisted(href: &str) -> bool {
    DENYLISTED_IMAGES.iter().any(|icon| href.ends_with(icon))
}

/// Resolve `href` to an absolute URL.
///
/// `render_path` is where the referencing document renders to, relative to
/// the site root (`/blog/post.html` or `blog/post.html`).
pub fn resolve(href: &str, render_path: &str, root_url: &str) -> Result<String> {
    let href = href.trim();
    if href.is_empty() {
        return Err(Error::invalid_reference(href, "empty reference"));
    }

    let path = match LinkKind::parse(href) {
        LinkKind::External(url) => return Ok(url.to_string()),
        LinkKind::SiteRoot(path) => path.to_string(),
        LinkKind::DocumentRelative(rel) => match document_dir(render_path) {
            "/" | "." => format!("/{rel}"),
            dir if dir.starts_with('/') => format!("{dir}/{rel}"),
            dir => format!("/{dir}/{rel}"),
        },
    };

    let base = parse_root(href, root_url)?;
    base.join(&path)
        .map(String::from)
        .map_err(|e| Error::invalid_reference(href, e.to_string()))
}

/// Resolve a site-root-relative render path (the document's own URL).
pub fn resolve_render_path(render_path: &str, root_url: &str) -> Result<String> {
    let path = render_path.trim();
    if path.is_empty() {
        return Err(Error::invalid_reference(path, "empty render path"));
    }
    if path.starts_with('/') {
        resolve(path, "/", root_url)
    } else {
        resolve(&format!("/{path}"), "/", root_url)
    }
}

fn parse_root(href: &str, root_url: &str) -> Result<Url> {
    let base = Url::parse(root_url.trim()).map_err(|e| {
        Error::invalid_reference(href, format!("invalid root URL `{root_url}`: {e}"))
    })?;
    if base.cannot_be_a_base() {
        return Err(Error::invalid_reference(
            href,
            format!("root URL `{root_url}` cannot be a base"),
        ));
    }
    Ok(base)
}

/// Directory portion of a render path, with `dirname` semantics.
///
/// `/blog/post.html` -> `/blog`, `/index.html` -> `/`, `index.html` -> `.`
fn document_dir(render_path: &str) -> &str {
    let trimmed = render_path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return if render_path.trim().starts_with('/') { "/" } else { "." };
    }
    match trimmed.rfind('/') {
        None => ".",
        Some(0) => "/",
        Some(pos) => &trimmed[..pos],
    }
}
