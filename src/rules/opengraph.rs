//! Open Graph image promotion.
//!
//! `<open-graph-promote-images root="article">` in `<head>` collects image
//! candidates from the document and appends one `<meta name="og:image">` per
//! new absolute URL.
//!
//! Candidates, in order:
//! 1. `{root} img[src]` with class `opengraph-promote`, or without class
//!    `opengraph-no-promote`
//! 2. `{root} meta-og-image[src]`
//! 3. `{root} opengraph-image[href]` (removed once collected)
//!
//! The marker is only removed once at least one image was promoted, so a
//! marker whose images arrive through a later partial keeps working.

use kuchikiki::NodeRef;

use super::Context;
use crate::core::url::{is_denylisted, resolve};
use crate::dom::parse::new_element;
use crate::dom::{NodeExt, select_in};
use crate::error::Result;
use crate::{debug, log};

pub const SELECTOR: &str = "html head open-graph-promote-images";

pub fn promote_images<P>(marker: &NodeRef, cx: &Context<'_, P>) -> Result<()> {
    let candidates = collect_candidates(marker, cx)?;

    let mut promoted = 0usize;
    for href in candidates {
        let href = href.trim();
        if href.is_empty() {
            debug!("og"; "skipping image with empty href");
            continue;
        }
        if is_denylisted(href) {
            debug!("og"; "skipping denylisted image {}", href);
            continue;
        }

        let url = match resolve(href, cx.render_path(), cx.metadata.root_url()) {
            Ok(url) => url,
            Err(e) => {
                log!("og"; "skipping image: {}", e);
                continue;
            }
        };

        if has_meta_with_content(cx, &url)? {
            continue;
        }

        let meta = new_element("meta", &[("name", "og:image"), ("content", &url)]);
        if cx.document.append_node("head", meta)? {
            debug!("og"; "promoted {}", url);
            promoted += 1;
        }
    }

    if promoted > 0 {
        cx.document.remove(marker);
    }
    Ok(())
}

fn collect_candidates<P>(marker: &NodeRef, cx: &Context<'_, P>) -> Result<Vec<String>> {
    let scope = marker
        .non_empty_attr("root")
        .map(|root| format!("{} ", root.trim()))
        .unwrap_or_default();
    let root = cx.document.root();

    let mut hrefs = Vec::new();

    for img in select_in(root, &format!("{scope}img"))? {
        if img.has_class("opengraph-promote") || !img.has_class("opengraph-no-promote") {
            hrefs.extend(img.attr("src"));
        }
    }

    for marker in select_in(root, &format!("{scope}meta-og-image"))? {
        hrefs.extend(marker.attr("src"));
    }

    for marker in select_in(root, &format!("{scope}opengraph-image"))? {
        hrefs.extend(marker.attr("href"));
        cx.document.remove(&marker);
    }

    Ok(hrefs)
}

/// Whether some `<meta>` in the current tree already has this exact `content`.
fn has_meta_with_content<P>(cx: &Context<'_, P>, content: &str) -> Result<bool> {
    Ok(cx
        .document
        .select("meta")?
        .iter()
        .any(|meta| meta.attr("content").as_deref() == Some(content)))
}
