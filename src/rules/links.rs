//! External link rewriting.

use kuchikiki::NodeRef;
use url::Url;

use crate::config::NoFollowMatcher;
use crate::core::LinkKind;
use crate::debug;
use crate::dom::NodeExt;

/// Add `rel="nofollow"` to an external link whose host the matcher flags.
///
/// Links that already carry `rel` are left alone.
pub fn apply_nofollow(link: &NodeRef, matcher: &NoFollowMatcher) {
    let Some(href) = link.non_empty_attr("href") else {
        return;
    };
    if link.attr("rel").is_some() {
        return;
    }
    let Some(host) = external_host(href.trim()) else {
        return;
    };
    if matcher.is_nofollow(&host) {
        debug!("links"; "nofollow {}", href);
        link.set_attr("rel", "nofollow");
    }
}

/// Host of an absolute or protocol-relative href.
fn external_host(href: &str) -> Option<String> {
    let LinkKind::External(href) = LinkKind::parse(href) else {
        return None;
    };
    let url = match href.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("https://{rest}")),
        None => Url::parse(href),
    };
    url.ok()?.host_str().map(str::to_string)
}
