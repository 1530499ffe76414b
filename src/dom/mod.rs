//! Mutable document tree.
//!
//! [`Document`] owns one parsed page for the duration of a render. Rules query
//! it with CSS selectors and splice generated markup in place of markers.
//!
//! The tree is reference counted and therefore `!Send`; a document never
//! leaves the task that parsed it.

mod node;
pub mod parse;

use kuchikiki::NodeRef;

use crate::error::{Error, Result};

pub use node::NodeExt;

/// A parsed HTML page.
#[derive(Debug, Clone)]
pub struct Document {
    root: NodeRef,
}

impl Document {
    /// Parse a page leniently. Unknown elements stay where they were written.
    pub fn parse(html: &str) -> Self {
        Self {
            root: parse::parse_document(html),
        }
    }

    /// The document node.
    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// All elements matching `selector`, in document order.
    ///
    /// Results are collected up front so callers can mutate while iterating.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeRef>> {
        select_in(&self.root, selector)
    }

    /// First element matching `selector`.
    pub fn select_first(&self, selector: &str) -> Result<Option<NodeRef>> {
        Ok(self.select(selector)?.into_iter().next())
    }

    /// Whether any element matches `selector`.
    pub fn matches(&self, selector: &str) -> Result<bool> {
        Ok(self.select_first(selector)?.is_some())
    }

    /// Whether `node` is still attached to this document.
    pub fn contains(&self, node: &NodeRef) -> bool {
        *node == self.root || node.ancestors().any(|ancestor| ancestor == self.root)
    }

    /// Replace `node` with the nodes parsed from `markup`.
    ///
    /// Empty markup removes the node.
    pub fn replace_with_markup(&self, node: &NodeRef, markup: &str) {
        for replacement in parse::parse_fragment(markup) {
            node.insert_before(replacement);
        }
        node.detach();
    }

    /// Remove `node` (and its subtree) from the document.
    pub fn remove(&self, node: &NodeRef) {
        node.detach();
    }

    /// Append parsed `markup` to the first element matching `parent_selector`.
    ///
    /// Returns `false` when no such parent exists.
    pub fn append_markup(&self, parent_selector: &str, markup: &str) -> Result<bool> {
        let Some(parent) = self.select_first(parent_selector)? else {
            return Ok(false);
        };
        for node in parse::parse_fragment(markup) {
            parent.append(node);
        }
        Ok(true)
    }

    /// Append an already-built node to the first element matching `parent_selector`.
    pub fn append_node(&self, parent_selector: &str, node: NodeRef) -> Result<bool> {
        let Some(parent) = self.select_first(parent_selector)? else {
            return Ok(false);
        };
        parent.append(node);
        Ok(true)
    }

    /// Serialise the whole document.
    pub fn to_html(&self) -> String {
        self.root.to_string()
    }
}

/// Elements matching `selector` among `scope` and its descendants.
pub fn select_in(scope: &NodeRef, selector: &str) -> Result<Vec<NodeRef>> {
    let matches = scope
        .select(selector)
        .map_err(|()| Error::InvalidSelector(selector.to_string()))?;
    Ok(matches.map(|m| m.as_node().clone()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html><head><title>T</title><ak-header-metatags></ak-header-metatags></head>\
        <body><p class=\"lead\">Hi</p><toc-item title=\"A\" anchor=\"a\"></toc-item></body></html>";

    #[test]
    fn test_select_in_document_order() {
        let doc = Document::parse("<div><p id=\"1\"></p><section><p id=\"2\"></p></section><p id=\"3\"></p></div>");
        let ids: Vec<_> = doc
            .select("p")
            .unwrap()
            .iter()
            .filter_map(|p| p.attr("id"))
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(PAGE);
        let err = doc.select("p[").unwrap_err();
        assert!(matches!(err, Error::InvalidSelector(_)));
    }

    #[test]
    fn test_replace_with_markup() {
        let doc = Document::parse(PAGE);
        let marker = doc.select_first("ak-header-metatags").unwrap().unwrap();
        doc.replace_with_markup(&marker, r#"<meta name="description" content="d">"#);

        assert!(!doc.contains(&marker));
        assert!(!doc.matches("ak-header-metatags").unwrap());
        assert!(doc.to_html().contains(
            r#"<title>T</title><meta name="description" content="d"></head>"#
        ));
    }

    #[test]
    fn test_replace_with_empty_markup_removes() {
        let doc = Document::parse(PAGE);
        let marker = doc.select_first("toc-item").unwrap().unwrap();
        doc.replace_with_markup(&marker, "");
        assert!(!doc.matches("toc-item").unwrap());
        assert!(doc.to_html().contains("<p class=\"lead\">Hi</p></body>"));
    }

    #[test]
    fn test_contains_tracks_detached_subtrees() {
        let doc = Document::parse("<div><span><b>x</b></span></div>");
        let b = doc.select_first("b").unwrap().unwrap();
        let span = doc.select_first("span").unwrap().unwrap();
        assert!(doc.contains(&b));
        doc.remove(&span);
        assert!(!doc.contains(&b));
    }

    #[test]
    fn test_append_markup() {
        let doc = Document::parse(PAGE);
        assert!(doc
            .append_markup("head", r#"<link rel="alternate" href="/rss.xml">"#)
            .unwrap());
        assert!(doc
            .to_html()
            .contains(r#"<link rel="alternate" href="/rss.xml"></head>"#));

        assert!(!doc.append_markup("aside", "<p></p>").unwrap());
    }
}
