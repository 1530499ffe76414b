//! Lenient HTML parsing into a mutable tree.
//!
//! The html5ever tokenizer does the lexing: entity decoding, raw text in
//! `<script>`/`<style>`, and self-closing flags. The tree is built here
//! instead of by the html5ever tree builder, so elements stay where they
//! were written. Custom markers inside `<head>` are not moved into `<body>`.
//! Only the common implied end tags (`<p>`, `<li>`, table cells, ...) are
//! applied.

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};
use html5ever::{LocalName, Namespace, QualName};
use kuchikiki::{Attribute, ExpandedName, NodeRef};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Start tags that end an open `<p>`.
const CLOSES_P: &[&str] = &[
    "address", "article", "aside", "blockquote", "center", "details", "dialog", "dir", "div",
    "dl", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hgroup", "hr", "main", "menu", "nav", "ol", "p", "pre", "section", "summary",
    "table", "ul", "li", "dd", "dt", "listing", "plaintext", "xmp",
];

/// Elements an implied end tag never reaches past.
const SCOPE_BOUNDARY: &[&str] = &[
    "html", "body", "table", "td", "th", "caption", "template", "button", "applet", "object",
    "marquee",
];

// ============================================================================
// Public API
// ============================================================================

/// Parse a complete page into a document node.
pub fn parse_document(html: &str) -> NodeRef {
    build(html, true)
}

/// Parse a markup fragment into detached sibling nodes.
pub fn parse_fragment(markup: &str) -> Vec<NodeRef> {
    let root = build(markup, false);
    let nodes: Vec<_> = root.children().collect();
    for node in &nodes {
        node.detach();
    }
    nodes
}

/// Create a detached HTML element.
pub fn new_element(tag: &str, attrs: &[(&str, &str)]) -> NodeRef {
    NodeRef::new_element(
        html_name(tag),
        attrs.iter().map(|(name, value)| attribute(name, value)),
    )
}

// ============================================================================
// Tree building
// ============================================================================

fn build(markup: &str, keep_doctype: bool) -> NodeRef {
    let builder = TreeBuilder {
        root: NodeRef::new_document(),
        open: Vec::new(),
        keep_doctype,
    };
    let mut tokenizer = Tokenizer::new(builder, TokenizerOpts::default());

    let mut input = BufferQueue::new();
    input.push_back(StrTendril::from(markup));
    // The sink never asks to pause for scripts, so one feed consumes everything
    let _ = tokenizer.feed(&mut input);
    tokenizer.end();

    tokenizer.sink.root
}

/// Token sink that appends nodes to a `kuchikiki` tree as they arrive.
struct TreeBuilder {
    root: NodeRef,
    /// Stack of open elements, innermost last.
    open: Vec<NodeRef>,
    keep_doctype: bool,
}

impl TokenSink for TreeBuilder {
    type Handle = ();

    fn process_token(&mut self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => match tag.kind {
                TagKind::StartTag => return self.start_tag(tag),
                TagKind::EndTag => self.end_tag(&tag.name),
            },
            Token::CharacterTokens(text) => self.text(&text),
            Token::CommentToken(text) => self.current().append(NodeRef::new_comment(&*text)),
            Token::DoctypeToken(doctype) => {
                if self.keep_doctype {
                    let name = doctype.name.as_deref().unwrap_or("html").to_string();
                    let public_id = doctype.public_id.as_deref().unwrap_or_default().to_string();
                    let system_id = doctype.system_id.as_deref().unwrap_or_default().to_string();
                    self.root
                        .append(NodeRef::new_doctype(name, public_id, system_id));
                }
            }
            Token::NullCharacterToken | Token::EOFToken | Token::ParseError(_) => {}
        }
        TokenSinkResult::Continue
    }
}

impl TreeBuilder {
    fn current(&self) -> &NodeRef {
        self.open.last().unwrap_or(&self.root)
    }

    fn start_tag(&mut self, tag: Tag) -> TokenSinkResult<()> {
        let name = &*tag.name;
        self.close_implied(name);

        let element = NodeRef::new_element(
            QualName::new(None, Namespace::from(HTML_NAMESPACE), tag.name.clone()),
            tag.attrs
                .iter()
                .map(|attr| attribute(&attr.name.local, &attr.value))
                .collect::<Vec<_>>(),
        );
        self.current().append(element.clone());

        if tag.self_closing || VOID_ELEMENTS.contains(&name) {
            return TokenSinkResult::Continue;
        }
        self.open.push(element);

        match name {
            "script" => TokenSinkResult::RawData(RawKind::ScriptData),
            "style" | "xmp" | "iframe" | "noembed" | "noframes" | "noscript" => {
                TokenSinkResult::RawData(RawKind::Rawtext)
            }
            "title" | "textarea" => TokenSinkResult::RawData(RawKind::Rcdata),
            "plaintext" => TokenSinkResult::Plaintext,
            _ => TokenSinkResult::Continue,
        }
    }

    /// Close the nearest open element named `name`, and everything inside it.
    ///
    /// Stray end tags are dropped.
    fn end_tag(&mut self, name: &str) {
        if let Some(index) = self.open.iter().rposition(|node| local_name(node) == name) {
            self.open.truncate(index);
        }
    }

    fn text(&mut self, text: &str) {
        let current = self.current();
        if let Some(last) = current.last_child()
            && let Some(existing) = last.as_text()
        {
            existing.borrow_mut().push_str(text);
            return;
        }
        current.append(NodeRef::new_text(text));
    }

    /// Apply the end tags HTML implies when `tag` starts.
    fn close_implied(&mut self, tag: &str) {
        if CLOSES_P.contains(&tag) {
            self.close_in_scope(&["p"], &[]);
        }
        match tag {
            "li" => self.close_in_scope(&["li"], &["ol", "ul"]),
            "dt" | "dd" => self.close_in_scope(&["dt", "dd"], &["dl"]),
            "option" => {
                if self.open.last().is_some_and(|node| local_name(node) == "option") {
                    self.open.pop();
                }
            }
            "tr" => {
                self.close_in_scope(&["td", "th"], &["tr"]);
                self.close_in_scope(&["tr"], &["thead", "tbody", "tfoot"]);
            }
            "td" | "th" => self.close_in_scope(&["td", "th"], &["tr"]),
            "body" => self.close_in_scope(&["head"], &[]),
            _ => {}
        }
    }

    /// Pop up to and including the innermost open `targets` element, unless
    /// a boundary element is open inside it.
    fn close_in_scope(&mut self, targets: &[&str], boundaries: &[&str]) {
        let mut found = None;
        for (index, node) in self.open.iter().enumerate().rev() {
            let name = local_name(node);
            if targets.contains(&name) {
                found = Some(index);
                break;
            }
            if boundaries.contains(&name) || SCOPE_BOUNDARY.contains(&name) {
                break;
            }
        }
        if let Some(index) = found {
            self.open.truncate(index);
        }
    }
}

fn local_name(node: &NodeRef) -> &str {
    node.as_element()
        .map(|element| &*element.name.local)
        .unwrap_or_default()
}

#[inline]
fn html_name(tag: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(tag))
}

#[inline]
fn attribute(name: &str, value: &str) -> (ExpandedName, Attribute) {
    (
        ExpandedName::new("", name),
        Attribute {
            prefix: None,
            value: value.to_string(),
        },
    )
}
