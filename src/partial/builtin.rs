//! Default partials rendered in Rust.
//!
//! | Template                | Data keys                                                       |
//! |-------------------------|-----------------------------------------------------------------|
//! | `header-meta.html`      | normalized metadata                                             |
//! | `link-rel.html`         | `relationship`, `url`                                           |
//! | `publication-date.html` | `publication_date` (already formatted)                          |
//! | `author-link.html`      | `fullname`, `url`                                               |
//! | `toc-group.html`        | `id`, `additional_classes`, `suppress_contents`, `content`      |
//! | `toc-item.html`         | `id`, `additional_classes`, `text_classes`, `title`, `anchor`, `content` |
//!
//! Values are escaped; `content` is inserted as-is.

use anyhow::{Result, bail};
use serde_json::Value;

use super::{Partials, TemplateData};
use crate::utils::html::{escape, escape_attr};

/// Metadata key to `<meta name>` for the header meta partial, in output order.
const HEADER_META: &[(&str, &str)] = &[
    ("keywords", "keywords"),
    ("description", "description"),
    ("subject", "subject"),
    ("copyright", "copyright"),
    ("language", "language"),
    ("robots", "robots"),
    ("revised", "revised"),
    ("abstract", "abstract"),
    ("topic", "topic"),
    ("summary", "summary"),
    ("classification", "Classification"),
    ("author", "author"),
    ("designer", "designer"),
    ("reply_to", "reply-to"),
    ("owner", "owner"),
    ("url", "url"),
    ("identifier_url", "identifier-URL"),
    ("directory", "directory"),
    ("page_name", "pagename"),
    ("category", "category"),
    ("coverage", "coverage"),
    ("distribution", "distribution"),
    ("rating", "rating"),
    ("revisit_after", "revisit-after"),
    ("subtitle", "subtitle"),
    ("target", "target"),
    ("handheld_friendly", "HandheldFriendly"),
    ("mobile_optimized", "MobileOptimized"),
    ("dc_title", "DC.title"),
    ("meta_date", "date"),
    ("og_title", "og:title"),
    ("og_description", "og:description"),
    ("og_image", "og:image"),
];

/// Partials for the default template names.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPartials;

impl BuiltinPartials {
    /// Template names this renderer understands.
    pub const TEMPLATES: [&'static str; 6] = [
        "header-meta.html",
        "link-rel.html",
        "publication-date.html",
        "author-link.html",
        "toc-group.html",
        "toc-item.html",
    ];

    /// Render synchronously; the async [`Partials`] impl delegates here.
    pub fn render_now(&self, template: &str, data: &TemplateData) -> Result<String> {
        match template {
            "header-meta.html" => Ok(header_meta(data)),
            "link-rel.html" => link_rel(data),
            "publication-date.html" => Ok(publication_date(data)),
            "author-link.html" => Ok(author_link(data)),
            "toc-group.html" => Ok(toc_group(data)),
            "toc-item.html" => Ok(toc_item(data)),
            _ => bail!("unknown template `{template}`"),
        }
    }
}

impl Partials for BuiltinPartials {
    async fn render(&self, template: &str, data: &TemplateData) -> Result<String> {
        self.render_now(template, data)
    }
}

// ============================================================================
// Templates
// ============================================================================

fn header_meta(data: &TemplateData) -> String {
    HEADER_META
        .iter()
        .filter_map(|(key, name)| {
            let value = text(data, key)?;
            Some(format!(
                r#"<meta name="{name}" content="{}">"#,
                escape_attr(&value)
            ))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn link_rel(data: &TemplateData) -> Result<String> {
    let (Some(rel), Some(url)) = (text(data, "relationship"), text(data, "url")) else {
        bail!("link-rel.html requires `relationship` and `url`");
    };
    Ok(format!(
        r#"<link rel="{}" href="{}">"#,
        escape_attr(&rel),
        escape_attr(&url)
    ))
}

fn publication_date(data: &TemplateData) -> String {
    let date = text(data, "publication_date").unwrap_or_default();
    format!(
        r#"<span class="publication-date">Date: {}</span>"#,
        escape(&date)
    )
}

fn author_link(data: &TemplateData) -> String {
    let name = text(data, "fullname")
        .or_else(|| text(data, "name"))
        .unwrap_or_default();
    match text(data, "url") {
        Some(url) => format!(
            r#"<span class="author-link"><a href="{}" rel="author">{}</a></span>"#,
            escape_attr(&url),
            escape(&name)
        ),
        None => format!(r#"<span class="author-link">{}</span>"#, escape(&name)),
    }
}

fn toc_group(data: &TemplateData) -> String {
    let content = if flag(data, "suppress_contents") {
        ""
    } else {
        raw(data, "content")
    };
    format!(
        r#"<ol{} class="{}">{content}</ol>"#,
        id_attr(data),
        classes("toc-group", data, "additional_classes")
    )
}

fn toc_item(data: &TemplateData) -> String {
    let anchor = text(data, "anchor").unwrap_or_default();
    let title = text(data, "title").unwrap_or_default();
    let text_classes = text(data, "text_classes")
        .map(|c| format!(r#" class="{}""#, escape_attr(&c)))
        .unwrap_or_default();
    format!(
        r##"<li{} class="{}"><a href="#{}"{text_classes}>{}</a>{}</li>"##,
        id_attr(data),
        classes("toc-item", data, "additional_classes"),
        escape_attr(&anchor),
        escape(&title),
        raw(data, "content"),
    )
}

// ============================================================================
// Helpers
// ============================================================================

/// Display text for a value; arrays are joined with `", "`.
fn text(data: &TemplateData, key: &str) -> Option<String> {
    let text = match data.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn raw<'a>(data: &'a TemplateData, key: &str) -> &'a str {
    data.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn flag(data: &TemplateData, key: &str) -> bool {
    match data.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        _ => false,
    }
}

fn id_attr(data: &TemplateData) -> String {
    text(data, "id")
        .map(|id| format!(r#" id="{}""#, escape_attr(&id)))
        .unwrap_or_default()
}

fn classes(base: &str, data: &TemplateData, key: &str) -> String {
    match text(data, key) {
        Some(extra) => format!("{base} {}", escape_attr(&extra)),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> TemplateData {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_header_meta_order_and_names() {
        let html = BuiltinPartials
            .render_now(
                "header-meta.html",
                &data(json!({
                    "og_title": "Metatags test",
                    "description": "A \"quoted\" page",
                    "keywords": ["rust", "html"],
                    "reply_to": "me@example.com",
                    "title": "ignored",
                })),
            )
            .unwrap();
        assert_eq!(
            html,
            [
                r#"<meta name="keywords" content="rust, html">"#,
                r#"<meta name="description" content="A &quot;quoted&quot; page">"#,
                r#"<meta name="reply-to" content="me@example.com">"#,
                r#"<meta name="og:title" content="Metatags test">"#,
            ]
            .join("\n")
        );
    }

    #[test]
    fn test_header_meta_empty() {
        let html = BuiltinPartials
            .render_now("header-meta.html", &TemplateData::new())
            .unwrap();
        assert_eq!(html, "");
    }

    #[test]
    fn test_link_rel() {
        let html = BuiltinPartials
            .render_now(
                "link-rel.html",
                &data(json!({ "relationship": "canonical", "url": "https://e.com/a.html" })),
            )
            .unwrap();
        assert_eq!(html, r#"<link rel="canonical" href="https://e.com/a.html">"#);

        assert!(
            BuiltinPartials
                .render_now("link-rel.html", &data(json!({ "relationship": "me" })))
                .is_err()
        );
    }

    #[test]
    fn test_toc_group() {
        let html = BuiltinPartials
            .render_now(
                "toc-group.html",
                &data(json!({
                    "id": "toc",
                    "additional_classes": "compact",
                    "content": "<li>x</li>",
                })),
            )
            .unwrap();
        assert_eq!(
            html,
            r#"<ol id="toc" class="toc-group compact"><li>x</li></ol>"#
        );

        let html = BuiltinPartials
            .render_now(
                "toc-group.html",
                &data(json!({ "suppress_contents": true, "content": "<li>x</li>" })),
            )
            .unwrap();
        assert_eq!(html, r#"<ol class="toc-group"></ol>"#);
    }

    #[test]
    fn test_toc_item() {
        let html = BuiltinPartials
            .render_now(
                "toc-item.html",
                &data(json!({
                    "title": "Intro & setup",
                    "anchor": "intro",
                    "text_classes": "bold",
                    "content": "",
                })),
            )
            .unwrap();
        assert_eq!(
            html,
            r##"<li class="toc-item"><a href="#intro" class="bold">Intro &amp; setup</a></li>"##
        );
    }

    #[test]
    fn test_author_link() {
        let html = BuiltinPartials
            .render_now(
                "author-link.html",
                &data(json!({ "fullname": "Jane Doe", "url": "https://jane.example" })),
            )
            .unwrap();
        assert_eq!(
            html,
            r#"<span class="author-link"><a href="https://jane.example" rel="author">Jane Doe</a></span>"#
        );
    }

    #[test]
    fn test_unknown_template() {
        let err = BuiltinPartials
            .render_now("ak_headermeta.html.njk", &TemplateData::new())
            .unwrap_err();
        assert!(err.to_string().contains("ak_headermeta.html.njk"));
    }

    #[test]
    fn test_every_listed_template_is_known() {
        let full = data(json!({ "relationship": "me", "url": "https://a.example" }));
        for template in BuiltinPartials::TEMPLATES {
            assert!(BuiltinPartials.render_now(template, &full).is_ok(), "{template}");
        }
    }

    #[tokio::test]
    async fn test_async_render() {
        let html = BuiltinPartials
            .render(
                "publication-date.html",
                &data(json!({ "publication_date": "Fri Aug 16 2019" })),
            )
            .await
            .unwrap();
        assert_eq!(
            html,
            r#"<span class="publication-date">Date: Fri Aug 16 2019</span>"#
        );
    }
}
