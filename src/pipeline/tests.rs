//! End-to-end pipeline scenarios.

use super::*;
use crate::config::{Author, AuthorshipConfig, LinkRelTag, NoFollowConfig, PluginOptions};
use crate::dom::NodeExt;
use crate::error::Error;
use crate::partial::{BuiltinPartials, TemplateData};
use crate::rules::{Rule, register_rule_set};

const ROOT: &str = "https://docs.example.org";

fn page(head: &str, body: &str) -> String {
    format!("<!DOCTYPE html>\n<html><head><title>Test</title>{head}</head><body>{body}</body></html>")
}

fn default_rules() -> RuleSet<BuiltinPartials> {
    register_rule_set(&PluginOptions::new().with_root_url(ROOT), BuiltinPartials).unwrap()
}

fn meta(render_path: &str) -> Metadata {
    Metadata::new().with_render_path(render_path)
}

async fn render(html: &str, metadata: &Metadata, rules: &RuleSet<BuiltinPartials>) -> Document {
    let out = render_html(html, metadata, rules).await.unwrap();
    Document::parse(&out)
}

fn attr_of(doc: &Document, selector: &str, attr: &str) -> Option<String> {
    doc.select_first(selector).unwrap().and_then(|n| n.attr(attr))
}

fn count(doc: &Document, selector: &str) -> usize {
    doc.select(selector).unwrap().len()
}

// ============================================================================
// header metadata
// ============================================================================

#[tokio::test]
async fn test_header_metatags() {
    let metadata = meta("metatags.html")
        .with("title", "Metatags test")
        .with("description", "Way out man, so far out")
        .with("keywords", "Foo Bar Baz")
        .with("classification", "Top Secret")
        .with("reply_to", "Him")
        .with("identifier_url", "http://meta.url/identifier")
        .with("handheld_friendly", "Nope");

    let doc = render(
        &page(
            "<ak-header-metatags></ak-header-metatags><ak-header-canonical-url></ak-header-canonical-url>",
            "<article>Hi</article>",
        ),
        &metadata,
        &default_rules(),
    )
    .await;

    let content = |name: &str| attr_of(&doc, &format!("head meta[name=\"{name}\"]"), "content");
    assert_eq!(content("keywords").as_deref(), Some("Foo Bar Baz"));
    assert_eq!(content("description").as_deref(), Some("Way out man, so far out"));
    assert_eq!(content("Classification").as_deref(), Some("Top Secret"));
    assert_eq!(content("reply-to").as_deref(), Some("Him"));
    assert_eq!(content("identifier-URL").as_deref(), Some("http://meta.url/identifier"));
    assert_eq!(content("HandheldFriendly").as_deref(), Some("Nope"));
    assert_eq!(content("pagename").as_deref(), Some("Metatags test"));
    assert_eq!(content("DC.title").as_deref(), Some("Metatags test"));
    assert_eq!(content("og:title").as_deref(), Some("Metatags test"));
    assert_eq!(content("og:description").as_deref(), Some("Way out man, so far out"));
    assert_eq!(
        attr_of(&doc, "head link[rel=\"canonical\"]", "href").as_deref(),
        Some("https://docs.example.org/metatags.html")
    );
    assert_eq!(count(&doc, "ak-header-metatags, ak-header-canonical-url"), 0);
}

#[tokio::test]
async fn test_self_closing_markers_in_head() {
    let metadata = meta("metatags.html")
        .with("title", "Self closing")
        .with("description", "Short form markers");

    let doc = render(
        &page(
            "<ak-header-metatags/><ak-header-canonical-url/>",
            "<article>&copy; 2024 Docs</article>",
        ),
        &metadata,
        &default_rules(),
    )
    .await;

    let content = |name: &str| attr_of(&doc, &format!("head meta[name=\"{name}\"]"), "content");
    assert_eq!(content("description").as_deref(), Some("Short form markers"));
    assert_eq!(content("og:title").as_deref(), Some("Self closing"));
    assert_eq!(count(&doc, "head link[rel=\"canonical\"]"), 1);
    assert_eq!(count(&doc, "ak-header-metatags, ak-header-canonical-url"), 0);
    assert_eq!(count(&doc, "html > body > article"), 1);
    assert_eq!(
        doc.select_first("article").unwrap().unwrap().text_contents(),
        "\u{a9} 2024 Docs"
    );
}

#[tokio::test]
async fn test_head_script_survives_render() {
    let script = "if (a < b && b > c) { document.write('<p>x</p>'); }";
    let out = render_html(
        &page(
            &format!("<script>{script}</script><ak-header-metatags></ak-header-metatags>"),
            "<p>body</p>",
        ),
        &meta("script.html").with("title", "Script"),
        &default_rules(),
    )
    .await
    .unwrap();

    assert!(out.contains(&format!("<script>{script}</script>")), "{out}");
    let doc = Document::parse(&out);
    assert_eq!(count(&doc, "head > script"), 1);
    assert_eq!(count(&doc, "html > body > p"), 1);
    assert_eq!(count(&doc, "head meta[name=\"og:title\"]"), 1);
}

#[tokio::test]
async fn test_link_rel_tags() {
    let options = PluginOptions::new()
        .with_root_url(ROOT)
        .with_link_rel_tag(LinkRelTag::new("foo", "http://foo.bar"))
        .with_link_rel_tag(LinkRelTag::new("gronk", "http://gronk.bar"))
        .with_link_rel_tag(LinkRelTag::new("sitemap", "/sitemap.xml"));
    let rules = register_rule_set(&options, BuiltinPartials).unwrap();

    let doc = render(
        &page("<ak-header-linkreltags></ak-header-linkreltags>", ""),
        &meta("blog/linkreltags.html"),
        &rules,
    )
    .await;

    assert_eq!(attr_of(&doc, "head link[rel=\"foo\"]", "href").as_deref(), Some("http://foo.bar"));
    assert_eq!(attr_of(&doc, "head link[rel=\"gronk\"]", "href").as_deref(), Some("http://gronk.bar"));
    assert_eq!(
        attr_of(&doc, "head link[rel=\"sitemap\"]", "href").as_deref(),
        Some("https://docs.example.org/sitemap.xml")
    );
}

#[tokio::test]
async fn test_link_rel_tags_without_config_removes_marker() {
    let doc = render(
        &page("<ak-header-linkreltags></ak-header-linkreltags>", ""),
        &meta("index.html"),
        &default_rules(),
    )
    .await;
    assert_eq!(count(&doc, "ak-header-linkreltags"), 0);
    assert_eq!(count(&doc, "head link"), 0);
}

#[tokio::test]
async fn test_link_rel_resolution_failure_is_fatal() {
    // no root URL anywhere: site-relative tags cannot be resolved
    let options = PluginOptions::new().with_link_rel_tag(LinkRelTag::new("sitemap", "/sitemap.xml"));
    let rules = register_rule_set(&options, BuiltinPartials).unwrap();

    let err = render_html(
        &page("<ak-header-linkreltags></ak-header-linkreltags>", ""),
        &meta("index.html"),
        &rules,
    )
    .await
    .unwrap_err();
    assert_eq!(err.rule, "ak-header-linkreltags");
    assert!(matches!(err.source, Error::InvalidReference { .. }));
}

#[tokio::test]
async fn test_canonical_without_render_path() {
    let doc = render(
        &page("<ak-header-canonical-url></ak-header-canonical-url>", ""),
        &Metadata::new(),
        &default_rules(),
    )
    .await;
    assert_eq!(count(&doc, "ak-header-canonical-url"), 0);
    assert_eq!(count(&doc, "link[rel=\"canonical\"]"), 0);
}

#[tokio::test]
async fn test_metadata_root_url_wins_over_options() {
    let metadata = meta("about.html").with_root_url("https://mirror.example.org");
    let doc = render(
        &page("<ak-header-canonical-url></ak-header-canonical-url>", ""),
        &metadata,
        &default_rules(),
    )
    .await;
    assert_eq!(
        attr_of(&doc, "link[rel=\"canonical\"]", "href").as_deref(),
        Some("https://mirror.example.org/about.html")
    );
}

#[tokio::test]
async fn test_rss_header_meta() {
    let doc = render(
        &page("", "<rss-header-meta href=\"/rss.xml\"></rss-header-meta><rss-header-meta></rss-header-meta>"),
        &meta("index.html"),
        &default_rules(),
    )
    .await;
    assert_eq!(
        attr_of(&doc, "head link[rel=\"alternate\"]", "href").as_deref(),
        Some("/rss.xml")
    );
    assert_eq!(count(&doc, "head link[type=\"application/rss+xml\"]"), 1);
    assert_eq!(count(&doc, "rss-header-meta"), 0);
}

// ============================================================================
// body markers
// ============================================================================

#[tokio::test]
async fn test_publication_date() {
    let rules = default_rules();
    let body = "<article><publication-date></publication-date></article>";

    let doc = render(&page("", body), &meta("p.html").with("publication_date", "2019-08-16T12:54:00-07:00"), &rules).await;
    assert!(doc.to_html().contains("Date: Fri Aug 16 2019"));

    let doc = render(&page("", body), &meta("p.html").with("publication_date", "August 16, 2019 12:54 PM PDT"), &rules).await;
    assert!(doc.to_html().contains("Date: August 16, 2019 12:54 PM PDT"));

    let doc = render(&page("", body), &meta("p.html"), &rules).await;
    assert_eq!(count(&doc, "publication-date, .publication-date"), 0);
}

#[tokio::test]
async fn test_author_link() {
    let options = PluginOptions::new().with_root_url(ROOT).with_authorship(AuthorshipConfig {
        default_author_name: Some("jane".into()),
        authors: vec![Author {
            name: "jane".into(),
            fullname: "Jane Doe".into(),
            url: Some("https://jane.example".into()),
        }],
    });
    let rules = register_rule_set(&options, BuiltinPartials).unwrap();
    let body = "<author-link></author-link>";

    let doc = render(&page("", body), &meta("a.html"), &rules).await;
    assert_eq!(
        attr_of(&doc, ".author-link a[rel=\"author\"]", "href").as_deref(),
        Some("https://jane.example")
    );

    let doc = render(&page("", body), &meta("a.html").with("authorname", "stranger"), &rules).await;
    assert_eq!(count(&doc, "author-link, .author-link"), 0);
}

#[tokio::test]
async fn test_author_link_ignored_without_authorship() {
    let doc = render(&page("", "<author-link></author-link>"), &meta("a.html"), &default_rules()).await;
    assert_eq!(count(&doc, "author-link"), 1);
}

#[tokio::test]
async fn test_nested_toc_converges() {
    let body = r#"<article><toc-group>
<toc-item title="Installation" anchor="install"></toc-item>
<toc-item title="Custom tags" anchor="custom-tags">
  <toc-group>
    <toc-item title="Metadata in page header" anchor="metadata"></toc-item>
    <toc-item title="Generating link rel= tags in header" anchor="link-rel"></toc-item>
  </toc-group>
</toc-item>
</toc-group></article>"#;

    let rules = default_rules();
    let document = Document::parse(&page("", body));
    let outcome = Pipeline::run(document, &meta("tocgroup.html"), &rules).await.unwrap();

    assert!(outcome.converged);
    assert!(outcome.passes >= 2, "nested markers need a re-scan");

    let doc = outcome.document;
    assert_eq!(count(&doc, "toc-group, toc-item"), 0);
    assert_eq!(count(&doc, "article ol li a[href=\"#install\"]"), 1);
    assert_eq!(count(&doc, "article ol li ol li a[href=\"#metadata\"]"), 1);
    assert_eq!(count(&doc, "article ol li ol li a[href=\"#link-rel\"]"), 1);
    let link = doc
        .select_first("a[href=\"#link-rel\"]")
        .unwrap()
        .unwrap();
    assert_eq!(link.text_contents(), "Generating link rel= tags in header");
}

#[tokio::test]
async fn test_toc_item_without_anchor_aborts() {
    let err = render_html(
        &page("", "<toc-item title=\"Intro\"></toc-item>"),
        &meta("toc.html"),
        &default_rules(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.rule, "toc-item");
    assert_eq!(err.pass, 1);
    assert!(matches!(
        err.source,
        Error::MissingAttribute {
            tag: "toc-item",
            attribute: "anchor"
        }
    ));
}

// ============================================================================
// deprecated markers
// ============================================================================

#[tokio::test]
async fn test_deprecated_markers_fail() {
    let rules = default_rules();
    for tag in ["ak-page-title", "ak-siteverification", "ak-google-analytics", "ak-sitemapxml"] {
        let err = render_html(&page(&format!("<{tag}></{tag}>"), ""), &meta("x.html"), &rules)
            .await
            .unwrap_err();
        assert_eq!(err.rule, tag);
        assert!(
            matches!(err.source, Error::DeprecatedFeature { tag: t, .. } if t == tag),
            "{tag}"
        );
    }
}

// ============================================================================
// open graph images
// ============================================================================

const PROMOTE: &str = "<open-graph-promote-images></open-graph-promote-images>";

#[tokio::test]
async fn test_promote_images() {
    let body = r#"<article>
<img src="http://foo.bar/this-should-be-promoted-default-action.jpg">
<img class="opengraph-promote" src="http://foo.bar/should-be-promoted-class.jpg">
<img class="opengraph-no-promote" src="http://foo.bar/should-not-be-promoted-class.jpg">
<img src="http://foo.bar/img/extlink.png">
<img src="http://foo.bar/img/rss_button.png">
<img src="http://foo.bar/img/rss_button.gif">
</article>"#;

    let doc = render(&page(PROMOTE, body), &meta("index.html"), &default_rules()).await;

    assert_eq!(count(&doc, "head meta[name=\"og:image\"]"), 2);
    let has = |url: &str| count(&doc, &format!("head meta[content=\"{url}\"]")) == 1;
    assert!(has("http://foo.bar/this-should-be-promoted-default-action.jpg"));
    assert!(has("http://foo.bar/should-be-promoted-class.jpg"));
    assert!(!has("http://foo.bar/should-not-be-promoted-class.jpg"));
    assert!(!has("http://foo.bar/img/extlink.png"));
    assert_eq!(count(&doc, "open-graph-promote-images"), 0);
}

#[tokio::test]
async fn test_opengraph_image_markers() {
    let body = r#"<opengraph-image href="http://some.where"></opengraph-image>
<opengraph-image href="http://else.where"></opengraph-image>"#;
    let doc = render(&page(PROMOTE, body), &meta("index.html"), &default_rules()).await;

    assert_eq!(count(&doc, "head meta[name=\"og:image\"]"), 2);
    assert_eq!(count(&doc, "head meta[content=\"http://some.where\"]"), 1);
    assert_eq!(count(&doc, "head meta[content=\"http://else.where\"]"), 1);
    assert_eq!(count(&doc, "body opengraph-image"), 0);
}

#[tokio::test]
async fn test_promote_resolves_relative_images() {
    let body = r#"<img src="/img/hero.jpg"><meta-og-image src="card.png"></meta-og-image>"#;
    let doc = render(&page(PROMOTE, body), &meta("/blog/post.html"), &default_rules()).await;

    assert_eq!(count(&doc, "head meta[content=\"https://docs.example.org/img/hero.jpg\"]"), 1);
    assert_eq!(count(&doc, "head meta[content=\"https://docs.example.org/blog/card.png\"]"), 1);
}

#[tokio::test]
async fn test_promote_scoped_by_root() {
    let head = r#"<open-graph-promote-images root="article"></open-graph-promote-images>"#;
    let body = r#"<nav><img src="/logo.png"></nav><article><img src="/inside.png"></article>"#;
    let doc = render(&page(head, body), &meta("index.html"), &default_rules()).await;

    assert_eq!(count(&doc, "head meta[name=\"og:image\"]"), 1);
    assert_eq!(count(&doc, "head meta[content=\"https://docs.example.org/inside.png\"]"), 1);
}

#[tokio::test]
async fn test_same_image_twice_promotes_once() {
    let body = r#"<img src="https://cdn.example/a.jpg"><img src="https://cdn.example/a.jpg">"#;
    let doc = render(&page(PROMOTE, body), &meta("index.html"), &default_rules()).await;
    assert_eq!(count(&doc, "head meta[name=\"og:image\"]"), 1);
}

#[tokio::test]
async fn test_marker_stays_without_images() {
    let body = r#"<img class="opengraph-no-promote" src="/x.png"><img src="/img/extlink.png">"#;
    let doc = render(&page(PROMOTE, body), &meta("index.html"), &default_rules()).await;
    assert_eq!(count(&doc, "head meta[name=\"og:image\"]"), 0);
    assert_eq!(count(&doc, "html head open-graph-promote-images"), 1);
}

#[tokio::test]
async fn test_unresolvable_image_is_skipped() {
    // no root URL: the relative image is skipped, the absolute one promoted
    let rules = register_rule_set(&PluginOptions::new(), BuiltinPartials).unwrap();
    let body = r#"<img src="local.png"><img src="https://cdn.example/b.jpg">"#;
    let doc = render(&page(PROMOTE, body), &meta("index.html"), &rules).await;
    assert_eq!(count(&doc, "head meta[name=\"og:image\"]"), 1);
    assert_eq!(count(&doc, "head meta[content=\"https://cdn.example/b.jpg\"]"), 1);
}

#[tokio::test]
async fn test_invalid_root_selector_fails() {
    let head = r#"<open-graph-promote-images root="article["></open-graph-promote-images>"#;
    let err = render_html(&page(head, ""), &meta("index.html"), &default_rules())
        .await
        .unwrap_err();
    assert_eq!(err.rule, "html head open-graph-promote-images");
    assert!(matches!(err.source, Error::InvalidSelector(_)));
}

// ============================================================================
// ordering, idempotence, convergence
// ============================================================================

fn og_page() -> String {
    page(
        &format!("<ak-header-metatags></ak-header-metatags>{PROMOTE}"),
        r#"<img src="/img/hero.jpg">"#,
    )
}

fn og_meta() -> Metadata {
    meta("index.html").with("og_image", "https://docs.example.org/img/hero.jpg")
}

#[tokio::test]
async fn test_metatags_before_promotion_suppresses_duplicate() {
    let rules = RuleSet::new(BuiltinPartials)
        .with_root_url(Some(ROOT.into()))
        .with_rule(Rule::header_metatags())
        .unwrap()
        .with_rule(Rule::promote_images())
        .unwrap();
    let doc = render(&og_page(), &og_meta(), &rules).await;
    assert_eq!(count(&doc, "meta[name=\"og:image\"]"), 1);
}

#[tokio::test]
async fn test_promotion_before_metatags_duplicates() {
    let rules = RuleSet::new(BuiltinPartials)
        .with_root_url(Some(ROOT.into()))
        .with_rule(Rule::promote_images())
        .unwrap()
        .with_rule(Rule::header_metatags())
        .unwrap();
    let doc = render(&og_page(), &og_meta(), &rules).await;
    assert_eq!(count(&doc, "meta[name=\"og:image\"]"), 2);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let rules = default_rules();
    let html = page(
        "<ak-header-metatags></ak-header-metatags><ak-header-canonical-url></ak-header-canonical-url>",
        "<article><publication-date></publication-date><toc-item title=\"A\" anchor=\"a\"></toc-item></article>",
    );
    let metadata = meta("post.html")
        .with("title", "Post")
        .with("publication_date", "2024-02-29");

    let first = render_html(&html, &metadata, &rules).await.unwrap();
    let second = render_html(&first, &metadata, &rules).await.unwrap();
    assert_eq!(first, second);
    assert!(!rules.has_pending_markers(&Document::parse(&first)).unwrap());
}

#[tokio::test]
async fn test_clean_document_takes_one_pass() {
    let rules = default_rules();
    let document = Document::parse(&page("", "<p>nothing to do</p>"));
    let outcome = Pipeline::run(document, &meta("index.html"), &rules).await.unwrap();
    assert_eq!(outcome.passes, 1);
    assert!(outcome.converged);
}

/// Renders every toc item as another toc item, so the pipeline never settles.
struct Echo;

impl Partials for Echo {
    async fn render(&self, template: &str, _data: &TemplateData) -> anyhow::Result<String> {
        match template {
            "toc-item.html" => Ok(r#"<toc-item title="again" anchor="again"></toc-item>"#.into()),
            other => anyhow::bail!("no template {other}"),
        }
    }
}

#[tokio::test]
async fn test_pass_budget_is_best_effort() {
    let rules = RuleSet::new(Echo)
        .with_max_passes(3)
        .with_rule(Rule::toc_item())
        .unwrap();
    let document = Document::parse(&page("", "<toc-item title=\"A\" anchor=\"a\"></toc-item>"));

    let outcome = Pipeline::run(document, &Metadata::new(), &rules).await.unwrap();
    assert_eq!(outcome.passes, 3);
    assert!(!outcome.converged);
    assert!(rules.has_pending_markers(&outcome.document).unwrap());
}

#[tokio::test]
async fn test_partial_failure_names_template() {
    let rules = RuleSet::new(Echo).with_rule(Rule::header_metatags()).unwrap();
    let err = render_html(
        &page("<ak-header-metatags></ak-header-metatags>", ""),
        &Metadata::new(),
        &rules,
    )
    .await
    .unwrap_err();
    assert_eq!(err.rule, "ak-header-metatags");
    assert!(matches!(
        &err.source,
        Error::TemplateRenderFailure { template, .. } if template == "header-meta.html"
    ));
}

// ============================================================================
// external links
// ============================================================================

#[tokio::test]
async fn test_nofollow_rule() {
    let options = PluginOptions::new().with_root_url(ROOT).with_nofollow(NoFollowConfig {
        blacklist: vec![r"\.biz$".into()],
        whitelist: vec![],
    });
    let rules = register_rule_set(&options, BuiltinPartials).unwrap();
    let body = r##"<a href="https://deals.biz/x">a</a><a href="https://rust-lang.org">b</a><a href="#top">c</a>"##;
    let doc = render(&page("", body), &meta("index.html"), &rules).await;

    assert_eq!(attr_of(&doc, "a[href=\"https://deals.biz/x\"]", "rel").as_deref(), Some("nofollow"));
    assert_eq!(attr_of(&doc, "a[href=\"https://rust-lang.org\"]", "rel"), None);
    assert_eq!(attr_of(&doc, "a[href=\"#top\"]", "rel"), None);
}
