//! Rewrite rules and the ordered rule set.
//!
//! A [`Rule`] is either an element rule (every `<tag>` in the document is
//! replaced by generated markup or removed) or a munger (a selector match
//! that may rewrite anything in the document).
//!
//! # Default order
//!
//! | # | Rule                                   | Kind    |
//! |---|----------------------------------------|---------|
//! | 1 | `ak-page-title` (deprecated)           | element |
//! | 2 | `ak-siteverification` (deprecated)     | element |
//! | 3 | `ak-google-analytics` (deprecated)     | element |
//! | 4 | `ak-sitemapxml` (deprecated)           | element |
//! | 5 | `ak-header-metatags`                   | element |
//! | 6 | `ak-header-linkreltags`                | element |
//! | 7 | `ak-header-canonical-url`              | element |
//! | 8 | `rss-header-meta`                      | munger  |
//! | 9 | `publication-date`                     | element |
//! | 10 | `author-link` (with `[authorship]`)   | element |
//! | 11 | `toc-group`                           | element |
//! | 12 | `toc-item`                            | element |
//! | 13 | `html head open-graph-promote-images` | munger  |
//! | 14 | `html body a` (with `[nofollow]`)     | munger  |

mod head;
mod links;
mod opengraph;
mod toc;

use std::cell::Cell;

use kuchikiki::NodeRef;
use rustc_hash::FxHashSet;

use crate::config::{
    AuthorshipConfig, ConfigError, DEFAULT_MAX_PASSES, LinkRelTag, NoFollowMatcher, PluginOptions,
};
use crate::debug;
use crate::dom::Document;
use crate::error::{Error, Result};
use crate::meta::Metadata;
use crate::partial::{Partials, TemplateData};

// ============================================================================
// Dirty signal
// ============================================================================

/// Raised by a rule that produced markup which may contain new markers.
#[derive(Debug, Default)]
pub struct Dirty(Cell<bool>);

impl Dirty {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.set(true);
    }

    pub fn is_raised(&self) -> bool {
        self.0.get()
    }

    /// Read and clear.
    pub fn take(&self) -> bool {
        self.0.replace(false)
    }
}

// ============================================================================
// Context
// ============================================================================

/// What a rule sees while it runs.
pub struct Context<'a, P> {
    pub document: &'a Document,
    pub metadata: &'a Metadata,
    pub partials: &'a P,
    pub dirty: &'a Dirty,
}

impl<P> Context<'_, P> {
    /// Render path used for resolving document-relative hrefs.
    pub fn render_path(&self) -> &str {
        self.metadata.render_path().unwrap_or("/")
    }
}

impl<P: Partials> Context<'_, P> {
    /// Render a partial, wrapping failures with the template name.
    pub async fn render(&self, template: &str, data: &TemplateData) -> Result<String> {
        self.partials
            .render(template, data)
            .await
            .map_err(|source| Error::TemplateRenderFailure {
                template: template.to_string(),
                source,
            })
    }
}

// ============================================================================
// Rule
// ============================================================================

/// A single named transform.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Replace or remove every `<tag>` element.
    Element {
        tag: &'static str,
        action: ElementAction,
    },
    /// Run once per selector match; may mutate the whole document.
    Munger {
        selector: &'static str,
        action: MungerAction,
    },
}

/// What an element rule produces for one marker.
#[derive(Debug, Clone)]
pub enum ElementAction {
    /// Legacy marker; always fails.
    Deprecated { replacement: &'static str },
    HeaderMetatags,
    LinkRelTags(Vec<LinkRelTag>),
    CanonicalUrl,
    PublicationDate,
    AuthorLink(AuthorshipConfig),
    TocGroup,
    TocItem,
}

/// What a munger does with one match.
#[derive(Debug, Clone)]
pub enum MungerAction {
    RssHeaderMeta,
    PromoteImages,
    NoFollow(NoFollowMatcher),
}

impl Rule {
    pub const fn deprecated(tag: &'static str, replacement: &'static str) -> Self {
        Self::Element {
            tag,
            action: ElementAction::Deprecated { replacement },
        }
    }

    pub const fn header_metatags() -> Self {
        Self::Element {
            tag: "ak-header-metatags",
            action: ElementAction::HeaderMetatags,
        }
    }

    pub fn link_rel_tags(tags: Vec<LinkRelTag>) -> Self {
        Self::Element {
            tag: "ak-header-linkreltags",
            action: ElementAction::LinkRelTags(tags),
        }
    }

    pub const fn canonical_url() -> Self {
        Self::Element {
            tag: "ak-header-canonical-url",
            action: ElementAction::CanonicalUrl,
        }
    }

    pub const fn rss_header_meta() -> Self {
        Self::Munger {
            selector: "rss-header-meta",
            action: MungerAction::RssHeaderMeta,
        }
    }

    pub const fn publication_date() -> Self {
        Self::Element {
            tag: "publication-date",
            action: ElementAction::PublicationDate,
        }
    }

    pub fn author_link(authorship: AuthorshipConfig) -> Self {
        Self::Element {
            tag: "author-link",
            action: ElementAction::AuthorLink(authorship),
        }
    }

    pub const fn toc_group() -> Self {
        Self::Element {
            tag: "toc-group",
            action: ElementAction::TocGroup,
        }
    }

    pub const fn toc_item() -> Self {
        Self::Element {
            tag: "toc-item",
            action: ElementAction::TocItem,
        }
    }

    pub const fn promote_images() -> Self {
        Self::Munger {
            selector: opengraph::SELECTOR,
            action: MungerAction::PromoteImages,
        }
    }

    pub fn nofollow(matcher: NoFollowMatcher) -> Self {
        Self::Munger {
            selector: "html body a",
            action: MungerAction::NoFollow(matcher),
        }
    }

    /// Tag name or selector; unique within a rule set.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Element { tag, .. } => *tag,
            Self::Munger { selector, .. } => *selector,
        }
    }

    /// Whether this rule consumes marker elements (as opposed to rewriting
    /// ordinary markup).
    pub const fn consumes_markers(&self) -> bool {
        !matches!(
            self,
            Self::Munger {
                action: MungerAction::NoFollow(_),
                ..
            }
        )
    }

    /// Run this rule once over the document.
    pub async fn apply<P: Partials>(&self, cx: &Context<'_, P>) -> Result<()> {
        match self {
            Self::Element { tag, action } => {
                let markers = cx.document.select(tag)?;
                if markers.is_empty() {
                    return Ok(());
                }
                debug!("rules"; "{} <{}> marker(s)", markers.len(), tag);

                for marker in markers {
                    // An earlier replacement may have taken this one with it
                    if !cx.document.contains(&marker) {
                        continue;
                    }
                    match action.process(*tag, &marker, cx).await? {
                        Some(markup) => cx.document.replace_with_markup(&marker, &markup),
                        None => cx.document.remove(&marker),
                    }
                }
                Ok(())
            }
            Self::Munger { selector, action } => {
                for found in cx.document.select(selector)? {
                    if !cx.document.contains(&found) {
                        continue;
                    }
                    action.process(&found, cx).await?;
                }
                Ok(())
            }
        }
    }
}

impl ElementAction {
    /// Markup replacing `marker`, or `None` to remove it.
    async fn process<P: Partials>(
        &self,
        tag: &'static str,
        marker: &NodeRef,
        cx: &Context<'_, P>,
    ) -> Result<Option<String>> {
        match self {
            Self::Deprecated { replacement } => Err(Error::DeprecatedFeature {
                tag,
                replacement: *replacement,
            }),
            Self::HeaderMetatags => head::header_metatags(cx).await,
            Self::LinkRelTags(tags) => head::link_rel_tags(tags, cx).await,
            Self::CanonicalUrl => head::canonical_url(cx).await,
            Self::PublicationDate => head::publication_date(cx).await,
            Self::AuthorLink(authorship) => head::author_link(authorship, cx).await,
            Self::TocGroup => toc::group(marker, cx).await,
            Self::TocItem => toc::item(marker, cx).await,
        }
    }
}

impl MungerAction {
    async fn process<P: Partials>(&self, found: &NodeRef, cx: &Context<'_, P>) -> Result<()> {
        match self {
            Self::RssHeaderMeta => head::rss_header_meta(found, cx),
            Self::PromoteImages => opengraph::promote_images(found, cx),
            Self::NoFollow(matcher) => {
                links::apply_nofollow(found, matcher);
                Ok(())
            }
        }
    }
}

// ============================================================================
// RuleSet
// ============================================================================

/// Ordered rules plus the partial renderer they share.
///
/// Built once per configuration and reused read-only for every document.
#[derive(Debug)]
pub struct RuleSet<P> {
    rules: Vec<Rule>,
    names: FxHashSet<&'static str>,
    partials: P,
    max_passes: usize,
    root_url: Option<String>,
}

impl<P: Partials> RuleSet<P> {
    /// An empty rule set.
    pub fn new(partials: P) -> Self {
        Self {
            rules: Vec::new(),
            names: FxHashSet::default(),
            partials,
            max_passes: DEFAULT_MAX_PASSES,
            root_url: None,
        }
    }

    /// Append a rule. Names must be unique.
    pub fn push(&mut self, rule: Rule) -> std::result::Result<(), ConfigError> {
        if !self.names.insert(rule.name()) {
            return Err(ConfigError::Validation(format!(
                "rule `{}` is registered twice",
                rule.name()
            )));
        }
        self.rules.push(rule);
        Ok(())
    }

    pub fn with_rule(mut self, rule: Rule) -> std::result::Result<Self, ConfigError> {
        self.push(rule)?;
        Ok(self)
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes.max(1);
        self
    }

    pub fn with_root_url(mut self, root_url: Option<String>) -> Self {
        self.root_url = root_url;
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn partials(&self) -> &P {
        &self.partials
    }

    pub fn max_passes(&self) -> usize {
        self.max_passes
    }

    /// Site root URL used when a document's metadata carries none.
    pub fn root_url(&self) -> Option<&str> {
        self.root_url.as_deref()
    }

    /// Whether the document still contains markers some rule would consume.
    pub fn has_pending_markers(&self, document: &Document) -> Result<bool> {
        for rule in self.rules.iter().filter(|r| r.consumes_markers()) {
            if document.matches(rule.name())? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Build the default rule set for `options`.
pub fn register_rule_set<P: Partials>(
    options: &PluginOptions,
    partials: P,
) -> std::result::Result<RuleSet<P>, ConfigError> {
    options.validate()?;

    let mut set = RuleSet::new(partials)
        .with_max_passes(options.max_passes)
        .with_root_url(options.root_url.clone());

    for (tag, replacement) in head::DEPRECATED {
        set.push(Rule::deprecated(tag, replacement))?;
    }
    set.push(Rule::header_metatags())?;
    set.push(Rule::link_rel_tags(options.link_rel_tags.clone()))?;
    set.push(Rule::canonical_url())?;
    set.push(Rule::rss_header_meta())?;
    set.push(Rule::publication_date())?;
    if let Some(authorship) = &options.authorship {
        set.push(Rule::author_link(authorship.clone()))?;
    }
    set.push(Rule::toc_group())?;
    set.push(Rule::toc_item())?;
    set.push(Rule::promote_images())?;
    if let Some(nofollow) = &options.nofollow {
        let matcher = nofollow
            .compile()
            .map_err(|e| ConfigError::Validation(format!("nofollow: {e}")))?;
        set.push(Rule::nofollow(matcher))?;
    }

    debug!("rules"; "registered {} rules", set.len());
    Ok(set)
}
