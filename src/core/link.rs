//! Link classification utilities.

/// Syntactic classification of an href
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// Already absolute: has a URL scheme (https://, mailto:) or a host (//cdn.example.com/x).
    External(&'a str),
    /// Site-root-relative path (/img/logo.png).
    SiteRoot(&'a str),
    /// Relative to the directory the document renders into (img/logo.png, ../logo.png).
    DocumentRelative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        if link.starts_with("//") || has_scheme(link) {
            Self::External(link)
        } else if link.starts_with('/') {
            Self::SiteRoot(link)
        } else {
            Self::DocumentRelative(link)
        }
    }
}

/// `scheme ":"` where scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`.
fn has_scheme(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        let scheme = &link[..pos];
        scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}
