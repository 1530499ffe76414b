//! Configuration section definitions.
//!
//! Each module corresponds to a section in `metahead.toml`:
//!
//! | Module       | TOML Section        | Purpose                               |
//! |--------------|---------------------|---------------------------------------|
//! | `authorship` | `[authorship]`      | Author lookup for `<author-link>`     |
//! | `link_rel`   | `[[link-rel-tags]]` | Tags for `<ak-header-linkreltags>`    |
//! | `nofollow`   | `[nofollow]`        | External link host patterns           |
//! | `sitemap`    | `[sitemap]`         | Sitemap XML generation                |

mod authorship;
mod link_rel;
mod nofollow;
mod sitemap;

pub use authorship::{Author, AuthorshipConfig};
pub use link_rel::LinkRelTag;
pub use nofollow::{NoFollowConfig, NoFollowMatcher};
pub use sitemap::{ChangeFreq, SitemapConfig};
