//! Auxiliary output generated from the host's document list.
//!
//! - **Sitemap**: search engine indexing (`sitemap.xml`)

pub mod sitemap;

pub use sitemap::{SitemapEntry, build_sitemap};
