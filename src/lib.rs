//! Metahead - ordered DOM rewrite rules for static site metadata.
//!
//! A static site renders a page to HTML containing custom marker elements
//! (`<ak-header-metatags>`, `<toc-item>`, `<open-graph-promote-images>`, ...).
//! A [`RuleSet`] replaces those markers with real head tags, tables of
//! contents and Open Graph images, re-running until nothing new appears.
//!
//! ```ignore
//! let options = PluginOptions::new().with_root_url("https://example.com");
//! let rules = register_rule_set(&options, BuiltinPartials)?;
//! let meta = Metadata::new().with_render_path("blog/post.html").with("title", "Post");
//! let html = render_html(&page, &meta, &rules).await?;
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod dom;
pub mod error;
pub mod generator;
pub mod logger;
pub mod meta;
pub mod partial;
pub mod pipeline;
pub mod rules;
pub mod utils;

pub use config::PluginOptions;
pub use dom::Document;
pub use error::{Error, PipelineError};
pub use meta::Metadata;
pub use partial::{BuiltinPartials, Partials, TemplateData};
pub use pipeline::{Outcome, Pipeline, render_html};
pub use rules::{Rule, RuleSet, register_rule_set};
