//! `metahead sitemap`: sitemap XML from a TOML page list.
//!
//! ```toml
//! [[page]]
//! render-path = "index.html"
//! modified = 2019-08-16
//!
//! [[page]]
//! render-path = "blog/post.html"
//! modified = 1565985240   # unix seconds
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;

use super::SitemapArgs;
use crate::config::PluginOptions;
use crate::generator::{SitemapEntry, build_sitemap};
use crate::log;
use crate::utils::date::Date;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageList {
    #[serde(rename = "page")]
    pages: Vec<PageRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PageRecord {
    render_path: String,
    #[serde(default)]
    modified: Option<toml::Value>,
}

pub fn run_sitemap(args: &SitemapArgs, options: &PluginOptions) -> Result<()> {
    if !options.sitemap.enable {
        log!("sitemap"; "disabled, set `sitemap.enable = true` to generate");
        return Ok(());
    }
    let Some(root_url) = options.root_url.as_deref() else {
        bail!("sitemap generation requires `root-url`");
    };

    let content = fs::read_to_string(&args.pages)
        .with_context(|| format!("Failed to read page list {}", args.pages.display()))?;
    let entries = parse_pages(&content)
        .with_context(|| format!("Invalid page list in {}", args.pages.display()))?;

    let xml = build_sitemap(root_url, &entries, &options.sitemap)?;
    super::write_output(args.output.as_deref(), &xml)?;

    if let Some(output) = &args.output {
        log!("sitemap"; "{}", output.display());
    }
    Ok(())
}

fn parse_pages(content: &str) -> Result<Vec<SitemapEntry>> {
    let list: PageList = toml::from_str(content)?;
    list.pages
        .into_iter()
        .map(|page| -> Result<SitemapEntry> {
            let modified = match page.modified {
                None => None,
                Some(value) => Some(modified_date(&value).with_context(|| {
                    format!("`modified` of {} is not a date", page.render_path)
                })?),
            };
            Ok(SitemapEntry::new(page.render_path, modified))
        })
        .collect()
}

fn modified_date(value: &toml::Value) -> Option<Date> {
    match value {
        toml::Value::Datetime(dt) => Date::parse(&dt.to_string()),
        toml::Value::String(s) => Date::parse(s),
        toml::Value::Integer(secs) => u64::try_from(*secs).ok().map(Date::from_unix_secs),
        _ => None,
    }
}
