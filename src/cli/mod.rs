//! Command-line interface module.

mod args;
pub mod render;
pub mod sitemap;

use anyhow::{Context, Result};
use std::{
    fs,
    io::{Write, stdout},
    path::Path,
};

pub use args::{Cli, Commands, RenderArgs, SitemapArgs};

/// Write `content` to `path`, or to stdout when no path is given.
fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut out = stdout().lock();
            out.write_all(content.as_bytes())?;
            out.flush()?;
            Ok(())
        }
    }
}
