//! `metahead render`: run the default rule set over one page.

use anyhow::{Context, Result};
use std::{fs, path::Path};

use super::RenderArgs;
use crate::config::PluginOptions;
use crate::dom::Document;
use crate::meta::Metadata;
use crate::partial::BuiltinPartials;
use crate::pipeline::Pipeline;
use crate::rules::register_rule_set;
use crate::{debug, log};

pub async fn run_render(args: &RenderArgs, options: &PluginOptions) -> Result<()> {
    let html = fs::read_to_string(&args.page)
        .with_context(|| format!("Failed to read page {}", args.page.display()))?;
    let metadata = load_metadata(args)?;
    let rules = register_rule_set(options, BuiltinPartials)?;

    let document = Document::parse(&html);
    let outcome = Pipeline::run(document, &metadata, &rules)
        .await
        .with_context(|| format!("Failed to render {}", args.page.display()))?;

    if outcome.converged {
        debug!("render"; "{} in {} pass(es)", args.page.display(), outcome.passes);
    } else {
        log!(
            "render";
            "{}: markers left after {} passes",
            args.page.display(),
            outcome.passes
        );
    }

    super::write_output(args.output.as_deref(), &outcome.to_html())
}

/// Metadata from `--meta`, with the render path taken from `--render-path`,
/// the metadata itself, or the page's file name, in that order.
fn load_metadata(args: &RenderArgs) -> Result<Metadata> {
    let mut metadata = match &args.meta {
        Some(path) => {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read metadata {}", path.display()))?;
            Metadata::from_toml_str(&content)
                .with_context(|| format!("Invalid metadata in {}", path.display()))?
        }
        None => Metadata::new(),
    };

    if let Some(render_path) = &args.render_path {
        metadata.render_path = Some(render_path.clone());
    } else if metadata.render_path().is_none() {
        metadata.render_path = file_name(&args.page);
    }
    Ok(metadata)
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}
