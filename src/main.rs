use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use metahead::cli::{self, Cli, Commands};
use metahead::config::PluginOptions;
use metahead::{debug, logger};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let options = load_options(&cli)?;

    match &cli.command {
        Commands::Render { args } => cli::render::run_render(args, &options).await,
        Commands::Sitemap { args } => cli::sitemap::run_sitemap(args, &options),
    }
}

/// Config file if present, defaults otherwise; `--root-url` wins over both.
fn load_options(cli: &Cli) -> Result<PluginOptions> {
    let mut options = if cli.config.is_file() {
        PluginOptions::load(&cli.config)
            .with_context(|| format!("Failed to load config {}", cli.config.display()))?
    } else {
        debug!("config"; "{} not found, using defaults", cli.config.display());
        PluginOptions::default()
    };

    if let Some(root_url) = &cli.root_url {
        options.root_url = Some(root_url.clone());
        options.validate()?;
    }
    Ok(options)
}
