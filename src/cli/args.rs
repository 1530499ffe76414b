//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Rewrite custom head and table-of-contents markers in rendered HTML
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (default: metahead.toml, ignored when missing)
    #[arg(short = 'C', long, global = true, default_value = "metahead.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Override the site root URL from the config file
    #[arg(short = 'U', long = "root-url", global = true, value_hint = clap::ValueHint::Url)]
    pub root_url: Option<String>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the rule set over one rendered page
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Generate sitemap XML from a page list
    #[command(visible_alias = "s")]
    Sitemap {
        #[command(flatten)]
        args: SitemapArgs,
    },
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Rendered HTML page
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub page: PathBuf,

    /// Document metadata as a TOML table
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub meta: Option<PathBuf>,

    /// Path the page renders to, relative to the site root
    /// (default: metadata `render_path`, else the page's file name)
    #[arg(short = 'p', long)]
    pub render_path: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

/// Sitemap command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct SitemapArgs {
    /// TOML page list (`[[page]]` tables with `render-path` and `modified`)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub pages: PathBuf,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
}

#[allow(unused)]
impl Cli {
    pub const fn is_render(&self) -> bool {
        matches!(self.command, Commands::Render { .. })
    }
    pub const fn is_sitemap(&self) -> bool {
        matches!(self.command, Commands::Sitemap { .. })
    }
}
