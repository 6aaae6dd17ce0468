//! `mdom render` command implementation.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use mdom_config::{CliSettings, Config};
use mdom_render::{Renderer, SyntaxNode, to_static_markup};
use mdom_syntax::parse;

use crate::error::CliError;

/// Output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Static HTML markup.
    #[default]
    Html,
    /// Rendered element tree with keys, as JSON.
    Json,
    /// Prepared hypertext tree, as JSON.
    Hast,
}

/// Input format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum InputFormat {
    /// Markdown text.
    #[default]
    Markdown,
    /// Syntax tree as JSON.
    Json,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Input file (`-` reads stdin).
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Html)]
    format: Format,

    /// Input format.
    #[arg(long = "input", value_enum, default_value_t = InputFormat::Markdown)]
    input_format: InputFormat,

    /// Path to configuration file (default: auto-discover mdom.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable sanitization (overrides config).
    #[arg(long)]
    no_sanitize: bool,

    /// Keep raw HTML from the source (overrides config).
    #[arg(long)]
    allow_dangerous_html: bool,

    /// Prefix of reconciliation keys (overrides config).
    #[arg(long, env = "MDOM_KEY_PREFIX")]
    key_prefix: Option<String>,

    /// Disable GitHub Flavored Markdown extensions (overrides config).
    #[arg(long)]
    no_gfm: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            sanitize: self.no_sanitize.then_some(false),
            allow_dangerous_html: self.allow_dangerous_html.then_some(true),
            key_prefix: self.key_prefix,
            gfm: self.no_gfm.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source = read_source(&self.file)?;

        let mut stdout = std::io::stdout().lock();
        render(&config, &source, self.input_format, self.format, &mut stdout)?;
        stdout.flush()?;
        Ok(())
    }
}

fn read_source(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        return Ok(source);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Render `source` as configured and write the result to `out`.
fn render(
    config: &Config,
    source: &str,
    input_format: InputFormat,
    format: Format,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let options = config.render_options();
    let tree: SyntaxNode = match input_format {
        InputFormat::Markdown => parse(source, &options.parse),
        InputFormat::Json => serde_json::from_str(source)?,
    };
    tracing::debug!(?input_format, ?format, "Rendering");

    let renderer = Renderer::new(options);
    match format {
        Format::Html => {
            let element = renderer.render(&tree)?;
            writeln!(out, "{}", to_static_markup(&element))?;
        }
        Format::Json => {
            let element = renderer.render(&tree)?;
            serde_json::to_writer_pretty(&mut *out, &element)?;
            writeln!(out)?;
        }
        Format::Hast => {
            let hast = renderer.prepare(&tree)?;
            serde_json::to_writer_pretty(&mut *out, &hast)?;
            writeln!(out)?;
        }
    }
    Ok(())
}
