//! `undoc include` command implementation.

use std::collections::BTreeSet;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use undoc_config::{CliSettings, Config};
use undoc_include::{
    CollectingReporter, DependencyTracker, DirectiveContext, IncludeOptions, IncludeSettings,
    LiteralBlock, Node, UndocInclude, option_pairs,
};

use crate::error::CliError;
use crate::output::Output;

/// Output format for the included node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Caption and numbered lines, emphasized lines marked with `>`.
    #[default]
    Text,
    /// The node serialized as JSON.
    Json,
}

/// Arguments for the include command.
#[derive(Args)]
pub(crate) struct IncludeArgs {
    /// File to include, as written in the directive.
    ///
    /// Paths starting with `/` are relative to the docs source directory,
    /// other paths to the document's directory.
    file: String,

    /// Directive options, e.g. `-o 'pyobject=Parser lines="1-20" linenos'`.
    #[arg(short = 'o', long = "options", value_name = "ATTRS")]
    options: Vec<String>,

    /// Document containing the directive (default: current directory).
    #[arg(short, long)]
    document: Option<PathBuf>,

    /// Line of the directive in the document.
    #[arg(long, default_value_t = 1)]
    line: usize,

    /// Path to configuration file (default: auto-discover undoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Documentation source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl IncludeArgs {
    /// Execute the include command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration or options are invalid, or if the
    /// inclusion produced a warning node.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let settings = IncludeSettings {
            source_encoding: config.include.source_encoding.clone(),
            file_insertion_enabled: config.include.file_insertion_enabled,
        };
        let options = self.parse_options()?;

        let cwd = std::env::current_dir()?;
        let document = self.document.as_ref().map(|doc| cwd.join(doc));
        let base_dir = document
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(cwd.as_path());

        let mut env = DependencyTracker::new();
        let mut reporter = CollectingReporter::new();
        let nodes = {
            let mut ctx = DirectiveContext {
                source_path: document.as_deref(),
                base_dir,
                src_dir: &config.docs_resolved.source_dir,
                line: self.line,
                settings: &settings,
                env: &mut env,
                reporter: &mut reporter,
            };
            UndocInclude::new(self.file.as_str(), options).run(&mut ctx)
        };

        for diagnostic in reporter.diagnostics() {
            output.warning(&diagnostic.to_string());
        }
        for dependency in env.dependencies() {
            tracing::info!(path = %dependency.display(), "Registered dependency");
        }

        for node in &nodes {
            match self.format {
                Format::Text => output.print(&render_text(node)),
                Format::Json => output.print(&(serde_json::to_string_pretty(node)? + "\n")),
            }
        }

        match nodes.iter().find_map(|node| match node {
            Node::Warning(warning) => Some(warning.message.clone()),
            _ => None,
        }) {
            Some(message) => Err(CliError::Include(message)),
            None => Ok(()),
        }
    }

    /// Merge all `-o` attribute strings into one option set.
    fn parse_options(&self) -> Result<IncludeOptions, CliError> {
        let pairs: Vec<(String, Option<String>)> = self
            .options
            .iter()
            .flat_map(|attrs| option_pairs(attrs))
            .collect();
        Ok(IncludeOptions::from_pairs(
            pairs
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_deref())),
        )?)
    }
}

/// Render a node as plain text.
fn render_text(node: &Node) -> String {
    let mut out = String::new();
    match node {
        Node::LiteralBlock(block) => render_block(block, &mut out),
        Node::Container(container) => {
            let _ = writeln!(out, "{}", container.caption);
            render_block(&container.literal, &mut out);
        }
        Node::Warning(warning) => {
            let _ = writeln!(out, "WARNING (line {}): {}", warning.line, warning.message);
        }
    }
    out
}

fn render_block(block: &LiteralBlock, out: &mut String) {
    let emphasized: BTreeSet<usize> = block.highlight_args.hl_lines.iter().copied().collect();
    let start = block.highlight_args.linenostart;
    let width = (start + block.line_count().saturating_sub(1)).to_string().len();

    for (idx, line) in block.text.lines().enumerate() {
        let marker = if emphasized.contains(&(idx + 1)) { '>' } else { ' ' };
        if block.linenos {
            let _ = writeln!(out, "{marker} {:>width$} | {line}", start + idx);
        } else {
            let _ = writeln!(out, "{marker} {line}");
        }
    }
}
