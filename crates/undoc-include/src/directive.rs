//! The `undocinclude` directive.
//!
//! Bridges a host directive invocation to [`IncludeReader`]: resolves the
//! path, registers the dependency, reads the file and wraps the result into a
//! [`Node`] with display metadata. Failures never escape: they become an
//! inline warning node.

use crate::context::DirectiveContext;
use crate::linenos::out_of_range_message;
use crate::node::{Container, HighlightArgs, LiteralBlock, Node};
use crate::{IncludeError, IncludeOptions, IncludeReader, make_id, normalize_name, parse_linenos};

/// Class set on the caption wrapper.
const WRAPPER_CLASS: &str = "literal-block-wrapper";

/// Like a literal include, but strips docstrings and reports problems as
/// warnings instead of failing the build.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use undoc_include::{
///     CollectingReporter, DependencyTracker, DirectiveContext, IncludeOptions, IncludeSettings,
///     UndocInclude,
/// };
///
/// let options = IncludeOptions::from_pairs([("pyobject", Some("main")), ("linenos", None)])
///     .unwrap();
/// let directive = UndocInclude::new("../src/app.py", options);
///
/// let settings = IncludeSettings::default();
/// let mut env = DependencyTracker::new();
/// let mut reporter = CollectingReporter::new();
/// let mut ctx = DirectiveContext {
///     source_path: Some(Path::new("docs/index.rst")),
///     base_dir: Path::new("docs"),
///     src_dir: Path::new("docs"),
///     line: 3,
///     settings: &settings,
///     env: &mut env,
///     reporter: &mut reporter,
/// };
/// let nodes = directive.run(&mut ctx);
/// assert_eq!(nodes.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct UndocInclude {
    /// File path argument as written in the document.
    pub argument: String,
    /// Directive options.
    pub options: IncludeOptions,
}

impl UndocInclude {
    /// Directive name as registered with the host.
    pub const NAME: &'static str = "undocinclude";

    /// Create a directive invocation.
    #[must_use]
    pub fn new(argument: impl Into<String>, options: IncludeOptions) -> Self {
        Self {
            argument: argument.into(),
            options,
        }
    }

    /// Run the directive, returning exactly one node.
    pub fn run(&self, ctx: &mut DirectiveContext<'_>) -> Vec<Node> {
        if !ctx.settings.file_insertion_enabled {
            return vec![Node::warning("File insertion disabled", ctx.line)];
        }

        match self.include(ctx) {
            Ok(node) => vec![node],
            Err(err) => {
                tracing::warn!(
                    argument = %self.argument,
                    line = ctx.line,
                    error = %err,
                    "Include failed"
                );
                vec![Node::warning(err.to_string(), ctx.line)]
            }
        }
    }

    fn include(&self, ctx: &mut DirectiveContext<'_>) -> Result<Node, IncludeError> {
        let location = ctx.location();
        let (rel_path, path) = ctx.resolve_path(&self.argument);
        ctx.env.note_dependency(&rel_path);

        let mut reader = IncludeReader::new(&path, &self.options, ctx.settings)?;
        let result = reader.read(&mut *ctx.reporter, location.as_ref())?;
        let (text, lines) = self.attach_extras(result.text, result.lines);

        let hl_lines = match &self.options.emphasize_lines {
            Some(spec) => {
                let requested = parse_linenos(spec, lines)?;
                if requested.out_of_range {
                    ctx.reporter
                        .warning(&out_of_range_message(spec, lines), location.as_ref());
                }
                requested.indices.into_iter().map(|idx| idx + 1).collect()
            }
            None => Vec::new(),
        };

        let literal = LiteralBlock {
            text,
            source: path,
            line: ctx.line,
            language: self.options.language.clone(),
            linenos: self.options.linenos
                || self.options.lineno_start.is_some()
                || self.options.lineno_match,
            force: self.options.force,
            classes: self.options.classes.clone(),
            ids: Vec::new(),
            names: Vec::new(),
            highlight_args: HighlightArgs {
                hl_lines,
                linenostart: reader.lineno_start(),
            },
        };

        let mut node = match &self.options.caption {
            Some(caption) => Node::Container(Container {
                caption: if caption.is_empty() {
                    self.argument.clone()
                } else {
                    caption.clone()
                },
                literal,
                classes: vec![WRAPPER_CLASS.to_owned()],
                ids: Vec::new(),
                names: Vec::new(),
            }),
            None => Node::LiteralBlock(literal),
        };

        self.add_name(&mut node, ctx);
        Ok(node)
    }

    /// Attach `prepend`/`append` text as whole lines around the filtered text.
    fn attach_extras(&self, filtered: String, lines: usize) -> (String, usize) {
        if self.options.prepend.is_none() && self.options.append.is_none() {
            return (filtered, lines);
        }

        let mut text = String::with_capacity(filtered.len());
        let mut lines = lines;
        if let Some(prepend) = &self.options.prepend {
            text.push_str(prepend);
            text.push('\n');
            lines += 1;
        }
        text.push_str(&filtered);
        if let Some(append) = &self.options.append {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(append);
            text.push('\n');
            lines += 1;
        }
        (text, lines)
    }

    /// Register the `name` option as an explicit target on the outermost node.
    fn add_name(&self, node: &mut Node, ctx: &mut DirectiveContext<'_>) {
        let Some(name) = self.options.name.as_deref().map(normalize_name) else {
            return;
        };
        if name.is_empty() {
            return;
        }
        let Some((ids, names)) = node.ids_and_names_mut() else {
            return;
        };

        let mut id = make_id(&name);
        if id.is_empty() {
            id = format!("{}-{}", Self::NAME, ctx.line);
        }
        ctx.env.note_explicit_target(&name, &id);
        names.push(name);
        ids.push(id);
    }
}
