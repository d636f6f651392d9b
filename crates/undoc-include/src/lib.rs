//! Literal file inclusion with docstring stripping.
//!
//! This crate implements the `undocinclude` directive: it includes a source
//! file (or one class or function of it, or a range of its lines) as a literal
//! block, with every docstring removed.
//!
//! # Architecture
//!
//! - [`IncludeReader`]: reads and decodes the file, then narrows it to the
//!   selected lines. Docstring and object locations come from a
//!   [`SourceAnalyzer`], by default the tree-sitter based [`PythonAnalyzer`].
//! - [`UndocInclude`]: the directive adapter. Resolves the path against a
//!   [`DirectiveContext`], runs the reader and wraps the text into a [`Node`].
//!   Errors become inline warning nodes.
//!
//! Non-fatal problems are passed to a [`Reporter`] owned by the caller.
//!
//! # Example
//!
//! ```no_run
//! use undoc_include::{CollectingReporter, IncludeOptions, IncludeReader, IncludeSettings};
//!
//! let options = IncludeOptions::from_pairs([("lines", Some("1-10"))]).unwrap();
//! let settings = IncludeSettings::default();
//! let mut reader = IncludeReader::new("app.py", &options, &settings).unwrap();
//! let result = reader.read(&mut CollectingReporter::new(), None).unwrap();
//! print!("{}", result.text);
//! ```

pub mod analyzer;
mod context;
pub mod directive;
mod encoding;
mod error;
mod linenos;
mod node;
mod options;
mod reader;
mod reporter;

pub use analyzer::{AnalyzeError, ObjectKind, ObjectSpan, PythonAnalyzer, SourceAnalyzer, SourceOutline};
pub use context::{BuildEnvironment, DependencyTracker, DirectiveContext};
pub use directive::UndocInclude;
pub use encoding::TextEncoding;
pub use error::{IncludeError, OptionError};
pub use linenos::{LineNumbers, parse_linenos};
pub use node::{Container, HighlightArgs, LiteralBlock, Node, Warning, make_id, normalize_name};
pub use options::{IncludeOptions, option_pairs};
pub use reader::{DEFAULT_SOURCE_ENCODING, IncludeReader, IncludeSettings, ReadResult};
pub use reporter::{CollectingReporter, Diagnostic, Location, Reporter};
