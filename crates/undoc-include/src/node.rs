//! Document nodes produced by the directive.
//!
//! These are plain values; rendering them is up to the host.

use std::path::PathBuf;

use unicode_normalization::UnicodeNormalization;

/// Display hints for the highlighter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HighlightArgs {
    /// Output line numbers (1-based) to emphasize.
    pub hl_lines: Vec<usize>,
    /// Number shown for the first line.
    pub linenostart: usize,
}

/// A block of literal text taken from a file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LiteralBlock {
    /// Included text.
    pub text: String,
    /// File the text was read from.
    pub source: PathBuf,
    /// Directive line in the including document.
    pub line: usize,
    /// Highlighting language.
    pub language: Option<String>,
    /// Show line numbers.
    pub linenos: bool,
    /// Ignore highlighting errors.
    pub force: bool,
    /// Style classes.
    pub classes: Vec<String>,
    /// Identifiers for cross-referencing.
    pub ids: Vec<String>,
    /// Reference names.
    pub names: Vec<String>,
    /// Highlighter hints.
    pub highlight_args: HighlightArgs,
}

impl LiteralBlock {
    /// Number of lines of text in the block.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

/// A captioned wrapper around a literal block.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Container {
    /// Caption text.
    pub caption: String,
    /// Wrapped block.
    pub literal: LiteralBlock,
    /// Style classes.
    pub classes: Vec<String>,
    /// Identifiers for cross-referencing.
    pub ids: Vec<String>,
    /// Reference names.
    pub names: Vec<String>,
}

/// Inline warning shown in place of a failed inclusion.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Warning {
    /// Warning text.
    pub message: String,
    /// Directive line in the including document.
    pub line: usize,
}

/// Output of one directive invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Node {
    /// Plain literal block.
    LiteralBlock(LiteralBlock),
    /// Literal block with a caption.
    Container(Container),
    /// Inline warning.
    Warning(Warning),
}

impl Node {
    /// Create a warning node.
    #[must_use]
    pub fn warning(message: impl Into<String>, line: usize) -> Self {
        Self::Warning(Warning {
            message: message.into(),
            line,
        })
    }

    /// The literal block carried by this node, if any.
    #[must_use]
    pub fn literal(&self) -> Option<&LiteralBlock> {
        match self {
            Self::LiteralBlock(block) => Some(block),
            Self::Container(container) => Some(&container.literal),
            Self::Warning(_) => None,
        }
    }

    pub(crate) fn ids_and_names_mut(&mut self) -> Option<(&mut Vec<String>, &mut Vec<String>)> {
        match self {
            Self::LiteralBlock(block) => Some((&mut block.ids, &mut block.names)),
            Self::Container(container) => Some((&mut container.ids, &mut container.names)),
            Self::Warning(_) => None,
        }
    }
}

/// Normalize a reference name: collapse whitespace and lower-case.
///
/// # Example
///
/// ```
/// use undoc_include::normalize_name;
///
/// assert_eq!(normalize_name("  Parser   Setup "), "parser setup");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Turn arbitrary text into an identifier usable as an id or class.
///
/// Lower-cases, transliterates to ASCII (compatibility decomposition, then
/// non-ASCII marks dropped), replaces runs of other characters with `-`, and
/// trims leading digits and hyphens and trailing hyphens.
///
/// # Example
///
/// ```
/// use undoc_include::make_id;
///
/// assert_eq!(make_id("Parser Setup!"), "parser-setup");
/// assert_eq!(make_id("2nd_example"), "nd-example");
/// assert_eq!(make_id("Ünïcode x"), "unicode-x");
/// ```
#[must_use]
pub fn make_id(text: &str) -> String {
    let lowered: String = text.chars().flat_map(char::to_lowercase).map(fold_letter).collect();
    let mut id = String::with_capacity(lowered.len());
    let mut pending_dash = false;
    for c in lowered.nfkd().filter(char::is_ascii) {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(c);
        } else {
            pending_dash = true;
        }
    }
    id.trim_start_matches(|c: char| c.is_ascii_digit() || c == '-')
        .to_owned()
}

/// Letters with no decomposition to an ASCII base.
fn fold_letter(c: char) -> char {
    match c {
        'ø' => 'o',
        'đ' | 'ð' => 'd',
        'ł' => 'l',
        'ħ' => 'h',
        'ı' => 'i',
        'ŧ' => 't',
        _ => c,
    }
}
