//! Include file reader.
//!
//! Loads a file and narrows it down to the lines that end up in the document:
//! the named object (if any), intersected with the line-range spec (if any),
//! minus every docstring line in the file.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::analyzer::{AnalyzeError, PythonAnalyzer, SourceAnalyzer, SourceOutline};
use crate::reporter::{Location, Reporter};
use crate::linenos::out_of_range_message;
use crate::{IncludeError, IncludeOptions, TextEncoding, parse_linenos};

/// Default encoding for include files.
pub const DEFAULT_SOURCE_ENCODING: &str = "utf-8-sig";

/// Project-wide settings that apply to every inclusion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IncludeSettings {
    /// Encoding used when the directive has no `encoding` option.
    pub source_encoding: String,
    /// Whether file inclusion is allowed at all.
    pub file_insertion_enabled: bool,
}

impl Default for IncludeSettings {
    fn default() -> Self {
        Self {
            source_encoding: DEFAULT_SOURCE_ENCODING.to_owned(),
            file_insertion_enabled: true,
        }
    }
}

/// Filtered file contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadResult {
    /// Included lines joined in file order, line endings preserved.
    pub text: String,
    /// Number of included lines.
    pub lines: usize,
}

/// Reads an include file and applies the selection options.
///
/// # Example
///
/// ```no_run
/// use undoc_include::{CollectingReporter, IncludeOptions, IncludeReader, IncludeSettings};
///
/// let options = IncludeOptions {
///     pyobject: Some("main".to_owned()),
///     ..Default::default()
/// };
/// let settings = IncludeSettings::default();
/// let mut reader = IncludeReader::new("src/app.py", &options, &settings).unwrap();
/// let mut reporter = CollectingReporter::new();
/// let result = reader.read(&mut reporter, None).unwrap();
/// println!("{} lines from line {}", result.lines, reader.lineno_start());
/// ```
pub struct IncludeReader<'a> {
    path: PathBuf,
    options: &'a IncludeOptions,
    encoding: String,
    lineno_start: usize,
    analyzer: &'a dyn SourceAnalyzer,
}

impl<'a> IncludeReader<'a> {
    /// Create a reader, rejecting options that cannot be combined.
    ///
    /// No file I/O happens here.
    pub fn new(
        path: impl Into<PathBuf>,
        options: &'a IncludeOptions,
        settings: &IncludeSettings,
    ) -> Result<Self, IncludeError> {
        if options.lineno_match && options.lineno_start.is_some() {
            return Err(IncludeError::ConflictingOptions {
                first: "lineno-match",
                second: "lineno-start",
            });
        }

        Ok(Self {
            path: path.into(),
            options,
            encoding: options
                .encoding
                .clone()
                .unwrap_or_else(|| settings.source_encoding.clone()),
            lineno_start: options.lineno_start.unwrap_or(1),
            analyzer: &PythonAnalyzer,
        })
    }

    /// Use a different source analyzer.
    #[must_use]
    pub fn with_analyzer(mut self, analyzer: &'a dyn SourceAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Number of the first displayed line.
    ///
    /// Reflects `lineno-match` only after a successful [`read`](Self::read).
    #[must_use]
    pub fn lineno_start(&self) -> usize {
        self.lineno_start
    }

    /// Read the file and return the selected lines.
    ///
    /// Non-fatal problems (line numbers past the end of the file) go to
    /// `reporter`.
    pub fn read(
        &mut self,
        reporter: &mut dyn Reporter,
        location: Option<&Location>,
    ) -> Result<ReadResult, IncludeError> {
        let lines = self.read_lines()?;
        let outline = self.analyze(&lines.concat())?;

        let mut selection = LineSelection::new(lines);
        self.pyobject_filter(&mut selection, &outline)?;
        self.lines_filter(&mut selection, outline.docstring_lines(), reporter, location)?;
        self.match_line_numbers(&selection)?;

        Ok(selection.into_result())
    }

    fn read_lines(&self) -> Result<Vec<String>, IncludeError> {
        let encoding = TextEncoding::for_label(&self.encoding)
            .ok_or_else(|| IncludeError::UnknownEncoding(self.encoding.clone()))?;

        let bytes = std::fs::read(&self.path).map_err(|source| IncludeError::NotFound {
            path: self.path.clone(),
            source,
        })?;
        let text = encoding
            .decode(&bytes)
            .ok_or_else(|| IncludeError::Encoding {
                encoding: self.encoding.clone(),
                path: self.path.clone(),
            })?;

        tracing::debug!(
            path = %self.path.display(),
            encoding = encoding.name(),
            bytes = bytes.len(),
            "Decoded include file"
        );

        let mut text = normalize_newlines(&text);
        if let Some(width) = self.options.tab_width {
            text = expand_tabs(&text, width);
        }

        Ok(text.split_inclusive('\n').map(str::to_owned).collect())
    }

    fn analyze(&self, source: &str) -> Result<SourceOutline, IncludeError> {
        self.analyzer.analyze(source).map_err(|e| match e {
            AnalyzeError::Syntax { line } => IncludeError::Syntax {
                path: self.path.clone(),
                line,
            },
            AnalyzeError::Setup(message) => IncludeError::Analyzer(message),
        })
    }

    fn pyobject_filter(
        &self,
        selection: &mut LineSelection,
        outline: &SourceOutline,
    ) -> Result<(), IncludeError> {
        let Some(pyobject) = &self.options.pyobject else {
            return Ok(());
        };

        let span = outline
            .object(pyobject)
            .ok_or_else(|| IncludeError::ObjectNotFound {
                object: pyobject.clone(),
                path: self.path.clone(),
            })?;

        tracing::debug!(object = %pyobject, start = span.start, end = span.end, "Located object");
        selection.retain(|idx| (span.start - 1..span.end).contains(&idx));
        Ok(())
    }

    fn lines_filter(
        &self,
        selection: &mut LineSelection,
        docstring_lines: &BTreeSet<usize>,
        reporter: &mut dyn Reporter,
        location: Option<&Location>,
    ) -> Result<(), IncludeError> {
        let total = selection.len();
        let linespec = self.options.lines.as_deref();

        let (requested, out_of_range): (BTreeSet<usize>, bool) = match linespec {
            Some(spec) => {
                let numbers = parse_linenos(spec, total)?;
                (numbers.indices.into_iter().collect(), numbers.out_of_range)
            }
            None => ((0..total).collect(), false),
        };
        let linelist: BTreeSet<usize> = requested.difference(docstring_lines).copied().collect();

        tracing::debug!(
            path = %self.path.display(),
            linespec = linespec.unwrap_or_default(),
            requested = requested.len(),
            kept = linelist.len(),
            "Applied line filter"
        );

        if out_of_range {
            reporter.warning(
                &out_of_range_message(linespec.unwrap_or_default(), total),
                location,
            );
        }

        selection.retain(|idx| linelist.contains(&idx));
        if selection.is_empty() {
            return Err(IncludeError::NoLinesSelected {
                spec: self.options.lines.clone(),
                path: self.path.clone(),
            });
        }

        Ok(())
    }

    /// Derive the numbering origin from the selection for `lineno-match`.
    fn match_line_numbers(&mut self, selection: &LineSelection) -> Result<(), IncludeError> {
        if !self.options.lineno_match {
            return Ok(());
        }

        let mut included = selection.included_indices();
        let Some(first) = included.next() else {
            return Ok(());
        };
        if !included.zip(first + 1..).all(|(idx, expected)| idx == expected) {
            return Err(IncludeError::DisjointLines);
        }

        self.lineno_start = first + 1;
        Ok(())
    }
}

/// Lines of a file with an inclusion flag each.
///
/// Flags only ever go from included to excluded.
struct LineSelection {
    lines: Vec<String>,
    included: Vec<bool>,
}

impl LineSelection {
    fn new(lines: Vec<String>) -> Self {
        let included = vec![true; lines.len()];
        Self { lines, included }
    }

    fn len(&self) -> usize {
        self.lines.len()
    }

    fn is_empty(&self) -> bool {
        !self.included.contains(&true)
    }

    fn retain(&mut self, keep: impl Fn(usize) -> bool) {
        for (idx, included) in self.included.iter_mut().enumerate() {
            *included = *included && keep(idx);
        }
    }

    fn included_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.included
            .iter()
            .enumerate()
            .filter_map(|(idx, &included)| included.then_some(idx))
    }

    fn into_result(self) -> ReadResult {
        let mut text = String::new();
        let mut lines = 0;
        for (line, included) in self.lines.iter().zip(self.included) {
            if included {
                text.push_str(line);
                lines += 1;
            }
        }
        ReadResult { text, lines }
    }
}

/// Convert `\r\n` and lone `\r` line breaks to `\n`.
fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_owned()
    }
}

/// Replace tabs with spaces up to the next multiple of `width`.
///
/// The column resets after each line break; a width of 0 removes tabs.
fn expand_tabs(text: &str, width: usize) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                if width > 0 {
                    let pad = width - column % width;
                    out.extend(std::iter::repeat_n(' ', pad));
                    column += pad;
                }
            }
            '\n' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}
