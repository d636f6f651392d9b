//! Error types for file inclusion.

use std::path::PathBuf;

/// Error raised while validating a directive option.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OptionError {
    /// Option name not recognized by the directive.
    #[error("unknown option: \"{0}\"")]
    Unknown(String),
    /// Flag option given a value.
    #[error("no argument is allowed for option \"{name}\"; \"{value}\" supplied")]
    UnexpectedValue {
        /// Option name.
        name: String,
        /// Supplied value.
        value: String,
    },
    /// Option requires a value but none was supplied.
    #[error("argument required for option \"{0}\" but none supplied")]
    MissingValue(String),
    /// Option value is not a non-negative integer.
    #[error("invalid value for option \"{name}\": \"{value}\" is not a non-negative integer")]
    InvalidInteger {
        /// Option name.
        name: String,
        /// Supplied value.
        value: String,
    },
    /// Option value names an encoding that is not known.
    #[error("unknown encoding: \"{0}\"")]
    UnknownEncoding(String),
}

/// Error raised by the include pipeline.
///
/// Every variant is recoverable at the directive boundary, where it is turned
/// into an inline warning node.
#[derive(Debug, thiserror::Error)]
pub enum IncludeError {
    /// Two options that cannot be combined were both supplied.
    #[error("Cannot use both \"{first}\" and \"{second}\" options")]
    ConflictingOptions {
        /// First option name.
        first: &'static str,
        /// Second option name.
        second: &'static str,
    },
    /// Invalid option value.
    #[error(transparent)]
    Option(#[from] OptionError),
    /// Include file is missing or could not be read.
    #[error("Include file {:?} not found or reading it failed", .path.display().to_string())]
    NotFound {
        /// Resolved file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// File contents are not valid in the configured encoding.
    #[error(
        "Encoding {encoding:?} used for reading included file {:?} seems to be wrong, try giving an :encoding: option",
        .path.display().to_string()
    )]
    Encoding {
        /// Encoding label used for decoding.
        encoding: String,
        /// Resolved file path.
        path: PathBuf,
    },
    /// Configured encoding label is not known.
    #[error("unknown encoding: {0:?}")]
    UnknownEncoding(String),
    /// Include file is not valid Python source.
    #[error("Include file {:?} could not be parsed: syntax error at line {line}", .path.display().to_string())]
    Syntax {
        /// Resolved file path.
        path: PathBuf,
        /// 1-based line of the first syntax error.
        line: usize,
    },
    /// Source analyzer could not be set up.
    #[error("source analyzer error: {0}")]
    Analyzer(String),
    /// Named object is not defined in the include file.
    #[error("Object named {object:?} not found in include file {:?}", .path.display().to_string())]
    ObjectNotFound {
        /// Requested object name.
        object: String,
        /// Resolved file path.
        path: PathBuf,
    },
    /// Line-range spec could not be parsed.
    #[error("invalid line number spec: {0:?}")]
    InvalidLineSpec(String),
    /// `lineno-match` requested for a selection with gaps.
    #[error("Cannot use \"lineno-match\" with a disjoint set of \"lines\"")]
    DisjointLines,
    /// Filtering left nothing to include.
    #[error("Line spec {:?}: no lines pulled from include file {:?}", .spec.as_deref().unwrap_or(""), .path.display().to_string())]
    NoLinesSelected {
        /// Line spec in effect, if any.
        spec: Option<String>,
        /// Resolved file path.
        path: PathBuf,
    },
}
