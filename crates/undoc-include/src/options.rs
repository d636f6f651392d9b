//! Directive options.
//!
//! Options arrive from the host as `(name, value)` pairs and are validated
//! into a typed [`IncludeOptions`].

use crate::error::OptionError;
use crate::{TextEncoding, make_id};

/// Validated option set for the `undocinclude` directive.
///
/// # Example
///
/// ```
/// use undoc_include::IncludeOptions;
///
/// let options = IncludeOptions::from_pairs([
///     ("pyobject", Some("Parser.parse")),
///     ("lines", Some("1-20")),
///     ("linenos", None),
/// ])
/// .unwrap();
/// assert_eq!(options.pyobject.as_deref(), Some("Parser.parse"));
/// assert!(options.linenos);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IncludeOptions {
    /// Show line numbers.
    pub linenos: bool,
    /// Explicit number of the first displayed line.
    pub lineno_start: Option<usize>,
    /// Number displayed lines after their position in the source file.
    pub lineno_match: bool,
    /// Expand tabs to this width before filtering.
    pub tab_width: Option<usize>,
    /// Highlighting language.
    pub language: Option<String>,
    /// Ignore highlighting errors.
    pub force: bool,
    /// Encoding label overriding the project default.
    pub encoding: Option<String>,
    /// Qualified name of the class or function to include.
    pub pyobject: Option<String>,
    /// Line-range spec of source lines to include.
    pub lines: Option<String>,
    /// Text placed before the included lines.
    pub prepend: Option<String>,
    /// Text placed after the included lines.
    pub append: Option<String>,
    /// Line-range spec of output lines to emphasize.
    pub emphasize_lines: Option<String>,
    /// Caption; empty means "use the file argument".
    pub caption: Option<String>,
    /// Extra style classes.
    pub classes: Vec<String>,
    /// Name for cross-referencing.
    pub name: Option<String>,
}

impl IncludeOptions {
    /// Build options from `(name, value)` pairs, validating each value.
    ///
    /// Later pairs override earlier ones with the same name.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, OptionError>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut options = Self::default();
        for (name, value) in pairs {
            options.set(name, value)?;
        }
        Ok(options)
    }

    /// Set one option by its directive name.
    pub fn set(&mut self, name: &str, value: Option<&str>) -> Result<(), OptionError> {
        match name {
            "linenos" => self.linenos = flag(name, value)?,
            "lineno-start" => self.lineno_start = Some(integer(name, value)?),
            "lineno-match" => self.lineno_match = flag(name, value)?,
            "tab-width" => self.tab_width = Some(integer(name, value)?),
            "language" => self.language = Some(required(name, value)?),
            "force" => self.force = flag(name, value)?,
            "encoding" => {
                let label = required(name, value)?;
                if TextEncoding::for_label(&label).is_none() {
                    return Err(OptionError::UnknownEncoding(label));
                }
                self.encoding = Some(label);
            }
            "pyobject" => self.pyobject = Some(required(name, value)?),
            "lines" => self.lines = Some(required(name, value)?),
            "prepend" => self.prepend = Some(required(name, value)?),
            "append" => self.append = Some(required(name, value)?),
            "emphasize-lines" => self.emphasize_lines = Some(required(name, value)?),
            "caption" => self.caption = Some(value.unwrap_or_default().to_owned()),
            "class" => self.classes = class_list(name, value)?,
            "name" => self.name = Some(value.unwrap_or_default().to_owned()),
            _ => return Err(OptionError::Unknown(name.to_owned())),
        }
        Ok(())
    }
}

fn flag(name: &str, value: Option<&str>) -> Result<bool, OptionError> {
    match value.map(str::trim) {
        None | Some("") => Ok(true),
        Some(v) => Err(OptionError::UnexpectedValue {
            name: name.to_owned(),
            value: v.to_owned(),
        }),
    }
}

fn required(name: &str, value: Option<&str>) -> Result<String, OptionError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_owned()),
        _ => Err(OptionError::MissingValue(name.to_owned())),
    }
}

fn integer(name: &str, value: Option<&str>) -> Result<usize, OptionError> {
    let raw = required(name, value)?;
    raw.trim()
        .parse()
        .map_err(|_| OptionError::InvalidInteger {
            name: name.to_owned(),
            value: raw,
        })
}

fn class_list(name: &str, value: Option<&str>) -> Result<Vec<String>, OptionError> {
    let raw = required(name, value)?;
    Ok(raw.split_whitespace().map(make_id).collect())
}

/// Split a directive-style attribute string into option pairs.
///
/// Supports bare flags (`linenos`), `key=value`, `key="value"` and
/// `key='value'`. Quoted values may contain spaces and be empty.
///
/// # Example
///
/// ```
/// use undoc_include::option_pairs;
///
/// let pairs = option_pairs(r#"linenos lines="2-4" caption="""#);
/// assert_eq!(
///     pairs,
///     vec![
///         ("linenos".to_owned(), None),
///         ("lines".to_owned(), Some("2-4".to_owned())),
///         ("caption".to_owned(), Some(String::new())),
///     ]
/// );
/// ```
#[must_use]
pub fn option_pairs(attrs: &str) -> Vec<(String, Option<String>)> {
    let mut pairs = Vec::new();
    let mut remaining = attrs.trim();

    while !remaining.is_empty() {
        let key_end = remaining
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(remaining.len());
        let key = &remaining[..key_end];
        let rest = &remaining[key_end..];

        if let Some(after_eq) = rest.strip_prefix('=') {
            let (value, rest) = parse_value(after_eq);
            if !key.is_empty() {
                pairs.push((key.to_owned(), Some(value.to_owned())));
            }
            remaining = rest.trim_start();
        } else {
            if !key.is_empty() {
                pairs.push((key.to_owned(), None));
            }
            remaining = rest.trim_start();
        }
    }

    pairs
}

/// Parse a value after `=`: double-quoted, single-quoted or up to whitespace.
fn parse_value(s: &str) -> (&str, &str) {
    for quote in ['"', '\''] {
        if let Some(stripped) = s.strip_prefix(quote) {
            return match stripped.find(quote) {
                Some(end) => (&stripped[..end], &stripped[end + 1..]),
                None => (stripped, ""),
            };
        }
    }
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    (&s[..end], &s[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = IncludeOptions::default();
        assert!(!options.linenos);
        assert!(!options.lineno_match);
        assert_eq!(options.lineno_start, None);
        assert!(options.classes.is_empty());
    }

    #[test]
    fn test_all_options() {
        let options = IncludeOptions::from_pairs([
            ("linenos", None),
            ("lineno-start", Some("10")),
            ("tab-width", Some("4")),
            ("language", Some("python")),
            ("force", None),
            ("encoding", Some("latin-1")),
            ("pyobject", Some("Foo.bar")),
            ("lines", Some("1,3-5")),
            ("prepend", Some("# start")),
            ("append", Some("# end")),
            ("emphasize-lines", Some("2")),
            ("caption", Some("Example")),
            ("class", Some("Highlight  Wide")),
            ("name", Some("example")),
        ])
        .unwrap();

        assert!(options.linenos);
        assert_eq!(options.lineno_start, Some(10));
        assert_eq!(options.tab_width, Some(4));
        assert_eq!(options.language.as_deref(), Some("python"));
        assert!(options.force);
        assert_eq!(options.encoding.as_deref(), Some("latin-1"));
        assert_eq!(options.pyobject.as_deref(), Some("Foo.bar"));
        assert_eq!(options.lines.as_deref(), Some("1,3-5"));
        assert_eq!(options.prepend.as_deref(), Some("# start"));
        assert_eq!(options.append.as_deref(), Some("# end"));
        assert_eq!(options.emphasize_lines.as_deref(), Some("2"));
        assert_eq!(options.caption.as_deref(), Some("Example"));
        assert_eq!(options.classes, vec!["highlight", "wide"]);
        assert_eq!(options.name.as_deref(), Some("example"));
    }

    #[test]
    fn test_empty_caption_and_name_are_kept() {
        let options =
            IncludeOptions::from_pairs([("caption", None), ("name", Some(""))]).unwrap();
        assert_eq!(options.caption.as_deref(), Some(""));
        assert_eq!(options.name.as_deref(), Some(""));
    }

    #[test]
    fn test_flag_rejects_value() {
        let err = IncludeOptions::from_pairs([("linenos", Some("yes"))]).unwrap_err();
        assert_eq!(
            err,
            OptionError::UnexpectedValue {
                name: "linenos".to_owned(),
                value: "yes".to_owned()
            }
        );
    }

    #[test]
    fn test_required_value() {
        let err = IncludeOptions::from_pairs([("lines", Some("  "))]).unwrap_err();
        assert_eq!(err, OptionError::MissingValue("lines".to_owned()));
    }

    #[test]
    fn test_invalid_integer() {
        let err = IncludeOptions::from_pairs([("tab-width", Some("-1"))]).unwrap_err();
        assert!(matches!(err, OptionError::InvalidInteger { .. }));
    }

    #[test]
    fn test_unknown_encoding() {
        let err = IncludeOptions::from_pairs([("encoding", Some("klingon"))]).unwrap_err();
        assert_eq!(err, OptionError::UnknownEncoding("klingon".to_owned()));
    }

    #[test]
    fn test_unknown_option() {
        let err = IncludeOptions::from_pairs([("dedent", Some("4"))]).unwrap_err();
        assert_eq!(err, OptionError::Unknown("dedent".to_owned()));
    }

    #[test]
    fn test_option_pairs_quoting() {
        let pairs = option_pairs(r#"caption="Hello World" name='x y' lines=1-3"#);
        assert_eq!(
            pairs,
            vec![
                ("caption".to_owned(), Some("Hello World".to_owned())),
                ("name".to_owned(), Some("x y".to_owned())),
                ("lines".to_owned(), Some("1-3".to_owned())),
            ]
        );
    }

    #[test]
    fn test_option_pairs_empty() {
        assert!(option_pairs("   ").is_empty());
    }

    #[test]
    fn test_option_pairs_unterminated_quote() {
        let pairs = option_pairs(r#"caption="open"#);
        assert_eq!(pairs, vec![("caption".to_owned(), Some("open".to_owned()))]);
    }
}
