//! Line-range spec parsing.
//!
//! A spec is a comma-separated list of items: `N`, `A-B`, `-B` (from the first
//! line) or `A-` (through the last line). Line numbers are 1-based in the spec
//! and 0-based in the result.

use crate::IncludeError;

/// Line indices selected by a spec.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineNumbers {
    /// 0-based indices below the line count, in spec order, possibly repeated.
    pub indices: Vec<usize>,
    /// Whether the spec named any line past the end.
    pub out_of_range: bool,
}

/// Parse a line-range spec into 0-based line indices.
///
/// Only indices below `total` are returned. Lines past the end are dropped and
/// flagged in [`LineNumbers::out_of_range`] so callers can warn about them.
///
/// # Example
///
/// ```
/// use undoc_include::parse_linenos;
///
/// assert_eq!(parse_linenos("1,3-5", 10).unwrap().indices, vec![0, 2, 3, 4]);
/// assert_eq!(parse_linenos("8-", 10).unwrap().indices, vec![7, 8, 9]);
///
/// let numbers = parse_linenos("-2,12", 10).unwrap();
/// assert_eq!(numbers.indices, vec![0, 1]);
/// assert!(numbers.out_of_range);
/// ```
pub fn parse_linenos(spec: &str, total: usize) -> Result<LineNumbers, IncludeError> {
    let invalid = || IncludeError::InvalidLineSpec(spec.to_owned());
    let mut numbers = LineNumbers::default();

    for part in spec.split(',') {
        let bounds: Vec<&str> = part.trim().split('-').collect();
        let (start, end) = match bounds.as_slice() {
            [single] => {
                let line = parse_lineno(single).ok_or_else(invalid)?;
                (line, line)
            }
            ["", ""] => return Err(invalid()),
            [begin, end] => {
                let start = if begin.is_empty() {
                    1
                } else {
                    parse_lineno(begin).ok_or_else(invalid)?
                };
                let end = if end.is_empty() {
                    start.max(total)
                } else {
                    parse_lineno(end).ok_or_else(invalid)?
                };
                if start > end {
                    return Err(invalid());
                }
                (start, end)
            }
            _ => return Err(invalid()),
        };

        if end > total {
            numbers.out_of_range = true;
        }
        numbers.indices.extend(start - 1..end.min(total));
    }

    Ok(numbers)
}

/// Warning text for a spec that reaches past the last line.
pub(crate) fn out_of_range_message(spec: &str, total: usize) -> String {
    format!("line number spec is out of range(1-{total}): '{spec}'")
}

/// Parse a single 1-based line number.
fn parse_lineno(s: &str) -> Option<usize> {
    s.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(spec: &str, total: usize) -> Vec<usize> {
        parse_linenos(spec, total).unwrap().indices
    }

    #[test]
    fn test_single_numbers() {
        assert_eq!(indices("1", 5), vec![0]);
        assert_eq!(indices("3,1", 5), vec![2, 0]);
    }

    #[test]
    fn test_closed_range() {
        let numbers = parse_linenos("2-4", 5).unwrap();
        assert_eq!(numbers.indices, vec![1, 2, 3]);
        assert!(!numbers.out_of_range);
    }

    #[test]
    fn test_open_ranges() {
        assert_eq!(indices("-3", 5), vec![0, 1, 2]);
        assert_eq!(indices("4-", 5), vec![3, 4]);
        assert!(!parse_linenos("4-", 5).unwrap().out_of_range);
    }

    #[test]
    fn test_open_end_past_total() {
        let numbers = parse_linenos("7-", 5).unwrap();
        assert!(numbers.indices.is_empty());
        assert!(numbers.out_of_range);
    }

    #[test]
    fn test_mixed_items_with_whitespace() {
        assert_eq!(indices(" 1 , 3-4 ,6", 10), vec![0, 2, 3, 5]);
    }

    #[test]
    fn test_lines_past_end_are_flagged() {
        let numbers = parse_linenos("4-6", 5).unwrap();
        assert_eq!(numbers.indices, vec![3, 4]);
        assert!(numbers.out_of_range);

        let numbers = parse_linenos("9", 5).unwrap();
        assert!(numbers.indices.is_empty());
        assert!(numbers.out_of_range);
    }

    #[test]
    fn test_huge_range_is_bounded_by_total() {
        let numbers = parse_linenos("1-18446744073709551615", 1).unwrap();
        assert_eq!(numbers.indices, vec![0]);
        assert!(numbers.out_of_range);

        let numbers = parse_linenos("2000000000-", 3).unwrap();
        assert!(numbers.indices.is_empty());
        assert!(numbers.out_of_range);
    }

    #[test]
    fn test_out_of_range_message() {
        assert_eq!(
            out_of_range_message("4-9", 5),
            "line number spec is out of range(1-5): '4-9'"
        );
    }

    #[test]
    fn test_invalid_specs() {
        for spec in ["", "-", "a", "1-2-3", "5-1", "0", "1,,2", "x-3"] {
            let err = parse_linenos(spec, 10).unwrap_err();
            assert!(
                matches!(err, IncludeError::InvalidLineSpec(ref s) if s == spec),
                "spec {spec:?} gave {err:?}"
            );
        }
    }
}
