//! Text encoding lookup and strict decoding.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A resolved text encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextEncoding {
    codec: Codec,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Codec {
    /// 7-bit ASCII; any byte at or above 0x80 is malformed.
    Ascii,
    /// ISO-8859-1; every byte maps to the code point of the same value.
    Latin1,
    Whatwg {
        encoding: &'static Encoding,
        strip_bom: bool,
    },
}

impl TextEncoding {
    /// Resolve an encoding label.
    ///
    /// Accepts WHATWG labels (`utf-8`, `shift_jis`, ...) as well as
    /// Python-style spellings with underscores (`utf_8`, `latin_1`). The
    /// `utf-8-sig` label decodes UTF-8 and drops a leading byte-order mark.
    /// `ascii` and `latin-1` keep their strict meaning instead of the WHATWG
    /// mapping to windows-1252.
    ///
    /// # Example
    ///
    /// ```
    /// use undoc_include::TextEncoding;
    ///
    /// assert!(TextEncoding::for_label("utf-8-sig").is_some());
    /// assert_eq!(TextEncoding::for_label("latin_1").unwrap().name(), "iso-8859-1");
    /// assert!(TextEncoding::for_label("klingon").is_none());
    /// ```
    #[must_use]
    pub fn for_label(label: &str) -> Option<Self> {
        let normalized = label.trim().to_ascii_lowercase().replace('_', "-");
        let codec = match normalized.as_str() {
            "utf-8-sig" | "utf8-sig" => Codec::Whatwg {
                encoding: UTF_8,
                strip_bom: true,
            },
            "ascii" | "us-ascii" | "646" => Codec::Ascii,
            "latin-1" | "latin1" | "latin" | "l1" | "iso-8859-1" | "iso8859-1" | "8859"
            | "cp819" => Codec::Latin1,
            other => Codec::Whatwg {
                encoding: Encoding::for_label(other.as_bytes())?,
                strip_bom: false,
            },
        };
        Some(Self { codec })
    }

    /// Decode bytes, returning `None` on any malformed sequence.
    #[must_use]
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self.codec {
            Codec::Ascii => std::str::from_utf8(bytes)
                .ok()
                .filter(|text| text.is_ascii())
                .map(Cow::Borrowed),
            Codec::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes)),
            Codec::Whatwg {
                encoding,
                strip_bom,
            } => {
                let bytes = if strip_bom {
                    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
                } else {
                    bytes
                };
                encoding.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }
    }

    /// Canonical name of the underlying encoding.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self.codec {
            Codec::Ascii => "ascii",
            Codec::Latin1 => "iso-8859-1",
            Codec::Whatwg { encoding, .. } => encoding.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_sig_strips_bom() {
        let enc = TextEncoding::for_label("utf-8-sig").unwrap();
        assert_eq!(enc.decode(b"\xEF\xBB\xBFabc").unwrap(), "abc");
        assert_eq!(enc.decode(b"abc").unwrap(), "abc");
    }

    #[test]
    fn test_plain_utf8_keeps_bom() {
        let enc = TextEncoding::for_label("utf-8").unwrap();
        assert_eq!(enc.decode(b"\xEF\xBB\xBFabc").unwrap(), "\u{feff}abc");
    }

    #[test]
    fn test_invalid_utf8_is_rejected() {
        let enc = TextEncoding::for_label("utf_8").unwrap();
        assert!(enc.decode(b"caf\xE9").is_none());
    }

    #[test]
    fn test_latin1_decodes_high_bytes() {
        let enc = TextEncoding::for_label("latin-1").unwrap();
        assert_eq!(enc.decode(b"caf\xE9").unwrap(), "caf\u{e9}");
    }

    #[test]
    fn test_latin1_keeps_c1_controls() {
        let enc = TextEncoding::for_label("iso-8859-1").unwrap();
        assert_eq!(enc.decode(b"\x80\x9F\xFF").unwrap(), "\u{80}\u{9f}\u{ff}");
    }

    #[test]
    fn test_ascii_rejects_high_bytes() {
        let enc = TextEncoding::for_label("ascii").unwrap();
        assert_eq!(enc.name(), "ascii");
        assert_eq!(enc.decode(b"plain text").unwrap(), "plain text");
        assert!(enc.decode(b"caf\xC3\xA9").is_none());
        assert!(TextEncoding::for_label("US_ASCII").unwrap().decode(b"\x80").is_none());
    }

    #[test]
    fn test_whatwg_labels() {
        assert_eq!(TextEncoding::for_label("cp1252").unwrap().name(), "windows-1252");
        assert_eq!(TextEncoding::for_label("shift_jis").unwrap().name(), "Shift_JIS");
    }

    #[test]
    fn test_unknown_label() {
        assert!(TextEncoding::for_label("not-an-encoding").is_none());
    }
}
