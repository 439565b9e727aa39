//! MIME decoding utilities.
//!
//! Supports Base64, Quoted-Printable, RFC 2047 header words and charset
//! conversion. Decoders are lenient and keep malformed input as written
//! where they can.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use encoding_rs::Encoding;

use crate::error::Result;

/// Standard alphabet, padding optional, trailing bits ignored.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Decodes Base64 data, ignoring embedded whitespace and line breaks.
///
/// # Errors
///
/// Returns an error if the input contains characters outside the Base64
/// alphabet.
pub fn decode_base64(data: &[u8]) -> Result<Vec<u8>> {
    let cleaned: Vec<u8> = data
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    LENIENT_BASE64.decode(cleaned).map_err(Into::into)
}

/// Decodes Quoted-Printable data (RFC 2045 §6.7).
///
/// Soft line breaks are removed. Malformed escapes are kept verbatim.
#[must_use]
pub fn decode_quoted_printable(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());
    let mut i = 0;

    while i < data.len() {
        if data[i] != b'=' {
            result.push(data[i]);
            i += 1;
            continue;
        }

        // Soft line break, allowing transport padding before the newline.
        let mut j = i + 1;
        while j < data.len() && (data[j] == b' ' || data[j] == b'\t') {
            j += 1;
        }
        if data.get(j) == Some(&b'\n') {
            i = j + 1;
            continue;
        }
        if data.get(j) == Some(&b'\r') && data.get(j + 1) == Some(&b'\n') {
            i = j + 2;
            continue;
        }

        match (data.get(i + 1), data.get(i + 2)) {
            (Some(&hi), Some(&lo)) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => {
                result.push((hex_value(hi) << 4) | hex_value(lo));
                i += 3;
            }
            _ => {
                result.push(b'=');
                i += 1;
            }
        }
    }

    result
}

const fn hex_value(digit: u8) -> u8 {
    match digit {
        b'0'..=b'9' => digit - b'0',
        b'a'..=b'f' => digit - b'a' + 10,
        b'A'..=b'F' => digit - b'A' + 10,
        _ => 0,
    }
}

/// Decodes bytes in the named charset to a string.
///
/// Unknown or missing charsets are treated as UTF-8, and so is US-ASCII,
/// which UTF-8 extends. Invalid sequences become U+FFFD.
#[must_use]
pub fn decode_charset(charset: Option<&str>, bytes: &[u8]) -> String {
    let encoding = charset
        .map(str::trim)
        .filter(|label| !is_ascii_label(label))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::UTF_8);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

fn is_ascii_label(label: &str) -> bool {
    ["us-ascii", "ascii", "ansi_x3.4-1968"]
        .iter()
        .any(|ascii| label.eq_ignore_ascii_case(ascii))
}

/// Decodes RFC 2047 encoded words in a header value.
///
/// Example: `"=?UTF-8?B?SG9sYQ==?= =?UTF-8?B?IG11bmRv?="` → `"Hola mundo"`.
/// Whitespace between two adjacent encoded words is dropped (RFC 2047
/// §6.2). Anything that does not decode is kept as written.
#[must_use]
pub fn decode_rfc2047(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut remaining = text;
    let mut last_was_encoded = false;

    while let Some(start) = remaining.find("=?") {
        let before = &remaining[..start];
        if !last_was_encoded || !before.trim().is_empty() {
            result.push_str(before);
        }

        let word = &remaining[start + 2..];
        if let Some((decoded, consumed)) = decode_word(word) {
            result.push_str(&decoded);
            remaining = &word[consumed..];
            last_was_encoded = true;
        } else {
            result.push_str("=?");
            remaining = word;
            last_was_encoded = false;
        }
    }

    result.push_str(remaining);
    result
}

/// Decodes one `charset?encoding?text?=` word (the leading `=?` already
/// stripped). Returns the text and the number of bytes consumed.
fn decode_word(word: &str) -> Option<(String, usize)> {
    let (charset, rest) = word.split_once('?')?;
    let (encoding, rest) = rest.split_once('?')?;
    let end = rest.find("?=")?;
    let payload = &rest[..end];

    if charset.is_empty() || payload.contains(char::is_whitespace) {
        return None;
    }

    let consumed = charset.len() + 1 + encoding.len() + 1 + end + 2;
    let bytes = match encoding {
        "B" | "b" => decode_base64(payload.as_bytes()).ok()?,
        "Q" | "q" => {
            let spaced = payload.replace('_', " ");
            decode_quoted_printable(spaced.as_bytes())
        }
        _ => return None,
    };

    // RFC 2231 language suffix: "utf-8*en".
    let charset = charset.split_once('*').map_or(charset, |(name, _)| name);
    Some((decode_charset(Some(charset), &bytes), consumed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_base64_decode() {
        let decoded = decode_base64(b"SGVsbG8s\r\nIFdvcmxkIQ==\r\n").unwrap();
        assert_eq!(decoded, b"Hello, World!");
    }

    #[test]
    fn test_base64_missing_padding() {
        let decoded = decode_base64(b"SGk").unwrap();
        assert_eq!(decoded, b"Hi");
    }

    #[test]
    fn test_base64_invalid() {
        assert!(decode_base64(b"not*base64").is_err());
    }

    #[test]
    fn test_quoted_printable_decode() {
        assert_eq!(decode_quoted_printable(b"Hello, World!"), b"Hello, World!");
        assert_eq!(decode_quoted_printable(b"H=C3=A9llo"), "Héllo".as_bytes());
        assert_eq!(decode_quoted_printable(b"h=c3=a9"), "hé".as_bytes());
    }

    #[test]
    fn test_quoted_printable_soft_line_break() {
        assert_eq!(decode_quoted_printable(b"Hello=\r\nWorld"), b"HelloWorld");
        assert_eq!(decode_quoted_printable(b"Hello=\nWorld"), b"HelloWorld");
        assert_eq!(decode_quoted_printable(b"Hello= \r\nWorld"), b"HelloWorld");
    }

    #[test]
    fn test_quoted_printable_malformed_kept() {
        assert_eq!(decode_quoted_printable(b"50=% off"), b"50=% off");
        assert_eq!(decode_quoted_printable(b"trailing="), b"trailing=");
    }

    #[test]
    fn test_decode_charset() {
        assert_eq!(decode_charset(Some("iso-8859-1"), b"caf\xe9"), "café");
        assert_eq!(decode_charset(Some("UTF-8"), "café".as_bytes()), "café");
        assert_eq!(decode_charset(None, b"plain"), "plain");
        assert_eq!(decode_charset(Some("x-unknown"), b"abc"), "abc");
    }

    #[test]
    fn test_decode_charset_ascii_label_reads_utf8() {
        assert_eq!(decode_charset(Some("US-ASCII"), "naïve".as_bytes()), "naïve");
    }

    #[test]
    fn test_decode_charset_invalid_utf8_is_lossy() {
        assert_eq!(decode_charset(Some("utf-8"), b"ok\xff"), "ok\u{fffd}");
    }

    #[test]
    fn test_rfc2047_plain_text_unchanged() {
        assert_eq!(decode_rfc2047("Hello"), "Hello");
        assert_eq!(decode_rfc2047(""), "");
    }

    #[test]
    fn test_rfc2047_base64() {
        assert_eq!(decode_rfc2047("=?utf-8?B?SMOpbGxv?="), "Héllo");
    }

    #[test]
    fn test_rfc2047_quoted_printable() {
        assert_eq!(decode_rfc2047("=?utf-8?Q?H=C3=A9llo_there?="), "Héllo there");
    }

    #[test]
    fn test_rfc2047_adjacent_words_joined() {
        assert_eq!(
            decode_rfc2047("=?UTF-8?B?SG9sYQ==?= =?UTF-8?B?IG11bmRv?="),
            "Hola mundo"
        );
    }

    #[test]
    fn test_rfc2047_mixed_with_plain_text() {
        assert_eq!(
            decode_rfc2047("Re: =?iso-8859-1?Q?caf=E9?= tonight"),
            "Re: café tonight"
        );
    }

    #[test]
    fn test_rfc2047_invalid_word_kept() {
        assert_eq!(decode_rfc2047("=?utf-8?X?abc?="), "=?utf-8?X?abc?=");
        assert_eq!(decode_rfc2047("price =? 5"), "price =? 5");
    }

    proptest! {
        #[test]
        fn quoted_printable_without_escapes_is_unchanged(
            data in proptest::collection::vec(any::<u8>().prop_filter("no =", |b| *b != b'='), 0..256)
        ) {
            prop_assert_eq!(decode_quoted_printable(&data), data);
        }

        #[test]
        fn quoted_printable_never_grows(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert!(decode_quoted_printable(&data).len() <= data.len());
        }

        #[test]
        fn header_without_encoded_words_is_unchanged(text in "[^=]{0,64}") {
            prop_assert_eq!(decode_rfc2047(&text), text);
        }
    }
}
