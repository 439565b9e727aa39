//! MIME message structure and handling.

use crate::content_type::ContentType;
use crate::encoding::{decode_base64, decode_charset, decode_quoted_printable};
use crate::error::{Error, Result};
use crate::header::Headers;

/// Multipart nesting deeper than this is kept as an opaque leaf.
const MAX_DEPTH: usize = 32;

/// Transfer encoding types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// 7-bit ASCII.
    SevenBit,
    /// 8-bit data.
    EightBit,
    /// Base64 encoding.
    Base64,
    /// Quoted-Printable encoding.
    QuotedPrintable,
    /// Binary (no encoding).
    Binary,
}

impl TransferEncoding {
    /// Parses transfer encoding from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "8bit" => Self::EightBit,
            "base64" => Self::Base64,
            "quoted-printable" => Self::QuotedPrintable,
            "binary" => Self::Binary,
            _ => Self::SevenBit,
        }
    }
}

/// MIME entity: headers, a raw body, and child parts when multipart.
#[derive(Debug, Clone, Default)]
pub struct Part {
    /// Part headers.
    pub headers: Headers,
    /// Part body, still transfer-encoded. For multipart entities this is
    /// the whole body including boundaries.
    pub body: Vec<u8>,
    /// Child parts (empty unless multipart).
    pub parts: Vec<Part>,
}

impl Part {
    /// Parses a MIME entity from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBoundary`] if a multipart entity, at any
    /// depth, has no boundary parameter.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        Self::parse_at_depth(raw, 0)
    }

    fn parse_at_depth(raw: &[u8], depth: usize) -> Result<Self> {
        let (head, body) = split_head_body(raw);
        let mut part = Self {
            headers: Headers::parse(head),
            body: body.to_vec(),
            parts: Vec::new(),
        };

        let content_type = part.content_type();
        if content_type.is_multipart() && depth < MAX_DEPTH {
            let boundary = content_type.boundary().ok_or(Error::MissingBoundary)?;
            part.parts = split_multipart(body, boundary)
                .into_iter()
                .map(|child| Self::parse_at_depth(child, depth + 1))
                .collect::<Result<_>>()?;
        }

        Ok(part)
    }

    /// Gets the content type.
    ///
    /// A missing or unparsable `Content-Type` yields the RFC 2045 default,
    /// `text/plain`.
    #[must_use]
    pub fn content_type(&self) -> ContentType {
        self.headers
            .get("content-type")
            .and_then(|value| ContentType::parse(value).ok())
            .unwrap_or_else(ContentType::text_plain)
    }

    /// Gets the transfer encoding.
    #[must_use]
    pub fn transfer_encoding(&self) -> TransferEncoding {
        self.headers
            .get("content-transfer-encoding")
            .map_or(TransferEncoding::SevenBit, TransferEncoding::parse)
    }

    /// Checks if this part is multipart.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.content_type().is_multipart()
    }

    /// Checks if `Content-Disposition` marks this part as an attachment.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.headers
            .get("content-disposition")
            .is_some_and(|value| value.to_ascii_lowercase().contains("attachment"))
    }

    /// Decodes the body according to the transfer encoding.
    ///
    /// # Errors
    ///
    /// Returns an error if a Base64 body contains invalid characters.
    pub fn decode_body(&self) -> Result<Vec<u8>> {
        match self.transfer_encoding() {
            TransferEncoding::Base64 => decode_base64(&self.body),
            TransferEncoding::QuotedPrintable => Ok(decode_quoted_printable(&self.body)),
            TransferEncoding::SevenBit | TransferEncoding::EightBit | TransferEncoding::Binary => {
                Ok(self.body.clone())
            }
        }
    }

    /// Gets the decoded body as text in the declared charset.
    ///
    /// # Errors
    ///
    /// Returns an error if transfer decoding fails. Charset problems never
    /// fail; bad sequences are replaced.
    pub fn text(&self) -> Result<String> {
        let decoded = self.decode_body()?;
        Ok(decode_charset(self.content_type().charset(), &decoded))
    }

    /// Depth-first search for the first inline `text/plain` descendant.
    fn find_plain_text(&self) -> Option<&Self> {
        self.parts.iter().find_map(|child| {
            if child.is_multipart() {
                child.find_plain_text()
            } else if child.content_type().is_text_plain() && !child.is_attachment() {
                Some(child)
            } else {
                None
            }
        })
    }
}

/// Parsed email message.
#[derive(Debug, Clone)]
pub struct Message {
    root: Part,
}

impl Message {
    /// Parses a complete RFC 5322 message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingBoundary`] if a multipart entity has no
    /// boundary.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        Ok(Self {
            root: Part::parse(raw)?,
        })
    }

    /// Top-level headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.root.headers
    }

    /// The top-level MIME entity.
    #[must_use]
    pub const fn root(&self) -> &Part {
        &self.root
    }

    /// Checks if this is a multipart message.
    #[must_use]
    pub fn is_multipart(&self) -> bool {
        self.root.is_multipart()
    }

    /// Gets the decoded Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<String> {
        self.root.headers.decoded("subject")
    }

    /// Gets the raw From header.
    #[must_use]
    pub fn from(&self) -> Option<&str> {
        self.root.headers.get("from")
    }

    /// Gets the raw Date header.
    #[must_use]
    pub fn date(&self) -> Option<&str> {
        self.root.headers.get("date")
    }

    /// Extracts the plain-text body.
    ///
    /// Multipart messages yield the first `text/plain` part that is not an
    /// attachment, searched depth-first, or an empty string if there is
    /// none. Single-part messages yield their decoded payload whatever its
    /// type.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen part's transfer encoding is corrupt.
    pub fn plain_text(&self) -> Result<String> {
        if self.root.is_multipart() {
            self.root
                .find_plain_text()
                .map_or_else(|| Ok(String::new()), Part::text)
        } else {
            self.root.text()
        }
    }
}

/// Returns the end offset (exclusive, after `\n`) of the line at `start`.
fn line_end(data: &[u8], start: usize) -> usize {
    data[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(data.len(), |i| start + i + 1)
}

/// Splits an entity at the first empty line.
fn split_head_body(raw: &[u8]) -> (&[u8], &[u8]) {
    let mut offset = 0;
    while offset < raw.len() {
        let end = line_end(raw, offset);
        let line = &raw[offset..end];
        if line == b"\n" || line == b"\r\n" {
            return (&raw[..offset], &raw[end..]);
        }
        offset = end;
    }
    (raw, &[])
}

/// Splits a multipart body into its parts.
///
/// The preamble and epilogue are dropped. A body whose closing delimiter
/// is missing keeps everything after the last delimiter as the final part.
fn split_multipart<'a>(body: &'a [u8], boundary: &str) -> Vec<&'a [u8]> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();
    let mut current: Option<usize> = None;
    let mut offset = 0;

    while offset < body.len() {
        let end = line_end(body, offset);
        let line = body[offset..end].trim_ascii_end();

        if let Some(rest) = line.strip_prefix(delimiter.as_bytes()) {
            let closing = rest.starts_with(b"--");
            if closing || rest.is_empty() {
                if let Some(start) = current.take() {
                    parts.push(strip_final_newline(&body[start..offset]));
                }
                if closing {
                    return parts;
                }
                current = Some(end);
            }
        }
        offset = end;
    }

    if let Some(start) = current {
        parts.push(&body[start..]);
    }
    parts
}

/// Removes the line break that belongs to the following delimiter.
fn strip_final_newline(data: &[u8]) -> &[u8] {
    data.strip_suffix(b"\r\n")
        .or_else(|| data.strip_suffix(b"\n"))
        .unwrap_or(data)
}
