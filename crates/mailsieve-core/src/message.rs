//! Normalized message record.

use serde::Serialize;
use tracing::debug;

/// Subject shown when a message has none.
pub const NO_SUBJECT: &str = "(No Subject)";

/// Body shown when the text part cannot be decoded.
pub const BODY_UNREADABLE: &str = "Error reading email content";

/// One fetched message, reduced to what the list and detail views show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Decoded subject, or [`NO_SUBJECT`].
    pub subject: String,
    /// Raw `From` header, or empty.
    pub sender: String,
    /// Raw `Date` header, or empty.
    pub date: String,
    /// Plain-text body, or [`BODY_UNREADABLE`].
    pub body: String,
}

impl Message {
    /// Builds a record from raw RFC 5322 bytes.
    ///
    /// Only a structurally broken MIME tree is an error. A body that fails
    /// to decode is replaced with [`BODY_UNREADABLE`].
    ///
    /// # Errors
    ///
    /// Returns an error if the MIME structure cannot be parsed.
    pub fn from_raw(raw: &[u8]) -> mailsieve_mime::Result<Self> {
        let parsed = mailsieve_mime::Message::parse(raw)?;

        let subject = parsed
            .subject()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| NO_SUBJECT.to_string());

        let body = parsed.plain_text().unwrap_or_else(|e| {
            debug!(error = %e, "body not decodable");
            BODY_UNREADABLE.to_string()
        });

        Ok(Self {
            subject,
            sender: parsed.from().unwrap_or_default().to_string(),
            date: parsed.date().unwrap_or_default().to_string(),
            body,
        })
    }
}
