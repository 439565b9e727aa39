//! # mailsieve-mime
//!
//! MIME parsing for messages fetched over IMAP.
//!
//! ## Features
//!
//! - **Message parsing**: raw RFC 5322 bytes into a tree of MIME parts
//! - **Header decoding**: RFC 2047 encoded words in any charset `encoding_rs` knows
//! - **Transfer encodings**: Base64, Quoted-Printable, 7bit/8bit/binary
//! - **Body extraction**: the first inline `text/plain` part of a message
//!
//! ## Quick Start
//!
//! ```
//! use mailsieve_mime::Message;
//!
//! let raw = b"From: Jane <jane@example.com>\r\n\
//!             Subject: =?utf-8?B?SMOpbGxv?=\r\n\
//!             Content-Type: text/plain; charset=utf-8\r\n\
//!             \r\n\
//!             Hello, World!";
//!
//! let message = Message::parse(raw).unwrap();
//! assert_eq!(message.subject().as_deref(), Some("Héllo"));
//! assert_eq!(message.from(), Some("Jane <jane@example.com>"));
//! assert_eq!(message.plain_text().unwrap(), "Hello, World!");
//! ```

#![forbid(unsafe_code)]

mod content_type;
mod error;
mod header;
mod message;

pub mod encoding;

pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part, TransferEncoding};
