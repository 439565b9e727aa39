//! # mailsieve-imap
//!
//! A small async IMAP client covering what a read-only inbox viewer needs:
//! implicit-TLS connections, `LOGIN`, `SELECT`, `SEARCH`, `FETCH` and
//! `LOGOUT`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mailsieve_imap::{Client, Config, FetchAttribute, FetchItems, ImapDate, SearchCriteria};
//!
//! #[tokio::main]
//! async fn main() -> mailsieve_imap::Result<()> {
//!     let config = Config::new("imap.example.com");
//!     let stream = mailsieve_imap::connection::connect(&config).await?;
//!     let client = Client::from_stream(stream).await?;
//!
//!     let client = client.login("user@example.com", "password").await?;
//!     let (mut client, status) = client.select("INBOX").await?;
//!     println!("Messages: {}", status.exists);
//!
//!     let since = ImapDate::new(chrono::NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
//!     let ids = client.search(&SearchCriteria::Since(since)).await?;
//!     for id in ids.iter().rev() {
//!         let items = client
//!             .fetch(&(*id).into(), FetchItems::single(FetchAttribute::full_body()))
//!             .await?;
//!         println!("{id}: {} items", items.len());
//!     }
//!
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Connection States
//!
//! The client uses the type-state pattern so that only commands valid in the
//! current protocol state can be called:
//!
//! ```text
//! NotAuthenticated ── login() ──→ Authenticated ── select() ──→ Selected
//! ```
//!
//! ## Modules
//!
//! - [`command`]: command builders and wire serialization
//! - [`connection`]: streams, framing and the type-state client
//! - [`parser`]: sans-I/O response parser
//! - [`types`]: tags, sequence numbers, dates, statuses

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use command::{Command, FetchAttribute, FetchItems, SearchCriteria, TagGenerator};
pub use connection::{
    Authenticated, Client, Config, FramedStream, ImapStream, NotAuthenticated,
    ResponseAccumulator, Security, Selected,
};
pub use error::{Error, Result};
pub use parser::{FetchItem, Response, ResponseParser, UntaggedResponse};
pub use types::{ImapDate, MailboxStatus, ResponseCode, SeqNum, SequenceSet, Status, Tag};
