//! # mailsieve-core
//!
//! Core logic for `mailsieve`.
//!
//! This crate provides:
//! - **Mailbox client** - fetch the last few days of INBOX as normalized messages
//! - **Sender filter** - a persisted blocklist of sender addresses
//! - **Checklist** - session to-do items, optionally drafted by an LLM assistant
//! - Display formatting and environment configuration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod address;
pub mod assistant;
pub mod checklist;
pub mod config;
mod error;
pub mod filter;
pub mod format;
pub mod mailbox;
mod message;

pub use assistant::Assistant;
pub use checklist::{Checklist, ChecklistItem};
pub use config::Config;
pub use error::{AssistantError, ConfigError, MailError, Result};
pub use filter::SenderFilter;
pub use mailbox::{MailboxClient, since_date};
pub use message::{BODY_UNREADABLE, Message, NO_SUBJECT};
