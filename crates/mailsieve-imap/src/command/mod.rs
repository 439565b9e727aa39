//! IMAP command builder.
//!
//! This module provides types and serialization for the commands the
//! fetch pipeline issues.

mod serialize;
mod tag_generator;
mod types;

use crate::types::SequenceSet;

pub use tag_generator::TagGenerator;
pub use types::{FetchAttribute, FetchItems, SearchCriteria};

use serialize::astring;
pub(crate) use serialize::is_quotable;

/// IMAP command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Any State Commands
    /// LOGOUT command.
    Logout,

    // Not Authenticated State Commands
    /// LOGIN command.
    Login {
        /// Username.
        username: String,
        /// Password.
        password: String,
    },

    // Authenticated State Commands
    /// SELECT command.
    Select {
        /// Mailbox name.
        mailbox: String,
    },

    // Selected State Commands
    /// SEARCH command.
    Search {
        /// Search criteria.
        criteria: SearchCriteria,
    },
    /// FETCH command.
    Fetch {
        /// Messages to fetch.
        sequence: SequenceSet,
        /// Items to fetch.
        items: FetchItems,
    },
}

impl Command {
    /// Serializes the command to bytes with the given tag.
    #[must_use]
    pub fn serialize(&self, tag: &str) -> Vec<u8> {
        let line = match self {
            Self::Logout => format!("{tag} LOGOUT"),
            Self::Login { username, password } => {
                format!("{tag} LOGIN {} {}", astring(username), astring(password))
            }
            Self::Select { mailbox } => format!("{tag} SELECT {}", astring(mailbox)),
            Self::Search { criteria } => format!("{tag} SEARCH {criteria}"),
            Self::Fetch { sequence, items } => format!("{tag} FETCH {sequence} {items}"),
        };

        let mut buf = line.into_bytes();
        buf.extend_from_slice(b"\r\n");
        buf
    }

    /// Short name used in log lines; never includes credentials.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Logout => "LOGOUT",
            Self::Login { .. } => "LOGIN",
            Self::Select { .. } => "SELECT",
            Self::Search { .. } => "SEARCH",
            Self::Fetch { .. } => "FETCH",
        }
    }
}
