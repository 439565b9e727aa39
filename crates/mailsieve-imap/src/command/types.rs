//! Arguments of the FETCH and SEARCH commands.

use crate::types::ImapDate;

/// Body section request, `BODY[section]` or `BODY.PEEK[section]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchAttribute {
    /// Body section.
    Body {
        /// Section specifier; `None` means the whole message.
        section: Option<String>,
        /// Leave `\Seen` untouched.
        peek: bool,
    },
}

impl FetchAttribute {
    /// The entire raw message, fetched without marking it as read.
    #[must_use]
    pub const fn full_body() -> Self {
        Self::Body {
            section: None,
            peek: true,
        }
    }
}

/// Attributes requested by one FETCH command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchItems(Vec<FetchAttribute>);

impl FetchItems {
    /// A request for several attributes.
    #[must_use]
    pub const fn new(attributes: Vec<FetchAttribute>) -> Self {
        Self(attributes)
    }

    /// A request for exactly one attribute.
    #[must_use]
    pub fn single(attribute: FetchAttribute) -> Self {
        Self(vec![attribute])
    }

    /// Requested attributes in order.
    #[must_use]
    pub fn attributes(&self) -> &[FetchAttribute] {
        &self.0
    }
}

/// SEARCH criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCriteria {
    /// Every message in the mailbox.
    All,
    /// Messages whose internal date is on or after the day.
    Since(ImapDate),
}
