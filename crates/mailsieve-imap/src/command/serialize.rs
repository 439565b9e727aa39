//! Wire text for command arguments.

use std::borrow::Cow;
use std::fmt;

use super::types::{FetchAttribute, FetchItems, SearchCriteria};

/// Renders a string as an IMAP astring: bare when it is a valid atom,
/// otherwise quoted with `"` and `\` escaped.
pub fn astring(s: &str) -> Cow<'_, str> {
    if !s.is_empty() && !s.bytes().any(is_atom_special) {
        return Cow::Borrowed(s);
    }

    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Returns true if `s` can be sent as a quoted string: 7-bit text without
/// CR, LF or NUL. Anything else needs a literal.
#[must_use]
pub fn is_quotable(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii() && !matches!(b, b'\0' | b'\r' | b'\n'))
}

const fn is_atom_special(b: u8) -> bool {
    matches!(
        b,
        b' ' | b'"' | b'\\' | b'(' | b')' | b'{' | b'%' | b'*' | b']' | 0x7F
    ) || b < 0x20
}

impl fmt::Display for FetchAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self::Body { section, peek } = self;
        let keyword = if *peek { "BODY.PEEK" } else { "BODY" };
        write!(f, "{keyword}[{}]", section.as_deref().unwrap_or_default())
    }
}

impl fmt::Display for FetchItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.attributes() {
            [single] => write!(f, "{single}"),
            attributes => {
                f.write_str("(")?;
                for (i, attribute) in attributes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{attribute}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl fmt::Display for SearchCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::Since(date) => write!(f, "SINCE {date}"),
        }
    }
}
