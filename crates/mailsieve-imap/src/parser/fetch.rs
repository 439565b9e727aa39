//! FETCH response parsing.

use super::lexer::{Lexer, Token};
use crate::Result;

/// A data item from a FETCH response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchItem {
    /// `BODY[section]<origin>` contents.
    Body {
        /// Section specifier; `None` for the whole message.
        section: Option<String>,
        /// Partial fetch origin.
        origin: Option<u32>,
        /// Raw bytes, `None` when the server answered NIL.
        data: Option<Vec<u8>>,
    },
    /// `RFC822` contents.
    Rfc822(Option<Vec<u8>>),
    /// Message UID.
    Uid(u32),
    /// Message size in octets.
    Rfc822Size(u32),
    /// Message flags.
    Flags(Vec<String>),
    /// Internal date as sent by the server.
    InternalDate(String),
}

impl FetchItem {
    /// Returns the raw message bytes if this item carries a full message.
    #[must_use]
    pub fn full_message(&self) -> Option<&[u8]> {
        match self {
            Self::Body {
                section: None,
                data: Some(data),
                ..
            }
            | Self::Rfc822(Some(data)) => Some(data),
            _ => None,
        }
    }
}

/// Parses the parenthesized item list of a FETCH response.
pub fn parse_fetch_response(lexer: &mut Lexer<'_>) -> Result<Vec<FetchItem>> {
    lexer.expect(Token::LParen)?;
    let mut items = Vec::new();

    loop {
        match lexer.next_token()? {
            Token::RParen | Token::Eof | Token::Crlf => break,
            Token::Atom(name) => match name.to_ascii_uppercase().as_str() {
                "FLAGS" => {
                    lexer.expect_space()?;
                    items.push(FetchItem::Flags(parse_flag_list(lexer)?));
                }
                "UID" => {
                    lexer.expect_space()?;
                    items.push(FetchItem::Uid(lexer.read_number()?));
                }
                "RFC822.SIZE" => {
                    lexer.expect_space()?;
                    items.push(FetchItem::Rfc822Size(lexer.read_number()?));
                }
                "INTERNALDATE" => {
                    lexer.expect_space()?;
                    let date = lexer.read_nstring()?.unwrap_or_default();
                    items.push(FetchItem::InternalDate(
                        String::from_utf8_lossy(&date).into_owned(),
                    ));
                }
                "RFC822" => {
                    lexer.expect_space()?;
                    items.push(FetchItem::Rfc822(lexer.read_nstring()?));
                }
                "BODY" | "BODY.PEEK" if lexer.peek() == Some(b'[') => {
                    let (section, origin) = parse_section_and_origin(lexer);
                    lexer.expect_space()?;
                    items.push(FetchItem::Body {
                        section,
                        origin,
                        data: lexer.read_nstring()?,
                    });
                }
                _ => skip_value(lexer)?,
            },
            _ => {}
        }
    }

    Ok(items)
}

/// Parses a parenthesized flag list.
pub fn parse_flag_list(lexer: &mut Lexer<'_>) -> Result<Vec<String>> {
    lexer.expect(Token::LParen)?;
    let mut flags = Vec::new();

    loop {
        match lexer.next_token()? {
            Token::RParen | Token::Eof => break,
            Token::Atom(s) => flags.push(s.to_string()),
            // `\*` lexes as a backslash atom followed by an asterisk.
            Token::Asterisk => {
                if let Some(last) = flags.last_mut().filter(|f| f.as_str() == "\\") {
                    last.push('*');
                }
            }
            _ => {}
        }
    }

    Ok(flags)
}

/// Parses `[section]` and `<origin>` after `BODY`.
fn parse_section_and_origin(lexer: &mut Lexer<'_>) -> (Option<String>, Option<u32>) {
    let mut section = None;
    let mut origin = None;

    if lexer.peek() == Some(b'[') {
        lexer.advance();
        let raw = lexer.take_until(b']');
        if lexer.peek() == Some(b']') {
            lexer.advance();
        }
        if !raw.is_empty() {
            section = Some(String::from_utf8_lossy(raw).into_owned());
        }
    }

    if lexer.peek() == Some(b'<') {
        lexer.advance();
        let raw = lexer.take_until(b'>');
        if lexer.peek() == Some(b'>') {
            lexer.advance();
        }
        origin = std::str::from_utf8(raw).ok().and_then(|s| s.parse().ok());
    }

    (section, origin)
}

/// Skips the value of an unrecognised item, including nested lists
/// and literals.
fn skip_value(lexer: &mut Lexer<'_>) -> Result<()> {
    if lexer.peek() == Some(b'[') {
        lexer.advance();
        lexer.take_until(b']');
        lexer.advance();
    }
    if lexer.peek() == Some(b' ') {
        lexer.advance();
    }

    let mut depth = 0usize;
    loop {
        match lexer.next_token()? {
            Token::LParen => depth += 1,
            Token::RParen => {
                if depth <= 1 {
                    return Ok(());
                }
                depth -= 1;
            }
            Token::Eof | Token::Crlf => return Ok(()),
            _ if depth == 0 => return Ok(()),
            _ => {}
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(input: &[u8]) -> Vec<FetchItem> {
        let mut lexer = Lexer::new(input);
        parse_fetch_response(&mut lexer).unwrap()
    }

    #[test]
    fn test_body_literal() {
        let items = parse(b"(BODY[] {11}\r\nFrom: a\r\n\r\n)");
        assert_eq!(
            items,
            vec![FetchItem::Body {
                section: None,
                origin: None,
                data: Some(b"From: a\r\n\r\n".to_vec()),
            }]
        );
        assert_eq!(items[0].full_message(), Some(&b"From: a\r\n\r\n"[..]));
    }

    #[test]
    fn test_body_section_and_origin() {
        let items = parse(b"(BODY[HEADER]<0> \"abc\")");
        assert_eq!(
            items,
            vec![FetchItem::Body {
                section: Some("HEADER".to_string()),
                origin: Some(0),
                data: Some(b"abc".to_vec()),
            }]
        );
        assert_eq!(items[0].full_message(), None);
    }

    #[test]
    fn test_body_nil() {
        let items = parse(b"(BODY[] NIL)");
        assert_eq!(
            items,
            vec![FetchItem::Body {
                section: None,
                origin: None,
                data: None,
            }]
        );
    }

    #[test]
    fn test_mixed_items() {
        let items = parse(
            b"(UID 4827 RFC822.SIZE 1024 FLAGS (\\Seen $Junk) INTERNALDATE \"17-Jul-1996 02:44:25 -0700\")",
        );
        assert_eq!(
            items,
            vec![
                FetchItem::Uid(4827),
                FetchItem::Rfc822Size(1024),
                FetchItem::Flags(vec!["\\Seen".to_string(), "$Junk".to_string()]),
                FetchItem::InternalDate("17-Jul-1996 02:44:25 -0700".to_string()),
            ]
        );
    }

    #[test]
    fn test_rfc822_literal() {
        let items = parse(b"(RFC822 {3}\r\nabc)");
        assert_eq!(items, vec![FetchItem::Rfc822(Some(b"abc".to_vec()))]);
        assert_eq!(items[0].full_message(), Some(&b"abc"[..]));
    }

    #[test]
    fn test_unknown_items_skipped() {
        let items = parse(
            b"(ENVELOPE (NIL \"subj\" ((NIL NIL \"a\" \"b.c\")) NIL NIL NIL NIL NIL NIL NIL) X-GM-LABELS {3}\r\nabc UID 9)",
        );
        assert_eq!(items, vec![FetchItem::Uid(9)]);
    }
}
