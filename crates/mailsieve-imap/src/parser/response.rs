//! IMAP response parser.

#![allow(clippy::missing_errors_doc)]

use super::fetch::{FetchItem, parse_fetch_response, parse_flag_list};
use super::lexer::{Lexer, Token};
use crate::types::{ResponseCode, SeqNum, Status, Tag};
use crate::{Error, Result};

/// A parsed IMAP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Tagged response (command completion).
    Tagged {
        /// The command tag.
        tag: Tag,
        /// Response status.
        status: Status,
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// Untagged response (server data).
    Untagged(UntaggedResponse),
    /// Continuation request.
    Continuation {
        /// Optional text.
        text: Option<String>,
    },
}

/// Untagged server data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UntaggedResponse {
    /// `* OK`.
    Ok {
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* NO`.
    No {
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* BAD`.
    Bad {
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* PREAUTH` greeting.
    PreAuth {
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* BYE`.
    Bye {
        /// Optional response code.
        code: Option<ResponseCode>,
        /// Human-readable text.
        text: String,
    },
    /// `* CAPABILITY`, upper-cased.
    Capability(Vec<String>),
    /// `* FLAGS` for the selected mailbox.
    Flags(Vec<String>),
    /// `* SEARCH` results.
    Search(Vec<SeqNum>),
    /// `* n EXISTS`.
    Exists(u32),
    /// `* n RECENT`.
    Recent(u32),
    /// `* n EXPUNGE`.
    Expunge(SeqNum),
    /// `* n FETCH (...)`.
    Fetch {
        /// Message sequence number.
        seq: SeqNum,
        /// Returned data items.
        items: Vec<FetchItem>,
    },
    /// Anything else, kept as the raw line after `* `.
    Other(String),
}

/// Response parser.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses one complete response, including any literals it carries.
    pub fn parse(input: &[u8]) -> Result<Response> {
        let mut lexer = Lexer::new(input);

        match lexer.next_token()? {
            Token::Asterisk => Self::parse_untagged(&mut lexer),
            Token::Plus => {
                if lexer.peek() == Some(b' ') {
                    lexer.advance();
                }
                let text = lexer.rest_of_line();
                Ok(Response::Continuation {
                    text: (!text.is_empty()).then_some(text),
                })
            }
            Token::Atom(tag) => Self::parse_tagged(&mut lexer, tag),
            Token::Number(n) => Self::parse_tagged(&mut lexer, &n.to_string()),
            token => Err(Error::parse(0, format!("expected *, + or tag, got {token:?}"))),
        }
    }

    fn parse_tagged(lexer: &mut Lexer<'_>, tag: &str) -> Result<Response> {
        lexer.expect_space()?;
        let status = Self::parse_status(lexer)?;
        let (code, text) = Self::parse_resp_text(lexer)?;

        Ok(Response::Tagged {
            tag: Tag::new(tag),
            status,
            code,
            text,
        })
    }

    fn parse_untagged(lexer: &mut Lexer<'_>) -> Result<Response> {
        lexer.expect_space()?;

        let untagged = match lexer.next_token()? {
            Token::Atom(keyword) => match keyword.to_ascii_uppercase().as_str() {
                "OK" => {
                    let (code, text) = Self::parse_resp_text(lexer)?;
                    UntaggedResponse::Ok { code, text }
                }
                "NO" => {
                    let (code, text) = Self::parse_resp_text(lexer)?;
                    UntaggedResponse::No { code, text }
                }
                "BAD" => {
                    let (code, text) = Self::parse_resp_text(lexer)?;
                    UntaggedResponse::Bad { code, text }
                }
                "PREAUTH" => {
                    let (code, text) = Self::parse_resp_text(lexer)?;
                    UntaggedResponse::PreAuth { code, text }
                }
                "BYE" => {
                    let (code, text) = Self::parse_resp_text(lexer)?;
                    UntaggedResponse::Bye { code, text }
                }
                "CAPABILITY" => UntaggedResponse::Capability(
                    lexer
                        .rest_of_line()
                        .split_ascii_whitespace()
                        .map(str::to_ascii_uppercase)
                        .collect(),
                ),
                "FLAGS" => {
                    lexer.expect_space()?;
                    UntaggedResponse::Flags(parse_flag_list(lexer)?)
                }
                "SEARCH" => UntaggedResponse::Search(Self::parse_search(lexer)?),
                _ => UntaggedResponse::Other(format!("{keyword}{}", lexer.rest_of_line())),
            },
            Token::Number(n) => {
                lexer.expect_space()?;
                let keyword = lexer.read_atom_string()?;
                let position = lexer.position();
                let seq = SeqNum::new(n);
                let invalid = || Error::parse(position, "invalid sequence number 0");
                match keyword.to_ascii_uppercase().as_str() {
                    "EXISTS" => UntaggedResponse::Exists(n),
                    "RECENT" => UntaggedResponse::Recent(n),
                    "EXPUNGE" => UntaggedResponse::Expunge(seq.ok_or_else(invalid)?),
                    "FETCH" => {
                        let seq = seq.ok_or_else(invalid)?;
                        lexer.expect_space()?;
                        let items = parse_fetch_response(lexer)?;
                        UntaggedResponse::Fetch { seq, items }
                    }
                    _ => UntaggedResponse::Other(format!("{n} {keyword}{}", lexer.rest_of_line())),
                }
            }
            token => {
                return Err(Error::parse(
                    lexer.position(),
                    format!("unexpected token in untagged response: {token:?}"),
                ));
            }
        };

        Ok(Response::Untagged(untagged))
    }

    fn parse_status(lexer: &mut Lexer<'_>) -> Result<Status> {
        let s = lexer.read_atom_string()?;
        Status::parse(s).ok_or_else(|| Error::parse(lexer.position(), format!("invalid status: {s}")))
    }

    /// Parses `[code] text` following a status keyword.
    fn parse_resp_text(lexer: &mut Lexer<'_>) -> Result<(Option<ResponseCode>, String)> {
        if lexer.peek() == Some(b' ') {
            lexer.advance();
        }

        let code = if lexer.peek() == Some(b'[') {
            Some(Self::parse_response_code(lexer)?)
        } else {
            None
        };

        if lexer.peek() == Some(b' ') {
            lexer.advance();
        }

        Ok((code, lexer.rest_of_line()))
    }

    fn parse_response_code(lexer: &mut Lexer<'_>) -> Result<ResponseCode> {
        lexer.expect(Token::LBracket)?;
        let keyword = lexer.read_atom_string()?;

        let argument = if lexer.peek() == Some(b' ') {
            lexer.advance();
            Some(String::from_utf8_lossy(lexer.take_until(b']')).into_owned())
        } else {
            None
        };

        lexer.expect(Token::RBracket)?;
        Ok(ResponseCode::from_parts(keyword, argument.as_deref()))
    }

    fn parse_search(lexer: &mut Lexer<'_>) -> Result<Vec<SeqNum>> {
        let mut ids = Vec::new();

        loop {
            match lexer.next_token()? {
                Token::Space => {}
                Token::Number(n) => ids.push(
                    SeqNum::new(n)
                        .ok_or_else(|| Error::parse(lexer.position(), "invalid sequence number 0"))?,
                ),
                Token::Crlf | Token::Eof => break,
                // Trailing extensions such as `(MODSEQ 123)` are ignored.
                _ => {
                    lexer.rest_of_line();
                    break;
                }
            }
        }

        Ok(ids)
    }
}
