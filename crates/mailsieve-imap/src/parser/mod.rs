//! IMAP protocol parser.
//!
//! A sans-I/O parser for the server responses the client reads. It is
//! split into a lexer that tokenizes raw bytes (atoms, quoted strings,
//! literals, numbers) and a response parser that builds structured
//! responses from those tokens.
//!
//! # Example
//!
//! ```
//! use mailsieve_imap::parser::{Response, ResponseParser, UntaggedResponse};
//!
//! let response = ResponseParser::parse(b"* 3 EXISTS\r\n").unwrap();
//! assert_eq!(response, Response::Untagged(UntaggedResponse::Exists(3)));
//! ```

mod fetch;
mod lexer;
mod response;

pub use fetch::FetchItem;
pub use response::{Response, ResponseParser, UntaggedResponse};
