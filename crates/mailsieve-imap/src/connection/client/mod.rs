//! Type-state IMAP client connection.
//!
//! Uses the type-state pattern to enforce valid state transitions at compile time.
//! The IMAP connection states are:
//!
//! - `NotAuthenticated`: Initial state after connection
//! - `Authenticated`: After successful LOGIN
//! - `Selected`: After successful SELECT
//!
//! Each state only exposes methods that are valid for that state.

#![allow(clippy::missing_errors_doc)]

mod authenticated;
mod not_authenticated;
mod selected;
mod states;

use std::marker::PhantomData;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{trace, warn};

pub use self::states::{Authenticated, NotAuthenticated, Selected};
use super::framed::{FramedStream, ResponseAccumulator};
use crate::command::{Command, TagGenerator};
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::{ResponseCode, Status};
use crate::{Error, Result};

/// Outcome of one tagged command exchange.
pub(crate) struct Completion {
    /// Untagged data the server sent while the command ran.
    pub untagged: Vec<UntaggedResponse>,
    /// Response code attached to the tagged OK.
    pub code: Option<ResponseCode>,
}

/// IMAP client connection with type-state.
///
/// The type parameter `State` tracks the connection state at compile time.
pub struct Client<S, State> {
    pub(crate) stream: FramedStream<S>,
    pub(crate) tag_gen: TagGenerator,
    pub(crate) capabilities: Vec<String>,
    pub(crate) timeout: Option<Duration>,
    _state: PhantomData<State>,
}

// Manual Debug implementation since FramedStream doesn't implement Debug
impl<S, State> std::fmt::Debug for Client<S, State> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("tag_gen", &self.tag_gen)
            .field("capabilities", &self.capabilities)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// Shared implementation for all states.
impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Moves the connection into another protocol state.
    pub(crate) fn transition<Next>(self) -> Client<S, Next> {
        Client {
            stream: self.stream,
            tag_gen: self.tag_gen,
            capabilities: self.capabilities,
            timeout: self.timeout,
            _state: PhantomData,
        }
    }

    /// Returns the server capabilities, upper-cased.
    #[must_use]
    pub fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    /// Limits how long a single command may wait for its tagged reply.
    ///
    /// `None` waits indefinitely.
    pub const fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Logs out and closes the connection.
    ///
    /// The server's `BYE` is expected here and is not treated as an error.
    pub async fn logout(mut self) -> Result<()> {
        self.execute(&Command::Logout).await?;
        // Some servers drop the socket right after the tagged OK.
        if let Err(e) = self.stream.shutdown().await {
            trace!(error = %e, "shutdown after LOGOUT failed");
        }
        Ok(())
    }

    /// Sends a command and reads every response up to its tagged completion.
    ///
    /// Untagged responses that fail to parse are logged and dropped; a
    /// tagged `NO`, `BAD` or `BYE` becomes an error.
    pub(crate) async fn execute(&mut self, command: &Command) -> Result<Completion> {
        let tag = self.tag_gen.next();
        trace!(%tag, command = command.name(), "sending command");
        self.stream.write_command(&command.serialize(&tag)).await?;

        let timeout = self.timeout;
        let raw = match timeout {
            Some(limit) => tokio::time::timeout(limit, self.read_until_tagged(&tag))
                .await
                .map_err(|_| Error::Timeout(limit))??,
            None => self.read_until_tagged(&tag).await?,
        };

        let mut untagged = Vec::with_capacity(raw.len());
        let mut completion = None;

        for bytes in &raw {
            match ResponseParser::parse(bytes) {
                Ok(Response::Tagged {
                    tag: resp_tag,
                    status,
                    code,
                    text,
                }) if resp_tag.as_str() == tag => completion = Some((status, code, text)),
                Ok(Response::Untagged(UntaggedResponse::Capability(caps))) => {
                    self.capabilities.clone_from(&caps);
                    untagged.push(UntaggedResponse::Capability(caps));
                }
                Ok(Response::Untagged(response)) => untagged.push(response),
                Ok(other) => trace!(?other, "ignoring unexpected response"),
                Err(e) => warn!(
                    command = command.name(),
                    error = %e,
                    "dropping unparsable response"
                ),
            }
        }

        let Some((status, code, text)) = completion else {
            return Err(Error::Protocol(format!(
                "missing tagged response for {}",
                command.name()
            )));
        };

        if let Some(ResponseCode::Capability(caps)) = &code {
            self.capabilities.clone_from(caps);
        }

        match status {
            Status::Ok | Status::PreAuth => Ok(Completion { untagged, code }),
            Status::No => Err(Error::No(text)),
            Status::Bad => Err(Error::Bad(text)),
            Status::Bye => Err(Error::Bye(text)),
        }
    }

    /// Reads responses until we get a tagged response matching our tag.
    async fn read_until_tagged(&mut self, tag: &str) -> Result<Vec<Vec<u8>>> {
        let mut accumulator = ResponseAccumulator::new(tag);
        accumulator.read_until_tagged(&mut self.stream).await
    }
}
