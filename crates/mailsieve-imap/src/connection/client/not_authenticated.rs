//! Implementation for the not-authenticated state.

use std::marker::PhantomData;

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::Client;
use super::states::{Authenticated, NotAuthenticated};
use crate::command::{Command, TagGenerator, is_quotable};
use crate::connection::framed::FramedStream;
use crate::parser::{Response, ResponseParser, UntaggedResponse};
use crate::types::ResponseCode;
use crate::{Error, Result};

impl<S> Client<S, NotAuthenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new client from a connected stream.
    ///
    /// Reads the server greeting and any capabilities it advertises.
    /// A `BYE` greeting is returned as [`Error::Bye`].
    pub async fn from_stream(stream: S) -> Result<Self> {
        let mut framed = FramedStream::new(stream);

        let greeting = framed.read_response().await?;
        let response = ResponseParser::parse(&greeting)?;

        let mut capabilities = Vec::new();
        match response {
            Response::Untagged(
                UntaggedResponse::Ok { code, text } | UntaggedResponse::PreAuth { code, text },
            ) => {
                debug!(greeting = %text, "server greeting");
                if let Some(ResponseCode::Capability(caps)) = code {
                    capabilities = caps;
                }
            }
            Response::Untagged(UntaggedResponse::Bye { text, .. }) => {
                return Err(Error::Bye(text));
            }
            other => {
                return Err(Error::Protocol(format!("unexpected greeting: {other:?}")));
            }
        }

        Ok(Self {
            stream: framed,
            tag_gen: TagGenerator::default(),
            capabilities,
            timeout: None,
            _state: PhantomData,
        })
    }

    /// Authenticates with the server using LOGIN.
    ///
    /// Consumes self and returns an authenticated client on success.
    /// Credentials outside 7-bit text, or containing CR or LF, are refused
    /// with [`Error::InvalidArgument`] before anything is sent.
    pub async fn login(
        mut self,
        username: &str,
        password: &str,
    ) -> Result<Client<S, Authenticated>> {
        if !is_quotable(username) {
            return Err(Error::InvalidArgument(
                "username must be ASCII without line breaks for LOGIN".to_string(),
            ));
        }
        if !is_quotable(password) {
            return Err(Error::InvalidArgument(
                "password must be ASCII without line breaks for LOGIN".to_string(),
            ));
        }

        self.execute(&Command::Login {
            username: username.to_string(),
            password: password.to_string(),
        })
        .await?;

        debug!(user = %username, "logged in");
        Ok(self.transition())
    }
}
