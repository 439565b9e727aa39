//! Implementation for the authenticated state.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::{Authenticated, Selected};
use crate::Result;
use crate::command::Command;
use crate::parser::UntaggedResponse;
use crate::types::{MailboxStatus, ResponseCode};

impl<S> Client<S, Authenticated>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Selects a mailbox for read-write access.
    ///
    /// Consumes self and returns a selected client on success. On failure
    /// the connection is dropped along with `self`.
    pub async fn select(self, mailbox: &str) -> Result<(Client<S, Selected>, MailboxStatus)> {
        self.select_mailbox(mailbox).await
    }
}

impl<S, State> Client<S, State>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Runs SELECT from either the authenticated or the selected state.
    pub(crate) async fn select_mailbox(
        mut self,
        mailbox: &str,
    ) -> Result<(Client<S, Selected>, MailboxStatus)> {
        let completion = self
            .execute(&Command::Select {
                mailbox: mailbox.to_string(),
            })
            .await?;

        let mut status = parse_mailbox_status(&completion.untagged);
        status.read_only = matches!(completion.code, Some(ResponseCode::ReadOnly));

        Ok((self.transition(), status))
    }
}

/// Collects mailbox status from the untagged SELECT responses.
fn parse_mailbox_status(responses: &[UntaggedResponse]) -> MailboxStatus {
    let mut status = MailboxStatus::default();

    for response in responses {
        match response {
            UntaggedResponse::Exists(n) => status.exists = *n,
            UntaggedResponse::Recent(n) => status.recent = *n,
            UntaggedResponse::Ok {
                code: Some(code), ..
            } => match code {
                ResponseCode::Unseen(seq) => status.unseen = Some(*seq),
                ResponseCode::UidNext(n) => status.uid_next = Some(*n),
                ResponseCode::UidValidity(n) => status.uid_validity = Some(*n),
                _ => {}
            },
            _ => {}
        }
    }

    status
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio_test::io::Builder;

    use super::*;
    use crate::Error;

    #[test]
    fn test_parse_mailbox_status_ignores_other_data() {
        let responses = vec![
            UntaggedResponse::Flags(vec!["\\Seen".to_string()]),
            UntaggedResponse::Exists(3),
            UntaggedResponse::Ok {
                code: Some(ResponseCode::Alert),
                text: "maintenance tonight".to_string(),
            },
            UntaggedResponse::Ok {
                code: None,
                text: "hello".to_string(),
            },
        ];
        let status = parse_mailbox_status(&responses);
        assert_eq!(status.exists, 3);
        assert_eq!(status.recent, 0);
        assert!(status.uid_validity.is_none());
    }

    #[tokio::test]
    async fn test_select_read_only() {
        let mock = Builder::new()
            .read(b"* PREAUTH ready\r\n")
            .write(b"A0000 LOGIN u p\r\n")
            .read(b"A0000 OK done\r\n")
            .write(b"A0001 SELECT Archive\r\n")
            .read(b"* 0 EXISTS\r\n")
            .read(b"A0001 OK [READ-ONLY] done\r\n")
            .build();

        let client = Client::from_stream(mock).await.unwrap();
        let client = client.login("u", "p").await.unwrap();
        let (_client, status) = client.select("Archive").await.unwrap();
        assert!(status.read_only);
        assert_eq!(status.exists, 0);
    }

    #[tokio::test]
    async fn test_select_missing_mailbox() {
        let mock = Builder::new()
            .read(b"* OK ready\r\n")
            .write(b"A0000 LOGIN u p\r\n")
            .read(b"A0000 OK done\r\n")
            .write(b"A0001 SELECT Nope\r\n")
            .read(b"A0001 NO [NONEXISTENT] Unknown Mailbox\r\n")
            .build();

        let client = Client::from_stream(mock).await.unwrap();
        let client = client.login("u", "p").await.unwrap();
        let result = client.select("Nope").await;
        assert!(matches!(result, Err(Error::No(_))));
    }
}
