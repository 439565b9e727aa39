//! Implementation for the selected state.

use tokio::io::{AsyncRead, AsyncWrite};

use super::Client;
use super::states::Selected;
use crate::Result;
use crate::command::{Command, FetchItems, SearchCriteria};
use crate::parser::{FetchItem, UntaggedResponse};
use crate::types::{MailboxStatus, SeqNum, SequenceSet};

impl<S> Client<S, Selected>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Selects another mailbox, or re-selects the current one to refresh
    /// its status.
    ///
    /// On failure the connection is dropped along with `self`.
    pub async fn select(self, mailbox: &str) -> Result<(Self, MailboxStatus)> {
        self.select_mailbox(mailbox).await
    }

    /// Searches for messages matching the given criteria.
    ///
    /// Returns sequence numbers in the order the server listed them.
    pub async fn search(&mut self, criteria: &SearchCriteria) -> Result<Vec<SeqNum>> {
        let completion = self
            .execute(&Command::Search {
                criteria: criteria.clone(),
            })
            .await?;

        Ok(completion
            .untagged
            .into_iter()
            .filter_map(|response| match response {
                UntaggedResponse::Search(ids) => Some(ids),
                _ => None,
            })
            .flatten()
            .collect())
    }

    /// Fetches message data for the given sequence set.
    ///
    /// Returns a vector of (sequence number, fetch items) pairs. Unsolicited
    /// FETCH responses for other messages (flag updates) are included as
    /// sent; callers filter by sequence number.
    pub async fn fetch(
        &mut self,
        sequence: &SequenceSet,
        items: FetchItems,
    ) -> Result<Vec<(SeqNum, Vec<FetchItem>)>> {
        let completion = self
            .execute(&Command::Fetch {
                sequence: sequence.clone(),
                items,
            })
            .await?;

        Ok(completion
            .untagged
            .into_iter()
            .filter_map(|response| match response {
                UntaggedResponse::Fetch { seq, items } => Some((seq, items)),
                _ => None,
            })
            .collect())
    }
}
