//! Mailbox client: fetches recent INBOX messages and applies the sender
//! filter.
//!
//! The client owns at most one IMAP session. Connection failures leave it
//! disconnected; a rejected search keeps the session for the next call.

use chrono::{Days, Local, NaiveDate};
use mailsieve_imap::{
    Authenticated, Client, FetchAttribute, FetchItem, FetchItems, ImapDate, ImapStream,
    MailboxStatus, SearchCriteria, Selected, SeqNum, SequenceSet,
};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

use crate::error::{MailError, Result};
use crate::filter::SenderFilter;
use crate::message::Message;

const INBOX: &str = "INBOX";

/// Live session in one of the two logged-in states.
enum Session<S> {
    Authenticated(Client<S, Authenticated>),
    Selected(Client<S, Selected>),
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    async fn select_inbox(self) -> mailsieve_imap::Result<(Client<S, Selected>, MailboxStatus)> {
        match self {
            Self::Authenticated(client) => client.select(INBOX).await,
            Self::Selected(client) => client.select(INBOX).await,
        }
    }

    async fn logout(self) -> mailsieve_imap::Result<()> {
        match self {
            Self::Authenticated(client) => client.logout().await,
            Self::Selected(client) => client.logout().await,
        }
    }
}

/// First day included when looking back `days` days from `today`.
#[must_use]
pub fn since_date(today: NaiveDate, days: u32) -> NaiveDate {
    today
        .checked_sub_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MIN)
}

/// IMAP mailbox client holding an optional logged-in session.
pub struct MailboxClient<S = ImapStream> {
    config: mailsieve_imap::Config,
    session: Option<Session<S>>,
}

impl<S> std::fmt::Debug for MailboxClient<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailboxClient")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("connected", &self.session.is_some())
            .finish()
    }
}

impl<S> MailboxClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a disconnected client.
    #[must_use]
    pub const fn new(config: mailsieve_imap::Config) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Returns true while a logged-in session is held.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Logs in over an already established stream.
    ///
    /// Any existing session is closed first.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Connection`] if the greeting or login fails or
    /// times out. The client is left disconnected.
    pub async fn attach(&mut self, stream: S, address: &str, credential: &str) -> Result<()> {
        self.disconnect().await;

        let limit = self.config.io_timeout;
        let login = async {
            let mut client = Client::from_stream(stream).await?;
            client.set_timeout(Some(limit));
            client.login(address, credential).await
        };

        let client = tokio::time::timeout(limit, login)
            .await
            .map_err(|_| MailError::Connection(mailsieve_imap::Error::Timeout(limit).to_string()))?
            .map_err(|e| MailError::Connection(e.to_string()))?;

        info!(host = %self.config.host, user = %address, "logged in");
        debug!(capabilities = ?client.capabilities(), "server capabilities");
        self.session = Some(Session::Authenticated(client));
        Ok(())
    }

    /// Logs out if a session is open. Safe to call repeatedly.
    pub async fn disconnect(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        match session.logout().await {
            Ok(()) => info!(host = %self.config.host, "logged out"),
            Err(e) => debug!(error = %e, "logout failed"),
        }
    }

    /// Fetches INBOX messages from the last `window_days` days, newest
    /// first, without blocked senders.
    ///
    /// # Errors
    ///
    /// See [`MailboxClient::fetch_since`].
    pub async fn fetch_recent(
        &mut self,
        filter: &SenderFilter,
        window_days: u32,
    ) -> Result<Vec<Message>> {
        let today = Local::now().date_naive();
        self.fetch_since(filter, since_date(today, window_days)).await
    }

    /// Fetches INBOX messages dated on or after `since`, newest first,
    /// without blocked senders.
    ///
    /// Messages that fail to fetch or parse are logged and skipped. If the
    /// connection drops partway through, the messages read so far are
    /// returned and the client is left disconnected.
    ///
    /// # Errors
    ///
    /// - [`MailError::Connection`] without a session or when `SELECT` fails
    ///   (the session is dropped).
    /// - [`MailError::Search`] when the server refuses the search.
    pub async fn fetch_since(
        &mut self,
        filter: &SenderFilter,
        since: NaiveDate,
    ) -> Result<Vec<Message>> {
        let Some(session) = self.session.take() else {
            return Err(MailError::Connection("not connected".to_string()));
        };

        let (mut client, status) = session
            .select_inbox()
            .await
            .map_err(|e| MailError::Connection(e.to_string()))?;
        debug!(exists = status.exists, "INBOX selected");

        let criteria = SearchCriteria::Since(ImapDate::new(since));
        let ids = match client.search(&criteria).await {
            Ok(ids) => ids,
            Err(e) => {
                if e.is_rejection() {
                    self.session = Some(Session::Selected(client));
                }
                return Err(MailError::Search(e.to_string()));
            }
        };
        debug!(count = ids.len(), %since, "search complete");

        let mut messages = Vec::with_capacity(ids.len());
        for &id in ids.iter().rev() {
            let fetched = match client
                .fetch(
                    &SequenceSet::from(id),
                    FetchItems::single(FetchAttribute::full_body()),
                )
                .await
            {
                Ok(fetched) => fetched,
                Err(e) if e.is_rejection() => {
                    warn!(id = id.get(), error = %e, "fetch rejected, skipping message");
                    continue;
                }
                Err(e) => {
                    warn!(
                        error = %e,
                        fetched = messages.len(),
                        "connection lost while fetching"
                    );
                    return Ok(messages);
                }
            };

            match parse_fetched(id, &fetched) {
                Ok(message) if filter.is_blocked(&message.sender) => {
                    debug!(id = id.get(), "dropping blocked sender");
                }
                Ok(message) => messages.push(message),
                Err(e) => warn!(error = %e, "skipping message"),
            }
        }

        info!(count = messages.len(), "messages fetched");
        self.session = Some(Session::Selected(client));
        Ok(messages)
    }
}

impl MailboxClient<ImapStream> {
    /// Connects to the configured server with its security mode and logs in.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Connection`] on any network, TLS or login
    /// failure. The client is left disconnected.
    pub async fn connect(&mut self, address: &str, credential: &str) -> Result<()> {
        self.disconnect().await;
        debug!(
            host = %self.config.host,
            port = self.config.port,
            security = ?self.config.security,
            "connecting"
        );
        let stream = mailsieve_imap::connection::connect(&self.config)
            .await
            .map_err(|e| MailError::Connection(e.to_string()))?;
        self.attach(stream, address, credential).await
    }
}

/// Picks the full message for `id` out of a FETCH reply and normalizes it.
fn parse_fetched(id: SeqNum, fetched: &[(SeqNum, Vec<FetchItem>)]) -> Result<Message> {
    let raw = fetched
        .iter()
        .filter(|(seq, _)| *seq == id)
        .flat_map(|(_, items)| items)
        .find_map(FetchItem::full_message)
        .ok_or_else(|| MailError::MessageParse {
            id: id.get(),
            reason: "no message body in FETCH response".to_string(),
        })?;

    Message::from_raw(raw).map_err(|e| MailError::MessageParse {
        id: id.get(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;
    use tokio_test::io::{Builder, Mock};

    use super::*;

    const GREETING: &[u8] = b"* OK [CAPABILITY IMAP4rev1] ready\r\n";

    fn client() -> MailboxClient<Mock> {
        MailboxClient::new(mailsieve_imap::Config::new("imap.example.com"))
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_since_date() {
        assert_eq!(since_date(day(2025, 10, 14), 1), day(2025, 10, 13));
        assert_eq!(since_date(day(2025, 3, 1), 1), day(2025, 2, 28));
        assert_eq!(since_date(day(2025, 10, 14), 0), day(2025, 10, 14));
    }

    #[tokio::test]
    async fn test_fetch_requires_session() {
        let dir = TempDir::new().unwrap();
        let filter = SenderFilter::load(dir.path().join("blocked.json"));
        let mut client = client();

        let result = client.fetch_since(&filter, day(2025, 10, 13)).await;
        assert!(matches!(result, Err(MailError::Connection(_))));
    }

    #[tokio::test]
    async fn test_attach_login_rejected() {
        let mock = Builder::new()
            .read(GREETING)
            .write(b"A0000 LOGIN me@x.com wrong\r\n")
            .read(b"A0000 NO [AUTHENTICATIONFAILED] Invalid credentials\r\n")
            .build();
        let mut client = client();

        let result = client.attach(mock, "me@x.com", "wrong").await;
        assert!(matches!(result, Err(MailError::Connection(reason)) if reason.contains("Invalid credentials")));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_attach_refuses_non_ascii_password() {
        let mock = Builder::new().read(GREETING).build();
        let mut client = client();

        let result = client.attach(mock, "me@x.com", "s\u{e9}cret").await;
        assert!(matches!(result, Err(MailError::Connection(reason)) if reason.contains("password")));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_attach_and_disconnect() {
        let mock = Builder::new()
            .read(GREETING)
            .write(b"A0000 LOGIN me@x.com secret\r\n")
            .read(b"A0000 OK LOGIN completed\r\n")
            .write(b"A0001 LOGOUT\r\n")
            .read(b"* BYE bye\r\nA0001 OK LOGOUT completed\r\n")
            .build();
        let mut client = client();

        client.attach(mock, "me@x.com", "secret").await.unwrap();
        assert!(client.is_connected());

        client.disconnect().await;
        assert!(!client.is_connected());
        client.disconnect().await;
    }

    #[tokio::test]
    async fn test_select_failure_drops_session() {
        let mock = Builder::new()
            .read(GREETING)
            .write(b"A0000 LOGIN u p\r\n")
            .read(b"A0000 OK done\r\n")
            .write(b"A0001 SELECT INBOX\r\n")
            .read(b"A0001 NO mailbox unavailable\r\n")
            .build();
        let dir = TempDir::new().unwrap();
        let filter = SenderFilter::load(dir.path().join("blocked.json"));
        let mut client = client();
        client.attach(mock, "u", "p").await.unwrap();

        let result = client.fetch_since(&filter, day(2025, 10, 13)).await;
        assert!(matches!(result, Err(MailError::Connection(_))));
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_fetch_newest_first() {
        let mock = Builder::new()
            .read(GREETING)
            .write(b"A0000 LOGIN u p\r\n")
            .read(b"A0000 OK done\r\n")
            .write(b"A0001 SELECT INBOX\r\n")
            .read(b"* 2 EXISTS\r\nA0001 OK [READ-WRITE] done\r\n")
            .write(b"A0002 SEARCH SINCE 13-Oct-2025\r\n")
            .read(b"* SEARCH 1 2\r\nA0002 OK done\r\n")
            .write(b"A0003 FETCH 2 BODY.PEEK[]\r\n")
            .read(b"* 2 FETCH (BODY[] {29}\r\nFrom: b@y.com\r\nSubject: two\r\n)\r\n")
            .read(b"A0003 OK done\r\n")
            .write(b"A0004 FETCH 1 BODY.PEEK[]\r\n")
            .read(b"* 1 FETCH (BODY[] {29}\r\nFrom: a@x.com\r\nSubject: one\r\n)\r\n")
            .read(b"A0004 OK done\r\n")
            .build();
        let dir = TempDir::new().unwrap();
        let filter = SenderFilter::load(dir.path().join("blocked.json"));
        let mut client = client();
        client.attach(mock, "u", "p").await.unwrap();

        let messages = client.fetch_since(&filter, day(2025, 10, 13)).await.unwrap();
        let subjects: Vec<_> = messages.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["two", "one"]);
        assert_eq!(messages[0].sender, "b@y.com");
        assert!(client.is_connected());
    }

    #[test]
    fn test_parse_fetched_missing_body() {
        let id = SeqNum::new(3).unwrap();
        let other = SeqNum::new(4).unwrap();
        let fetched = vec![(
            other,
            vec![FetchItem::Body {
                section: None,
                origin: None,
                data: Some(b"Subject: x\r\n\r\n".to_vec()),
            }],
        )];

        let result = parse_fetched(id, &fetched);
        assert!(matches!(result, Err(MailError::MessageParse { id: 3, .. })));
    }
}
