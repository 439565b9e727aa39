//! Response statuses, response codes and mailbox status.

use super::SeqNum;

/// Response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Command completed successfully.
    Ok,
    /// Command failed.
    No,
    /// Command was malformed or not allowed in the current state.
    Bad,
    /// Connection is already authenticated (greeting only).
    PreAuth,
    /// Server is closing the connection.
    Bye,
}

impl Status {
    /// Parses a status keyword, case-insensitively.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "OK" => Some(Self::Ok),
            "NO" => Some(Self::No),
            "BAD" => Some(Self::Bad),
            "PREAUTH" => Some(Self::PreAuth),
            "BYE" => Some(Self::Bye),
            _ => None,
        }
    }
}

/// Bracketed response code attached to a status response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseCode {
    /// ALERT: message that must be shown to the user.
    Alert,
    /// CAPABILITY list sent inline with a greeting or login.
    Capability(Vec<String>),
    /// READ-ONLY: mailbox selected as read-only.
    ReadOnly,
    /// READ-WRITE: mailbox selected as read-write.
    ReadWrite,
    /// UIDNEXT: next UID to be assigned.
    UidNext(u32),
    /// UIDVALIDITY: unique identifier validity value.
    UidValidity(u32),
    /// UNSEEN: first unseen message sequence number.
    Unseen(SeqNum),
    /// Any other code, with its raw argument text.
    Other(String, Option<String>),
}

impl ResponseCode {
    /// Builds a response code from its keyword and optional argument text.
    #[must_use]
    pub fn from_parts(keyword: &str, argument: Option<&str>) -> Self {
        let number = || argument.and_then(|a| a.trim().parse::<u32>().ok());
        match keyword.to_ascii_uppercase().as_str() {
            "ALERT" => Self::Alert,
            "CAPABILITY" => Self::Capability(
                argument
                    .unwrap_or_default()
                    .split_ascii_whitespace()
                    .map(str::to_ascii_uppercase)
                    .collect(),
            ),
            "READ-ONLY" => Self::ReadOnly,
            "READ-WRITE" => Self::ReadWrite,
            "UIDNEXT" if number().is_some() => Self::UidNext(number().unwrap_or_default()),
            "UIDVALIDITY" if number().is_some() => {
                Self::UidValidity(number().unwrap_or_default())
            }
            "UNSEEN" => match number().and_then(SeqNum::new) {
                Some(seq) => Self::Unseen(seq),
                None => Self::Other(keyword.to_string(), argument.map(str::to_string)),
            },
            _ => Self::Other(keyword.to_string(), argument.map(str::to_string)),
        }
    }
}

/// Mailbox status information collected from a SELECT.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailboxStatus {
    /// Number of messages in the mailbox.
    pub exists: u32,
    /// Number of recent messages.
    pub recent: u32,
    /// First unseen message sequence number.
    pub unseen: Option<SeqNum>,
    /// Next UID to be assigned.
    pub uid_next: Option<u32>,
    /// UIDVALIDITY value.
    pub uid_validity: Option<u32>,
    /// Whether the mailbox was opened read-only.
    pub read_only: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_response_code_numbers() {
        assert_eq!(
            ResponseCode::from_parts("UIDVALIDITY", Some("3857529045")),
            ResponseCode::UidValidity(3_857_529_045)
        );
        assert_eq!(
            ResponseCode::from_parts("uidnext", Some("4392")),
            ResponseCode::UidNext(4392)
        );
        assert_eq!(
            ResponseCode::from_parts("UNSEEN", Some("12")),
            ResponseCode::Unseen(SeqNum::new(12).unwrap())
        );
    }

    #[test]
    fn test_response_code_capability() {
        let code = ResponseCode::from_parts("CAPABILITY", Some("IMAP4rev1 idle"));
        assert_eq!(
            code,
            ResponseCode::Capability(vec!["IMAP4REV1".to_string(), "IDLE".to_string()])
        );
    }

    #[test]
    fn test_response_code_unknown() {
        assert_eq!(
            ResponseCode::from_parts("UIDVALIDITY", Some("garbage")),
            ResponseCode::Other("UIDVALIDITY".to_string(), Some("garbage".to_string()))
        );
        assert_eq!(ResponseCode::from_parts("read-only", None), ResponseCode::ReadOnly);
    }
}
