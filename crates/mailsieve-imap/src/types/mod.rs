//! Core IMAP types.
//!
//! Identifiers, sequence sets, search dates and server status values used
//! by the command builder, the parser and the client.

#![allow(clippy::missing_const_for_fn)]

mod date;
mod identifiers;
mod sequence;
mod status;

pub use date::ImapDate;
pub use identifiers::{SeqNum, Tag};
pub use sequence::SequenceSet;
pub use status::{MailboxStatus, ResponseCode, Status};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_num_new() {
        assert!(SeqNum::new(0).is_none());
        assert!(SeqNum::new(1).is_some());
        assert_eq!(SeqNum::new(42).unwrap().get(), 42);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(Status::parse("ok"), Some(Status::Ok));
        assert_eq!(Status::parse("NO"), Some(Status::No));
        assert_eq!(Status::parse("Bad"), Some(Status::Bad));
        assert_eq!(Status::parse("FETCH"), None);
    }

    #[test]
    fn test_sequence_set_display() {
        assert_eq!(SequenceSet::single(1).unwrap().to_string(), "1");
        assert_eq!(SequenceSet::range(1, 10).unwrap().to_string(), "1:10");
        assert_eq!(SequenceSet::All.to_string(), "*");
    }
}
