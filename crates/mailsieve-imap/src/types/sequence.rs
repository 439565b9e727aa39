//! Sequence sets for message ranges.

use super::SeqNum;

/// Sequence set for specifying message ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceSet {
    /// Single sequence number.
    Single(SeqNum),
    /// Range of sequence numbers (inclusive).
    Range(SeqNum, SeqNum),
    /// All messages (*).
    All,
    /// Multiple sequence specifications.
    Set(Vec<Self>),
}

impl SequenceSet {
    /// Creates a sequence set from a single number.
    #[must_use]
    pub fn single(n: u32) -> Option<Self> {
        SeqNum::new(n).map(Self::Single)
    }

    /// Creates a range sequence set.
    #[must_use]
    pub fn range(start: u32, end: u32) -> Option<Self> {
        Some(Self::Range(SeqNum::new(start)?, SeqNum::new(end)?))
    }

    /// Returns true if `seq` is covered by this set.
    ///
    /// `*` matches every sequence number.
    #[must_use]
    pub fn contains(&self, seq: SeqNum) -> bool {
        match self {
            Self::Single(n) => *n == seq,
            Self::Range(start, end) => {
                let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
                *lo <= seq && seq <= *hi
            }
            Self::All => true,
            Self::Set(items) => items.iter().any(|item| item.contains(seq)),
        }
    }
}

impl From<SeqNum> for SequenceSet {
    fn from(seq: SeqNum) -> Self {
        Self::Single(seq)
    }
}

impl std::fmt::Display for SequenceSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single(n) => write!(f, "{n}"),
            Self::Range(start, end) => write!(f, "{start}:{end}"),
            Self::All => write!(f, "*"),
            Self::Set(items) => {
                let s: Vec<_> = items.iter().map(ToString::to_string).collect();
                write!(f, "{}", s.join(","))
            }
        }
    }
}
