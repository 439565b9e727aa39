//! Dates as used by SEARCH criteria.

use chrono::NaiveDate;

/// A calendar date in the IMAP `date` syntax (`14-Oct-2025`).
///
/// SEARCH date keys compare against the internal date of a message at day
/// resolution, disregarding time and timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImapDate(NaiveDate);

impl ImapDate {
    /// Wraps a calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the wrapped calendar date.
    #[must_use]
    pub const fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for ImapDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl std::fmt::Display for ImapDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%d-%b-%Y"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_format() {
        let date = ImapDate::new(NaiveDate::from_ymd_opt(2025, 10, 14).unwrap());
        assert_eq!(date.to_string(), "14-Oct-2025");
    }

    #[test]
    fn test_display_pads_day() {
        let date = ImapDate::from(NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
        assert_eq!(date.to_string(), "03-Feb-2024");
    }
}
