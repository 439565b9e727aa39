//! Display formatting for message lists and detail views.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::message::Message;

/// Default subject width in list lines.
pub const SUBJECT_WIDTH: usize = 50;

const SEPARATOR_WIDTH: usize = 80;

/// Sender display name: the text before the first `<`, trimmed.
///
/// An empty header gives `"Unknown Sender"`; a header that starts with
/// `<` is returned unchanged.
#[must_use]
pub fn sender_name(raw_from: &str) -> String {
    if raw_from.is_empty() {
        return "Unknown Sender".to_string();
    }
    match raw_from.find('<') {
        Some(0) => raw_from.to_string(),
        Some(end) => raw_from[..end].trim().to_string(),
        None => raw_from.trim().to_string(),
    }
}

/// Shortens a subject to at most `max_chars` characters, ending in `...`
/// when cut.
#[must_use]
pub fn truncate_subject(subject: &str, max_chars: usize) -> String {
    if subject.is_empty() {
        return "No Subject".to_string();
    }
    if subject.chars().count() <= max_chars {
        return subject.to_string();
    }
    let mut cut: String = subject.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

/// Parses an RFC 2822 date, tolerating a trailing `(comment)`.
#[must_use]
pub fn parse_date(raw_date: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw_date.trim();
    let without_comment = match trimmed.rfind('(') {
        Some(start) if trimmed.ends_with(')') => trimmed[..start].trim_end(),
        _ => trimmed,
    };
    DateTime::parse_from_rfc2822(without_comment).ok()
}

/// Short date for list lines.
///
/// Messages from `today` show the time (`"9:05 AM"`), older ones the
/// month and day (`"Oct 03"`). The sender's own timezone is used.
#[must_use]
pub fn display_date(raw_date: &str, today: NaiveDate) -> String {
    let Some(date) = parse_date(raw_date) else {
        return "Unknown Date".to_string();
    };

    if date.date_naive() == today {
        let time = date.format("%I:%M %p").to_string();
        time.trim_start_matches('0').to_string()
    } else {
        date.format("%b %d").to_string()
    }
}

/// One list line: `"{name} - {subject} - {date}"`.
#[must_use]
pub fn list_line(message: &Message, today: NaiveDate) -> String {
    format!(
        "{} - {} - {}",
        sender_name(&message.sender),
        truncate_subject(&message.subject, SUBJECT_WIDTH),
        display_date(&message.date, today)
    )
}

/// Full detail view of a message.
#[must_use]
pub fn detail_view(message: &Message) -> String {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    format!(
        "Subject: {}\nFrom: {}\nDate: {}\n{separator}\n\n{}\n\n{separator}",
        message.subject, message.sender, message.date, message.body
    )
}
