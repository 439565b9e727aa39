//! Sender address helpers.

/// Extracts the bare address from a `From` header value.
///
/// The first non-empty `<...>` pair wins (`"Jane <jane@x.com>"` →
/// `"jane@x.com"`); without one the whole trimmed value is returned.
/// Case is preserved.
#[must_use]
pub fn extract_address(raw: &str) -> &str {
    let mut rest = raw;
    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('>') else {
            break;
        };
        if close > 0 {
            return after[..close].trim();
        }
        rest = &after[close + 1..];
    }
    raw.trim()
}

/// Normalizes an address for blocklist storage and lookup.
#[must_use]
pub fn normalize(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Checks that an address has the `local@domain.tld` shape.
///
/// The local part allows letters, digits and `._%+-`; the domain allows
/// letters, digits, `.` and `-`, and must end in a dot followed by at
/// least two letters.
#[must_use]
pub fn is_valid_email(address: &str) -> bool {
    let Some((local, domain)) = address.trim().split_once('@') else {
        return false;
    };

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "._%+-".contains(c));

    let domain_ok = domain.rsplit_once('.').is_some_and(|(host, tld)| {
        !host.is_empty()
            && host
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
            && tld.len() >= 2
            && tld.chars().all(|c| c.is_ascii_alphabetic())
    });

    local_ok && domain_ok
}
