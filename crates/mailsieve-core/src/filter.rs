//! Persisted sender blocklist.
//!
//! The blocklist is a JSON array of lower-cased addresses. It is read once
//! when the filter is loaded and rewritten in full after every change.
//! Write failures during `add` and `remove` are logged and the in-memory
//! set stays authoritative for the rest of the session.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::address::{extract_address, normalize};
use crate::error::{MailError, Result};

/// A set of blocked sender addresses backed by a JSON file.
///
/// The filter owns its file; nothing else should write it while the
/// filter is alive.
#[derive(Debug, Clone)]
pub struct SenderFilter {
    path: PathBuf,
    blocked: BTreeSet<String>,
}

impl SenderFilter {
    /// Loads the blocklist from `path`.
    ///
    /// A missing file gives an empty list. An unreadable or malformed file
    /// also gives an empty list, with a warning.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let blocked = match read_blocklist(&path) {
            Ok(Some(blocked)) => {
                debug!(path = %path.display(), count = blocked.len(), "loaded blocklist");
                blocked
            }
            Ok(None) => {
                debug!(path = %path.display(), "no blocklist file yet");
                BTreeSet::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable blocklist");
                BTreeSet::new()
            }
        };

        Self { path, blocked }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks whether the sender of a raw `From` header is blocked.
    #[must_use]
    pub fn is_blocked(&self, raw_sender: &str) -> bool {
        if raw_sender.is_empty() {
            return false;
        }
        self.blocked.contains(&normalize(extract_address(raw_sender)))
    }

    /// Blocks an address and saves the list.
    ///
    /// The list is saved even if the address was already present. Input
    /// that is empty after trimming is ignored.
    pub fn add(&mut self, address: &str) {
        let address = normalize(address);
        if address.is_empty() {
            return;
        }

        info!(%address, "blocking sender");
        self.blocked.insert(address);
        self.persist();
    }

    /// Unblocks an address, saving the list only if it was present.
    ///
    /// Returns whether the address was removed.
    pub fn remove(&mut self, address: &str) -> bool {
        let address = normalize(address);
        if !self.blocked.remove(&address) {
            return false;
        }

        info!(%address, "unblocking sender");
        self.persist();
        true
    }

    /// Blocked addresses in lexicographic order.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        self.blocked.iter().cloned().collect()
    }

    /// Number of blocked addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    /// Returns true if nothing is blocked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// Writes the whole list to disk.
    ///
    /// # Errors
    ///
    /// Returns [`MailError::Persistence`] if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.blocked)
            .map_err(|e| MailError::Persistence(e.to_string()))?;
        fs::write(&self.path, json)
            .map_err(|e| MailError::Persistence(format!("{}: {e}", self.path.display())))
    }

    fn persist(&self) {
        if let Err(e) = self.save() {
            warn!(error = %e, "blocklist not saved; keeping in-memory changes");
        }
    }
}

/// Reads the blocklist file, or `None` if it does not exist.
fn read_blocklist(path: &Path) -> Result<Option<BTreeSet<String>>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(MailError::Persistence(format!("{}: {e}", path.display()))),
    };

    let entries: Vec<String> = serde_json::from_str(&contents)
        .map_err(|e| MailError::Persistence(format!("{}: {e}", path.display())))?;

    Ok(Some(
        entries
            .iter()
            .map(|entry| normalize(entry))
            .filter(|entry| !entry.is_empty())
            .collect(),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;
    use tempfile::TempDir;

    use super::*;

    fn filter_in(dir: &TempDir) -> SenderFilter {
        SenderFilter::load(dir.path().join("blocked_emails.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let filter = filter_in(&dir);
        assert!(filter.is_empty());
        assert!(!filter.path().exists());
    }

    #[test]
    fn test_add_then_remove() {
        let dir = TempDir::new().unwrap();
        let mut filter = filter_in(&dir);

        filter.add("spam@x.com");
        assert!(filter.is_blocked("spam@x.com"));

        assert!(filter.remove("spam@x.com"));
        assert!(!filter.is_blocked("spam@x.com"));
        assert!(!filter.remove("spam@x.com"));
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let dir = TempDir::new().unwrap();
        let mut filter = filter_in(&dir);

        filter.add("Foo@Bar.com");
        assert!(filter.is_blocked(" foo@bar.com "));
        assert!(filter.is_blocked("FOO@BAR.COM"));
        assert!(filter.remove("  FOO@bar.com"));
    }

    #[test]
    fn test_display_name_form_matches_bare() {
        let dir = TempDir::new().unwrap();
        let mut filter = filter_in(&dir);
        filter.add("jane@x.com");

        assert_eq!(
            filter.is_blocked("Jane Doe <jane@x.com>"),
            filter.is_blocked("jane@x.com")
        );
        assert!(filter.is_blocked("\"Jane\" <Jane@X.com>"));
        assert!(!filter.is_blocked("Jane Doe <other@x.com>"));
    }

    #[test]
    fn test_empty_sender_never_blocked() {
        let dir = TempDir::new().unwrap();
        let mut filter = filter_in(&dir);
        filter.add("   ");
        assert!(filter.is_empty());
        assert!(!filter.is_blocked(""));
    }

    #[test]
    fn test_list_sorted_without_duplicates() {
        let dir = TempDir::new().unwrap();
        let mut filter = filter_in(&dir);
        filter.add("zed@z.com");
        filter.add("amy@a.com");
        filter.add("AMY@a.com");
        filter.add("mid@m.com");

        assert_eq!(filter.list(), vec!["amy@a.com", "mid@m.com", "zed@z.com"]);
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut filter = filter_in(&dir);
        filter.add("b@y.com");
        filter.add("a@x.com");

        let reloaded = filter_in(&dir);
        assert_eq!(reloaded.list(), vec!["a@x.com", "b@y.com"]);

        let on_disk = fs::read_to_string(reloaded.path()).unwrap();
        assert_eq!(on_disk, "[\n  \"a@x.com\",\n  \"b@y.com\"\n]");
    }

    #[test]
    fn test_add_existing_still_writes() {
        let dir = TempDir::new().unwrap();
        let mut filter = filter_in(&dir);
        filter.add("a@x.com");
        fs::write(filter.path(), "[]").unwrap();

        filter.add("a@x.com");
        let reloaded = filter_in(&dir);
        assert_eq!(reloaded.list(), vec!["a@x.com"]);
    }

    #[test]
    fn test_remove_missing_does_not_write() {
        let dir = TempDir::new().unwrap();
        let mut filter = filter_in(&dir);
        assert!(!filter.remove("ghost@x.com"));
        assert!(!filter.path().exists());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blocked_emails.json");
        fs::write(&path, "{not json").unwrap();

        let filter = SenderFilter::load(&path);
        assert!(filter.is_empty());
    }

    #[test]
    fn test_loaded_entries_are_normalized() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blocked_emails.json");
        fs::write(&path, r#"[" Spam@X.com", "", "spam@x.com"]"#).unwrap();

        let filter = SenderFilter::load(&path);
        assert_eq!(filter.list(), vec!["spam@x.com"]);
    }

    #[test]
    fn test_write_failure_keeps_memory() {
        let dir = TempDir::new().unwrap();
        let mut filter = SenderFilter::load(dir.path().join("missing").join("list.json"));

        filter.add("a@x.com");
        assert!(filter.is_blocked("a@x.com"));
        assert!(matches!(filter.save(), Err(MailError::Persistence(_))));
    }

    proptest! {
        #[test]
        fn blocked_regardless_of_case_and_padding(
            local in "[a-z0-9._-]{1,12}",
            domain in "[a-z0-9-]{1,10}\\.[a-z]{2,4}",
            pad in " {0,3}",
            upper in any::<bool>(),
        ) {
            let dir = TempDir::new().unwrap();
            let mut filter = filter_in(&dir);
            let address = format!("{local}@{domain}");
            filter.add(&address);

            let cased = if upper { address.to_uppercase() } else { address.clone() };
            let padded = format!("{pad}{cased}{pad}");
            let display = format!("Someone <{cased}>");
            prop_assert!(filter.is_blocked(&padded));
            prop_assert!(filter.is_blocked(&display));
            prop_assert_eq!(filter.list(), vec![address]);
        }
    }
}
