//! Configuration from environment variables.
//!
//! | Variable              | Default                      |
//! |-----------------------|------------------------------|
//! | `EMAIL`               | required to connect          |
//! | `PASSWORD`            | required to connect          |
//! | `IMAP_SERVER`         | `imap.mail.yahoo.com`        |
//! | `IMAP_SECURITY`       | `tls` (`none` for plaintext) |
//! | `IMAP_PORT`           | `993`, `143` without TLS     |
//! | `BLOCKED_EMAILS_FILE` | `blocked_emails.json`        |
//! | `FETCH_WINDOW_DAYS`   | `1`                          |
//! | `CLAUDE_API_KEY`      | unset disables the assistant |
//! | `CLAUDE_MODEL`        | `claude-3-5-sonnet-20241022` |
//!
//! Empty values count as unset.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use mailsieve_imap::Security;
use tracing::warn;

use crate::error::ConfigError;

/// Default IMAP host.
pub const DEFAULT_IMAP_SERVER: &str = "imap.mail.yahoo.com";
/// Default blocklist path.
pub const DEFAULT_BLOCKLIST_FILE: &str = "blocked_emails.json";
/// Default fetch window in days.
pub const DEFAULT_WINDOW_DAYS: u32 = 1;
/// Default assistant model.
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Application settings, read once at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Account address used for LOGIN.
    pub email: Option<String>,
    /// Account secret used for LOGIN.
    pub password: Option<String>,
    /// IMAP host.
    pub imap_server: String,
    /// IMAP port.
    pub imap_port: u16,
    /// TLS or plaintext.
    pub imap_security: Security,
    /// Blocklist file.
    pub blocked_emails_file: PathBuf,
    /// Default number of days `fetch` looks back.
    pub fetch_window_days: u32,
    /// API key for the checklist assistant.
    pub claude_api_key: Option<String>,
    /// Model id for the checklist assistant.
    pub claude_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Reads settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through an arbitrary lookup function.
    ///
    /// Numeric values that do not parse fall back to their defaults with a
    /// warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let imap_security = get("IMAP_SECURITY").map_or(Security::Implicit, |raw| {
            parse_security(&raw).unwrap_or_else(|| {
                warn!(variable = "IMAP_SECURITY", value = %raw, "unknown mode, using tls");
                Security::Implicit
            })
        });

        Self {
            email: get("EMAIL"),
            password: get("PASSWORD"),
            imap_server: get("IMAP_SERVER").unwrap_or_else(|| DEFAULT_IMAP_SERVER.to_string()),
            imap_port: parse_or("IMAP_PORT", get("IMAP_PORT"), imap_security.default_port()),
            imap_security,
            blocked_emails_file: get("BLOCKED_EMAILS_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_BLOCKLIST_FILE), PathBuf::from),
            fetch_window_days: parse_or(
                "FETCH_WINDOW_DAYS",
                get("FETCH_WINDOW_DAYS"),
                DEFAULT_WINDOW_DAYS,
            ),
            claude_api_key: get("CLAUDE_API_KEY"),
            claude_model: get("CLAUDE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Returns `(email, password)`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] naming the first unset variable.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let email = self.email.as_deref().ok_or(ConfigError::Missing("EMAIL"))?;
        let password = self
            .password
            .as_deref()
            .ok_or(ConfigError::Missing("PASSWORD"))?;
        Ok((email, password))
    }

    /// Connection settings for the IMAP client.
    #[must_use]
    pub fn imap_config(&self) -> mailsieve_imap::Config {
        mailsieve_imap::Config::builder(self.imap_server.clone())
            .port(self.imap_port)
            .security(self.imap_security)
            .build()
    }
}

fn parse_security(raw: &str) -> Option<Security> {
    match raw.to_ascii_lowercase().as_str() {
        "tls" | "ssl" | "implicit" => Some(Security::Implicit),
        "none" | "plain" => Some(Security::None),
        _ => None,
    }
}

fn parse_or<T>(name: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Copy + fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, %default, "invalid number, using default");
            default
        }),
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = |secret: &Option<String>| secret.as_ref().map(|_| "<redacted>");
        f.debug_struct("Config")
            .field("email", &self.email)
            .field("password", &redacted(&self.password))
            .field("imap_server", &self.imap_server)
            .field("imap_port", &self.imap_port)
            .field("imap_security", &self.imap_security)
            .field("blocked_emails_file", &self.blocked_emails_file)
            .field("fetch_window_days", &self.fetch_window_days)
            .field("claude_api_key", &redacted(&self.claude_api_key))
            .field("claude_model", &self.claude_model)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.imap_server, "imap.mail.yahoo.com");
        assert_eq!(config.imap_port, 993);
        assert_eq!(config.imap_security, Security::Implicit);
        assert_eq!(config.blocked_emails_file, PathBuf::from("blocked_emails.json"));
        assert_eq!(config.fetch_window_days, 1);
        assert_eq!(config.claude_model, DEFAULT_MODEL);
        assert!(config.claude_api_key.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("EMAIL", "me@example.com"),
            ("PASSWORD", "app-secret"),
            ("IMAP_SERVER", "imap.example.com"),
            ("IMAP_PORT", "1993"),
            ("BLOCKED_EMAILS_FILE", "/tmp/blocked.json"),
            ("FETCH_WINDOW_DAYS", "7"),
            ("CLAUDE_API_KEY", "sk-test"),
        ]);
        assert_eq!(config.credentials().unwrap(), ("me@example.com", "app-secret"));
        assert_eq!(config.imap_port, 1993);
        assert_eq!(config.fetch_window_days, 7);
        assert_eq!(config.blocked_emails_file, PathBuf::from("/tmp/blocked.json"));

        let imap = config.imap_config();
        assert_eq!(imap.host, "imap.example.com");
        assert_eq!(imap.port, 1993);
    }

    #[test]
    fn test_missing_credentials() {
        let config = config_from(&[("EMAIL", "me@example.com"), ("PASSWORD", "  ")]);
        assert_eq!(config.credentials(), Err(ConfigError::Missing("PASSWORD")));

        let config = config_from(&[]);
        assert_eq!(config.credentials(), Err(ConfigError::Missing("EMAIL")));
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let config = config_from(&[("IMAP_PORT", "imap"), ("FETCH_WINDOW_DAYS", "-2")]);
        assert_eq!(config.imap_port, 993);
        assert_eq!(config.fetch_window_days, DEFAULT_WINDOW_DAYS);
    }

    #[test]
    fn test_plaintext_security() {
        let config = config_from(&[("IMAP_SECURITY", "None"), ("IMAP_SERVER", "localhost")]);
        assert_eq!(config.imap_security, Security::None);
        assert_eq!(config.imap_port, 143);

        let imap = config.imap_config();
        assert_eq!(imap.security, Security::None);
        assert_eq!(imap.port, 143);

        let config = config_from(&[("IMAP_SECURITY", "none"), ("IMAP_PORT", "3143")]);
        assert_eq!(config.imap_config().port, 3143);
    }

    #[test]
    fn test_unknown_security_falls_back_to_tls() {
        let config = config_from(&[("IMAP_SECURITY", "starttls")]);
        assert_eq!(config.imap_security, Security::Implicit);
        assert_eq!(config.imap_port, 993);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = config_from(&[("PASSWORD", "hunter2"), ("CLAUDE_API_KEY", "sk-secret")]);
        let debug = format!("{config:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("<redacted>"));
    }
}
