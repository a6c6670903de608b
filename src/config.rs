//! Database configuration.

use crate::error::{Result, StoreError};
use std::path::{Path, PathBuf};

/// Database used when the host does not supply one: `db.sqlite3` in the
/// working directory.
pub const DEFAULT_URL: &str = "sqlite:///db.sqlite3";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    /// `sqlite[+driver]:///relative` or `sqlite[+driver]:////absolute`.
    pub url: String,
    /// Log every SQL statement under the `taskbot::sql` target.
    pub echo: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            echo: false,
        }
    }
}

impl DbConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            echo: false,
        }
    }

    /// Configuration for a database file at `path`.
    pub fn for_path<P: AsRef<Path>>(path: P) -> Self {
        Self::new(format!("sqlite:///{}", path.as_ref().display()))
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Resolve the URL to the database file it names.
    pub fn database_path(&self) -> Result<PathBuf> {
        parse_url(&self.url)
    }
}

fn parse_url(url: &str) -> Result<PathBuf> {
    let unsupported = || StoreError::UnsupportedUrl(url.to_string());

    let (scheme, rest) = url.split_once("://").ok_or_else(unsupported)?;
    let backend = scheme.split('+').next().unwrap_or_default();
    if backend != "sqlite" {
        return Err(unsupported());
    }

    // The host part is always empty for SQLite, so the path follows a third slash.
    let path = rest.strip_prefix('/').ok_or_else(unsupported)?;
    // Query parameters would otherwise end up in the file name.
    if path.is_empty()
        || path.contains('?')
        || path == ":memory:"
        || path.starts_with("file::memory:")
    {
        return Err(unsupported());
    }

    Ok(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url_is_relative_file() {
        let config = DbConfig::default();
        assert_eq!(config.url, DEFAULT_URL);
        assert!(!config.echo);
        assert_eq!(config.database_path().unwrap(), PathBuf::from("db.sqlite3"));
    }

    #[test]
    fn test_absolute_path_uses_four_slashes() {
        let config = DbConfig::new("sqlite:////var/lib/taskbot/db.sqlite3");
        assert_eq!(
            config.database_path().unwrap(),
            PathBuf::from("/var/lib/taskbot/db.sqlite3")
        );
    }

    #[test]
    fn test_driver_suffix_accepted() {
        let config = DbConfig::new("sqlite+aiosqlite:///db.sqlite3");
        assert_eq!(config.database_path().unwrap(), PathBuf::from("db.sqlite3"));
    }

    #[test]
    fn test_for_path_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bot.db");
        let config = DbConfig::for_path(&path);
        assert_eq!(config.database_path().unwrap(), path);
    }

    #[test]
    fn test_rejects_unsupported_urls() {
        for url in [
            "postgres://localhost/bot",
            "sqlite://",
            "sqlite:///",
            "sqlite:///:memory:",
            "sqlite:///db.sqlite3?mode=ro",
            "sqlite:////tmp/bot.db?cache=shared",
            "db.sqlite3",
        ] {
            let err = DbConfig::new(url).database_path().unwrap_err();
            assert!(
                matches!(err, StoreError::UnsupportedUrl(ref u) if u == url),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn test_with_echo() {
        assert!(DbConfig::default().with_echo(true).echo);
    }
}
