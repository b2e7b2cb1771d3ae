//! Store lifecycle: locating the backing file, creating it once, opening it.

mod config;

pub use config::{Config, DayBoundary};

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ConfigError, JournalError, Result, StoreError};
use crate::graph::SqliteQuadStore;
use crate::journal::Journal;

/// Environment variable overriding the backing file.
pub const DB_ENV: &str = "JRNL_DB";

/// Backing file name under the home directory.
pub const DEFAULT_DB_FILE: &str = ".jrnl.db";

/// Returns the user's home directory.
///
/// # Errors
/// Returns [`ConfigError::NoHomeDir`] if it cannot be determined.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir().ok_or(ConfigError::NoHomeDir)
}

/// Returns `~/.config/jrnl/`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    Ok(home_dir()?.join(".config").join("jrnl"))
}

/// Resolve the backing file: explicit path, then `$JRNL_DB`, then the
/// config file's `db_path`, then `~/.jrnl.db`.
pub fn resolve_db_path(explicit: Option<&Path>, config: &Config) -> Result<PathBuf, ConfigError> {
    resolve_db_path_with(explicit, std::env::var_os(DB_ENV), config, dirs::home_dir())
}

fn resolve_db_path_with(
    explicit: Option<&Path>,
    env: Option<OsString>,
    config: &Config,
    home: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = &config.db_path {
        return match path.strip_prefix("~") {
            Ok(rest) => Ok(home.ok_or(ConfigError::NoHomeDir)?.join(rest)),
            Err(_) => Ok(path.clone()),
        };
    }
    Ok(home.ok_or(ConfigError::NoHomeDir)?.join(DEFAULT_DB_FILE))
}

/// Initialize the backing file if needed, then open it.
///
/// # Errors
/// Returns [`JournalError::StoreInitFailed`] if the file cannot be created,
/// [`JournalError::StoreLocked`] if another process holds it, and
/// [`JournalError::StoreOpenFailed`] for any other open failure.
pub fn open_store(path: &Path) -> Result<SqliteQuadStore> {
    let created = SqliteQuadStore::init(path).map_err(|source| JournalError::StoreInitFailed {
        path: path.to_path_buf(),
        source,
    })?;
    if created {
        info!(path = %path.display(), "created journal store");
    }

    SqliteQuadStore::open(path).map_err(|source| match source {
        StoreError::Locked => JournalError::StoreLocked {
            path: path.to_path_buf(),
        },
        source => JournalError::StoreOpenFailed {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Open the journal stored at `path`.
pub fn open_journal(path: &Path) -> Result<Journal<SqliteQuadStore>> {
    Ok(Journal::new(open_store(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> Option<PathBuf> {
        Some(PathBuf::from("/home/ann"))
    }

    #[test]
    fn default_path_is_under_home() {
        let path = resolve_db_path_with(None, None, &Config::default(), home()).unwrap();
        assert_eq!(path, PathBuf::from("/home/ann/.jrnl.db"));
    }

    #[test]
    fn explicit_path_wins() {
        let cfg = Config {
            db_path: Some(PathBuf::from("/cfg.db")),
            ..Config::default()
        };
        let path = resolve_db_path_with(
            Some(Path::new("/flag.db")),
            Some(OsString::from("/env.db")),
            &cfg,
            home(),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/flag.db"));
    }

    #[test]
    fn env_beats_config() {
        let cfg = Config {
            db_path: Some(PathBuf::from("/cfg.db")),
            ..Config::default()
        };
        let path = resolve_db_path_with(None, Some(OsString::from("/env.db")), &cfg, home()).unwrap();
        assert_eq!(path, PathBuf::from("/env.db"));

        let path = resolve_db_path_with(None, Some(OsString::new()), &cfg, home()).unwrap();
        assert_eq!(path, PathBuf::from("/cfg.db"));
    }

    #[test]
    fn config_path_expands_tilde() {
        let cfg = Config {
            db_path: Some(PathBuf::from("~/notes/j.db")),
            ..Config::default()
        };
        let path = resolve_db_path_with(None, None, &cfg, home()).unwrap();
        assert_eq!(path, PathBuf::from("/home/ann/notes/j.db"));
    }

    #[test]
    fn no_home_is_a_configuration_error() {
        let err = resolve_db_path_with(None, None, &Config::default(), None).unwrap_err();
        assert!(matches!(err, ConfigError::NoHomeDir));
    }

    #[test]
    fn open_store_creates_then_reuses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("j.db");
        drop(open_store(&path).unwrap());
        assert!(path.exists());
        drop(open_store(&path).unwrap());
    }

    #[test]
    fn concurrent_open_reports_locked() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("j.db");
        let _held = open_store(&path).unwrap();
        let err = open_store(&path).err().unwrap();
        assert!(matches!(err, JournalError::StoreLocked { .. }));
    }

    #[test]
    fn uncreatable_location_fails_init() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("plain-file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = open_store(&blocker.join("j.db")).err().unwrap();
        match err {
            JournalError::StoreInitFailed { path, .. } => assert_eq!(path, blocker.join("j.db")),
            other => panic!("expected StoreInitFailed, got {other:?}"),
        }
    }

    #[test]
    fn foreign_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("j.db");
        std::fs::write(&path, "definitely not sqlite, just some text long enough to matter").unwrap();
        let err = open_store(&path).err().unwrap();
        assert!(matches!(err, JournalError::StoreOpenFailed { .. }));
    }
}
