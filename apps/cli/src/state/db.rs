//! # Database State
//!
//! Wraps the `Database` connection for use in commands.
//!
//! ## Thread Safety
//! The `Database` struct from `tendero-db` contains a `SqlitePool` which
//! is inherently thread-safe. Commands only borrow it.

use directories::ProjectDirs;
use std::path::PathBuf;
use tracing::info;

use super::ConfigState;
use tendero_db::{Database, DbConfig, DbError, DbResult};

/// Wrapper around `Database` handed to every command.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Opens the database described by `config`, running migrations.
    pub async fn open(config: &ConfigState) -> DbResult<Self> {
        let path = match &config.db_path {
            Some(path) => path.clone(),
            None => default_database_path()?,
        };
        info!(?path, "Opening database");

        let db = Database::new(DbConfig::new(path).max_connections(config.max_connections)).await?;
        Ok(DbState::new(db))
    }

    /// Returns a reference to the inner Database.
    pub fn inner(&self) -> &Database {
        &self.db
    }
}

/// Platform-specific database location.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.tendero.pos/tendero.db`
/// - **Windows**: `%APPDATA%\tendero\pos\data\tendero.db`
/// - **Linux**: `~/.local/share/pos/tendero.db`
///
/// The directory is created if it doesn't exist.
pub fn default_database_path() -> DbResult<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "tendero", "pos").ok_or_else(|| {
        DbError::ConnectionFailed("Could not determine app data directory".to_string())
    })?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .map_err(|e| DbError::ConnectionFailed(format!("{}: {}", data_dir.display(), e)))?;

    Ok(data_dir.join("tendero.db"))
}
