//! SQLite-backed record store for the workforce data layer.
//!
//! The database lives at `~/.teamops/teamops.db` and holds the five
//! entities: profiles, attendance, projects, assignments, and reports.
//! Visibility scoping is applied inside the queries themselves (admin vs.
//! owned rows) so no caller can forget to filter. Correctness of the
//! one-check-in-per-day invariant rests on the UNIQUE(user_id, day) index,
//! not on application-level sequencing.

use std::path::PathBuf;

use rusqlite::Connection;

pub mod types;
pub use types::*;

pub mod assignments;
pub mod attendance;
pub mod profiles;
pub mod projects;
pub mod reports;

pub struct WorkforceDb {
    conn: Connection,
}

impl WorkforceDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Open (or create) the database at its default path and apply the
    /// schema. Honors the `db_path` override from [`crate::config::Config`].
    pub fn open(config: &crate::config::Config) -> Result<Self, DbError> {
        let path = match &config.db_path {
            Some(path) => path.clone(),
            None => Self::default_db_path()?,
        };
        Self::open_at(path)
    }

    /// Open a database at an explicit path. Useful for testing.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // WAL mode for better concurrent read performance
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;

        // FK enforcement carries the project-delete cascade
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        Ok(Self { conn })
    }

    /// Resolve the default database path: `~/.teamops/teamops.db`.
    fn default_db_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".teamops").join("teamops.db"))
    }

    /// Execute a closure within a SQLite transaction.
    /// Commits on Ok, rolls back on Err.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Self) -> Result<T, DbError>,
    {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        match f(self) {
            Ok(val) => {
                self.conn.execute_batch("COMMIT")?;
                Ok(val)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK");
                Err(e)
            }
        }
    }
}

// =============================================================================
// Shared test utilities
// =============================================================================


// =============================================================================
// Tests
// =============================================================================
