//! Test utilities for database setup.
//!
//! Provides helpers that reuse the authoritative schema initialization,
//! eliminating schema duplication in test code.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Connection;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::db::{self, DbPool};
use crate::domain::Chapter;

/// Fixed reference instant used across tests
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()
}

/// Test environment with a migrated study database in a temporary directory.
///
/// The directory (and database file) is removed when dropped.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Connection with the full schema (all migrations)
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        let conn = Connection::open(temp.path().join("study.db"))?;
        db::run_migrations(&conn)?;

        Ok(Self { temp, conn })
    }

    pub fn db_path(&self) -> PathBuf {
        self.temp.path().join("study.db")
    }

    /// A second, pooled connection to the same database file
    pub fn pool(&self) -> DbPool {
        let conn = Connection::open(self.db_path()).expect("open test database");
        db::pool_from_connection(conn)
    }

    /// Insert a chapter for user "alice" and return its id
    pub fn chapter(&self, name: &str, subject: &str) -> i64 {
        let chapter = Chapter::new(name.to_string(), subject.to_string(), "alice".to_string(), t0());
        db::insert_chapter(&self.conn, &chapter).expect("insert chapter")
    }
}
