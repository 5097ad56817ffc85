//! Item repository seam between the scheduler and storage.
//!
//! The suggestion engine only needs two things from the outside world: the
//! user's item pool and a way to turn a chapter id into a subject. Both are
//! expressed as traits so the engine can run against SQLite, an in-memory
//! map, or a test double.

use std::collections::HashMap;

use crate::db::{self, DbLockError, DbPool};
use crate::domain::Subtopic;

#[derive(Debug)]
pub enum RepositoryError {
  Storage(rusqlite::Error),
  Unavailable(DbLockError),
  NotFound { kind: &'static str, id: i64 },
}

impl std::fmt::Display for RepositoryError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Storage(e) => write!(f, "Storage error: {}", e),
      Self::Unavailable(e) => write!(f, "{}", e),
      Self::NotFound { kind, id } => write!(f, "{} {} not found", kind, id),
    }
  }
}

impl std::error::Error for RepositoryError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Storage(e) => Some(e),
      Self::Unavailable(e) => Some(e),
      Self::NotFound { .. } => None,
    }
  }
}

impl From<rusqlite::Error> for RepositoryError {
  fn from(e: rusqlite::Error) -> Self {
    Self::Storage(e)
  }
}

impl From<DbLockError> for RepositoryError {
  fn from(e: DbLockError) -> Self {
    Self::Unavailable(e)
  }
}

/// Resolves a chapter id to its subject label.
///
/// `Ok(None)` means the chapter does not exist.
pub trait SubjectResolver {
  fn resolve_subject(&self, chapter_id: i64) -> Result<Option<String>, RepositoryError>;
}

pub trait ItemRepository: SubjectResolver {
  /// Every subtopic the user owns, in any status
  fn fetch_item_pool(&self, user_id: &str) -> Result<Vec<Subtopic>, RepositoryError>;
}

impl SubjectResolver for HashMap<i64, String> {
  fn resolve_subject(&self, chapter_id: i64) -> Result<Option<String>, RepositoryError> {
    Ok(self.get(&chapter_id).cloned())
  }
}

/// SQLite-backed repository over the shared connection
#[derive(Clone)]
pub struct SqliteRepository {
  pool: DbPool,
}

impl SqliteRepository {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }

  pub fn pool(&self) -> &DbPool {
    &self.pool
  }
}

impl SubjectResolver for SqliteRepository {
  fn resolve_subject(&self, chapter_id: i64) -> Result<Option<String>, RepositoryError> {
    let conn = db::try_lock(&self.pool)?;
    Ok(db::get_chapter_subject(&conn, chapter_id)?)
  }
}

impl ItemRepository for SqliteRepository {
  fn fetch_item_pool(&self, user_id: &str) -> Result<Vec<Subtopic>, RepositoryError> {
    let conn = db::try_lock(&self.pool)?;
    Ok(db::get_user_subtopics(&conn, user_id)?)
  }
}
