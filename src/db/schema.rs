use rusqlite::{Connection, Result};

pub fn run_migrations(conn: &Connection) -> Result<()> {
  // Create tables with COMPLETE schema for new databases
  // Migrations below handle upgrades for existing databases
  conn.execute_batch(
    r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS chapters (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      subject TEXT NOT NULL,
      total_study_time INTEGER NOT NULL DEFAULT 0,
      last_studied TEXT,
      user_id TEXT NOT NULL,
      created_at TEXT NOT NULL,
      updated_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS subtopics (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      parent_chapter_id INTEGER NOT NULL,
      -- SM-2 columns
      ease_factor REAL NOT NULL DEFAULT 2.5,
      interval_days INTEGER NOT NULL DEFAULT 0,
      repetitions INTEGER NOT NULL DEFAULT 0,
      next_review_date TEXT NOT NULL,
      last_review_date TEXT,
      last_performance_rating REAL,
      tags TEXT NOT NULL DEFAULT '[]',
      status TEXT NOT NULL DEFAULT 'not_started',
      user_id TEXT NOT NULL,
      created_at TEXT NOT NULL,
      updated_at TEXT NOT NULL,
      postponed_until TEXT,
      buried_until TEXT,
      FOREIGN KEY (parent_chapter_id) REFERENCES chapters(id)
    );

    CREATE TABLE IF NOT EXISTS study_sessions (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      user_id TEXT NOT NULL,
      start_time TEXT NOT NULL,
      end_time TEXT,
      duration INTEGER,
      chapter_ids TEXT NOT NULL DEFAULT '[]',
      subtopic_ids TEXT NOT NULL DEFAULT '[]',
      session_type TEXT NOT NULL,
      notes TEXT
    );

    CREATE TABLE IF NOT EXISTS exams (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      name TEXT NOT NULL,
      date TEXT NOT NULL,
      target_completion_percentage REAL NOT NULL,
      user_id TEXT NOT NULL
    );

    -- Indexes
    CREATE INDEX IF NOT EXISTS idx_chapters_user ON chapters(user_id);
    CREATE INDEX IF NOT EXISTS idx_subtopics_user ON subtopics(user_id);
    CREATE INDEX IF NOT EXISTS idx_subtopics_chapter ON subtopics(parent_chapter_id);
    CREATE INDEX IF NOT EXISTS idx_subtopics_next_review ON subtopics(next_review_date);
    CREATE INDEX IF NOT EXISTS idx_sessions_user_start ON study_sessions(user_id, start_time);
    CREATE INDEX IF NOT EXISTS idx_exams_user ON exams(user_id);
    "#,
  )?;

  // ============================================================
  // MIGRATIONS FOR EXISTING DATABASES
  // These are no-ops for new databases (columns already exist)
  // ============================================================

  // Migration: scheduling modifiers (postpone / bury)
  add_column_if_missing(conn, "subtopics", "postponed_until", "TEXT")?;
  add_column_if_missing(conn, "subtopics", "buried_until", "TEXT")?;

  Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
  conn
    .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
    .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(conn: &Connection, table: &str, column: &str, column_def: &str) -> Result<()> {
  if !column_exists(conn, table, column) {
    conn.execute(
      &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
      [],
    )?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_migrations_are_idempotent() {
    let conn = Connection::open_in_memory().unwrap();
    run_migrations(&conn).unwrap();
    run_migrations(&conn).unwrap();

    assert!(column_exists(&conn, "subtopics", "buried_until"));
    assert!(column_exists(&conn, "study_sessions", "subtopic_ids"));
    assert!(!column_exists(&conn, "subtopics", "no_such_column"));
  }

  #[test]
  fn test_adds_missing_modifier_columns() {
    let conn = Connection::open_in_memory().unwrap();
    conn
      .execute_batch(
        r#"
        CREATE TABLE subtopics (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          name TEXT NOT NULL,
          parent_chapter_id INTEGER NOT NULL,
          ease_factor REAL NOT NULL DEFAULT 2.5,
          interval_days INTEGER NOT NULL DEFAULT 0,
          repetitions INTEGER NOT NULL DEFAULT 0,
          next_review_date TEXT NOT NULL,
          last_review_date TEXT,
          last_performance_rating REAL,
          tags TEXT NOT NULL DEFAULT '[]',
          status TEXT NOT NULL DEFAULT 'not_started',
          user_id TEXT NOT NULL,
          created_at TEXT NOT NULL,
          updated_at TEXT NOT NULL
        );
        "#,
      )
      .unwrap();

    run_migrations(&conn).unwrap();
    assert!(column_exists(&conn, "subtopics", "postponed_until"));
    assert!(column_exists(&conn, "subtopics", "buried_until"));
  }
}
