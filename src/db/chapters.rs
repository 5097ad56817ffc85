//! Chapter storage and subject lookup

use rusqlite::{params, Connection, OptionalExtension, Result};

use super::{parse_optional_timestamp, parse_timestamp};
use crate::domain::Chapter;

const CHAPTER_COLUMNS: &str =
    "id, name, subject, total_study_time, last_studied, user_id, created_at, updated_at";

pub fn insert_chapter(conn: &Connection, chapter: &Chapter) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO chapters (name, subject, total_study_time, last_studied, user_id, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#,
        params![
            chapter.name,
            chapter.subject,
            chapter.total_study_time,
            chapter.last_studied.map(|d| d.to_rfc3339()),
            chapter.user_id,
            chapter.created_at.to_rfc3339(),
            chapter.updated_at.to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_chapter_by_id(conn: &Connection, id: i64) -> Result<Option<Chapter>> {
    conn.query_row(
        &format!("SELECT {} FROM chapters WHERE id = ?1", CHAPTER_COLUMNS),
        params![id],
        row_to_chapter,
    )
    .optional()
}

pub fn get_user_chapters(conn: &Connection, user_id: &str) -> Result<Vec<Chapter>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM chapters WHERE user_id = ?1 ORDER BY created_at ASC, id ASC",
        CHAPTER_COLUMNS
    ))?;

    let chapters = stmt
        .query_map(params![user_id], row_to_chapter)?
        .collect::<Result<Vec<_>>>()?;
    Ok(chapters)
}

/// Subject of a chapter, None if the chapter doesn't exist
pub fn get_chapter_subject(conn: &Connection, chapter_id: i64) -> Result<Option<String>> {
    conn.query_row(
        "SELECT subject FROM chapters WHERE id = ?1",
        params![chapter_id],
        |row| row.get(0),
    )
    .optional()
}

pub(crate) fn row_to_chapter(row: &rusqlite::Row) -> Result<Chapter> {
    let last_studied: Option<String> = row.get(4)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Chapter {
        id: row.get(0)?,
        name: row.get(1)?,
        subject: row.get(2)?,
        total_study_time: row.get(3)?,
        last_studied: parse_optional_timestamp(4, last_studied)?,
        user_id: row.get(5)?,
        created_at: parse_timestamp(6, &created_at)?,
        updated_at: parse_timestamp(7, &updated_at)?,
    })
}
