//! Subtopic storage: CRUD, SM-2 state writes and scheduling modifiers

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result};

use super::{parse_json, parse_optional_timestamp, parse_timestamp, to_json};
use crate::domain::{Subtopic, SubtopicStatus};

const SUBTOPIC_COLUMNS: &str = r#"
    id, name, parent_chapter_id, ease_factor, interval_days, repetitions, next_review_date,
    last_review_date, last_performance_rating, tags, status, user_id, created_at, updated_at,
    postponed_until, buried_until
"#;

pub fn insert_subtopic(conn: &Connection, subtopic: &Subtopic) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO subtopics (name, parent_chapter_id, ease_factor, interval_days, repetitions,
                           next_review_date, last_review_date, last_performance_rating, tags, status,
                           user_id, created_at, updated_at, postponed_until, buried_until)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
    "#,
        params![
            subtopic.name,
            subtopic.parent_chapter_id,
            subtopic.ease_factor,
            subtopic.interval,
            subtopic.repetitions,
            subtopic.next_review_date.to_rfc3339(),
            subtopic.last_review_date.map(|d| d.to_rfc3339()),
            subtopic.last_performance_rating,
            to_json(&subtopic.tags)?,
            subtopic.status.as_str(),
            subtopic.user_id,
            subtopic.created_at.to_rfc3339(),
            subtopic.updated_at.to_rfc3339(),
            subtopic.postponed_until.map(|d| d.to_rfc3339()),
            subtopic.buried_until.map(|d| d.to_rfc3339()),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_subtopic_by_id(conn: &Connection, id: i64) -> Result<Option<Subtopic>> {
    conn.query_row(
        &format!("SELECT {} FROM subtopics WHERE id = ?1", SUBTOPIC_COLUMNS),
        params![id],
        row_to_subtopic,
    )
    .optional()
}

/// All of a user's subtopics in any status, most recently updated first
pub fn get_user_subtopics(conn: &Connection, user_id: &str) -> Result<Vec<Subtopic>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM subtopics WHERE user_id = ?1 ORDER BY updated_at DESC, id ASC",
        SUBTOPIC_COLUMNS
    ))?;

    let subtopics = stmt
        .query_map(params![user_id], row_to_subtopic)?
        .collect::<Result<Vec<_>>>()?;
    Ok(subtopics)
}

pub fn get_chapter_subtopics(conn: &Connection, chapter_id: i64) -> Result<Vec<Subtopic>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM subtopics WHERE parent_chapter_id = ?1 ORDER BY created_at ASC, id ASC",
        SUBTOPIC_COLUMNS
    ))?;

    let subtopics = stmt
        .query_map(params![chapter_id], row_to_subtopic)?
        .collect::<Result<Vec<_>>>()?;
    Ok(subtopics)
}

/// Persist the review-related fields of a subtopic. Returns false if no row matched.
pub fn update_subtopic_review(conn: &Connection, subtopic: &Subtopic) -> Result<bool> {
    let updated = conn.execute(
        r#"
    UPDATE subtopics
    SET ease_factor = ?1, interval_days = ?2, repetitions = ?3, next_review_date = ?4,
        last_review_date = ?5, last_performance_rating = ?6, status = ?7, updated_at = ?8
    WHERE id = ?9
    "#,
        params![
            subtopic.ease_factor,
            subtopic.interval,
            subtopic.repetitions,
            subtopic.next_review_date.to_rfc3339(),
            subtopic.last_review_date.map(|d| d.to_rfc3339()),
            subtopic.last_performance_rating,
            subtopic.status.as_str(),
            subtopic.updated_at.to_rfc3339(),
            subtopic.id,
        ],
    )?;
    Ok(updated > 0)
}

pub fn set_postponed_until(
    conn: &Connection,
    id: i64,
    until: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE subtopics SET postponed_until = ?1, updated_at = ?2 WHERE id = ?3",
        params![until.map(|d| d.to_rfc3339()), now.to_rfc3339(), id],
    )?;
    Ok(updated > 0)
}

pub fn set_buried_until(
    conn: &Connection,
    id: i64,
    until: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<bool> {
    let updated = conn.execute(
        "UPDATE subtopics SET buried_until = ?1, updated_at = ?2 WHERE id = ?3",
        params![until.map(|d| d.to_rfc3339()), now.to_rfc3339(), id],
    )?;
    Ok(updated > 0)
}

pub(crate) fn row_to_subtopic(row: &rusqlite::Row) -> Result<Subtopic> {
    let next_review: String = row.get(6)?;
    let last_review: Option<String> = row.get(7)?;
    let tags: String = row.get(9)?;
    let status: String = row.get(10)?;
    let created_at: String = row.get(12)?;
    let updated_at: String = row.get(13)?;
    let postponed_until: Option<String> = row.get(14)?;
    let buried_until: Option<String> = row.get(15)?;

    Ok(Subtopic {
        id: row.get(0)?,
        name: row.get(1)?,
        parent_chapter_id: row.get(2)?,
        ease_factor: row.get(3)?,
        interval: row.get(4)?,
        repetitions: row.get(5)?,
        next_review_date: parse_timestamp(6, &next_review)?,
        last_review_date: parse_optional_timestamp(7, last_review)?,
        last_performance_rating: row.get(8)?,
        tags: parse_json(9, &tags)?,
        status: SubtopicStatus::from_str(&status).unwrap_or_default(),
        user_id: row.get(11)?,
        created_at: parse_timestamp(12, &created_at)?,
        updated_at: parse_timestamp(13, &updated_at)?,
        postponed_until: parse_optional_timestamp(14, postponed_until)?,
        buried_until: parse_optional_timestamp(15, buried_until)?,
    })
}
