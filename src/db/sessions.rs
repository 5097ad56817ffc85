//! Study session and exam storage

use rusqlite::{params, Connection, Result};

use super::{parse_json, parse_optional_timestamp, parse_timestamp, to_json};
use crate::domain::{Exam, SessionType, StudySession};

pub fn insert_study_session(conn: &Connection, session: &StudySession) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO study_sessions (user_id, start_time, end_time, duration, chapter_ids, subtopic_ids,
                                session_type, notes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    "#,
        params![
            session.user_id,
            session.start_time.to_rfc3339(),
            session.end_time.map(|d| d.to_rfc3339()),
            session.duration,
            to_json(&session.chapter_ids_studied)?,
            to_json(&session.subtopic_ids_studied)?,
            session.session_type.as_str(),
            session.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Most recent sessions first
pub fn get_user_study_sessions(conn: &Connection, user_id: &str, limit: usize) -> Result<Vec<StudySession>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT id, user_id, start_time, end_time, duration, chapter_ids, subtopic_ids, session_type, notes
    FROM study_sessions
    WHERE user_id = ?1
    ORDER BY start_time DESC
    LIMIT ?2
    "#,
    )?;

    let sessions = stmt
        .query_map(params![user_id, limit as i64], row_to_session)?
        .collect::<Result<Vec<_>>>()?;
    Ok(sessions)
}

pub fn insert_exam(conn: &Connection, exam: &Exam) -> Result<i64> {
    conn.execute(
        "INSERT INTO exams (name, date, target_completion_percentage, user_id) VALUES (?1, ?2, ?3, ?4)",
        params![
            exam.name,
            exam.date.to_rfc3339(),
            exam.target_completion_percentage,
            exam.user_id,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_user_exams(conn: &Connection, user_id: &str) -> Result<Vec<Exam>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, date, target_completion_percentage, user_id FROM exams WHERE user_id = ?1 ORDER BY date ASC",
    )?;

    let exams = stmt
        .query_map(params![user_id], |row| {
            let date: String = row.get(2)?;
            Ok(Exam {
                id: row.get(0)?,
                name: row.get(1)?,
                date: parse_timestamp(2, &date)?,
                target_completion_percentage: row.get(3)?,
                user_id: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>>>()?;
    Ok(exams)
}

fn row_to_session(row: &rusqlite::Row) -> Result<StudySession> {
    let start_time: String = row.get(2)?;
    let end_time: Option<String> = row.get(3)?;
    let chapter_ids: String = row.get(5)?;
    let subtopic_ids: String = row.get(6)?;
    let session_type: String = row.get(7)?;

    Ok(StudySession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        start_time: parse_timestamp(2, &start_time)?,
        end_time: parse_optional_timestamp(3, end_time)?,
        duration: row.get(4)?,
        chapter_ids_studied: parse_json(5, &chapter_ids)?,
        subtopic_ids_studied: parse_json(6, &subtopic_ids)?,
        session_type: SessionType::from_str(&session_type).unwrap_or(SessionType::FocusedStudy),
        notes: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{t0, TestEnv};
    use chrono::Duration;

    fn session(start_offset_hours: i64) -> StudySession {
        StudySession {
            id: 0,
            user_id: "alice".into(),
            start_time: t0() + Duration::hours(start_offset_hours),
            end_time: Some(t0() + Duration::hours(start_offset_hours + 1)),
            duration: Some(60),
            chapter_ids_studied: vec![1],
            subtopic_ids_studied: vec![3, 4],
            session_type: SessionType::Review,
            notes: None,
        }
    }

    #[test]
    fn test_sessions_roundtrip_newest_first() {
        let env = TestEnv::new().unwrap();
        insert_study_session(&env.conn, &session(0)).unwrap();
        let id = insert_study_session(&env.conn, &session(5)).unwrap();

        let sessions = get_user_study_sessions(&env.conn, "alice", 10).unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].id, id);
        assert_eq!(sessions[0].subtopic_ids_studied, vec![3, 4]);
        assert_eq!(sessions[0].session_type, SessionType::Review);

        assert_eq!(get_user_study_sessions(&env.conn, "alice", 1).unwrap().len(), 1);
        assert!(get_user_study_sessions(&env.conn, "bob", 10).unwrap().is_empty());
    }

    #[test]
    fn test_exams_roundtrip() {
        let env = TestEnv::new().unwrap();
        let exam = Exam {
            id: 0,
            name: "Finals".into(),
            date: t0() + Duration::days(30),
            target_completion_percentage: 80.0,
            user_id: "alice".into(),
        };
        let id = insert_exam(&env.conn, &exam).unwrap();

        let exams = get_user_exams(&env.conn, "alice").unwrap();
        assert_eq!(exams, vec![Exam { id, ..exam }]);
    }
}
