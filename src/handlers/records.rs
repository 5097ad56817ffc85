//! Creation endpoints for chapters, subtopics, sessions and exams.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{ApiError, ApiResult};
use crate::db::{self, try_lock};
use crate::domain::{Chapter, Exam, SessionType, StudySession, Subtopic};
use crate::repository::RepositoryError;
use crate::state::AppState;

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
  if value.trim().is_empty() {
    return Err(ApiError::BadRequest(format!("{} must not be empty", field)));
  }
  Ok(())
}

#[derive(Deserialize)]
pub struct NewChapter {
  pub name: String,
  pub subject: String,
  pub user_id: String,
}

pub async fn create_chapter(State(state): State<AppState>, Json(input): Json<NewChapter>) -> ApiResult<Chapter> {
  require_text("name", &input.name)?;
  require_text("user_id", &input.user_id)?;

  let mut chapter = Chapter::new(input.name, input.subject, input.user_id, Utc::now());
  let conn = try_lock(&state.pool)?;
  chapter.id = db::insert_chapter(&conn, &chapter)?;

  tracing::debug!(chapter_id = chapter.id, subject = %chapter.subject, "Created chapter");
  Ok(Json(chapter))
}

#[derive(Deserialize)]
pub struct NewSubtopic {
  pub name: String,
  pub parent_chapter_id: i64,
  pub user_id: String,
  #[serde(default)]
  pub tags: Vec<String>,
}

pub async fn create_subtopic(State(state): State<AppState>, Json(input): Json<NewSubtopic>) -> ApiResult<Subtopic> {
  require_text("name", &input.name)?;
  require_text("user_id", &input.user_id)?;

  let conn = try_lock(&state.pool)?;
  if db::get_chapter_by_id(&conn, input.parent_chapter_id)?.is_none() {
    return Err(
      RepositoryError::NotFound {
        kind: "Chapter",
        id: input.parent_chapter_id,
      }
      .into(),
    );
  }

  let mut subtopic = Subtopic::new(input.name, input.parent_chapter_id, input.user_id, Utc::now());
  subtopic.tags = input.tags;
  subtopic.id = db::insert_subtopic(&conn, &subtopic)?;

  tracing::debug!(subtopic_id = subtopic.id, chapter_id = subtopic.parent_chapter_id, "Created subtopic");
  Ok(Json(subtopic))
}

#[derive(Deserialize)]
pub struct NewSession {
  pub user_id: String,
  pub start_time: DateTime<Utc>,
  pub end_time: Option<DateTime<Utc>>,
  /// Minutes; derived from the end time when omitted
  pub duration: Option<i64>,
  #[serde(default)]
  pub chapter_ids_studied: Vec<i64>,
  #[serde(default)]
  pub subtopic_ids_studied: Vec<i64>,
  pub session_type: SessionType,
  pub notes: Option<String>,
}

pub async fn create_session(State(state): State<AppState>, Json(input): Json<NewSession>) -> ApiResult<StudySession> {
  require_text("user_id", &input.user_id)?;
  if let Some(end) = input.end_time {
    if end < input.start_time {
      return Err(ApiError::BadRequest("end_time is before start_time".into()));
    }
  }
  if input.duration.is_some_and(|d| d < 0) {
    return Err(ApiError::BadRequest("duration must not be negative".into()));
  }

  let duration = input
    .duration
    .or_else(|| input.end_time.map(|end| (end - input.start_time).num_minutes()));

  let mut session = StudySession {
    id: 0,
    user_id: input.user_id,
    start_time: input.start_time,
    end_time: input.end_time,
    duration,
    chapter_ids_studied: input.chapter_ids_studied,
    subtopic_ids_studied: input.subtopic_ids_studied,
    session_type: input.session_type,
    notes: input.notes,
  };

  let conn = try_lock(&state.pool)?;
  session.id = db::insert_study_session(&conn, &session)?;
  Ok(Json(session))
}

#[derive(Deserialize)]
pub struct NewExam {
  pub name: String,
  pub date: DateTime<Utc>,
  pub target_completion_percentage: f64,
  pub user_id: String,
}

pub async fn create_exam(State(state): State<AppState>, Json(input): Json<NewExam>) -> ApiResult<Exam> {
  require_text("name", &input.name)?;
  require_text("user_id", &input.user_id)?;
  if !(0.0..=100.0).contains(&input.target_completion_percentage) {
    return Err(ApiError::BadRequest(
      "target_completion_percentage must be between 0 and 100".into(),
    ));
  }

  let mut exam = Exam {
    id: 0,
    name: input.name,
    date: input.date,
    target_completion_percentage: input.target_completion_percentage,
    user_id: input.user_id,
  };

  let conn = try_lock(&state.pool)?;
  exam.id = db::insert_exam(&conn, &exam)?;
  Ok(Json(exam))
}
