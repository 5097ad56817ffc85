use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of studying a session was
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
  FocusedStudy,
  Review,
  PracticeTest,
  Reading,
  Notes,
}

impl SessionType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::FocusedStudy => "focused_study",
      Self::Review => "review",
      Self::PracticeTest => "practice_test",
      Self::Reading => "reading",
      Self::Notes => "notes",
    }
  }

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "focused_study" => Some(Self::FocusedStudy),
      "review" => Some(Self::Review),
      "practice_test" => Some(Self::PracticeTest),
      "reading" => Some(Self::Reading),
      "notes" => Some(Self::Notes),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
  pub id: i64,
  pub user_id: String,
  pub start_time: DateTime<Utc>,
  pub end_time: Option<DateTime<Utc>>,
  /// Minutes, set once the session ends
  pub duration: Option<i64>,
  pub chapter_ids_studied: Vec<i64>,
  pub subtopic_ids_studied: Vec<i64>,
  pub session_type: SessionType,
  pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exam {
  pub id: i64,
  pub name: String,
  pub date: DateTime<Utc>,
  /// 0-100
  pub target_completion_percentage: f64,
  pub user_id: String,
}
