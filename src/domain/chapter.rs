use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A grouping of subtopics. The subject is what suggestions are interleaved by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
  pub id: i64,
  pub name: String,
  pub subject: String,
  /// Minutes
  pub total_study_time: i64,
  pub last_studied: Option<DateTime<Utc>>,
  pub user_id: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Chapter {
  pub fn new(name: String, subject: String, user_id: String, created_at: DateTime<Utc>) -> Self {
    Self {
      id: 0,
      name,
      subject,
      total_study_time: 0,
      last_studied: None,
      user_id,
      created_at,
      updated_at: created_at,
    }
  }
}
