use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a subtopic. Owned by the application; the scheduler only reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubtopicStatus {
  #[default]
  NotStarted,
  Learning,
  Reviewing,
  Mastered,
}

impl SubtopicStatus {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "not_started" => Some(Self::NotStarted),
      "learning" => Some(Self::Learning),
      "reviewing" => Some(Self::Reviewing),
      "mastered" => Some(Self::Mastered),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::NotStarted => "not_started",
      Self::Learning => "learning",
      Self::Reviewing => "reviewing",
      Self::Mastered => "mastered",
    }
  }

  /// Statuses whose items can come due for review
  pub fn is_reviewable(&self) -> bool {
    matches!(self, Self::Learning | Self::Reviewing)
  }
}

/// A unit of study with its spaced-repetition state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subtopic {
  pub id: i64,
  pub name: String,
  pub parent_chapter_id: i64,

  // SM-2 state
  pub ease_factor: f64,
  pub interval: i64,
  pub repetitions: i64,
  pub next_review_date: DateTime<Utc>,
  pub last_review_date: Option<DateTime<Utc>>,
  /// Last clamped rating (0-5), None until the first review
  pub last_performance_rating: Option<f64>,

  pub tags: Vec<String>,
  pub status: SubtopicStatus,
  pub user_id: String,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,

  // While in the future, the subtopic is hidden from suggestions
  pub postponed_until: Option<DateTime<Utc>>,
  pub buried_until: Option<DateTime<Utc>>,
}

impl Subtopic {
  pub fn new(
    name: String,
    parent_chapter_id: i64,
    user_id: String,
    created_at: DateTime<Utc>,
  ) -> Self {
    Self {
      id: 0,
      name,
      parent_chapter_id,
      ease_factor: 2.5,
      interval: 0,
      repetitions: 0,
      next_review_date: created_at,
      last_review_date: None,
      last_performance_rating: None,
      tags: Vec::new(),
      status: SubtopicStatus::NotStarted,
      user_id,
      created_at,
      updated_at: created_at,
      postponed_until: None,
      buried_until: None,
    }
  }

  /// True while a postponement or burial is still in effect at `now`
  pub fn is_suspended(&self, now: DateTime<Utc>) -> bool {
    self.postponed_until.is_some_and(|until| until > now)
      || self.buried_until.is_some_and(|until| until > now)
  }
}
