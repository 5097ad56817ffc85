//! Priority scores for ordering the final suggestion list.
//!
//! Scores are applied after selection and only affect display order.

use chrono::{DateTime, Utc};

use crate::domain::{Subtopic, SubtopicStatus};

const REVIEW_BASE: f64 = 100.0;
const OVERDUE_DAY_WEIGHT: f64 = 10.0;
const GRIND_BASE: f64 = 50.0;
const NOT_STARTED_BONUS: f64 = 25.0;

/// Added per position in the selection order
pub const SELECTION_TIE_BREAK: f64 = 0.1;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Fractional days past the due date, zero when not yet due
pub fn days_overdue(subtopic: &Subtopic, now: DateTime<Utc>) -> f64 {
  let millis = (now - subtopic.next_review_date).num_milliseconds() as f64;
  (millis / MILLIS_PER_DAY).max(0.0)
}

pub fn review_priority(subtopic: &Subtopic, now: DateTime<Utc>) -> f64 {
  let mut priority = REVIEW_BASE + days_overdue(subtopic, now) * OVERDUE_DAY_WEIGHT;

  // Struggling items first
  if subtopic.ease_factor < 2.0 {
    priority += 20.0;
  } else if subtopic.ease_factor < 2.3 {
    priority += 10.0;
  }

  if subtopic.repetitions < 3 {
    priority += 5.0;
  }

  priority
}

pub fn grind_priority(subtopic: &Subtopic) -> f64 {
  let mut priority = GRIND_BASE;

  if subtopic.status == SubtopicStatus::NotStarted {
    priority += NOT_STARTED_BONUS;
  } else {
    priority += (2.5 - subtopic.ease_factor) * 20.0;
  }

  priority -= subtopic.repetitions as f64 * 2.0;

  priority.max(0.0)
}
