use serde::{Deserialize, Serialize};

use super::Subtopic;

/// Subject used when a chapter cannot be resolved
pub const UNKNOWN_SUBJECT: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionType {
  /// Previously learned material that is due again
  Review,
  /// New or weak material to work through
  Grind,
}

/// A subtopic selected for today's queue. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
  #[serde(flatten)]
  pub subtopic: Subtopic,
  #[serde(rename = "type")]
  pub suggestion_type: SuggestionType,
  pub subject: String,
  pub priority: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SuggestionResult {
  /// Sorted by descending priority
  pub suggestions: Vec<SuggestionItem>,
  /// Minutes
  pub estimated_duration: i64,
}

impl SuggestionResult {
  pub fn review_count(&self) -> usize {
    self
      .suggestions
      .iter()
      .filter(|s| s.suggestion_type == SuggestionType::Review)
      .count()
  }

  pub fn grind_count(&self) -> usize {
    self.suggestions.len() - self.review_count()
  }
}
