//! Daily study suggestions.
//!
//! Given a snapshot of a user's subtopics and the current time, builds a
//! bounded queue of two kinds of work:
//! - **review**: learning/reviewing subtopics whose next review date has passed
//! - **grind**: new material (mature before fresh) and weak learning subtopics
//!
//! Both lists are interleaved round-robin across subjects, capped, scored,
//! merged and sorted by descending priority. Grind volume is further limited
//! by a daily new-item quota.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::interleave::{round_robin, SubjectGroups};
use super::priority::{grind_priority, review_priority, SELECTION_TIE_BREAK};
use crate::domain::{
  Subtopic, SubtopicStatus, SuggestionItem, SuggestionResult, SuggestionType, UNKNOWN_SUBJECT,
};
use crate::db::LogOnError;
use crate::repository::SubjectResolver;

/// Age at which a new subtopic stops being throttled as "fresh"
const MATURITY_HOURS: i64 = 24;

/// Tuning knobs for a suggestion run.
///
/// Counts and durations are signed so out-of-range configuration can be
/// represented; negative values behave as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionOptions {
  pub max_new_items_per_day: i64,
  pub max_review_items: i64,
  pub max_grind_items: i64,
  /// Learning subtopics at or below this ease factor count as weak
  pub grind_difficulty_threshold: f64,
  /// Minutes
  pub review_time_per_item: i64,
  /// Minutes
  pub grind_time_per_item: i64,
  pub young_new_items_limit: i64,
}

impl Default for SuggestionOptions {
  fn default() -> Self {
    Self {
      max_new_items_per_day: 5,
      max_review_items: 20,
      max_grind_items: 10,
      grind_difficulty_threshold: 2.2,
      review_time_per_item: 5,
      grind_time_per_item: 15,
      young_new_items_limit: 3,
    }
  }
}

fn non_negative(value: i64) -> usize {
  usize::try_from(value.max(0)).unwrap_or(usize::MAX)
}

impl SuggestionOptions {
  fn review_cap(&self) -> usize {
    non_negative(self.max_review_items)
  }

  fn grind_cap(&self) -> usize {
    non_negative(self.max_grind_items)
  }

  fn new_per_day(&self) -> usize {
    non_negative(self.max_new_items_per_day)
  }

  fn young_limit(&self) -> usize {
    non_negative(self.young_new_items_limit)
  }

  fn estimated_minutes(&self, reviews: usize, grinds: usize) -> i64 {
    let reviews = i64::try_from(reviews).unwrap_or(i64::MAX);
    let grinds = i64::try_from(grinds).unwrap_or(i64::MAX);
    reviews
      .saturating_mul(self.review_time_per_item.max(0))
      .saturating_add(grinds.saturating_mul(self.grind_time_per_item.max(0)))
  }
}

/// Subtopics not hidden by a postponement or burial at `now`
pub fn visible_subtopics(pool: &[Subtopic], now: DateTime<Utc>) -> Vec<&Subtopic> {
  pool.iter().filter(|s| !s.is_suspended(now)).collect()
}

/// Learning/reviewing subtopics that are due
pub fn review_candidates<'a>(visible: &[&'a Subtopic], now: DateTime<Utc>) -> Vec<&'a Subtopic> {
  visible
    .iter()
    .copied()
    .filter(|s| s.next_review_date <= now && s.status.is_reviewable())
    .collect()
}

/// New material plus weak learning subtopics.
///
/// Mature new subtopics (at least a day old) all qualify. Only when none
/// exist are fresh ones admitted, oldest first, up to the young limit.
pub fn grind_candidates<'a>(
  visible: &[&'a Subtopic],
  now: DateTime<Utc>,
  options: &SuggestionOptions,
) -> Vec<&'a Subtopic> {
  let maturity_cutoff = now - Duration::hours(MATURITY_HOURS);

  let new_items: Vec<&Subtopic> = visible
    .iter()
    .copied()
    .filter(|s| s.status == SubtopicStatus::NotStarted)
    .collect();

  let mature: Vec<&Subtopic> = new_items
    .iter()
    .copied()
    .filter(|s| s.created_at <= maturity_cutoff)
    .collect();

  let mut selected_new = if !mature.is_empty() {
    mature
  } else {
    let mut young: Vec<&Subtopic> = new_items
      .into_iter()
      .filter(|s| s.created_at > maturity_cutoff)
      .collect();
    young.sort_by_key(|s| s.created_at);
    young.truncate(options.young_limit());
    young
  };

  selected_new.extend(visible.iter().copied().filter(|s| {
    s.status == SubtopicStatus::Learning && s.ease_factor <= options.grind_difficulty_threshold
  }));

  selected_new
}

/// Learning subtopics created on the same local calendar day as `now`
pub fn new_items_today<Tz: TimeZone>(visible: &[&Subtopic], now: &DateTime<Tz>) -> usize {
  let today = now.date_naive();
  let tz = now.timezone();
  visible
    .iter()
    .filter(|s| s.status == SubtopicStatus::Learning)
    .filter(|s| s.created_at.with_timezone(&tz).date_naive() == today)
    .count()
}

/// Look up each distinct chapter once. Failures and blank subjects map to "Unknown".
pub fn resolve_subjects<'a, I>(subtopics: I, resolver: &dyn SubjectResolver) -> HashMap<i64, String>
where
  I: IntoIterator<Item = &'a Subtopic>,
{
  let chapter_ids: BTreeSet<i64> = subtopics.into_iter().map(|s| s.parent_chapter_id).collect();

  chapter_ids
    .into_iter()
    .map(|chapter_id| {
      let subject = resolver
        .resolve_subject(chapter_id)
        .log_warn(&format!("Could not resolve subject for chapter {}", chapter_id))
        .flatten()
        .filter(|subject| !subject.is_empty())
        .unwrap_or_else(|| UNKNOWN_SUBJECT.to_string());
      (chapter_id, subject)
    })
    .collect()
}

fn group_by_subject<'a>(
  candidates: &[&'a Subtopic],
  subjects: &HashMap<i64, String>,
) -> SubjectGroups<&'a Subtopic> {
  let mut groups = SubjectGroups::new();
  for subtopic in candidates {
    let subject = subjects
      .get(&subtopic.parent_chapter_id)
      .map(String::as_str)
      .unwrap_or(UNKNOWN_SUBJECT);
    groups.push(subject, *subtopic);
  }
  groups
}

/// Most overdue first
fn select_reviews<'a>(mut groups: SubjectGroups<&'a Subtopic>, cap: usize) -> Vec<(String, &'a Subtopic)> {
  groups.sort_each_by(|a, b| a.next_review_date.cmp(&b.next_review_date));
  round_robin(groups, cap)
}

/// Untouched material first, then hardest (lowest ease) first
fn select_grinds<'a>(mut groups: SubjectGroups<&'a Subtopic>, cap: usize) -> Vec<(String, &'a Subtopic)> {
  groups.sort_each_by(|a, b| {
    let a_new = a.status == SubtopicStatus::NotStarted;
    let b_new = b.status == SubtopicStatus::NotStarted;
    b_new
      .cmp(&a_new)
      .then_with(|| a.ease_factor.total_cmp(&b.ease_factor))
  });
  round_robin(groups, cap)
}

/// Build today's suggestion queue.
///
/// `now` carries the learner's time zone, which decides where "today"
/// starts for the new-item quota. Deterministic for identical inputs.
pub fn suggest<Tz: TimeZone>(
  pool: &[Subtopic],
  now: &DateTime<Tz>,
  options: &SuggestionOptions,
  resolver: &dyn SubjectResolver,
) -> SuggestionResult {
  let now_utc = now.with_timezone(&Utc);

  let visible = visible_subtopics(pool, now_utc);
  let reviews = review_candidates(&visible, now_utc);
  let grinds = grind_candidates(&visible, now_utc, options);

  let quota_remaining = options.new_per_day().saturating_sub(new_items_today(&visible, now));
  let grind_cap = options.grind_cap().min(quota_remaining);

  // All subjects must be known before interleaving
  let subjects = resolve_subjects(reviews.iter().chain(grinds.iter()).copied(), resolver);

  let selected_reviews = select_reviews(group_by_subject(&reviews, &subjects), options.review_cap());
  let selected_grinds = select_grinds(group_by_subject(&grinds, &subjects), grind_cap);

  let review_count = selected_reviews.len();
  let grind_count = selected_grinds.len();

  let review_items = selected_reviews
    .into_iter()
    .enumerate()
    .map(|(index, (subject, subtopic))| SuggestionItem {
      subtopic: subtopic.clone(),
      suggestion_type: SuggestionType::Review,
      subject,
      priority: review_priority(subtopic, now_utc) + index as f64 * SELECTION_TIE_BREAK,
    });

  let grind_items = selected_grinds
    .into_iter()
    .enumerate()
    .map(|(index, (subject, subtopic))| SuggestionItem {
      subtopic: subtopic.clone(),
      suggestion_type: SuggestionType::Grind,
      subject,
      priority: grind_priority(subtopic) + index as f64 * SELECTION_TIE_BREAK,
    });

  let mut suggestions: Vec<SuggestionItem> = review_items.chain(grind_items).collect();
  suggestions.sort_by(|a, b| b.priority.total_cmp(&a.priority));

  let estimated_duration = options.estimated_minutes(review_count, grind_count);

  tracing::debug!(
    pool = pool.len(),
    visible = visible.len(),
    review_candidates = reviews.len(),
    grind_candidates = grinds.len(),
    quota_remaining,
    reviews = review_count,
    grinds = grind_count,
    estimated_duration,
    "Built study suggestions"
  );

  SuggestionResult {
    suggestions,
    estimated_duration,
  }
}
