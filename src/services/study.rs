//! Study workflow: building today's queue and recording answers.
//!
//! This is the layer that owns subtopic lifecycle transitions. The scheduler
//! itself only reads status; here a rating is run through SM-2 and the
//! result (plus the new status) is written back.

use chrono::{DateTime, TimeZone, Utc};

use crate::db::{self, DbPool};
use crate::domain::{Subtopic, SubtopicStatus, SuggestionResult};
use crate::repository::{ItemRepository, RepositoryError};
use crate::srs::sm2::{clamp_rating, update_sm2_at, Sm2Result, Sm2State};
use crate::srs::suggestions::{suggest, SuggestionOptions};

/// Interval (days) at which a passing subtopic counts as mastered
pub const MASTERY_INTERVAL_DAYS: i64 = 21;

/// Fetch the user's pool and build suggestions from it.
///
/// A storage failure is returned as an error, never as an empty queue.
pub fn get_study_suggestions<R, Tz>(
    repo: &R,
    user_id: &str,
    now: &DateTime<Tz>,
    options: &SuggestionOptions,
) -> Result<SuggestionResult, RepositoryError>
where
    R: ItemRepository,
    Tz: TimeZone,
{
    let pool = repo.fetch_item_pool(user_id)?;
    Ok(suggest(&pool, now, options, repo))
}

/// Status after a review with the given SM-2 outcome
pub fn next_status(result: &Sm2Result) -> SubtopicStatus {
    if result.repetitions == 0 {
        SubtopicStatus::Learning
    } else if result.interval >= MASTERY_INTERVAL_DAYS {
        SubtopicStatus::Mastered
    } else if result.repetitions >= 2 {
        SubtopicStatus::Reviewing
    } else {
        SubtopicStatus::Learning
    }
}

/// Apply a review outcome to a subtopic in memory
pub fn apply_review(subtopic: &mut Subtopic, rating: f64, now: DateTime<Utc>) {
    let current = Sm2State {
        ease_factor: subtopic.ease_factor,
        interval: subtopic.interval,
        repetitions: subtopic.repetitions,
    };
    let result = update_sm2_at(current, rating, now);

    subtopic.ease_factor = result.ease_factor;
    subtopic.interval = result.interval;
    subtopic.repetitions = result.repetitions;
    subtopic.next_review_date = result.next_review_date;
    subtopic.last_review_date = Some(now);
    subtopic.last_performance_rating = Some(clamp_rating(rating));
    subtopic.status = next_status(&result);
    subtopic.updated_at = now;
}

/// Record a rating for a subtopic and persist the new schedule
pub fn record_review(
    pool: &DbPool,
    subtopic_id: i64,
    rating: f64,
    now: DateTime<Utc>,
) -> Result<Subtopic, RepositoryError> {
    let conn = db::try_lock(pool)?;

    let mut subtopic = db::get_subtopic_by_id(&conn, subtopic_id)?.ok_or(RepositoryError::NotFound {
        kind: "Subtopic",
        id: subtopic_id,
    })?;

    apply_review(&mut subtopic, rating, now);
    db::update_subtopic_review(&conn, &subtopic)?;

    tracing::debug!(
        subtopic_id,
        rating = clamp_rating(rating),
        interval = subtopic.interval,
        status = subtopic.status.as_str(),
        "Recorded review"
    );

    Ok(subtopic)
}

/// Hide a subtopic from suggestions until `until` (None clears it)
pub fn postpone(
    pool: &DbPool,
    subtopic_id: i64,
    until: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), RepositoryError> {
    let conn = db::try_lock(pool)?;
    if !db::set_postponed_until(&conn, subtopic_id, until, now)? {
        return Err(RepositoryError::NotFound {
            kind: "Subtopic",
            id: subtopic_id,
        });
    }
    Ok(())
}

/// Bury a subtopic until `until` (None clears it)
pub fn bury(
    pool: &DbPool,
    subtopic_id: i64,
    until: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), RepositoryError> {
    let conn = db::try_lock(pool)?;
    if !db::set_buried_until(&conn, subtopic_id, until, now)? {
        return Err(RepositoryError::NotFound {
            kind: "Subtopic",
            id: subtopic_id,
        });
    }
    Ok(())
}
