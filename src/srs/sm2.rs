use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_EASE_FACTOR: f64 = 1.3;
pub const MAX_RATING: f64 = 5.0;

/// Ratings below this are lapses
pub const PASSING_RATING: f64 = 3.0;

/// Upper bound on a scheduled interval (about a century)
pub const MAX_INTERVAL_DAYS: i64 = 36_500;

/// The part of a subtopic's state that SM-2 reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sm2State {
  pub ease_factor: f64,
  pub interval: i64,
  pub repetitions: i64,
}

impl Default for Sm2State {
  fn default() -> Self {
    Self {
      ease_factor: 2.5,
      interval: 0,
      repetitions: 0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sm2Result {
  pub ease_factor: f64,
  pub interval: i64,
  pub repetitions: i64,
  pub next_review_date: DateTime<Utc>,
}

impl Sm2Result {
  pub fn state(&self) -> Sm2State {
    Sm2State {
      ease_factor: self.ease_factor,
      interval: self.interval,
      repetitions: self.repetitions,
    }
  }
}

/// Clamp a raw rating into 0..=5. NaN counts as a blackout.
pub fn clamp_rating(rating: f64) -> f64 {
  if rating.is_nan() {
    0.0
  } else {
    rating.clamp(0.0, MAX_RATING)
  }
}

/// SM-2 update scheduled from the current wall-clock time.
pub fn update_sm2(current: Sm2State, rating: f64) -> Sm2Result {
  update_sm2_at(current, rating, Utc::now())
}

/// SM-2 update with an explicit `now`.
///
/// The interval for the third and later passes is computed from the ease
/// factor *before* this rating is applied. Rounding is half away from zero,
/// and the result is capped at [`MAX_INTERVAL_DAYS`].
pub fn update_sm2_at(current: Sm2State, rating: f64, now: DateTime<Utc>) -> Sm2Result {
  let q = clamp_rating(rating);

  let (interval, repetitions) = if q < PASSING_RATING {
    (1, 0)
  } else {
    let repetitions = current.repetitions + 1;
    let interval = match repetitions {
      1 => 1,
      2 => 6,
      _ => ((current.interval as f64) * current.ease_factor).round() as i64,
    };
    (interval.clamp(1, MAX_INTERVAL_DAYS), repetitions)
  };

  // EF' = EF - 0.8 + 0.28q - 0.02q^2, same as EF + (0.1 - (5-q)(0.08 + (5-q)0.02))
  let ease_factor = (current.ease_factor - 0.8 + 0.28 * q - 0.02 * q * q).max(MIN_EASE_FACTOR);

  Sm2Result {
    ease_factor,
    interval,
    repetitions,
    next_review_date: now
      .checked_add_signed(Duration::days(interval))
      .unwrap_or(DateTime::<Utc>::MAX_UTC),
  }
}
