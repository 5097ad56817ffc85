//! Exam-driven weekly and monthly study targets.
//!
//! For every upcoming exam the remaining workload (subtopics still to master
//! to hit the exam's completion target) is spread evenly over the weeks left.
//! Actual progress comes from logged study sessions. Plans are computed on
//! demand and not stored.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::db::{self, DbPool};
use crate::domain::{Exam, StudySession, Subtopic, SubtopicStatus};
use crate::repository::RepositoryError;

/// Hours budgeted per new subtopic, review time included
const HOURS_PER_SUBTOPIC: f64 = 0.75;
const MIN_WEEKLY_HOURS: f64 = 5.0;
const WEEKS_PER_MONTH: i64 = 4;

/// Sessions considered when measuring progress
pub const SESSION_HISTORY_LIMIT: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct GoalMetrics {
    pub total_subtopics: usize,
    pub mastered_subtopics: usize,
    pub total_hours_studied: f64,
    pub remaining_weeks: i64,
    pub target_completion_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    pub target_subtopics: i64,
    pub target_hours: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub actual_subtopics_covered: i64,
    pub actual_hours_spent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalPeriod {
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BehindBy {
    pub subtopics: i64,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalPlan {
    pub exam_id: i64,
    pub period: GoalPeriod,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(flatten)]
    pub targets: Targets,
    #[serde(flatten)]
    pub progress: Progress,
    pub behind_by: BehindBy,
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn calculate_goal_metrics(
    subtopics: &[Subtopic],
    sessions: &[StudySession],
    exam: &Exam,
    now: DateTime<Utc>,
) -> GoalMetrics {
    let mastered_subtopics = subtopics
        .iter()
        .filter(|s| s.status == SubtopicStatus::Mastered)
        .count();

    let total_minutes: i64 = sessions.iter().filter_map(|s| s.duration).sum();

    let remaining_ms = (exam.date - now).num_milliseconds() as f64;
    let week_ms = Duration::weeks(1).num_milliseconds() as f64;
    let remaining_weeks = ((remaining_ms / week_ms).ceil() as i64).max(1);

    GoalMetrics {
        total_subtopics: subtopics.len(),
        mastered_subtopics,
        total_hours_studied: total_minutes as f64 / 60.0,
        remaining_weeks,
        target_completion_percentage: exam.target_completion_percentage,
    }
}

pub fn calculate_weekly_targets(metrics: &GoalMetrics) -> Targets {
    let required =
        (metrics.total_subtopics as f64 * (metrics.target_completion_percentage / 100.0)).ceil() as i64;
    let remaining = (required - metrics.mastered_subtopics as i64).max(0);
    let per_week = (remaining as f64 / metrics.remaining_weeks.max(1) as f64).ceil() as i64;
    let hours = (per_week as f64 * HOURS_PER_SUBTOPIC).max(MIN_WEEKLY_HOURS);

    Targets {
        target_subtopics: per_week,
        target_hours: round_one_decimal(hours),
    }
}

pub fn calculate_monthly_targets(metrics: &GoalMetrics) -> Targets {
    let weekly = calculate_weekly_targets(metrics);
    Targets {
        target_subtopics: weekly.target_subtopics * WEEKS_PER_MONTH,
        target_hours: weekly.target_hours * WEEKS_PER_MONTH as f64,
    }
}

fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

fn day_start(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// Last millisecond before `day` begins
fn before(day: NaiveDate) -> NaiveDateTime {
    day_start(day) - Duration::milliseconds(1)
}

/// Sunday 00:00 through Saturday 23:59:59.999 of the week containing `date`
pub fn week_bounds<Tz: TimeZone>(date: &DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
    let tz = date.timezone();
    let day = date.date_naive();
    let sunday = day - Duration::days(day.weekday().num_days_from_sunday() as i64);
    let next_sunday = sunday + Duration::days(7);

    (localize(&tz, day_start(sunday)), localize(&tz, before(next_sunday)))
}

/// First day 00:00 through last day 23:59:59.999 of the month containing `date`
pub fn month_bounds<Tz: TimeZone>(date: &DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
    let tz = date.timezone();
    let day = date.date_naive();
    let first = day - Duration::days(day.day0() as i64);
    let next_first = first.checked_add_months(Months::new(1)).unwrap_or(first);

    (localize(&tz, day_start(first)), localize(&tz, before(next_first)))
}

/// Hours and distinct subtopics from sessions that started within [start, end]
pub fn calculate_actual_progress(
    sessions: &[StudySession],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Progress {
    let in_period: Vec<&StudySession> = sessions
        .iter()
        .filter(|s| s.start_time >= start && s.start_time <= end)
        .collect();

    let minutes: i64 = in_period.iter().filter_map(|s| s.duration).sum();
    let covered: HashSet<i64> = in_period
        .iter()
        .flat_map(|s| s.subtopic_ids_studied.iter().copied())
        .collect();

    Progress {
        actual_subtopics_covered: covered.len() as i64,
        actual_hours_spent: round_one_decimal(minutes as f64 / 60.0),
    }
}

fn goal_plan(
    exam_id: i64,
    period: GoalPeriod,
    (start, end): (DateTime<Utc>, DateTime<Utc>),
    targets: Targets,
    sessions: &[StudySession],
) -> GoalPlan {
    let progress = calculate_actual_progress(sessions, start, end);
    GoalPlan {
        exam_id,
        period,
        start_date: start,
        end_date: end,
        targets,
        progress,
        behind_by: BehindBy {
            subtopics: (targets.target_subtopics - progress.actual_subtopics_covered).max(0),
            hours: (targets.target_hours - progress.actual_hours_spent).max(0.0),
        },
    }
}

/// Weekly and monthly plans for every exam still ahead of `now`
pub fn plan_goals<Tz: TimeZone>(
    subtopics: &[Subtopic],
    sessions: &[StudySession],
    exams: &[Exam],
    now: &DateTime<Tz>,
) -> Vec<GoalPlan> {
    let now_utc = now.with_timezone(&Utc);
    let to_utc = |(start, end): (DateTime<Tz>, DateTime<Tz>)| (start.with_timezone(&Utc), end.with_timezone(&Utc));
    let week = to_utc(week_bounds(now));
    let month = to_utc(month_bounds(now));

    exams
        .iter()
        .filter(|exam| exam.date > now_utc)
        .flat_map(|exam| {
            let metrics = calculate_goal_metrics(subtopics, sessions, exam, now_utc);
            [
                goal_plan(exam.id, GoalPeriod::Weekly, week, calculate_weekly_targets(&metrics), sessions),
                goal_plan(exam.id, GoalPeriod::Monthly, month, calculate_monthly_targets(&metrics), sessions),
            ]
        })
        .collect()
}

/// Load a user's data and compute their goal plans
pub fn load_goal_plans<Tz: TimeZone>(
    pool: &DbPool,
    user_id: &str,
    now: &DateTime<Tz>,
) -> Result<Vec<GoalPlan>, RepositoryError> {
    let conn = db::try_lock(pool)?;
    let subtopics = db::get_user_subtopics(&conn, user_id)?;
    let sessions = db::get_user_study_sessions(&conn, user_id, SESSION_HISTORY_LIMIT)?;
    let exams = db::get_user_exams(&conn, user_id)?;

    Ok(plan_goals(&subtopics, &sessions, &exams, now))
}
