use axum::{
  extract::{Path, State},
  Json,
};
use chrono::Local;

use super::ApiResult;
use crate::domain::SuggestionResult;
use crate::services::study::get_study_suggestions;
use crate::state::AppState;

/// Today's queue, with calendar days taken from the server's local time zone
pub async fn get_suggestions(
  State(state): State<AppState>,
  Path(user_id): Path<String>,
) -> ApiResult<SuggestionResult> {
  let now = Local::now();
  let result = get_study_suggestions(&state.repo, &user_id, &now, &state.options)?;
  Ok(Json(result))
}

#[cfg(test)]
mod tests {
  use super::super::test_support::server;
  use crate::db;
  use crate::domain::Subtopic;
  use chrono::{Duration, Utc};
  use serde_json::Value;

  #[tokio::test]
  async fn test_suggestions_json_shape() {
    let (env, server) = server();
    let chapter_id = env.chapter("Cells", "Biology");

    let now = Utc::now();
    let mut due = Subtopic::new("Mitosis".into(), chapter_id, "alice".into(), now - Duration::days(30));
    due.status = crate::domain::SubtopicStatus::Reviewing;
    due.repetitions = 3;
    due.interval = 10;
    due.next_review_date = now - Duration::days(2);
    db::insert_subtopic(&env.conn, &due).unwrap();

    let fresh = Subtopic::new("Meiosis".into(), chapter_id, "alice".into(), now - Duration::days(3));
    db::insert_subtopic(&env.conn, &fresh).unwrap();

    let response = server.get("/users/alice/suggestions").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let suggestions = body["suggestions"].as_array().unwrap();
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0]["type"], "review");
    assert_eq!(suggestions[0]["name"], "Mitosis");
    assert_eq!(suggestions[0]["subject"], "Biology");
    assert_eq!(suggestions[1]["type"], "grind");
    assert_eq!(body["estimated_duration"], 20);
  }

  #[tokio::test]
  async fn test_suggestions_empty_for_unknown_user() {
    let (_env, server) = server();
    let body: Value = server.get("/users/nobody/suggestions").await.json();
    assert_eq!(body["suggestions"].as_array().unwrap().len(), 0);
    assert_eq!(body["estimated_duration"], 0);
  }

  #[tokio::test]
  async fn test_storage_failure_is_500() {
    let (env, server) = server();
    env.conn.execute_batch("DROP TABLE subtopics;").unwrap();

    let response = server.get("/users/alice/suggestions").await;
    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Storage error"));
  }
}
