//! JSON HTTP API.

pub mod goals;
pub mod records;
pub mod subtopics;
pub mod suggestions;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::db::DbLockError;
use crate::repository::RepositoryError;
use crate::state::AppState;

/// Error returned by handlers, rendered as `{ "error": message }`
#[derive(Debug)]
pub enum ApiError {
  BadRequest(String),
  Repository(RepositoryError),
}

impl std::fmt::Display for ApiError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::BadRequest(msg) => write!(f, "{}", msg),
      Self::Repository(e) => write!(f, "{}", e),
    }
  }
}

impl From<RepositoryError> for ApiError {
  fn from(e: RepositoryError) -> Self {
    Self::Repository(e)
  }
}

impl From<rusqlite::Error> for ApiError {
  fn from(e: rusqlite::Error) -> Self {
    Self::Repository(e.into())
  }
}

impl From<DbLockError> for ApiError {
  fn from(e: DbLockError) -> Self {
    Self::Repository(e.into())
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      Self::BadRequest(_) => StatusCode::BAD_REQUEST,
      Self::Repository(RepositoryError::NotFound { .. }) => StatusCode::NOT_FOUND,
      Self::Repository(e) => {
        tracing::error!("Request failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
      }
    };
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/users/{user_id}/suggestions", get(suggestions::get_suggestions))
    .route("/users/{user_id}/goals", get(goals::get_goals))
    .route("/chapters", post(records::create_chapter))
    .route("/subtopics", post(records::create_subtopic))
    .route("/subtopics/{id}/review", post(subtopics::submit_review))
    .route("/subtopics/{id}/postpone", post(subtopics::postpone_subtopic))
    .route("/subtopics/{id}/bury", post(subtopics::bury_subtopic))
    .route("/sessions", post(records::create_session))
    .route("/exams", post(records::create_exam))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
