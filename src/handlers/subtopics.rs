use axum::{
  extract::{Path, State},
  Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{ApiError, ApiResult};
use crate::domain::Subtopic;
use crate::services::study;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ReviewRequest {
  pub rating: f64,
}

#[derive(Deserialize)]
pub struct SuspendRequest {
  /// `null` clears the suspension
  pub until: Option<DateTime<Utc>>,
}

pub async fn submit_review(
  State(state): State<AppState>,
  Path(id): Path<i64>,
  Json(request): Json<ReviewRequest>,
) -> ApiResult<Subtopic> {
  if !request.rating.is_finite() {
    return Err(ApiError::BadRequest("rating must be a number".into()));
  }
  let subtopic = study::record_review(&state.pool, id, request.rating, Utc::now())?;
  Ok(Json(subtopic))
}

pub async fn postpone_subtopic(
  State(state): State<AppState>,
  Path(id): Path<i64>,
  Json(request): Json<SuspendRequest>,
) -> ApiResult<serde_json::Value> {
  study::postpone(&state.pool, id, request.until, Utc::now())?;
  Ok(Json(serde_json::json!({ "id": id, "postponed_until": request.until })))
}

pub async fn bury_subtopic(
  State(state): State<AppState>,
  Path(id): Path<i64>,
  Json(request): Json<SuspendRequest>,
) -> ApiResult<serde_json::Value> {
  study::bury(&state.pool, id, request.until, Utc::now())?;
  Ok(Json(serde_json::json!({ "id": id, "buried_until": request.until })))
}
