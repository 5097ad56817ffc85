use axum::{
  extract::{Path, State},
  Json,
};
use chrono::Local;

use super::ApiResult;
use crate::services::goals::{load_goal_plans, GoalPlan};
use crate::state::AppState;

pub async fn get_goals(State(state): State<AppState>, Path(user_id): Path<String>) -> ApiResult<Vec<GoalPlan>> {
  let plans = load_goal_plans(&state.pool, &user_id, &Local::now())?;
  Ok(Json(plans))
}
