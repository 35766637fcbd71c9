//! Analytics: aggregate stats and badge listings

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use axum::Json;

use crate::db::{self, DbPool, LogOnError, StudyStats};

use super::templates::AnalyticsTemplate;
use super::ApiError;

pub async fn api_stats(State(pool): State<DbPool>) -> Result<Json<StudyStats>, ApiError> {
  let conn = db::try_lock(&pool)?;
  Ok(Json(db::get_study_stats(&conn)?))
}

pub async fn api_badges(State(pool): State<DbPool>) -> Result<Json<Vec<db::BadgeRow>>, ApiError> {
  let conn = db::try_lock(&pool)?;
  Ok(Json(db::get_all_badges(&conn)?))
}

pub async fn analytics_page(State(pool): State<DbPool>) -> Html<String> {
  let (stats, badges) = match db::try_lock(&pool) {
    Ok(conn) => (
      db::get_study_stats(&conn).log_warn("Failed to load stats"),
      db::get_all_badges(&conn).log_warn_default("Failed to load badges"),
    ),
    Err(_) => (None, vec![]),
  };

  let stats = stats.unwrap_or(StudyStats {
    total_studied: 0,
    due_today: 0,
    average_retention: 0.0,
  });

  let template = AnalyticsTemplate { stats, badges };
  Html(template.render().unwrap_or_default())
}
