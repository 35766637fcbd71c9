//! Aggregate study statistics for the analytics surface

use chrono::Utc;
use rusqlite::{Connection, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StudyStats {
  pub total_studied: i64,
  pub due_today: i64,
  pub average_retention: f64,
}

pub fn get_study_stats(conn: &Connection) -> Result<StudyStats> {
  let total_studied: i64 = conn.query_row(
    "SELECT COUNT(*) FROM review_schedule WHERE last_reviewed IS NOT NULL",
    [],
    |row| row.get(0),
  )?;

  let due_today: i64 = conn.query_row(
    "SELECT COUNT(*) FROM review_schedule WHERE next_review <= ?1",
    [Utc::now().to_rfc3339()],
    |row| row.get(0),
  )?;

  let avg_easiness: f64 = conn.query_row(
    "SELECT AVG(easiness_factor) FROM review_schedule WHERE last_reviewed IS NOT NULL",
    [],
    |row| row.get::<_, Option<f64>>(0).map(|v| v.unwrap_or(0.0)),
  )?;

  Ok(StudyStats {
    total_studied,
    due_today,
    average_retention: (avg_easiness * 100.0).round() / 100.0,
  })
}
