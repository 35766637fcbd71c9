//! Quiz result history

use chrono::Utc;
use rusqlite::{params, Connection, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct QuizResultRow {
  pub id: i64,
  pub deck_id: i64,
  pub score: i64,
  pub total: i64,
  pub completed_at: String,
}

pub fn save_quiz_result(conn: &Connection, deck_id: i64, score: i64, total: i64) -> Result<i64> {
  conn.execute(
    "INSERT INTO quiz_results (deck_id, score, total, completed_at) VALUES (?1, ?2, ?3, ?4)",
    params![deck_id, score, total, Utc::now().to_rfc3339()],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Most recent results for a deck, newest first
pub fn get_quiz_results(conn: &Connection, deck_id: i64, limit: i64) -> Result<Vec<QuizResultRow>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, deck_id, score, total, completed_at
    FROM quiz_results
    WHERE deck_id = ?1
    ORDER BY completed_at DESC
    LIMIT ?2
    "#,
  )?;

  let results = stmt
    .query_map(params![deck_id, limit], |row| {
      Ok(QuizResultRow {
        id: row.get(0)?,
        deck_id: row.get(1)?,
        score: row.get(2)?,
        total: row.get(3)?,
        completed_at: row.get(4)?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;
  Ok(results)
}
