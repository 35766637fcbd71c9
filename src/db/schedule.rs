//! Per-card review schedule updated by the SM-2 algorithm

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};

use crate::srs;

#[derive(Debug, Clone)]
pub struct ScheduleRow {
  pub easiness_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
}

pub fn get_schedule(conn: &Connection, card_id: i64) -> Result<Option<ScheduleRow>> {
  conn
    .query_row(
      r#"
      SELECT easiness_factor, interval_days, repetitions
      FROM review_schedule
      WHERE card_id = ?1
      "#,
      params![card_id],
      |row| {
        Ok(ScheduleRow {
          easiness_factor: row.get(0)?,
          interval_days: row.get(1)?,
          repetitions: row.get(2)?,
        })
      },
    )
    .optional()
}

/// Record a review: run SM-2 over the card's current schedule and store the
/// new state. Returns false when the card has no schedule row.
pub fn apply_review(conn: &Connection, card_id: i64, quality: u8) -> Result<bool> {
  let Some(schedule) = get_schedule(conn, card_id)? else {
    return Ok(false);
  };

  let result = srs::calculate_sm2(
    quality,
    schedule.easiness_factor,
    schedule.interval_days,
    schedule.repetitions,
  );

  conn.execute(
    r#"
    UPDATE review_schedule
    SET easiness_factor = ?1,
        interval_days = ?2,
        repetitions = ?3,
        next_review = ?4,
        last_reviewed = ?5
    WHERE card_id = ?6
    "#,
    params![
      result.easiness_factor,
      result.interval_days,
      result.repetitions,
      result.next_review.to_rfc3339(),
      Utc::now().to_rfc3339(),
      card_id,
    ],
  )?;

  Ok(true)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::{cards, decks};
  use crate::testing::TestEnv;

  fn card_fixture(env: &TestEnv) -> i64 {
    let deck_id = decks::insert_deck(&env.conn, "Deck", "").unwrap();
    cards::insert_card(&env.conn, deck_id, "Q", "A", None).unwrap()
  }

  #[test]
  fn test_apply_review_updates_schedule() {
    let env = TestEnv::new();
    let card_id = card_fixture(&env);

    assert!(apply_review(&env.conn, card_id, 4).unwrap());

    let schedule = get_schedule(&env.conn, card_id).unwrap().unwrap();
    assert_eq!(schedule.repetitions, 1);
    assert_eq!(schedule.interval_days, 1);

    // The card is no longer due
    let deck_id = cards::get_card(&env.conn, card_id).unwrap().unwrap().deck_id;
    assert!(cards::get_due_cards(&env.conn, deck_id).unwrap().is_empty());
  }

  #[test]
  fn test_apply_review_failed_recall_resets() {
    let env = TestEnv::new();
    let card_id = card_fixture(&env);

    apply_review(&env.conn, card_id, 5).unwrap();
    apply_review(&env.conn, card_id, 5).unwrap();
    apply_review(&env.conn, card_id, 0).unwrap();

    let schedule = get_schedule(&env.conn, card_id).unwrap().unwrap();
    assert_eq!(schedule.repetitions, 0);
    assert_eq!(schedule.interval_days, 1);
  }

  #[test]
  fn test_apply_review_unknown_card_is_false() {
    let env = TestEnv::new();
    assert!(!apply_review(&env.conn, 999, 4).unwrap());
  }
}
