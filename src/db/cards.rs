//! Card CRUD and due-card queries

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};
use serde::Serialize;

use crate::domain::{Card, CardKind};

/// Card as stored: `choices` is the raw JSON-encoded payload (or NULL),
/// which is what the JSON API exposes. Sessions resolve it into a
/// [`CardKind`] exactly once via [`CardRow::into_card`].
#[derive(Debug, Clone, Serialize)]
pub struct CardRow {
  pub id: i64,
  pub deck_id: i64,
  pub question: String,
  pub answer: String,
  pub choices: Option<String>,
  pub created_at: String,
}

impl CardRow {
  /// Resolve the stored choices payload into a domain card (parse-or-degrade)
  pub fn into_card(self) -> Card {
    let kind = CardKind::resolve(self.choices.as_deref());
    Card::new(self.id, self.deck_id, self.question, self.answer, kind)
  }
}

/// Insert a card along with its initial review schedule entry.
///
/// A new card is due immediately (next_review = now), matching a fresh
/// SM-2 state.
pub fn insert_card(
  conn: &Connection,
  deck_id: i64,
  question: &str,
  answer: &str,
  choices: Option<&str>,
) -> Result<i64> {
  let now = Utc::now().to_rfc3339();
  conn.execute(
    r#"
    INSERT INTO cards (deck_id, question, answer, choices, created_at)
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
    params![deck_id, question, answer, choices, now],
  )?;
  let card_id = conn.last_insert_rowid();

  conn.execute(
    "INSERT INTO review_schedule (card_id, next_review) VALUES (?1, ?2)",
    params![card_id, now],
  )?;

  Ok(card_id)
}

pub fn get_card(conn: &Connection, card_id: i64) -> Result<Option<CardRow>> {
  conn
    .query_row(
      "SELECT id, deck_id, question, answer, choices, created_at FROM cards WHERE id = ?1",
      params![card_id],
      row_to_card,
    )
    .optional()
}

pub fn get_cards_by_deck(conn: &Connection, deck_id: i64) -> Result<Vec<CardRow>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, deck_id, question, answer, choices, created_at
    FROM cards
    WHERE deck_id = ?1
    ORDER BY created_at
    "#,
  )?;

  let cards = stmt
    .query_map(params![deck_id], row_to_card)?
    .collect::<Result<Vec<_>>>()?;
  Ok(cards)
}

/// Cards in the deck whose schedule marks them ready for review now.
/// An empty result is a valid "nothing due" state, not an error.
pub fn get_due_cards(conn: &Connection, deck_id: i64) -> Result<Vec<CardRow>> {
  let now = Utc::now().to_rfc3339();
  let mut stmt = conn.prepare(
    r#"
    SELECT c.id, c.deck_id, c.question, c.answer, c.choices, c.created_at
    FROM cards c
    JOIN review_schedule s ON c.id = s.card_id
    WHERE c.deck_id = ?1 AND s.next_review <= ?2
    ORDER BY s.next_review
    "#,
  )?;

  let cards = stmt
    .query_map(params![deck_id, now], row_to_card)?
    .collect::<Result<Vec<_>>>()?;
  Ok(cards)
}

pub fn delete_card(conn: &Connection, card_id: i64) -> Result<()> {
  conn.execute("DELETE FROM cards WHERE id = ?1", params![card_id])?;
  Ok(())
}

fn row_to_card(row: &rusqlite::Row<'_>) -> Result<CardRow> {
  Ok(CardRow {
    id: row.get(0)?,
    deck_id: row.get(1)?,
    question: row.get(2)?,
    answer: row.get(3)?,
    choices: row.get(4)?,
    created_at: row.get(5)?,
  })
}
