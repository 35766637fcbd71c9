//! Deck directory operations

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct DeckRow {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub created_at: String,
  pub card_count: i64,
}

pub fn insert_deck(conn: &Connection, name: &str, description: &str) -> Result<i64> {
  conn.execute(
    "INSERT INTO decks (name, description, created_at) VALUES (?1, ?2, ?3)",
    params![name, description, Utc::now().to_rfc3339()],
  )?;
  Ok(conn.last_insert_rowid())
}

/// All decks with their card counts, newest first
pub fn get_all_decks(conn: &Connection) -> Result<Vec<DeckRow>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT d.id, d.name, d.description, d.created_at, COUNT(c.id) AS card_count
    FROM decks d
    LEFT JOIN cards c ON d.id = c.deck_id
    GROUP BY d.id
    ORDER BY d.created_at DESC
    "#,
  )?;

  let decks = stmt
    .query_map([], row_to_deck)?
    .collect::<Result<Vec<_>>>()?;
  Ok(decks)
}

pub fn get_deck(conn: &Connection, deck_id: i64) -> Result<Option<DeckRow>> {
  conn
    .query_row(
      r#"
      SELECT d.id, d.name, d.description, d.created_at, COUNT(c.id) AS card_count
      FROM decks d
      LEFT JOIN cards c ON d.id = c.deck_id
      WHERE d.id = ?1
      GROUP BY d.id
      "#,
      params![deck_id],
      row_to_deck,
    )
    .optional()
}

pub fn delete_deck(conn: &Connection, deck_id: i64) -> Result<()> {
  conn.execute("DELETE FROM decks WHERE id = ?1", params![deck_id])?;
  Ok(())
}

fn row_to_deck(row: &rusqlite::Row<'_>) -> Result<DeckRow> {
  Ok(DeckRow {
    id: row.get(0)?,
    name: row.get(1)?,
    description: row.get(2)?,
    created_at: row.get(3)?,
    card_count: row.get(4)?,
  })
}
