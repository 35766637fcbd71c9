//! Deck export in json, csv and anki (tab-separated) formats.
//!
//! csv and anki exports are served as downloads with a filename derived
//! from the deck name; json is returned inline.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::{self, CardRow, DbPool};

use super::ApiError;

pub async fn export_deck(
  State(pool): State<DbPool>,
  Path((deck_id, format)): Path<(i64, String)>,
) -> Result<Response, ApiError> {
  let (deck, cards) = {
    let conn = db::try_lock(&pool)?;
    let deck = db::get_deck(&conn, deck_id)?.ok_or(ApiError::NotFound("Deck"))?;
    let cards = db::get_cards_by_deck(&conn, deck_id)?;
    (deck, cards)
  };

  match format.as_str() {
    "json" => Ok(Json(json!({ "deck": deck, "cards": cards })).into_response()),
    "csv" => Ok(attachment(
      &format!("{}.csv", deck.name),
      "text/csv; charset=utf-8",
      to_csv(&cards),
    )),
    "anki" => Ok(attachment(
      &format!("{}_anki.txt", deck.name),
      "text/plain; charset=utf-8",
      to_anki(&cards),
    )),
    _ => Err(ApiError::Validation(format!(
      "Unknown export format: {}",
      format
    ))),
  }
}

fn attachment(filename: &str, content_type: &'static str, body: String) -> Response {
  // Quotes would break the header value
  let filename = filename.replace('"', "");
  (
    [
      (header::CONTENT_TYPE, content_type.to_string()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", filename),
      ),
    ],
    body,
  )
    .into_response()
}

fn to_csv(cards: &[CardRow]) -> String {
  let mut out = String::from("Question,Answer\r\n");
  for card in cards {
    out.push_str(&csv_field(&card.question));
    out.push(',');
    out.push_str(&csv_field(&card.answer));
    out.push_str("\r\n");
  }
  out
}

/// Quote a field when it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
  if value.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", value.replace('"', "\"\""))
  } else {
    value.to_string()
  }
}

/// Anki's plain-text import format: one `question<TAB>answer` line per card
fn to_anki(cards: &[CardRow]) -> String {
  let mut out = String::new();
  for card in cards {
    out.push_str(&anki_field(&card.question));
    out.push('\t');
    out.push_str(&anki_field(&card.answer));
    out.push('\n');
  }
  out
}

fn anki_field(value: &str) -> String {
  value.replace(['\t', '\n', '\r'], " ")
}
