//! Card JSON API.
//!
//! `choices` crosses the API boundary as a JSON array and is stored as its
//! raw encoded text; responses expose the stored text unchanged.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::db::{self, DbPool};

use super::ApiError;

#[derive(Deserialize)]
pub struct NewCard {
  pub question: String,
  pub answer: String,
  #[serde(default)]
  pub choices: Option<Vec<String>>,
}

pub async fn api_list_cards(
  State(pool): State<DbPool>,
  Path(deck_id): Path<i64>,
) -> Result<Json<Vec<db::CardRow>>, ApiError> {
  let conn = db::try_lock(&pool)?;
  if db::get_deck(&conn, deck_id)?.is_none() {
    return Err(ApiError::NotFound("Deck"));
  }
  Ok(Json(db::get_cards_by_deck(&conn, deck_id)?))
}

pub async fn api_create_card(
  State(pool): State<DbPool>,
  Path(deck_id): Path<i64>,
  Json(body): Json<NewCard>,
) -> Result<Json<serde_json::Value>, ApiError> {
  let question = body.question.trim();
  let answer = body.answer.trim();
  if question.is_empty() || answer.is_empty() {
    return Err(ApiError::Validation(
      "Question and answer are required".to_string(),
    ));
  }

  let choices_json = match &body.choices {
    Some(list) if !list.is_empty() => serde_json::to_string(list).ok(),
    _ => None,
  };

  let conn = db::try_lock(&pool)?;
  if db::get_deck(&conn, deck_id)?.is_none() {
    return Err(ApiError::NotFound("Deck"));
  }
  let id = db::insert_card(&conn, deck_id, question, answer, choices_json.as_deref())?;
  Ok(Json(json!({ "id": id, "message": "Card created" })))
}

pub async fn api_delete_card(
  State(pool): State<DbPool>,
  Path(card_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
  let conn = db::try_lock(&pool)?;
  if db::get_card(&conn, card_id)?.is_none() {
    return Err(ApiError::NotFound("Card"));
  }
  db::delete_card(&conn, card_id)?;
  Ok(Json(json!({ "message": "Card deleted" })))
}

/// Cards due for review right now; an empty list is a valid response
pub async fn api_due_cards(
  State(pool): State<DbPool>,
  Path(deck_id): Path<i64>,
) -> Result<Json<Vec<db::CardRow>>, ApiError> {
  let conn = db::try_lock(&pool)?;
  if db::get_deck(&conn, deck_id)?.is_none() {
    return Err(ApiError::NotFound("Deck"));
  }
  Ok(Json(db::get_due_cards(&conn, deck_id)?))
}
