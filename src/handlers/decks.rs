//! Deck handlers: the JSON API plus the server-rendered deck pages.
//!
//! Destructive actions in the HTML flow use an inline two-step confirm:
//! the first submit re-renders the page with a confirm button, the second
//! (carrying `confirmed=true`) performs the delete.

use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;

use crate::db::{self, DbPool, LogOnError};

use super::templates::{ConfirmForm, DeckTemplate, NewCardForm, NewDeckForm};
use super::{notice, render_index, ApiError};

// ============================================================================
// JSON API
// ============================================================================

#[derive(Deserialize)]
pub struct NewDeck {
  pub name: String,
  #[serde(default)]
  pub description: String,
}

pub async fn api_list_decks(
  State(pool): State<DbPool>,
) -> Result<Json<Vec<db::DeckRow>>, ApiError> {
  let conn = db::try_lock(&pool)?;
  Ok(Json(db::get_all_decks(&conn)?))
}

pub async fn api_create_deck(
  State(pool): State<DbPool>,
  Json(body): Json<NewDeck>,
) -> Result<Json<serde_json::Value>, ApiError> {
  let name = body.name.trim();
  if name.is_empty() {
    return Err(ApiError::Validation("Deck name is required".to_string()));
  }

  let conn = db::try_lock(&pool)?;
  let id = db::insert_deck(&conn, name, body.description.trim())?;
  tracing::info!("Created deck {} ({})", id, name);
  Ok(Json(json!({ "id": id, "message": "Deck created" })))
}

pub async fn api_get_deck(
  State(pool): State<DbPool>,
  Path(deck_id): Path<i64>,
) -> Result<Json<db::DeckRow>, ApiError> {
  let conn = db::try_lock(&pool)?;
  db::get_deck(&conn, deck_id)?
    .map(Json)
    .ok_or(ApiError::NotFound("Deck"))
}

pub async fn api_delete_deck(
  State(pool): State<DbPool>,
  Path(deck_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
  let conn = db::try_lock(&pool)?;
  if db::get_deck(&conn, deck_id)?.is_none() {
    return Err(ApiError::NotFound("Deck"));
  }
  db::delete_deck(&conn, deck_id)?;
  tracing::info!("Deleted deck {}", deck_id);
  Ok(Json(json!({ "message": "Deck deleted" })))
}

// ============================================================================
// HTML flow
// ============================================================================

pub async fn deck_page(State(pool): State<DbPool>, Path(deck_id): Path<i64>) -> Response {
  render_deck(&pool, deck_id, 0, false, String::new())
}

pub async fn create_deck_form(
  State(pool): State<DbPool>,
  Form(form): Form<NewDeckForm>,
) -> Response {
  let name = form.name.trim().to_string();
  if name.is_empty() {
    return render_index(&pool, notice("error", "Deck name is required")).into_response();
  }

  let created = match db::try_lock(&pool) {
    Ok(conn) => {
      db::insert_deck(&conn, &name, form.description.trim()).log_warn("Failed to create deck")
    }
    Err(_) => None,
  };

  match created {
    Some(id) => Redirect::to(&format!("/deck/{}", id)).into_response(),
    None => render_index(&pool, notice("error", "Failed to create deck")).into_response(),
  }
}

pub async fn add_card_form(
  State(pool): State<DbPool>,
  Path(deck_id): Path<i64>,
  Form(form): Form<NewCardForm>,
) -> Response {
  let question = form.question.trim();
  let answer = form.answer.trim();
  if question.is_empty() || answer.is_empty() {
    return render_deck(
      &pool,
      deck_id,
      0,
      false,
      notice("error", "Question and answer are required"),
    );
  }

  let choices = parse_choice_lines(&form.choices, answer);
  let inserted = match db::try_lock(&pool) {
    Ok(conn) => db::insert_card(&conn, deck_id, question, answer, choices.as_deref())
      .log_warn("Failed to add card"),
    Err(_) => None,
  };

  match inserted {
    Some(_) => render_deck(&pool, deck_id, 0, false, notice("success", "Card added")),
    None => render_deck(&pool, deck_id, 0, false, notice("error", "Failed to add card")),
  }
}

pub async fn delete_card_form(
  State(pool): State<DbPool>,
  Path((deck_id, card_id)): Path<(i64, i64)>,
  Form(form): Form<ConfirmForm>,
) -> Response {
  if !form.confirmed {
    return render_deck(
      &pool,
      deck_id,
      card_id,
      false,
      notice("warning", "Delete this card? This cannot be undone."),
    );
  }

  let deleted = match db::try_lock(&pool) {
    Ok(conn) => db::delete_card(&conn, card_id)
      .log_warn("Failed to delete card")
      .is_some(),
    Err(_) => false,
  };

  if deleted {
    render_deck(&pool, deck_id, 0, false, notice("success", "Card deleted"))
  } else {
    render_deck(&pool, deck_id, 0, false, notice("error", "Failed to delete card"))
  }
}

pub async fn delete_deck_form(
  State(pool): State<DbPool>,
  Path(deck_id): Path<i64>,
  Form(form): Form<ConfirmForm>,
) -> Response {
  if !form.confirmed {
    return render_deck(
      &pool,
      deck_id,
      0,
      true,
      notice(
        "warning",
        "Delete this deck and all of its cards? This cannot be undone.",
      ),
    );
  }

  let deleted = match db::try_lock(&pool) {
    Ok(conn) => db::delete_deck(&conn, deck_id)
      .log_warn("Failed to delete deck")
      .is_some(),
    Err(_) => false,
  };

  if deleted {
    render_index(&pool, notice("success", "Deck deleted")).into_response()
  } else {
    render_deck(&pool, deck_id, 0, false, notice("error", "Failed to delete deck"))
  }
}

pub fn render_deck(
  pool: &DbPool,
  deck_id: i64,
  pending_delete: i64,
  pending_delete_deck: bool,
  notice_html: String,
) -> Response {
  let loaded = match db::try_lock(pool) {
    Ok(conn) => db::get_deck(&conn, deck_id)
      .log_warn("Failed to load deck")
      .flatten()
      .map(|deck| {
        let cards = db::get_cards_by_deck(&conn, deck_id).log_warn_default("Failed to load cards");
        (deck, cards)
      }),
    Err(_) => None,
  };

  let Some((deck, cards)) = loaded else {
    return Redirect::to("/").into_response();
  };

  let template = DeckTemplate {
    deck_id,
    deck_name: deck.name,
    description: deck.description,
    cards,
    pending_delete,
    pending_delete_deck,
    notice: notice_html,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

/// Parse the one-choice-per-line textarea into the stored JSON payload.
/// An empty textarea means the card is open-form; the correct answer is
/// always included in the stored choice list.
fn parse_choice_lines(raw: &str, answer: &str) -> Option<String> {
  let mut choices: Vec<String> = raw
    .lines()
    .map(str::trim)
    .filter(|line| !line.is_empty())
    .map(String::from)
    .collect();
  if choices.is_empty() {
    return None;
  }
  if !choices.iter().any(|c| c == answer) {
    choices.push(answer.to_string());
  }
  serde_json::to_string(&choices).ok()
}
