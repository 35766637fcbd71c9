//! Study flow: the JSON review endpoint plus the server-rendered
//! spaced-repetition session pages.
//!
//! The HTML flow keeps its state in the session store; the session ID
//! travels in a hidden form field. The in-flight rating guard is persisted
//! before the review hits the database, so a duplicate submit arriving in
//! the gap is rejected rather than double-counted.

use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;

use crate::db::{self, DbPool, LogOnError};
use crate::domain::ReviewQuality;
use crate::session::{self, RatingError, StudySession};

use super::templates::{RateForm, SessionForm, StudyTemplate};
use super::{notice, session_expired, ApiError};

// ============================================================================
// JSON API
// ============================================================================

#[derive(Deserialize)]
pub struct ReviewBody {
  pub quality: u8,
}

/// Record a review for a card and return any badges it earned
pub async fn api_record_review(
  State(pool): State<DbPool>,
  Path(card_id): Path<i64>,
  Json(body): Json<ReviewBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
  let Some(quality) = ReviewQuality::from_u8(body.quality) else {
    return Err(ApiError::Validation(format!(
      "Invalid quality rating: {}",
      body.quality
    )));
  };

  let conn = db::try_lock(&pool)?;
  if !db::apply_review(&conn, card_id, quality.as_u8())? {
    return Err(ApiError::NotFound("Card"));
  }
  let badges = db::check_and_award(&conn)?;
  Ok(Json(json!({ "message": "Review recorded", "badges_earned": badges })))
}

// ============================================================================
// HTML flow
// ============================================================================

pub async fn study_start(State(pool): State<DbPool>, Path(deck_id): Path<i64>) -> Response {
  let due = match db::try_lock(&pool) {
    Ok(conn) => db::get_deck(&conn, deck_id)
      .log_warn("Failed to load deck")
      .flatten()
      .map(|_| db::get_due_cards(&conn, deck_id).log_warn_default("Failed to load due cards")),
    Err(_) => None,
  };

  let Some(due) = due else {
    return Redirect::to("/").into_response();
  };

  let cards = due.into_iter().map(db::CardRow::into_card).collect();
  let session = StudySession::new(deck_id, cards);
  let session_id = session::generate_session_id();
  session::put_study_session(&session_id, session.clone());

  render_study(&pool, &session_id, &session, vec![], String::new())
}

pub async fn study_flip(State(pool): State<DbPool>, Form(form): Form<SessionForm>) -> Response {
  let Some(session) = session::with_study_session(&form.session_id, |s| {
    s.flip();
    s.clone()
  }) else {
    return session_expired();
  };

  render_study(&pool, &form.session_id, &session, vec![], String::new())
}

pub async fn study_rate(State(pool): State<DbPool>, Form(form): Form<RateForm>) -> Response {
  let Some(quality) = ReviewQuality::from_u8(form.quality) else {
    let Some(session) = session::get_study_session(&form.session_id) else {
      return session_expired();
    };
    return render_study(
      &pool,
      &form.session_id,
      &session,
      vec![],
      notice("error", "Invalid rating"),
    );
  };

  // Claim the rating slot in place, so a duplicate submit racing this one
  // sees the guard instead of a stale copy
  let Some((claim, session)) = session::with_study_session(&form.session_id, |s| {
    (s.begin_rating().map(|card| card.id), s.clone())
  }) else {
    return session_expired();
  };

  let card_id = match claim {
    Ok(card_id) => card_id,
    Err(RatingError::NotFlipped) => {
      return render_study(
        &pool,
        &form.session_id,
        &session,
        vec![],
        notice("warning", "Flip the card before rating it"),
      );
    }
    Err(RatingError::SubmissionInFlight) => {
      return render_study(
        &pool,
        &form.session_id,
        &session,
        vec![],
        notice("warning", "A rating is already being recorded"),
      );
    }
    Err(RatingError::SessionComplete) => {
      return render_study(
        &pool,
        &form.session_id,
        &session,
        vec![],
        notice("info", "All cards reviewed"),
      );
    }
  };

  let outcome = match db::try_lock(&pool) {
    Ok(conn) => db::apply_review(&conn, card_id, quality.as_u8())
      .and_then(|_| db::check_and_award(&conn))
      .log_warn("Failed to record review"),
    Err(_) => None,
  };

  let success = outcome.is_some();
  let Some(session) = session::with_study_session(&form.session_id, |s| {
    s.complete_rating(success);
    s.clone()
  }) else {
    return session_expired();
  };

  let (badges, notice_html) = match outcome {
    Some(badges) => (badges, String::new()),
    None => (
      vec![],
      notice("error", "Failed to record the review. Rate the card again."),
    ),
  };

  render_study(&pool, &form.session_id, &session, badges, notice_html)
}

fn render_study(
  pool: &DbPool,
  session_id: &str,
  session: &StudySession,
  badges: Vec<String>,
  notice_html: String,
) -> Response {
  let deck_name = match db::try_lock(pool) {
    Ok(conn) => db::get_deck(&conn, session.deck_id)
      .log_warn("Failed to load deck")
      .flatten()
      .map(|deck| deck.name)
      .unwrap_or_default(),
    Err(_) => String::new(),
  };

  let (question, answer) = match session.current_card() {
    Some(card) => (card.question.clone(), card.answer.clone()),
    None => (String::new(), String::new()),
  };

  let template = StudyTemplate {
    session_id: session_id.to_string(),
    deck_id: session.deck_id,
    deck_name,
    question,
    answer,
    flipped: session.is_flipped(),
    complete: session.is_complete(),
    reviewed: session.reviewed_count(),
    total: session.total(),
    progress_percent: (session.progress() * 100.0).round() as u32,
    badges,
    notice: notice_html,
  };
  Html(template.render().unwrap_or_default()).into_response()
}
