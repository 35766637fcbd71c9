//! Quiz flow: the JSON results API plus the server-rendered quiz pages.
//!
//! Feedback pages carry the advance delay as data; the page advances
//! itself after that many milliseconds (or on an explicit continue).
//! Saving the final score happens at most once per run, guarded by the
//! session's result-submission flags.

use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::json;

use crate::config;
use crate::db::{self, DbPool, LogOnError};
use crate::session::{self, AnswerError, QuizSession};

use super::templates::{AnswerForm, QuizResultsTemplate, QuizTemplate, SessionForm};
use super::{notice, session_expired, ApiError};

// ============================================================================
// JSON API
// ============================================================================

#[derive(Deserialize)]
pub struct QuizResultBody {
  pub deck_id: i64,
  pub score: i64,
  pub total: i64,
}

pub async fn api_save_quiz_result(
  State(pool): State<DbPool>,
  Json(body): Json<QuizResultBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
  if body.score < 0 || body.total <= 0 || body.score > body.total {
    return Err(ApiError::Validation("Invalid quiz result".to_string()));
  }

  let conn = db::try_lock(&pool)?;
  if db::get_deck(&conn, body.deck_id)?.is_none() {
    return Err(ApiError::NotFound("Deck"));
  }
  db::save_quiz_result(&conn, body.deck_id, body.score, body.total)?;
  let badges = db::check_and_award(&conn)?;
  Ok(Json(json!({ "message": "Quiz result saved", "badges_earned": badges })))
}

/// Most recent results for a deck, newest first
pub async fn api_quiz_results(
  State(pool): State<DbPool>,
  Path(deck_id): Path<i64>,
) -> Result<Json<Vec<db::QuizResultRow>>, ApiError> {
  let conn = db::try_lock(&pool)?;
  if db::get_deck(&conn, deck_id)?.is_none() {
    return Err(ApiError::NotFound("Deck"));
  }
  Ok(Json(db::get_quiz_results(
    &conn,
    deck_id,
    config::QUIZ_RESULTS_LIMIT,
  )?))
}

// ============================================================================
// HTML flow
// ============================================================================

pub async fn quiz_start(State(pool): State<DbPool>, Path(deck_id): Path<i64>) -> Response {
  let cards = match db::try_lock(&pool) {
    Ok(conn) => db::get_deck(&conn, deck_id)
      .log_warn("Failed to load deck")
      .flatten()
      .map(|_| db::get_cards_by_deck(&conn, deck_id).log_warn_default("Failed to load cards")),
    Err(_) => None,
  };

  let Some(cards) = cards else {
    return Redirect::to("/").into_response();
  };

  let cards = cards.into_iter().map(db::CardRow::into_card).collect();
  let session = QuizSession::new(deck_id, cards);
  let session_id = session::generate_session_id();
  session::put_quiz_session(&session_id, session.clone());

  render_question(&session_id, &session, String::new())
}

pub async fn quiz_answer(State(pool): State<DbPool>, Form(form): Form<AnswerForm>) -> Response {
  // Grade and, if the run turns out to be over, claim the one allowed
  // result submission in the same store access
  let Some((outcome, claimed, session)) = session::with_quiz_session(&form.session_id, |s| {
    let outcome = s.submit_answer(&form.answer);
    let claimed = matches!(outcome, Err(AnswerError::QuizFinished))
      && s.total() > 0
      && s.begin_result_submission().is_ok();
    (outcome, claimed, s.clone())
  }) else {
    return session_expired();
  };

  match outcome {
    Ok(_) => render_question(&form.session_id, &session, String::new()),
    Err(AnswerError::EmptyAnswer) => render_question(
      &form.session_id,
      &session,
      notice("warning", "Enter an answer first"),
    ),
    // Already answered: just re-render the feedback that is on screen
    Err(AnswerError::AlreadyAnswered) => {
      render_question(&form.session_id, &session, String::new())
    }
    Err(AnswerError::QuizFinished) | Err(AnswerError::ResultAlreadySubmitted) => {
      render_results(&pool, &form.session_id, &session, claimed)
    }
  }
}

pub async fn quiz_next(State(pool): State<DbPool>, Form(form): Form<SessionForm>) -> Response {
  // Advance and claim the result submission in one store access, so the
  // auto-advance timer and a manual "Next" click cannot both record the
  // score
  let Some((claimed, session)) = session::with_quiz_session(&form.session_id, |s| {
    s.advance();
    let claimed = s.is_scored() && s.total() > 0 && s.begin_result_submission().is_ok();
    (claimed, s.clone())
  }) else {
    return session_expired();
  };

  if session.is_scored() {
    render_results(&pool, &form.session_id, &session, claimed)
  } else {
    render_question(&form.session_id, &session, String::new())
  }
}

/// Re-shuffle the same cards and start over; nothing is re-fetched
pub async fn quiz_restart(State(_pool): State<DbPool>, Form(form): Form<SessionForm>) -> Response {
  let Some(session) = session::with_quiz_session(&form.session_id, |s| {
    s.restart();
    s.clone()
  }) else {
    return session_expired();
  };

  render_question(&form.session_id, &session, String::new())
}

fn render_question(session_id: &str, session: &QuizSession, notice_html: String) -> Response {
  let Some(view) = session.question_view() else {
    // Deck has no cards
    let template = QuizTemplate {
      session_id: session_id.to_string(),
      deck_id: session.deck_id,
      has_card: false,
      question_number: 0,
      total: 0,
      question: String::new(),
      is_multiple_choice: false,
      choices: vec![],
      answered: false,
      is_correct: false,
      correct_answer: String::new(),
      user_answer: String::new(),
      advance_after_ms: 0,
      progress_percent: 0,
      notice: notice_html,
    };
    return Html(template.render().unwrap_or_default()).into_response();
  };

  let is_multiple_choice = !view.choices.is_empty();
  let answered = session.feedback_pending();
  let last = session.transcript().last();
  let advance_after_ms = if is_multiple_choice {
    config::CHOICE_FEEDBACK_DELAY_MS
  } else {
    config::OPEN_FEEDBACK_DELAY_MS
  };

  let template = QuizTemplate {
    session_id: session_id.to_string(),
    deck_id: session.deck_id,
    has_card: true,
    question_number: view.number,
    total: view.total,
    question: view.question,
    is_multiple_choice,
    choices: view.choices,
    answered,
    is_correct: answered && last.map(|e| e.is_correct).unwrap_or(false),
    correct_answer: last
      .filter(|_| answered)
      .map(|e| e.correct_answer.clone())
      .unwrap_or_default(),
    user_answer: last
      .filter(|_| answered)
      .map(|e| e.user_answer.clone())
      .unwrap_or_default(),
    advance_after_ms: if answered { advance_after_ms } else { 0 },
    progress_percent: (session.progress() * 100.0).round() as u32,
    notice: notice_html,
  };
  Html(template.render().unwrap_or_default()).into_response()
}

/// Render the score summary. Only the call holding the submission claim
/// records the result; everyone else just shows the summary.
fn render_results(
  pool: &DbPool,
  session_id: &str,
  session: &QuizSession,
  claimed: bool,
) -> Response {
  let badges = if claimed {
    let saved = match db::try_lock(pool) {
      Ok(conn) => db::save_quiz_result(
        &conn,
        session.deck_id,
        session.correct_count() as i64,
        session.total() as i64,
      )
      .and_then(|_| db::check_and_award(&conn))
      .log_warn("Failed to save quiz result"),
      Err(_) => None,
    };

    let success = saved.is_some();
    let _ = session::with_quiz_session(session_id, |s| s.complete_result_submission(success));
    saved.unwrap_or_default()
  } else {
    vec![]
  };

  let template = QuizResultsTemplate {
    session_id: session_id.to_string(),
    deck_id: session.deck_id,
    percentage: session.percentage(),
    score: session.correct_count(),
    total: session.total(),
    entries: session.transcript().to_vec(),
    badges,
    badge_delay_ms: config::BADGE_ANNOUNCE_DELAY_MS,
  };
  Html(template.render().unwrap_or_default()).into_response()
}
