//! Template and form structs for the HTML flows.

use askama::Template;
use serde::Deserialize;

use crate::db::{BadgeRow, CardRow, DeckRow, StudyStats};
use crate::session::TranscriptEntry;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub decks: Vec<DeckRow>,
  pub notice: String,
}

#[derive(Template)]
#[template(path = "deck.html")]
pub struct DeckTemplate {
  pub deck_id: i64,
  pub deck_name: String,
  pub description: String,
  pub cards: Vec<CardRow>,
  /// Card awaiting inline delete confirmation, 0 when none
  pub pending_delete: i64,
  /// Deck deletion awaiting inline confirmation
  pub pending_delete_deck: bool,
  pub notice: String,
}

#[derive(Template)]
#[template(path = "study.html")]
pub struct StudyTemplate {
  pub session_id: String,
  pub deck_id: i64,
  pub deck_name: String,
  pub question: String,
  pub answer: String,
  pub flipped: bool,
  pub complete: bool,
  pub reviewed: usize,
  pub total: usize,
  pub progress_percent: u32,
  pub badges: Vec<String>,
  pub notice: String,
}

#[derive(Template)]
#[template(path = "quiz.html")]
pub struct QuizTemplate {
  pub session_id: String,
  pub deck_id: i64,
  pub has_card: bool,
  pub question_number: usize,
  pub total: usize,
  pub question: String,
  pub is_multiple_choice: bool,
  pub choices: Vec<String>,
  pub answered: bool,
  pub is_correct: bool,
  pub correct_answer: String,
  pub user_answer: String,
  pub advance_after_ms: u64,
  pub progress_percent: u32,
  pub notice: String,
}

#[derive(Template)]
#[template(path = "quiz_results.html")]
pub struct QuizResultsTemplate {
  pub session_id: String,
  pub deck_id: i64,
  pub percentage: u32,
  pub score: usize,
  pub total: usize,
  pub entries: Vec<TranscriptEntry>,
  pub badges: Vec<String>,
  pub badge_delay_ms: u64,
}

#[derive(Template)]
#[template(path = "analytics.html")]
pub struct AnalyticsTemplate {
  pub stats: StudyStats,
  pub badges: Vec<BadgeRow>,
}

#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
  pub has_api_key: bool,
  pub notice: String,
}

// ============================================================================
// Form Structs
// ============================================================================

#[derive(Deserialize)]
pub struct SessionForm {
  pub session_id: String,
}

#[derive(Deserialize)]
pub struct RateForm {
  pub session_id: String,
  pub quality: u8,
}

#[derive(Deserialize)]
pub struct AnswerForm {
  pub session_id: String,
  #[serde(default)]
  pub answer: String,
}

#[derive(Deserialize)]
pub struct NewDeckForm {
  pub name: String,
  #[serde(default)]
  pub description: String,
}

#[derive(Deserialize)]
pub struct NewCardForm {
  pub question: String,
  pub answer: String,
  #[serde(default)]
  pub choices: String,
}

#[derive(Deserialize)]
pub struct ConfirmForm {
  #[serde(default)]
  pub confirmed: bool,
}

#[derive(Deserialize)]
pub struct ApiKeyForm {
  pub api_key: String,
}
