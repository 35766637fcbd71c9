//! Router assembly shared by the binary and the integration tests

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::db::DbPool;
use crate::handlers;

pub fn build_router(pool: DbPool) -> Router {
  Router::new()
    // HTML pages
    .route("/", get(handlers::index))
    .route("/decks", post(handlers::decks::create_deck_form))
    .route("/deck/{deck_id}", get(handlers::decks::deck_page))
    .route("/deck/{deck_id}/cards", post(handlers::decks::add_card_form))
    .route(
      "/deck/{deck_id}/cards/{card_id}/delete",
      post(handlers::decks::delete_card_form),
    )
    .route("/deck/{deck_id}/delete", post(handlers::decks::delete_deck_form))
    .route("/study/{deck_id}", get(handlers::study::study_start))
    .route("/study/flip", post(handlers::study::study_flip))
    .route("/study/rate", post(handlers::study::study_rate))
    .route("/quiz/{deck_id}", get(handlers::quiz::quiz_start))
    .route("/quiz/answer", post(handlers::quiz::quiz_answer))
    .route("/quiz/next", post(handlers::quiz::quiz_next))
    .route("/quiz/restart", post(handlers::quiz::quiz_restart))
    .route("/analytics", get(handlers::stats::analytics_page))
    .route("/settings", get(handlers::settings::settings_page))
    .route("/settings/api-key", post(handlers::settings::save_api_key))
    .route("/settings/api-key/clear", post(handlers::settings::clear_api_key))
    // JSON API
    .route(
      "/api/decks",
      get(handlers::decks::api_list_decks).post(handlers::decks::api_create_deck),
    )
    .route(
      "/api/decks/{deck_id}",
      get(handlers::decks::api_get_deck).delete(handlers::decks::api_delete_deck),
    )
    .route(
      "/api/decks/{deck_id}/cards",
      get(handlers::cards::api_list_cards).post(handlers::cards::api_create_card),
    )
    .route("/api/decks/{deck_id}/due-cards", get(handlers::cards::api_due_cards))
    .route(
      "/api/decks/{deck_id}/quiz-results",
      get(handlers::quiz::api_quiz_results),
    )
    .route("/api/cards/{card_id}", delete(handlers::cards::api_delete_card))
    .route("/api/study/{card_id}", post(handlers::study::api_record_review))
    .route("/api/quiz-results", post(handlers::quiz::api_save_quiz_result))
    .route("/api/stats", get(handlers::stats::api_stats))
    .route("/api/badges", get(handlers::stats::api_badges))
    .route("/api/export/{deck_id}/{format}", get(handlers::export::export_deck))
    .layer(TraceLayer::new_for_http())
    .with_state(pool)
}
