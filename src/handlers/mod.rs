pub mod cards;
pub mod decks;
pub mod error;
pub mod export;
pub mod quiz;
pub mod settings;
pub mod stats;
pub mod study;
pub mod templates;

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use crate::db::{self, DbPool, LogOnError};

use templates::IndexTemplate;

pub use error::ApiError;

/// Build an inline notice fragment. The message is escaped here, so the
/// fragment is inserted into templates unfiltered; `kind` is one of
/// success / error / warning / info.
pub fn notice(kind: &str, message: &str) -> String {
  format!(
    r#"<div class="inline-message {}">{}</div>"#,
    kind,
    html_escape::encode_text(message)
  )
}

/// Deck directory landing page
pub async fn index(State(pool): State<DbPool>) -> Html<String> {
  render_index(&pool, String::new())
}

pub fn render_index(pool: &DbPool, notice: String) -> Html<String> {
  let decks = match db::try_lock(pool) {
    Ok(conn) => db::get_all_decks(&conn).log_warn_default("Failed to load decks"),
    Err(_) => vec![],
  };

  let template = IndexTemplate { decks, notice };
  Html(template.render().unwrap_or_default())
}

/// Fallback page for a study or quiz session that has expired or never
/// existed
pub fn session_expired() -> Response {
  Html(
    "<h1>Session expired</h1>\
     <p>Your session has expired. <a href=\"/\">Back to decks</a></p>"
      .to_string(),
  )
  .into_response()
}
