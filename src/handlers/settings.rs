//! Settings page for the AI-generation credential.
//!
//! Only a format check happens here (the documented key prefix); whether
//! the key actually works is discovered by the external generation
//! service, not by this app.

use askama::Template;
use axum::extract::State;
use axum::response::Html;
use axum::Form;

use crate::config;
use crate::db::{self, DbPool, LogOnError};

use super::templates::{ApiKeyForm, SettingsTemplate};
use super::notice;

pub async fn settings_page(State(pool): State<DbPool>) -> Html<String> {
  render_settings(&pool, String::new())
}

pub async fn save_api_key(
  State(pool): State<DbPool>,
  Form(form): Form<ApiKeyForm>,
) -> Html<String> {
  let key = form.api_key.trim();
  if key.is_empty() {
    return render_settings(&pool, notice("warning", "Enter an API key first"));
  }
  if !key.starts_with(config::API_KEY_PREFIX) {
    return render_settings(
      &pool,
      notice("error", "That does not look like a Gemini API key"),
    );
  }

  let saved = match db::try_lock(&pool) {
    Ok(conn) => db::set_setting(&conn, config::API_KEY_SETTING, key)
      .log_warn("Failed to save API key")
      .is_some(),
    Err(_) => false,
  };

  if saved {
    render_settings(&pool, notice("success", "API key saved"))
  } else {
    render_settings(&pool, notice("error", "Failed to save the API key"))
  }
}

pub async fn clear_api_key(State(pool): State<DbPool>) -> Html<String> {
  let cleared = match db::try_lock(&pool) {
    Ok(conn) => db::delete_setting(&conn, config::API_KEY_SETTING)
      .log_warn("Failed to clear API key")
      .is_some(),
    Err(_) => false,
  };

  if cleared {
    render_settings(&pool, notice("success", "API key removed"))
  } else {
    render_settings(&pool, notice("error", "Failed to remove the API key"))
  }
}

fn render_settings(pool: &DbPool, notice_html: String) -> Html<String> {
  let has_api_key = match db::try_lock(pool) {
    Ok(conn) => db::get_setting(&conn, config::API_KEY_SETTING)
      .log_warn("Failed to read settings")
      .flatten()
      .is_some(),
    Err(_) => false,
  };

  let template = SettingsTemplate {
    has_api_key,
    notice: notice_html,
  };
  Html(template.render().unwrap_or_default())
}
