//! Error responses for the JSON API.
//!
//! Every failure is handled at the point of occurrence and mapped to a
//! status plus `{"error": ...}` body; nothing is retried automatically.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbLockError;

#[derive(Debug)]
pub enum ApiError {
  /// Requested resource does not exist
  NotFound(&'static str),
  /// Input rejected before any request/write was made
  Validation(String),
  /// Database or IO failure; details go to the log, not the client
  Database,
}

impl From<rusqlite::Error> for ApiError {
  fn from(e: rusqlite::Error) -> Self {
    tracing::error!("Database error: {}", e);
    Self::Database
  }
}

impl From<DbLockError> for ApiError {
  fn from(_: DbLockError) -> Self {
    Self::Database
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      Self::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
      Self::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
      Self::Database => (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Database error".to_string(),
      ),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
