//! Shared fixtures for database-backed unit tests

use rusqlite::Connection;
use tempfile::TempDir;

use crate::db;

/// Temporary on-disk database with the full schema and seeded badges.
/// The directory is removed when the fixture is dropped.
pub struct TestEnv {
  pub conn: Connection,
  _dir: TempDir,
}

impl TestEnv {
  pub fn new() -> Self {
    let dir = TempDir::new().expect("create temp dir");
    let conn = Connection::open(dir.path().join("test.db")).expect("open test db");
    conn
      .execute_batch("PRAGMA foreign_keys = ON;")
      .expect("enable foreign keys");
    db::run_migrations(&conn).expect("run migrations");
    db::seed_badges(&conn).expect("seed badges");
    Self { conn, _dir: dir }
  }
}
