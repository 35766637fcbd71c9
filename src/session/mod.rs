//! In-memory storage for quiz and study sessions, plus the small pure
//! helpers both session kinds share.
//!
//! Session state is keyed by a random session ID carried in form fields.
//! Entries auto-expire after a configurable duration of inactivity.

pub mod quiz;
pub mod study;

pub use quiz::{AnswerError, AnswerFeedback, QuizSession, TranscriptEntry};
pub use study::{RatingError, StudySession};

use crate::config;
use chrono::{DateTime, Duration, Utc};
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

/// Session entry with last access time for expiration
struct SessionEntry<T> {
  session: T,
  last_access: DateTime<Utc>,
}

static STUDY_SESSIONS: LazyLock<Mutex<HashMap<String, SessionEntry<StudySession>>>> =
  LazyLock::new(|| Mutex::new(HashMap::new()));

static QUIZ_SESSIONS: LazyLock<Mutex<HashMap<String, SessionEntry<QuizSession>>>> =
  LazyLock::new(|| Mutex::new(HashMap::new()));

fn fetch<T: Clone>(store: &Mutex<HashMap<String, SessionEntry<T>>>, id: &str) -> Option<T> {
  mutate(store, id, |session| session.clone())
}

/// Apply `f` to the stored session under the store lock.
///
/// Guard claims (rating, result submission) must go through here: the
/// check-and-set happens in place, so a concurrent request for the same
/// session observes the claimed guard instead of a stale copy.
fn mutate<T, R>(
  store: &Mutex<HashMap<String, SessionEntry<T>>>,
  id: &str,
  f: impl FnOnce(&mut T) -> R,
) -> Option<R> {
  let mut sessions = store.lock().expect("Session store lock poisoned");

  // Clean up expired sessions occasionally (~10% chance)
  if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
    cleanup_expired(&mut sessions);
  }

  let entry = sessions.get_mut(id)?;
  entry.last_access = Utc::now();
  Some(f(&mut entry.session))
}

fn store<T>(store: &Mutex<HashMap<String, SessionEntry<T>>>, id: &str, session: T) {
  let mut sessions = store.lock().expect("Session store lock poisoned");
  sessions.insert(
    id.to_string(),
    SessionEntry {
      session,
      last_access: Utc::now(),
    },
  );
}

/// Look up a study session by ID, refreshing its expiry
pub fn get_study_session(session_id: &str) -> Option<StudySession> {
  fetch(&STUDY_SESSIONS, session_id)
}

/// Mutate a study session in place under the store lock
pub fn with_study_session<R>(
  session_id: &str,
  f: impl FnOnce(&mut StudySession) -> R,
) -> Option<R> {
  mutate(&STUDY_SESSIONS, session_id, f)
}

/// Store a study session under the given ID
pub fn put_study_session(session_id: &str, session: StudySession) {
  store(&STUDY_SESSIONS, session_id, session);
}

/// Look up a quiz session by ID, refreshing its expiry
pub fn get_quiz_session(session_id: &str) -> Option<QuizSession> {
  fetch(&QUIZ_SESSIONS, session_id)
}

/// Mutate a quiz session in place under the store lock
pub fn with_quiz_session<R>(session_id: &str, f: impl FnOnce(&mut QuizSession) -> R) -> Option<R> {
  mutate(&QUIZ_SESSIONS, session_id, f)
}

/// Store a quiz session under the given ID
pub fn put_quiz_session(session_id: &str, session: QuizSession) {
  store(&QUIZ_SESSIONS, session_id, session);
}

/// Clean up expired sessions
fn cleanup_expired<T>(sessions: &mut HashMap<String, SessionEntry<T>>) {
  let expiry = Utc::now() - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}

/// Return a uniformly shuffled copy of the input, leaving it untouched
pub fn shuffled<T: Clone>(items: &[T]) -> Vec<T> {
  let mut copy = items.to_vec();
  copy.shuffle(&mut rand::rng());
  copy
}

/// Fraction of completed items in [0, 1]; an empty set counts as no progress
pub fn progress_fraction(current: usize, total: usize) -> f64 {
  if total == 0 {
    return 0.0;
  }
  current.min(total) as f64 / total as f64
}
