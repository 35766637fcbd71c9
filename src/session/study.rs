//! Study session state machine for the spaced-repetition review loop.
//!
//! The session walks the deck's due cards in fetch order. Each card starts
//! question-side up; flipping is free and reversible, and only a flipped
//! card can be rated. Rating submission is at-most-once per card: a boolean
//! guard rejects a second submission while one is in flight, and a failed
//! submission leaves the card flipped so the user can rate it again.

use crate::domain::Card;

use super::progress_fraction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingError {
  /// The answer side has not been revealed yet
  NotFlipped,
  /// A rating for this card is already being recorded
  SubmissionInFlight,
  /// All due cards have been reviewed
  SessionComplete,
}

#[derive(Debug, Clone)]
pub struct StudySession {
  pub deck_id: i64,
  cards: Vec<Card>,
  current_index: usize,
  flipped: bool,
  rating_in_flight: bool,
}

impl StudySession {
  /// Create a session over the deck's due cards. An empty list makes the
  /// session complete immediately ("no cards due").
  pub fn new(deck_id: i64, cards: Vec<Card>) -> Self {
    Self {
      deck_id,
      cards,
      current_index: 0,
      flipped: false,
      rating_in_flight: false,
    }
  }

  pub fn total(&self) -> usize {
    self.cards.len()
  }

  /// Number of cards already rated in this session
  pub fn reviewed_count(&self) -> usize {
    self.current_index
  }

  pub fn is_complete(&self) -> bool {
    self.current_index >= self.cards.len()
  }

  pub fn is_flipped(&self) -> bool {
    self.flipped
  }

  pub fn current_card(&self) -> Option<&Card> {
    self.cards.get(self.current_index)
  }

  /// Toggle between question and answer side; no side effects, does not
  /// advance. Ignored while a rating is being recorded or after completion.
  pub fn flip(&mut self) {
    if !self.is_complete() && !self.rating_in_flight {
      self.flipped = !self.flipped;
    }
  }

  /// Claim the one in-flight rating slot for the current card.
  ///
  /// The caller records the review against the backend between
  /// `begin_rating` and `complete_rating`.
  pub fn begin_rating(&mut self) -> Result<&Card, RatingError> {
    if self.is_complete() {
      return Err(RatingError::SessionComplete);
    }
    if self.rating_in_flight {
      return Err(RatingError::SubmissionInFlight);
    }
    if !self.flipped {
      return Err(RatingError::NotFlipped);
    }
    self.rating_in_flight = true;
    Ok(&self.cards[self.current_index])
  }

  /// Finish the in-flight rating. On success the session advances to the
  /// next card; on failure it stays on the flipped card so the rating can
  /// be retried manually.
  pub fn complete_rating(&mut self, success: bool) {
    self.rating_in_flight = false;
    if success {
      self.current_index += 1;
      self.flipped = false;
    }
  }

  /// Fraction of cards completed, not counting the one in view
  pub fn progress(&self) -> f64 {
    progress_fraction(self.current_index, self.cards.len())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::CardKind;

  fn cards(n: usize) -> Vec<Card> {
    (0..n)
      .map(|i| {
        Card::new(
          i as i64,
          1,
          format!("question {}", i),
          format!("answer {}", i),
          CardKind::Open,
        )
      })
      .collect()
  }

  #[test]
  fn test_empty_due_list_is_immediately_complete() {
    let session = StudySession::new(1, vec![]);
    assert!(session.is_complete());
    assert!(session.current_card().is_none());
    assert_eq!(session.progress(), 0.0);
  }

  #[test]
  fn test_flip_is_reversible_without_advancing() {
    let mut session = StudySession::new(1, cards(2));
    assert!(!session.is_flipped());

    session.flip();
    assert!(session.is_flipped());
    session.flip();
    assert!(!session.is_flipped());
    assert_eq!(session.reviewed_count(), 0);
  }

  #[test]
  fn test_rating_requires_flip() {
    let mut session = StudySession::new(1, cards(1));
    assert_eq!(session.begin_rating().err(), Some(RatingError::NotFlipped));
  }

  #[test]
  fn test_successful_rating_advances() {
    let mut session = StudySession::new(1, cards(2));

    session.flip();
    let card = session.begin_rating().unwrap();
    assert_eq!(card.id, 0);
    session.complete_rating(true);

    assert_eq!(session.reviewed_count(), 1);
    assert!(!session.is_flipped());
    assert_eq!(session.current_card().unwrap().id, 1);
  }

  #[test]
  fn test_failed_rating_stays_on_flipped_card() {
    let mut session = StudySession::new(1, cards(2));

    session.flip();
    session.begin_rating().unwrap();
    session.complete_rating(false);

    assert_eq!(session.reviewed_count(), 0);
    assert!(session.is_flipped());
    // Retry is possible
    assert!(session.begin_rating().is_ok());
  }

  #[test]
  fn test_double_rating_rejected_while_in_flight() {
    let mut session = StudySession::new(1, cards(2));

    session.flip();
    session.begin_rating().unwrap();
    assert_eq!(
      session.begin_rating().err(),
      Some(RatingError::SubmissionInFlight)
    );
  }

  #[test]
  fn test_flip_ignored_while_rating_in_flight() {
    let mut session = StudySession::new(1, cards(1));
    session.flip();
    session.begin_rating().unwrap();

    session.flip();
    assert!(session.is_flipped());
  }

  #[test]
  fn test_completes_after_last_card() {
    let mut session = StudySession::new(1, cards(2));

    for _ in 0..2 {
      session.flip();
      session.begin_rating().unwrap();
      session.complete_rating(true);
    }

    assert!(session.is_complete());
    assert_eq!(
      session.begin_rating().err(),
      Some(RatingError::SessionComplete)
    );
  }

  #[test]
  fn test_progress_counts_completed_cards_only() {
    let mut session = StudySession::new(1, cards(4));
    assert_eq!(session.progress(), 0.0);

    session.flip();
    session.begin_rating().unwrap();
    session.complete_rating(true);
    assert!((session.progress() - 0.25).abs() < f64::EPSILON);
  }
}
