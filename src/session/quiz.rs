//! Quiz session state machine.
//!
//! A quiz runs through a deck's cards in a session-local random order,
//! grading each answer and keeping a per-question transcript. The machine
//! moves `Answering(i) -> Answering(i+1)` one answer at a time and is
//! scored once every card has been answered. Timed transitions are data:
//! each accepted answer carries the delay after which the view should
//! advance, the machine itself never sleeps.

use std::time::Duration;

use crate::config;
use crate::domain::{Card, CardKind};

use super::{progress_fraction, shuffled};

/// Per-answered-card record; append-only for the life of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
  pub question: String,
  pub user_answer: String,
  pub correct_answer: String,
  pub is_correct: bool,
}

/// Outcome of one accepted answer, including the delayed-transition effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
  pub is_correct: bool,
  pub correct_answer: String,
  /// How long the feedback stays on screen before the view advances
  pub advance_after: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerError {
  /// Submitted answer was empty after trimming
  EmptyAnswer,
  /// The current question already has an accepted answer
  AlreadyAnswered,
  /// All cards have been answered; only restart is valid now
  QuizFinished,
  /// A result submission is already in flight or recorded
  ResultAlreadySubmitted,
}

/// One question as it should be rendered right now.
///
/// `choices` is re-shuffled on every call for multiple-choice cards so the
/// correct answer's on-screen position is not predictable; it is empty for
/// open-form cards.
#[derive(Debug, Clone)]
pub struct QuestionView {
  pub number: usize,
  pub total: usize,
  pub question: String,
  pub choices: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct QuizSession {
  pub deck_id: i64,
  cards: Vec<Card>,
  current_index: usize,
  correct_count: usize,
  transcript: Vec<TranscriptEntry>,
  /// Set between an accepted answer and the advance that consumes it
  feedback_pending: bool,
  result_in_flight: bool,
  result_submitted: bool,
}

impl QuizSession {
  /// Create a session over the given cards, fixing a fresh random order
  pub fn new(deck_id: i64, cards: Vec<Card>) -> Self {
    Self {
      deck_id,
      cards: shuffled(&cards),
      current_index: 0,
      correct_count: 0,
      transcript: Vec::new(),
      feedback_pending: false,
      result_in_flight: false,
      result_submitted: false,
    }
  }

  pub fn total(&self) -> usize {
    self.cards.len()
  }

  pub fn current_index(&self) -> usize {
    self.current_index
  }

  pub fn correct_count(&self) -> usize {
    self.correct_count
  }

  pub fn transcript(&self) -> &[TranscriptEntry] {
    &self.transcript
  }

  /// Terminal state: every card has been answered and advanced past
  pub fn is_scored(&self) -> bool {
    self.current_index >= self.cards.len()
  }

  /// Whether the current question has an accepted answer awaiting advance
  pub fn feedback_pending(&self) -> bool {
    self.feedback_pending
  }

  pub fn current_card(&self) -> Option<&Card> {
    self.cards.get(self.current_index)
  }

  pub fn question_view(&self) -> Option<QuestionView> {
    let card = self.current_card()?;
    Some(QuestionView {
      number: self.current_index + 1,
      total: self.cards.len(),
      question: card.question.clone(),
      choices: shuffled(card.choices()),
    })
  }

  /// Fraction of questions completed, not counting the one in view
  pub fn progress(&self) -> f64 {
    progress_fraction(self.current_index, self.cards.len())
  }

  /// Grade an answer for the current question.
  ///
  /// Multiple-choice cards are graded by exact equality with the stored
  /// answer; open-form cards by the prefix containment heuristic. Exactly
  /// one transcript entry is appended per accepted answer.
  pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerFeedback, AnswerError> {
    if self.is_scored() {
      return Err(AnswerError::QuizFinished);
    }
    if self.feedback_pending {
      return Err(AnswerError::AlreadyAnswered);
    }
    let answer = answer.trim();
    if answer.is_empty() {
      return Err(AnswerError::EmptyAnswer);
    }

    let card = &self.cards[self.current_index];
    let (is_correct, advance_after) = match &card.kind {
      CardKind::MultipleChoice { .. } => (
        answer == card.answer,
        Duration::from_millis(config::CHOICE_FEEDBACK_DELAY_MS),
      ),
      CardKind::Open => (
        open_answer_matches(answer, &card.answer),
        Duration::from_millis(config::OPEN_FEEDBACK_DELAY_MS),
      ),
    };

    if is_correct {
      self.correct_count += 1;
    }
    self.transcript.push(TranscriptEntry {
      question: card.question.clone(),
      user_answer: answer.to_string(),
      correct_answer: card.answer.clone(),
      is_correct,
    });
    self.feedback_pending = true;

    Ok(AnswerFeedback {
      is_correct,
      correct_answer: card.answer.clone(),
      advance_after,
    })
  }

  /// Move past an answered question; a no-op unless feedback is pending
  pub fn advance(&mut self) {
    if self.feedback_pending {
      self.current_index += 1;
      self.feedback_pending = false;
    }
  }

  /// Final score as a whole percentage
  pub fn percentage(&self) -> u32 {
    if self.cards.is_empty() {
      return 0;
    }
    (100.0 * self.correct_count as f64 / self.cards.len() as f64).round() as u32
  }

  /// Claim the one allowed result submission for this run.
  ///
  /// Guards the score POST so a re-entrant invocation can neither issue a
  /// second request nor double-count.
  pub fn begin_result_submission(&mut self) -> Result<(), AnswerError> {
    if !self.is_scored() {
      return Err(AnswerError::QuizFinished);
    }
    if self.result_in_flight || self.result_submitted {
      return Err(AnswerError::ResultAlreadySubmitted);
    }
    self.result_in_flight = true;
    Ok(())
  }

  /// Release the submission guard. A failed submission is not retried, but
  /// it also must not be treated as recorded.
  pub fn complete_result_submission(&mut self, success: bool) {
    self.result_in_flight = false;
    self.result_submitted = success;
  }

  /// Re-shuffle the existing cards and zero all run state. Does not
  /// re-fetch anything.
  pub fn restart(&mut self) {
    self.cards = shuffled(&self.cards);
    self.current_index = 0;
    self.correct_count = 0;
    self.transcript.clear();
    self.feedback_pending = false;
    self.result_in_flight = false;
    self.result_submitted = false;
  }
}

/// Open-form answer heuristic: correct iff, case-insensitively, either
/// string contains the first five characters of the other. A prefix shorter
/// than five characters never matches, so answers of four characters or
/// fewer cannot be graded correct.
///
/// Deliberately preserved as-is for behavioral parity; known to be
/// under-forgiving for short answers. TODO: revisit the scoring rule for
/// correct answers shorter than five characters.
pub fn open_answer_matches(user_answer: &str, correct_answer: &str) -> bool {
  let user = user_answer.to_lowercase();
  let correct = correct_answer.to_lowercase();
  contains_prefix(&user, &correct) || contains_prefix(&correct, &user)
}

fn contains_prefix(haystack: &str, needle: &str) -> bool {
  let prefix: String = needle.chars().take(config::ANSWER_PREFIX_LEN).collect();
  prefix.chars().count() == config::ANSWER_PREFIX_LEN && haystack.contains(&prefix)
}
