use serde::{Deserialize, Serialize};

/// How a card is answered. Resolved once when the card is loaded, never
/// re-derived at render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
  /// Answered by picking one of the listed choices
  MultipleChoice { choices: Vec<String> },
  /// Answered by free text
  Open,
}

impl CardKind {
  /// Resolve the stored `choices` payload into a card kind.
  ///
  /// The column holds a JSON-encoded array of strings. Anything that is not
  /// a non-empty string array (including invalid JSON) degrades the card to
  /// open-form instead of failing the load.
  pub fn resolve(raw_choices: Option<&str>) -> Self {
    let Some(raw) = raw_choices else {
      return Self::Open;
    };
    match serde_json::from_str::<Vec<String>>(raw) {
      Ok(choices) if !choices.is_empty() => Self::MultipleChoice { choices },
      Ok(_) => Self::Open,
      Err(e) => {
        tracing::warn!("Invalid choices payload, degrading card to open-form: {}", e);
        Self::Open
      }
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
  pub id: i64,
  pub deck_id: i64,
  pub question: String,
  pub answer: String,
  pub kind: CardKind,
}

impl Card {
  pub fn new(id: i64, deck_id: i64, question: String, answer: String, kind: CardKind) -> Self {
    Self {
      id,
      deck_id,
      question,
      answer,
      kind,
    }
  }

  pub fn is_multiple_choice(&self) -> bool {
    matches!(self.kind, CardKind::MultipleChoice { .. })
  }

  /// The choice set for multiple-choice cards, empty for open-form ones
  pub fn choices(&self) -> &[String] {
    match &self.kind {
      CardKind::MultipleChoice { choices } => choices,
      CardKind::Open => &[],
    }
  }
}
