use serde::{Deserialize, Serialize};

/// Self-assessed recall quality on the SM-2 ordinal scale.
///
/// Only the four values the rating surface exposes are accepted; the
/// intermediate SM-2 grades 1 and 2 are not reachable from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReviewQuality {
  Fail,
  Hard,
  Good,
  Easy,
}

impl ReviewQuality {
  pub fn from_u8(quality: u8) -> Option<Self> {
    match quality {
      0 => Some(Self::Fail),
      3 => Some(Self::Hard),
      4 => Some(Self::Good),
      5 => Some(Self::Easy),
      _ => None,
    }
  }

  pub fn as_u8(&self) -> u8 {
    match self {
      Self::Fail => 0,
      Self::Hard => 3,
      Self::Good => 4,
      Self::Easy => 5,
    }
  }
}
