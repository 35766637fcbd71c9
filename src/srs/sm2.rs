use chrono::{DateTime, Duration, Utc};

const MIN_EASE_FACTOR: f64 = 1.3;

pub struct Sm2Result {
  pub easiness_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
  pub next_review: DateTime<Utc>,
}

pub fn calculate_sm2(
  quality: u8,
  current_easiness: f64,
  current_interval: i64,
  current_repetitions: i64,
) -> Sm2Result {
  let q = quality.min(5) as f64;

  // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
  let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
  let new_easiness = (current_easiness + ease_delta).max(MIN_EASE_FACTOR);

  let (new_interval, new_repetitions) = if quality < 3 {
    // Failed review: reset
    (1, 0)
  } else {
    let interval = match current_repetitions {
      0 => 1,
      1 => 6,
      _ => ((current_interval as f64) * new_easiness).round() as i64,
    };
    (interval, current_repetitions + 1)
  };

  let next_review = Utc::now() + Duration::days(new_interval);

  Sm2Result {
    easiness_factor: new_easiness,
    interval_days: new_interval,
    repetitions: new_repetitions,
    next_review,
  }
}
