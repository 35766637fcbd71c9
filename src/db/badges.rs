//! Achievement badges awarded by study and quiz activity thresholds

use chrono::Utc;
use rusqlite::{params, Connection, Result};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BadgeRow {
  pub id: i64,
  pub name: String,
  pub description: String,
  pub icon: String,
  pub requirement: i64,
  pub earned: bool,
  pub earned_at: Option<String>,
}

/// Names of the badges awarded by total cards-studied count
const STUDY_COUNT_BADGES: [&str; 5] = ["First Steps", "Beginner", "Scholar", "Expert", "Master"];

/// Seed the badge table on first run
pub fn seed_badges(conn: &Connection) -> Result<()> {
  let count: i64 = conn.query_row("SELECT COUNT(*) FROM badges", [], |row| row.get(0))?;
  if count > 0 {
    return Ok(());
  }

  let badges = [
    ("First Steps", "Study your first flashcard", "🎯", 1),
    ("Beginner", "Study 10 flashcards", "📚", 10),
    ("Scholar", "Study 50 flashcards", "🎓", 50),
    ("Expert", "Study 100 flashcards", "👨‍🎓", 100),
    ("Master", "Study 500 flashcards", "🏆", 500),
    ("Quiz Starter", "Complete your first quiz", "✅", 1),
    ("Perfect Score", "Get 100% on a quiz", "💯", 1),
    ("Consistent Learner", "Study 7 days in a row", "🔥", 7),
  ];

  for (name, description, icon, requirement) in badges {
    conn.execute(
      "INSERT INTO badges (name, description, icon, requirement) VALUES (?1, ?2, ?3, ?4)",
      params![name, description, icon, requirement],
    )?;
  }
  Ok(())
}

pub fn get_all_badges(conn: &Connection) -> Result<Vec<BadgeRow>> {
  let mut stmt = conn.prepare(
    r#"
    SELECT id, name, description, icon, requirement, earned, earned_at
    FROM badges
    ORDER BY requirement
    "#,
  )?;

  let badges = stmt
    .query_map([], |row| {
      Ok(BadgeRow {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        icon: row.get(3)?,
        requirement: row.get(4)?,
        earned: row.get::<_, i64>(5)? != 0,
        earned_at: row.get(6)?,
      })
    })?
    .collect::<Result<Vec<_>>>()?;
  Ok(badges)
}

/// Evaluate all unearned badges against current activity and mark the ones
/// whose threshold is now met. Returns the names newly earned by this call.
pub fn check_and_award(conn: &Connection) -> Result<Vec<String>> {
  let cards_studied: i64 = conn.query_row(
    "SELECT COUNT(*) FROM review_schedule WHERE last_reviewed IS NOT NULL",
    [],
    |row| row.get(0),
  )?;
  let quizzes_completed: i64 =
    conn.query_row("SELECT COUNT(*) FROM quiz_results", [], |row| row.get(0))?;
  let has_perfect_score: bool = conn.query_row(
    "SELECT COUNT(*) > 0 FROM quiz_results WHERE score = total",
    [],
    |row| row.get(0),
  )?;

  let mut stmt =
    conn.prepare("SELECT id, name, requirement FROM badges WHERE earned = 0")?;
  let unearned = stmt
    .query_map([], |row| {
      Ok((
        row.get::<_, i64>(0)?,
        row.get::<_, String>(1)?,
        row.get::<_, i64>(2)?,
      ))
    })?
    .collect::<Result<Vec<_>>>()?;

  let mut newly_earned = Vec::new();
  for (id, name, requirement) in unearned {
    let met = if STUDY_COUNT_BADGES.contains(&name.as_str()) {
      cards_studied >= requirement
    } else if name == "Quiz Starter" {
      quizzes_completed >= 1
    } else if name == "Perfect Score" {
      has_perfect_score
    } else {
      // "Consistent Learner" has no award rule yet
      false
    };

    if met {
      conn.execute(
        "UPDATE badges SET earned = 1, earned_at = ?1 WHERE id = ?2",
        params![Utc::now().to_rfc3339(), id],
      )?;
      newly_earned.push(name);
    }
  }

  Ok(newly_earned)
}
