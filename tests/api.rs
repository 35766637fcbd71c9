//! HTTP-level tests over the JSON API and the rendered pages

use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use flashdeck::{app, db};

struct TestApp {
  server: TestServer,
  _dir: TempDir,
}

fn spawn() -> TestApp {
  let dir = TempDir::new().expect("create temp dir");
  let pool = db::init_db(&dir.path().join("test.db")).expect("init db");
  let server = TestServer::new(app::build_router(pool)).expect("start test server");
  TestApp { server, _dir: dir }
}

async fn create_deck(server: &TestServer, name: &str) -> i64 {
  let response = server
    .post("/api/decks")
    .json(&json!({ "name": name, "description": "" }))
    .await;
  response.assert_status_ok();
  response.json::<Value>()["id"].as_i64().unwrap()
}

async fn create_card(
  server: &TestServer,
  deck_id: i64,
  question: &str,
  answer: &str,
  choices: Option<Vec<&str>>,
) -> i64 {
  let mut body = json!({ "question": question, "answer": answer });
  if let Some(choices) = choices {
    body["choices"] = json!(choices);
  }
  let response = server
    .post(&format!("/api/decks/{}/cards", deck_id))
    .json(&body)
    .await;
  response.assert_status_ok();
  response.json::<Value>()["id"].as_i64().unwrap()
}

// ============================================================================
// Decks
// ============================================================================

#[tokio::test]
async fn test_deck_crud() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Biology").await;

  let list = app.server.get("/api/decks").await.json::<Value>();
  assert_eq!(list.as_array().unwrap().len(), 1);
  assert_eq!(list[0]["name"], "Biology");
  assert_eq!(list[0]["card_count"], 0);

  let deck = app
    .server
    .get(&format!("/api/decks/{}", deck_id))
    .await
    .json::<Value>();
  assert_eq!(deck["id"], deck_id);

  app
    .server
    .delete(&format!("/api/decks/{}", deck_id))
    .await
    .assert_status_ok();
  app
    .server
    .get(&format!("/api/decks/{}", deck_id))
    .await
    .assert_status_not_found();
}

#[tokio::test]
async fn test_create_deck_requires_name() {
  let app = spawn();
  let response = app.server.post("/api/decks").json(&json!({ "name": "  " })).await;
  response.assert_status_bad_request();
  assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn test_delete_missing_deck_is_not_found() {
  let app = spawn();
  app.server.delete("/api/decks/42").await.assert_status_not_found();
}

// ============================================================================
// Cards
// ============================================================================

#[tokio::test]
async fn test_card_crud_and_choices_payload() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;
  create_card(
    &app.server,
    deck_id,
    "Capital of France?",
    "Paris",
    Some(vec!["Paris", "Lyon", "Nice"]),
  )
  .await;
  let open_id = create_card(&app.server, deck_id, "Largest ocean?", "Pacific", None).await;

  let cards = app
    .server
    .get(&format!("/api/decks/{}/cards", deck_id))
    .await
    .json::<Value>();
  let cards = cards.as_array().unwrap();
  assert_eq!(cards.len(), 2);

  // choices is exposed as the raw JSON-encoded string, null for open cards
  let mc = cards.iter().find(|c| c["answer"] == "Paris").unwrap();
  let stored: Vec<String> = serde_json::from_str(mc["choices"].as_str().unwrap()).unwrap();
  assert_eq!(stored, vec!["Paris", "Lyon", "Nice"]);
  let open = cards.iter().find(|c| c["answer"] == "Pacific").unwrap();
  assert!(open["choices"].is_null());

  app
    .server
    .delete(&format!("/api/cards/{}", open_id))
    .await
    .assert_status_ok();
  app
    .server
    .delete(&format!("/api/cards/{}", open_id))
    .await
    .assert_status_not_found();
}

#[tokio::test]
async fn test_create_card_validation() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;

  let response = app
    .server
    .post(&format!("/api/decks/{}/cards", deck_id))
    .json(&json!({ "question": "", "answer": "A" }))
    .await;
  response.assert_status_bad_request();

  app
    .server
    .post("/api/decks/999/cards")
    .json(&json!({ "question": "Q", "answer": "A" }))
    .await
    .assert_status_not_found();
}

#[tokio::test]
async fn test_new_cards_are_due() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;
  let card_id = create_card(&app.server, deck_id, "Q", "A", None).await;

  let due = app
    .server
    .get(&format!("/api/decks/{}/due-cards", deck_id))
    .await
    .json::<Value>();
  assert_eq!(due.as_array().unwrap().len(), 1);
  assert_eq!(due[0]["id"], card_id);
}

// ============================================================================
// Study
// ============================================================================

#[tokio::test]
async fn test_review_schedules_card_and_awards_badge() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;
  let card_id = create_card(&app.server, deck_id, "Q", "A", None).await;

  let response = app
    .server
    .post(&format!("/api/study/{}", card_id))
    .json(&json!({ "quality": 4 }))
    .await;
  response.assert_status_ok();
  let body = response.json::<Value>();
  let badges: Vec<String> = serde_json::from_value(body["badges_earned"].clone()).unwrap();
  assert!(badges.contains(&"First Steps".to_string()));

  // Reviewed card is scheduled into the future
  let due = app
    .server
    .get(&format!("/api/decks/{}/due-cards", deck_id))
    .await
    .json::<Value>();
  assert!(due.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_review_rejects_invalid_quality() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;
  let card_id = create_card(&app.server, deck_id, "Q", "A", None).await;

  // Only 0, 3, 4 and 5 are valid ratings
  app
    .server
    .post(&format!("/api/study/{}", card_id))
    .json(&json!({ "quality": 2 }))
    .await
    .assert_status_bad_request();
}

#[tokio::test]
async fn test_review_unknown_card_is_not_found() {
  let app = spawn();
  app
    .server
    .post("/api/study/999")
    .json(&json!({ "quality": 4 }))
    .await
    .assert_status_not_found();
}

// ============================================================================
// Quiz results
// ============================================================================

#[tokio::test]
async fn test_quiz_result_roundtrip_with_badges() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;

  let response = app
    .server
    .post("/api/quiz-results")
    .json(&json!({ "deck_id": deck_id, "score": 5, "total": 5 }))
    .await;
  response.assert_status_ok();
  let badges: Vec<String> =
    serde_json::from_value(response.json::<Value>()["badges_earned"].clone()).unwrap();
  assert!(badges.contains(&"Quiz Starter".to_string()));
  assert!(badges.contains(&"Perfect Score".to_string()));

  let results = app
    .server
    .get(&format!("/api/decks/{}/quiz-results", deck_id))
    .await
    .json::<Value>();
  assert_eq!(results.as_array().unwrap().len(), 1);
  assert_eq!(results[0]["score"], 5);
  assert_eq!(results[0]["total"], 5);
}

#[tokio::test]
async fn test_quiz_result_validation() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;

  app
    .server
    .post("/api/quiz-results")
    .json(&json!({ "deck_id": deck_id, "score": 6, "total": 5 }))
    .await
    .assert_status_bad_request();

  app
    .server
    .post("/api/quiz-results")
    .json(&json!({ "deck_id": 999, "score": 1, "total": 5 }))
    .await
    .assert_status_not_found();
}

// ============================================================================
// Stats and badges
// ============================================================================

#[tokio::test]
async fn test_stats_endpoint() {
  let app = spawn();
  let stats = app.server.get("/api/stats").await.json::<Value>();
  assert_eq!(stats["total_studied"], 0);
  assert_eq!(stats["due_today"], 0);
  assert_eq!(stats["average_retention"], 0.0);
}

#[tokio::test]
async fn test_badges_endpoint_lists_seeded_badges() {
  let app = spawn();
  let badges = app.server.get("/api/badges").await.json::<Value>();
  let badges = badges.as_array().unwrap();
  assert_eq!(badges.len(), 8);
  assert!(badges.iter().all(|b| b["earned"] == false));
}

// ============================================================================
// Export
// ============================================================================

#[tokio::test]
async fn test_export_formats() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;
  create_card(&app.server, deck_id, "Capital?", "Paris", None).await;

  let json_export = app
    .server
    .get(&format!("/api/export/{}/json", deck_id))
    .await
    .json::<Value>();
  assert_eq!(json_export["deck"]["name"], "Geo");
  assert_eq!(json_export["cards"].as_array().unwrap().len(), 1);

  let csv = app.server.get(&format!("/api/export/{}/csv", deck_id)).await;
  csv.assert_status_ok();
  let disposition = csv
    .headers()
    .get("content-disposition")
    .unwrap()
    .to_str()
    .unwrap()
    .to_string();
  assert_eq!(disposition, "attachment; filename=\"Geo.csv\"");
  assert!(csv.text().starts_with("Question,Answer"));

  let anki = app.server.get(&format!("/api/export/{}/anki", deck_id)).await;
  anki.assert_status_ok();
  assert_eq!(anki.text(), "Capital?\tParis\n");
}

#[tokio::test]
async fn test_export_unknown_format_and_deck() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;

  app
    .server
    .get(&format!("/api/export/{}/xml", deck_id))
    .await
    .assert_status_bad_request();
  app
    .server
    .get("/api/export/999/json")
    .await
    .assert_status_not_found();
}

// ============================================================================
// Rendered pages
// ============================================================================

#[tokio::test]
async fn test_index_page_lists_decks() {
  let app = spawn();
  create_deck(&app.server, "Biology").await;

  let response = app.server.get("/").await;
  response.assert_status_ok();
  assert!(response.text().contains("Biology"));
}

#[tokio::test]
async fn test_deck_page_escapes_card_content() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;
  create_card(&app.server, deck_id, "<script>alert(1)</script>", "A", None).await;

  let response = app.server.get(&format!("/deck/{}", deck_id)).await;
  response.assert_status_ok();
  let html = response.text();
  assert!(!html.contains("<script>alert(1)</script>"));
  assert!(html.contains("&lt;script&gt;"));
}

#[tokio::test]
async fn test_study_page_with_no_due_cards() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;

  let response = app.server.get(&format!("/study/{}", deck_id)).await;
  response.assert_status_ok();
  assert!(response.text().contains("No cards are due"));
}

#[tokio::test]
async fn test_quiz_page_shows_question() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;
  create_card(&app.server, deck_id, "Capital of France?", "Paris", None).await;

  let response = app.server.get(&format!("/quiz/{}", deck_id)).await;
  response.assert_status_ok();
  let html = response.text();
  assert!(html.contains("Capital of France?"));
  assert!(html.contains("Question 1 of 1"));
}

#[tokio::test]
async fn test_quiz_answer_feedback_and_results() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;
  create_card(&app.server, deck_id, "Capital of France?", "Paris", None).await;

  let page = app.server.get(&format!("/quiz/{}", deck_id)).await.text();
  let session_id = extract_session_id(&page);

  let feedback = app
    .server
    .post("/quiz/answer")
    .form(&[("session_id", session_id.as_str()), ("answer", "Paris")])
    .await;
  feedback.assert_status_ok();
  assert!(feedback.text().contains("Correct!"));

  let results = app
    .server
    .post("/quiz/next")
    .form(&[("session_id", session_id.as_str())])
    .await;
  results.assert_status_ok();
  let html = results.text();
  assert!(html.contains("Quiz Complete"));
  assert!(html.contains("100%"));

  // The finished run was recorded
  let saved = app
    .server
    .get(&format!("/api/decks/{}/quiz-results", deck_id))
    .await
    .json::<Value>();
  assert_eq!(saved.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_advance_records_single_result() {
  let app = spawn();
  let deck_id = create_deck(&app.server, "Geo").await;
  create_card(&app.server, deck_id, "Capital of France?", "Paris", None).await;

  let page = app.server.get(&format!("/quiz/{}", deck_id)).await.text();
  let session_id = extract_session_id(&page);

  app
    .server
    .post("/quiz/answer")
    .form(&[("session_id", session_id.as_str()), ("answer", "Paris")])
    .await
    .assert_status_ok();

  // The auto-advance timer and a manual "Next" click can both fire; the
  // score must be recorded exactly once
  app
    .server
    .post("/quiz/next")
    .form(&[("session_id", session_id.as_str())])
    .await
    .assert_status_ok();
  app
    .server
    .post("/quiz/next")
    .form(&[("session_id", session_id.as_str())])
    .await
    .assert_status_ok();

  let saved = app
    .server
    .get(&format!("/api/decks/{}/quiz-results", deck_id))
    .await
    .json::<Value>();
  assert_eq!(saved.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_analytics_and_settings_pages_render() {
  let app = spawn();
  app.server.get("/analytics").await.assert_status_ok();
  app.server.get("/settings").await.assert_status_ok();
}

#[tokio::test]
async fn test_settings_rejects_malformed_api_key() {
  let app = spawn();
  let response = app
    .server
    .post("/settings/api-key")
    .form(&[("api_key", "not-a-key")])
    .await;
  response.assert_status_ok();
  assert!(response.text().contains("does not look like"));
}

/// Pull the hidden session_id field out of a rendered page
fn extract_session_id(html: &str) -> String {
  let marker = "name=\"session_id\" value=\"";
  let start = html.find(marker).expect("session_id field") + marker.len();
  html[start..start + 32].to_string()
}
