// tests/survey_tests.rs

use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use survey_backend::{config::Config, db, routes, state::AppState};

const CORRECT_ANSWERS: [&str; 6] = ["b", "a", "a", "b", "a", "b"];

struct TestApp {
    address: String,
    pool: SqlitePool,
    client: reqwest::Client,
}

async fn spawn_app() -> TestApp {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        bind_address: "127.0.0.1:0".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        quiz_session_ttl: 600,
        rust_log: "error".to_string(),
        cors_origins: Vec::new(),
        admin_username: Some("admin".to_string()),
        admin_password: Some("admin_pass".to_string()),
        manager_username: Some("manager".to_string()),
        manager_password: Some("manager_pass".to_string()),
    };

    db::seed_default_accounts(&pool, &config)
        .await
        .expect("Failed to seed accounts");

    let app = routes::create_router(AppState {
        pool: pool.clone(),
        config,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        pool,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let body: Value = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    async fn submit_practices(&self, score: u8, comment: Option<&str>) -> reqwest::Response {
        let mut payload = json!({});
        for item in [
            "a1", "a2", "b1", "b2", "c1", "c2", "d1", "d2", "e1", "e2", "f1", "f2", "g1", "g2",
        ] {
            payload[item] = json!(score);
        }
        if let Some(comment) = comment {
            payload["comment"] = json!(comment);
        }

        self.client
            .post(self.url("/api/practices/responses"))
            .json(&payload)
            .send()
            .await
            .unwrap()
    }

    async fn start_quiz(&self) -> Value {
        let response = self
            .client
            .post(self.url("/api/quiz/sessions"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.unwrap()
    }

    async fn answer(&self, token: &str, response: Option<&str>) -> reqwest::Response {
        self.client
            .post(self.url("/api/quiz/sessions/answer"))
            .json(&json!({ "session_token": token, "response": response }))
            .send()
            .await
            .unwrap()
    }

    /// Runs a full session and returns the final step.
    async fn complete_quiz(&self, answers: [&str; 6]) -> Value {
        let mut step = self.start_quiz().await;
        for answer in answers {
            let token = step["session_token"].as_str().unwrap().to_string();
            let response = self.answer(&token, Some(answer)).await;
            assert_eq!(response.status().as_u16(), 200);
            step = response.json().await.unwrap();
        }
        step
    }
}

#[tokio::test]
async fn questionnaire_lists_seven_dimensions() {
    let app = spawn_app().await;

    let body: Value = app
        .client
        .get(app.url("/api/practices/questionnaire"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let dimensions = body["dimensions"].as_array().unwrap();
    assert_eq!(dimensions.len(), 7);
    assert_eq!(dimensions[0]["items"], json!(["a1", "a2"]));
    assert_eq!(body["scale"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn practice_submission_rejects_out_of_range_scores() {
    let app = spawn_app().await;

    for score in [0, 8] {
        let response = app.submit_practices(score, None).await;
        assert_eq!(response.status().as_u16(), 400, "score {}", score);
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM practice_responses")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn practice_stats_report_no_data_when_empty() {
    let app = spawn_app().await;
    let token = app.login("manager", "manager_pass").await;

    let response = app
        .client
        .get(app.url("/api/practices/stats"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["no_data"], true);
}

#[tokio::test]
async fn practice_stats_aggregate_all_submissions() {
    let app = spawn_app().await;

    let response = app.submit_practices(7, Some("Great team")).await;
    assert_eq!(response.status().as_u16(), 201);
    assert!(response.json::<Value>().await.unwrap()["id"].as_i64().is_some());

    let response = app.submit_practices(4, Some("   ")).await;
    assert_eq!(response.status().as_u16(), 201);

    let token = app.login("manager", "manager_pass").await;
    let body: Value = app
        .client
        .get(app.url("/api/practices/stats"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // (14 + 8) / 2 = 11 for every dimension.
    assert_eq!(body["response_count"], 2);
    let dimensions = body["dimensions"].as_array().unwrap();
    assert_eq!(dimensions.len(), 7);
    for dimension in dimensions {
        assert_eq!(dimension["mean"].as_f64(), Some(11.0));
        assert_eq!(dimension["classification"], "Medium");
    }
    assert_eq!(body["overall_classification"], "Medium");

    assert_eq!(
        body["distribution"],
        json!([{ "score": 4, "count": 14 }, { "score": 7, "count": 14 }])
    );

    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["comment"], "Great team");
    assert!(body["first_response"].is_string());
}

#[tokio::test]
async fn quiz_flow_walks_six_questions_then_completes() {
    let app = spawn_app().await;

    let first = app.start_quiz().await;
    assert_eq!(first["stage"], json!({ "status": "answering", "question": 1 }));
    assert_eq!(first["question"]["id"], "q1");
    assert!(first["question"].get("correct").is_none());

    let last = app.complete_quiz(CORRECT_ANSWERS).await;
    assert_eq!(last["stage"], json!({ "status": "completed" }));
    assert!(last["question"].is_null());

    // A seventh answer is rejected and not stored.
    let token = last["session_token"].as_str().unwrap();
    let response = app.answer(token, Some("a")).await;
    assert_eq!(response.status().as_u16(), 400);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quiz_responses")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 6);
}

#[tokio::test]
async fn quiz_rejects_invalid_answers_without_advancing() {
    let app = spawn_app().await;
    let first = app.start_quiz().await;
    let token = first["session_token"].as_str().unwrap();

    let response = app.answer(token, None).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.answer(token, Some("z")).await;
    assert_eq!(response.status().as_u16(), 400);

    let response = app.answer("tampered.token.value", Some("a")).await;
    assert_eq!(response.status().as_u16(), 401);

    // The first token still answers question 1.
    let response = app.answer(token, Some("b")).await;
    assert_eq!(response.status().as_u16(), 200);
    let step: Value = response.json().await.unwrap();
    assert_eq!(step["question"]["id"], "q2");
}

#[tokio::test]
async fn replayed_answer_is_a_conflict() {
    let app = spawn_app().await;
    let first = app.start_quiz().await;
    let token = first["session_token"].as_str().unwrap();

    let response = app.answer(token, Some("b")).await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app.answer(token, Some("a")).await;
    assert_eq!(response.status().as_u16(), 409);

    let stored: String = sqlx::query_scalar("SELECT response FROM quiz_responses")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(stored, "b");
}

#[tokio::test]
async fn retried_answer_with_same_response_advances() {
    let app = spawn_app().await;
    let first = app.start_quiz().await;
    let token = first["session_token"].as_str().unwrap();

    let response = app.answer(token, Some("b")).await;
    assert_eq!(response.status().as_u16(), 200);

    // The first reply was lost; the client resends the same answer.
    let response = app.answer(token, Some("b")).await;
    assert_eq!(response.status().as_u16(), 200);
    let step: Value = response.json().await.unwrap();
    assert_eq!(step["question"]["id"], "q2");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quiz_responses")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);

    // The session can still be finished from the retried step.
    let mut step = step;
    for answer in CORRECT_ANSWERS[1..].iter().copied() {
        let token = step["session_token"].as_str().unwrap().to_string();
        let response = app.answer(&token, Some(answer)).await;
        assert_eq!(response.status().as_u16(), 200);
        step = response.json().await.unwrap();
    }
    assert_eq!(step["stage"], json!({ "status": "completed" }));
}

#[tokio::test]
async fn quiz_stats_score_each_question() {
    let app = spawn_app().await;
    let token = app.login("manager", "manager_pass").await;

    let response = app
        .client
        .get(app.url("/api/quiz/stats"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);

    app.complete_quiz(CORRECT_ANSWERS).await;
    app.complete_quiz(["a", "a", "a", "b", "a", "b"]).await;

    let body: Value = app
        .client
        .get(app.url("/api/quiz/stats"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["response_count"], 12);
    assert_eq!(body["session_count"], 2);
    assert_eq!(body["completed_sessions"], 2);

    let questions = body["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 6);
    assert_eq!(questions[0]["question_id"], "q1");
    assert_eq!(questions[0]["correct"], 1);
    assert_eq!(questions[0]["accuracy"].as_f64(), Some(50.0));
    assert_eq!(questions[1]["accuracy"].as_f64(), Some(100.0));
    assert!(questions[0]["average_response_time"].as_f64().unwrap() >= 0.0);

    // 11 correct over 12 / 6 = 2 respondents.
    assert_eq!(body["overall_accuracy"].as_f64(), Some(550.0));
}

#[tokio::test]
async fn reports_download_as_html_attachments() {
    let app = spawn_app().await;
    let token = app.login("manager", "manager_pass").await;

    for path in ["/api/reports/hpo", "/api/reports/leadership"] {
        let response = app
            .client
            .get(app.url(path))
            .bearer_auth(&token)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 404, "{}", path);
    }

    app.submit_practices(6, Some("<script>alert(1)</script>")).await;
    app.complete_quiz(CORRECT_ANSWERS).await;

    let response = app
        .client
        .get(app.url("/api/reports/hpo"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    assert!(
        response.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .contains("hpo-report.html")
    );
    let html = response.text().await.unwrap();
    assert!(html.contains("12.00/14"));
    assert!(!html.contains("<script>"));

    let response = app
        .client
        .get(app.url("/api/reports/leadership"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(
        response.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .contains("leadership-report.html")
    );
    let html = response.text().await.unwrap();
    assert!(html.contains("<strong>Completed sessions:</strong> 1"));
}

#[tokio::test]
async fn reset_requires_confirmation_and_keeps_accounts() {
    let app = spawn_app().await;
    let token = app.login("admin", "admin_pass").await;

    app.submit_practices(5, None).await;
    app.complete_quiz(CORRECT_ANSWERS).await;

    let summary: Value = app
        .client
        .get(app.url("/api/admin/database"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["practice_responses"]["count"], 1);
    assert_eq!(summary["quiz_responses"]["count"], 6);

    for payload in [
        json!({}),
        json!({ "confirm": true }),
        json!({ "acknowledge_data_loss": true }),
    ] {
        let response = app
            .client
            .post(app.url("/api/admin/reset"))
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "{}", payload);
    }

    let response = app
        .client
        .post(app.url("/api/admin/reset"))
        .bearer_auth(&token)
        .json(&json!({ "confirm": true, "acknowledge_data_loss": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let outcome: Value = response.json().await.unwrap();
    assert_eq!(outcome["practice_responses_deleted"], 1);
    assert_eq!(outcome["quiz_responses_deleted"], 6);

    let summary: Value = app
        .client
        .get(app.url("/api/admin/database"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["practice_responses"]["count"], 0);
    assert!(summary["quiz_responses"]["first_response"].is_null());

    // Accounts survive a reset.
    app.login("manager", "manager_pass").await;
}

#[tokio::test]
async fn deleted_admin_token_cannot_reset() {
    let app = spawn_app().await;
    let token = app.login("admin", "admin_pass").await;

    let response = app
        .client
        .post(app.url("/api/admin/users"))
        .bearer_auth(&token)
        .json(&json!({
            "username": "admin2",
            "password": "admin2_pass",
            "confirm_password": "admin2_pass",
            "role": "administrator"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 201);
    let admin2_id = response.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    let admin2_token = app.login("admin2", "admin2_pass").await;
    app.submit_practices(5, None).await;

    let response = app
        .client
        .delete(app.url(&format!("/api/admin/users/{}", admin2_id)))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    let response = app
        .client
        .post(app.url("/api/admin/reset"))
        .bearer_auth(&admin2_token)
        .json(&json!({ "confirm": true, "acknowledge_data_loss": true }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM practice_responses")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}
