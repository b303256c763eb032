//! Integration tests for plan generation and chat

mod common;

use axum::http::StatusCode;
use common::{text, tool_call, TestApp};
use fitforge_backend::services::agent::{MessageRole, NO_FINAL_RESPONSE};
use fitforge_backend::services::OllamaClient;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn plan_body() -> serde_json::Value {
    json!({
        "age": 28,
        "weight_kg": 82.0,
        "height_cm": 180.0,
        "gender": "male",
        "activity_level": "moderately_active",
        "goal": "build_muscle",
        "available_equipment": ["Barbell", "Dumbbells"],
        "days_per_week": 4
    })
}

#[tokio::test]
async fn test_generate_plan_uses_tools_and_returns_report() {
    let app = TestApp::with_replies(vec![
        tool_call(
            "calculate_tdee_and_macros",
            json!({
                "weight_kg": 82, "height_cm": 180, "age": 28, "gender": "male",
                "activity_level": "moderately_active", "goal": "build_muscle"
            }),
        ),
        text("Here is your 4-day plan."),
    ])
    .await;

    let (status, json) = app.post_json("/generate-plan", plan_body()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["plan"], "Here is your 4-day plan.");

    let requests = app.llm.requests().await;
    assert_eq!(requests.len(), 2);
    let brief = &requests[0][1].content;
    assert!(brief.contains("**Available Equipment:** Barbell, Dumbbells"));
    assert!(brief.contains("4-day workout plan"));
    let tool_message = requests[1].last().unwrap();
    assert_eq!(tool_message.role, MessageRole::Tool);
    assert!(tool_message.content.contains("calories"));
}

#[tokio::test]
async fn test_generate_plan_does_not_retain_sessions() {
    let app = TestApp::with_replies(vec![text("Plan one."), text("Plan two."), text("Plan three.")]).await;

    for _ in 0..3 {
        let (status, json) = app.post_json("/generate-plan", plan_body()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_object().unwrap().keys().collect::<Vec<_>>(), vec!["plan"]);
    }

    assert!(app.state.sessions.is_empty().await);
}

#[tokio::test]
async fn test_generate_plan_rejects_invalid_profile() {
    let app = TestApp::new().await;
    let mut body = plan_body();
    body["days_per_week"] = json!(9);

    let (status, json) = app.post_json("/generate-plan", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["field"], "days_per_week");
    assert!(app.llm.requests().await.is_empty());
}

#[tokio::test]
async fn test_chat_starts_session_and_logs_workout() {
    let app = TestApp::with_replies(vec![
        tool_call(
            "log_workout",
            json!({ "user_id": 1, "exercise_name": "Deadlift", "sets": 3, "reps": 5, "weight_kg": 140 }),
        ),
        text("Logged your deadlifts."),
    ])
    .await;

    let (status, json) = app
        .post_json(
            "/chat",
            json!({ "message": "I did 3x5 deadlifts at 140kg", "mode": "exercise", "user_id": 1 }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Logged your deadlifts.");
    assert!(uuid::Uuid::parse_str(json["session_id"].as_str().unwrap()).is_ok());
    assert_eq!(app.store.workout_log_count().await, 1);

    let requests = app.llm.requests().await;
    let prompt = &requests[0][1].content;
    assert!(prompt.contains("exercise and fitness AI coach"));
    assert!(prompt.contains("The user's id for logging and progress tools is 1."));
    assert!(prompt.ends_with("User: I did 3x5 deadlifts at 140kg"));
}

#[tokio::test]
async fn test_chat_continues_existing_session() {
    let app = TestApp::with_replies(vec![text("Hi! How can I help?"), text("Try rice and chicken.")]).await;

    let (_, first) = app.post_json("/chat", json!({ "message": "Hello" })).await;
    let session_id = first["session_id"].as_str().unwrap().to_string();

    let (status, second) = app
        .post_json(
            "/chat",
            json!({ "message": "What should I eat?", "session_id": session_id, "mode": "diet" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["session_id"], session_id.as_str());

    let requests = app.llm.requests().await;
    let continued = &requests[1];
    assert_eq!(continued.len(), 4);
    assert_eq!(continued[2].content, "Hi! How can I help?");
    assert!(continued[3].content.contains("diet and nutrition AI coach"));
}

#[tokio::test]
async fn test_chat_with_unknown_session_starts_fresh() {
    let app = TestApp::with_replies(vec![text("Welcome!")]).await;

    let (status, json) = app
        .post_json(
            "/chat",
            json!({ "message": "Hello", "session_id": "not-a-session", "mode": "zumba" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_ne!(json["session_id"], "not-a-session");
    let requests = app.llm.requests().await;
    assert_eq!(requests[0].len(), 2);
    assert!(requests[0][1].content.contains("fitness and nutrition AI coach"));
}

#[tokio::test]
async fn test_chat_rejects_empty_message() {
    let app = TestApp::new().await;

    let (status, json) = app.post_json("/chat", json!({ "message": "" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_chat_empty_final_reply_uses_placeholder() {
    let app = TestApp::with_replies(vec![text("   ")]).await;

    let (_, json) = app.post_json("/chat", json!({ "message": "Hello" })).await;

    assert_eq!(json["response"], NO_FINAL_RESPONSE);
}

#[tokio::test]
async fn test_chat_unknown_tool_is_reported_to_model() {
    let app = TestApp::with_replies(vec![tool_call("teleport", json!({})), text("Sorry, I can't do that.")]).await;

    let (status, json) = app.post_json("/chat", json!({ "message": "Beam me up" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["response"], "Sorry, I can't do that.");
    let requests = app.llm.requests().await;
    assert!(requests[1].last().unwrap().content.starts_with("Error: "));
}

#[tokio::test]
async fn test_model_failure_is_bad_gateway() {
    let app = TestApp::new().await;

    let (status, json) = app.post_json("/chat", json!({ "message": "Hello" })).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"]["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn test_chat_against_ollama_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.1",
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{
                    "function": { "name": "calculate_bmi", "arguments": { "weight_kg": 70, "height_cm": 175 } }
                }]
            },
            "done": true
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.1",
            "message": { "role": "assistant", "content": "Your BMI is 22.9, a healthy weight." },
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let llm = OllamaClient::new(&server.uri(), "llama3.1", Duration::from_secs(5)).unwrap();
    let app = TestApp::with_llm(Arc::new(llm)).await;

    let (status, body) = common::send(&app, "POST", "/chat", Some(r#"{"message":"What's my BMI? 70kg, 175cm"}"#)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::parse(&body)["response"], "Your BMI is 22.9, a healthy weight.");
}
