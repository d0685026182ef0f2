//! HTTP boundary against a mock chat-completions server.

use medibridge_ai::{CompletionClient, CompletionClientBuilder, ErrorKind, Message};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

const PATH: &str = "/chat/completions";

fn envelope(content: &str) -> String {
    json!({
        "id": "gen-1",
        "choices": [{"message": {"role": "assistant", "content": content}}]
    })
    .to_string()
}

fn client_for(server: &ServerGuard, candidates: &[&str]) -> CompletionClient {
    CompletionClientBuilder::new()
        .base_url_override(server.url())
        .with_api_key("sk-test")
        .with_candidates(candidates.iter().copied())
        .timeout_secs(5)
        .build()
        .expect("client should build")
}

fn model_is(model: &str) -> Matcher {
    Matcher::PartialJson(json!({ "model": model }))
}

#[tokio::test]
async fn test_request_carries_auth_headers_and_parameters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("authorization", "Bearer sk-test")
        .match_header("http-referer", "https://medibridge.com")
        .match_header("x-title", "MediBridge Health")
        .match_header("x-request-id", Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "model": "m1",
            "messages": [{"role": "user", "content": "hello"}],
            "max_tokens": 400,
            "reasoning": {"enabled": true}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(envelope("hi there"))
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, &["m1"]);
    let result = client
        .complete_messages(
            vec![Message::user("hello")],
            medibridge_ai::GenerationConfig::chat(),
        )
        .await
        .unwrap();

    assert_eq!(result.content, "hi there");
    assert_eq!(result.model, "m1");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_then_success() {
    let mut server = Server::new_async().await;
    let limited = server
        .mock("POST", PATH)
        .match_body(model_is("m1"))
        .with_status(429)
        .with_header("retry-after", "12")
        .with_body(r#"{"error":{"message":"Rate limit exceeded"}}"#)
        .expect(1)
        .create_async()
        .await;
    let ok = server
        .mock("POST", PATH)
        .match_body(model_is("m2"))
        .with_status(200)
        .with_body(envelope("second time lucky"))
        .expect(1)
        .create_async()
        .await;

    let client = client_for(&server, &["m1", "m2"]);
    let (result, stats) = client
        .complete_with_stats(
            &medibridge_ai::CompletionRequest::new(
                vec![Message::user("q")],
                medibridge_ai::GenerationConfig::chat(),
            )
            .unwrap(),
            &medibridge_ai::CancellationToken::new(),
        )
        .await
        .unwrap();

    assert_eq!(result.model, "m2");
    assert_eq!(stats.failed_attempts[0].error_kind, ErrorKind::UpstreamRateLimited);
    limited.assert_async().await;
    ok.assert_async().await;
}

#[tokio::test]
async fn test_every_failure_class_exhausts() {
    let mut server = Server::new_async().await;
    let _m1 = server
        .mock("POST", PATH)
        .match_body(model_is("m1"))
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;
    let _m2 = server
        .mock("POST", PATH)
        .match_body(model_is("m2"))
        .with_status(200)
        .with_body(r#"{"error": "no choices here"}"#)
        .create_async()
        .await;
    let _m3 = server
        .mock("POST", PATH)
        .match_body(model_is("m3"))
        .with_status(200)
        .with_body("<html>gateway</html>")
        .create_async()
        .await;

    let client = client_for(&server, &["m1", "m2", "m3"]);
    let err = client
        .complete_messages(
            vec![Message::user("q")],
            medibridge_ai::GenerationConfig::triage(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AllProvidersExhausted);
    assert_eq!(
        err.last_candidate_error().map(|e| e.kind()),
        Some(ErrorKind::MalformedEnvelope)
    );
}

#[tokio::test]
async fn test_predict_over_http_with_reasoning_trace() {
    let mut server = Server::new_async().await;
    let _down = server
        .mock("POST", PATH)
        .match_body(model_is("m1"))
        .with_status(503)
        .with_body("unavailable")
        .create_async()
        .await;
    let body = json!({
        "choices": [{
            "message": {
                "content": "Here you go {\"illnesses\":[{\"name\":\"Migraine\",\"confidence\":\"70%\",\"severity\":\"moderate\",\"description\":\"recurrent headache\"}],\"doctor_specialist\":\"Neurologist\"}",
                "reasoning_details": [{"type": "reasoning.text", "text": "pulsating headache suggests migraine"}]
            }
        }]
    });
    let _up = server
        .mock("POST", PATH)
        .match_body(Matcher::AllOf(vec![
            model_is("m2"),
            Matcher::Regex("Analyze the following symptoms".to_string()),
        ]))
        .with_status(200)
        .with_body(body.to_string())
        .create_async()
        .await;

    let client = client_for(&server, &["m1", "m2"]);
    let report = client
        .predict_report("throbbing headache and light sensitivity")
        .await
        .unwrap();

    assert_eq!(report.model_used, "m2");
    assert_eq!(report.prediction.illnesses[0].name, "Migraine");
    assert_eq!(report.prediction.doctor_specialist, "Neurologist");
    assert!(report.prediction.home_remedies.is_empty());
    assert!(report.reasoning_details.is_some());
}

/// Accepts connections and never writes a byte back.
async fn silent_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_silent_upstream_times_out_at_exact_budget() {
    let client = CompletionClientBuilder::new()
        .base_url_override(silent_upstream().await)
        .with_api_key("sk-test")
        .with_candidates(["m1"])
        .timeout(Duration::from_millis(1500))
        .build()
        .unwrap();

    let started = Instant::now();
    let err = client
        .complete_messages(
            vec![Message::user("q")],
            medibridge_ai::GenerationConfig::chat(),
        )
        .await
        .unwrap_err();

    assert!(started.elapsed() >= Duration::from_millis(1400));
    assert_eq!(err.kind(), ErrorKind::AllProvidersExhausted);
    assert_eq!(
        err.last_candidate_error(),
        Some(&medibridge_ai::CandidateError::Timeout { after_ms: 1500 })
    );
}
