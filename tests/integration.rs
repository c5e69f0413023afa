// Integration tests for the full request flow over real HTTP
// A local mockito server stands in for the SQL generation service
#![allow(clippy::unwrap_used)]

use mockito::{Matcher, Server};
use serde_json::json;
use sqlgen_client::config::Config;
use sqlgen_client::handler::{Outcome, SubmitHandler, Submission};
use sqlgen_client::http::{HttpClient, ReqwestClient};
use sqlgen_client::models::AppError;
use sqlgen_client::view::MemoryView;
use std::net::TcpListener;

const SCHEMA: &str = r#"{"orders": {"columns": ["id", "total"]}}"#;

fn handler_for(server: &Server) -> SubmitHandler<ReqwestClient> {
    let config = Config::new(&server.url()).unwrap();
    SubmitHandler::new(ReqwestClient::default(), &config)
}

#[tokio::test]
async fn test_full_generate_flow() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "db_schema": {"orders": {"columns": ["id", "total"]}},
            "question": "total of all orders"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success": true, "generated_sql": "SELECT SUM(total) FROM orders"}"#)
        .create_async()
        .await;

    let handler = handler_for(&server);
    let view = MemoryView::new(SCHEMA, "total of all orders");

    let submission = handler.submit(&view).await;

    mock.assert_async().await;
    assert_eq!(
        submission,
        Submission::Completed(Outcome::Generated(
            "SELECT SUM(total) FROM orders".to_string()
        ))
    );
    assert_eq!(view.result(), "SELECT SUM(total) FROM orders");
    assert!(!view.is_loading());
}

#[tokio::test]
async fn test_application_error_flow() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .with_status(200)
        .with_body(r#"{"success": false, "error": "bad table"}"#)
        .create_async()
        .await;

    let handler = handler_for(&server);
    let view = MemoryView::new(SCHEMA, "q");

    handler.submit(&view).await;

    mock.assert_async().await;
    assert_eq!(view.result(), "Error: bad table");
}

#[tokio::test]
async fn test_status_code_is_not_distinguished() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/generate")
        .with_status(500)
        .with_body(r#"{"success": false, "error": "model not loaded"}"#)
        .create_async()
        .await;

    let handler = handler_for(&server);
    let view = MemoryView::new(SCHEMA, "q");

    handler.submit(&view).await;

    assert_eq!(view.result(), "Error: model not loaded");
}

#[tokio::test]
async fn test_unprocessable_schema_reply_is_an_application_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .match_body(Matcher::PartialJson(json!({"db_schema": [1, 2]})))
        .with_status(422)
        .with_header("content-type", "application/json")
        .with_body(r#"{"detail": [{"type": "dict_type", "loc": ["body", "db_schema"], "msg": "Input should be a valid dictionary"}]}"#)
        .create_async()
        .await;

    let handler = handler_for(&server);
    let view = MemoryView::new("[1, 2]", "q");

    handler.submit(&view).await;

    mock.assert_async().await;
    assert_eq!(view.result(), "Error: undefined");
    assert!(!view.is_loading());
}

#[tokio::test]
async fn test_non_json_reply_is_a_server_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/generate")
        .with_status(502)
        .with_header("content-type", "text/html")
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let handler = handler_for(&server);
    let view = MemoryView::new(SCHEMA, "q");

    handler.submit(&view).await;

    let result = view.result();
    assert!(
        result.starts_with("Server Error: Invalid response"),
        "unexpected result: {result}"
    );
    assert!(!view.is_loading());
}

#[tokio::test]
async fn test_invalid_schema_sends_nothing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .expect(0)
        .create_async()
        .await;

    let handler = handler_for(&server);
    let view = MemoryView::new("{", "q");

    handler.submit(&view).await;

    mock.assert_async().await;
    assert!(view.result().starts_with("Server Error:"));
}

#[tokio::test]
async fn test_connection_refused_is_a_server_error() {
    // Bind then release a port so nothing is listening on it
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = Config::new(&format!("http://127.0.0.1:{port}")).unwrap();
    let handler = SubmitHandler::new(ReqwestClient::default(), &config);
    let view = MemoryView::new(SCHEMA, "q");

    handler.submit(&view).await;

    let result = view.result();
    assert!(
        result.starts_with("Server Error: Request failed"),
        "unexpected result: {result}"
    );
    assert!(!view.is_loading());
}

#[tokio::test]
async fn test_reqwest_client_returns_body_as_value() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/echo")
        .with_body(r#"{"anything": [1, 2, 3]}"#)
        .create_async()
        .await;

    let client = ReqwestClient::default();
    let value = client
        .post_json(&format!("{}/echo", server.url()), &json!({}))
        .await
        .unwrap();

    assert_eq!(value, json!({"anything": [1, 2, 3]}));
}

#[tokio::test]
async fn test_reqwest_client_classifies_bad_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/echo")
        .with_body("not json")
        .create_async()
        .await;

    let err = ReqwestClient::default()
        .post_json(&format!("{}/echo", server.url()), &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_sequential_submissions_match() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/generate")
        .with_body(r#"{"success": true, "generated_sql": "SELECT 1"}"#)
        .expect(2)
        .create_async()
        .await;

    let handler = handler_for(&server);
    let view = MemoryView::new(SCHEMA, "q");

    let first = handler.submit(&view).await;
    let first_result = view.result();
    let second = handler.submit(&view).await;

    mock.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(first_result, view.result());
}
