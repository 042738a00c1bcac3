//! Client behaviour against a mocked gateway.

use std::time::Duration;

use mockito::Matcher;
use pretty_assertions::assert_eq;
use serde_json::json;
use tandem_core::completion::CompletionTable;
use tandem_core::{
    CompletionError, CompletionSource, Marketplace, MarketplaceError, Money, Survey, SurveySettings,
};
use tandem_market::MarketClient;

/// `base64("id:secret")`
const BASIC_AUTH: &str = "Basic aWQ6c2VjcmV0";

fn client(server: &mockito::Server) -> MarketClient {
    MarketClient::new(&server.url(), "id", "secret", Duration::from_secs(5)).unwrap()
}

fn page_query(page: u32) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("page_size".into(), "100".into()),
        Matcher::UrlEncoded("page_number".into(), page.to_string()),
    ])
}

#[tokio::test]
async fn balance_is_fetched_with_basic_auth() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/account/balance")
        .match_header("authorization", BASIC_AUTH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"available_balance": "42.50"}"#)
        .create_async()
        .await;

    let balance = client(&server).get_account_balance().await.unwrap();
    assert_eq!(balance, Money::from_cents(4250));
    mock.assert_async().await;
}

#[tokio::test]
async fn bad_credentials_surface_as_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/account/balance")
        .with_status(401)
        .with_body(r#"{"message": "invalid access key"}"#)
        .create_async()
        .await;

    let err = client(&server).get_account_balance().await.unwrap_err();
    assert_eq!(
        err,
        MarketplaceError::Api {
            status: 401,
            message: "invalid access key".into()
        }
    );
}

#[tokio::test]
async fn rate_limit_carries_retry_after() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/tasks/T1/assignments")
        .match_query(Matcher::Any)
        .with_status(429)
        .with_header("retry-after", "7")
        .create_async()
        .await;

    let err = client(&server).list_assignments("T1", 100, 1).await.unwrap_err();
    assert_eq!(err, MarketplaceError::RateLimited { retry_after_secs: 7 });
}

#[tokio::test]
async fn unreachable_gateway_is_a_transport_error() {
    let client = MarketClient::new("http://127.0.0.1:9", "id", "secret", Duration::from_secs(2)).unwrap();
    let err = client.get_account_balance().await.unwrap_err();
    assert!(matches!(err, MarketplaceError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/account/balance")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client(&server).get_account_balance().await.unwrap_err();
    assert!(matches!(err, MarketplaceError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn notification_posts_subject_and_text() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/workers/A2W1/notifications")
        .match_header("authorization", BASIC_AUTH)
        .match_body(Matcher::Json(json!({
            "subject": "Part two",
            "message_text": "Please continue"
        })))
        .with_status(201)
        .with_body(r#"{"notification_id": "N-1"}"#)
        .create_async()
        .await;

    let ack = client(&server)
        .notify("A2W1", "Part two", "Please continue")
        .await
        .unwrap();
    assert_eq!(ack.reference, "N-1");
    mock.assert_async().await;
}

#[tokio::test]
async fn bonus_posts_amount_and_reason() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/bonuses")
        .match_body(Matcher::Json(json!({
            "worker_id": "A2W1",
            "assignment_id": "3A1",
            "bonus_amount": "0.75",
            "reason": "thanks"
        })))
        .with_status(200)
        .with_body(r#"{"bonus_id": "B-9"}"#)
        .create_async()
        .await;

    let receipt = client(&server)
        .grant_bonus("A2W1", "3A1", Money::from_cents(75), "thanks")
        .await
        .unwrap();
    assert_eq!(receipt.reference, "B-9");
    mock.assert_async().await;
}

struct NoCompletions;

impl CompletionSource for NoCompletions {
    async fn fetch_completions(&self) -> Result<CompletionTable, CompletionError> {
        Ok(CompletionTable::default())
    }
}

#[tokio::test]
async fn survey_pages_through_every_assignment() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/v1/account/balance")
        .with_status(200)
        .with_body(r#"{"available_balance": "1.00"}"#)
        .create_async()
        .await;
    let first = server
        .mock("GET", "/v1/tasks/T1/assignments")
        .match_query(page_query(1))
        .with_status(200)
        .with_body(
            json!({"assignments": [
                {"assignment_id": "A1", "worker_id": "W1", "answers": [{"question_id": "Q1", "fields": ["yes"]}]},
                {"assignment_id": "A2", "worker_id": "W2", "answers": [{"question_id": "Q1", "fields": ["no"]}]}
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let last = server
        .mock("GET", "/v1/tasks/T1/assignments")
        .match_query(page_query(2))
        .with_status(200)
        .with_body(r#"{"assignments": []}"#)
        .create_async()
        .await;

    let settings = SurveySettings {
        task_ids: vec!["T1".into()],
        questions: vec!["Q1".into()],
        respondent_column: "Worker ID".into(),
        ..Default::default()
    };
    let mut survey = Survey::connect(client(&server), NoCompletions, settings)
        .await
        .unwrap();
    survey.set_conditions(&["Q1 == yes"]).unwrap();

    assert_eq!(survey.qualified_respondents().await.unwrap(), vec!["W1"]);
    first.assert_async().await;
    last.assert_async().await;
}
