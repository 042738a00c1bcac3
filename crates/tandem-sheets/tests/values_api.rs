use std::time::Duration;

use mockito::Matcher;
use pretty_assertions::assert_eq;
use tandem_core::{CompletionError, CompletionSource};
use tandem_sheets::{DEFAULT_COLUMNS, DEFAULT_TAB, SheetCompletionSource, SheetsClient};

fn source(server: &mockito::Server) -> SheetCompletionSource {
    let client = SheetsClient::new(&server.url(), "ya29.token", Duration::from_secs(5)).unwrap();
    SheetCompletionSource::new(client, "1AbC", DEFAULT_TAB, DEFAULT_COLUMNS)
}

fn values_path() -> Matcher {
    Matcher::Regex(r"^/v4/spreadsheets/1AbC/values/Form".into())
}

#[tokio::test]
async fn reads_header_and_pads_short_rows() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", values_path())
        .match_header("authorization", "Bearer ya29.token")
        .with_status(200)
        .with_body(
            r#"{
                "range": "'Form Responses 1'!A1:C3",
                "majorDimension": "ROWS",
                "values": [
                    ["Timestamp", "Worker ID", "Comments"],
                    ["3/1/2024 10:02:11", "A2W1", "fine"],
                    ["3/1/2024 11:40:00", "A2W2"]
                ]
            }"#,
        )
        .create_async()
        .await;

    let table = source(&server).fetch_completions().await.unwrap();
    assert_eq!(table.column("Worker ID").unwrap(), vec!["A2W1", "A2W2"]);
    assert_eq!(table.rows()[1], vec!["3/1/2024 11:40:00", "A2W2", ""]);
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_sheet_is_an_empty_table() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", values_path())
        .with_status(200)
        .with_body(r#"{"range": "'Form Responses 1'!A1:AZ1000", "majorDimension": "ROWS"}"#)
        .create_async()
        .await;

    let table = source(&server).fetch_completions().await.unwrap();
    assert!(table.is_empty());
    assert!(table.column("Worker ID").unwrap().is_empty());
}

#[tokio::test]
async fn permission_denied_is_unavailable() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", values_path())
        .with_status(403)
        .with_body(r#"{"error": {"code": 403, "message": "The caller does not have permission", "status": "PERMISSION_DENIED"}}"#)
        .create_async()
        .await;

    let err = source(&server).fetch_completions().await.unwrap_err();
    match err {
        CompletionError::Unavailable(message) => {
            assert!(message.contains("The caller does not have permission"), "{message}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn garbage_body_is_malformed() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", values_path())
        .with_status(200)
        .with_body("<html>login</html>")
        .create_async()
        .await;

    let err = source(&server).fetch_completions().await.unwrap_err();
    assert!(matches!(err, CompletionError::Malformed(_)), "{err:?}");
}
