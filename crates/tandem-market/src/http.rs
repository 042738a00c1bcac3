//! Status-code handling shared by every gateway call.

use crate::error::MarketClientError;

/// Seconds to wait when a 429 carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Return the response unchanged on success.
///
/// - **429 Too Many Requests** → [`MarketClientError::RateLimited`], honouring
///   `Retry-After` in seconds.
/// - **Other non-success** → [`MarketClientError::Api`] carrying the gateway's
///   `message` field when the body is a JSON error, the raw body otherwise.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, MarketClientError> {
    if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(MarketClientError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        });
    }
    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        return Err(MarketClientError::Api {
            status,
            message: error_message(&body),
        });
    }
    Ok(resp)
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

fn error_message(body: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        message: String,
    }

    serde_json::from_str::<ErrorBody>(body).map_or_else(|_| body.to_string(), |e| e.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(::http::Response::builder().status(status).body(body).unwrap())
    }

    fn mock_response_with_retry_after(value: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(429)
                .header("Retry-After", value)
                .body("")
                .unwrap(),
        )
    }

    #[test]
    fn parse_retry_after_from_header() {
        assert_eq!(parse_retry_after(&mock_response_with_retry_after("120")), 120);
    }

    #[test]
    fn parse_retry_after_falls_back() {
        assert_eq!(parse_retry_after(&mock_response(429, "")), 60);
        assert_eq!(
            parse_retry_after(&mock_response_with_retry_after("Wed, 21 Oct 2015 07:28:00 GMT")),
            60
        );
    }

    #[tokio::test]
    async fn rate_limited_with_header() {
        let err = check_response(mock_response_with_retry_after("30")).await.unwrap_err();
        assert!(matches!(err, MarketClientError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn api_error_prefers_json_message() {
        let err = check_response(mock_response(400, r#"{"message":"worker has opted out"}"#))
            .await
            .unwrap_err();
        match err {
            MarketClientError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "worker has opted out");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn api_error_falls_back_to_raw_body() {
        let err = check_response(mock_response(502, "bad gateway")).await.unwrap_err();
        assert!(matches!(err, MarketClientError::Api { status: 502, message } if message == "bad gateway"));
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(mock_response(200, "{}")).await.is_ok());
    }
}
