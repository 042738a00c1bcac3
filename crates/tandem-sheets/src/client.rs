//! Values API client.

use std::time::Duration;

use crate::error::SheetsError;

#[derive(serde::Deserialize)]
struct ValueRange {
    #[serde(default)]
    range: String,
    /// Absent when the range holds no data.
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(serde::Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(serde::Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Reads cell values with a bearer token.
#[derive(Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl std::fmt::Debug for SheetsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl SheetsClient {
    /// # Errors
    ///
    /// Returns [`SheetsError::Http`] if the underlying `reqwest::Client`
    /// cannot be built.
    pub fn new(base_url: &str, access_token: impl Into<String>, timeout: Duration) -> Result<Self, SheetsError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tandem/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    /// Read `range` (A1 notation, e.g. `Form Responses 1!A:AZ`) as rows of
    /// display strings. Numbers and booleans are rendered as text.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError`] if the request fails, the API refuses it, or
    /// the body is not a value range.
    pub async fn read_range(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range)
        );
        let resp = self.http.get(&url).bearer_auth(&self.access_token).send().await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body).map_or(body, |e| e.error.message);
            return Err(SheetsError::Api { status, message });
        }

        let body = resp.text().await?;
        let data: ValueRange = serde_json::from_str(&body).map_err(|e| SheetsError::Parse(e.to_string()))?;
        tracing::debug!(range = %data.range, rows = data.values.len(), "read spreadsheet range");
        Ok(data.values.into_iter().map(|row| row.into_iter().map(cell_text).collect()).collect())
    }
}

fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
