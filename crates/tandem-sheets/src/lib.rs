//! # tandem-sheets
//!
//! Stage-two completions read from a spreadsheet through the values API
//! (`GET /v4/spreadsheets/{id}/values/{range}`).

mod client;
mod error;

pub use client::SheetsClient;
pub use error::SheetsError;

use tandem_core::completion::CompletionTable;
use tandem_core::{CompletionError, CompletionSource};

/// The tab a linked response form writes to by default.
pub const DEFAULT_TAB: &str = "Form Responses 1";

/// Column span read by default.
pub const DEFAULT_COLUMNS: &str = "A:AZ";

/// A completion source backed by one range of one spreadsheet.
#[derive(Debug, Clone)]
pub struct SheetCompletionSource {
    client: SheetsClient,
    spreadsheet_id: String,
    range: String,
}

impl SheetCompletionSource {
    #[must_use]
    pub fn new(client: SheetsClient, spreadsheet_id: impl Into<String>, tab: &str, columns: &str) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.into(),
            range: format!("{tab}!{columns}"),
        }
    }

    #[must_use]
    pub fn range(&self) -> &str {
        &self.range
    }
}

impl CompletionSource for SheetCompletionSource {
    async fn fetch_completions(&self) -> Result<CompletionTable, CompletionError> {
        let values = self.client.read_range(&self.spreadsheet_id, &self.range).await?;
        if values.is_empty() {
            tracing::warn!(spreadsheet_id = %self.spreadsheet_id, range = %self.range, "no data found");
        }
        Ok(CompletionTable::from_values(values))
    }
}
