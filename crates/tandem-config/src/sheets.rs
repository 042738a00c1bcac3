//! Stage-two completion source configuration.
//!
//! Completions are read from a spreadsheet through the values API, or from a
//! local CSV export when `csv_path` is set.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_base_url() -> String {
    String::from("https://sheets.googleapis.com")
}

/// The tab a linked response form writes to.
fn default_tab() -> String {
    String::from("Form Responses 1")
}

fn default_columns() -> String {
    String::from("A:AZ")
}

const fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetsConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// OAuth bearer token with read access to the spreadsheet.
    #[serde(default)]
    pub access_token: String,

    #[serde(default)]
    pub spreadsheet_id: String,

    #[serde(default = "default_tab")]
    pub tab: String,

    /// Column span in A1 notation.
    #[serde(default = "default_columns")]
    pub columns: String,

    /// Header of the column where respondents entered their marketplace id.
    #[serde(default)]
    pub respondent_column: String,

    /// Read completions from this CSV file instead of the values API.
    #[serde(default)]
    pub csv_path: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: String::new(),
            spreadsheet_id: String::new(),
            tab: default_tab(),
            columns: default_columns(),
            respondent_column: String::new(),
            csv_path: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SheetsConfig {
    /// `tab!columns`, the A1 range that is read.
    #[must_use]
    pub fn range(&self) -> String {
        format!("{}!{}", self.tab, self.columns)
    }

    #[must_use]
    pub fn uses_csv(&self) -> bool {
        !self.csv_path.is_empty()
    }

    /// Whether either completion source can be reached.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.missing().is_empty()
    }

    /// Fail unless the configured completion source has its required fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the missing fields.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        let missing = self.missing();
        if missing.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::NotConfigured {
                section: "sheets".into(),
                missing: missing.join(", "),
            })
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.respondent_column.is_empty() {
            missing.push("respondent_column");
        }
        if self.uses_csv() {
            return missing;
        }
        if self.access_token.is_empty() {
            missing.push("access_token");
        }
        if self.spreadsheet_id.is_empty() {
            missing.push("spreadsheet_id");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_form_layout() {
        let config = SheetsConfig::default();
        assert_eq!(config.range(), "Form Responses 1!A:AZ");
        assert_eq!(config.base_url, "https://sheets.googleapis.com");
        assert!(!config.is_configured());
        assert!(!config.uses_csv());
    }

    #[test]
    fn csv_source_needs_no_token() {
        let config = SheetsConfig {
            csv_path: "responses.csv".into(),
            respondent_column: "Worker ID".into(),
            ..Default::default()
        };
        assert!(config.uses_csv());
        assert!(config.is_configured());
    }

    #[test]
    fn api_source_needs_token_and_spreadsheet() {
        let config = SheetsConfig {
            respondent_column: "Worker ID".into(),
            ..Default::default()
        };
        let err = config.require().unwrap_err().to_string();
        assert!(err.contains("access_token, spreadsheet_id"), "{err}");
    }
}
