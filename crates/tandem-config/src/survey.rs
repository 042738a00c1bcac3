//! Survey definition: which tasks, which questions, and how to reach stage two.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_sender_name() -> String {
    String::from("The Survey Team")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SurveyConfig {
    /// Stage-one task identifiers on the marketplace.
    #[serde(default)]
    pub task_ids: Vec<String>,

    /// Screener question identifiers.
    #[serde(default)]
    pub questions: Vec<String>,

    /// Link to the stage-two form, included in every notification.
    #[serde(default)]
    pub follow_up_link: String,

    #[serde(default = "default_sender_name")]
    pub sender_name: String,

    /// Screening conditions, e.g. `"Q1 == yes"`. Replaced wholesale by
    /// `--condition` on the command line.
    #[serde(default)]
    pub conditions: Vec<String>,

    /// Default CSV destination for `merge`. Empty means no file.
    #[serde(default)]
    pub export_path: String,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            task_ids: Vec::new(),
            questions: Vec::new(),
            follow_up_link: String::new(),
            sender_name: default_sender_name(),
            conditions: Vec::new(),
            export_path: String::new(),
        }
    }
}

impl SurveyConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.task_ids.is_empty() && !self.questions.is_empty()
    }

    /// Fail unless at least one task and one question are listed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] naming the missing fields, or
    /// [`ConfigError::InvalidValue`] for a blank task id.
    pub fn require(&self) -> Result<&Self, ConfigError> {
        let mut missing = Vec::new();
        if self.task_ids.is_empty() {
            missing.push("task_ids");
        }
        if self.questions.is_empty() {
            missing.push("questions");
        }
        if !missing.is_empty() {
            return Err(ConfigError::NotConfigured {
                section: "survey".into(),
                missing: missing.join(", "),
            });
        }
        if self.task_ids.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "survey.task_ids".into(),
                reason: "task ids must not be blank".into(),
            });
        }
        Ok(self)
    }
}
