//! Compare the qualified respondents against stage-two completions.

use serde::Serialize;
use std::collections::HashSet;

use crate::completion::CompletionTable;
use crate::errors::CompletionError;

/// Who among the qualified respondents finished stage two, and who did not.
///
/// `completed` and `remaining` partition the qualified set: they never
/// overlap and together hold every qualified respondent once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    completed: Vec<String>,
    remaining: Vec<String>,
}

impl Reconciliation {
    /// Split `qualified` by exact, case-sensitive membership in `completions`.
    ///
    /// Completion entries that match no qualified respondent are ignored.
    #[must_use]
    pub fn compute<S: AsRef<str>>(qualified: &[String], completions: &[S]) -> Self {
        let finished: HashSet<&str> = completions.iter().map(AsRef::as_ref).collect();
        let mut seen = HashSet::new();
        let mut result = Self::default();

        for respondent in qualified {
            if !seen.insert(respondent.as_str()) {
                continue;
            }
            if finished.contains(respondent.as_str()) {
                result.completed.push(respondent.clone());
            } else {
                result.remaining.push(respondent.clone());
            }
        }

        let ignored = finished.iter().filter(|id| !seen.contains(*id)).count();
        if ignored > 0 {
            tracing::debug!(ignored, "completion entries matched no qualified respondent");
        }
        result
    }

    /// Reconcile against the respondent column of a completion table.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::MissingColumn`] if the table has a header
    /// row without `respondent_column`.
    pub fn from_table(
        qualified: &[String],
        table: &CompletionTable,
        respondent_column: &str,
    ) -> Result<Self, CompletionError> {
        if table.headers().is_empty() {
            tracing::warn!("no data found in completion source");
        }
        let completions = table.column(respondent_column)?;
        Ok(Self::compute(qualified, &completions))
    }

    /// Qualified respondents who completed stage two.
    #[must_use]
    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    /// Qualified respondents who have not completed stage two.
    #[must_use]
    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }
}
