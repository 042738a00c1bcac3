//! Error types for the survey pipeline.
//!
//! Condition and evaluation errors are raised by the pure pipeline stages.
//! Collaborator errors (`MarketplaceError`, `CompletionError`) are the
//! transport-neutral forms that the HTTP client crates convert their own
//! errors into. `SurveyError` is where they all converge.

use thiserror::Error;

/// A condition string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    /// None of the permitted operator tokens appears in the condition.
    #[error("operator in '{condition}' not permitted (expected one of ==, !=, >=, <=, contains, does not contain)")]
    NoOperator { condition: String },

    /// More than one operator token appears in the condition.
    #[error("condition '{condition}' is ambiguous: found operators {found:?}")]
    AmbiguousOperator {
        condition: String,
        found: Vec<String>,
    },

    /// The operator has nothing on its left-hand side.
    #[error("condition '{condition}' has no field name")]
    MissingField { condition: String },
}

/// A parsed condition could not be applied to a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The condition references a column the table does not have.
    #[error("unknown field '{field}'")]
    UnknownField { field: String },

    /// A text operator was used on a column that is not text.
    #[error("operator '{operator}' needs a text field, but '{field}' is numeric")]
    TextOperatorOnNonText { field: String, operator: String },
}

/// Failure talking to the task marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketplaceError {
    /// The request never produced a response.
    #[error("marketplace transport error: {0}")]
    Transport(String),

    /// The marketplace answered with a non-success status.
    #[error("marketplace API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The marketplace asked us to slow down.
    #[error("marketplace rate limited; retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// A response body could not be decoded.
    #[error("marketplace response could not be decoded: {0}")]
    Decode(String),
}

/// Failure reading the second-stage completion data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The completion provider could not be reached or refused the request.
    #[error("completion source unavailable: {0}")]
    Unavailable(String),

    /// The completion data has no column with respondent identifiers.
    #[error("completion data has no column named '{column}'")]
    MissingColumn { column: String },

    /// The completion data is malformed.
    #[error("completion data is malformed: {0}")]
    Malformed(String),
}

/// Failure writing or reading a merged export file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Every error the [`Survey`](crate::survey::Survey) facade can return.
#[derive(Debug, Error)]
pub enum SurveyError {
    /// The startup balance check failed; nothing else can proceed.
    #[error("connection error: could not verify marketplace account")]
    Connection(#[source] MarketplaceError),

    #[error(transparent)]
    Condition(#[from] ConditionError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Marketplace(#[from] MarketplaceError),

    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_error_keeps_source() {
        let err = SurveyError::Connection(MarketplaceError::Api {
            status: 401,
            message: "bad credentials".into(),
        });
        let source = std::error::Error::source(&err).expect("source");
        assert!(source.to_string().contains("401"));
    }

    #[test]
    fn no_operator_message_names_condition() {
        let err = ConditionError::NoOperator {
            condition: "Q1 ~ yes".into(),
        };
        assert!(err.to_string().contains("Q1 ~ yes"));
    }
}
