//! # tandem-core
//!
//! Screening, reconciliation and bonus pipeline for two-stage surveys.
//!
//! Stage one runs as a task on a crowdsourcing marketplace and carries the
//! screener questions. Stage two is a separate form whose responses land in
//! a spreadsheet. This crate holds everything between the two:
//! - [`aggregate`]: paginated fetch and per-question join into one row per submission
//! - [`condition`]: the `"<field> <operator> <value>"` filter language
//! - [`screening`]: applying the conditions to get the qualified set
//! - [`reconcile`]: completed vs. remaining respondents
//! - [`notify`]: invitation and reminder mailers
//! - [`bonus`]: bonus planning, dry-run pricing and payment
//! - [`export`]: joining both stages and writing CSV
//! - [`survey`]: the [`Survey`] facade tying it together
//!
//! External systems are reached only through the traits in
//! [`collaborators`].

pub mod aggregate;
pub mod bonus;
pub mod collaborators;
pub mod completion;
pub mod condition;
pub mod errors;
pub mod export;
pub mod money;
pub mod notify;
pub mod reconcile;
pub mod screening;
pub mod survey;
pub mod table;

#[cfg(test)]
mod test_support;

pub use collaborators::{CompletionSource, Marketplace};
pub use errors::{
    CompletionError, ConditionError, EvaluationError, ExportError, MarketplaceError, SurveyError,
};
pub use money::Money;
pub use survey::{BonusOptions, Survey, SurveySettings};
