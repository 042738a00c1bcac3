//! Capability traits for the external systems the pipeline talks to.
//!
//! The pipeline depends only on these traits. `tandem-market` implements
//! [`Marketplace`] over HTTP; `tandem-sheets` and
//! [`CsvCompletionSource`](crate::completion::CsvCompletionSource) implement
//! [`CompletionSource`].

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::completion::CompletionTable;
use crate::errors::{CompletionError, MarketplaceError};
use crate::money::Money;

// ── Marketplace types ──────────────────────────────────────────────

/// One submitted assignment for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_id: String,
    pub worker_id: String,
    pub task_id: String,
    pub answers: Vec<QuestionAnswer>,
}

/// The answer fields given for a single question form entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    pub question_id: String,
    pub fields: Vec<String>,
}

impl Assignment {
    /// The first answer field for `question_id`, if the question was answered.
    #[must_use]
    pub fn answer(&self, question_id: &str) -> Option<&str> {
        self.answers
            .iter()
            .find(|a| a.question_id == question_id)
            .and_then(|a| a.fields.first())
            .map(String::as_str)
    }
}

/// Acknowledgement of a delivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyAck {
    pub reference: String,
}

/// Receipt for a granted bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusReceipt {
    pub reference: String,
}

// ── Traits ─────────────────────────────────────────────────────────

/// The crowdsourcing task marketplace.
pub trait Marketplace {
    /// Current available balance. Used once at startup to prove connectivity.
    fn get_account_balance(&self) -> impl Future<Output = Result<Money, MarketplaceError>> + Send;

    /// One page of submitted assignments. Page numbers start at 1; an empty
    /// page means there are no more.
    fn list_assignments(
        &self,
        task_id: &str,
        page_size: u32,
        page_number: u32,
    ) -> impl Future<Output = Result<Vec<Assignment>, MarketplaceError>> + Send;

    /// Send a message to one worker.
    fn notify(
        &self,
        respondent_id: &str,
        subject: &str,
        body: &str,
    ) -> impl Future<Output = Result<NotifyAck, MarketplaceError>> + Send;

    /// Pay a bonus against a worker's submission.
    fn grant_bonus(
        &self,
        respondent_id: &str,
        submission_id: &str,
        amount: Money,
        reason: &str,
    ) -> impl Future<Output = Result<BonusReceipt, MarketplaceError>> + Send;
}

/// Where the list of stage-two completions comes from.
pub trait CompletionSource {
    /// Read the full stage-two response table, header row first.
    fn fetch_completions(
        &self,
    ) -> impl Future<Output = Result<CompletionTable, CompletionError>> + Send;
}
