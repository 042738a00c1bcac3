//! # tandem-market
//!
//! HTTP client for the task-marketplace gateway.
//!
//! Every call is authenticated with HTTP basic auth (access key id as user,
//! secret access key as password). Endpoints:
//! - `GET  /v1/account/balance`
//! - `GET  /v1/tasks/{task}/assignments?page_size=N&page_number=P`
//! - `POST /v1/workers/{worker}/notifications`
//! - `POST /v1/bonuses`

pub mod account;
pub mod assignments;
pub mod bonuses;
pub mod notifications;

mod error;
mod http;

pub use error::MarketClientError;

use std::time::Duration;
use tandem_core::collaborators::{Assignment, BonusReceipt, NotifyAck};
use tandem_core::{Marketplace, MarketplaceError, Money};

// ── Client ─────────────────────────────────────────────────────────

/// Gateway client. Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct MarketClient {
    http: reqwest::Client,
    base_url: String,
    access_key_id: String,
    secret_access_key: String,
}

impl std::fmt::Debug for MarketClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketClient")
            .field("base_url", &self.base_url)
            .field("access_key_id", &self.access_key_id)
            .finish_non_exhaustive()
    }
}

impl MarketClient {
    /// Build a client for the gateway at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`MarketClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be built.
    pub fn new(
        base_url: &str,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, MarketClientError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tandem/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{path}", self.base_url))
            .basic_auth(&self.access_key_id, Some(&self.secret_access_key))
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{path}", self.base_url))
            .basic_auth(&self.access_key_id, Some(&self.secret_access_key))
    }
}

// ── Marketplace ────────────────────────────────────────────────────

impl Marketplace for MarketClient {
    async fn get_account_balance(&self) -> Result<Money, MarketplaceError> {
        Ok(self.account_balance().await?)
    }

    async fn list_assignments(
        &self,
        task_id: &str,
        page_size: u32,
        page_number: u32,
    ) -> Result<Vec<Assignment>, MarketplaceError> {
        Ok(self.assignments_page(task_id, page_size, page_number).await?)
    }

    async fn notify(&self, respondent_id: &str, subject: &str, body: &str) -> Result<NotifyAck, MarketplaceError> {
        Ok(self.notify_worker(respondent_id, subject, body).await?)
    }

    async fn grant_bonus(
        &self,
        respondent_id: &str,
        submission_id: &str,
        amount: Money,
        reason: &str,
    ) -> Result<BonusReceipt, MarketplaceError> {
        Ok(self.send_bonus(respondent_id, submission_id, amount, reason).await?)
    }
}
