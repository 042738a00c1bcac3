//! Bonus payments.

use serde::{Deserialize, Serialize};
use tandem_core::Money;
use tandem_core::collaborators::BonusReceipt;

use crate::{MarketClient, error::MarketClientError, http::check_response};

#[derive(Serialize)]
struct BonusRequest<'a> {
    worker_id: &'a str,
    assignment_id: &'a str,
    bonus_amount: Money,
    reason: &'a str,
}

#[derive(Deserialize)]
struct BonusResponse {
    bonus_id: String,
}

impl MarketClient {
    /// Pay `amount` to `worker_id` against one of their assignments.
    ///
    /// Not idempotent: calling twice pays twice.
    ///
    /// # Errors
    ///
    /// Returns [`MarketClientError`] if the request fails or the gateway
    /// refuses the payment.
    pub async fn send_bonus(
        &self,
        worker_id: &str,
        assignment_id: &str,
        amount: Money,
        reason: &str,
    ) -> Result<BonusReceipt, MarketClientError> {
        let request = BonusRequest {
            worker_id,
            assignment_id,
            bonus_amount: amount,
            reason,
        };
        let resp = check_response(self.post("/v1/bonuses").json(&request).send().await?).await?;

        let data: BonusResponse = resp.json().await?;
        tracing::debug!(worker_id, assignment_id, %amount, bonus_id = %data.bonus_id, "bonus sent");
        Ok(BonusReceipt {
            reference: data.bonus_id,
        })
    }
}
