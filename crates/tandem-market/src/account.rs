//! Account balance.

use tandem_core::Money;

use crate::{MarketClient, error::MarketClientError, http::check_response};

#[derive(serde::Deserialize)]
struct BalanceResponse {
    available_balance: Money,
}

impl MarketClient {
    /// Available balance on the requester account.
    ///
    /// # Errors
    ///
    /// Returns [`MarketClientError`] if the request fails, the gateway returns
    /// a non-success status, or the balance is not a dollar amount.
    pub async fn account_balance(&self) -> Result<Money, MarketClientError> {
        let resp = check_response(self.get("/v1/account/balance").send().await?).await?;
        let data: BalanceResponse = resp.json().await?;
        tracing::debug!(balance = %data.available_balance, "fetched account balance");
        Ok(data.available_balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_balance_response() {
        let data: BalanceResponse = serde_json::from_str(r#"{"available_balance": "10000.00"}"#).unwrap();
        assert_eq!(data.available_balance, Money::from_cents(1_000_000));
    }

    #[test]
    fn rejects_non_decimal_balance() {
        assert!(serde_json::from_str::<BalanceResponse>(r#"{"available_balance": "ten"}"#).is_err());
    }
}
