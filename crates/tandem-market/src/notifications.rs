//! Worker notifications.

use serde::{Deserialize, Serialize};
use tandem_core::collaborators::NotifyAck;

use crate::{MarketClient, error::MarketClientError, http::check_response};

#[derive(Serialize)]
struct NotificationRequest<'a> {
    subject: &'a str,
    message_text: &'a str,
}

#[derive(Deserialize)]
struct NotificationResponse {
    notification_id: String,
}

impl MarketClient {
    /// Send one message to one worker.
    ///
    /// # Errors
    ///
    /// Returns [`MarketClientError`] if the request fails or the gateway
    /// refuses the message (unknown worker, opted out, rate limited).
    pub async fn notify_worker(
        &self,
        worker_id: &str,
        subject: &str,
        message_text: &str,
    ) -> Result<NotifyAck, MarketClientError> {
        let path = format!("/v1/workers/{}/notifications", urlencoding::encode(worker_id));
        let resp = check_response(
            self.post(&path)
                .json(&NotificationRequest { subject, message_text })
                .send()
                .await?,
        )
        .await?;

        let data: NotificationResponse = resp.json().await?;
        Ok(NotifyAck {
            reference: data.notification_id,
        })
    }
}
