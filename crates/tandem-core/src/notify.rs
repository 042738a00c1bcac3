//! Best-effort notifications to respondents.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::collaborators::{Marketplace, NotifyAck};

/// Subject and body of a notification. The respondent id is appended to the
/// body of each message so respondents can quote it back as their code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageTemplate {
    pub subject: String,
    pub body: String,
}

impl MessageTemplate {
    /// First mailer: sent to every qualified respondent.
    #[must_use]
    pub fn invitation(follow_up_link: &str, sender_name: &str) -> Self {
        Self {
            subject: "Please take second part of Survey for bonus".to_string(),
            body: format!(
                "Hello,

Based on your responses to the screening question, you've been selected to
participate in the second part of the survey.

Please go to {follow_up_link} to complete additional questions. At the end of
the survey, you will be prompted to enter a payment code to verify that you
were selected to fill out the survey. When asked, please enter the code below.
Upon completion, you will be awarded a bonus.

Thanks for your participation!

Sincerely,
{sender_name}

### Your reward code is: "
            ),
        }
    }

    /// Second mailer: sent to qualified respondents who have not completed
    /// stage two (or entered their code incorrectly).
    #[must_use]
    pub fn reminder(follow_up_link: &str, sender_name: &str) -> Self {
        Self {
            subject: "[Reminder] Bonus for participating in second part of Survey".to_string(),
            body: format!(
                "Hello,

We sent you an email recently about completing additional questions for the
Mturk Survey. We'd really appreciate your time in helping us improve our
products further.

As a reminder, please go to {follow_up_link} to complete additional questions.
At the end of the Survey, you will be prompted to enter a payment code to
verify that you were selected to fill out the survey. When asked, please enter
the code below. Upon completion, you will be awarded a bonus.

NOTE: If you are receiving this email, but have already completed the Survey,
you may have entered the Survey code incorrectly. Please redo the survey,
ensuring that the code matches the above, to receive your compensation.

Thanks for your participation!

Sincerely,
{sender_name}

### Your reward code is: "
            ),
        }
    }

    /// The body sent to one respondent.
    #[must_use]
    pub fn body_for(&self, respondent_id: &str) -> String {
        format!("{}{respondent_id}", self.body)
    }
}

/// What happened to one respondent's notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Delivery {
    Sent { ack: NotifyAck },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationOutcome {
    pub respondent_id: String,
    #[serde(flatten)]
    pub delivery: Delivery,
}

impl NotificationOutcome {
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self.delivery, Delivery::Sent { .. })
    }
}

/// Results of one notification batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationReport {
    pub subject: String,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<NotificationOutcome>,
}

impl NotificationReport {
    #[must_use]
    pub fn sent(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_sent()).count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.sent()
    }
}

/// Send `template` to each respondent once, in order.
///
/// A failed send is recorded and the batch moves on; nothing is retried.
pub async fn dispatch<M: Marketplace>(
    market: &M,
    respondents: &[String],
    template: &MessageTemplate,
) -> NotificationReport {
    let mut outcomes = Vec::with_capacity(respondents.len());
    for respondent_id in respondents {
        let body = template.body_for(respondent_id);
        let delivery = match market.notify(respondent_id, &template.subject, &body).await {
            Ok(ack) => Delivery::Sent { ack },
            Err(error) => {
                tracing::warn!(respondent_id = %respondent_id, %error, "could not notify respondent");
                Delivery::Failed {
                    reason: error.to_string(),
                }
            }
        };
        outcomes.push(NotificationOutcome {
            respondent_id: respondent_id.clone(),
            delivery,
        });
    }

    let report = NotificationReport {
        subject: template.subject.clone(),
        finished_at: Utc::now(),
        outcomes,
    };
    tracing::info!(sent = report.sent(), failed = report.failed(), subject = %report.subject, "notification batch finished");
    report
}
