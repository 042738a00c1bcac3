//! Bonus planning and disbursement.
//!
//! A plan holds one [`BonusRecord`] per `(task, respondent)` pair found in the
//! qualified table. Respondents who qualified under several tasks are paid once
//! per task.
//!
//! Live payments are attempted one at a time. A failed payment is recorded
//! and the batch continues; earlier payments stay issued, nothing is rolled
//! back and no idempotency key is sent, so running the same batch again pays
//! the already-paid respondents a second time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::collaborators::{BonusReceipt, Marketplace};
use crate::money::Money;
use crate::table::RespondentTable;

/// Marketplace fee charged on top of every bonus, in percent.
pub const PLATFORM_FEE_PERCENT: u64 = 20;

/// Message attached to every granted bonus.
pub const BONUS_REASON: &str = "Thanks for completing the second part of the Survey!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonusRecord {
    pub task_id: String,
    pub respondent_id: String,
    pub submission_id: String,
    pub amount: Money,
}

/// Build the payment list for `targets`.
///
/// Tasks are visited in the order given. Within a task each targeted
/// respondent gets one record, keyed by their most recent submission for
/// that task (the last matching row).
#[must_use]
pub fn plan(
    qualified: &RespondentTable,
    task_ids: &[String],
    targets: &[String],
    amount: Money,
) -> Vec<BonusRecord> {
    let targets: HashSet<&str> = targets.iter().map(String::as_str).collect();
    let mut visited_tasks = HashSet::new();
    let mut records = Vec::new();

    for task_id in task_ids {
        if !visited_tasks.insert(task_id.as_str()) {
            continue;
        }

        let mut order: Vec<&str> = Vec::new();
        let mut latest: HashMap<&str, &str> = HashMap::new();
        for row in qualified.rows() {
            if row.task_id != *task_id || !targets.contains(row.respondent_id.as_str()) {
                continue;
            }
            if latest
                .insert(&row.respondent_id, &row.submission_id)
                .is_none()
            {
                order.push(&row.respondent_id);
            }
        }

        records.extend(order.into_iter().map(|respondent_id| BonusRecord {
            task_id: task_id.clone(),
            respondent_id: respondent_id.to_string(),
            submission_id: latest[respondent_id].to_string(),
            amount,
        }));
    }
    records
}

// ── Disbursement ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "payment", rename_all = "snake_case")]
pub enum Payment {
    /// Dry run: no payment call was made.
    Simulated,
    Paid { receipt: BonusReceipt },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOutcome {
    #[serde(flatten)]
    pub record: BonusRecord,
    #[serde(flatten)]
    pub payment: Payment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonusReport {
    pub dry_run: bool,
    /// Sum of every planned bonus.
    pub total: Money,
    /// `total` plus the platform fee: what the account needs to cover.
    pub budget_with_fees: Money,
    /// Sum of bonuses actually granted (always zero on a dry run).
    pub paid: Money,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<PaymentOutcome>,
}

impl BonusReport {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.payment, Payment::Failed { .. }))
            .count()
    }
}

/// Pay (or, on a dry run, only price) every record in order.
pub async fn disburse<M: Marketplace>(
    market: &M,
    records: Vec<BonusRecord>,
    dry_run: bool,
) -> BonusReport {
    let total: Money = records.iter().map(|r| r.amount).sum();
    let budget_with_fees = total.with_surcharge(PLATFORM_FEE_PERCENT);
    let mut paid = Money::ZERO;
    let mut outcomes = Vec::with_capacity(records.len());

    for record in records {
        let payment = if dry_run {
            tracing::info!(
                respondent_id = %record.respondent_id,
                task_id = %record.task_id,
                amount = %record.amount,
                "dry run: bonus not granted"
            );
            Payment::Simulated
        } else {
            match market
                .grant_bonus(&record.respondent_id, &record.submission_id, record.amount, BONUS_REASON)
                .await
            {
                Ok(receipt) => {
                    tracing::info!(
                        respondent_id = %record.respondent_id,
                        receipt = %receipt.reference,
                        amount = %record.amount,
                        "bonus granted"
                    );
                    paid += record.amount;
                    Payment::Paid { receipt }
                }
                Err(error) => {
                    tracing::error!(
                        respondent_id = %record.respondent_id,
                        submission_id = %record.submission_id,
                        %error,
                        "bonus payment failed; continuing with the rest of the batch"
                    );
                    Payment::Failed {
                        reason: error.to_string(),
                    }
                }
            }
        };
        outcomes.push(PaymentOutcome { record, payment });
    }

    if dry_run {
        tracing::info!(%total, budget = %budget_with_fees, "total budget required (incl. platform fees)");
    }

    BonusReport {
        dry_run,
        total,
        budget_with_fees,
        paid,
        finished_at: Utc::now(),
        outcomes,
    }
}
