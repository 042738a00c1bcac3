//! In-memory collaborators for unit tests.

use std::collections::HashSet;
use std::sync::Mutex;

use crate::collaborators::{
    Assignment, BonusReceipt, CompletionSource, Marketplace, NotifyAck, QuestionAnswer,
};
use crate::completion::CompletionTable;
use crate::errors::{CompletionError, MarketplaceError};
use crate::money::Money;

pub fn assignment(task: &str, worker: &str, id: &str, answers: &[(&str, &str)]) -> Assignment {
    Assignment {
        assignment_id: id.to_string(),
        worker_id: worker.to_string(),
        task_id: task.to_string(),
        answers: answers
            .iter()
            .map(|(q, a)| QuestionAnswer {
                question_id: (*q).to_string(),
                fields: vec![(*a).to_string()],
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub respondent_id: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantedBonus {
    pub respondent_id: String,
    pub submission_id: String,
    pub amount: Money,
    pub reason: String,
}

pub struct FakeMarketplace {
    balance: Result<Money, MarketplaceError>,
    assignments: Vec<Assignment>,
    fail_pages: bool,
    failing_notify: HashSet<String>,
    failing_bonus: HashSet<String>,
    page_requests: Mutex<Vec<(String, u32)>>,
    notifications: Mutex<Vec<SentNotification>>,
    bonuses: Mutex<Vec<GrantedBonus>>,
}

impl FakeMarketplace {
    pub fn new() -> Self {
        Self {
            balance: Ok(Money::from_cents(10_000)),
            assignments: Vec::new(),
            fail_pages: false,
            failing_notify: HashSet::new(),
            failing_bonus: HashSet::new(),
            page_requests: Mutex::new(Vec::new()),
            notifications: Mutex::new(Vec::new()),
            bonuses: Mutex::new(Vec::new()),
        }
    }

    pub fn add(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    pub fn unreachable(mut self) -> Self {
        self.balance = Err(MarketplaceError::Transport("connection refused".into()));
        self
    }

    pub fn failing_pages(mut self) -> Self {
        self.fail_pages = true;
        self
    }

    pub fn failing_notify(mut self, respondent_id: &str) -> Self {
        self.failing_notify.insert(respondent_id.to_string());
        self
    }

    pub fn failing_bonus(mut self, respondent_id: &str) -> Self {
        self.failing_bonus.insert(respondent_id.to_string());
        self
    }

    pub fn page_requests(&self) -> Vec<(String, u32)> {
        self.page_requests.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<SentNotification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn bonuses(&self) -> Vec<GrantedBonus> {
        self.bonuses.lock().unwrap().clone()
    }
}

impl Marketplace for FakeMarketplace {
    async fn get_account_balance(&self) -> Result<Money, MarketplaceError> {
        self.balance.clone()
    }

    async fn list_assignments(
        &self,
        task_id: &str,
        page_size: u32,
        page_number: u32,
    ) -> Result<Vec<Assignment>, MarketplaceError> {
        self.page_requests
            .lock()
            .unwrap()
            .push((task_id.to_string(), page_number));
        if self.fail_pages {
            return Err(MarketplaceError::Transport("timed out".into()));
        }
        let size = page_size as usize;
        let skip = (page_number as usize - 1) * size;
        Ok(self
            .assignments
            .iter()
            .filter(|a| a.task_id == task_id)
            .skip(skip)
            .take(size)
            .cloned()
            .collect())
    }

    async fn notify(
        &self,
        respondent_id: &str,
        subject: &str,
        body: &str,
    ) -> Result<NotifyAck, MarketplaceError> {
        if self.failing_notify.contains(respondent_id) {
            return Err(MarketplaceError::Api {
                status: 400,
                message: format!("worker {respondent_id} cannot be contacted"),
            });
        }
        let mut sent = self.notifications.lock().unwrap();
        sent.push(SentNotification {
            respondent_id: respondent_id.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(NotifyAck {
            reference: format!("N{}", sent.len()),
        })
    }

    async fn grant_bonus(
        &self,
        respondent_id: &str,
        submission_id: &str,
        amount: Money,
        reason: &str,
    ) -> Result<BonusReceipt, MarketplaceError> {
        if self.failing_bonus.contains(respondent_id) {
            return Err(MarketplaceError::Api {
                status: 400,
                message: "insufficient funds".into(),
            });
        }
        let mut granted = self.bonuses.lock().unwrap();
        granted.push(GrantedBonus {
            respondent_id: respondent_id.to_string(),
            submission_id: submission_id.to_string(),
            amount,
            reason: reason.to_string(),
        });
        Ok(BonusReceipt {
            reference: format!("B{}", granted.len()),
        })
    }
}

pub struct FakeCompletions(pub Result<CompletionTable, CompletionError>);

impl FakeCompletions {
    pub fn with_column(column: &str, ids: &[&str]) -> Self {
        let mut values = vec![vec!["Timestamp".to_string(), column.to_string()]];
        for id in ids {
            values.push(vec!["2024-01-01".to_string(), (*id).to_string()]);
        }
        Self(Ok(CompletionTable::from_values(values)))
    }
}

impl CompletionSource for FakeCompletions {
    async fn fetch_completions(&self) -> Result<CompletionTable, CompletionError> {
        self.0.clone()
    }
}
