//! The two-stage survey workflow.
//!
//! Every read recomputes from the collaborators: screening refetches the
//! stage-one submissions, reconciliation rereads the completion source. The
//! only state held between calls is the collaborator handles, the settings
//! and the registered conditions.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::aggregate::aggregate_tasks;
use crate::bonus::{self, BonusReport};
use crate::collaborators::{CompletionSource, Marketplace};
use crate::condition::Condition;
use crate::errors::{ConditionError, SurveyError};
use crate::export::MergedTable;
use crate::money::Money;
use crate::notify::{self, MessageTemplate, NotificationReport};
use crate::reconcile::Reconciliation;
use crate::screening::{Screener, ScreeningOutcome};

/// What a survey is made of.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveySettings {
    /// Stage-one tasks whose submissions are screened.
    pub task_ids: Vec<String>,
    /// Screener question identifiers, as they appear on the marketplace.
    pub questions: Vec<String>,
    /// Where stage two lives.
    pub follow_up_link: String,
    /// Signature used in notifications.
    pub sender_name: String,
    /// Column of the completion data holding respondent identifiers.
    pub respondent_column: String,
}

/// Who receives a bonus, and whether to actually pay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BonusOptions {
    /// Pay exactly these respondents instead of everyone who completed.
    pub targets: Option<Vec<String>>,
    /// Price the batch without paying anyone.
    pub dry_run: bool,
}

pub struct Survey<M, C> {
    market: M,
    completions: C,
    settings: SurveySettings,
    screener: Screener,
}

impl<M: Marketplace, C: CompletionSource> Survey<M, C> {
    /// Build a survey, checking the marketplace account first.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::Connection`] if the balance check fails.
    pub async fn connect(market: M, completions: C, settings: SurveySettings) -> Result<Self, SurveyError> {
        let balance = market
            .get_account_balance()
            .await
            .map_err(SurveyError::Connection)?;
        tracing::info!(%balance, tasks = settings.task_ids.len(), "connected to marketplace");

        Ok(Self {
            market,
            completions,
            settings,
            screener: Screener::default(),
        })
    }

    /// Replace the screening conditions.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError`] for the first malformed condition; the
    /// previous conditions stay in place.
    pub fn set_conditions<S: AsRef<str>>(&mut self, conditions: &[S]) -> Result<(), ConditionError> {
        self.screener = Screener::parse(conditions)?;
        tracing::debug!(conditions = self.screener.conditions().len(), "registered screening conditions");
        Ok(())
    }

    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        self.screener.conditions()
    }

    #[must_use]
    pub const fn settings(&self) -> &SurveySettings {
        &self.settings
    }

    #[must_use]
    pub const fn marketplace(&self) -> &M {
        &self.market
    }

    /// Fetch every stage-one submission and apply the conditions.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError`] on marketplace or evaluation failure.
    pub async fn screen(&self) -> Result<ScreeningOutcome, SurveyError> {
        let table = aggregate_tasks(&self.market, &self.settings.task_ids, &self.settings.questions).await?;
        Ok(self.screener.screen(table)?)
    }

    /// Everyone who answered the screener.
    ///
    /// # Errors
    ///
    /// See [`screen`](Self::screen).
    pub async fn all_respondents(&self) -> Result<Vec<String>, SurveyError> {
        Ok(self.screen().await?.all_respondents())
    }

    /// Everyone who passed the screener.
    ///
    /// # Errors
    ///
    /// See [`screen`](Self::screen).
    pub async fn qualified_respondents(&self) -> Result<Vec<String>, SurveyError> {
        Ok(self.screen().await?.qualified_respondents())
    }

    async fn reconcile_outcome(&self, outcome: &ScreeningOutcome) -> Result<Reconciliation, SurveyError> {
        let table = self.completions.fetch_completions().await?;
        Ok(Reconciliation::from_table(
            &outcome.qualified_respondents(),
            &table,
            &self.settings.respondent_column,
        )?)
    }

    /// Screen, then split the qualified respondents by stage-two completion.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError`] on marketplace, evaluation or completion
    /// source failure.
    pub async fn reconcile(&self) -> Result<Reconciliation, SurveyError> {
        let outcome = self.screen().await?;
        self.reconcile_outcome(&outcome).await
    }

    /// Qualified respondents who completed stage two.
    ///
    /// # Errors
    ///
    /// See [`reconcile`](Self::reconcile).
    pub async fn completed(&self) -> Result<Vec<String>, SurveyError> {
        Ok(self.reconcile().await?.completed().to_vec())
    }

    /// Qualified respondents who have not completed stage two.
    ///
    /// # Errors
    ///
    /// See [`reconcile`](Self::reconcile).
    pub async fn remaining(&self) -> Result<Vec<String>, SurveyError> {
        Ok(self.reconcile().await?.remaining().to_vec())
    }

    /// Invite every qualified respondent to stage two.
    ///
    /// # Errors
    ///
    /// See [`screen`](Self::screen). Individual send failures are reported
    /// in the returned report, not as errors.
    pub async fn send_invitation(&self) -> Result<NotificationReport, SurveyError> {
        let recipients = self.qualified_respondents().await?;
        let template = MessageTemplate::invitation(&self.settings.follow_up_link, &self.settings.sender_name);
        Ok(notify::dispatch(&self.market, &recipients, &template).await)
    }

    /// Remind qualified respondents who have not completed stage two.
    ///
    /// # Errors
    ///
    /// See [`reconcile`](Self::reconcile). Individual send failures are
    /// reported in the returned report, not as errors.
    pub async fn send_reminder(&self) -> Result<NotificationReport, SurveyError> {
        let recipients = self.remaining().await?;
        let template = MessageTemplate::reminder(&self.settings.follow_up_link, &self.settings.sender_name);
        Ok(notify::dispatch(&self.market, &recipients, &template).await)
    }

    /// Pay `amount` to each targeted respondent, once per task they
    /// qualified under. Targets default to everyone who completed stage two.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError`] if screening or reconciliation fails. Failed
    /// payments are reported per respondent in the returned report.
    pub async fn award_bonus(&self, amount: Money, options: BonusOptions) -> Result<BonusReport, SurveyError> {
        let outcome = self.screen().await?;
        let targets = match options.targets {
            Some(targets) => targets,
            None => self.reconcile_outcome(&outcome).await?.completed().to_vec(),
        };

        let records = bonus::plan(outcome.qualified(), &self.settings.task_ids, &targets, amount);
        tracing::info!(
            records = records.len(),
            dry_run = options.dry_run,
            %amount,
            "awarding bonuses"
        );
        Ok(bonus::disburse(&self.market, records, options.dry_run).await)
    }

    /// Join qualified screener rows with stage-two responses, optionally
    /// writing the result to a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError`] if screening, reading the completion source,
    /// or writing the file fails.
    pub async fn merge_and_export(&self, path: Option<&Path>) -> Result<MergedTable, SurveyError> {
        let outcome = self.screen().await?;
        let completions = self.completions.fetch_completions().await?;
        let merged = MergedTable::join(outcome.qualified(), &completions, &self.settings.respondent_column)?;
        if let Some(path) = path {
            merged.write_csv(path)?;
        }
        Ok(merged)
    }
}
