use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tandem_config::TandemConfig;
use tandem_core::completion::{CompletionTable, CsvCompletionSource};
use tandem_core::{CompletionError, CompletionSource, Survey, SurveySettings};
use tandem_market::MarketClient;
use tandem_sheets::{SheetCompletionSource, SheetsClient};

/// Where stage-two completions are read from, as chosen by configuration.
#[derive(Debug)]
pub enum Completions {
    Sheet(SheetCompletionSource),
    Csv(CsvCompletionSource),
}

impl CompletionSource for Completions {
    async fn fetch_completions(&self) -> Result<CompletionTable, CompletionError> {
        match self {
            Self::Sheet(source) => source.fetch_completions().await,
            Self::Csv(source) => source.fetch_completions().await,
        }
    }
}

pub type AppSurvey = Survey<MarketClient, Completions>;

/// Everything a command handler needs.
pub struct AppContext {
    pub config: TandemConfig,
    pub survey: AppSurvey,
}

impl AppContext {
    /// Validate the configuration, build both clients and connect the survey.
    pub async fn init(config: TandemConfig) -> anyhow::Result<Self> {
        let market_config = config.marketplace.require()?;
        config.sheets.require()?;
        config.survey.require()?;

        let market = MarketClient::new(
            &market_config.base_url,
            market_config.access_key_id.clone(),
            market_config.secret_access_key.clone(),
            Duration::from_secs(market_config.timeout_secs),
        )
        .context("failed to build marketplace client")?;

        let completions = build_completions(&config)?;
        let settings = settings_from_config(&config);

        let mut survey = Survey::connect(market, completions, settings)
            .await
            .context("could not reach the marketplace; check credentials and base_url")?;
        survey
            .set_conditions(&config.survey.conditions)
            .context("invalid screening condition")?;

        Ok(Self { config, survey })
    }

    /// `--out` if given, else the configured export path, else nothing.
    #[must_use]
    pub fn export_path(&self, out: Option<PathBuf>) -> Option<PathBuf> {
        out.or_else(|| {
            let configured = &self.config.survey.export_path;
            (!configured.is_empty()).then(|| PathBuf::from(configured))
        })
    }
}

fn build_completions(config: &TandemConfig) -> anyhow::Result<Completions> {
    let sheets = &config.sheets;
    if sheets.uses_csv() {
        tracing::debug!(path = %sheets.csv_path, "reading completions from CSV");
        return Ok(Completions::Csv(CsvCompletionSource::new(&sheets.csv_path)));
    }

    let client = SheetsClient::new(
        &sheets.base_url,
        sheets.access_token.clone(),
        Duration::from_secs(sheets.timeout_secs),
    )
    .context("failed to build spreadsheet client")?;
    Ok(Completions::Sheet(SheetCompletionSource::new(
        client,
        sheets.spreadsheet_id.clone(),
        &sheets.tab,
        &sheets.columns,
    )))
}

/// Project the configuration sections onto the survey's own settings.
#[must_use]
pub fn settings_from_config(config: &TandemConfig) -> SurveySettings {
    SurveySettings {
        task_ids: config.survey.task_ids.clone(),
        questions: config.survey.questions.clone(),
        follow_up_link: config.survey.follow_up_link.clone(),
        sender_name: config.survey.sender_name.clone(),
        respondent_column: config.sheets.respondent_column.clone(),
    }
}
