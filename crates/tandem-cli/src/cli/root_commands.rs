use std::path::PathBuf;

use clap::{Args, Subcommand};
use tandem_core::Money;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// List respondents who answered the screener.
    Respondents(RespondentsArgs),
    /// Invite every qualified respondent to stage two.
    Invite,
    /// Remind qualified respondents who have not finished stage two.
    Remind,
    /// Qualified respondents who finished stage two.
    Completed,
    /// Qualified respondents who have not finished stage two.
    Remaining,
    /// Pay a bonus to respondents who finished stage two.
    Bonus(BonusArgs),
    /// Join screener answers with stage-two responses.
    Merge(MergeArgs),
}

#[derive(Clone, Debug, Args)]
pub struct RespondentsArgs {
    /// Only respondents who pass the screening conditions.
    #[arg(long)]
    pub qualified: bool,
}

#[derive(Clone, Debug, Args)]
pub struct BonusArgs {
    /// Bonus per respondent per task, in dollars (e.g. `1.50`).
    #[arg(long)]
    pub amount: Money,

    /// Price the batch without paying anyone.
    #[arg(long)]
    pub dry_run: bool,

    /// Pay these workers instead of everyone who finished stage two.
    #[arg(long = "worker", value_name = "WORKER_ID")]
    pub workers: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct MergeArgs {
    /// Write the merged table to this CSV file (overrides `survey.export_path`).
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}
