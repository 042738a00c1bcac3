use tandem_core::BonusOptions;

use crate::cli::root_commands::BonusArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;
use crate::ui;

/// Handle `tandem bonus`.
pub async fn handle(args: BonusArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let options = BonusOptions {
        targets: (!args.workers.is_empty()).then_some(args.workers),
        dry_run: args.dry_run,
    };
    let report = ctx.survey.award_bonus(args.amount, options).await?;

    if report.dry_run {
        ui::summary(&format!(
            "dry run: {} bonuses, ${} total, ${} including platform fees",
            report.outcomes.len(),
            report.total,
            report.budget_with_fees
        ));
    } else {
        ui::summary(&format!(
            "paid ${} across {} bonuses, {} failed",
            report.paid,
            report.outcomes.len() - report.failed(),
            report.failed()
        ));
    }

    match flags.format {
        OutputFormat::Table => output(&report.outcomes, flags.format),
        OutputFormat::Json | OutputFormat::Raw => output(&report, flags.format),
    }
}
