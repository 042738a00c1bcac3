use tandem_core::notify::NotificationReport;

use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;
use crate::ui;

/// Handle `tandem invite`.
pub async fn handle_invite(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.survey.send_invitation().await?;
    report_outcomes("invitations", &report, flags)
}

/// Handle `tandem remind`.
pub async fn handle_remind(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = ctx.survey.send_reminder().await?;
    report_outcomes("reminders", &report, flags)
}

fn report_outcomes(kind: &str, report: &NotificationReport, flags: &GlobalFlags) -> anyhow::Result<()> {
    ui::summary(&format!(
        "{kind}: {} sent, {} failed",
        report.sent(),
        report.failed()
    ));
    match flags.format {
        OutputFormat::Table => output(&report.outcomes, flags.format),
        OutputFormat::Json | OutputFormat::Raw => output(report, flags.format),
    }
}
