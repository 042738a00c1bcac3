use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::ui;

/// Handle `tandem completed`.
pub async fn handle_completed(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let reconciliation = ctx.survey.reconcile().await?;
    ui::summary(&format!(
        "{} completed, {} remaining",
        reconciliation.completed().len(),
        reconciliation.remaining().len()
    ));
    output(&reconciliation.completed(), flags.format)
}

/// Handle `tandem remaining`.
pub async fn handle_remaining(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let reconciliation = ctx.survey.reconcile().await?;
    ui::summary(&format!(
        "{} remaining, {} completed",
        reconciliation.remaining().len(),
        reconciliation.completed().len()
    ));
    output(&reconciliation.remaining(), flags.format)
}
