use crate::cli::GlobalFlags;
use crate::cli::root_commands::RespondentsArgs;
use crate::context::AppContext;
use crate::output::output;
use crate::ui;

/// Handle `tandem respondents`.
pub async fn handle(args: &RespondentsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let outcome = ctx.survey.screen().await?;
    let respondents = if args.qualified {
        outcome.qualified_respondents()
    } else {
        outcome.all_respondents()
    };

    ui::summary(&format!(
        "{} of {} respondents qualified",
        outcome.qualified_respondents().len(),
        outcome.all_respondents().len()
    ));
    output(&respondents, flags.format)
}
