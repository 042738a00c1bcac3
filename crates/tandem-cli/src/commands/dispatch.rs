use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Respondents(args) => commands::respondents::handle(&args, ctx, flags).await,
        Commands::Invite => commands::notify::handle_invite(ctx, flags).await,
        Commands::Remind => commands::notify::handle_remind(ctx, flags).await,
        Commands::Completed => commands::reconcile::handle_completed(ctx, flags).await,
        Commands::Remaining => commands::reconcile::handle_remaining(ctx, flags).await,
        Commands::Bonus(args) => commands::bonus::handle(args, ctx, flags).await,
        Commands::Merge(args) => commands::merge::handle(args, ctx, flags).await,
    }
}
