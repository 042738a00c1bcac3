use crate::cli::root_commands::MergeArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{output, table};
use crate::ui;

/// Handle `tandem merge`.
pub async fn handle(args: MergeArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let path = ctx.export_path(args.out);
    let merged = ctx.survey.merge_and_export(path.as_deref()).await?;

    match &path {
        Some(path) => ui::summary(&format!("exported {} rows to {}", merged.len(), path.display())),
        None => ui::summary(&format!("{} merged rows", merged.len())),
    }

    if flags.format == OutputFormat::Table {
        let prefs = ui::prefs();
        let options = table::TableOptions {
            max_width: prefs.term_width,
            color: false,
        };
        println!("{}", table::render_rows(merged.headers(), merged.rows(), options));
        return Ok(());
    }
    output(&merged, flags.format)
}
