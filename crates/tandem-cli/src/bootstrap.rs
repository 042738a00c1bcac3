use anyhow::Context;
use tandem_config::TandemConfig;

use crate::cli::GlobalFlags;

/// Load `.env`, the layered config files and `TANDEM_*` overrides, then apply
/// command-line conditions on top.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<TandemConfig> {
    load_dotenv()?;

    let mut config = TandemConfig::load().context("failed to load tandem configuration")?;
    if !flags.conditions.is_empty() {
        tracing::debug!(count = flags.conditions.len(), "conditions overridden on the command line");
        config.survey.conditions.clone_from(&flags.conditions);
    }
    Ok(config)
}

fn load_dotenv() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().context("failed to determine current directory")?;
    let env_path = cwd.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    dotenvy::dotenv().ok();
    Ok(())
}
