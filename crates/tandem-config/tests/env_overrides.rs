use figment::Jail;
use pretty_assertions::assert_eq;
use tandem_config::TandemConfig;

#[test]
fn env_fills_every_section() {
    Jail::expect_with(|jail| {
        jail.set_env("TANDEM_MARKETPLACE__BASE_URL", "https://market.example.com");
        jail.set_env("TANDEM_MARKETPLACE__ACCESS_KEY_ID", "AKID");
        jail.set_env("TANDEM_MARKETPLACE__SECRET_ACCESS_KEY", "shh");
        jail.set_env("TANDEM_SHEETS__ACCESS_TOKEN", "ya29.token");
        jail.set_env("TANDEM_SHEETS__SPREADSHEET_ID", "1AbC");
        jail.set_env("TANDEM_SHEETS__RESPONDENT_COLUMN", "Worker ID");
        jail.set_env("TANDEM_SURVEY__TASK_IDS", "[T1, T2]");
        jail.set_env("TANDEM_SURVEY__QUESTIONS", "[Q1]");

        let config = TandemConfig::load().map_err(|e| e.to_string())?;
        assert!(config.marketplace.is_configured());
        assert!(config.sheets.is_configured());
        assert_eq!(config.survey.task_ids, vec!["T1", "T2"]);
        assert_eq!(config.survey.questions, vec!["Q1"]);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".tandem")?;
        jail.create_file(
            ".tandem/config.toml",
            r#"
[sheets]
tab = "Sheet1"
"#,
        )?;
        jail.set_env("TANDEM_SHEETS__TAB", "Responses");

        let config = TandemConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.sheets.tab, "Responses");
        Ok(())
    });
}

/// Typo'd keys are silently ignored by figment; the default survives.
#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("TANDEM_SHEETS__TABB", "Responses");

        let config = TandemConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.sheets.tab, "Form Responses 1");
        Ok(())
    });
}
