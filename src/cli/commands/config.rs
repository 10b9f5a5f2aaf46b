//! Config command implementation.

use crate::cli::{ConfigAction, Output};
use crate::config::Settings;
use anyhow::Result;

/// Run the config command.
pub fn run_config(action: &ConfigAction, settings: Settings) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(&settings)
                .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;
            println!("{}", toml_str);
        }

        ConfigAction::Set { key, value } => {
            let mut settings = settings;
            apply_set(&mut settings, key, value)?;
            let path = Settings::default_config_path();
            settings.save_to(&path)?;
            Output::success(&format!("Set {} = {}", key, value));
        }

        ConfigAction::Edit => {
            let config_path = Settings::default_config_path();

            // Create default config if it doesn't exist
            if !config_path.exists() {
                settings.save_to(&config_path)?;
                Output::info(&format!(
                    "Created default config at {}",
                    config_path.display()
                ));
            }

            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());
            Output::info(&format!("Opening config in {}...", editor));

            match launch_editor(&editor, &config_path) {
                Ok(s) if s.success() => {
                    Output::success("Config saved.");
                }
                Ok(_) => {
                    Output::warning("Editor exited with non-zero status.");
                }
                Err(e) => {
                    Output::error(&format!("Failed to open editor: {}", e));
                    Output::info(&format!("Config file is at: {}", config_path.display()));
                }
            }
        }

        ConfigAction::Path => {
            let config_path = Settings::default_config_path();
            println!("{}", config_path.display());
        }
    }

    Ok(())
}

/// Spawn the editor on the config file and wait for it to exit.
fn launch_editor(editor: &str, path: &std::path::Path) -> std::io::Result<std::process::ExitStatus> {
    std::process::Command::new(editor).arg(path).status()
}

/// Apply a dotted-key assignment to the settings tree.
fn apply_set(settings: &mut Settings, key: &str, value: &str) -> Result<()> {
    match key {
        "general.log_level" => settings.general.log_level = value.to_string(),
        "batch.workers" => settings.batch.workers = value.parse()?,
        "batch.output_suffix" => settings.batch.output_suffix = value.to_string(),
        "batch.recursive" => settings.batch.recursive = value.parse()?,
        "adapter.model" => settings.adapter.model = value.to_string(),
        "adapter.temperature" => settings.adapter.temperature = value.parse()?,
        "adapter.timeout_secs" => settings.adapter.timeout_secs = value.parse()?,
        "adapter.max_retries" => settings.adapter.max_retries = value.parse()?,
        "rules.path" => settings.rules.path = value.to_string(),
        _ => anyhow::bail!("Unknown configuration key: {}", key),
    }
    Ok(())
}
