//! Configuration settings for ragprep.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub batch: BatchSettings,
    pub adapter: AdapterSettings,
    pub rules: RulesSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Batch processing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Number of concurrent workers.
    pub workers: usize,
    /// Suffix appended to the input stem to form the output filename.
    pub output_suffix: String,
    /// Walk subdirectories of the input directory.
    pub recursive: bool,
    /// Input file extensions to pick up.
    pub extensions: Vec<String>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            workers: 3,
            output_suffix: "_rag_optimized".to_string(),
            recursive: false,
            extensions: vec!["txt".to_string(), "srt".to_string()],
        }
    }
}

/// Transcript adapter (LLM) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterSettings {
    /// Chat model used to restructure transcripts.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-call HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum attempts when the API rate-limits a call.
    pub max_retries: u32,
}

impl Default for AdapterSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            timeout_secs: 300,
            max_retries: 3,
        }
    }
}

/// Terminology rules settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesSettings {
    /// Path to the rules file, relative to the working directory.
    pub path: String,
}

impl Default for RulesSettings {
    fn default() -> Self {
        Self {
            path: "rules.txt".to_string(),
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}


impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::RagPrepError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ragprep")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded rules file path.
    pub fn rules_path(&self) -> PathBuf {
        Self::expand_path(&self.rules.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = Settings::default();
        assert_eq!(settings.batch.workers, 3);
        assert_eq!(settings.batch.output_suffix, "_rag_optimized");
        assert_eq!(settings.rules.path, "rules.txt");
        assert!(!settings.batch.recursive);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let settings: Settings = toml::from_str("[batch]\nworkers = 8\n").unwrap();
        assert_eq!(settings.batch.workers, 8);
        assert_eq!(settings.adapter.model, "gpt-4o-mini");
    }

    #[test]
    fn round_trips_through_toml() {
        let settings = Settings::default();
        let serialized = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.batch.workers, settings.batch.workers);
    }
}
