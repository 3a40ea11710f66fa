use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{TarsError, TarsResult};

/// Environment variable consulted before `[model].api_key`.
pub const API_KEY_ENV: &str = "SEECLAW_TARS_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Size of the model's output coordinate grid. Box values are divided by
    /// this to land in the unit interval.
    #[serde(default = "default_coordinate_scale")]
    pub coordinate_scale: f64,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            coordinate_scale: default_coordinate_scale(),
        }
    }
}

fn default_coordinate_scale() -> f64 {
    1000.0
}

/// OpenAI-compatible endpoint serving the vision-language model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_top_p")]
    pub top_p: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Use SSE streaming for the completion.
    #[serde(default)]
    pub stream: bool,
    /// Optional API key stored in config.toml (env var `SEECLAW_TARS_API_KEY` wins).
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            display_name: default_display_name(),
            api_base: default_api_base(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            stream: false,
            api_key: None,
        }
    }
}

impl ModelConfig {
    /// API key from the environment, falling back to the config file value.
    pub fn resolve_api_key(&self) -> String {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| self.api_key.clone().unwrap_or_default())
    }
}

fn default_display_name() -> String {
    "UI-TARS".to_string()
}

fn default_api_base() -> String {
    "http://127.0.0.1:8000/v1/chat/completions".to_string()
}

fn default_model() -> String {
    "bytedance-research/UI-TARS-7B-DPO".to_string()
}

fn default_temperature() -> f64 {
    0.01
}

fn default_top_p() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn resolve_config_path() -> TarsResult<PathBuf> {
    if let Ok(exe) = std::env::current_exe() {
        if let Some(parent) = exe.parent() {
            let candidate = parent.join("config.toml");
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "config found next to executable");
                return Ok(candidate);
            }
        }
    }

    let cwd = std::env::current_dir()?;
    let candidate = cwd.join("config.toml");
    if candidate.exists() {
        tracing::debug!(path = %candidate.display(), "config found in working directory");
        return Ok(candidate);
    }

    Err(TarsError::Config(
        "config.toml not found next to executable or in working directory".into(),
    ))
}

pub fn load_config() -> TarsResult<AppConfig> {
    let path = resolve_config_path()?;
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> TarsResult<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    if !(config.parser.coordinate_scale.is_finite() && config.parser.coordinate_scale > 0.0) {
        return Err(TarsError::Config(format!(
            "parser.coordinate_scale must be a positive number, got {}",
            config.parser.coordinate_scale
        )));
    }
    tracing::info!(
        path = %path.display(),
        model = %config.model.model,
        scale = config.parser.coordinate_scale,
        "config loaded"
    );
    Ok(config)
}

pub fn save_config(config: &AppConfig, path: &Path) -> TarsResult<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.parser.coordinate_scale, 1000.0);
        assert_eq!(cfg.model.max_tokens, 1000);
        assert!(!cfg.model.stream);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [parser]
            coordinate_scale = 1024.0

            [model]
            model = "ui-tars-72b"
            stream = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.parser.coordinate_scale, 1024.0);
        assert_eq!(cfg.model.model, "ui-tars-72b");
        assert!(cfg.model.stream);
        assert_eq!(cfg.model.top_p, 0.7);
    }

    #[test]
    fn rejects_non_positive_scale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[parser]\ncoordinate_scale = 0.0\n").unwrap();
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, TarsError::Config(_)));
    }
}
