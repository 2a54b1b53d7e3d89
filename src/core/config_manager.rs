// src/core/config_manager.rs
//! Configuration: optional YAML file, then environment overrides

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::analysis::{CaptureThresholds, ParserOptions};
use crate::session::SessionTimeoutConfig;

pub const DEFAULT_CONFIG_FILE: &str = "hirelens.yaml";

#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    pub session: SessionConfig,
    pub parser: ParserConfig,
    /// File the values were read from, if any
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub idle_timeout_secs: u64,
    pub warning_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let defaults = SessionTimeoutConfig::default();
        Self {
            idle_timeout_secs: defaults.idle_timeout.as_secs(),
            warning_secs: defaults.warning_duration.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub min_labeled_line_len: usize,
    pub min_strength_len: usize,
    pub min_risk_len: usize,
    pub min_question_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        let defaults = CaptureThresholds::default();
        Self {
            min_labeled_line_len: defaults.min_labeled_line_len,
            min_strength_len: defaults.min_strength_len,
            min_risk_len: defaults.min_risk_len,
            min_question_len: defaults.min_question_len,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    session: SessionConfig,
    #[serde(default)]
    parser: ParserConfig,
}

impl ConfigManager {
    /// Load from `HIRELENS_CONFIG` or `hirelens.yaml`, then apply `HIRELENS_*` overrides
    pub fn load() -> Result<Self> {
        let explicit = std::env::var("HIRELENS_CONFIG").ok().map(PathBuf::from);
        let path = explicit
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            Self::load_from_file(&path)?
        } else if explicit.is_some() {
            anyhow::bail!("Config file not found: {}", path.display());
        } else {
            info!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            Self::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_yaml_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ConfigFile = if content.trim().is_empty() {
            ConfigFile::default()
        } else {
            serde_yaml::from_str(content).context("Invalid configuration YAML")?
        };

        Ok(Self {
            session: file.session,
            parser: file.parser,
            source: None,
        })
    }

    /// Apply `HIRELENS_*` overrides looked up through `lookup`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        override_number(&lookup, "HIRELENS_IDLE_TIMEOUT_SECS", &mut self.session.idle_timeout_secs)?;
        override_number(&lookup, "HIRELENS_WARNING_SECS", &mut self.session.warning_secs)?;
        override_number(&lookup, "HIRELENS_MIN_LABELED_LINE_LEN", &mut self.parser.min_labeled_line_len)?;
        override_number(&lookup, "HIRELENS_MIN_STRENGTH_LEN", &mut self.parser.min_strength_len)?;
        override_number(&lookup, "HIRELENS_MIN_RISK_LEN", &mut self.parser.min_risk_len)?;
        override_number(&lookup, "HIRELENS_MIN_QUESTION_LEN", &mut self.parser.min_question_len)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.session.idle_timeout_secs == 0 {
            anyhow::bail!("session.idle_timeout_secs must be greater than zero");
        }
        if self.session.warning_secs == 0 {
            anyhow::bail!("session.warning_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn session_timeout(&self) -> SessionTimeoutConfig {
        SessionTimeoutConfig {
            idle_timeout: Duration::from_secs(self.session.idle_timeout_secs),
            warning_duration: Duration::from_secs(self.session.warning_secs),
        }
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            thresholds: CaptureThresholds {
                min_labeled_line_len: self.parser.min_labeled_line_len,
                min_strength_len: self.parser.min_strength_len,
                min_risk_len: self.parser.min_risk_len,
                min_question_len: self.parser.min_question_len,
            },
        }
    }
}

fn override_number<F, N>(lookup: &F, key: &str, target: &mut N) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
    N: std::str::FromStr,
{
    if let Some(raw) = lookup(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a non-negative integer, got '{}'", key, raw))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_components() {
        let config = ConfigManager::default();
        assert_eq!(config.session_timeout(), SessionTimeoutConfig::default());
        assert_eq!(config.parser_options().thresholds, CaptureThresholds::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ConfigManager::from_yaml_str("session:\n  warning_secs: 30\n").unwrap();
        assert_eq!(config.session.warning_secs, 30);
        assert_eq!(config.session.idle_timeout_secs, 1800);
        assert_eq!(config.parser, ParserConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ConfigManager::default();
        config
            .apply_overrides(|key| match key {
                "HIRELENS_IDLE_TIMEOUT_SECS" => Some("600".to_string()),
                "HIRELENS_MIN_RISK_LEN" => Some(" 4 ".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.session_timeout().idle_timeout, Duration::from_secs(600));
        assert_eq!(config.parser_options().thresholds.min_risk_len, 4);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = ConfigManager::default();
        let result = config.apply_overrides(|key| {
            (key == "HIRELENS_WARNING_SECS").then(|| "two minutes".to_string())
        });
        assert!(result.is_err());

        let config = ConfigManager::from_yaml_str("session:\n  idle_timeout_secs: 0\n").unwrap();
        assert!(config.validate().is_err());
        assert!(ConfigManager::from_yaml_str("session: nope").is_err());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = ConfigManager::from_yaml_str("").unwrap();
        assert_eq!(config.session, SessionConfig::default());
    }
}
