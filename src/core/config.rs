//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.flowchat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! The four connection settings (flow id, base URL, API key, bearer token)
//! have no defaults. If any of them is still unset after resolution,
//! start-up fails with [`ConfigError::Missing`].

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::i18n::Language;
use crate::flow::retry::DEFAULT_MAX_RETRIES;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FlowchatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub langflow: LangflowConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub language: Option<Language>,
    pub max_retries: Option<u32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LangflowConfig {
    pub flow_id: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub bearer_token: Option<String>,
}

/// Values given on the command line. `None` = flag not passed.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub flow_id: Option<String>,
    pub base_url: Option<String>,
    pub language: Option<Language>,
    pub max_retries: Option<u32>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Clone)]
pub struct ResolvedConfig {
    pub flow_id: String,
    pub base_url: String,
    pub api_key: String,
    pub bearer_token: String,
    pub language: Language,
    pub max_retries: u32,
    pub timeout: Duration,
}

// Credentials stay out of the log file.
impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("flow_id", &self.flow_id)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("bearer_token", &"<redacted>")
            .field("language", &self.language)
            .field("max_retries", &self.max_retries)
            .field("timeout", &self.timeout)
            .finish()
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    /// Required settings that were not found anywhere.
    Missing(Vec<&'static str>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Missing(keys) => write!(
                f,
                "missing configuration: {} (set them in ~/.flowchat/config.toml, the environment or .env)",
                keys.join(", ")
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.flowchat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".flowchat").join("config.toml"))
}

/// Load config from `~/.flowchat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `FlowchatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<FlowchatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(FlowchatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(FlowchatConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: FlowchatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!(
        "Config: language={:?}, max_retries={:?}, flow_id={:?}, base_url={:?}",
        config.general.language,
        config.general.max_retries,
        config.langflow.flow_id,
        config.langflow.base_url
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Flowchat Configuration
# Override hierarchy: defaults → this file → env vars → CLI flags.
# The four [langflow] settings are required (here or via env vars).

# [general]
# language = "en"                    # "en" or "tr"
# max_retries = 2                    # extra attempts after the first
# timeout_secs = 30                  # per attempt

# [langflow]
# flow_id = "..."                    # Or set LANGFLOW_FLOW_ID
# base_url = "https://..."           # Or set LANGFLOW_BASE_URL
# api_key = "sk-..."                 # Or set LANGFLOW_API_KEY
# bearer_token = "hf_..."            # Or set LANGFLOW_BEARER_TOKEN / HF_TOKEN
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config from the file, the process environment and CLI flags.
pub fn resolve(config: &FlowchatConfig, cli: &CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`] with an injectable environment lookup.
pub fn resolve_with<F>(
    config: &FlowchatConfig,
    cli: &CliOverrides,
    env: F,
) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Empty env values count as unset
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    // Flow id / base URL: CLI → env → config
    let flow_id = cli
        .flow_id
        .clone()
        .or_else(|| env("LANGFLOW_FLOW_ID"))
        .or_else(|| config.langflow.flow_id.clone());

    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("LANGFLOW_BASE_URL"))
        .or_else(|| config.langflow.base_url.clone());

    // Credentials: env → config
    let api_key = env("LANGFLOW_API_KEY").or_else(|| config.langflow.api_key.clone());

    let bearer_token = env("LANGFLOW_BEARER_TOKEN")
        .or_else(|| env("HF_TOKEN"))
        .or_else(|| config.langflow.bearer_token.clone());

    // Language: CLI → env → config → default
    let language = cli
        .language
        .or_else(|| env("FLOWCHAT_LANGUAGE").and_then(|v| Language::parse(&v)))
        .or(config.general.language)
        .unwrap_or_default();

    let max_retries = cli
        .max_retries
        .or(config.general.max_retries)
        .unwrap_or(DEFAULT_MAX_RETRIES);

    let timeout = Duration::from_secs(
        config
            .general
            .timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    );

    let mut missing = Vec::new();
    let flow_id = require(flow_id, "flow_id", &mut missing);
    let base_url = require(base_url, "base_url", &mut missing);
    let api_key = require(api_key, "api_key", &mut missing);
    let bearer_token = require(bearer_token, "bearer_token", &mut missing);

    if !missing.is_empty() {
        return Err(ConfigError::Missing(missing));
    }

    Ok(ResolvedConfig {
        flow_id,
        base_url,
        api_key,
        bearer_token,
        language,
        max_retries,
        timeout,
    })
}

fn require(value: Option<String>, key: &'static str, missing: &mut Vec<&'static str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            missing.push(key);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn full_config() -> FlowchatConfig {
        FlowchatConfig {
            langflow: LangflowConfig {
                flow_id: Some("file-flow".to_string()),
                base_url: Some("https://file.example.com".to_string()),
                api_key: Some("file-key".to_string()),
                bearer_token: Some("file-token".to_string()),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_default_config_parses() {
        let config = FlowchatConfig::default();
        assert!(config.langflow.flow_id.is_none());
        assert!(config.general.language.is_none());
    }

    #[test]
    fn test_missing_settings_are_all_reported() {
        let err = resolve_with(&FlowchatConfig::default(), &CliOverrides::default(), no_env)
            .unwrap_err();
        match err {
            ConfigError::Missing(keys) => {
                assert_eq!(keys, vec!["flow_id", "base_url", "api_key", "bearer_token"]);
            }
            other => panic!("expected Missing, got {other:?}"),
        }
    }

    #[test]
    fn test_file_values_with_defaults() {
        let resolved = resolve_with(&full_config(), &CliOverrides::default(), no_env).unwrap();
        assert_eq!(resolved.flow_id, "file-flow");
        assert_eq!(resolved.api_key, "file-key");
        assert_eq!(resolved.language, Language::English);
        assert_eq!(resolved.max_retries, DEFAULT_MAX_RETRIES);
        assert_eq!(resolved.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_env_overrides_file_and_cli_overrides_env() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("LANGFLOW_FLOW_ID", "env-flow"),
            ("LANGFLOW_BASE_URL", "https://env.example.com"),
            ("LANGFLOW_API_KEY", "env-key"),
            ("FLOWCHAT_LANGUAGE", "tr"),
        ]);
        let env = |k: &str| vars.get(k).map(|v| v.to_string());

        let cli = CliOverrides {
            flow_id: Some("cli-flow".to_string()),
            ..Default::default()
        };
        let resolved = resolve_with(&full_config(), &cli, env).unwrap();
        assert_eq!(resolved.flow_id, "cli-flow");
        assert_eq!(resolved.base_url, "https://env.example.com");
        assert_eq!(resolved.api_key, "env-key");
        assert_eq!(resolved.bearer_token, "file-token");
        assert_eq!(resolved.language, Language::Turkish);
    }

    #[test]
    fn test_hf_token_is_bearer_fallback() {
        let env = |k: &str| (k == "HF_TOKEN").then(|| "hf_abc".to_string());
        let mut config = full_config();
        config.langflow.bearer_token = None;
        let resolved = resolve_with(&config, &CliOverrides::default(), env).unwrap();
        assert_eq!(resolved.bearer_token, "hf_abc");
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let mut config = full_config();
        config.langflow.api_key = Some("   ".to_string());
        let env = |k: &str| (k == "LANGFLOW_FLOW_ID").then(|| String::new());
        let err = resolve_with(&config, &CliOverrides::default(), env).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ref keys) if keys == &vec!["api_key"]));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let resolved = resolve_with(&full_config(), &CliOverrides::default(), no_env).unwrap();
        let shown = format!("{resolved:?}");
        assert!(!shown.contains("file-key"));
        assert!(!shown.contains("file-token"));
        assert!(shown.contains("file-flow"));
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
language = "tr"
max_retries = 4
timeout_secs = 10

[langflow]
flow_id = "abc"
base_url = "http://localhost:7860"
api_key = "sk-test"
bearer_token = "hf_test"
"#;
        let config: FlowchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.language, Some(Language::Turkish));
        assert_eq!(config.general.max_retries, Some(4));
        let resolved = resolve_with(&config, &CliOverrides::default(), no_env).unwrap();
        assert_eq!(resolved.timeout, Duration::from_secs(10));
        assert_eq!(resolved.base_url, "http://localhost:7860");
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[langflow]
flow_id = "only-this"
"#;
        let config: FlowchatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.langflow.flow_id.as_deref(), Some("only-this"));
        assert!(config.langflow.api_key.is_none());
        assert!(config.general.max_retries.is_none());
    }
}
