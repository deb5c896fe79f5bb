use std::env;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ENV_CATALOG_BASE_URL: &str = "SHOPLY_CATALOG_BASE_URL";
const ENV_CATALOG_TIMEOUT_SECS: &str = "SHOPLY_CATALOG_TIMEOUT_SECS";
const ENV_LLM_API_KEY: &str = "SHOPLY_LLM_API_KEY";
// GEMINI_API_KEY is kept as a fallback alias for deployments that already export it.
const ENV_LLM_API_KEY_ALIAS: &str = "GEMINI_API_KEY";
const ENV_LLM_BASE_URL: &str = "SHOPLY_LLM_BASE_URL";
const ENV_LLM_MODEL: &str = "SHOPLY_LLM_MODEL";
const ENV_LLM_TIMEOUT_SECS: &str = "SHOPLY_LLM_TIMEOUT_SECS";
const ENV_LOGGING_LEVEL: &str = "SHOPLY_LOGGING_LEVEL";
const ENV_LOGGING_LEVEL_SHORT: &str = "SHOPLY_LOG_LEVEL";
const ENV_LOGGING_FORMAT: &str = "SHOPLY_LOGGING_FORMAT";
const ENV_LOGGING_FORMAT_SHORT: &str = "SHOPLY_LOG_FORMAT";

const DEFAULT_CONFIG_LOCATIONS: [&str; 2] = ["shoply.toml", "config/shoply.toml"];
const TIMEOUT_RANGE: RangeInclusive<u64> = 1..=300;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

const API_KEY_HINT: &str = "llm.api_key is required. Set SHOPLY_LLM_API_KEY (or GEMINI_API_KEY), \
                            or add api_key under [llm] in shoply.toml";

/// Runtime settings for the catalog client, the model client, and logging.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub api_key: Option<SecretString>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

/// Programmatic settings that win over both the config file and the environment.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub catalog_base_url: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub llm_model: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                base_url: "https://template-03-api.vercel.app".to_string(),
                timeout_secs: 30,
            },
            llm: LlmConfig {
                api_key: None,
                base_url: "https://generativelanguage.googleapis.com/v1beta/openai".to_string(),
                model: "gemini-1.5-flash-latest".to_string(),
                timeout_secs: 60,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    /// Builds the effective configuration. Later sources win: defaults, config
    /// file, environment variables, explicit overrides.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = resolve_config_path(options.config_path.as_deref()) {
            config.apply_patch(read_patch(&path)?);
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            overlay(&mut self.catalog.base_url, catalog.base_url);
            overlay(&mut self.catalog.timeout_secs, catalog.timeout_secs);
        }
        if let Some(llm) = patch.llm {
            if let Some(api_key) = llm.api_key {
                self.llm.api_key = Some(secret_value(api_key));
            }
            overlay(&mut self.llm.base_url, llm.base_url);
            overlay(&mut self.llm.model, llm.model);
            overlay(&mut self.llm.timeout_secs, llm.timeout_secs);
        }
        if let Some(logging) = patch.logging {
            overlay(&mut self.logging.level, logging.level);
            overlay(&mut self.logging.format, logging.format);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        overlay(&mut self.catalog.base_url, read_env(ENV_CATALOG_BASE_URL));
        if let Some(value) = read_env(ENV_CATALOG_TIMEOUT_SECS) {
            self.catalog.timeout_secs = parse_timeout(ENV_CATALOG_TIMEOUT_SECS, &value)?;
        }

        let api_key = read_env(ENV_LLM_API_KEY).or_else(|| read_env(ENV_LLM_API_KEY_ALIAS));
        if let Some(value) = api_key {
            self.llm.api_key = Some(secret_value(value));
        }
        overlay(&mut self.llm.base_url, read_env(ENV_LLM_BASE_URL));
        overlay(&mut self.llm.model, read_env(ENV_LLM_MODEL));
        if let Some(value) = read_env(ENV_LLM_TIMEOUT_SECS) {
            self.llm.timeout_secs = parse_timeout(ENV_LLM_TIMEOUT_SECS, &value)?;
        }

        let level = read_env(ENV_LOGGING_LEVEL).or_else(|| read_env(ENV_LOGGING_LEVEL_SHORT));
        overlay(&mut self.logging.level, level);
        let format = read_env(ENV_LOGGING_FORMAT).or_else(|| read_env(ENV_LOGGING_FORMAT_SHORT));
        if let Some(value) = format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        overlay(&mut self.catalog.base_url, overrides.catalog_base_url);
        if let Some(api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(api_key));
        }
        overlay(&mut self.llm.base_url, overrides.llm_base_url);
        overlay(&mut self.llm.model, overrides.llm_model);
        overlay(&mut self.logging.level, overrides.log_level);
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        require(
            is_http_url(&self.catalog.base_url),
            "catalog.base_url must start with http:// or https://",
        )?;
        require(
            TIMEOUT_RANGE.contains(&self.catalog.timeout_secs),
            "catalog.timeout_secs must be in range 1..=300",
        )?;

        let api_key_usable = self
            .llm
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().trim().is_empty());
        require(api_key_usable, API_KEY_HINT)?;
        require(
            is_http_url(&self.llm.base_url),
            "llm.base_url must start with http:// or https://",
        )?;
        require(!self.llm.model.trim().is_empty(), "llm.model must not be empty")?;
        require(
            TIMEOUT_RANGE.contains(&self.llm.timeout_secs),
            "llm.timeout_secs must be in range 1..=300",
        )?;

        require(
            LOG_LEVELS.contains(&self.logging.level.trim().to_ascii_lowercase().as_str()),
            "logging.level must be one of trace|debug|info|warn|error",
        )
    }
}

fn overlay<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn require(condition: bool, message: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::Validation(message.to_string()))
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    match explicit_path {
        Some(path) => path.exists().then(|| path.to_path_buf()),
        None => DEFAULT_CONFIG_LOCATIONS.iter().map(PathBuf::from).find(|path| path.exists()),
    }
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

/// Expands `${VAR}` references in the raw file text against the process environment.
fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        output.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find('}') else {
            return Err(ConfigError::UnterminatedInterpolation);
        };
        let var = &after_open[..end];
        let value = env::var(var)
            .map_err(|_| ConfigError::MissingEnvInterpolation { var: var.to_string() })?;
        output.push_str(&value);
        rest = &after_open[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_timeout(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    llm: Option<LlmPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
