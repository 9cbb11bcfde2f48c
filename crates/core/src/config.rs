use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning knobs for both recommendation engines. The numeric thresholds here
/// are operational configuration to be tuned against real catalog and order
/// data, not contractual values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub comparator: ComparatorConfig,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ComparatorConfig {
    /// Display cap per recommendation group.
    pub max_per_group: usize,
    /// Alternative partition price band, in whole percent of the reference
    /// best price.
    pub alternative_band_pct: u32,
}

#[derive(Clone, Debug)]
pub struct HistoryConfig {
    /// Minimum purchase count before a product counts as frequently bought.
    pub frequency_threshold: u32,
    /// Purchase count that maps to full confidence.
    pub frequency_norm: u32,
    /// Upper bound for upgrade candidates, in whole percent of the
    /// customer's average category spend (150 = 1.5x).
    pub upgrade_price_multiplier_pct: u32,
    /// Popular products surfaced per category by the category-popular pass.
    pub popular_per_category: usize,
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

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub max_per_group: Option<usize>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            comparator: ComparatorConfig { max_per_group: 4, alternative_band_pct: 15 },
            history: HistoryConfig {
                frequency_threshold: 2,
                frequency_norm: 5,
                upgrade_price_multiplier_pct: 150,
                popular_per_category: 3,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
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
    /// Precedence: programmatic overrides > environment > file > defaults.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("mixmart.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(comparator) = patch.comparator {
            if let Some(max_per_group) = comparator.max_per_group {
                self.comparator.max_per_group = max_per_group;
            }
            if let Some(alternative_band_pct) = comparator.alternative_band_pct {
                self.comparator.alternative_band_pct = alternative_band_pct;
            }
        }

        if let Some(history) = patch.history {
            if let Some(frequency_threshold) = history.frequency_threshold {
                self.history.frequency_threshold = frequency_threshold;
            }
            if let Some(frequency_norm) = history.frequency_norm {
                self.history.frequency_norm = frequency_norm;
            }
            if let Some(upgrade_price_multiplier_pct) = history.upgrade_price_multiplier_pct {
                self.history.upgrade_price_multiplier_pct = upgrade_price_multiplier_pct;
            }
            if let Some(popular_per_category) = history.popular_per_category {
                self.history.popular_per_category = popular_per_category;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("MIXMART_COMPARATOR_MAX_PER_GROUP") {
            self.comparator.max_per_group =
                parse_usize("MIXMART_COMPARATOR_MAX_PER_GROUP", &value)?;
        }
        if let Some(value) = read_env("MIXMART_COMPARATOR_ALTERNATIVE_BAND_PCT") {
            self.comparator.alternative_band_pct =
                parse_u32("MIXMART_COMPARATOR_ALTERNATIVE_BAND_PCT", &value)?;
        }

        if let Some(value) = read_env("MIXMART_HISTORY_FREQUENCY_THRESHOLD") {
            self.history.frequency_threshold =
                parse_u32("MIXMART_HISTORY_FREQUENCY_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("MIXMART_HISTORY_FREQUENCY_NORM") {
            self.history.frequency_norm = parse_u32("MIXMART_HISTORY_FREQUENCY_NORM", &value)?;
        }
        if let Some(value) = read_env("MIXMART_HISTORY_UPGRADE_MULTIPLIER_PCT") {
            self.history.upgrade_price_multiplier_pct =
                parse_u32("MIXMART_HISTORY_UPGRADE_MULTIPLIER_PCT", &value)?;
        }
        if let Some(value) = read_env("MIXMART_HISTORY_POPULAR_PER_CATEGORY") {
            self.history.popular_per_category =
                parse_usize("MIXMART_HISTORY_POPULAR_PER_CATEGORY", &value)?;
        }

        let log_level =
            read_env("MIXMART_LOGGING_LEVEL").or_else(|| read_env("MIXMART_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("MIXMART_LOGGING_FORMAT").or_else(|| read_env("MIXMART_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(max_per_group) = overrides.max_per_group {
            self.comparator.max_per_group = max_per_group;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_comparator(&self.comparator)?;
        validate_history(&self.history)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("mixmart.toml"), PathBuf::from("config/mixmart.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn validate_comparator(comparator: &ComparatorConfig) -> Result<(), ConfigError> {
    if comparator.max_per_group == 0 {
        return Err(ConfigError::Validation(
            "comparator.max_per_group must be greater than zero".to_string(),
        ));
    }

    if comparator.alternative_band_pct == 0 || comparator.alternative_band_pct > 100 {
        return Err(ConfigError::Validation(
            "comparator.alternative_band_pct must be in range 1..=100".to_string(),
        ));
    }

    Ok(())
}

fn validate_history(history: &HistoryConfig) -> Result<(), ConfigError> {
    if history.frequency_threshold == 0 {
        return Err(ConfigError::Validation(
            "history.frequency_threshold must be greater than zero".to_string(),
        ));
    }

    if history.frequency_norm < history.frequency_threshold {
        return Err(ConfigError::Validation(
            "history.frequency_norm must be at least history.frequency_threshold".to_string(),
        ));
    }

    if history.upgrade_price_multiplier_pct <= 100 || history.upgrade_price_multiplier_pct > 500 {
        return Err(ConfigError::Validation(
            "history.upgrade_price_multiplier_pct must be in range 101..=500".to_string(),
        ));
    }

    if history.popular_per_category == 0 {
        return Err(ConfigError::Validation(
            "history.popular_per_category must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    comparator: Option<ComparatorPatch>,
    history: Option<HistoryPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ComparatorPatch {
    max_per_group: Option<usize>,
    alternative_band_pct: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct HistoryPatch {
    frequency_threshold: Option<u32>,
    frequency_norm: Option<u32>,
    upgrade_price_multiplier_pct: Option<u32>,
    popular_per_category: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
