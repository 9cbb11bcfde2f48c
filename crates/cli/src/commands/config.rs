use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use mixmart_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    let fields: [(&str, String, Option<&str>); 8] = [
        (
            "comparator.max_per_group",
            config.comparator.max_per_group.to_string(),
            Some("MIXMART_COMPARATOR_MAX_PER_GROUP"),
        ),
        (
            "comparator.alternative_band_pct",
            config.comparator.alternative_band_pct.to_string(),
            Some("MIXMART_COMPARATOR_ALTERNATIVE_BAND_PCT"),
        ),
        (
            "history.frequency_threshold",
            config.history.frequency_threshold.to_string(),
            Some("MIXMART_HISTORY_FREQUENCY_THRESHOLD"),
        ),
        (
            "history.frequency_norm",
            config.history.frequency_norm.to_string(),
            Some("MIXMART_HISTORY_FREQUENCY_NORM"),
        ),
        (
            "history.upgrade_price_multiplier_pct",
            config.history.upgrade_price_multiplier_pct.to_string(),
            Some("MIXMART_HISTORY_UPGRADE_MULTIPLIER_PCT"),
        ),
        (
            "history.popular_per_category",
            config.history.popular_per_category.to_string(),
            Some("MIXMART_HISTORY_POPULAR_PER_CATEGORY"),
        ),
        ("logging.level", config.logging.level.clone(), Some("MIXMART_LOGGING_LEVEL")),
        ("logging.format", format!("{:?}", config.logging.format), Some("MIXMART_LOGGING_FORMAT")),
    ];

    for (key, value, env_key) in fields {
        lines.push(render_line(
            key,
            &value,
            field_source(key, env_key, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("mixmart.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/mixmart.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
