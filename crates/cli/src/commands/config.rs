use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use netbot_core::config::{AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    render(&config, config_file_doc.as_ref(), config_file_path.as_deref())
}

fn render(config: &AppConfig, config_file_doc: Option<&Value>, config_file_path: Option<&Path>) -> String {
    let entries = vec![
        entry(
            "dashboard.api_key",
            redact_secret(config.dashboard.api_key.expose_secret()),
            &["NETBOT_DASHBOARD_API_KEY", "MERAKI_API_KEY"],
        ),
        entry("dashboard.base_url", config.dashboard.base_url.clone(), &["NETBOT_DASHBOARD_BASE_URL"]),
        entry(
            "dashboard.timeout_secs",
            config.dashboard.timeout_secs.to_string(),
            &["NETBOT_DASHBOARD_TIMEOUT_SECS"],
        ),
        entry(
            "spark.access_token",
            redact_secret(config.spark.access_token.expose_secret()),
            &["NETBOT_SPARK_ACCESS_TOKEN"],
        ),
        entry("spark.base_url", config.spark.base_url.clone(), &["NETBOT_SPARK_BASE_URL"]),
        entry(
            "spark.timeout_secs",
            config.spark.timeout_secs.to_string(),
            &["NETBOT_SPARK_TIMEOUT_SECS"],
        ),
        entry(
            "directory.excluded_organization",
            config.directory.excluded_organization.clone().unwrap_or_else(|| "<unset>".to_string()),
            &["NETBOT_DIRECTORY_EXCLUDED_ORGANIZATION"],
        ),
        entry("matching.threshold", config.matching.threshold.to_string(), &["NETBOT_MATCHING_THRESHOLD"]),
        entry("matching.distance", config.matching.distance.to_string(), &["NETBOT_MATCHING_DISTANCE"]),
        entry("charts.hostname", config.charts.hostname.clone(), &[]),
        entry("charts.width", config.charts.width.to_string(), &[]),
        entry("charts.height", config.charts.height.to_string(), &[]),
        entry("channels.allowed", config.channels.allowed.join(","), &["NETBOT_CHANNELS_ALLOWED"]),
        entry(
            "actions.dns_lookups",
            format!("{:?}", config.actions.dns_lookups),
            &["NETBOT_ACTIONS_DNS_LOOKUPS"],
        ),
        entry("server.bind_address", config.server.bind_address.clone(), &["NETBOT_SERVER_BIND_ADDRESS"]),
        entry("server.port", config.server.port.to_string(), &["NETBOT_SERVER_PORT", "PORT"]),
        entry(
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            &["NETBOT_SERVER_GRACEFUL_SHUTDOWN_SECS"],
        ),
        entry("logging.level", config.logging.level.clone(), &["NETBOT_LOGGING_LEVEL", "NETBOT_LOG_LEVEL"]),
        entry(
            "logging.format",
            format!("{:?}", config.logging.format),
            &["NETBOT_LOGGING_FORMAT", "NETBOT_LOG_FORMAT"],
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(entries.into_iter().map(|entry| {
        let source = field_source(entry.key, entry.env_keys, config_file_doc, config_file_path);
        render_line(entry.key, &entry.value, source)
    }));
    lines.join("\n")
}

struct ConfigEntry {
    key: &'static str,
    value: String,
    env_keys: &'static [&'static str],
}

fn entry(key: &'static str, value: String, env_keys: &'static [&'static str]) -> ConfigEntry {
    ConfigEntry { key, value, env_keys }
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("netbot.toml"), PathBuf::from("config/netbot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
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

/// Keeps only the last four characters of long secrets.
fn redact_secret(secret: &str) -> String {
    let trimmed = secret.trim();
    if trimmed.is_empty() {
        return "<empty>".to_string();
    }

    let chars: Vec<char> = trimmed.chars().collect();
    if chars.len() <= 8 {
        return "<redacted>".to_string();
    }

    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("***{tail}")
}
