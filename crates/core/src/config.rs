use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ALLOWED_CHANNELS: &[&str] = &["google", "facebook", "slack", "slack_testbot", "spark"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub dashboard: DashboardConfig,
    pub spark: SparkConfig,
    pub directory: DirectoryConfig,
    pub matching: MatchingConfig,
    pub charts: ChartConfig,
    pub channels: ChannelConfig,
    pub actions: ActionConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct DashboardConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct SparkConfig {
    pub access_token: SecretString,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Default)]
pub struct DirectoryConfig {
    pub excluded_organization: Option<String>,
}

#[derive(Clone, Debug)]
pub struct MatchingConfig {
    pub threshold: f64,
    pub distance: u32,
}

#[derive(Clone, Debug)]
pub struct ChartConfig {
    pub hostname: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug)]
pub struct ChannelConfig {
    pub allowed: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ActionConfig {
    pub dns_lookups: LookupMode,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
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

/// How independent DNS lookups in a batch are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupMode {
    #[default]
    Sequential,
    Concurrent,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub dashboard_api_key: Option<String>,
    pub dashboard_base_url: Option<String>,
    pub spark_access_token: Option<String>,
    pub spark_base_url: Option<String>,
    pub excluded_organization: Option<String>,
    pub allowed_channels: Option<Vec<String>>,
    pub server_port: Option<u16>,
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
            dashboard: DashboardConfig {
                api_key: String::new().into(),
                base_url: "https://api.meraki.com/api/v0".to_string(),
                timeout_secs: 30,
            },
            spark: SparkConfig {
                access_token: String::new().into(),
                base_url: "https://webexapis.com/v1".to_string(),
                timeout_secs: 30,
            },
            directory: DirectoryConfig::default(),
            matching: MatchingConfig { threshold: 0.6, distance: 100 },
            charts: ChartConfig { hostname: "image-charts.com".to_string(), width: 700, height: 700 },
            channels: ChannelConfig {
                allowed: DEFAULT_ALLOWED_CHANNELS.iter().map(|name| name.to_string()).collect(),
            },
            actions: ActionConfig { dns_lookups: LookupMode::Sequential },
            server: ServerConfig {
                bind_address: "0.0.0.0".to_string(),
                port: 8080,
                graceful_shutdown_secs: 15,
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

impl std::str::FromStr for LookupMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "concurrent" => Ok(Self::Concurrent),
            other => Err(ConfigError::Validation(format!(
                "unsupported dns lookup mode `{other}` (expected sequential|concurrent)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("netbot.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn channel_allowed(&self, source: &str) -> bool {
        self.channels.allowed.iter().any(|allowed| allowed == source)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(dashboard) = patch.dashboard {
            if let Some(api_key_value) = dashboard.api_key {
                self.dashboard.api_key = secret_value(api_key_value);
            }
            if let Some(base_url) = dashboard.base_url {
                self.dashboard.base_url = base_url;
            }
            if let Some(timeout_secs) = dashboard.timeout_secs {
                self.dashboard.timeout_secs = timeout_secs;
            }
        }

        if let Some(spark) = patch.spark {
            if let Some(access_token_value) = spark.access_token {
                self.spark.access_token = secret_value(access_token_value);
            }
            if let Some(base_url) = spark.base_url {
                self.spark.base_url = base_url;
            }
            if let Some(timeout_secs) = spark.timeout_secs {
                self.spark.timeout_secs = timeout_secs;
            }
        }

        if let Some(directory) = patch.directory {
            if let Some(excluded) = directory.excluded_organization {
                self.directory.excluded_organization = Some(excluded);
            }
        }

        if let Some(matching) = patch.matching {
            if let Some(threshold) = matching.threshold {
                self.matching.threshold = threshold;
            }
            if let Some(distance) = matching.distance {
                self.matching.distance = distance;
            }
        }

        if let Some(charts) = patch.charts {
            if let Some(hostname) = charts.hostname {
                self.charts.hostname = hostname;
            }
            if let Some(width) = charts.width {
                self.charts.width = width;
            }
            if let Some(height) = charts.height {
                self.charts.height = height;
            }
        }

        if let Some(channels) = patch.channels {
            if let Some(allowed) = channels.allowed {
                self.channels.allowed = allowed;
            }
        }

        if let Some(actions) = patch.actions {
            if let Some(dns_lookups) = actions.dns_lookups {
                self.actions.dns_lookups = dns_lookups;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
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
        // MERAKI_API_KEY is the name operators already export for the dashboard
        let api_key = read_env("NETBOT_DASHBOARD_API_KEY").or_else(|| read_env("MERAKI_API_KEY"));
        if let Some(value) = api_key {
            self.dashboard.api_key = secret_value(value);
        }
        if let Some(value) = read_env("NETBOT_DASHBOARD_BASE_URL") {
            self.dashboard.base_url = value;
        }
        if let Some(value) = read_env("NETBOT_DASHBOARD_TIMEOUT_SECS") {
            self.dashboard.timeout_secs = parse_u64("NETBOT_DASHBOARD_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("NETBOT_SPARK_ACCESS_TOKEN") {
            self.spark.access_token = secret_value(value);
        }
        if let Some(value) = read_env("NETBOT_SPARK_BASE_URL") {
            self.spark.base_url = value;
        }
        if let Some(value) = read_env("NETBOT_SPARK_TIMEOUT_SECS") {
            self.spark.timeout_secs = parse_u64("NETBOT_SPARK_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = read_env("NETBOT_DIRECTORY_EXCLUDED_ORGANIZATION") {
            self.directory.excluded_organization = Some(value);
        }

        if let Some(value) = read_env("NETBOT_MATCHING_THRESHOLD") {
            self.matching.threshold = parse_f64("NETBOT_MATCHING_THRESHOLD", &value)?;
        }
        if let Some(value) = read_env("NETBOT_MATCHING_DISTANCE") {
            self.matching.distance = parse_u32("NETBOT_MATCHING_DISTANCE", &value)?;
        }

        if let Some(value) = read_env("NETBOT_CHANNELS_ALLOWED") {
            self.channels.allowed = value
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
                .collect();
        }

        if let Some(value) = read_env("NETBOT_ACTIONS_DNS_LOOKUPS") {
            self.actions.dns_lookups = value.parse()?;
        }

        if let Some(value) = read_env("NETBOT_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        let port = read_env("NETBOT_SERVER_PORT").or_else(|| read_env("PORT"));
        if let Some(value) = port {
            self.server.port = parse_u16("NETBOT_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("NETBOT_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("NETBOT_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        let log_level = read_env("NETBOT_LOGGING_LEVEL").or_else(|| read_env("NETBOT_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("NETBOT_LOGGING_FORMAT").or_else(|| read_env("NETBOT_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(api_key) = overrides.dashboard_api_key {
            self.dashboard.api_key = secret_value(api_key);
        }
        if let Some(base_url) = overrides.dashboard_base_url {
            self.dashboard.base_url = base_url;
        }
        if let Some(access_token) = overrides.spark_access_token {
            self.spark.access_token = secret_value(access_token);
        }
        if let Some(base_url) = overrides.spark_base_url {
            self.spark.base_url = base_url;
        }
        if let Some(excluded) = overrides.excluded_organization {
            self.directory.excluded_organization = Some(excluded);
        }
        if let Some(allowed) = overrides.allowed_channels {
            self.channels.allowed = allowed;
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dashboard(&self.dashboard)?;
        validate_spark(&self.spark, &self.channels)?;
        validate_matching(&self.matching)?;
        validate_charts(&self.charts)?;
        validate_channels(&self.channels)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("netbot.toml"), PathBuf::from("config/netbot.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_dashboard(dashboard: &DashboardConfig) -> Result<(), ConfigError> {
    if dashboard.api_key.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "dashboard.api_key is required. Generate one under Organization > Settings > Dashboard API access".to_string(),
        ));
    }

    let base_url = dashboard.base_url.trim();
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "dashboard.base_url must start with http:// or https://".to_string(),
        ));
    }

    if dashboard.timeout_secs == 0 || dashboard.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "dashboard.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_spark(spark: &SparkConfig, channels: &ChannelConfig) -> Result<(), ConfigError> {
    let spark_enabled = channels.allowed.iter().any(|name| name == "spark");
    if spark_enabled && spark.access_token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "spark.access_token is required while `spark` is an allowed channel".to_string(),
        ));
    }

    if !spark.base_url.starts_with("http://") && !spark.base_url.starts_with("https://") {
        return Err(ConfigError::Validation(
            "spark.base_url must start with http:// or https://".to_string(),
        ));
    }

    if spark.timeout_secs == 0 || spark.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "spark.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    Ok(())
}

fn validate_matching(matching: &MatchingConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&matching.threshold) {
        return Err(ConfigError::Validation(
            "matching.threshold must be in range 0.0..=1.0".to_string(),
        ));
    }

    if matching.distance == 0 {
        return Err(ConfigError::Validation(
            "matching.distance must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_charts(charts: &ChartConfig) -> Result<(), ConfigError> {
    if charts.hostname.trim().is_empty() {
        return Err(ConfigError::Validation("charts.hostname must not be empty".to_string()));
    }

    if charts.width == 0 || charts.height == 0 {
        return Err(ConfigError::Validation(
            "charts.width and charts.height must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_channels(channels: &ChannelConfig) -> Result<(), ConfigError> {
    if channels.allowed.is_empty() {
        return Err(ConfigError::Validation(
            "channels.allowed must list at least one channel".to_string(),
        ));
    }

    if let Some(unknown) =
        channels.allowed.iter().find(|name| !DEFAULT_ALLOWED_CHANNELS.contains(&name.as_str()))
    {
        return Err(ConfigError::Validation(format!(
            "channels.allowed contains unsupported channel `{unknown}` (expected one of {})",
            DEFAULT_ALLOWED_CHANNELS.join("|")
        )));
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

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f64(key: &str, value: &str) -> Result<f64, ConfigError> {
    value.parse::<f64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    dashboard: Option<DashboardPatch>,
    spark: Option<SparkPatch>,
    directory: Option<DirectoryPatch>,
    matching: Option<MatchingPatch>,
    charts: Option<ChartPatch>,
    channels: Option<ChannelPatch>,
    actions: Option<ActionPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DashboardPatch {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct SparkPatch {
    access_token: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct DirectoryPatch {
    excluded_organization: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MatchingPatch {
    threshold: Option<f64>,
    distance: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartPatch {
    hostname: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ChannelPatch {
    allowed: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct ActionPatch {
    dns_lookups: Option<LookupMode>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
