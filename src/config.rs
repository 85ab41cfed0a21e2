use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::scheduler::{DEFAULT_STATS_INTERVAL, StatsSchedule};

/// Agent configuration: optional TOML file, then environment overrides.
/// Built once at startup and passed by value to whatever needs it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub collection: CollectionConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 80,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    #[default]
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: LogLevel,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// "@every <duration>" (Go duration text such as 30s, 1.5m, 1h30m; units ns,
    /// us, ms, s, m, h) or a cron expression with seconds.
    pub stats_interval: String,
    /// Max stats fetches in flight per cycle. Unset = one per container.
    pub max_concurrent_fetches: Option<usize>,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            stats_interval: DEFAULT_STATS_INTERVAL.into(),
            max_concurrent_fetches: None,
        }
    }
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("log format must be \"text\" or \"json\", got {:?}", other),
        }
    }
}

impl FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            other => anyhow::bail!("log level must be \"debug\" or \"info\", got {:?}", other),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        })
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
        })
    }
}

/// Upper-case name first, then the lower-case spelling.
fn lookup_either(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .or_else(|| lookup(&name.to_lowercase()))
        .filter(|v| !v.is_empty())
}

impl AppConfig {
    /// File from `CONFIG_FILE` (or `config.toml` if present), then process environment.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var("CONFIG_FILE") {
            Ok(path) => Self::from_file(&path)?,
            Err(_) if std::path::Path::new("config.toml").exists() => {
                Self::from_file("config.toml")?
            }
            Err(_) => AppConfig::default(),
        };
        config.apply_env(|k| std::env::var(k).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file without env overrides or validation.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path, e))?;
        Ok(toml::from_str(&s)?)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from environment-style variables resolved through `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(v) = lookup_either(&lookup, "LOG_FORMAT") {
            self.logging.format = v.parse()?;
        }
        if let Some(v) = lookup_either(&lookup, "LOG_LEVEL") {
            self.logging.level = v.parse()?;
        }
        if let Some(v) = lookup_either(&lookup, "STATS_INTERVAL") {
            self.collection.stats_interval = v;
        }
        if let Some(v) = lookup_either(&lookup, "HTTP_HOST") {
            self.server.host = v;
        }
        if let Some(v) = lookup_either(&lookup, "HTTP_PORT") {
            self.server.port = v
                .parse()
                .map_err(|e| anyhow::anyhow!("HTTP_PORT {:?}: {}", v, e))?;
        }
        if let Some(v) = lookup_either(&lookup, "MAX_CONCURRENT_FETCHES") {
            self.collection.max_concurrent_fetches = Some(
                v.parse()
                    .map_err(|e| anyhow::anyhow!("MAX_CONCURRENT_FETCHES {:?}: {}", v, e))?,
            );
        }
        Ok(())
    }

    /// The parsed stats schedule. An unparseable expression is a startup error.
    pub fn schedule(&self) -> anyhow::Result<StatsSchedule> {
        StatsSchedule::parse(&self.collection.stats_interval)
            .map_err(|e| anyhow::anyhow!("collection.stats_interval: {}", e))
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        self.schedule()?;
        if let Some(n) = self.collection.max_concurrent_fetches {
            anyhow::ensure!(
                n > 0,
                "collection.max_concurrent_fetches must be > 0, got {}",
                n
            );
        }
        Ok(())
    }
}
