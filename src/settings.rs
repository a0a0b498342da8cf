use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};
use url::Url;

use crate::constants::{
    DEFAULT_BURST_MIN_SUCCESSES, DEFAULT_BURST_WINDOW_SECS, DEFAULT_DISPATCH_TIMEOUT_SECS,
    DEFAULT_MAX_CONSECUTIVE_FAILURES, DEFAULT_PURGE_INTERVAL_SECS, DEFAULT_RATE_LIMIT_MAX_REQUESTS,
    DEFAULT_RATE_LIMIT_WINDOW_SECS, DEFAULT_SUCCESS_RETENTION_SECS, MAILGUN_API_BASE,
};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Only origin allowed to post the form cross-origin.
    #[serde(default)]
    pub frontend_url: String,

    #[serde(default)]
    pub trust_x_forwarded_for: bool,

    #[serde(default)]
    pub mailgun_api_key: String,

    #[serde(default)]
    pub mailgun_domain: String,

    #[serde(default = "default_mailgun_api_base")]
    pub mailgun_api_base: String,

    #[serde(default)]
    pub from_email: String,

    #[serde(default)]
    pub to_email: String,

    #[serde(default = "default_rate_limit_max_requests")]
    pub rate_limit_max_requests: u64,

    #[serde(default = "default_rate_limit_window_secs")]
    pub rate_limit_window_secs: u64,

    #[serde(default = "default_success_retention_secs")]
    pub success_retention_secs: u64,

    #[serde(default = "default_burst_min_successes")]
    pub burst_min_successes: usize,

    #[serde(default = "default_burst_window_secs")]
    pub burst_window_secs: u64,

    #[serde(default = "default_max_consecutive_failures")]
    pub max_consecutive_failures: u32,

    #[serde(default = "default_dispatch_timeout_secs")]
    pub dispatch_timeout_secs: u64,

    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Contact-Intake".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_mailgun_api_base() -> String {
    MAILGUN_API_BASE.to_string()
}
fn default_rate_limit_max_requests() -> u64 {
    DEFAULT_RATE_LIMIT_MAX_REQUESTS
}
fn default_rate_limit_window_secs() -> u64 {
    DEFAULT_RATE_LIMIT_WINDOW_SECS
}
fn default_success_retention_secs() -> u64 {
    DEFAULT_SUCCESS_RETENTION_SECS
}
fn default_burst_min_successes() -> usize {
    DEFAULT_BURST_MIN_SUCCESSES
}
fn default_burst_window_secs() -> u64 {
    DEFAULT_BURST_WINDOW_SECS
}
fn default_max_consecutive_failures() -> u32 {
    DEFAULT_MAX_CONSECUTIVE_FAILURES
}
fn default_dispatch_timeout_secs() -> u64 {
    DEFAULT_DISPATCH_TIMEOUT_SECS
}
fn default_purge_interval_secs() -> u64 {
    DEFAULT_PURGE_INTERVAL_SECS
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Unprefixed names kept for existing deployments
        config.mailgun_api_key = fill_or_env(config.mailgun_api_key, "MAILGUN_API_KEY")?;
        config.mailgun_domain = fill_or_env(config.mailgun_domain, "MAILGUN_DOMAIN")?;
        config.from_email = fill_or_env(config.from_email, "FROM_EMAIL")?;
        config.to_email = fill_or_env(config.to_email, "TO_EMAIL")?;
        config.frontend_url = fill_or_env(config.frontend_url, "FRONTEND_URL")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.mailgun_api_key.trim().is_empty() {
            errors.push("MAILGUN_API_KEY cannot be empty");
        }
        if self.mailgun_domain.trim().is_empty() {
            errors.push("MAILGUN_DOMAIN cannot be empty");
        }
        if self.from_email.trim().is_empty() || self.to_email.trim().is_empty() {
            errors.push("FROM_EMAIL and TO_EMAIL must be set");
        }
        if self.allowed_origin().is_none() {
            errors.push("FRONTEND_URL must be an absolute http(s) URL");
        }
        if self.rate_limit_max_requests == 0 || self.rate_limit_window_secs == 0 {
            errors.push("Rate limit requests and window must be greater than zero");
        }
        if self.success_retention_secs == 0 || self.burst_window_secs == 0 {
            errors.push("Success retention and burst window must be greater than zero");
        }
        if self.max_consecutive_failures == 0 {
            errors.push("MAX_CONSECUTIVE_FAILURES must be greater than zero");
        }
        if self.dispatch_timeout_secs == 0 {
            errors.push("DISPATCH_TIMEOUT_SECS must be greater than zero");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    /// Serialized origin of `frontend_url`, the form browsers send in `Origin`.
    pub fn allowed_origin(&self) -> Option<String> {
        let url = Url::parse(self.frontend_url.trim()).ok()?;
        match url.scheme() {
            "http" | "https" => Some(url.origin().ascii_serialization()),
            _ => None,
        }
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_secs(self.dispatch_timeout_secs)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval_secs.max(1))
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.trim().is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("frontend_url", &self.frontend_url)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .field("mailgun_api_key", &self.mailgun_api_key.redact())
            .field("mailgun_domain", &self.mailgun_domain)
            .field("mailgun_api_base", &self.mailgun_api_base)
            .field("from_email", &self.from_email)
            .field("to_email", &self.to_email)
            .field("rate_limit_max_requests", &self.rate_limit_max_requests)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field("success_retention_secs", &self.success_retention_secs)
            .field("burst_min_successes", &self.burst_min_successes)
            .field("burst_window_secs", &self.burst_window_secs)
            .field("max_consecutive_failures", &self.max_consecutive_failures)
            .field("dispatch_timeout_secs", &self.dispatch_timeout_secs)
            .field("purge_interval_secs", &self.purge_interval_secs)
            .finish()
    }
}

/// Thresholds for admission and the bot heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbusePolicy {
    pub admission_cap: u64,
    pub admission_window: Duration,
    pub success_retention: Duration,
    pub burst_min_successes: usize,
    pub burst_window: Duration,
    pub max_consecutive_failures: u32,
}

impl Default for AbusePolicy {
    fn default() -> Self {
        AbusePolicy {
            admission_cap: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            admission_window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            success_retention: Duration::from_secs(DEFAULT_SUCCESS_RETENTION_SECS),
            burst_min_successes: DEFAULT_BURST_MIN_SUCCESSES,
            burst_window: Duration::from_secs(DEFAULT_BURST_WINDOW_SECS),
            max_consecutive_failures: DEFAULT_MAX_CONSECUTIVE_FAILURES,
        }
    }
}

impl From<&AppConfig> for AbusePolicy {
    fn from(config: &AppConfig) -> Self {
        AbusePolicy {
            admission_cap: config.rate_limit_max_requests,
            admission_window: Duration::from_secs(config.rate_limit_window_secs),
            success_retention: Duration::from_secs(config.success_retention_secs),
            burst_min_successes: config.burst_min_successes,
            burst_window: Duration::from_secs(config.burst_window_secs),
            max_consecutive_failures: config.max_consecutive_failures,
        }
    }
}
