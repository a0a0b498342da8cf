/// Placeholder for client metadata the browser did not report.
pub const NOT_AVAILABLE: &str = "No disponible";

pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u64 = 10;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 600;

pub const DEFAULT_SUCCESS_RETENTION_SECS: u64 = 600;
pub const DEFAULT_BURST_MIN_SUCCESSES: usize = 3;
pub const DEFAULT_BURST_WINDOW_SECS: u64 = 30;

pub const DEFAULT_MAX_CONSECUTIVE_FAILURES: u32 = 3;
pub const DEFAULT_DISPATCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PURGE_INTERVAL_SECS: u64 = 60;

pub const MAILGUN_API_BASE: &str = "https://api.mailgun.net";
