use chrono::{DateTime, FixedOffset, Utc};

const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S %Z";
/// Central Mexico, no daylight saving.
const CST_OFFSET_SECS: i32 = -6 * 3600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerTimestamps {
    pub utc: String,
    pub cst: String,
}

pub fn server_timestamps(now: DateTime<Utc>) -> ServerTimestamps {
    let utc = now.format(TIMESTAMP_FORMAT).to_string();
    let cst = match FixedOffset::east_opt(CST_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string(),
        None => utc.clone(),
    };
    ServerTimestamps { utc, cst }
}
