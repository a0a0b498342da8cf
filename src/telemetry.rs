use std::env;

use dotenv::dotenv;
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber. `RUST_LOG` filters (default `info`),
/// `APP_LOG_FORMAT=json` switches to one JSON object per line.
pub fn init_tracing() {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = env::var("APP_LOG_FORMAT").is_ok_and(|format| format.eq_ignore_ascii_case("json"));

    let builder = fmt().with_env_filter(filter).with_target(false);
    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if let Err(e) = installed {
        eprintln!("Tracing subscriber already installed: {e}");
    }
}
