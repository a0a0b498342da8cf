use std::sync::Arc;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod telemetry;

pub use domain::{entities, use_cases, validation};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{limiter, mailer, utils};

use repositories::{clock::{Clock, SystemClock}, notifier::NotificationSender};
use settings::AbusePolicy;
use use_cases::{abuse::AbuseGuard, contact::ContactSubmissionHandler};

pub struct AppState {
    pub contact_handler: AppContactHandler,
    pub trust_x_forwarded_for: bool,
}

pub type AppContactHandler = ContactSubmissionHandler<Arc<dyn NotificationSender>>;

impl AppState {
    pub fn new(config: &settings::AppConfig, sender: Arc<dyn NotificationSender>) -> Self {
        Self::with_clock(config, sender, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: &settings::AppConfig,
        sender: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let guard = Arc::new(AbuseGuard::new(AbusePolicy::from(config), clock));
        let contact_handler = ContactSubmissionHandler::new(sender, guard, config.dispatch_timeout());

        AppState {
            contact_handler,
            trust_x_forwarded_for: config.trust_x_forwarded_for,
        }
    }

    pub fn guard(&self) -> &Arc<AbuseGuard> {
        self.contact_handler.guard()
    }
}
