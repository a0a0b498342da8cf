use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use zeroize::Zeroizing;

use crate::entities::notification::ContactNotification;
use crate::errors::NotificationError;
use crate::repositories::notifier::NotificationSender;
use crate::settings::AppConfig;

/// Sends contact notifications through the Mailgun messages API.
#[derive(Clone)]
pub struct MailgunSender {
    client: Client,
    api_base: String,
    domain: String,
    api_key: Zeroizing<String>,
    from: String,
    to: String,
}

impl MailgunSender {
    pub fn new(config: &AppConfig) -> Result<Self, NotificationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.dispatch_timeout_secs))
            .build()?;

        Ok(MailgunSender {
            client,
            api_base: config.mailgun_api_base.trim_end_matches('/').to_string(),
            domain: config.mailgun_domain.clone(),
            api_key: Zeroizing::new(config.mailgun_api_key.clone()),
            from: config.from_email.clone(),
            to: config.to_email.clone(),
        })
    }

    pub fn messages_url(&self) -> String {
        format!("{}/v3/{}/messages", self.api_base, self.domain)
    }
}

#[async_trait]
impl NotificationSender for MailgunSender {
    async fn send(&self, notification: &ContactNotification) -> Result<(), NotificationError> {
        if self.api_key.trim().is_empty() || self.domain.trim().is_empty() {
            return Err(NotificationError::Misconfigured(
                "Mailgun API key or domain missing".to_string(),
            ));
        }

        let params = [
            ("from", self.from.as_str()),
            ("to", self.to.as_str()),
            ("subject", notification.subject.as_str()),
            ("text", notification.text.as_str()),
        ];

        let response = self.client
            .post(self.messages_url())
            .basic_auth("api", Some(self.api_key.as_str()))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotificationError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!("Notification delivered through Mailgun");
        Ok(())
    }
}
