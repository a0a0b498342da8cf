use std::sync::Arc;

use async_trait::async_trait;

use crate::{entities::notification::ContactNotification, errors::NotificationError};

#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Delivers a formatted notification. Every transport or provider
    /// failure comes back as `Err`, never as a panic.
    async fn send(&self, notification: &ContactNotification) -> Result<(), NotificationError>;
}

#[async_trait]
impl<T> NotificationSender for Arc<T>
where
    T: NotificationSender + ?Sized,
{
    async fn send(&self, notification: &ContactNotification) -> Result<(), NotificationError> {
        (**self).send(notification).await
    }
}
