use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::{CatalogManagement, NotificationManagement},
    store_api::{
        account_objects::{NotificationsResult, SubscriptionResult},
        errors::NotificationApiError,
    },
};

/// Restock subscriptions and the notification inbox.
///
/// Notifications themselves are created by the restock trigger that runs inside every stock write (see
/// [`crate::StoreFlowApi::update_stock`]), not by this API.
pub struct NotificationApi<B> {
    db: B,
}

impl<B: Debug> Debug for NotificationApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NotificationApi ({:?})", self.db)
    }
}

impl<B> NotificationApi<B>
where B: NotificationManagement + CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Subscribes the account to restock notifications for the good.
    pub async fn subscribe(&self, account_id: i64, good_id: i64) -> Result<SubscriptionResult, NotificationApiError> {
        let good = self.db.fetch_good(good_id).await?.ok_or(NotificationApiError::GoodNotFound(good_id))?;
        let newly_subscribed = self.db.subscribe(account_id, good_id).await?;
        if newly_subscribed {
            info!("🔔️ Account #{account_id} subscribed to good #{good_id}");
        } else {
            debug!("🔔️ Account #{account_id} was already subscribed to good #{good_id}");
        }
        Ok(SubscriptionResult { good, newly_subscribed })
    }

    pub async fn is_subscribed(&self, account_id: i64, good_id: i64) -> Result<bool, NotificationApiError> {
        self.db.is_subscribed(account_id, good_id).await
    }

    /// The account's notifications, newest first, with the number still unread.
    pub async fn notifications_for_account(&self, account_id: i64) -> Result<NotificationsResult, NotificationApiError> {
        let notifications = self.db.fetch_notifications_for_account(account_id).await?;
        let unread_count = self.db.count_unread_notifications(account_id).await?;
        Ok(NotificationsResult { unread_count, notifications })
    }

    pub async fn unread_count(&self, account_id: i64) -> Result<i64, NotificationApiError> {
        self.db.count_unread_notifications(account_id).await
    }

    pub async fn mark_read(&self, account_id: i64, notification_id: i64) -> Result<(), NotificationApiError> {
        if self.db.mark_notification_read(account_id, notification_id).await? {
            Ok(())
        } else {
            Err(NotificationApiError::NotificationNotFound(notification_id))
        }
    }

    pub async fn mark_all_read(&self, account_id: i64) -> Result<u64, NotificationApiError> {
        self.db.mark_all_notifications_read(account_id).await
    }
}
