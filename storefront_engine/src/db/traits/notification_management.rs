use crate::{db_types::Notification, store_api::errors::NotificationApiError};

/// Restock subscriptions and the notifications they produce.
#[allow(async_fn_in_trait)]
pub trait NotificationManagement {
    /// Adds the account to the good's subscribers. Returns `false` if it was already subscribed.
    async fn subscribe(&self, account_id: i64, good_id: i64) -> Result<bool, NotificationApiError>;

    async fn is_subscribed(&self, account_id: i64, good_id: i64) -> Result<bool, NotificationApiError>;

    /// Ids of the accounts subscribed to the good.
    async fn fetch_subscribers(&self, good_id: i64) -> Result<Vec<i64>, NotificationApiError>;

    /// The account's notifications, newest first.
    async fn fetch_notifications_for_account(&self, account_id: i64)
        -> Result<Vec<Notification>, NotificationApiError>;

    async fn count_unread_notifications(&self, account_id: i64) -> Result<i64, NotificationApiError>;

    /// Marks one notification as read. Returns `false` if the account has no notification with that id.
    async fn mark_notification_read(&self, account_id: i64, notification_id: i64)
        -> Result<bool, NotificationApiError>;

    /// Marks every unread notification of the account as read and returns how many there were.
    async fn mark_all_notifications_read(&self, account_id: i64) -> Result<u64, NotificationApiError>;
}
