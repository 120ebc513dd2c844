use log::{debug, info};
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{Good, Notification, NotificationStatus, RestockPolicy},
    store_api::order_objects::Restock,
};

const NOTIFICATION_COLUMNS: &str = "id, account_id, good_id, message, status, created_at, updated_at";

pub fn restock_message(good_name: &str) -> String {
    format!("Good '{good_name}' is available again!")
}

/// Adds the account to the good's subscribers. Returns `false` if it was already subscribed.
pub async fn subscribe(account_id: i64, good_id: i64, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query("INSERT INTO good_subscribers (good_id, account_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(good_id)
        .bind(account_id)
        .execute(conn)
        .await
        .map_err(|e| {
            SqliteDatabaseError::classify(
                e,
                || SqliteDatabaseError::QueryError("Duplicate subscription".into()),
                || SqliteDatabaseError::GoodNotFound(good_id),
            )
        })?;
    Ok(result.rows_affected() == 1)
}

pub async fn is_subscribed(account_id: i64, good_id: i64, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM good_subscribers WHERE good_id = $1 AND account_id = $2")
        .bind(good_id)
        .bind(account_id)
        .fetch_one(conn)
        .await?;
    Ok(count > 0)
}

pub async fn fetch_subscribers(good_id: i64, conn: &mut SqliteConnection) -> Result<Vec<i64>, SqliteDatabaseError> {
    let ids = sqlx::query_scalar("SELECT account_id FROM good_subscribers WHERE good_id = $1 ORDER BY account_id ASC")
        .bind(good_id)
        .fetch_all(conn)
        .await?;
    Ok(ids)
}

pub async fn insert_notification(
    account_id: i64,
    good_id: Option<i64>,
    message: &str,
    conn: &mut SqliteConnection,
) -> Result<Notification, SqliteDatabaseError> {
    let notification = sqlx::query_as::<_, Notification>(&format!(
        "INSERT INTO notifications (account_id, good_id, message) VALUES ($1, $2, $3) RETURNING {NOTIFICATION_COLUMNS}"
    ))
    .bind(account_id)
    .bind(good_id)
    .bind(message)
    .fetch_one(conn)
    .await?;
    Ok(notification)
}

/// The restock trigger. If going from `previous_count` to the good's current count is a restock under `policy`, one
/// unread notification is created for every subscriber. Call it in the same transaction as the stock write.
pub async fn on_restock(
    good: &Good,
    previous_count: i64,
    policy: RestockPolicy,
    conn: &mut SqliteConnection,
) -> Result<Option<Restock>, SqliteDatabaseError> {
    if !policy.is_restock(previous_count, good.count) {
        return Ok(None);
    }
    let subscribers = fetch_subscribers(good.id, &mut *conn).await?;
    let message = restock_message(&good.name);
    let mut notifications = Vec::with_capacity(subscribers.len());
    for account_id in subscribers {
        let n = insert_notification(account_id, Some(good.id), &message, &mut *conn).await?;
        notifications.push(n);
    }
    info!(
        "🔔️ Good #{} restocked ({previous_count} -> {}). {} subscribers notified.",
        good.id,
        good.count,
        notifications.len()
    );
    Ok(Some(Restock { good: good.clone(), previous_count, notifications }))
}

/// The account's notifications, newest first.
pub async fn fetch_notifications_for_account(
    account_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Notification>, SqliteDatabaseError> {
    let notifications = sqlx::query_as::<_, Notification>(&format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE account_id = $1 ORDER BY created_at DESC, id DESC"
    ))
    .bind(account_id)
    .fetch_all(conn)
    .await?;
    Ok(notifications)
}

pub async fn count_unread(account_id: i64, conn: &mut SqliteConnection) -> Result<i64, SqliteDatabaseError> {
    let count = sqlx::query_scalar("SELECT COUNT(*) FROM notifications WHERE account_id = $1 AND status = $2")
        .bind(account_id)
        .bind(NotificationStatus::Unread)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

/// Marks the notification as read if it belongs to the account. Notifications that are already read still count as
/// found.
pub async fn mark_read(
    account_id: i64,
    notification_id: i64,
    conn: &mut SqliteConnection,
) -> Result<bool, SqliteDatabaseError> {
    let result = sqlx::query(
        "UPDATE notifications SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 AND account_id = $3",
    )
    .bind(NotificationStatus::Read)
    .bind(notification_id)
    .bind(account_id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn mark_all_read(account_id: i64, conn: &mut SqliteConnection) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query(
        "UPDATE notifications SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE account_id = $2 AND status = $3",
    )
    .bind(NotificationStatus::Read)
    .bind(account_id)
    .bind(NotificationStatus::Unread)
    .execute(conn)
    .await?;
    debug!("🔔️ {} notifications marked as read for account #{account_id}", result.rows_affected());
    Ok(result.rows_affected())
}
