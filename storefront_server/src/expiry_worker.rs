use chrono::Duration;
use log::*;
use storefront_engine::{SessionApi, SqliteDatabase};
use tokio::task::JoinHandle;

const PURGE_INTERVAL: std::time::Duration = std::time::Duration::from_secs(60);

/// Starts the session expiry worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// Expired sessions are never handed out (see [`SessionApi::load`]), so this only keeps the table from growing.
pub fn start_expiry_worker(db: SqliteDatabase, session_ttl: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(PURGE_INTERVAL);
        let api = SessionApi::new(db, session_ttl);
        info!("🕰️ Session expiry worker started");
        loop {
            timer.tick().await;
            trace!("🕰️ Running session expiry job");
            match api.purge_expired().await {
                Ok(0) => {},
                Ok(count) => info!("🕰️ {count} expired sessions removed"),
                Err(e) => error!("🕰️ Error running session expiry job: {e}"),
            }
        }
    })
}
