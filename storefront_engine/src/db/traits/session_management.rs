use crate::{
    db_types::{Session, SessionId},
    store_api::errors::SessionApiError,
};

/// Persistence for server-side sessions.
#[allow(async_fn_in_trait)]
pub trait SessionManagement {
    /// Fetches the session if it exists and has not expired.
    async fn fetch_session(&self, id: &SessionId) -> Result<Option<Session>, SessionApiError>;

    /// Inserts the session, or replaces the stored data and expiry if it already exists.
    async fn save_session(&self, session: &Session) -> Result<(), SessionApiError>;

    async fn delete_session(&self, id: &SessionId) -> Result<(), SessionApiError>;

    /// Whether a session may stay signed in as this account. False for inactive and deleted accounts.
    async fn is_account_active(&self, account_id: i64) -> Result<bool, SessionApiError>;

    /// Deletes every expired session and returns how many were removed.
    async fn purge_expired_sessions(&self) -> Result<u64, SessionApiError>;
}
