use std::fmt::Debug;

use chrono::{Duration, Utc};
use log::*;

use crate::{
    db::traits::SessionManagement,
    db_types::{Session, SessionId},
    store_api::errors::SessionApiError,
};

/// Loads and stores per-visitor sessions.
///
/// A session is loaded once at the start of a request, changed in memory, and written back with [`Self::save`] at the
/// end. Every save pushes the expiry `ttl` into the future.
pub struct SessionApi<B> {
    db: B,
    ttl: Duration,
}

impl<B: Debug> Debug for SessionApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SessionApi ({:?}, ttl {})", self.db, self.ttl)
    }
}

impl<B> SessionApi<B>
where B: SessionManagement
{
    pub fn new(db: B, ttl: Duration) -> Self {
        Self { db, ttl }
    }

    /// A fresh, empty session. It is not stored until it is saved.
    pub fn new_session(&self) -> Session {
        Session::new(SessionId::random(), Utc::now() + self.ttl)
    }

    /// Fetches the session if it exists and has not expired. A session signed in as an account that has since been
    /// deactivated or deleted comes back signed out, with the rest of its data intact.
    pub async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionApiError> {
        let Some(mut session) = self.db.fetch_session(id).await? else {
            return Ok(None);
        };
        if let Some(account_id) = session.data.account_id {
            if !self.db.is_account_active(account_id).await? {
                info!("🍪️ Account #{account_id} is no longer active. Signing session {} out.", session.id);
                session.data.account_id = None;
            }
        }
        Ok(Some(session))
    }

    /// Loads the session for the given cookie value, or starts a new one if there is none.
    pub async fn load_or_new(&self, id: Option<SessionId>) -> Result<Session, SessionApiError> {
        let existing = match id {
            Some(id) => self.load(&id).await?,
            None => None,
        };
        Ok(existing.unwrap_or_else(|| {
            let session = self.new_session();
            trace!("🍪️ Starting new session {}", session.id);
            session
        }))
    }

    pub async fn save(&self, session: &mut Session) -> Result<(), SessionApiError> {
        session.expires_at = Utc::now() + self.ttl;
        self.db.save_session(session).await
    }

    /// Gives the session a new id, keeping its data, and deletes the old record. Call this when the user behind the
    /// session changes, e.g. on login.
    pub async fn rotate(&self, session: &mut Session) -> Result<(), SessionApiError> {
        let old = std::mem::replace(&mut session.id, SessionId::random());
        self.db.delete_session(&old).await?;
        debug!("🍪️ Session {old} rotated to {}", session.id);
        Ok(())
    }

    pub async fn destroy(&self, id: &SessionId) -> Result<(), SessionApiError> {
        self.db.delete_session(id).await
    }

    pub async fn purge_expired(&self) -> Result<u64, SessionApiError> {
        self.db.purge_expired_sessions().await
    }
}
