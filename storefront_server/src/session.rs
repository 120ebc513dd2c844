//! Cookie-backed sessions.
//!
//! Each request loads its session once through a [`SessionStore`], works on it as a plain value, and hands it back
//! together with the response. The session is only written (and the cookie only set) if it was already stored or now
//! holds something, so anonymous browsing does not create session records.
use std::ops::{Deref, DerefMut};

use actix_web::{
    cookie::{time::Duration as CookieDuration, Cookie, SameSite},
    HttpRequest,
    HttpResponse,
};
use log::*;
use storefront_engine::{
    db_types::{Session, SessionData, SessionId},
    SessionApi,
    SessionManagement,
};

use crate::{config::SessionOptions, errors::ServerError, helpers::request_target};

pub struct SessionStore<B> {
    api: SessionApi<B>,
    options: SessionOptions,
}

/// The session attached to the request being handled.
#[derive(Debug)]
pub struct RequestSession {
    session: Session,
    stored: bool,
}

impl Deref for RequestSession {
    type Target = Session;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl DerefMut for RequestSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}

impl RequestSession {
    /// The signed-in account, or [`ServerError::LoginRequired`] pointing back at this request.
    pub fn require_login(&self, req: &HttpRequest) -> Result<i64, ServerError> {
        self.session.account_id().ok_or_else(|| {
            trace!("🍪️ Anonymous request for {}", req.path());
            ServerError::LoginRequired(request_target(req))
        })
    }

    fn needs_saving(&self) -> bool {
        self.stored || self.session.data.0 != SessionData::default()
    }
}

impl<B> SessionStore<B> {
    pub fn new(api: SessionApi<B>, options: SessionOptions) -> Self {
        Self { api, options }
    }

    pub fn api(&self) -> &SessionApi<B> {
        &self.api
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build(self.options.cookie_name.clone(), value)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.options.secure)
            .max_age(CookieDuration::seconds(self.options.ttl.num_seconds()))
            .finish()
    }
}

impl<B> SessionStore<B>
where B: SessionManagement
{
    /// Loads the session named by the request's cookie. A missing, unknown or expired cookie gives a new, empty
    /// session.
    pub async fn load(&self, req: &HttpRequest) -> Result<RequestSession, ServerError> {
        let id = req.cookie(&self.options.cookie_name).map(|c| SessionId::from(c.value().to_string()));
        if let Some(id) = &id {
            if let Some(session) = self.api.load(id).await? {
                trace!("🍪️ Loaded session {}", session.id);
                return Ok(RequestSession { session, stored: true });
            }
            debug!("🍪️ Session {id} is unknown or has expired");
        }
        Ok(RequestSession { session: self.api.new_session(), stored: false })
    }

    /// Writes the session back and attaches the cookie to `res`.
    pub async fn respond(
        &self,
        mut session: RequestSession,
        mut res: HttpResponse,
    ) -> Result<HttpResponse, ServerError> {
        if !session.needs_saving() {
            return Ok(res);
        }
        self.api.save(&mut session.session).await?;
        res.add_cookie(&self.cookie(session.session.id.as_str().to_string()))
            .map_err(|e| ServerError::Unspecified(format!("Could not set the session cookie. {e}")))?;
        Ok(res)
    }

    /// Signs the account in. The session gets a new id, but keeps its cart.
    pub async fn log_in(&self, session: &mut RequestSession, account_id: i64) -> Result<(), ServerError> {
        if session.stored {
            self.api.rotate(&mut session.session).await?;
        }
        session.session.data.account_id = Some(account_id);
        debug!("🍪️ Account #{account_id} signed in on session {}", session.session.id);
        Ok(())
    }

    /// Deletes the session and tells the browser to drop the cookie.
    pub async fn destroy(&self, session: RequestSession, mut res: HttpResponse) -> Result<HttpResponse, ServerError> {
        if session.stored {
            self.api.destroy(&session.session.id).await?;
        }
        res.add_removal_cookie(&self.cookie(String::new()))
            .map_err(|e| ServerError::Unspecified(format!("Could not clear the session cookie. {e}")))?;
        debug!("🍪️ Session {} destroyed", session.session.id);
        Ok(res)
    }
}
