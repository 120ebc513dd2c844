//! Access control for the admin routes.
//!
//! The middleware loads the session behind the request's cookie and lets the request through only if it belongs to an
//! active staff account. That account is placed in the request extensions, so handlers can take it as
//! `web::ReqData<Account>`. Anonymous requests are sent to the login page; everyone else gets a 403.
use std::{future::Future, marker::PhantomData, pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorInternalServerError,
    web,
    Error,
    HttpMessage,
};
use futures::future::{ok, Ready};
use log::*;
use storefront_engine::{AccountApi, AccountManagement, SessionManagement};

use crate::{errors::ServerError, helpers::request_target, session::SessionStore};

pub struct StaffOnlyFactory<B> {
    _backend: PhantomData<fn() -> B>,
}

impl<B> StaffOnlyFactory<B> {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { _backend: PhantomData }
    }
}

impl<S, Body, B> Transform<S, ServiceRequest> for StaffOnlyFactory<B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<Body>, Error = Error> + 'static,
    S::Future: 'static,
    Body: 'static,
    B: SessionManagement + AccountManagement + 'static,
{
    type Response = ServiceResponse<Body>;
    type Error = Error;
    type Transform = StaffOnlyService<S, B>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(StaffOnlyService { service: Rc::new(service), _backend: PhantomData })
    }
}

pub struct StaffOnlyService<S, B> {
    service: Rc<S>,
    _backend: PhantomData<fn() -> B>,
}

impl<S, Body, B> Service<ServiceRequest> for StaffOnlyService<S, B>
where
    S: Service<ServiceRequest, Response = ServiceResponse<Body>, Error = Error> + 'static,
    S::Future: 'static,
    Body: 'static,
    B: SessionManagement + AccountManagement + 'static,
{
    type Response = ServiceResponse<Body>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let store = req.app_data::<web::Data<SessionStore<B>>>().cloned().ok_or_else(|| {
                warn!("🔑️ No session store has been configured for the admin routes");
                ErrorInternalServerError("Session store is not configured")
            })?;
            let accounts = req.app_data::<web::Data<AccountApi<B>>>().cloned().ok_or_else(|| {
                warn!("🔑️ No account api has been configured for the admin routes");
                ErrorInternalServerError("Account api is not configured")
            })?;
            let session = store.load(req.request()).await?;
            let Some(account_id) = session.account_id() else {
                return Err(ServerError::LoginRequired(request_target(req.request())).into());
            };
            match accounts.account_by_id(account_id).await.map_err(ServerError::from)? {
                Some(account) if account.is_staff && account.is_active => {
                    trace!("🔑️ Staff account #{account_id} granted access to {}", req.path());
                    req.extensions_mut().insert(account);
                    service.call(req).await
                },
                _ => {
                    info!("🔑️ Account #{account_id} was refused access to {}", req.path());
                    Err(ServerError::InsufficientPermissions("This page is for staff only.".into()).into())
                },
            }
        })
    }
}
