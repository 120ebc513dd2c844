use actix_http::Request;
use actix_web::{
    body::MessageBody,
    cookie::Cookie,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test,
    test::TestRequest,
    App,
};
use log::{debug, error};
use serde::Serialize;
use storefront_engine::{
    events::EventProducers,
    test_utils::prepare_env::{drop_database, prepare_test_env, random_db_path},
    SqliteDatabase,
    StorefrontDatabase,
};

use crate::{
    config::ServerConfig,
    server::{configure_app_data, configure_routes},
};

pub async fn test_db() -> SqliteDatabase {
    prepare_test_env(&random_db_path()).await
}

pub async fn tear_down(mut db: SqliteDatabase) {
    let url = db.url().to_string();
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    drop_database(&url).await;
}

/// A request/response pair as seen by a browser.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or_else(|e| panic!("Response is not JSON ({e}): {}", self.body))
    }

    pub fn assert_redirect(&self, location: &str) {
        assert_eq!(self.status, StatusCode::SEE_OTHER, "Expected a redirect. Body: {}", self.body);
        assert_eq!(self.location.as_deref(), Some(location));
    }
}

/// Drives the full app against a real database, carrying the session cookie from one request to the next like a
/// browser would.
pub struct Browser<S> {
    service: S,
    cookie: Option<Cookie<'static>>,
}

pub async fn browser(
    db: SqliteDatabase,
    config: ServerConfig,
) -> Browser<impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>> {
    let app = App::new()
        .configure(move |cfg| configure_app_data(cfg, db, EventProducers::default(), &config))
        .configure(configure_routes::<SqliteDatabase>);
    let service = test::init_service(app).await;
    Browser { service, cookie: None }
}

impl<S> Browser<S>
where S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>
{
    pub async fn get(&mut self, path: &str) -> TestResponse {
        self.send(TestRequest::get().uri(path)).await
    }

    pub async fn post_form<T: Serialize>(&mut self, path: &str, form: &T) -> TestResponse {
        self.send(TestRequest::post().uri(path).set_form(form)).await
    }

    pub async fn post_json<T: Serialize>(&mut self, path: &str, body: &T) -> TestResponse {
        self.send(TestRequest::post().uri(path).set_json(body)).await
    }

    pub fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    pub fn forget_session(&mut self) {
        self.cookie = None;
    }

    async fn send(&mut self, mut req: TestRequest) -> TestResponse {
        if let Some(cookie) = &self.cookie {
            req = req.cookie(cookie.clone());
        }
        let res = match test::try_call_service(&self.service, req.to_request()).await {
            Ok(res) => res.into_parts().1,
            Err(e) => e.error_response(),
        };
        for cookie in res.cookies() {
            if cookie.value().is_empty() {
                self.cookie = None;
            } else {
                self.cookie = Some(cookie.into_owned());
            }
        }
        let status = res.status();
        let location = res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).map(String::from);
        let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap_or_default()).into_owned();
        debug!("🚀️ {status} {location:?} {body}");
        TestResponse { status, location, body }
    }
}
