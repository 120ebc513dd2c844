use actix_web::{http::header, HttpRequest, HttpResponse};
use log::trace;

/// The login page, with `next` set so that a successful login lands back on `next`.
pub fn login_url(next: &str) -> String {
    format!("/login?next={}", urlencoding::encode(next))
}

/// Only same-site paths are followed after login. Anything else (absolute URLs, protocol-relative `//host` paths)
/// falls back to the home page.
pub fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path.to_string(),
        Some(path) => {
            trace!("💻️ Ignoring unsafe redirect target '{path}'");
            "/".to_string()
        },
        None => "/".to_string(),
    }
}

/// The path and query of the request, for use as a `next` target.
pub fn request_target(req: &HttpRequest) -> String {
    let uri = req.uri();
    uri.path_and_query().map(|pq| pq.as_str().to_string()).unwrap_or_else(|| uri.path().to_string())
}

/// A `303 See Other` to `location`.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther().insert_header((header::LOCATION, location)).finish()
}
