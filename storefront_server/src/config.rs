use std::{env, str::FromStr};

use chrono::Duration;
use log::*;
use storefront_common::{helpers::parse_boolean_flag, Secret};
use storefront_engine::db_types::RestockPolicy;

const DEFAULT_STOREFRONT_HOST: &str = "127.0.0.1";
const DEFAULT_STOREFRONT_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/storefront.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_SESSION_COOKIE: &str = "storefront_session";
/// Two weeks.
const DEFAULT_SESSION_TTL_HOURS: i64 = 336;
const DEFAULT_EVENT_BUFFER: usize = 25;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub max_connections: u32,
    pub session: SessionOptions,
    /// Which stock writes notify a good's subscribers.
    pub restock_policy: RestockPolicy,
    /// Capacity of each event hook's channel.
    pub event_buffer: usize,
    /// If set, a staff account with these credentials is created at start-up (if it does not exist yet).
    pub admin: Option<AdminCredentials>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_STOREFRONT_HOST.to_string(),
            port: DEFAULT_STOREFRONT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            session: SessionOptions::default(),
            restock_policy: RestockPolicy::default(),
            event_buffer: DEFAULT_EVENT_BUFFER,
            admin: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AdminCredentials {
    pub username: String,
    pub password: Secret<String>,
}

//-------------------------------------------------  SessionOptions  ---------------------------------------------------
/// How the session cookie is issued. Handed to the route handlers as app data.
#[derive(Clone, Debug)]
pub struct SessionOptions {
    pub cookie_name: String,
    /// Mark the cookie `Secure`. Turn this on whenever the server sits behind TLS.
    pub secure: bool,
    pub ttl: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
            secure: false,
            ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("STOREFRONT_HOST").ok().unwrap_or_else(|| DEFAULT_STOREFRONT_HOST.into());
        let port = parse_env("STOREFRONT_PORT", DEFAULT_STOREFRONT_PORT);
        let database_url = env::var("STOREFRONT_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ STOREFRONT_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let max_connections = parse_env("STOREFRONT_DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS);
        let session = SessionOptions::from_env_or_default();
        let restock_policy = parse_env("STOREFRONT_RESTOCK_POLICY", RestockPolicy::default());
        info!("🪛️ Restock notifications policy: {restock_policy:?}");
        let event_buffer = parse_env("STOREFRONT_EVENT_BUFFER", DEFAULT_EVENT_BUFFER);
        let admin = AdminCredentials::from_env();
        Self { host, port, database_url, max_connections, session, restock_policy, event_buffer, admin }
    }
}

impl SessionOptions {
    pub fn from_env_or_default() -> Self {
        let cookie_name = env::var("STOREFRONT_SESSION_COOKIE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string());
        let ttl_hours = parse_env("STOREFRONT_SESSION_TTL_HOURS", DEFAULT_SESSION_TTL_HOURS);
        let ttl = if ttl_hours > 0 {
            Duration::hours(ttl_hours)
        } else {
            warn!("🪛️ STOREFRONT_SESSION_TTL_HOURS must be positive. Using {DEFAULT_SESSION_TTL_HOURS} hrs.");
            Duration::hours(DEFAULT_SESSION_TTL_HOURS)
        };
        let secure = parse_boolean_flag(env::var("STOREFRONT_SECURE_COOKIES").ok(), false);
        if !secure {
            info!("🪛️ Session cookies are not marked Secure. Set STOREFRONT_SECURE_COOKIES=1 behind TLS.");
        }
        Self { cookie_name, secure, ttl }
    }
}

impl AdminCredentials {
    pub fn from_env() -> Option<Self> {
        let username = env::var("STOREFRONT_ADMIN_USERNAME").ok().filter(|s| !s.trim().is_empty())?;
        match env::var("STOREFRONT_ADMIN_PASSWORD") {
            Ok(password) if !password.is_empty() => {
                Some(Self { username: username.trim().to_string(), password: Secret::new(password) })
            },
            _ => {
                warn!(
                    "🪛️ STOREFRONT_ADMIN_USERNAME is set, but STOREFRONT_ADMIN_PASSWORD is not. No staff account will \
                     be created."
                );
                None
            },
        }
    }
}

/// Reads and parses an environment variable, logging and falling back to `default` if it is missing or invalid.
fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Debug,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default:?}, instead.");
            default
        }),
        Err(_) => {
            debug!("🪛️ {name} is not set. Using the default, {default:?}.");
            default
        },
    }
}
