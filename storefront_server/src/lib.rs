//! # Storefront server
//! This crate hosts the HTTP side of the storefront. It is responsible for:
//! * Serving the catalog, cart, checkout, profile and notification pages as JSON documents.
//! * Keeping a server-side session per visitor (cart, signed-in account and flash messages) behind a cookie.
//! * Letting staff curate the catalog, set stock counts and move orders along.
//!
//! All the business rules live in `storefront_engine`; the handlers here translate between HTTP and the engine APIs.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/`, `/good/{id}`, `/category/{slug}`, `/categories`: The catalog. `/?q=` searches by name.
//! * `/cart`, `/add-to-cart/{id}`, `/cart/{increase|decrease|remove}/{id}`: The session cart.
//! * `/order` (GET and POST), `/order/{id}`: Checkout and order details.
//! * `/login`, `/register`, `/logout`, `/profile`, `/edit-profile`, `/change-password`: Accounts.
//! * `/notify-availability/{id}`, `/notifications`: Restock subscriptions and the notification inbox.
//! * `/admin/...`: Catalog and order management for staff accounts.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod expiry_worker;
pub mod helpers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod session;

#[cfg(test)]
mod endpoint_tests;
