//! # Storefront engine public API
//!
//! The `store_api` module exposes the programmatic API for the storefront. The API is modular, so that clients can
//! pick the functionality they need, and each piece only asks for the backend traits it actually uses.
//!
//! * [`catalog_api`] browses, searches and curates categories and goods.
//! * [`cart_api`] applies cart operations that need to look at the catalog.
//! * [`store_flow_api`] is the primary API for flows that change stock: checkout, restocking and order status changes.
//! * [`accounts_api`] reads accounts, profiles and order history.
//! * [`auth_api`] handles registration, login and password changes.
//! * [`notification_api`] manages restock subscriptions and the notification inbox.
//! * [`session_api`] loads and stores sessions.
//!
//! # API usage
//!
//! Every API is created by supplying a database backend that implements the traits it needs:
//!
//! ```rust,ignore
//! use storefront_engine::{CatalogApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/storefront.db", 25).await?;
//! // SqliteDatabase implements CatalogManagement
//! let api = CatalogApi::new(db);
//! let chips = api.search("chip").await?;
//! ```

pub mod account_objects;
pub mod accounts_api;
pub mod auth_api;
pub mod cart_api;
pub mod catalog_api;
pub mod catalog_objects;
pub mod errors;
pub mod notification_api;
pub mod order_objects;
pub mod session_api;
pub mod store_flow_api;
