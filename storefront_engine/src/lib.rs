//! Storefront Engine
//!
//! The storefront engine holds the core logic of a small web shop: the catalog, a session-held cart, checkout with
//! stock reservation, user accounts, and restock notifications. It is independent of any web framework.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@db`]). SQLite is the supported backend. You should never need to access
//!    the database directly. Instead, use the public API provided by the engine. The exception is the data types used
//!    in the database. These are defined in the `db_types` module and are public.
//! 2. The storefront public API ([`mod@store_api`]). This provides the public-facing functionality of the engine.
//!    Backends need to implement the traits in [`mod@db::traits`] in order to act as a backend for the storefront
//!    server.
//!
//! The engine also emits events that can be subscribed to, for example when an order is created or a good is
//! restocked. See [`mod@events`].
pub mod cart;
pub mod db;
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod store_api;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

#[cfg(feature = "sqlite")]
pub use db::sqlite::{SqliteDatabase, SqliteDatabaseError};
pub use db::traits::{
    AccountManagement,
    CatalogManagement,
    GoodQueryFilter,
    NotificationManagement,
    OrderManagement,
    SessionManagement,
    StorefrontDatabase,
};
pub use store_api::{
    account_objects,
    accounts_api::AccountApi,
    auth_api::AuthApi,
    cart_api::CartApi,
    catalog_api::CatalogApi,
    catalog_objects,
    errors::{
        AccountApiError,
        AuthApiError,
        CatalogApiError,
        CheckoutError,
        NotificationApiError,
        OrderFlowError,
        SessionApiError,
    },
    notification_api::NotificationApi,
    order_objects,
    session_api::SessionApi,
    store_flow_api::StoreFlowApi,
};
