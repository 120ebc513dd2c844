//! #  Database management and control.
//!
//! This module defines the contracts that storefront database *backends* must fulfil. There is one trait per
//! concern, so that the public APIs in [`crate::store_api`] only need the parts of the backend they actually use, and
//! tests can mock exactly those.
//!
//! * [`StorefrontDatabase`] covers the flows that must be atomic: checkout and stock updates, both of which also run
//!   the restock trigger.
//! * [`CatalogManagement`] reads and creates categories and goods.
//! * [`AccountManagement`] stores accounts and their profile and credential data.
//! * [`OrderManagement`] queries orders and writes status changes.
//! * [`NotificationManagement`] handles restock subscriptions and the notifications they produce.
//! * [`SessionManagement`] persists server-side sessions.
mod account_management;
mod catalog_management;
mod notification_management;
mod order_management;
mod session_management;
mod storefront_database;

mod data_objects;

pub use account_management::AccountManagement;
pub use catalog_management::CatalogManagement;
pub use data_objects::GoodQueryFilter;
pub use notification_management::NotificationManagement;
pub use order_management::OrderManagement;
pub use session_management::SessionManagement;
pub use storefront_database::StorefrontDatabase;
