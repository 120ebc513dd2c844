use thiserror::Error;

use crate::{db_types::OrderStatusType, helpers::{CredentialError, ValidationErrors}, store_api::order_objects::StockAdjustment};

#[derive(Debug, Clone, Error)]
pub enum CatalogApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Good not found: {0}")]
    GoodNotFound(i64),
    #[error("No good has the slug '{0}'")]
    GoodSlugNotFound(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("The slug '{0}' is already in use")]
    DuplicateSlug(String),
    #[error("'{0}' is not a valid slug. Use lowercase letters, digits, hyphens and underscores only.")]
    InvalidSlug(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Your cart is empty!")]
    EmptyCart,
    #[error("A user with the username '{0}' already exists.")]
    DuplicateUsername(String),
    #[error("Account not found: {0}")]
    AccountNotFound(i64),
    #[error("Good not found: {0}")]
    GoodNotFound(i64),
    #[error("None of the goods in the cart are in stock.")]
    OutOfStock(Vec<StockAdjustment>),
    #[error("Invalid contact details: {0}")]
    Validation(ValidationErrors),
}

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Account not found: {0}")]
    AccountNotFound(i64),
    #[error("Order not found: {0}")]
    OrderNotFound(i64),
    #[error("A user with the username '{0}' already exists.")]
    DuplicateUsername(String),
    #[error("Invalid profile: {0}")]
    Validation(ValidationErrors),
}

#[derive(Debug, Clone, Error)]
pub enum AuthApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Please enter a correct username and password.")]
    InvalidCredentials,
    #[error("This account is inactive.")]
    AccountInactive,
    #[error("Account not found: {0}")]
    AccountNotFound(i64),
    #[error("A user with the username '{0}' already exists.")]
    DuplicateUsername(String),
    #[error("Invalid credentials: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Hashing(#[from] CredentialError),
}

#[derive(Debug, Clone, Error)]
pub enum NotificationApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Account not found: {0}")]
    AccountNotFound(i64),
    #[error("Good not found: {0}")]
    GoodNotFound(i64),
    #[error("Notification not found: {0}")]
    NotificationNotFound(i64),
}

#[derive(Debug, Clone, Error)]
pub enum OrderFlowError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Order not found: {0}")]
    OrderNotFound(i64),
    #[error("An order cannot go from {from} to {to}")]
    ForbiddenStatusChange { from: OrderStatusType, to: OrderStatusType },
}

#[derive(Debug, Clone, Error)]
pub enum SessionApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<OrderFlowError> for AccountApiError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::OrderNotFound(id) => Self::OrderNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<CatalogApiError> for NotificationApiError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::GoodNotFound(id) => Self::GoodNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<CatalogApiError> for CheckoutError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::GoodNotFound(id) => Self::GoodNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<AccountApiError> for AuthApiError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::AccountNotFound(id) => Self::AccountNotFound(id),
            AccountApiError::DuplicateUsername(s) => Self::DuplicateUsername(s),
            AccountApiError::Validation(v) => Self::Validation(v),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}
