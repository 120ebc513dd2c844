use thiserror::Error;

use crate::store_api::errors::{
    AccountApiError,
    AuthApiError,
    CatalogApiError,
    CheckoutError,
    NotificationApiError,
    OrderFlowError,
    SessionApiError,
};

#[derive(Debug, Error)]
pub enum SqliteDatabaseError {
    #[error("Database connection error: {0}")]
    DriverError(#[from] sqlx::Error),
    #[error("Database query error: {0}")]
    QueryError(String),
    #[error("The username '{0}' is already taken")]
    DuplicateUsername(String),
    #[error("The slug '{0}' is already in use")]
    DuplicateSlug(String),
    #[error("Could not create new user account: {0}")]
    AccountCreationError(String),
    #[error("Account not found: {0}")]
    AccountNotFound(i64),
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),
    #[error("Good not found: {0}")]
    GoodNotFound(i64),
    #[error("Order not found: {0}")]
    OrderNotFound(i64),
    #[error("Stock count cannot be negative (requested {0})")]
    NegativeStock(i64),
}

impl SqliteDatabaseError {
    /// Classifies a failed INSERT/UPDATE. Unique violations become `on_unique`, foreign key violations `on_fk`, and
    /// everything else is passed through.
    pub(crate) fn classify<U, F>(e: sqlx::Error, on_unique: U, on_fk: F) -> Self
    where
        U: FnOnce() -> Self,
        F: FnOnce() -> Self,
    {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => on_unique(),
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => on_fk(),
            _ => Self::DriverError(e),
        }
    }
}

impl From<SqliteDatabaseError> for CatalogApiError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::DuplicateSlug(s) => Self::DuplicateSlug(s),
            SqliteDatabaseError::CategoryNotFound(id) => Self::CategoryNotFound(id.to_string()),
            SqliteDatabaseError::GoodNotFound(id) => Self::GoodNotFound(id),
            SqliteDatabaseError::NegativeStock(n) => Self::InvalidInput(format!("Stock count cannot be negative: {n}")),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<SqliteDatabaseError> for CheckoutError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::DuplicateUsername(s) => Self::DuplicateUsername(s),
            SqliteDatabaseError::AccountNotFound(id) => Self::AccountNotFound(id),
            SqliteDatabaseError::GoodNotFound(id) => Self::GoodNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<SqliteDatabaseError> for AccountApiError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::DuplicateUsername(s) => Self::DuplicateUsername(s),
            SqliteDatabaseError::AccountNotFound(id) => Self::AccountNotFound(id),
            SqliteDatabaseError::OrderNotFound(id) => Self::OrderNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<SqliteDatabaseError> for AuthApiError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::DuplicateUsername(s) => Self::DuplicateUsername(s),
            SqliteDatabaseError::AccountNotFound(id) => Self::AccountNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<SqliteDatabaseError> for NotificationApiError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::AccountNotFound(id) => Self::AccountNotFound(id),
            SqliteDatabaseError::GoodNotFound(id) => Self::GoodNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<SqliteDatabaseError> for OrderFlowError {
    fn from(e: SqliteDatabaseError) -> Self {
        match e {
            SqliteDatabaseError::OrderNotFound(id) => Self::OrderNotFound(id),
            e => Self::DatabaseError(e.to_string()),
        }
    }
}

impl From<SqliteDatabaseError> for SessionApiError {
    fn from(e: SqliteDatabaseError) -> Self {
        Self::DatabaseError(e.to_string())
    }
}

macro_rules! driver_error_conversions {
    ($($api_error:ty),+) => {
        $(
            impl From<sqlx::Error> for $api_error {
                fn from(e: sqlx::Error) -> Self {
                    SqliteDatabaseError::from(e).into()
                }
            }
        )+
    };
}

driver_error_conversions!(
    CatalogApiError,
    CheckoutError,
    AccountApiError,
    AuthApiError,
    NotificationApiError,
    OrderFlowError,
    SessionApiError
);
