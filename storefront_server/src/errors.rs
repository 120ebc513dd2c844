use actix_web::{
    error::ResponseError,
    http::{
        header::{self, ContentType},
        StatusCode,
    },
    HttpResponse,
};
use log::*;
use storefront_engine::{
    helpers::ValidationErrors,
    AccountApiError,
    AuthApiError,
    CatalogApiError,
    CheckoutError,
    NotificationApiError,
    OrderFlowError,
    SessionApiError,
};
use thiserror::Error;

use crate::helpers::login_url;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("The submitted data is invalid. {0}")]
    ValidationError(ValidationErrors),
    #[error("You need to log in to see {0}")]
    LoginRequired(String),
    #[error("Insufficient Permissions. {0}")]
    InsufficientPermissions(String),
    #[error("The request conflicts with the current state. {0}")]
    Conflict(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::LoginRequired(_) => StatusCode::SEE_OTHER,
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::LoginRequired(next) => {
                HttpResponse::SeeOther().insert_header((header::LOCATION, login_url(next))).finish()
            },
            Self::ValidationError(errors) => HttpResponse::build(self.status_code())
                .insert_header(ContentType::json())
                .body(serde_json::json!({ "error": self.to_string(), "fields": errors }).to_string()),
            _ => HttpResponse::build(self.status_code())
                .insert_header(ContentType::json())
                .body(serde_json::json!({ "error": self.to_string() }).to_string()),
        }
    }
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            CatalogApiError::GoodNotFound(_) |
            CatalogApiError::GoodSlugNotFound(_) |
            CatalogApiError::CategoryNotFound(_) => Self::NoRecordFound(e.to_string()),
            CatalogApiError::DuplicateSlug(_) => Self::Conflict(e.to_string()),
            CatalogApiError::InvalidSlug(_) | CatalogApiError::InvalidInput(_) => {
                Self::InvalidRequestBody(e.to_string())
            },
        }
    }
}

impl From<CheckoutError> for ServerError {
    fn from(e: CheckoutError) -> Self {
        match e {
            CheckoutError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            CheckoutError::Validation(errors) => Self::ValidationError(errors),
            CheckoutError::AccountNotFound(_) | CheckoutError::GoodNotFound(_) => Self::NoRecordFound(e.to_string()),
            CheckoutError::EmptyCart | CheckoutError::OutOfStock(_) | CheckoutError::DuplicateUsername(_) => {
                Self::Conflict(e.to_string())
            },
        }
    }
}

impl From<AccountApiError> for ServerError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            AccountApiError::AccountNotFound(_) | AccountApiError::OrderNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
            AccountApiError::DuplicateUsername(_) => {
                let mut errors = ValidationErrors::new();
                errors.add("username", "A user with that username already exists.");
                Self::ValidationError(errors)
            },
            AccountApiError::Validation(errors) => Self::ValidationError(errors),
        }
    }
}

impl From<AuthApiError> for ServerError {
    fn from(e: AuthApiError) -> Self {
        match e {
            AuthApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            AuthApiError::InvalidCredentials | AuthApiError::AccountInactive => {
                Self::InsufficientPermissions(e.to_string())
            },
            AuthApiError::AccountNotFound(_) => Self::NoRecordFound(e.to_string()),
            AuthApiError::DuplicateUsername(_) => {
                let mut errors = ValidationErrors::new();
                errors.add("username", "A user with that username already exists.");
                Self::ValidationError(errors)
            },
            AuthApiError::Validation(errors) => Self::ValidationError(errors),
            AuthApiError::Hashing(e) => Self::BackendError(e.to_string()),
        }
    }
}

impl From<NotificationApiError> for ServerError {
    fn from(e: NotificationApiError) -> Self {
        match e {
            NotificationApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            NotificationApiError::AccountNotFound(_) |
            NotificationApiError::GoodNotFound(_) |
            NotificationApiError::NotificationNotFound(_) => Self::NoRecordFound(e.to_string()),
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            OrderFlowError::OrderNotFound(_) => Self::NoRecordFound(e.to_string()),
            OrderFlowError::ForbiddenStatusChange { .. } => Self::Conflict(e.to_string()),
        }
    }
}

impl From<SessionApiError> for ServerError {
    fn from(e: SessionApiError) -> Self {
        error!("🍪️ Session storage failed. {e}");
        match e {
            SessionApiError::DatabaseError(e) => Self::BackendError(format!("Session storage error: {e}")),
        }
    }
}
