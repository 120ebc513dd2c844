pub mod credentials;
mod slug;
pub mod validation;

pub use credentials::{hash_password, unusable_password, verify_password, CredentialError};
pub use slug::{is_valid_slug, slugify};
pub use validation::ValidationErrors;
