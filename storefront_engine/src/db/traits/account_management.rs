use crate::{
    db_types::{Account, NewAccount, PasswordHash, ProfileUpdate},
    store_api::errors::AccountApiError,
};

/// The `AccountManagement` trait defines behaviour for storing and querying user accounts.
///
/// Credential *checks* are not done here. The backend only stores the hash; [`crate::AuthApi`] does the verifying.
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    /// Fetches the account with the given id. If no account exists, `None` is returned.
    async fn fetch_account(&self, account_id: i64) -> Result<Option<Account>, AccountApiError>;

    async fn fetch_account_by_username(&self, username: &str) -> Result<Option<Account>, AccountApiError>;

    /// Creates an account. A username that is already taken results in [`AccountApiError::DuplicateUsername`].
    async fn insert_account(&self, account: NewAccount) -> Result<Account, AccountApiError>;

    /// Applies the non-empty fields of `update` and returns the updated account.
    async fn update_profile(&self, account_id: i64, update: ProfileUpdate) -> Result<Account, AccountApiError>;

    async fn update_password_hash(&self, account_id: i64, hash: PasswordHash) -> Result<(), AccountApiError>;
}
