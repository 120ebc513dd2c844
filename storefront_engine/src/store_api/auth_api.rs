//! Registration, login and password changes.
//!
//! Plaintext passwords only ever exist inside a [`Secret`], and are hashed with [`crate::helpers::credentials`]
//! before they are stored.
use std::fmt::Debug;

use log::*;
use storefront_common::Secret;

use crate::{
    db::traits::AccountManagement,
    db_types::{Account, NewAccount},
    helpers::{
        hash_password,
        validation::{validate_email, validate_new_password, validate_phone_number, validate_username},
        verify_password,
        ValidationErrors,
    },
    store_api::{
        account_objects::{PasswordChange, Registration},
        errors::AuthApiError,
    },
};

pub struct AuthApi<B> {
    db: B,
}

impl<B: Debug> Debug for AuthApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AuthApi ({:?})", self.db)
    }
}

impl<B> AuthApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Creates a new, active, non-staff account. Every invalid field is reported at once in
    /// [`AuthApiError::Validation`].
    pub async fn register(&self, registration: Registration) -> Result<Account, AuthApiError> {
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_string();
        let phone = registration.phone_number.trim().to_string();
        let mut errors = ValidationErrors::new();
        validate_username(&username, &mut errors);
        validate_email(&email, &mut errors);
        validate_phone_number(&phone, &mut errors);
        validate_new_password(
            "password2",
            registration.password1.reveal(),
            registration.password2.reveal(),
            &username,
            &mut errors,
        );
        if !errors.has_error("username") && self.db.fetch_account_by_username(&username).await?.is_some() {
            errors.add("username", "A user with that username already exists.");
        }
        errors.into_result().map_err(AuthApiError::Validation)?;
        let account = NewAccount::new(username, email, hash_password(registration.password1.reveal())?)
            .with_contact_details(phone, registration.address.trim().to_string())
            .with_name(registration.first_name.trim().to_string(), registration.last_name.trim().to_string());
        let account = self.db.insert_account(account).await?;
        info!("🔑️ New account #{} registered as '{}'", account.id, account.username);
        Ok(account)
    }

    /// Checks a username and password. Unknown users and wrong passwords give the same error. A correct password for
    /// an inactive account gives [`AuthApiError::AccountInactive`].
    pub async fn authenticate(&self, username: &str, password: &Secret<String>) -> Result<Account, AuthApiError> {
        let account = self.db.fetch_account_by_username(username.trim()).await?.ok_or_else(|| {
            debug!("🔑️ Login attempt for unknown user '{username}'");
            AuthApiError::InvalidCredentials
        })?;
        if !verify_password(password.reveal(), &account.password_hash) {
            debug!("🔑️ Wrong password for account #{}", account.id);
            return Err(AuthApiError::InvalidCredentials);
        }
        if !account.is_active {
            info!("🔑️ Inactive account #{} tried to log in", account.id);
            return Err(AuthApiError::AccountInactive);
        }
        debug!("🔑️ Account #{} authenticated", account.id);
        Ok(account)
    }

    /// Changes the password after checking the current one. Existing sessions stay logged in.
    pub async fn change_password(&self, account_id: i64, change: PasswordChange) -> Result<(), AuthApiError> {
        let account = self.db.fetch_account(account_id).await?.ok_or(AuthApiError::AccountNotFound(account_id))?;
        let mut errors = ValidationErrors::new();
        if !verify_password(change.old_password.reveal(), &account.password_hash) {
            errors.add("old_password", "Your old password was entered incorrectly. Please enter it again.");
        }
        validate_new_password(
            "new_password2",
            change.new_password1.reveal(),
            change.new_password2.reveal(),
            &account.username,
            &mut errors,
        );
        errors.into_result().map_err(AuthApiError::Validation)?;
        self.db.update_password_hash(account_id, hash_password(change.new_password1.reveal())?).await?;
        info!("🔑️ Password changed for account #{account_id}");
        Ok(())
    }

    /// Makes sure a staff account with this username exists, creating it with `password` if it does not. An existing
    /// account is returned as is, without touching its password or flags.
    pub async fn ensure_staff_account(&self, username: &str, password: &Secret<String>) -> Result<Account, AuthApiError> {
        if let Some(account) = self.db.fetch_account_by_username(username).await? {
            if !account.is_staff {
                warn!("🔑️ The account '{username}' exists but is not a staff account");
            }
            return Ok(account);
        }
        let mut errors = ValidationErrors::new();
        validate_username(username, &mut errors);
        validate_new_password("password", password.reveal(), password.reveal(), username, &mut errors);
        errors.into_result().map_err(AuthApiError::Validation)?;
        let account = NewAccount::new(username, "", hash_password(password.reveal())?).as_staff();
        let account = self.db.insert_account(account).await?;
        info!("🔑️ Staff account #{} created as '{}'", account.id, account.username);
        Ok(account)
    }
}
