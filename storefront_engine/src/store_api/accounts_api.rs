//! Unifies API for accessing accounts, their profiles and their order history.

use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::{AccountManagement, OrderManagement},
    db_types::{Account, OrderDetail, ProfileUpdate},
    helpers::{
        validation::{validate_email, validate_phone_number, validate_username},
        ValidationErrors,
    },
    store_api::errors::AccountApiError,
};

/// The `AccountApi` provides a unified API for accessing accounts.
pub struct AccountApi<B> {
    db: B,
}

impl<B: Debug> Debug for AccountApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccountApi ({:?})", self.db)
    }
}

impl<B> AccountApi<B>
where B: AccountManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Fetches the account for the given id. If no account exists, `None` is returned.
    pub async fn account_by_id(&self, account_id: i64) -> Result<Option<Account>, AccountApiError> {
        self.db.fetch_account(account_id).await
    }

    pub async fn account(&self, account_id: i64) -> Result<Account, AccountApiError> {
        self.db.fetch_account(account_id).await?.ok_or(AccountApiError::AccountNotFound(account_id))
    }

    /// Changes the contact details on a profile. Fields that are `None` are left alone; credentials cannot be changed
    /// here.
    pub async fn update_profile(&self, account_id: i64, mut update: ProfileUpdate) -> Result<Account, AccountApiError> {
        let mut errors = ValidationErrors::new();
        if let Some(username) = update.username.as_mut() {
            *username = username.trim().to_string();
            validate_username(username, &mut errors);
        }
        if let Some(email) = update.email.as_mut() {
            *email = email.trim().to_string();
            validate_email(email, &mut errors);
        }
        if let Some(phone) = update.phone_number.as_mut() {
            *phone = phone.trim().to_string();
            validate_phone_number(phone, &mut errors);
        }
        errors.into_result().map_err(AccountApiError::Validation)?;
        let account = self.db.update_profile(account_id, update).await?;
        info!("👤️ Profile for account #{account_id} updated");
        Ok(account)
    }
}

impl<B> AccountApi<B>
where B: AccountManagement + OrderManagement
{
    /// The account's orders with their items, newest first.
    pub async fn orders_for_account(&self, account_id: i64) -> Result<Vec<OrderDetail>, AccountApiError> {
        let orders = self.db.fetch_orders_for_account(account_id).await?;
        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.db.fetch_order_lines(order.id).await?;
            result.push(OrderDetail::new(order, items));
        }
        trace!("👤️ Account #{account_id} has {} orders", result.len());
        Ok(result)
    }

    /// Fetches an order with its items, but only if it belongs to `account_id`. Someone else's order is reported as
    /// [`AccountApiError::OrderNotFound`], exactly like an order that does not exist.
    pub async fn order_for_account(&self, account_id: i64, order_id: i64) -> Result<OrderDetail, AccountApiError> {
        let order = self
            .db
            .fetch_order(order_id)
            .await?
            .filter(|o| o.account_id == account_id)
            .ok_or(AccountApiError::OrderNotFound(order_id))?;
        let items = self.db.fetch_order_lines(order.id).await?;
        Ok(OrderDetail::new(order, items))
    }
}
