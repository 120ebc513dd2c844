use serde::{Deserialize, Serialize};

use crate::db_types::{Good, NewAccount, Notification, OrderDetail};

/// Contact details a guest submits at checkout. A guest checkout creates a regular account with these details and a
/// credential that can never log in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDetails {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
}

/// Who is placing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Customer {
    Authenticated(i64),
    Guest(GuestDetails),
}

/// The account a checkout transaction will charge the order to, as handed to the database backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutAccount {
    Existing(i64),
    Create(NewAccount),
}

/// Records that a cart line could not be filled in full because there was not enough stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub good_id: i64,
    pub name: String,
    pub requested: i64,
    pub fulfilled: i64,
}

impl StockAdjustment {
    /// The warning shown to the customer.
    pub fn message(&self) -> String {
        format!("Only {} of '{}' left in stock. The quantity has been changed.", self.fulfilled, self.name)
    }
}

/// A good whose stock write counted as a restock, and the notifications it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restock {
    pub good: Good,
    pub previous_count: i64,
    pub notifications: Vec<Notification>,
}

/// Everything the checkout transaction produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutOutcome {
    pub account_id: i64,
    pub order: OrderDetail,
    pub adjustments: Vec<StockAdjustment>,
    pub restocks: Vec<Restock>,
}

/// The result of a successful checkout as seen by callers of [`crate::StoreFlowApi::checkout`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutResult {
    pub account_id: i64,
    pub order: OrderDetail,
    pub adjustments: Vec<StockAdjustment>,
}

/// The result of setting a good's stock count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUpdate {
    pub good: Good,
    pub previous_count: i64,
    /// Present if the write counted as a restock.
    pub restock: Option<Restock>,
}
