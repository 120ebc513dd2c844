use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
pub use storefront_common::Money;
use thiserror::Error;

use crate::cart::Cart;

#[derive(Debug, Clone, Error)]
#[error("Invalid value: {0}")]
pub struct ConversionError(String);

//--------------------------------------    PasswordHash     ---------------------------------------------------------
/// An Argon2id credential hash in PHC string form. Guest accounts carry an unusable hash that starts
/// with `!` and can never verify. Plaintext passwords never get stored; see [`crate::helpers::credentials`].
#[derive(Clone, Default, PartialEq, Eq, Type)]
#[sqlx(transparent)]
pub struct PasswordHash(pub String);

impl std::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PasswordHash(****)")
    }
}

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_usable(&self) -> bool {
        !self.0.is_empty() && !self.0.starts_with('!')
    }
}

//--------------------------------------       Account       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    #[serde(skip_serializing)]
    pub password_hash: PasswordHash,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// The full name if one was given, otherwise the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub address: String,
    pub password_hash: PasswordHash,
    pub is_staff: bool,
}

impl NewAccount {
    pub fn new<S: Into<String>>(username: S, email: S, password_hash: PasswordHash) -> Self {
        Self { username: username.into(), email: email.into(), password_hash, ..Default::default() }
    }

    pub fn with_contact_details<S: Into<String>>(mut self, phone_number: S, address: S) -> Self {
        self.phone_number = phone_number.into();
        self.address = address.into();
        self
    }

    pub fn with_name<S: Into<String>>(mut self, first_name: S, last_name: S) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    pub fn as_staff(mut self) -> Self {
        self.is_staff = true;
        self
    }
}

/// The contact fields a user may change on their own profile. Credentials are changed through
/// [`crate::AuthApi::change_password`] instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() &&
            self.email.is_none() &&
            self.first_name.is_none() &&
            self.last_name.is_none() &&
            self.phone_number.is_none() &&
            self.address.is_none()
    }
}

//--------------------------------------       Catalog       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub photo: Option<String>,
}

impl NewCategory {
    pub fn new<S: Into<String>>(slug: S, name: S) -> Self {
        Self { slug: slug.into(), name: name.into(), photo: None }
    }
}

/// The highest price a good can be listed at: one billion.
pub const MAX_PRICE: Money = Money::from_cents(100_000_000_000);
/// The most units of a single good that can be held in stock.
pub const MAX_STOCK: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Good {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub price: Money,
    /// Units in stock. Never negative.
    pub count: i64,
    pub photo: Option<String>,
    pub description: String,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Good {
    pub fn in_stock(&self) -> bool {
        self.count > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGood {
    pub slug: String,
    pub name: String,
    pub price: Money,
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub description: String,
    pub category_id: i64,
}

impl NewGood {
    pub fn new<S: Into<String>>(slug: S, name: S, price: Money, category_id: i64) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            price,
            count: 0,
            photo: None,
            description: String::default(),
            category_id,
        }
    }

    pub fn with_count(mut self, count: i64) -> Self {
        self.count = count;
        self
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = description.into();
        self
    }
}

//--------------------------------------   OrderStatusType     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatusType {
    /// The order has been placed and is waiting for the shop to confirm it.
    PendingConfirmation,
    /// The shop has accepted the order.
    Confirmed,
    /// The goods have left the warehouse.
    Shipped,
    /// The customer has received the goods.
    Delivered,
    /// The order was cancelled before it shipped.
    Cancelled,
}

impl OrderStatusType {
    /// Statuses only move forward. There is no way back to an earlier status, and nothing leaves `Delivered` or
    /// `Cancelled`.
    pub fn can_transition_to(self, new_status: OrderStatusType) -> bool {
        use OrderStatusType::*;
        matches!(
            (self, new_status),
            (PendingConfirmation, Confirmed) |
                (Confirmed, Shipped) |
                (Shipped, Delivered) |
                (PendingConfirmation | Confirmed, Cancelled)
        )
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::PendingConfirmation => write!(f, "pending_confirmation"),
            OrderStatusType::Confirmed => write!(f, "confirmed"),
            OrderStatusType::Shipped => write!(f, "shipped"),
            OrderStatusType::Delivered => write!(f, "delivered"),
            OrderStatusType::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending_confirmation" => Ok(Self::PendingConfirmation),
            "confirmed" => Ok(Self::Confirmed),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------        Order          ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i64,
    pub account_id: i64,
    pub status: OrderStatusType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub good_id: i64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// An order item joined with its good. `line_total` is the good's *current* price times the quantity; it is not
/// stored, so it follows later price changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OrderLine {
    pub item_id: i64,
    pub good_id: i64,
    pub name: String,
    pub slug: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderLine>,
    pub total: Money,
}

impl OrderDetail {
    pub fn new(order: Order, items: Vec<OrderLine>) -> Self {
        let total = items.iter().map(|i| i.line_total).sum();
        Self { order, items, total }
    }
}

//--------------------------------------    Notifications      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationStatus {
    Unread,
    Read,
}

impl Display for NotificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationStatus::Unread => write!(f, "unread"),
            NotificationStatus::Read => write!(f, "read"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i64,
    pub account_id: i64,
    pub good_id: Option<i64>,
    pub message: String,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Decides which stock writes count as a restock and therefore notify a good's subscribers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestockPolicy {
    /// Notify only when the stock count goes from zero to a positive value.
    #[default]
    Transition,
    /// Notify on every stock write that leaves the count positive, even if the good was already in stock.
    Always,
}

impl RestockPolicy {
    pub fn is_restock(self, previous_count: i64, new_count: i64) -> bool {
        match self {
            RestockPolicy::Transition => previous_count <= 0 && new_count > 0,
            RestockPolicy::Always => new_count > 0,
        }
    }
}

impl FromStr for RestockPolicy {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transition" => Ok(Self::Transition),
            "always" => Ok(Self::Always),
            s => Err(ConversionError(format!("Invalid restock policy: {s}"))),
        }
    }
}

//--------------------------------------       Sessions        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// A fresh, unguessable 128-bit session key in hex.
    pub fn random() -> Self {
        let bytes: [u8; 16] = rand::random();
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}…", self.0.chars().take(6).collect::<String>())
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A one-shot message shown on the next page the session displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: MessageLevel,
    pub text: String,
}

impl FlashMessage {
    pub fn new<S: Into<String>>(level: MessageLevel, text: S) -> Self {
        Self { level, text: text.into() }
    }
}

/// Everything a session carries between requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub cart: Cart,
    #[serde(default)]
    pub messages: Vec<FlashMessage>,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Session {
    pub id: SessionId,
    pub data: Json<SessionData>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: SessionId, expires_at: DateTime<Utc>) -> Self {
        Self { id, data: Json(SessionData::default()), expires_at }
    }

    pub fn account_id(&self) -> Option<i64> {
        self.data.account_id
    }

    pub fn cart(&self) -> &Cart {
        &self.data.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.data.cart
    }

    pub fn add_message<S: Into<String>>(&mut self, level: MessageLevel, text: S) {
        self.data.messages.push(FlashMessage::new(level, text));
    }

    /// Removes and returns the pending flash messages.
    pub fn take_messages(&mut self) -> Vec<FlashMessage> {
        std::mem::take(&mut self.data.messages)
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}
