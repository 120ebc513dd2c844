use serde::{Deserialize, Serialize};
use storefront_common::Secret;
use storefront_engine::{
    account_objects::NotificationsResult,
    catalog_objects::{CartSnapshot, CategoryGoods},
    db_types::{Account, Category, FlashMessage, Good, OrderDetail, OrderStatusType, ProfileUpdate},
    order_objects::GuestDetails,
};

use crate::session::RequestSession;

/// Every page is a JSON document carrying the page content plus any flash messages that were waiting in the session.
/// Reading the messages drains them.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub messages: Vec<FlashMessage>,
    pub signed_in: bool,
    pub cart_items: usize,
    #[serde(flatten)]
    pub content: T,
}

impl<T: Serialize> Page<T> {
    pub fn new(session: &mut RequestSession, content: T) -> Self {
        let messages = session.take_messages();
        Self { messages, signed_in: session.account_id().is_some(), cart_items: session.cart().len(), content }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EmptyPage {}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage {
    pub q: Option<String>,
    pub goods: Vec<Good>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoodPage {
    pub good: Good,
    /// Whether the visitor will be told when the good is back in stock.
    pub subscribed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryPage {
    #[serde(flatten)]
    pub category: CategoryGoods,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesPage {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CartPage {
    pub cart: CartSnapshot,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutPage {
    pub cart: CartSnapshot,
    /// Pre-fills the form for signed-in customers.
    pub customer: Option<Account>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub order: OrderDetail,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub account: Account,
    pub orders: Vec<OrderDetail>,
    pub unread_notifications: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NotificationsPage {
    #[serde(flatten)]
    pub notifications: NotificationsResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginPage {
    pub next: String,
}

//----------------------------------------------   Forms  ----------------------------------------------------
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextQuery {
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: Secret<String>,
    #[serde(default)]
    pub next: Option<String>,
}

/// The checkout form. Signed-in customers may post it empty; guests fill in their contact details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
}

impl From<CheckoutForm> for GuestDetails {
    fn from(form: CheckoutForm) -> Self {
        Self { username: form.username, email: form.email, phone_number: form.phone_number, address: form.address }
    }
}

/// Fields left out of the form are not changed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
}

impl From<ProfileForm> for ProfileUpdate {
    fn from(form: ProfileForm) -> Self {
        Self {
            username: form.username,
            email: form.email,
            first_name: form.first_name,
            last_name: form.last_name,
            phone_number: form.phone_number,
            address: form.address,
        }
    }
}

//----------------------------------------------   Admin  ----------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockUpdateRequest {
    pub count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatusType,
}
