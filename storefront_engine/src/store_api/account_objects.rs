use serde::{Deserialize, Serialize};
use storefront_common::Secret;

use crate::db_types::{Good, Notification};

/// A sign-up request. Passwords arrive in plaintext and are hashed before they reach the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Registration {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
    pub password1: Secret<String>,
    pub password2: Secret<String>,
}

/// A password change request from a logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PasswordChange {
    pub old_password: Secret<String>,
    pub new_password1: Secret<String>,
    pub new_password2: Secret<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationsResult {
    pub unread_count: i64,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionResult {
    pub good: Good,
    /// `false` if the account was already subscribed.
    pub newly_subscribed: bool,
}
