//! Small fixtures for tests: a category, some goods and a couple of accounts.
use storefront_common::Money;

use crate::{
    db_types::{Account, Category, Good, NewAccount, NewCategory, NewGood},
    helpers::hash_password,
    AccountManagement,
    CatalogManagement,
    SqliteDatabase,
};

pub const TEST_PASSWORD: &str = "s3cret-pass";

pub async fn category(db: &SqliteDatabase, slug: &str) -> Category {
    db.insert_category(NewCategory::new(slug, slug)).await.expect("Error creating category")
}

pub async fn good(db: &SqliteDatabase, category_id: i64, name: &str, price: &str, count: i64) -> Good {
    let slug = crate::helpers::slugify(name);
    let price: Money = price.parse().expect("Invalid price");
    let good = NewGood::new(slug.as_str(), name, price, category_id).with_count(count);
    db.insert_good(good).await.expect("Error creating good")
}

fn new_account(username: &str) -> NewAccount {
    NewAccount::new(username, "", hash_password(TEST_PASSWORD).expect("Error hashing password"))
}

pub async fn account(db: &SqliteDatabase, username: &str) -> Account {
    db.insert_account(new_account(username)).await.expect("Error creating account")
}

pub async fn staff_account(db: &SqliteDatabase, username: &str) -> Account {
    db.insert_account(new_account(username).as_staff()).await.expect("Error creating account")
}
