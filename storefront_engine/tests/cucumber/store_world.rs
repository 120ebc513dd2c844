use std::collections::HashMap;

use cucumber::World;
use log::*;
use storefront_engine::{
    cart::Cart,
    db_types::{Account, Category, Good},
    events::EventProducers,
    order_objects::CheckoutResult,
    test_utils::prepare_env::{prepare_test_env, random_db_path},
    CheckoutError,
    SqliteDatabase,
    StoreFlowApi,
};

#[derive(Default, Debug, World)]
pub struct StoreWorld {
    pub system: Option<StoreSystem>,
    pub category: Option<Category>,
    pub goods: HashMap<String, Good>,
    pub accounts: HashMap<String, Account>,
    pub carts: HashMap<String, Cart>,
    pub last_checkout: Option<Result<CheckoutResult, CheckoutError>>,
}

#[derive(Debug)]
pub struct StoreSystem {
    pub db_path: String,
    pub db: SqliteDatabase,
    pub api: StoreFlowApi<SqliteDatabase>,
}

impl StoreWorld {
    pub fn api(&self) -> &StoreFlowApi<SqliteDatabase> {
        &self.system.as_ref().expect("StoreFlowApi not initialised").api
    }

    pub fn db(&self) -> &SqliteDatabase {
        &self.system.as_ref().expect("Database not initialised").db
    }

    pub fn good(&self, name: &str) -> &Good {
        self.goods.get(name).unwrap_or_else(|| panic!("Good '{name}' has not been created"))
    }

    pub fn account(&self, username: &str) -> &Account {
        self.accounts.get(username).unwrap_or_else(|| panic!("Account '{username}' has not been created"))
    }

    pub fn checkout_result(&self) -> &Result<CheckoutResult, CheckoutError> {
        self.last_checkout.as_ref().expect("Nobody has checked out yet")
    }
}

impl StoreSystem {
    pub async fn new() -> Self {
        let url = random_db_path();
        let db = prepare_test_env(&url).await;
        debug!("Created database: {url}");
        let api = StoreFlowApi::new(db.clone(), EventProducers::default());
        Self { db_path: url, db, api }
    }
}
