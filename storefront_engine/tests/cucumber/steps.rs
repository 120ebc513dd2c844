use cucumber::{given, then, when};
use storefront_common::Money;
use storefront_engine::{
    cart::Cart,
    db_types::RestockPolicy,
    order_objects::{Customer, GuestDetails},
    test_utils::seed,
    CatalogManagement,
    CheckoutError,
    NotificationManagement,
    OrderManagement,
};

use crate::cucumber::StoreWorld;

#[given(expr = "a category {string}")]
async fn create_category(world: &mut StoreWorld, slug: String) {
    let category = seed::category(world.db(), &slug).await;
    world.category = Some(category);
}

#[given(expr = "the good {string} costs {word} with {int} in stock")]
async fn create_good(world: &mut StoreWorld, name: String, price: String, count: i64) {
    let category_id = world.category.as_ref().expect("Create a category first").id;
    let good = seed::good(world.db(), category_id, &name, &price, count).await;
    world.goods.insert(name, good);
}

#[given(expr = "a customer {string}")]
async fn create_customer(world: &mut StoreWorld, username: String) {
    let account = seed::account(world.db(), &username).await;
    world.accounts.insert(username, account);
}

#[given(expr = "restocks notify on every stock write")]
async fn always_notify(world: &mut StoreWorld) {
    let system = world.system.take().expect("StoreFlowApi not initialised");
    let api = system.api.with_restock_policy(RestockPolicy::Always);
    world.system = Some(crate::cucumber::store_world::StoreSystem { api, ..system });
}

#[given(expr = "{string} wants to be told when {string} is back")]
async fn subscribe(world: &mut StoreWorld, username: String, name: String) {
    let account_id = world.account(&username).id;
    let good_id = world.good(&name).id;
    world.db().subscribe(account_id, good_id).await.expect("Error subscribing");
}

#[when(expr = "{string} puts {int} x {string} in the cart")]
async fn add_to_cart(world: &mut StoreWorld, username: String, quantity: i64, name: String) {
    let good_id = world.good(&name).id;
    world.carts.entry(username).or_default().add(good_id, quantity);
}

#[when(expr = "{string} checks out")]
async fn checkout(world: &mut StoreWorld, username: String) {
    let account_id = world.account(&username).id;
    let mut cart = world.carts.remove(&username).unwrap_or_default();
    let result = world.api().checkout(&mut cart, Customer::Authenticated(account_id)).await;
    world.carts.insert(username, cart);
    world.last_checkout = Some(result);
}

#[when(expr = "a guest {string} checks out with {int} x {string}")]
async fn guest_checkout(world: &mut StoreWorld, username: String, quantity: i64, name: String) {
    let mut cart = Cart::new();
    cart.add(world.good(&name).id, quantity);
    let guest = GuestDetails {
        username: username.clone(),
        email: format!("{username}@example.com"),
        phone_number: "+380501112233".into(),
        address: "Lviv".into(),
    };
    let result = world.api().checkout(&mut cart, Customer::Guest(guest)).await;
    world.last_checkout = Some(result);
}

#[when(expr = "the stock of {string} is set to {int}")]
async fn set_stock(world: &mut StoreWorld, name: String, count: i64) {
    let good_id = world.good(&name).id;
    world.api().update_stock(good_id, count).await.expect("Error updating stock");
}

#[then(expr = "the order contains {int} x {string}")]
async fn order_contains(world: &mut StoreWorld, quantity: i64, name: String) {
    let good_id = world.good(&name).id;
    let result = world.checkout_result().as_ref().expect("Checkout failed");
    let line = result.order.items.iter().find(|l| l.good_id == good_id).expect("Good is not in the order");
    assert_eq!(line.quantity, quantity, "Wrong quantity for {name}");
}

#[then(expr = "the order total is {word}")]
async fn order_total(world: &mut StoreWorld, total: String) {
    let total: Money = total.parse().expect("Invalid amount");
    let result = world.checkout_result().as_ref().expect("Checkout failed");
    assert_eq!(result.order.total, total);
}

#[then(expr = "the customer is told that only {int} of {string} were left")]
async fn adjustment_reported(world: &mut StoreWorld, fulfilled: i64, name: String) {
    let good_id = world.good(&name).id;
    let adjustments = match world.checkout_result() {
        Ok(result) => &result.adjustments,
        Err(CheckoutError::OutOfStock(adjustments)) => adjustments,
        Err(e) => panic!("Unexpected checkout error: {e}"),
    };
    let adjustment = adjustments.iter().find(|a| a.good_id == good_id).expect("No adjustment for this good");
    assert_eq!(adjustment.fulfilled, fulfilled);
}

#[then(expr = "the checkout is refused because nothing is in stock")]
async fn sold_out(world: &mut StoreWorld) {
    assert!(matches!(world.checkout_result(), Err(CheckoutError::OutOfStock(_))));
}

#[then(expr = "the checkout is refused because the username is taken")]
async fn username_taken(world: &mut StoreWorld) {
    assert!(matches!(world.checkout_result(), Err(CheckoutError::DuplicateUsername(_))));
}

#[then(expr = "the cart of {string} is empty")]
async fn cart_is_empty(world: &mut StoreWorld, username: String) {
    assert!(world.carts.get(&username).map(|c| c.is_empty()).unwrap_or(true));
}

#[then(expr = "the cart of {string} still holds {int} x {string}")]
async fn cart_holds(world: &mut StoreWorld, username: String, quantity: i64, name: String) {
    let good_id = world.good(&name).id;
    let cart = world.carts.get(&username).expect("No cart");
    assert_eq!(cart.quantity(good_id), Some(quantity));
}

#[then(expr = "there are {int} x {string} left")]
async fn stock_left(world: &mut StoreWorld, count: i64, name: String) {
    let good_id = world.good(&name).id;
    let good = world.db().fetch_good(good_id).await.expect("Error fetching good").expect("Good vanished");
    assert_eq!(good.count, count);
}

#[then(expr = "{string} has {int} unread notification(s)")]
async fn unread_notifications(world: &mut StoreWorld, username: String, count: i64) {
    let account_id = world.account(&username).id;
    let unread = world.db().count_unread_notifications(account_id).await.expect("Error counting notifications");
    assert_eq!(unread, count);
}

#[then(expr = "{string} has {int} order(s)")]
async fn order_count(world: &mut StoreWorld, username: String, count: usize) {
    let account_id = world.account(&username).id;
    let orders = world.db().fetch_orders_for_account(account_id).await.expect("Error fetching orders");
    assert_eq!(orders.len(), count);
}
