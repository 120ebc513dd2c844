use actix_web::http::StatusCode;
use storefront_engine::{
    test_utils::seed::{self, TEST_PASSWORD},
    CatalogManagement,
};

use super::helpers::{browser, tear_down, test_db};
use crate::config::ServerConfig;

fn messages(body: &serde_json::Value) -> Vec<String> {
    body["messages"].as_array().unwrap().iter().map(|m| m["text"].as_str().unwrap().to_string()).collect()
}

fn guest_form(username: &str) -> Vec<(&'static str, String)> {
    vec![
        ("username", username.to_string()),
        ("email", format!("{username}@example.com")),
        ("phone_number", "555-0100".to_string()),
        ("address", "1 Main Street".to_string()),
    ]
}

#[actix_web::test]
async fn cart_operations() {
    let db = test_db().await;
    let snacks = seed::category(&db, "snacks").await;
    let chips = seed::good(&db, snacks.id, "Potato Chips", "2.50", 2).await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;

    let res = browser.get(&format!("/add-to-cart/{}", chips.id)).await;
    res.assert_redirect("/cart");
    assert!(browser.has_session());

    let body = browser.get("/cart").await.json();
    assert_eq!(messages(&body), vec!["'Potato Chips' was added to your cart."]);
    assert_eq!(body["cart_items"], 1);
    assert_eq!(body["cart"]["items"][0]["quantity"], 1);
    assert_eq!(body["cart"]["total"], "2.50");

    browser.get(&format!("/cart/increase/{}", chips.id)).await.assert_redirect("/cart");
    let body = browser.get("/cart").await.json();
    assert_eq!(body["cart"]["items"][0]["quantity"], 2);
    assert_eq!(body["cart"]["total"], "5.00");
    assert!(messages(&body).is_empty());

    // Only two in stock
    browser.get(&format!("/cart/increase/{}", chips.id)).await;
    let body = browser.get("/cart").await.json();
    assert_eq!(body["cart"]["items"][0]["quantity"], 2);
    assert_eq!(messages(&body), vec!["There is no more of this good in stock."]);

    browser.get(&format!("/cart/decrease/{}", chips.id)).await;
    let body = browser.get("/cart").await.json();
    assert_eq!(body["cart"]["items"][0]["quantity"], 1);

    browser.get(&format!("/cart/remove/{}", chips.id)).await.assert_redirect("/cart");
    let body = browser.get("/cart").await.json();
    assert_eq!(body["cart_items"], 0);
    assert!(body["cart"]["items"].as_array().unwrap().is_empty());

    let res = browser.get("/add-to-cart/9999").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn empty_cart_cannot_check_out() {
    let db = test_db().await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    browser.get("/order").await.assert_redirect("/cart");
    let body = browser.get("/cart").await.json();
    assert_eq!(messages(&body), vec!["Your cart is empty!"]);

    browser.post_form("/order", &guest_form("guest")).await.assert_redirect("/cart");
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn guest_checkout() {
    let db = test_db().await;
    let snacks = seed::category(&db, "snacks").await;
    let chips = seed::good(&db, snacks.id, "Potato Chips", "2.50", 5).await;
    let salsa = seed::good(&db, snacks.id, "Salsa", "3.00", 1).await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    browser.get(&format!("/add-to-cart/{}", chips.id)).await;
    browser.get(&format!("/add-to-cart/{}", chips.id)).await;
    browser.get(&format!("/add-to-cart/{}", salsa.id)).await;
    browser.get(&format!("/add-to-cart/{}", salsa.id)).await;

    let body = browser.get("/order").await.json();
    assert!(body["customer"].is_null());
    assert_eq!(body["cart"]["total"], "11.00");

    browser.post_form("/order", &guest_form("guest")).await.assert_redirect("/");
    let body = browser.get("/cart").await.json();
    let msgs = messages(&body);
    assert_eq!(msgs.len(), 2);
    assert_eq!(msgs[0], "Only 1 of 'Salsa' left in stock. The quantity has been changed.");
    assert!(msgs[1].starts_with("Thank you! Your order #"));
    assert_eq!(body["cart_items"], 0);

    assert_eq!(db.fetch_good(chips.id).await.unwrap().unwrap().count, 3);
    assert_eq!(db.fetch_good(salsa.id).await.unwrap().unwrap().count, 0);

    // Guest accounts have no usable password
    let res = browser.post_form("/login", &[("username", "guest"), ("password", "")]).await;
    res.assert_redirect("/login?next=%2F");
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn invalid_guest_details_keep_the_cart() {
    let db = test_db().await;
    let snacks = seed::category(&db, "snacks").await;
    let chips = seed::good(&db, snacks.id, "Potato Chips", "2.50", 5).await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    browser.get(&format!("/add-to-cart/{}", chips.id)).await;

    let form = vec![("username", "not a valid name!"), ("email", "nope"), ("phone_number", ""), ("address", "")];
    let res = browser.post_form("/order", &form).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let body = res.json();
    assert!(body["fields"]["username"].is_array());
    assert!(body["fields"]["email"].is_array());

    let body = browser.get("/cart").await.json();
    assert_eq!(body["cart"]["items"][0]["quantity"], 1);
    assert_eq!(db.fetch_good(chips.id).await.unwrap().unwrap().count, 5);
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn taken_guest_username_goes_back_to_the_form() {
    let db = test_db().await;
    seed::account(&db, "alice").await;
    let snacks = seed::category(&db, "snacks").await;
    let chips = seed::good(&db, snacks.id, "Potato Chips", "2.50", 5).await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    browser.get(&format!("/add-to-cart/{}", chips.id)).await;
    browser.get("/cart").await;

    browser.post_form("/order", &guest_form("alice")).await.assert_redirect("/order");
    let body = browser.get("/order").await.json();
    assert_eq!(
        messages(&body),
        vec!["A user with the username 'alice' already exists. Please log in or choose another."]
    );
    assert_eq!(body["cart"]["items"][0]["quantity"], 1);
    assert_eq!(db.fetch_good(chips.id).await.unwrap().unwrap().count, 5);
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn sold_out_cart_is_refused() {
    let db = test_db().await;
    let snacks = seed::category(&db, "snacks").await;
    let chips = seed::good(&db, snacks.id, "Potato Chips", "2.50", 0).await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    browser.get(&format!("/add-to-cart/{}", chips.id)).await;
    browser.get("/cart").await;

    browser.post_form("/order", &guest_form("guest")).await.assert_redirect("/cart");
    let body = browser.get("/cart").await.json();
    assert_eq!(
        messages(&body),
        vec![
            "Only 0 of 'Potato Chips' left in stock. The quantity has been changed.",
            "None of the goods in your cart are in stock."
        ]
    );
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn signed_in_checkout_lands_on_the_profile() {
    let db = test_db().await;
    let alice = seed::account(&db, "alice").await;
    let snacks = seed::category(&db, "snacks").await;
    let chips = seed::good(&db, snacks.id, "Potato Chips", "2.50", 5).await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;

    // The cart survives logging in
    browser.get(&format!("/add-to-cart/{}", chips.id)).await;
    browser.post_form("/login", &[("username", "alice"), ("password", TEST_PASSWORD)]).await.assert_redirect("/");
    let body = browser.get("/order").await.json();
    assert_eq!(body["customer"]["username"], "alice");
    assert_eq!(body["cart"]["items"][0]["quantity"], 1);

    browser.post_form::<[(&str, &str); 0]>("/order", &[]).await.assert_redirect("/profile");
    let body = browser.get("/profile").await.json();
    assert_eq!(body["account"]["id"], alice.id);
    let orders = body["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    let order_id = orders[0]["order"]["id"].as_i64().unwrap();

    let body = browser.get(&format!("/order/{order_id}")).await.json();
    assert_eq!(body["order"]["items"][0]["quantity"], 1);
    drop(browser);
    tear_down(db).await;
}
