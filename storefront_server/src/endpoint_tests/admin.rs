use actix_web::http::StatusCode;
use serde_json::json;
use storefront_engine::test_utils::seed::{self, TEST_PASSWORD};

use super::helpers::{browser, tear_down, test_db};
use crate::config::ServerConfig;

#[actix_web::test]
async fn admin_routes_are_for_staff_only() {
    let db = test_db().await;
    seed::account(&db, "alice").await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;

    let res = browser.post_json("/admin/categories", &json!({"slug": "snacks", "name": "Snacks"})).await;
    res.assert_redirect("/login?next=%2Fadmin%2Fcategories");

    browser.post_form("/login", &[("username", "alice"), ("password", TEST_PASSWORD)]).await;
    let res = browser.post_json("/admin/categories", &json!({"slug": "snacks", "name": "Snacks"})).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    let res = browser.post_json("/admin/goods/1/stock", &json!({"count": 5})).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn staff_curate_the_catalog() {
    let db = test_db().await;
    seed::staff_account(&db, "admin").await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    browser.post_form("/login", &[("username", "admin"), ("password", TEST_PASSWORD)]).await.assert_redirect("/");

    let res = browser.post_json("/admin/categories", &json!({"slug": "snacks", "name": "Snacks"})).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let category_id = res.json()["id"].as_i64().unwrap();

    let res = browser.post_json("/admin/categories", &json!({"slug": "snacks", "name": "More snacks"})).await;
    assert_eq!(res.status, StatusCode::CONFLICT);

    let good = json!({
        "slug": "potato-chips",
        "name": "Potato Chips",
        "price": "2.50",
        "count": 0,
        "description": "Crunchy",
        "category_id": category_id,
    });
    let res = browser.post_json("/admin/goods", &good).await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    let good_id = res.json()["id"].as_i64().unwrap();

    let res = browser.post_json(&format!("/admin/goods/{good_id}/stock"), &json!({"count": 12})).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["previous_count"], 0);
    assert_eq!(body["good"]["count"], 12);

    let res = browser.post_json(&format!("/admin/goods/{good_id}/stock"), &json!({"count": -1})).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let res = browser.post_json("/admin/goods/9999/stock", &json!({"count": 1})).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let body = browser.get("/").await.json();
    assert_eq!(body["goods"][0]["name"], "Potato Chips");
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn staff_move_orders_forward() {
    let db = test_db().await;
    seed::staff_account(&db, "admin").await;
    let snacks = seed::category(&db, "snacks").await;
    let chips = seed::good(&db, snacks.id, "Potato Chips", "2.50", 5).await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    browser.post_form("/login", &[("username", "admin"), ("password", TEST_PASSWORD)]).await;
    browser.get(&format!("/add-to-cart/{}", chips.id)).await;
    browser.post_form::<[(&str, &str); 0]>("/order", &[]).await.assert_redirect("/profile");
    let body = browser.get("/profile").await.json();
    let order_id = body["orders"][0]["order"]["id"].as_i64().unwrap();
    assert_eq!(body["orders"][0]["order"]["status"], "pending_confirmation");

    let path = format!("/admin/orders/{order_id}/status");
    let res = browser.post_json(&path, &json!({"status": "confirmed"})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["status"], "confirmed");

    let res = browser.post_json(&path, &json!({"status": "pending_confirmation"})).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    let res = browser.post_json("/admin/orders/9999/status", &json!({"status": "confirmed"})).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    drop(browser);
    tear_down(db).await;
}
