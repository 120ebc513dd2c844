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

#[actix_web::test]
async fn register_then_log_in() {
    let db = test_db().await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    let form = [
        ("username", "bob"),
        ("email", "bob@example.com"),
        ("first_name", "Bob"),
        ("last_name", "Builder"),
        ("password1", "correct-horse-battery"),
        ("password2", "correct-horse-battery"),
    ];
    browser.post_form("/register", &form).await.assert_redirect("/login");
    let body = browser.get("/login").await.json();
    assert_eq!(messages(&body), vec!["Account 'bob' was created. Please log in."]);
    assert_eq!(body["next"], "/");

    let res = browser.post_form("/register", &form).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.json()["fields"]["username"][0], "A user with that username already exists.");

    let login = [("username", "bob"), ("password", "correct-horse-battery"), ("next", "/cart")];
    browser.post_form("/login", &login).await.assert_redirect("/cart");
    let body = browser.get("/cart").await.json();
    assert_eq!(body["signed_in"], true);
    assert_eq!(messages(&body), vec!["Welcome back, Bob Builder!"]);
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn registration_reports_every_problem() {
    let db = test_db().await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    let form = [("username", ""), ("email", "not-an-email"), ("password1", "12345678"), ("password2", "87654321")];
    let res = browser.post_form("/register", &form).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let fields = &res.json()["fields"];
    assert!(fields["username"].is_array());
    assert!(fields["email"].is_array());
    assert!(fields["password2"].is_array());
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn failed_login_goes_back_to_the_form() {
    let db = test_db().await;
    seed::account(&db, "alice").await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;

    let res = browser.post_form("/login?next=%2Fprofile", &[("username", "alice"), ("password", "wrong")]).await;
    res.assert_redirect("/login?next=%2Fprofile");
    let body = browser.get("/login?next=%2Fprofile").await.json();
    assert_eq!(body["next"], "/profile");
    assert_eq!(body["signed_in"], false);
    assert_eq!(body["messages"][0]["level"], "error");

    // Off-site targets are ignored
    let login = [("username", "alice"), ("password", TEST_PASSWORD), ("next", "https://evil.example/")];
    browser.post_form("/login", &login).await.assert_redirect("/");
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn pages_behind_login_redirect_back() {
    let db = test_db().await;
    seed::account(&db, "alice").await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    for path in ["/profile", "/notifications", "/change-password", "/order/1"] {
        let res = browser.get(path).await;
        res.assert_redirect(&crate::helpers::login_url(path));
    }
    browser.get("/notify-availability/1").await.assert_redirect("/login?next=%2Fnotify-availability%2F1");

    let login = [("username", "alice"), ("password", TEST_PASSWORD), ("next", "/profile")];
    browser.post_form("/login", &login).await.assert_redirect("/profile");
    let res = browser.get("/profile").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["account"]["username"], "alice");

    browser.get("/logout").await.assert_redirect("/");
    assert!(!browser.has_session());
    browser.get("/profile").await.assert_redirect("/login?next=%2Fprofile");
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn deactivated_and_deleted_accounts_are_signed_out() {
    let db = test_db().await;
    let snacks = seed::category(&db, "snacks").await;
    let chips = seed::good(&db, snacks.id, "Potato Chips", "2.50", 5).await;
    let alice = seed::account(&db, "alice").await;
    let bob = seed::account(&db, "bob").await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    browser.post_form("/login", &[("username", "alice"), ("password", TEST_PASSWORD)]).await.assert_redirect("/");
    browser.get(&format!("/add-to-cart/{}", chips.id)).await;
    assert_eq!(browser.get("/profile").await.status, StatusCode::OK);

    sqlx::query("UPDATE accounts SET is_active = 0 WHERE id = $1").bind(alice.id).execute(db.pool()).await.unwrap();
    browser.get("/profile").await.assert_redirect("/login?next=%2Fprofile");
    browser.get("/notifications").await.assert_redirect("/login?next=%2Fnotifications");
    let body = browser.get("/cart").await.json();
    assert_eq!(body["signed_in"], false);
    assert_eq!(body["cart"]["items"][0]["quantity"], 1);

    // A session left pointing at a deleted account checks out as a guest
    browser.forget_session();
    browser.post_form("/login", &[("username", "bob"), ("password", TEST_PASSWORD)]).await.assert_redirect("/");
    browser.get(&format!("/add-to-cart/{}", chips.id)).await;
    sqlx::query("DELETE FROM accounts WHERE id = $1").bind(bob.id).execute(db.pool()).await.unwrap();
    let empty = [("username", ""), ("email", ""), ("phone_number", ""), ("address", "")];
    let res = browser.post_form("/order", &empty).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["fields"]["username"].is_array());
    assert_eq!(db.fetch_good(chips.id).await.unwrap().unwrap().count, 5);
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn profile_and_password_changes() {
    let db = test_db().await;
    seed::account(&db, "alice").await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;
    browser.post_form("/login", &[("username", "alice"), ("password", TEST_PASSWORD)]).await;

    let edit = [("first_name", "Alice"), ("address", "2 High St")];
    browser.post_form("/edit-profile", &edit).await.assert_redirect("/profile");
    let body = browser.get("/profile").await.json();
    assert_eq!(body["account"]["first_name"], "Alice");
    assert_eq!(body["account"]["address"], "2 High St");
    assert_eq!(body["account"]["username"], "alice");
    assert!(body["account"].get("password_hash").is_none());

    let res = browser.post_form("/edit-profile", &[("email", "broken")]).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);

    let change = [("old_password", "wrong"), ("new_password1", "another-secret"), ("new_password2", "another-secret")];
    let res = browser.post_form("/change-password", &change).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.json()["fields"]["old_password"].is_array());

    let change =
        [("old_password", TEST_PASSWORD), ("new_password1", "another-secret"), ("new_password2", "another-secret")];
    browser.post_form("/change-password", &change).await.assert_redirect("/profile");
    // Still signed in
    assert_eq!(browser.get("/profile").await.status, StatusCode::OK);

    browser.forget_session();
    let old_login = [("username", "alice"), ("password", TEST_PASSWORD)];
    browser.post_form("/login", &old_login).await.assert_redirect("/login?next=%2F");
    browser.post_form("/login", &[("username", "alice"), ("password", "another-secret")]).await.assert_redirect("/");
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn restock_notifications() {
    let db = test_db().await;
    seed::account(&db, "alice").await;
    seed::staff_account(&db, "admin").await;
    let snacks = seed::category(&db, "snacks").await;
    let chips = seed::good(&db, snacks.id, "Potato Chips", "2.50", 0).await;
    let mut alice = browser(db.clone(), ServerConfig::default()).await;
    alice.post_form("/login", &[("username", "alice"), ("password", TEST_PASSWORD)]).await;
    alice.get("/profile").await;

    let path = format!("/notify-availability/{}", chips.id);
    alice.get(&path).await.assert_redirect(&format!("/good/{}", chips.id));
    let body = alice.get(&format!("/good/{}", chips.id)).await.json();
    assert_eq!(body["subscribed"], true);
    assert_eq!(messages(&body), vec!["We will let you know when 'Potato Chips' is available again."]);
    alice.get(&path).await;
    let body = alice.get(&format!("/good/{}", chips.id)).await.json();
    assert_eq!(messages(&body), vec!["You are already waiting for 'Potato Chips'."]);

    let mut admin = browser(db.clone(), ServerConfig::default()).await;
    admin.post_form("/login", &[("username", "admin"), ("password", TEST_PASSWORD)]).await;
    let res = admin.post_json(&format!("/admin/goods/{}/stock", chips.id), &serde_json::json!({"count": 4})).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["restock"]["notifications"].as_array().unwrap().len(), 1);

    let body = alice.get("/profile").await.json();
    assert_eq!(body["unread_notifications"], 1);
    let body = alice.get("/notifications").await.json();
    assert_eq!(body["unread_count"], 1);
    let notification = &body["notifications"][0];
    assert_eq!(notification["good_id"], chips.id);
    assert_eq!(notification["status"], "unread");
    let id = notification["id"].as_i64().unwrap();

    let res = alice.post_form::<[(&str, &str); 0]>(&format!("/notifications/{id}/read"), &[]).await;
    res.assert_redirect("/notifications");
    let body = alice.get("/notifications").await.json();
    assert_eq!(body["unread_count"], 0);
    assert_eq!(body["notifications"][0]["status"], "read");

    // Someone else's notification
    let res = admin.post_form::<[(&str, &str); 0]>(&format!("/notifications/{id}/read"), &[]).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    admin.post_form::<[(&str, &str); 0]>("/notifications/read", &[]).await.assert_redirect("/notifications");
    drop(alice);
    drop(admin);
    tear_down(db).await;
}
