use actix_web::{http::StatusCode, test, web, App};
use chrono::{Duration, TimeZone, Utc};
use storefront_common::Money;
use storefront_engine::{
    db_types::Good,
    test_utils::seed,
    CatalogApi,
    SessionApi,
};

use super::{
    helpers::{browser, tear_down, test_db},
    mocks::MockCatalog,
};
use crate::{
    config::{ServerConfig, SessionOptions},
    routes::{CategoryRoute, IndexRoute},
    session::SessionStore,
};

fn good(id: i64, name: &str, count: i64) -> Good {
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    Good {
        id,
        slug: format!("good-{id}"),
        name: name.to_string(),
        price: Money::from_cents(250),
        count,
        photo: None,
        description: String::new(),
        category_id: 1,
        created_at: at,
        updated_at: at,
    }
}

/// Session storage that fails the test if it is touched at all.
fn untouched_sessions() -> web::Data<SessionStore<MockCatalog>> {
    let options = SessionOptions::default();
    web::Data::new(SessionStore::new(SessionApi::new(MockCatalog::new(), Duration::hours(1)), options))
}

#[actix_web::test]
async fn search_filters_by_name() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_goods().returning(|_| {
        Ok(vec![good(1, "Potato Chips", 5), good(2, "Pretzels", 0), good(3, "ЧИПСИ", 2), good(4, "chipotle", 1)])
    });
    let app = App::new()
        .app_data(web::Data::new(CatalogApi::new(catalog)))
        .app_data(untouched_sessions())
        .service(IndexRoute::<MockCatalog>::new());
    let service = test::init_service(app).await;

    let req = test::TestRequest::get().uri("/?q=%20CHIP%20").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    // Anonymous browsing does not create a session
    assert!(res.response().cookies().next().is_none());
    let body: serde_json::Value = test::read_body_json(res).await;
    let names = body["goods"].as_array().unwrap().iter().map(|g| g["name"].as_str().unwrap()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Potato Chips", "chipotle"]);
    assert_eq!(body["q"], " CHIP ");
    assert_eq!(body["signed_in"], false);
    assert_eq!(body["cart_items"], 0);
    assert_eq!(body["goods"][0]["price"], "2.50");

    let req = test::TestRequest::get().uri("/?q=%D1%87%D0%B8%D0%BF%D1%81%D0%B8").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(body["goods"][0]["name"], "ЧИПСИ");
}

#[actix_web::test]
async fn blank_search_lists_everything() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_goods().times(1).returning(|_| Ok(vec![good(1, "Potato Chips", 5), good(2, "Pretzels", 0)]));
    let app = App::new()
        .app_data(web::Data::new(CatalogApi::new(catalog)))
        .app_data(untouched_sessions())
        .service(IndexRoute::<MockCatalog>::new());
    let service = test::init_service(app).await;
    let req = test::TestRequest::get().uri("/?q=%20%20").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&service, req).await;
    assert_eq!(body["goods"].as_array().unwrap().len(), 2);
    assert!(body["q"].is_null());
}

#[actix_web::test]
async fn unknown_category_is_not_found() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockCatalog::new();
    catalog.expect_fetch_category_by_slug().withf(|slug| slug.eq_ignore_ascii_case("nope")).returning(|_| Ok(None));
    let app = App::new()
        .app_data(web::Data::new(CatalogApi::new(catalog)))
        .app_data(untouched_sessions())
        .service(CategoryRoute::<MockCatalog>::new());
    let service = test::init_service(app).await;
    let req = test::TestRequest::get().uri("/category/nope").to_request();
    let res = test::call_service(&service, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn category_page_lists_its_goods() {
    let db = test_db().await;
    let snacks = seed::category(&db, "snacks").await;
    let drinks = seed::category(&db, "drinks").await;
    seed::good(&db, snacks.id, "Potato Chips", "2.50", 5).await;
    seed::good(&db, drinks.id, "Lemonade", "1.20", 5).await;
    seed::good(&db, snacks.id, "Pretzels", "1.75", 0).await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;

    let res = browser.get("/category/snacks").await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["category"]["slug"], "snacks");
    let names = body["goods"].as_array().unwrap().iter().map(|g| g["name"].as_str().unwrap()).collect::<Vec<_>>();
    assert_eq!(names, vec!["Potato Chips", "Pretzels"]);

    let res = browser.get("/categories").await;
    let slugs = res.json()["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["slug"].as_str().unwrap().to_string())
        .collect::<Vec<_>>();
    assert_eq!(slugs, vec!["drinks", "snacks"]);
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn good_detail_pages() {
    let db = test_db().await;
    let snacks = seed::category(&db, "snacks").await;
    let chips = seed::good(&db, snacks.id, "Potato Chips", "2.50", 0).await;
    let mut browser = browser(db.clone(), ServerConfig::default()).await;

    let res = browser.get(&format!("/good/{}", chips.id)).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["good"]["name"], "Potato Chips");
    assert_eq!(body["good"]["count"], 0);
    assert_eq!(body["subscribed"], false);

    let res = browser.get("/good/9999").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    drop(browser);
    tear_down(db).await;
}

#[actix_web::test]
async fn health_check() {
    let app = test::init_service(App::new().service(crate::routes::health)).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

