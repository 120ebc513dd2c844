use std::{
    future::Future,
    pin::Pin,
    sync::{atomic::AtomicI32, Arc},
};

use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use storefront_engine::{
    cart::Cart,
    db_types::OrderStatusType,
    events::{EventHandlers, EventHooks},
    order_objects::Customer,
    test_utils::{
        prepare_env::{prepare_test_env, random_db_path},
        seed,
    },
    NotificationManagement,
    SqliteDatabase,
    StoreFlowApi,
    StorefrontDatabase,
};
use tokio::runtime::Runtime;

type HookFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

async fn setup(hooks: EventHooks) -> (StoreFlowApi<SqliteDatabase>, Vec<tokio::task::JoinHandle<()>>) {
    let url = random_db_path();
    let db = prepare_test_env(&url).await;
    let mut handlers = EventHandlers::new(10, hooks);
    let producers = handlers.producers();
    let mut tasks = Vec::new();
    if let Some(h) = handlers.on_order_created.take() {
        tasks.push(tokio::spawn(h.start_handler()));
    }
    if let Some(h) = handlers.on_stock_replenished.take() {
        tasks.push(tokio::spawn(h.start_handler()));
    }
    if let Some(h) = handlers.on_order_status_changed.take() {
        tasks.push(tokio::spawn(h.start_handler()));
    }
    (StoreFlowApi::new(db, producers), tasks)
}

/// Closes the database and waits for the hooks to drain. The handlers stop once the api (and with it, every
/// producer) has been dropped.
async fn tear_down(api: StoreFlowApi<SqliteDatabase>, tasks: Vec<tokio::task::JoinHandle<()>>) {
    let mut db = api.db().clone();
    drop(api);
    for task in tasks {
        task.await.expect("Event handler panicked");
    }
    if let Err(e) = db.close().await {
        error!("🚀️ Failed to close database: {e}");
    }
    Sqlite::drop_database(db.url()).await.unwrap();
}

#[derive(Default, Clone)]
struct HookCalled {
    called: Arc<AtomicI32>,
}

impl HookCalled {
    pub fn called(&self) {
        let _ = self.called.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn count(&self) -> i32 {
        self.called.load(std::sync::atomic::Ordering::Relaxed)
    }
}

#[test]
fn on_order_created() {
    let rt = Runtime::new().unwrap();
    let event = HookCalled::default();
    let event_copy = event.clone();
    rt.block_on(async move {
        let mut hooks = EventHooks::default();
        hooks.on_order_created(move |ev| {
            info!("🪝️ Order #{} with {} items", ev.order.order.id, ev.order.items.len());
            event_copy.called();
            Box::pin(async {}) as HookFuture
        });
        let (api, tasks) = setup(hooks).await;
        let db = api.db().clone();
        let cat = seed::category(&db, "snacks").await;
        let chips = seed::good(&db, cat.id, "Chips", "2.99", 10).await;
        let alice = seed::account(&db, "alice").await;
        for _ in 0..2 {
            let mut cart = Cart::new();
            cart.add(chips.id, 2);
            api.checkout(&mut cart, Customer::Authenticated(alice.id)).await.expect("Error placing order");
        }
        // A failed checkout publishes nothing
        let mut cart = Cart::new();
        assert!(api.checkout(&mut cart, Customer::Authenticated(alice.id)).await.is_err());
        tear_down(api, tasks).await;
    });
    assert_eq!(event.count(), 2);
    info!("🪝️ test complete");
}

#[test]
fn on_stock_replenished() {
    let rt = Runtime::new().unwrap();
    let event = HookCalled::default();
    let notified = HookCalled::default();
    let event_copy = event.clone();
    let notified_copy = notified.clone();
    rt.block_on(async move {
        let mut hooks = EventHooks::default();
        hooks.on_stock_replenished(move |ev| {
            info!("🪝️ '{}' restocked from {} to {}", ev.good.name, ev.previous_count, ev.good.count);
            event_copy.called();
            for _ in &ev.notifications {
                notified_copy.called();
            }
            Box::pin(async {}) as HookFuture
        });
        let (api, tasks) = setup(hooks).await;
        let db = api.db().clone();
        let cat = seed::category(&db, "snacks").await;
        let chips = seed::good(&db, cat.id, "Chips", "2.99", 0).await;
        let alice = seed::account(&db, "alice").await;
        let bob = seed::account(&db, "bob").await;
        db.subscribe(alice.id, chips.id).await.unwrap();
        db.subscribe(bob.id, chips.id).await.unwrap();
        api.update_stock(chips.id, 3).await.expect("Error updating stock");
        // Still in stock, so this is not a restock
        api.update_stock(chips.id, 8).await.expect("Error updating stock");
        api.update_stock(chips.id, 0).await.expect("Error updating stock");
        api.update_stock(chips.id, 1).await.expect("Error updating stock");
        tear_down(api, tasks).await;
    });
    assert_eq!(event.count(), 2);
    assert_eq!(notified.count(), 4);
    info!("🪝️ test complete");
}

#[test]
fn on_order_status_changed() {
    let rt = Runtime::new().unwrap();
    let event = HookCalled::default();
    let event_copy = event.clone();
    rt.block_on(async move {
        let mut hooks = EventHooks::default();
        hooks.on_order_status_changed(move |ev| {
            info!("🪝️ Order #{} moved from {} to {}", ev.order.id, ev.old_status, ev.order.status);
            event_copy.called();
            Box::pin(async {}) as HookFuture
        });
        let (api, tasks) = setup(hooks).await;
        let db = api.db().clone();
        let cat = seed::category(&db, "snacks").await;
        let chips = seed::good(&db, cat.id, "Chips", "2.99", 10).await;
        let alice = seed::account(&db, "alice").await;
        let mut cart = Cart::new();
        cart.add(chips.id, 1);
        let order = api.checkout(&mut cart, Customer::Authenticated(alice.id)).await.unwrap().order.order;
        api.modify_status_for_order(order.id, OrderStatusType::Confirmed).await.unwrap();
        // Refused transitions are not published
        assert!(api.modify_status_for_order(order.id, OrderStatusType::Delivered).await.is_err());
        api.modify_status_for_order(order.id, OrderStatusType::Cancelled).await.unwrap();
        tear_down(api, tasks).await;
    });
    assert_eq!(event.count(), 2);
    info!("🪝️ test complete");
}
