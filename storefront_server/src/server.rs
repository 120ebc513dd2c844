use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use storefront_engine::{
    events::{EventHandlers, EventHooks, EventProducers},
    AccountApi,
    AccountManagement,
    AuthApi,
    CartApi,
    CatalogApi,
    CatalogManagement,
    NotificationApi,
    NotificationManagement,
    OrderManagement,
    SessionApi,
    SessionManagement,
    SqliteDatabase,
    StoreFlowApi,
    StorefrontDatabase,
};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    expiry_worker::start_expiry_worker,
    routes::{
        health,
        AddToCartRoute,
        AdminCreateCategoryRoute,
        AdminCreateGoodRoute,
        AdminUpdateOrderStatusRoute,
        AdminUpdateStockRoute,
        CartDecreaseRoute,
        CartIncreaseRoute,
        CartRemoveRoute,
        CartRoute,
        CategoriesRoute,
        CategoryRoute,
        ChangePasswordFormRoute,
        ChangePasswordRoute,
        CheckoutFormRoute,
        CheckoutRoute,
        EditProfileRoute,
        GoodDetailRoute,
        IndexRoute,
        LoginFormRoute,
        LoginRoute,
        LogoutRoute,
        MarkAllNotificationsReadRoute,
        MarkNotificationReadRoute,
        NotificationsRoute,
        NotifyAvailabilityRoute,
        OrderDetailRoute,
        ProfileRoute,
        RegisterRoute,
    },
    session::SessionStore,
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, config.max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.migrate().await.map_err(|e| ServerError::InitializeError(format!("Could not run migrations. {e}")))?;
    bootstrap_staff_account(&config, db.clone()).await?;
    let handlers = EventHandlers::new(config.event_buffer, logging_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;
    let _worker = start_expiry_worker(db.clone(), config.session.ttl);
    let srv = create_server_instance(config, db, producers)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Creates the staff account named in the configuration, if there is one and it does not exist yet.
async fn bootstrap_staff_account(config: &ServerConfig, db: SqliteDatabase) -> Result<(), ServerError> {
    let Some(admin) = &config.admin else {
        info!("👤️ No admin credentials configured. Skipping the staff account bootstrap.");
        return Ok(());
    };
    let auth = AuthApi::new(db);
    let account = auth
        .ensure_staff_account(&admin.username, &admin.password)
        .await
        .map_err(|e| ServerError::InitializeError(format!("Could not create the staff account. {e}")))?;
    info!("👤️ Staff account '{}' (#{}) is ready", account.username, account.id);
    Ok(())
}

/// The server does not deliver notifications anywhere yet, so the hooks just log what happened.
fn logging_hooks() -> EventHooks {
    let mut hooks = EventHooks::default();
    hooks
        .on_order_created(|ev| {
            Box::pin(async move {
                info!(
                    "📬️ Order #{} created for account #{} ({} lines, {} short)",
                    ev.order.order.id,
                    ev.order.order.account_id,
                    ev.order.items.len(),
                    ev.adjustments.len()
                );
            })
        })
        .on_stock_replenished(|ev| {
            Box::pin(async move {
                info!(
                    "🔔️ '{}' restocked ({} → {}). {} subscribers notified.",
                    ev.good.name,
                    ev.previous_count,
                    ev.good.count,
                    ev.notifications.len()
                );
            })
        })
        .on_order_status_changed(|ev| {
            Box::pin(async move {
                info!("📬️ Order #{} moved from {} to {}", ev.order.id, ev.old_status, ev.order.status);
            })
        });
    hooks
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    producers: EventProducers,
) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("storefront::access_log"))
            .configure(|cfg| configure_app_data(cfg, db.clone(), producers.clone(), &config))
            .configure(configure_routes::<SqliteDatabase>)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}

/// Registers the engine APIs and the session store as application data. Handlers pick these up as `web::Data<_>`.
pub fn configure_app_data<B>(cfg: &mut web::ServiceConfig, db: B, producers: EventProducers, config: &ServerConfig)
where B: StorefrontDatabase
        + CatalogManagement
        + AccountManagement
        + NotificationManagement
        + SessionManagement
        + 'static {
    let flow_api = StoreFlowApi::new(db.clone(), producers).with_restock_policy(config.restock_policy);
    let sessions = SessionStore::new(SessionApi::new(db.clone(), config.session.ttl), config.session.clone());
    cfg.app_data(web::Data::new(CatalogApi::new(db.clone())))
        .app_data(web::Data::new(CartApi::new(db.clone())))
        .app_data(web::Data::new(AccountApi::new(db.clone())))
        .app_data(web::Data::new(AuthApi::new(db.clone())))
        .app_data(web::Data::new(NotificationApi::new(db)))
        .app_data(web::Data::new(flow_api))
        .app_data(web::Data::new(sessions));
}

pub fn configure_routes<B>(cfg: &mut web::ServiceConfig)
where B: StorefrontDatabase
        + CatalogManagement
        + AccountManagement
        + OrderManagement
        + NotificationManagement
        + SessionManagement
        + 'static {
    let admin_scope = web::scope("/admin")
        .service(AdminCreateCategoryRoute::<B>::new())
        .service(AdminCreateGoodRoute::<B>::new())
        .service(AdminUpdateStockRoute::<B>::new())
        .service(AdminUpdateOrderStatusRoute::<B>::new());
    cfg.service(health)
        .service(IndexRoute::<B>::new())
        .service(GoodDetailRoute::<B>::new())
        .service(CategoryRoute::<B>::new())
        .service(CategoriesRoute::<B>::new())
        .service(CartRoute::<B>::new())
        .service(AddToCartRoute::<B>::new())
        .service(CartIncreaseRoute::<B>::new())
        .service(CartDecreaseRoute::<B>::new())
        .service(CartRemoveRoute::<B>::new())
        .service(CheckoutFormRoute::<B>::new())
        .service(CheckoutRoute::<B>::new())
        .service(OrderDetailRoute::<B>::new())
        .service(LoginFormRoute::<B>::new())
        .service(LoginRoute::<B>::new())
        .service(RegisterRoute::<B>::new())
        .service(LogoutRoute::<B>::new())
        .service(ProfileRoute::<B>::new())
        .service(EditProfileRoute::<B>::new())
        .service(ChangePasswordFormRoute::<B>::new())
        .service(ChangePasswordRoute::<B>::new())
        .service(NotifyAvailabilityRoute::<B>::new())
        .service(NotificationsRoute::<B>::new())
        .service(MarkAllNotificationsReadRoute::<B>::new())
        .service(MarkNotificationReadRoute::<B>::new())
        .service(admin_scope);
}
