//! Request handler definitions
//!
//! Define each route and its handler here. Every handler is generic over the storage backend, so the same handlers
//! serve SQLite in production and mocks in the endpoint tests.
//!
//! Handlers follow the same shape: load the session, call the engine APIs, and hand the session back to the
//! [`SessionStore`] along with the response, which saves it and sets the cookie. Page handlers return JSON (see
//! [`Page`]); form handlers redirect with `303 See Other` and leave flash messages for the next page.
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause the
//! current worker to stop processing new requests. Every database call here is async for that reason.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use storefront_engine::{
    account_objects::{PasswordChange, Registration},
    db_types::{Account, MessageLevel, NewCategory, NewGood},
    order_objects::Customer,
    AccountApi,
    AccountManagement,
    AuthApi,
    AuthApiError,
    CartApi,
    CatalogApi,
    CatalogManagement,
    CheckoutError,
    NotificationApi,
    NotificationManagement,
    OrderManagement,
    SessionManagement,
    StoreFlowApi,
    StorefrontDatabase,
};

use crate::{
    data_objects::{
        CartPage,
        CatalogPage,
        CategoriesPage,
        CategoryPage,
        CheckoutForm,
        CheckoutPage,
        EmptyPage,
        GoodPage,
        LoginForm,
        LoginPage,
        NextQuery,
        NotificationsPage,
        OrderPage,
        Page,
        ProfileForm,
        ProfilePage,
        SearchQuery,
        StatusUpdateRequest,
        StockUpdateRequest,
    },
    errors::ServerError,
    helpers::{login_url, safe_next, see_other},
    session::SessionStore,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:path),+) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };

    ($name:ident => $method:ident $path:literal impl $($bounds:path),+ where requires staff) => {
        paste::paste! { pub struct [<$name:camel Route>]<A>(core::marker::PhantomData<fn() -> A>);}
        paste::paste! { impl<A> [<$name:camel Route>]<A> {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(core::marker::PhantomData::<fn() -> A>)
            }
        }}
        paste::paste! { impl<A> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<A>
        where
            A: $($bounds +)+ storefront_engine::SessionManagement + storefront_engine::AccountManagement + 'static,
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::<A>)
                    .wrap($crate::middleware::StaffOnlyFactory::<A>::new());
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Catalog  ----------------------------------------------------
route!(index => Get "/" impl CatalogManagement, SessionManagement);
/// The catalog, optionally filtered by the `q` query parameter (case-insensitive substring of the good's name).
pub async fn index<B>(
    req: HttpRequest,
    query: web::Query<SearchQuery>,
    catalog: web::Data<CatalogApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + SessionManagement,
{
    let q = query.into_inner().q.filter(|q| !q.trim().is_empty());
    trace!("💻️ GET catalog. Search: {q:?}");
    let mut session = sessions.load(&req).await?;
    let goods = match &q {
        Some(q) => catalog.search(q).await?,
        None => catalog.goods().await?,
    };
    let page = Page::new(&mut session, CatalogPage { q, goods });
    sessions.respond(session, HttpResponse::Ok().json(page)).await
}

route!(good_detail => Get "/good/{id}" impl CatalogManagement, NotificationManagement, SessionManagement);
pub async fn good_detail<B>(
    req: HttpRequest,
    path: web::Path<i64>,
    catalog: web::Data<CatalogApi<B>>,
    notifications: web::Data<NotificationApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + NotificationManagement + SessionManagement,
{
    let id = path.into_inner();
    trace!("💻️ GET good #{id}");
    let mut session = sessions.load(&req).await?;
    let good = catalog.good(id).await?;
    let subscribed = match session.account_id() {
        Some(account_id) => notifications.is_subscribed(account_id, id).await?,
        None => false,
    };
    let page = Page::new(&mut session, GoodPage { good, subscribed });
    sessions.respond(session, HttpResponse::Ok().json(page)).await
}

route!(category => Get "/category/{slug}" impl CatalogManagement, SessionManagement);
pub async fn category<B>(
    req: HttpRequest,
    path: web::Path<String>,
    catalog: web::Data<CatalogApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + SessionManagement,
{
    let slug = path.into_inner();
    trace!("💻️ GET category '{slug}'");
    let mut session = sessions.load(&req).await?;
    let category = catalog.goods_in_category(&slug).await?;
    let page = Page::new(&mut session, CategoryPage { category });
    sessions.respond(session, HttpResponse::Ok().json(page)).await
}

route!(categories => Get "/categories" impl CatalogManagement, SessionManagement);
pub async fn categories<B>(
    req: HttpRequest,
    catalog: web::Data<CatalogApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    let categories = catalog.categories().await?;
    let page = Page::new(&mut session, CategoriesPage { categories });
    sessions.respond(session, HttpResponse::Ok().json(page)).await
}

//----------------------------------------------   Cart  ----------------------------------------------------
route!(cart => Get "/cart" impl CatalogManagement, SessionManagement);
/// The cart, resolved against the catalog. Goods that have been deleted since they were added are dropped here.
pub async fn cart<B>(
    req: HttpRequest,
    carts: web::Data<CartApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    let cart = carts.snapshot(session.cart_mut()).await?;
    let page = Page::new(&mut session, CartPage { cart });
    sessions.respond(session, HttpResponse::Ok().json(page)).await
}

route!(add_to_cart => Get "/add-to-cart/{id}" impl CatalogManagement, SessionManagement);
pub async fn add_to_cart<B>(
    req: HttpRequest,
    path: web::Path<i64>,
    carts: web::Data<CartApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + SessionManagement,
{
    let id = path.into_inner();
    let mut session = sessions.load(&req).await?;
    let good = carts.add(session.cart_mut(), id).await?;
    debug!("🛒️ '{}' added to a cart", good.name);
    session.add_message(MessageLevel::Success, format!("'{}' was added to your cart.", good.name));
    sessions.respond(session, see_other("/cart")).await
}

route!(cart_increase => Get "/cart/increase/{id}" impl CatalogManagement, SessionManagement);
pub async fn cart_increase<B>(
    req: HttpRequest,
    path: web::Path<i64>,
    carts: web::Data<CartApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + SessionManagement,
{
    let id = path.into_inner();
    let mut session = sessions.load(&req).await?;
    let before = session.cart().quantity(id);
    let after = carts.increase(session.cart_mut(), id).await?;
    if before.is_some() && before >= after {
        session.add_message(MessageLevel::Warning, "There is no more of this good in stock.");
    }
    sessions.respond(session, see_other("/cart")).await
}

route!(cart_decrease => Get "/cart/decrease/{id}" impl CatalogManagement, SessionManagement);
pub async fn cart_decrease<B>(
    req: HttpRequest,
    path: web::Path<i64>,
    carts: web::Data<CartApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + SessionManagement,
{
    let id = path.into_inner();
    let mut session = sessions.load(&req).await?;
    carts.decrease(session.cart_mut(), id).await?;
    sessions.respond(session, see_other("/cart")).await
}

route!(cart_remove => Get "/cart/remove/{id}" impl CatalogManagement, SessionManagement);
pub async fn cart_remove<B>(
    req: HttpRequest,
    path: web::Path<i64>,
    carts: web::Data<CartApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + SessionManagement,
{
    let id = path.into_inner();
    let mut session = sessions.load(&req).await?;
    carts.remove(session.cart_mut(), id);
    sessions.respond(session, see_other("/cart")).await
}

//----------------------------------------------   Orders  ----------------------------------------------------
route!(checkout_form => Get "/order" impl CatalogManagement, AccountManagement, SessionManagement);
/// The checkout page: the cart and, for signed-in customers, their contact details.
pub async fn checkout_form<B>(
    req: HttpRequest,
    carts: web::Data<CartApi<B>>,
    accounts: web::Data<AccountApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement + AccountManagement + SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    let cart = carts.snapshot(session.cart_mut()).await?;
    if cart.is_empty() {
        session.add_message(MessageLevel::Warning, "Your cart is empty!");
        return sessions.respond(session, see_other("/cart")).await;
    }
    let customer = match session.account_id() {
        Some(id) => accounts.account_by_id(id).await?,
        None => None,
    };
    let page = Page::new(&mut session, CheckoutPage { cart, customer });
    sessions.respond(session, HttpResponse::Ok().json(page)).await
}

route!(checkout => Post "/order" impl StorefrontDatabase, SessionManagement);
/// Turns the cart into an order. Signed-in customers order on their own account; guests submit contact details and
/// get an account made from them.
///
/// Lines that could not be filled in full are shortened and reported as warnings. A checkout that fails leaves the
/// cart as it was.
pub async fn checkout<B>(
    req: HttpRequest,
    form: web::Form<CheckoutForm>,
    flow: web::Data<StoreFlowApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: StorefrontDatabase + SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    let customer = match session.account_id() {
        Some(id) => Customer::Authenticated(id),
        None => Customer::Guest(form.into_inner().into()),
    };
    let signed_in = matches!(customer, Customer::Authenticated(_));
    let mut cart = session.cart().clone();
    let location = match flow.checkout(&mut cart, customer).await {
        Ok(result) => {
            *session.cart_mut() = cart;
            for adjustment in &result.adjustments {
                session.add_message(MessageLevel::Warning, adjustment.message());
            }
            let id = result.order.order.id;
            info!("📦️ Order #{id} placed through the storefront");
            session.add_message(MessageLevel::Success, format!("Thank you! Your order #{id} has been placed."));
            if signed_in {
                "/profile"
            } else {
                "/"
            }
        },
        Err(CheckoutError::EmptyCart) => {
            session.add_message(MessageLevel::Warning, "Your cart is empty!");
            "/cart"
        },
        Err(CheckoutError::OutOfStock(adjustments)) => {
            for adjustment in &adjustments {
                session.add_message(MessageLevel::Warning, adjustment.message());
            }
            session.add_message(MessageLevel::Error, "None of the goods in your cart are in stock.");
            "/cart"
        },
        Err(CheckoutError::DuplicateUsername(username)) => {
            session.add_message(
                MessageLevel::Error,
                format!("A user with the username '{username}' already exists. Please log in or choose another."),
            );
            "/order"
        },
        Err(CheckoutError::GoodNotFound(id)) => {
            warn!("📦️ Checkout refused. Good #{id} in the cart no longer exists.");
            session.add_message(MessageLevel::Error, "Some goods in your cart are no longer available.");
            "/cart"
        },
        Err(e) => return Err(e.into()),
    };
    sessions.respond(session, see_other(location)).await
}

route!(order_detail => Get "/order/{id}" impl AccountManagement, OrderManagement, SessionManagement);
/// An order of the signed-in account. Other accounts' orders are reported as not found.
pub async fn order_detail<B>(
    req: HttpRequest,
    path: web::Path<i64>,
    accounts: web::Data<AccountApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + OrderManagement + SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    let account_id = session.require_login(&req)?;
    let order = accounts.order_for_account(account_id, path.into_inner()).await?;
    let page = Page::new(&mut session, OrderPage { order });
    sessions.respond(session, HttpResponse::Ok().json(page)).await
}

//----------------------------------------------   Auth  ----------------------------------------------------
route!(login_form => Get "/login" impl SessionManagement);
pub async fn login_form<B>(
    req: HttpRequest,
    query: web::Query<NextQuery>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    let next = safe_next(query.next.as_deref());
    let page = Page::new(&mut session, LoginPage { next });
    sessions.respond(session, HttpResponse::Ok().json(page)).await
}

route!(login => Post "/login" impl AccountManagement, SessionManagement);
/// Checks the credentials and signs the account in on the current session, which keeps its cart. Success redirects
/// to `next` (if it is a local path) or the home page; failure goes back to the login page with an error.
pub async fn login<B>(
    req: HttpRequest,
    query: web::Query<NextQuery>,
    form: web::Form<LoginForm>,
    auth: web::Data<AuthApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + SessionManagement,
{
    let form = form.into_inner();
    let next = safe_next(form.next.as_deref().or(query.next.as_deref()));
    let mut session = sessions.load(&req).await?;
    match auth.authenticate(&form.username, &form.password).await {
        Ok(account) => {
            sessions.log_in(&mut session, account.id).await?;
            info!("🔑️ '{}' logged in", account.username);
            session.add_message(MessageLevel::Success, format!("Welcome back, {}!", account.display_name()));
            sessions.respond(session, see_other(&next)).await
        },
        Err(e @ (AuthApiError::InvalidCredentials | AuthApiError::AccountInactive)) => {
            debug!("🔑️ Login failed for '{}'. {e}", form.username);
            session.add_message(MessageLevel::Error, e.to_string());
            sessions.respond(session, see_other(&login_url(&next))).await
        },
        Err(e) => Err(e.into()),
    }
}

route!(register => Post "/register" impl AccountManagement, SessionManagement);
pub async fn register<B>(
    req: HttpRequest,
    form: web::Form<Registration>,
    auth: web::Data<AuthApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    let account = auth.register(form.into_inner()).await?;
    session.add_message(MessageLevel::Success, format!("Account '{}' was created. Please log in.", account.username));
    sessions.respond(session, see_other("/login")).await
}

route!(logout => Get "/logout" impl SessionManagement);
pub async fn logout<B>(req: HttpRequest, sessions: web::Data<SessionStore<B>>) -> Result<HttpResponse, ServerError>
where B: SessionManagement {
    let session = sessions.load(&req).await?;
    if let Some(id) = session.account_id() {
        info!("🔑️ Account #{id} logged out");
    }
    sessions.destroy(session, see_other("/")).await
}

//----------------------------------------------   Profile  ----------------------------------------------------
route!(profile => Get "/profile" impl AccountManagement, OrderManagement, NotificationManagement, CatalogManagement, SessionManagement);
/// The signed-in account with its orders (newest first) and the number of unread notifications.
pub async fn profile<B>(
    req: HttpRequest,
    accounts: web::Data<AccountApi<B>>,
    notifications: web::Data<NotificationApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + OrderManagement + NotificationManagement + CatalogManagement + SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    let account_id = session.require_login(&req)?;
    let account = accounts.account(account_id).await?;
    let orders = accounts.orders_for_account(account_id).await?;
    let unread_notifications = notifications.unread_count(account_id).await?;
    let page = Page::new(&mut session, ProfilePage { account, orders, unread_notifications });
    sessions.respond(session, HttpResponse::Ok().json(page)).await
}

route!(edit_profile => Post "/edit-profile" impl AccountManagement, SessionManagement);
pub async fn edit_profile<B>(
    req: HttpRequest,
    form: web::Form<ProfileForm>,
    accounts: web::Data<AccountApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    let account_id = session.require_login(&req)?;
    accounts.update_profile(account_id, form.into_inner().into()).await?;
    session.add_message(MessageLevel::Success, "Your profile has been updated.");
    sessions.respond(session, see_other("/profile")).await
}

route!(change_password_form => Get "/change-password" impl SessionManagement);
pub async fn change_password_form<B>(
    req: HttpRequest,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    session.require_login(&req)?;
    let page = Page::new(&mut session, EmptyPage {});
    sessions.respond(session, HttpResponse::Ok().json(page)).await
}

route!(change_password => Post "/change-password" impl AccountManagement, SessionManagement);
/// Changes the password after checking the current one. The current session stays signed in.
pub async fn change_password<B>(
    req: HttpRequest,
    form: web::Form<PasswordChange>,
    auth: web::Data<AuthApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: AccountManagement + SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    let account_id = session.require_login(&req)?;
    auth.change_password(account_id, form.into_inner()).await?;
    session.add_message(MessageLevel::Success, "Your password was changed.");
    sessions.respond(session, see_other("/profile")).await
}

//----------------------------------------------   Notifications  ----------------------------------------------------
route!(notify_availability => Get "/notify-availability/{good_id}" impl NotificationManagement, CatalogManagement, SessionManagement);
/// Subscribes the signed-in account to restock notifications for a good, then returns to the good's page.
pub async fn notify_availability<B>(
    req: HttpRequest,
    path: web::Path<i64>,
    notifications: web::Data<NotificationApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: NotificationManagement + CatalogManagement + SessionManagement,
{
    let good_id = path.into_inner();
    let mut session = sessions.load(&req).await?;
    let account_id = session.require_login(&req)?;
    let result = notifications.subscribe(account_id, good_id).await?;
    let text = if result.newly_subscribed {
        format!("We will let you know when '{}' is available again.", result.good.name)
    } else {
        format!("You are already waiting for '{}'.", result.good.name)
    };
    session.add_message(MessageLevel::Info, text);
    sessions.respond(session, see_other(&format!("/good/{good_id}"))).await
}

route!(notifications => Get "/notifications" impl NotificationManagement, CatalogManagement, SessionManagement);
pub async fn notifications<B>(
    req: HttpRequest,
    notifications: web::Data<NotificationApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: NotificationManagement + CatalogManagement + SessionManagement,
{
    let mut session = sessions.load(&req).await?;
    let account_id = session.require_login(&req)?;
    let notifications = notifications.notifications_for_account(account_id).await?;
    let page = Page::new(&mut session, NotificationsPage { notifications });
    sessions.respond(session, HttpResponse::Ok().json(page)).await
}

route!(mark_all_notifications_read => Post "/notifications/read" impl NotificationManagement, CatalogManagement, SessionManagement);
pub async fn mark_all_notifications_read<B>(
    req: HttpRequest,
    notifications: web::Data<NotificationApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: NotificationManagement + CatalogManagement + SessionManagement,
{
    let session = sessions.load(&req).await?;
    let account_id = session.require_login(&req)?;
    let count = notifications.mark_all_read(account_id).await?;
    debug!("🔔️ {count} notifications marked as read for account #{account_id}");
    sessions.respond(session, see_other("/notifications")).await
}

route!(mark_notification_read => Post "/notifications/{id}/read" impl NotificationManagement, CatalogManagement, SessionManagement);
pub async fn mark_notification_read<B>(
    req: HttpRequest,
    path: web::Path<i64>,
    notifications: web::Data<NotificationApi<B>>,
    sessions: web::Data<SessionStore<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: NotificationManagement + CatalogManagement + SessionManagement,
{
    let session = sessions.load(&req).await?;
    let account_id = session.require_login(&req)?;
    notifications.mark_read(account_id, path.into_inner()).await?;
    sessions.respond(session, see_other("/notifications")).await
}

//----------------------------------------------   Admin  ----------------------------------------------------
// These are mounted under the `/admin` scope.
route!(admin_create_category => Post "/categories" impl CatalogManagement where requires staff);
pub async fn admin_create_category<B>(
    staff: web::ReqData<Account>,
    body: web::Json<NewCategory>,
    catalog: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement,
{
    let category = catalog.create_category(body.into_inner()).await?;
    info!("🗂️ '{}' created category '{}'", staff.username, category.slug);
    Ok(HttpResponse::Created().json(category))
}

route!(admin_create_good => Post "/goods" impl CatalogManagement where requires staff);
pub async fn admin_create_good<B>(
    staff: web::ReqData<Account>,
    body: web::Json<NewGood>,
    catalog: web::Data<CatalogApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: CatalogManagement,
{
    let good = catalog.create_good(body.into_inner()).await?;
    info!("🗂️ '{}' created good '{}'", staff.username, good.slug);
    Ok(HttpResponse::Created().json(good))
}

route!(admin_update_stock => Post "/goods/{id}/stock" impl StorefrontDatabase where requires staff);
/// Sets a good's stock count. Subscribers are notified if the write counts as a restock.
pub async fn admin_update_stock<B>(
    staff: web::ReqData<Account>,
    path: web::Path<i64>,
    body: web::Json<StockUpdateRequest>,
    flow: web::Data<StoreFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: StorefrontDatabase,
{
    let good_id = path.into_inner();
    let update = flow.update_stock(good_id, body.count).await?;
    info!(
        "🗂️ '{}' set the stock of good #{good_id} from {} to {}",
        staff.username, update.previous_count, update.good.count
    );
    Ok(HttpResponse::Ok().json(update))
}

route!(admin_update_order_status => Post "/orders/{id}/status" impl StorefrontDatabase, OrderManagement where requires staff);
pub async fn admin_update_order_status<B>(
    staff: web::ReqData<Account>,
    path: web::Path<i64>,
    body: web::Json<StatusUpdateRequest>,
    flow: web::Data<StoreFlowApi<B>>,
) -> Result<HttpResponse, ServerError>
where
    B: StorefrontDatabase + OrderManagement,
{
    let order_id = path.into_inner();
    let order = flow.modify_status_for_order(order_id, body.status).await?;
    info!("🗂️ '{}' moved order #{order_id} to {}", staff.username, order.status);
    Ok(HttpResponse::Ok().json(order))
}
