use std::fmt::Debug;

use log::*;
use sqlx::{migrate, SqlitePool};

use super::{accounts, catalog, db_url, new_pool, notifications, orders, sessions, SqliteDatabaseError};
use crate::{
    db::traits::{
        AccountManagement,
        CatalogManagement,
        GoodQueryFilter,
        NotificationManagement,
        OrderManagement,
        SessionManagement,
        StorefrontDatabase,
    },
    db_types::{
        Account,
        Category,
        Good,
        NewAccount,
        NewCategory,
        NewGood,
        Notification,
        Order,
        OrderDetail,
        OrderLine,
        OrderStatusType,
        PasswordHash,
        ProfileUpdate,
        RestockPolicy,
        Session,
        SessionId,
    },
    store_api::{
        errors::{
            AccountApiError,
            CatalogApiError,
            CheckoutError,
            NotificationApiError,
            OrderFlowError,
            SessionApiError,
        },
        order_objects::{CheckoutAccount, CheckoutOutcome, StockAdjustment, StockUpdate},
    },
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `STOREFRONT_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, SqliteDatabaseError> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    /// Brings the schema up to date using the migrations embedded in this crate.
    pub async fn migrate(&self) -> Result<(), SqliteDatabaseError> {
        migrate!("./src/db/sqlite/migrations")
            .run(&self.pool)
            .await
            .map_err(|e| SqliteDatabaseError::QueryError(format!("Migration failed: {e}")))?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl StorefrontDatabase for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn process_checkout(
        &self,
        account: CheckoutAccount,
        lines: &[(i64, i64)],
        policy: RestockPolicy,
    ) -> Result<CheckoutOutcome, CheckoutError> {
        let mut tx = self.pool.begin().await?;
        // Whichever insert comes first takes the write lock for the whole transaction.
        let account_id = match account {
            CheckoutAccount::Existing(id) => id,
            CheckoutAccount::Create(new_account) => accounts::insert_account(new_account, &mut tx).await?.id,
        };
        let order = orders::insert_order(account_id, &mut tx).await?;
        let mut items = Vec::with_capacity(lines.len());
        let mut adjustments = Vec::new();
        let mut restocks = Vec::new();
        for &(good_id, requested) in lines {
            let Some(good) = catalog::fetch_good(good_id, &mut tx).await? else {
                warn!("📦️ Good #{good_id} in the cart no longer exists. Checkout for order #{} aborted.", order.id);
                return Err(CheckoutError::GoodNotFound(good_id));
            };
            let (previous, taken) =
                catalog::take_stock(good_id, requested, &mut tx).await?.ok_or(CheckoutError::GoodNotFound(good_id))?;
            if taken < requested {
                debug!("📦️ Only {taken} of {requested} x '{}' could be filled for order #{}", good.name, order.id);
                adjustments.push(StockAdjustment {
                    good_id,
                    name: good.name.clone(),
                    requested,
                    fulfilled: taken,
                });
            }
            let good = Good { count: previous - taken, ..good };
            if let Some(restock) = notifications::on_restock(&good, previous, policy, &mut tx).await? {
                restocks.push(restock);
            }
            if taken > 0 {
                let item = orders::insert_order_item(order.id, good_id, taken, &mut tx).await?;
                items.push(OrderLine {
                    item_id: item.id,
                    good_id,
                    name: good.name.clone(),
                    slug: good.slug.clone(),
                    unit_price: good.price,
                    quantity: taken,
                    line_total: good.price * taken,
                });
            }
        }
        if items.is_empty() {
            info!("📦️ Nothing in the cart for order #{} was in stock. Rolling back.", order.id);
            tx.rollback().await?;
            return Err(CheckoutError::OutOfStock(adjustments));
        }
        tx.commit().await?;
        info!("📦️ Order #{} for account #{account_id} saved with {} items", order.id, items.len());
        Ok(CheckoutOutcome { account_id, order: OrderDetail::new(order, items), adjustments, restocks })
    }

    async fn update_stock(
        &self,
        good_id: i64,
        count: i64,
        policy: RestockPolicy,
    ) -> Result<StockUpdate, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        // Write first, so that this transaction holds the write lock before the previous count is read.
        let touched = sqlx::query("UPDATE goods SET updated_at = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(good_id)
            .execute(&mut *tx)
            .await?;
        if touched.rows_affected() == 0 {
            return Err(CatalogApiError::GoodNotFound(good_id));
        }
        let previous_count =
            catalog::fetch_good(good_id, &mut tx).await?.map(|g| g.count).ok_or(CatalogApiError::GoodNotFound(good_id))?;
        let good = catalog::set_stock(good_id, count, &mut tx).await?.ok_or(CatalogApiError::GoodNotFound(good_id))?;
        let restock = notifications::on_restock(&good, previous_count, policy, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Stock for good #{good_id} set from {previous_count} to {count}");
        Ok(StockUpdate { good, previous_count, restock })
    }

    async fn close(&mut self) -> Result<(), sqlx::Error> {
        self.pool.close().await;
        Ok(())
    }
}

impl CatalogManagement for SqliteDatabase {
    async fn fetch_good(&self, id: i64) -> Result<Option<Good>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_good(id, &mut conn).await?)
    }

    async fn fetch_good_by_slug(&self, slug: &str) -> Result<Option<Good>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_good_by_slug(slug, &mut conn).await?)
    }

    async fn fetch_goods(&self, filter: GoodQueryFilter) -> Result<Vec<Good>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_goods(filter, &mut conn).await?)
    }

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_category(id, &mut conn).await?)
    }

    async fn fetch_category_by_slug(&self, slug: &str) -> Result<Option<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_category_by_slug(slug, &mut conn).await?)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(catalog::fetch_categories(&mut conn).await?)
    }

    async fn insert_category(&self, category: NewCategory) -> Result<Category, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let category = catalog::insert_category(category, &mut tx).await?;
        tx.commit().await?;
        Ok(category)
    }

    async fn insert_good(&self, good: NewGood) -> Result<Good, CatalogApiError> {
        let mut tx = self.pool.begin().await?;
        let good = catalog::insert_good(good, &mut tx).await?;
        tx.commit().await?;
        Ok(good)
    }
}

impl AccountManagement for SqliteDatabase {
    async fn fetch_account(&self, account_id: i64) -> Result<Option<Account>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(accounts::fetch_account(account_id, &mut conn).await?)
    }

    async fn fetch_account_by_username(&self, username: &str) -> Result<Option<Account>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(accounts::fetch_account_by_username(username, &mut conn).await?)
    }

    async fn insert_account(&self, account: NewAccount) -> Result<Account, AccountApiError> {
        let mut tx = self.pool.begin().await?;
        let account = accounts::insert_account(account, &mut tx).await?;
        tx.commit().await?;
        Ok(account)
    }

    async fn update_profile(&self, account_id: i64, update: ProfileUpdate) -> Result<Account, AccountApiError> {
        let mut tx = self.pool.begin().await?;
        let account = accounts::update_profile(account_id, update, &mut tx)
            .await?
            .ok_or(AccountApiError::AccountNotFound(account_id))?;
        tx.commit().await?;
        Ok(account)
    }

    async fn update_password_hash(&self, account_id: i64, hash: PasswordHash) -> Result<(), AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(accounts::update_password_hash(account_id, hash, &mut conn).await?)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order(order_id, &mut conn).await?)
    }

    async fn fetch_orders_for_account(&self, account_id: i64) -> Result<Vec<Order>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_orders_for_account(account_id, &mut conn).await?)
    }

    async fn fetch_order_lines(&self, order_id: i64) -> Result<Vec<OrderLine>, OrderFlowError> {
        let mut conn = self.pool.acquire().await?;
        Ok(orders::fetch_order_lines(order_id, &mut conn).await?)
    }

    async fn update_order_status(&self, order_id: i64, status: OrderStatusType) -> Result<Order, OrderFlowError> {
        let mut tx = self.pool.begin().await?;
        let order =
            orders::update_order_status(order_id, status, &mut tx).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        tx.commit().await?;
        Ok(order)
    }
}

impl NotificationManagement for SqliteDatabase {
    async fn subscribe(&self, account_id: i64, good_id: i64) -> Result<bool, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::subscribe(account_id, good_id, &mut conn).await?)
    }

    async fn is_subscribed(&self, account_id: i64, good_id: i64) -> Result<bool, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::is_subscribed(account_id, good_id, &mut conn).await?)
    }

    async fn fetch_subscribers(&self, good_id: i64) -> Result<Vec<i64>, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::fetch_subscribers(good_id, &mut conn).await?)
    }

    async fn fetch_notifications_for_account(
        &self,
        account_id: i64,
    ) -> Result<Vec<Notification>, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::fetch_notifications_for_account(account_id, &mut conn).await?)
    }

    async fn count_unread_notifications(&self, account_id: i64) -> Result<i64, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::count_unread(account_id, &mut conn).await?)
    }

    async fn mark_notification_read(
        &self,
        account_id: i64,
        notification_id: i64,
    ) -> Result<bool, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::mark_read(account_id, notification_id, &mut conn).await?)
    }

    async fn mark_all_notifications_read(&self, account_id: i64) -> Result<u64, NotificationApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(notifications::mark_all_read(account_id, &mut conn).await?)
    }
}

impl SessionManagement for SqliteDatabase {
    async fn fetch_session(&self, id: &SessionId) -> Result<Option<Session>, SessionApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(sessions::fetch_session(id, &mut conn).await?)
    }

    async fn save_session(&self, session: &Session) -> Result<(), SessionApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(sessions::upsert_session(session, &mut conn).await?)
    }

    async fn delete_session(&self, id: &SessionId) -> Result<(), SessionApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(sessions::delete_session(id, &mut conn).await?)
    }

    async fn is_account_active(&self, account_id: i64) -> Result<bool, SessionApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(sessions::is_account_active(account_id, &mut conn).await?)
    }

    async fn purge_expired_sessions(&self) -> Result<u64, SessionApiError> {
        let mut conn = self.pool.acquire().await?;
        Ok(sessions::purge_expired(&mut conn).await?)
    }
}
