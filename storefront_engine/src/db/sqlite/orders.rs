use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{Order, OrderItem, OrderLine, OrderStatusType},
};

/// Inserts a new order with status `pending_confirmation`. This is not atomic. You can embed this call inside a
/// transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_order(account_id: i64, conn: &mut SqliteConnection) -> Result<Order, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, Order>(
        r#"
            INSERT INTO orders (account_id, status) VALUES ($1, $2)
            RETURNING id, account_id, status, created_at, updated_at;
        "#,
    )
    .bind(account_id)
    .bind(OrderStatusType::PendingConfirmation)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        SqliteDatabaseError::classify(
            e,
            || SqliteDatabaseError::QueryError(format!("Duplicate order for account #{account_id}")),
            || SqliteDatabaseError::AccountNotFound(account_id),
        )
    })?;
    debug!("🗃️ Order #{} created for account #{account_id}", order.id);
    Ok(order)
}

pub async fn insert_order_item(
    order_id: i64,
    good_id: i64,
    quantity: i64,
    conn: &mut SqliteConnection,
) -> Result<OrderItem, SqliteDatabaseError> {
    let item = sqlx::query_as::<_, OrderItem>(
        r#"
            INSERT INTO order_items (order_id, good_id, quantity) VALUES ($1, $2, $3)
            RETURNING id, order_id, good_id, quantity, created_at;
        "#,
    )
    .bind(order_id)
    .bind(good_id)
    .bind(quantity)
    .fetch_one(conn)
    .await?;
    Ok(item)
}

pub async fn fetch_order(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, SqliteDatabaseError> {
    let order =
        sqlx::query_as::<_, Order>("SELECT id, account_id, status, created_at, updated_at FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;
    Ok(order)
}

/// The account's orders, newest first.
pub async fn fetch_orders_for_account(
    account_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, SqliteDatabaseError> {
    let orders = sqlx::query_as::<_, Order>(
        r#"
            SELECT id, account_id, status, created_at, updated_at FROM orders
            WHERE account_id = $1
            ORDER BY created_at DESC, id DESC;
        "#,
    )
    .bind(account_id)
    .fetch_all(conn)
    .await?;
    Ok(orders)
}

/// The order's items joined with their goods. Line totals use the goods' current prices.
pub async fn fetch_order_lines(
    order_id: i64,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderLine>, SqliteDatabaseError> {
    let lines = sqlx::query_as::<_, OrderLine>(
        r#"
            SELECT
                order_items.id AS item_id,
                goods.id AS good_id,
                goods.name AS name,
                goods.slug AS slug,
                goods.price AS unit_price,
                order_items.quantity AS quantity,
                goods.price * order_items.quantity AS line_total
            FROM order_items JOIN goods ON goods.id = order_items.good_id
            WHERE order_items.order_id = $1
            ORDER BY order_items.id ASC;
        "#,
    )
    .bind(order_id)
    .fetch_all(conn)
    .await?;
    Ok(lines)
}

pub async fn update_order_status(
    id: i64,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, SqliteDatabaseError> {
    let order = sqlx::query_as::<_, Order>(
        r#"
            UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2
            RETURNING id, account_id, status, created_at, updated_at;
        "#,
    )
    .bind(status)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
