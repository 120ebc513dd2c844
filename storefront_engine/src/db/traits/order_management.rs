use crate::{
    db_types::{Order, OrderLine, OrderStatusType},
    store_api::errors::OrderFlowError,
};

/// Queries and status updates for orders. Orders are only ever *created* by the checkout transaction in
/// [`super::StorefrontDatabase::process_checkout`].
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    async fn fetch_order(&self, order_id: i64) -> Result<Option<Order>, OrderFlowError>;

    /// The orders belonging to the account, newest first.
    async fn fetch_orders_for_account(&self, account_id: i64) -> Result<Vec<Order>, OrderFlowError>;

    /// The items of an order joined with their goods, in the order they were added.
    async fn fetch_order_lines(&self, order_id: i64) -> Result<Vec<OrderLine>, OrderFlowError>;

    /// Writes the new status unconditionally and returns the updated order. Transition rules are enforced by
    /// [`crate::StoreFlowApi::modify_status_for_order`], not here.
    async fn update_order_status(&self, order_id: i64, status: OrderStatusType) -> Result<Order, OrderFlowError>;
}
