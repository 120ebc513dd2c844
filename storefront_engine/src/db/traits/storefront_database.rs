use crate::{
    db_types::RestockPolicy,
    store_api::{
        errors::{CatalogApiError, CheckoutError},
        order_objects::{CheckoutAccount, CheckoutOutcome, StockUpdate},
    },
};

/// This trait defines the transactional flows a storefront backend has to support. Each method runs as a single
/// atomic transaction: either everything it describes happens, or nothing does.
#[allow(async_fn_in_trait)]
pub trait StorefrontDatabase: Clone {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Converts cart lines into an order, in a single atomic transaction:
    /// * resolves the account, creating it first if it is a guest. The first statement is a write, so the transaction
    ///   holds the write lock from the start.
    /// * creates an order with status `pending_confirmation`.
    /// * for each `(good_id, quantity)` line, in order, decrements the good's stock by as much of `quantity` as is
    ///   available and adds an order item for the fulfilled amount. A short line is recorded as a stock adjustment.
    ///   The decrement is conditional on the count not having changed since it was read, and is retried otherwise.
    /// * runs the restock trigger for every stock write, according to `policy`.
    ///
    /// A line for a good that does not exist aborts the checkout with [`CheckoutError::GoodNotFound`]. If no item at
    /// all could be fulfilled, the transaction is rolled back and [`CheckoutError::OutOfStock`] is returned.
    async fn process_checkout(
        &self,
        account: CheckoutAccount,
        lines: &[(i64, i64)],
        policy: RestockPolicy,
    ) -> Result<CheckoutOutcome, CheckoutError>;

    /// Sets a good's stock count and, in the same transaction, notifies its subscribers if the write counts as a
    /// restock under `policy`.
    async fn update_stock(&self, good_id: i64, count: i64, policy: RestockPolicy)
        -> Result<StockUpdate, CatalogApiError>;

    /// Closes the database connection.
    async fn close(&mut self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
