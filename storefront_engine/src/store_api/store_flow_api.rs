use std::fmt::Debug;

use log::*;

use crate::{
    cart::Cart,
    db::traits::{OrderManagement, StorefrontDatabase},
    db_types::{NewAccount, Order, OrderStatusType, RestockPolicy, MAX_STOCK},
    events::{EventProducers, OrderCreatedEvent, OrderStatusChangedEvent, StockReplenishedEvent},
    helpers::{
        unusable_password,
        validation::{validate_email, validate_phone_number, validate_username},
        ValidationErrors,
    },
    store_api::{
        errors::{CatalogApiError, CheckoutError, OrderFlowError},
        order_objects::{CheckoutAccount, CheckoutResult, Customer, GuestDetails, Restock, StockUpdate},
    },
};

/// `StoreFlowApi` is the primary API for the flows that change stock: checkout, restocking, and moving orders through
/// their statuses. It publishes the corresponding events once the database work has been committed.
pub struct StoreFlowApi<B> {
    db: B,
    producers: EventProducers,
    restock_policy: RestockPolicy,
}

impl<B> Debug for StoreFlowApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "StoreFlowApi ({:?})", self.restock_policy)
    }
}

impl<B> StoreFlowApi<B> {
    pub fn new(db: B, producers: EventProducers) -> Self {
        Self { db, producers, restock_policy: RestockPolicy::default() }
    }

    pub fn with_restock_policy(mut self, policy: RestockPolicy) -> Self {
        self.restock_policy = policy;
        self
    }

    pub fn restock_policy(&self) -> RestockPolicy {
        self.restock_policy
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> StoreFlowApi<B>
where B: StorefrontDatabase
{
    /// Turns the cart into an order for `customer`.
    ///
    /// Guests are given a new account made from their contact details. Lines that cannot be filled in full are
    /// shortened to the available stock and reported in [`CheckoutResult::adjustments`]. On success the cart is
    /// emptied; on any error it is left exactly as it was.
    pub async fn checkout(&self, cart: &mut Cart, customer: Customer) -> Result<CheckoutResult, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let account = match customer {
            Customer::Authenticated(id) => CheckoutAccount::Existing(id),
            Customer::Guest(details) => CheckoutAccount::Create(guest_account(details)?),
        };
        let lines = cart.items().collect::<Vec<_>>();
        let outcome = self.db.process_checkout(account, &lines, self.restock_policy).await?;
        cart.clear();
        info!(
            "📦️ Order #{} placed by account #{} ({} items, total {})",
            outcome.order.order.id,
            outcome.account_id,
            outcome.order.items.len(),
            outcome.order.total
        );
        self.call_order_created_hook(OrderCreatedEvent::new(outcome.order.clone(), outcome.adjustments.clone())).await;
        self.call_stock_replenished_hook(outcome.restocks).await;
        Ok(CheckoutResult { account_id: outcome.account_id, order: outcome.order, adjustments: outcome.adjustments })
    }

    /// Sets the stock count of a good. If the write counts as a restock, the good's subscribers are notified in the
    /// same transaction.
    pub async fn update_stock(&self, good_id: i64, count: i64) -> Result<StockUpdate, CatalogApiError> {
        if count < 0 {
            return Err(CatalogApiError::InvalidInput(format!("Stock count cannot be negative: {count}")));
        }
        if count > MAX_STOCK {
            return Err(CatalogApiError::InvalidInput(format!("Stock count cannot be more than {MAX_STOCK}: {count}")));
        }
        let update = self.db.update_stock(good_id, count, self.restock_policy).await?;
        info!("📦️ Stock for good #{good_id} updated from {} to {count}", update.previous_count);
        if let Some(restock) = &update.restock {
            self.call_stock_replenished_hook(vec![restock.clone()]).await;
        }
        Ok(update)
    }

    async fn call_order_created_hook(&self, event: OrderCreatedEvent) {
        for emitter in &self.producers.order_created_producer {
            debug!("📦️ Notifying order created hook subscribers");
            emitter.publish_event(event.clone()).await;
        }
    }

    async fn call_stock_replenished_hook(&self, restocks: Vec<Restock>) {
        for emitter in &self.producers.stock_replenished_producer {
            for restock in &restocks {
                debug!("🔔️ Notifying stock replenished hook subscribers for good #{}", restock.good.id);
                emitter.publish_event(StockReplenishedEvent::from(restock.clone())).await;
            }
        }
    }
}

impl<B> StoreFlowApi<B>
where B: OrderManagement
{
    /// Moves an order to a new status. Only forward transitions are allowed (see
    /// [`OrderStatusType::can_transition_to`]).
    pub async fn modify_status_for_order(
        &self,
        order_id: i64,
        new_status: OrderStatusType,
    ) -> Result<Order, OrderFlowError> {
        let order = self.db.fetch_order(order_id).await?.ok_or(OrderFlowError::OrderNotFound(order_id))?;
        let old_status = order.status;
        if !old_status.can_transition_to(new_status) {
            warn!("📦️ Refusing to move order #{order_id} from {old_status} to {new_status}");
            return Err(OrderFlowError::ForbiddenStatusChange { from: old_status, to: new_status });
        }
        let order = self.db.update_order_status(order_id, new_status).await?;
        info!("📦️ Order #{order_id} moved from {old_status} to {new_status}");
        for emitter in &self.producers.order_status_changed_producer {
            emitter.publish_event(OrderStatusChangedEvent::new(order.clone(), old_status)).await;
        }
        Ok(order)
    }
}

fn guest_account(details: GuestDetails) -> Result<NewAccount, CheckoutError> {
    let username = details.username.trim().to_string();
    let email = details.email.trim().to_string();
    let phone = details.phone_number.trim().to_string();
    let mut errors = ValidationErrors::new();
    validate_username(&username, &mut errors);
    validate_email(&email, &mut errors);
    validate_phone_number(&phone, &mut errors);
    errors.into_result().map_err(CheckoutError::Validation)?;
    Ok(NewAccount::new(username, email, unusable_password()).with_contact_details(phone, details.address))
}
