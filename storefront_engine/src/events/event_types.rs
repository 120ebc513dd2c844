use serde::{Deserialize, Serialize};

use crate::{
    db_types::{Good, Notification, Order, OrderDetail, OrderStatusType},
    store_api::order_objects::{Restock, StockAdjustment},
};

/// A checkout committed a new order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreatedEvent {
    pub order: OrderDetail,
    pub adjustments: Vec<StockAdjustment>,
}

impl OrderCreatedEvent {
    pub fn new(order: OrderDetail, adjustments: Vec<StockAdjustment>) -> Self {
        Self { order, adjustments }
    }
}

/// A stock write counted as a restock, and `notifications` were created for the good's subscribers. A delivery
/// mechanism (e-mail, push, ...) can hook in here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReplenishedEvent {
    pub good: Good,
    pub previous_count: i64,
    pub notifications: Vec<Notification>,
}

impl From<Restock> for StockReplenishedEvent {
    fn from(restock: Restock) -> Self {
        Self { good: restock.good, previous_count: restock.previous_count, notifications: restock.notifications }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusChangedEvent {
    pub order: Order,
    pub old_status: OrderStatusType,
}

impl OrderStatusChangedEvent {
    pub fn new(order: Order, old_status: OrderStatusType) -> Self {
        Self { order, old_status }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    OrderCreated(OrderCreatedEvent),
    StockReplenished(StockReplenishedEvent),
    OrderStatusChanged(OrderStatusChangedEvent),
}
