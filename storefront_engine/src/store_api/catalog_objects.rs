use serde::{Deserialize, Serialize};

use crate::db_types::{Category, Good, Money};

/// A category together with its goods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGoods {
    pub category: Category,
    pub goods: Vec<Good>,
}

/// One line of a cart snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub good: Good,
    pub quantity: i64,
    pub line_total: Money,
}

/// The cart resolved against the catalog, in cart order. Goods that no longer exist are left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLine>,
    pub total: Money,
}

impl CartSnapshot {
    pub fn new(items: Vec<CartLine>) -> Self {
        let total = items.iter().map(|l| l.line_total).sum();
        Self { items, total }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
