//! Cart operations that need the catalog.
//!
//! The cart itself is a plain value held in the session (see [`crate::cart::Cart`]). These methods check the goods
//! involved and then mutate the cart in place; the caller saves the session once it is done.
use std::fmt::Debug;

use log::*;

use crate::{
    cart::Cart,
    db::traits::{CatalogManagement, GoodQueryFilter},
    db_types::{Good, Money},
    store_api::{
        catalog_objects::{CartLine, CartSnapshot},
        errors::CatalogApiError,
    },
};

pub struct CartApi<B> {
    db: B,
}

impl<B: Debug> Debug for CartApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CartApi ({:?})", self.db)
    }
}

impl<B> CartApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    async fn existing_good(&self, good_id: i64) -> Result<Good, CatalogApiError> {
        self.db.fetch_good(good_id).await?.ok_or(CatalogApiError::GoodNotFound(good_id))
    }

    /// Puts one more unit of the good in the cart. Stock is not checked here; checkout deals with shortages.
    pub async fn add(&self, cart: &mut Cart, good_id: i64) -> Result<Good, CatalogApiError> {
        self.add_quantity(cart, good_id, 1).await
    }

    pub async fn add_quantity(&self, cart: &mut Cart, good_id: i64, quantity: i64) -> Result<Good, CatalogApiError> {
        let good = self.existing_good(good_id).await?;
        cart.add(good_id, quantity);
        debug!("🛒️ Added {quantity} x good #{good_id}. Cart now holds {:?}", cart.quantity(good_id));
        Ok(good)
    }

    /// One more unit, capped at the good's current stock. Returns the new quantity, or `None` if the good is not in
    /// the cart (or dropped out because it is sold out).
    pub async fn increase(&self, cart: &mut Cart, good_id: i64) -> Result<Option<i64>, CatalogApiError> {
        let good = self.existing_good(good_id).await?;
        let quantity = cart.increase(good_id, good.count);
        debug!("🛒️ Increased good #{good_id} to {quantity:?} (stock {})", good.count);
        Ok(quantity)
    }

    /// One unit fewer. The entry is removed when it reaches zero.
    pub async fn decrease(&self, cart: &mut Cart, good_id: i64) -> Result<Option<i64>, CatalogApiError> {
        let _good = self.existing_good(good_id).await?;
        let quantity = cart.decrease(good_id);
        debug!("🛒️ Decreased good #{good_id} to {quantity:?}");
        Ok(quantity)
    }

    /// Removes the good from the cart. Unknown goods are not an error.
    pub fn remove(&self, cart: &mut Cart, good_id: i64) -> bool {
        let removed = cart.remove(good_id);
        debug!("🛒️ Removed good #{good_id} from the cart: {removed}");
        removed
    }

    /// Resolves the cart against the catalog. Entries for goods that no longer exist are dropped from `cart` as well
    /// as from the snapshot.
    pub async fn snapshot(&self, cart: &mut Cart) -> Result<CartSnapshot, CatalogApiError> {
        if cart.is_empty() {
            return Ok(CartSnapshot::default());
        }
        let ids = cart.items().map(|(id, _)| id).collect::<Vec<_>>();
        let goods = self.db.fetch_goods(GoodQueryFilter::default().with_ids(&ids)).await?;
        let before = cart.len();
        cart.retain(|id| goods.iter().any(|g| g.id == id));
        if cart.len() != before {
            info!("🛒️ Pruned {} goods that no longer exist from a cart", before - cart.len());
        }
        let mut items = Vec::with_capacity(cart.len());
        for (id, quantity) in cart.items() {
            let Some(good) = goods.iter().find(|g| g.id == id) else { continue };
            let line_total = good.price.checked_mul(quantity).ok_or_else(|| {
                warn!("🛒️ {quantity} x '{}' at {} is too large to total", good.name, good.price);
                CatalogApiError::InvalidInput(format!("The total for {quantity} x '{}' is too large", good.name))
            })?;
            items.push(CartLine { good: good.clone(), quantity, line_total });
        }
        let snapshot = CartSnapshot::new(items);
        if snapshot.items.iter().try_fold(Money::default(), |acc, l| acc.checked_add(l.line_total)).is_none() {
            warn!("🛒️ Cart total is too large to represent");
            return Err(CatalogApiError::InvalidInput("The cart total is too large".into()));
        }
        Ok(snapshot)
    }
}
