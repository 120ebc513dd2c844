//! The shopping cart that lives inside a session.
//!
//! A cart is an ordered mapping of good id to requested quantity. It is a plain value: every operation here is a pure
//! function over the cart and knows nothing about the catalog. Lookups against stock (for `increase`) and pruning of
//! goods that no longer exist are the job of [`crate::CartApi`].
//!
//! Serialized, a cart is a JSON object with stringified good ids as keys, in the order the goods were first added:
//! `{"12": 2, "3": 1}`.
use std::fmt;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    entries: Vec<(i64, i64)>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The requested quantity for `good_id`, if the good is in the cart.
    pub fn quantity(&self, good_id: i64) -> Option<i64> {
        self.entries.iter().find(|(id, _)| *id == good_id).map(|(_, q)| *q)
    }

    pub fn contains(&self, good_id: i64) -> bool {
        self.quantity(good_id).is_some()
    }

    /// `(good_id, quantity)` pairs in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.entries.iter().copied()
    }

    /// Adds `quantity` units of the good, on top of any already in the cart. Stock is not consulted.
    pub fn add(&mut self, good_id: i64, quantity: i64) {
        match self.position(good_id) {
            Some(i) => self.entries[i].1 = self.entries[i].1.saturating_add(quantity),
            None => self.entries.push((good_id, quantity)),
        }
        self.prune();
    }

    /// Adds one unit, but never asks for more than `stock`. Goods that are not in the cart are left alone.
    /// Returns the new quantity, or `None` if the good is no longer in the cart.
    pub fn increase(&mut self, good_id: i64, stock: i64) -> Option<i64> {
        let i = self.position(good_id)?;
        let entry = &mut self.entries[i];
        entry.1 = entry.1.saturating_add(1).min(stock);
        self.prune();
        self.quantity(good_id)
    }

    /// Removes one unit. The entry is dropped once its quantity reaches zero.
    pub fn decrease(&mut self, good_id: i64) -> Option<i64> {
        let i = self.position(good_id)?;
        self.entries[i].1 = self.entries[i].1.saturating_sub(1);
        self.prune();
        self.quantity(good_id)
    }

    /// Removes the good entirely. Returns whether it was in the cart.
    pub fn remove(&mut self, good_id: i64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(id, _)| *id != good_id);
        before != self.entries.len()
    }

    /// Keeps only the entries for which `f` returns true.
    pub fn retain<F: FnMut(i64) -> bool>(&mut self, mut f: F) {
        self.entries.retain(|(id, _)| f(*id));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn position(&self, good_id: i64) -> Option<usize> {
        self.entries.iter().position(|(id, _)| *id == good_id)
    }

    fn prune(&mut self) {
        self.entries.retain(|(_, q)| *q > 0);
    }
}

impl FromIterator<(i64, i64)> for Cart {
    fn from_iter<T: IntoIterator<Item = (i64, i64)>>(iter: T) -> Self {
        let mut cart = Cart::new();
        for (id, quantity) in iter {
            cart.add(id, quantity);
        }
        cart
    }
}

impl Serialize for Cart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, quantity) in &self.entries {
            map.serialize_entry(&id.to_string(), quantity)?;
        }
        map.end()
    }
}

struct CartVisitor;

impl<'de> Visitor<'de> for CartVisitor {
    type Value = Cart;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of good ids to quantities")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut cart = Cart::new();
        while let Some((key, quantity)) = access.next_entry::<String, i64>()? {
            let id = key.parse::<i64>().map_err(|_| serde::de::Error::custom(format!("invalid good id: {key}")))?;
            cart.add(id, quantity);
        }
        Ok(cart)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CartVisitor)
    }
}
