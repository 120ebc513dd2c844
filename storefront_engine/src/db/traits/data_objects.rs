/// Selects goods for [`super::CatalogManagement::fetch_goods`]. An empty filter selects every good.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoodQueryFilter {
    pub category_id: Option<i64>,
    pub ids: Vec<i64>,
    pub in_stock: bool,
}

impl GoodQueryFilter {
    pub fn with_category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_ids(mut self, ids: &[i64]) -> Self {
        self.ids.extend_from_slice(ids);
        self
    }

    pub fn in_stock_only(mut self) -> Self {
        self.in_stock = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.ids.is_empty() && !self.in_stock
    }
}
