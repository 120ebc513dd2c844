use super::GoodQueryFilter;
use crate::{
    db_types::{Category, Good, NewCategory, NewGood},
    store_api::errors::CatalogApiError,
};

/// Read and write access to categories and goods.
///
/// Stock counts are *not* written through this trait. Every stock write has to run the restock trigger in the same
/// transaction, so it lives in [`super::StorefrontDatabase::update_stock`].
#[allow(async_fn_in_trait)]
pub trait CatalogManagement {
    async fn fetch_good(&self, id: i64) -> Result<Option<Good>, CatalogApiError>;

    async fn fetch_good_by_slug(&self, slug: &str) -> Result<Option<Good>, CatalogApiError>;

    /// Fetches the goods matching `filter`, ordered by id.
    async fn fetch_goods(&self, filter: GoodQueryFilter) -> Result<Vec<Good>, CatalogApiError>;

    async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError>;

    async fn fetch_category_by_slug(&self, slug: &str) -> Result<Option<Category>, CatalogApiError>;

    /// All categories, ordered by name.
    async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogApiError>;

    /// Stores a new category. A slug collision is reported as [`CatalogApiError::DuplicateSlug`].
    async fn insert_category(&self, category: NewCategory) -> Result<Category, CatalogApiError>;

    /// Stores a new good. A slug collision is reported as [`CatalogApiError::DuplicateSlug`] and an unknown category as
    /// [`CatalogApiError::CategoryNotFound`].
    async fn insert_good(&self, good: NewGood) -> Result<Good, CatalogApiError>;
}
