//! Browsing and curating the catalog.
use std::fmt::Debug;

use log::*;

use crate::{
    db::traits::{CatalogManagement, GoodQueryFilter},
    db_types::{Category, Good, NewCategory, NewGood, MAX_PRICE, MAX_STOCK},
    helpers::{is_valid_slug, slugify},
    store_api::{catalog_objects::CategoryGoods, errors::CatalogApiError},
};

pub struct CatalogApi<B> {
    db: B,
}

impl<B: Debug> Debug for CatalogApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CatalogApi ({:?})", self.db)
    }
}

impl<B> CatalogApi<B>
where B: CatalogManagement
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &B {
        &self.db
    }

    pub async fn good(&self, id: i64) -> Result<Good, CatalogApiError> {
        self.db.fetch_good(id).await?.ok_or(CatalogApiError::GoodNotFound(id))
    }

    pub async fn good_by_slug(&self, slug: &str) -> Result<Good, CatalogApiError> {
        self.db.fetch_good_by_slug(slug).await?.ok_or_else(|| CatalogApiError::GoodSlugNotFound(slug.to_string()))
    }

    /// All goods, ordered by id.
    pub async fn goods(&self) -> Result<Vec<Good>, CatalogApiError> {
        self.db.fetch_goods(GoodQueryFilter::default()).await
    }

    /// Goods whose name contains `query`, ignoring case. The query is trimmed first; an empty query matches every good.
    ///
    /// Matching is a linear scan over the catalog using Unicode lowercasing, so "ЧИПСИ" finds "Чипси".
    pub async fn search(&self, query: &str) -> Result<Vec<Good>, CatalogApiError> {
        let needle = query.trim().to_lowercase();
        let goods = self.goods().await?;
        if needle.is_empty() {
            return Ok(goods);
        }
        let matches = goods.into_iter().filter(|g| g.name.to_lowercase().contains(&needle)).collect::<Vec<_>>();
        trace!("🔍️ Search for '{needle}' matched {} goods", matches.len());
        Ok(matches)
    }

    pub async fn goods_in_category(&self, slug: &str) -> Result<CategoryGoods, CatalogApiError> {
        let category = self
            .db
            .fetch_category_by_slug(slug)
            .await?
            .ok_or_else(|| CatalogApiError::CategoryNotFound(slug.to_string()))?;
        let goods = self.db.fetch_goods(GoodQueryFilter::default().with_category_id(category.id)).await?;
        Ok(CategoryGoods { category, goods })
    }

    pub async fn categories(&self) -> Result<Vec<Category>, CatalogApiError> {
        self.db.fetch_categories().await
    }

    /// Adds a category. An empty slug is derived from the name.
    pub async fn create_category(&self, mut category: NewCategory) -> Result<Category, CatalogApiError> {
        category.name = category.name.trim().to_string();
        if category.name.is_empty() {
            return Err(CatalogApiError::InvalidInput("A category needs a name".into()));
        }
        if category.slug.trim().is_empty() {
            category.slug = slugify(&category.name);
        }
        if !is_valid_slug(&category.slug) {
            return Err(CatalogApiError::InvalidSlug(category.slug));
        }
        let category = self.db.insert_category(category).await?;
        info!("🗂️ Category '{}' created", category.slug);
        Ok(category)
    }

    /// Adds a good to an existing category. An empty slug is derived from the name.
    pub async fn create_good(&self, mut good: NewGood) -> Result<Good, CatalogApiError> {
        good.name = good.name.trim().to_string();
        if good.name.is_empty() {
            return Err(CatalogApiError::InvalidInput("A good needs a name".into()));
        }
        if good.price.is_negative() {
            return Err(CatalogApiError::InvalidInput(format!("Price cannot be negative: {}", good.price)));
        }
        if good.price > MAX_PRICE {
            return Err(CatalogApiError::InvalidInput(format!("Price cannot be more than {MAX_PRICE}: {}", good.price)));
        }
        if !(0..=MAX_STOCK).contains(&good.count) {
            return Err(CatalogApiError::InvalidInput(format!(
                "Stock count must be between 0 and {MAX_STOCK}: {}",
                good.count
            )));
        }
        if good.slug.trim().is_empty() {
            good.slug = slugify(&good.name);
        }
        if !is_valid_slug(&good.slug) {
            return Err(CatalogApiError::InvalidSlug(good.slug));
        }
        if self.db.fetch_category(good.category_id).await?.is_none() {
            return Err(CatalogApiError::CategoryNotFound(good.category_id.to_string()));
        }
        let good = self.db.insert_good(good).await?;
        info!("🗂️ Good '{}' created with {} in stock", good.slug, good.count);
        Ok(good)
    }
}
