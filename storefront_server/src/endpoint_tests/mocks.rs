use mockall::mock;
use storefront_engine::{
    db_types::{Category, Good, NewCategory, NewGood, Session, SessionId},
    CatalogApiError,
    CatalogManagement,
    GoodQueryFilter,
    SessionApiError,
    SessionManagement,
};

mock! {
    pub Catalog {}
    impl CatalogManagement for Catalog {
        async fn fetch_good(&self, id: i64) -> Result<Option<Good>, CatalogApiError>;
        async fn fetch_good_by_slug(&self, slug: &str) -> Result<Option<Good>, CatalogApiError>;
        async fn fetch_goods(&self, filter: GoodQueryFilter) -> Result<Vec<Good>, CatalogApiError>;
        async fn fetch_category(&self, id: i64) -> Result<Option<Category>, CatalogApiError>;
        async fn fetch_category_by_slug(&self, slug: &str) -> Result<Option<Category>, CatalogApiError>;
        async fn fetch_categories(&self) -> Result<Vec<Category>, CatalogApiError>;
        async fn insert_category(&self, category: NewCategory) -> Result<Category, CatalogApiError>;
        async fn insert_good(&self, good: NewGood) -> Result<Good, CatalogApiError>;
    }
    impl SessionManagement for Catalog {
        async fn fetch_session(&self, id: &SessionId) -> Result<Option<Session>, SessionApiError>;
        async fn save_session(&self, session: &Session) -> Result<(), SessionApiError>;
        async fn delete_session(&self, id: &SessionId) -> Result<(), SessionApiError>;
        async fn is_account_active(&self, account_id: i64) -> Result<bool, SessionApiError>;
        async fn purge_expired_sessions(&self) -> Result<u64, SessionApiError>;
    }
}
