use log::{debug, trace};
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db::{sqlite::SqliteDatabaseError, traits::GoodQueryFilter},
    db_types::{Category, Good, NewCategory, NewGood},
};

const GOOD_COLUMNS: &str =
    "id, slug, name, price, count, photo, description, category_id, created_at, updated_at";

pub async fn fetch_good(id: i64, conn: &mut SqliteConnection) -> Result<Option<Good>, SqliteDatabaseError> {
    let good = sqlx::query_as::<_, Good>(&format!("SELECT {GOOD_COLUMNS} FROM goods WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(good)
}

pub async fn fetch_good_by_slug(slug: &str, conn: &mut SqliteConnection) -> Result<Option<Good>, SqliteDatabaseError> {
    let good = sqlx::query_as::<_, Good>(&format!("SELECT {GOOD_COLUMNS} FROM goods WHERE slug = $1"))
        .bind(slug)
        .fetch_optional(conn)
        .await?;
    Ok(good)
}

/// Fetches goods according to criteria specified in the `GoodQueryFilter`, ordered by id.
pub async fn fetch_goods(
    filter: GoodQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<Good>, SqliteDatabaseError> {
    let mut builder = QueryBuilder::new(format!("SELECT {GOOD_COLUMNS} FROM goods "));
    if !filter.is_empty() {
        builder.push("WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(category_id) = filter.category_id {
        where_clause.push("category_id = ");
        where_clause.push_bind_unseparated(category_id);
    }
    if !filter.ids.is_empty() {
        where_clause.push("id IN (");
        for (i, id) in filter.ids.iter().enumerate() {
            if i > 0 {
                where_clause.push_unseparated(", ");
            }
            where_clause.push_bind_unseparated(*id);
        }
        where_clause.push_unseparated(")");
    }
    if filter.in_stock {
        where_clause.push("count > 0");
    }
    builder.push(" ORDER BY id ASC");
    trace!("🗃️ Executing query: {}", builder.sql());
    let goods = builder.build_query_as::<Good>().fetch_all(conn).await?;
    trace!("🗃️ Result of fetch_goods: {}", goods.len());
    Ok(goods)
}

pub async fn insert_good(good: NewGood, conn: &mut SqliteConnection) -> Result<Good, SqliteDatabaseError> {
    let slug = good.slug.clone();
    let category_id = good.category_id;
    if good.count < 0 {
        return Err(SqliteDatabaseError::NegativeStock(good.count));
    }
    let good = sqlx::query_as::<_, Good>(&format!(
        r#"
            INSERT INTO goods (slug, name, price, count, photo, description, category_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {GOOD_COLUMNS};
        "#
    ))
    .bind(good.slug)
    .bind(good.name)
    .bind(good.price)
    .bind(good.count)
    .bind(good.photo)
    .bind(good.description)
    .bind(good.category_id)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        SqliteDatabaseError::classify(
            e,
            || SqliteDatabaseError::DuplicateSlug(slug),
            || SqliteDatabaseError::CategoryNotFound(category_id),
        )
    })?;
    debug!("🗃️ Good #{} ({}) has been saved in the DB", good.id, good.slug);
    Ok(good)
}

/// Overwrites the stock count of a good. Returns `None` if the good does not exist. This is not atomic on its own;
/// callers that need the previous count should run it inside a transaction with [`fetch_good`].
pub async fn set_stock(id: i64, count: i64, conn: &mut SqliteConnection) -> Result<Option<Good>, SqliteDatabaseError> {
    if count < 0 {
        return Err(SqliteDatabaseError::NegativeStock(count));
    }
    let good = sqlx::query_as::<_, Good>(&format!(
        "UPDATE goods SET count = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING {GOOD_COLUMNS}"
    ))
    .bind(count)
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(good)
}

/// Takes up to `wanted` units of the good out of stock and returns `(previous_count, taken)`.
///
/// The decrement only applies if the count is still the one that was read, so two checkouts racing for the same good
/// can never both take the last unit. If the count changed in between, it is re-read and the decrement retried.
/// Returns `None` if the good does not exist.
pub async fn take_stock(
    id: i64,
    wanted: i64,
    conn: &mut SqliteConnection,
) -> Result<Option<(i64, i64)>, SqliteDatabaseError> {
    loop {
        let observed: Option<i64> =
            sqlx::query_scalar("SELECT count FROM goods WHERE id = $1").bind(id).fetch_optional(&mut *conn).await?;
        let Some(observed) = observed else {
            return Ok(None);
        };
        let taken = wanted.min(observed).max(0);
        let result = sqlx::query(
            "UPDATE goods SET count = count - $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 AND count = $3",
        )
        .bind(taken)
        .bind(id)
        .bind(observed)
        .execute(&mut *conn)
        .await?;
        if result.rows_affected() == 1 {
            return Ok(Some((observed, taken)));
        }
        debug!("🗃️ Stock for good #{id} changed while it was being reserved. Retrying.");
    }
}

pub async fn fetch_category(id: i64, conn: &mut SqliteConnection) -> Result<Option<Category>, SqliteDatabaseError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, slug, name, photo, created_at, updated_at FROM categories WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(category)
}

pub async fn fetch_category_by_slug(
    slug: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Category>, SqliteDatabaseError> {
    let category = sqlx::query_as::<_, Category>(
        "SELECT id, slug, name, photo, created_at, updated_at FROM categories WHERE slug = $1",
    )
    .bind(slug)
    .fetch_optional(conn)
    .await?;
    Ok(category)
}

pub async fn fetch_categories(conn: &mut SqliteConnection) -> Result<Vec<Category>, SqliteDatabaseError> {
    let categories = sqlx::query_as::<_, Category>(
        "SELECT id, slug, name, photo, created_at, updated_at FROM categories ORDER BY name ASC, id ASC",
    )
    .fetch_all(conn)
    .await?;
    Ok(categories)
}

pub async fn insert_category(
    category: NewCategory,
    conn: &mut SqliteConnection,
) -> Result<Category, SqliteDatabaseError> {
    let slug = category.slug.clone();
    let category = sqlx::query_as::<_, Category>(
        r#"
            INSERT INTO categories (slug, name, photo) VALUES ($1, $2, $3)
            RETURNING id, slug, name, photo, created_at, updated_at;
        "#,
    )
    .bind(category.slug)
    .bind(category.name)
    .bind(category.photo)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        SqliteDatabaseError::classify(e, || SqliteDatabaseError::DuplicateSlug(slug.clone()), || {
            SqliteDatabaseError::QueryError(format!("Could not create category {slug}"))
        })
    })?;
    debug!("🗃️ Category #{} ({}) has been saved in the DB", category.id, category.slug);
    Ok(category)
}
