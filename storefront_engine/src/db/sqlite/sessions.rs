use chrono::Utc;
use sqlx::SqliteConnection;

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{Session, SessionId},
};

pub async fn fetch_session(id: &SessionId, conn: &mut SqliteConnection) -> Result<Option<Session>, SqliteDatabaseError> {
    let session =
        sqlx::query_as::<_, Session>("SELECT id, data, expires_at FROM sessions WHERE id = $1 AND expires_at > $2")
            .bind(id)
            .bind(Utc::now())
            .fetch_optional(conn)
            .await?;
    Ok(session)
}

pub async fn upsert_session(session: &Session, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    sqlx::query(
        r#"
            INSERT INTO sessions (id, data, expires_at) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET data = excluded.data, expires_at = excluded.expires_at;
        "#,
    )
    .bind(&session.id)
    .bind(&session.data)
    .bind(session.expires_at)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn delete_session(id: &SessionId, conn: &mut SqliteConnection) -> Result<(), SqliteDatabaseError> {
    sqlx::query("DELETE FROM sessions WHERE id = $1").bind(id).execute(conn).await?;
    Ok(())
}

pub async fn is_account_active(account_id: i64, conn: &mut SqliteConnection) -> Result<bool, SqliteDatabaseError> {
    let active = sqlx::query_scalar::<_, bool>("SELECT is_active FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_optional(conn)
        .await?;
    Ok(active.unwrap_or(false))
}

pub async fn purge_expired(conn: &mut SqliteConnection) -> Result<u64, SqliteDatabaseError> {
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1").bind(Utc::now()).execute(conn).await?;
    Ok(result.rows_affected())
}
