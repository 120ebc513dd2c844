use log::debug;
use sqlx::{QueryBuilder, SqliteConnection};

use crate::{
    db::sqlite::SqliteDatabaseError,
    db_types::{Account, NewAccount, PasswordHash, ProfileUpdate},
};

const ACCOUNT_COLUMNS: &str = "id, username, email, first_name, last_name, phone_number, address, password_hash, \
                               is_active, is_staff, created_at, updated_at";

pub async fn fetch_account(id: i64, conn: &mut SqliteConnection) -> Result<Option<Account>, SqliteDatabaseError> {
    let account = sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"))
        .bind(id)
        .fetch_optional(conn)
        .await?;
    Ok(account)
}

pub async fn fetch_account_by_username(
    username: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<Account>, SqliteDatabaseError> {
    let account = sqlx::query_as::<_, Account>(&format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1"))
        .bind(username)
        .fetch_optional(conn)
        .await?;
    Ok(account)
}

/// Inserts a new account. A username that is already taken is reported as
/// [`SqliteDatabaseError::DuplicateUsername`].
pub async fn insert_account(account: NewAccount, conn: &mut SqliteConnection) -> Result<Account, SqliteDatabaseError> {
    let username = account.username.clone();
    let account = sqlx::query_as::<_, Account>(&format!(
        r#"
            INSERT INTO accounts (username, email, first_name, last_name, phone_number, address, password_hash, is_staff)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ACCOUNT_COLUMNS};
        "#
    ))
    .bind(account.username)
    .bind(account.email)
    .bind(account.first_name)
    .bind(account.last_name)
    .bind(account.phone_number)
    .bind(account.address)
    .bind(account.password_hash)
    .bind(account.is_staff)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        SqliteDatabaseError::classify(e, || SqliteDatabaseError::DuplicateUsername(username.clone()), || {
            SqliteDatabaseError::AccountCreationError(username.clone())
        })
    })?;
    debug!("🗃️ Account #{} ({}) has been created", account.id, account.username);
    Ok(account)
}

/// Applies the fields of `update` that are set. An empty update simply returns the current account.
pub async fn update_profile(
    id: i64,
    update: ProfileUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<Account>, SqliteDatabaseError> {
    if update.is_empty() {
        debug!("🗃️ No fields to update for account #{id}. Update request skipped.");
        return fetch_account(id, conn).await;
    }
    let new_username = update.username.clone();
    let mut builder = QueryBuilder::new("UPDATE accounts SET updated_at = CURRENT_TIMESTAMP");
    let fields = [
        ("username", update.username),
        ("email", update.email),
        ("first_name", update.first_name),
        ("last_name", update.last_name),
        ("phone_number", update.phone_number),
        ("address", update.address),
    ];
    for (column, value) in fields {
        if let Some(value) = value {
            builder.push(format!(", {column} = "));
            builder.push_bind(value);
        }
    }
    builder.push(" WHERE id = ");
    builder.push_bind(id);
    builder.push(format!(" RETURNING {ACCOUNT_COLUMNS}"));
    let account = builder.build_query_as::<Account>().fetch_optional(conn).await.map_err(|e| {
        SqliteDatabaseError::classify(
            e,
            || SqliteDatabaseError::DuplicateUsername(new_username.unwrap_or_default()),
            || SqliteDatabaseError::AccountNotFound(id),
        )
    })?;
    debug!("🗃️ Profile for account #{id} updated");
    Ok(account)
}

pub async fn update_password_hash(
    id: i64,
    hash: PasswordHash,
    conn: &mut SqliteConnection,
) -> Result<(), SqliteDatabaseError> {
    let result = sqlx::query("UPDATE accounts SET password_hash = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2")
        .bind(hash)
        .bind(id)
        .execute(conn)
        .await?;
    if result.rows_affected() == 0 {
        return Err(SqliteDatabaseError::AccountNotFound(id));
    }
    debug!("🗃️ Password for account #{id} updated");
    Ok(())
}
