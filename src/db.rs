use sqlx::SqlitePool;
use tracing::info;

use crate::auth::password::hash_password;
use crate::auth::repo::{Account, Role};
use crate::config::AppConfig;

/// Idempotent schema setup. The store is migration-less; every table is
/// created on boot if absent.
pub async fn init_schema(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT UNIQUE NOT NULL,
            password_hash TEXT NOT NULL,
            name TEXT NOT NULL DEFAULT '',
            role TEXT NOT NULL DEFAULT 'user',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(db)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            amount REAL NOT NULL,
            responsible_party TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT,
            location TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            FOREIGN KEY (account_id) REFERENCES accounts(id)
        )
        "#,
    )
    .execute(db)
    .await?;

    for table in ["responsible_parties", "categories", "locations"] {
        sqlx::query(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {table} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_id INTEGER NOT NULL,
                name TEXT NOT NULL,
                UNIQUE(account_id, name)
            )
            "#
        ))
        .execute(db)
        .await?;
    }

    Ok(())
}

const DEFAULT_ADMIN_NAME: &str = "Administrator";

/// Ensure the configured admin account exists and holds the admin role.
/// Safe to run on every boot: creates the account when absent, otherwise
/// restores role=admin and backfills an empty display name.
pub async fn bootstrap_admin(db: &SqlitePool, config: &AppConfig) -> anyhow::Result<()> {
    match Account::find_by_email(db, &config.admin_email).await? {
        None => {
            let hash = hash_password(&config.admin_password)?;
            let account = Account::create(
                db,
                DEFAULT_ADMIN_NAME,
                &config.admin_email,
                &hash,
                Role::Admin,
            )
            .await?;
            info!(account_id = account.id, email = %account.email, "bootstrap admin created");
        }
        Some(_) => {
            sqlx::query("UPDATE accounts SET role = 'admin' WHERE email = ?")
                .bind(&config.admin_email)
                .execute(db)
                .await?;
            sqlx::query(
                "UPDATE accounts SET name = CASE WHEN name = '' THEN ? ELSE name END WHERE email = ?",
            )
            .bind(DEFAULT_ADMIN_NAME)
            .bind(&config.admin_email)
            .execute(db)
            .await?;
            info!(email = %config.admin_email, "bootstrap admin ensured");
        }
    }
    Ok(())
}
