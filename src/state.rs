use std::sync::Arc;

use anyhow::Context;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = SqlitePoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db, config })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::JwtConfig;

    /// State over an in-memory database with the schema applied. The pool is
    /// capped at one connection so every query sees the same `:memory:` file.
    pub async fn ephemeral_state() -> AppState {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        crate::db::init_schema(&db).await.expect("schema init");
        let config = Arc::new(AppConfig {
            database_url: "sqlite::memory:".into(),
            jwt: JwtConfig {
                secret: "test-secret".into(),
                issuer: "test-issuer".into(),
                ttl_minutes: 480,
            },
            admin_email: "admin@example.com".into(),
            admin_password: "admin-pass".into(),
        });
        AppState { db, config }
    }
}
