use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use crate::error::ApiError;

/// The three per-account lookup lists. Each kind lives in its own table with
/// a `UNIQUE(account_id, name)` constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    ResponsibleParty,
    Category,
    Location,
}

impl LookupKind {
    pub const ALL: [LookupKind; 3] = [
        LookupKind::ResponsibleParty,
        LookupKind::Category,
        LookupKind::Location,
    ];

    fn table(self) -> &'static str {
        match self {
            LookupKind::ResponsibleParty => "responsible_parties",
            LookupKind::Category => "categories",
            LookupKind::Location => "locations",
        }
    }
}

impl std::str::FromStr for LookupKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "responsible-parties" => Ok(LookupKind::ResponsibleParty),
            "categories" => Ok(LookupKind::Category),
            "locations" => Ok(LookupKind::Location),
            _ => Err(ApiError::validation("Unknown lookup kind")),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LookupEntry {
    pub id: i64,
    pub name: String,
}

pub async fn list(
    db: &SqlitePool,
    kind: LookupKind,
    account_id: i64,
) -> anyhow::Result<Vec<LookupEntry>> {
    let rows = sqlx::query_as::<_, LookupEntry>(&format!(
        "SELECT id, name FROM {} WHERE account_id = ? ORDER BY name ASC",
        kind.table()
    ))
    .bind(account_id)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

/// Idempotent insert: an (account, name) pair that already exists is a
/// silent success, never a conflict.
pub async fn add(
    db: &SqlitePool,
    kind: LookupKind,
    account_id: i64,
    name: &str,
) -> anyhow::Result<()> {
    sqlx::query(&format!(
        "INSERT INTO {} (account_id, name) VALUES (?, ?) ON CONFLICT(account_id, name) DO NOTHING",
        kind.table()
    ))
    .bind(account_id)
    .bind(name)
    .execute(db)
    .await?;
    Ok(())
}

/// Scoped rename. A non-owned id affects zero rows, which is still success.
pub async fn rename(
    db: &SqlitePool,
    kind: LookupKind,
    account_id: i64,
    id: i64,
    name: &str,
) -> anyhow::Result<()> {
    sqlx::query(&format!(
        "UPDATE {} SET name = ? WHERE account_id = ? AND id = ?",
        kind.table()
    ))
    .bind(name)
    .bind(account_id)
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}

/// Scoped delete with the same no-op-on-non-owned policy as `rename`.
pub async fn delete(
    db: &SqlitePool,
    kind: LookupKind,
    account_id: i64,
    id: i64,
) -> anyhow::Result<()> {
    sqlx::query(&format!(
        "DELETE FROM {} WHERE account_id = ? AND id = ?",
        kind.table()
    ))
    .bind(account_id)
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}
