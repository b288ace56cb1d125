use serde::Serialize;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Expense {
    pub id: i64,
    pub account_id: i64,
    pub date: String,
    pub amount: f64,
    pub responsible_party: String,
    pub category: String,
    pub description: Option<String>,
    pub location: String,
    pub created_at: String,
}

pub struct ExpenseFields<'a> {
    pub date: &'a str,
    pub amount: f64,
    pub responsible_party: &'a str,
    pub category: &'a str,
    pub description: &'a str,
    pub location: &'a str,
}

pub async fn insert(
    db: &SqlitePool,
    account_id: i64,
    fields: ExpenseFields<'_>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO expenses (account_id, date, amount, responsible_party, category, description, location)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(account_id)
    .bind(fields.date)
    .bind(fields.amount)
    .bind(fields.responsible_party)
    .bind(fields.category)
    .bind(fields.description)
    .bind(fields.location)
    .execute(db)
    .await?;
    Ok(())
}

/// List the account's expenses, optionally narrowed to a year and/or a
/// zero-padded month. Dates are stored as `YYYY-MM-DD` text, so the filters
/// match on fixed substrings. Ordered newest first with id as the tie-break
/// for same-day entries.
pub async fn list(
    db: &SqlitePool,
    account_id: i64,
    year: Option<&str>,
    month: Option<&str>,
) -> anyhow::Result<Vec<Expense>> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, account_id, date, amount, responsible_party, category, description, location, created_at \
         FROM expenses WHERE account_id = ",
    );
    qb.push_bind(account_id);
    if let Some(year) = year {
        qb.push(" AND substr(date, 1, 4) = ");
        qb.push_bind(year.to_string());
    }
    if let Some(month) = month {
        qb.push(" AND substr(date, 6, 2) = ");
        qb.push_bind(format!("{month:0>2}"));
    }
    qb.push(" ORDER BY date DESC, id DESC");

    let rows = qb.build_query_as::<Expense>().fetch_all(db).await?;
    Ok(rows)
}

/// Scoped full-row update. A non-owned id affects zero rows; that is still
/// success, so row existence never leaks across accounts.
pub async fn update(
    db: &SqlitePool,
    account_id: i64,
    id: i64,
    fields: ExpenseFields<'_>,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        UPDATE expenses
        SET date = ?, amount = ?, responsible_party = ?, category = ?, description = ?, location = ?
        WHERE account_id = ? AND id = ?
        "#,
    )
    .bind(fields.date)
    .bind(fields.amount)
    .bind(fields.responsible_party)
    .bind(fields.category)
    .bind(fields.description)
    .bind(fields.location)
    .bind(account_id)
    .bind(id)
    .execute(db)
    .await?;
    Ok(())
}

/// Scoped delete with the same no-op-on-non-owned policy as `update`.
pub async fn delete(db: &SqlitePool, account_id: i64, id: i64) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM expenses WHERE account_id = ? AND id = ?")
        .bind(account_id)
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}
