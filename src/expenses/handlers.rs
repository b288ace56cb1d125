use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
    auth::extractors::CurrentAccount,
    error::ApiError,
    expenses::{
        dto::{ExpenseList, ExpensePayload, ExpenseRow, ListQuery},
        repo,
        repo::ExpenseFields,
    },
    state::AppState,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/:id",
            put(update_expense).delete(delete_expense),
        )
}

fn is_valid_date(date: &str) -> bool {
    lazy_static! {
        static ref DATE_RE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    }
    DATE_RE.is_match(date)
}

/// All validation runs before any store mutation.
fn validated(payload: &ExpensePayload) -> Result<ExpenseFields<'_>, ApiError> {
    let date = payload.date.trim();
    let responsible_party = payload.responsible_party.trim();
    let category = payload.category.trim();
    let location = payload.location.trim();

    if date.is_empty() || responsible_party.is_empty() || category.is_empty() || location.is_empty()
    {
        return Err(ApiError::validation("Required fields missing"));
    }
    if !is_valid_date(date) {
        return Err(ApiError::validation("Date must be YYYY-MM-DD"));
    }
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        return Err(ApiError::validation("Amount must be a positive number"));
    }

    Ok(ExpenseFields {
        date,
        amount: payload.amount,
        responsible_party,
        category,
        description: payload.description.as_deref().unwrap_or("").trim(),
        location,
    })
}

#[instrument(skip_all, fields(account_id = account.id))]
pub async fn create_expense(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<Value>, ApiError> {
    let fields = validated(&payload)?;
    repo::insert(&state.db, account.id, fields).await?;
    Ok(Json(json!({ "ok": true })))
}

// Blank query params (`?year=&month=`) mean "no filter", not "match nothing".
fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[instrument(skip_all, fields(account_id = account.id))]
pub async fn list_expenses(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Query(query): Query<ListQuery>,
) -> Result<Json<ExpenseList>, ApiError> {
    let expenses = repo::list(
        &state.db,
        account.id,
        present(query.year.as_deref()),
        present(query.month.as_deref()),
    )
    .await?
    .into_iter()
    .map(ExpenseRow::from)
    .collect();
    Ok(Json(ExpenseList { expenses }))
}

#[instrument(skip_all, fields(account_id = account.id, id = id))]
pub async fn update_expense(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<i64>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<Value>, ApiError> {
    let fields = validated(&payload)?;
    repo::update(&state.db, account.id, id, fields).await?;
    Ok(Json(json!({ "ok": true })))
}

#[instrument(skip_all, fields(account_id = account.id, id = id))]
pub async fn delete_expense(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    repo::delete(&state.db, account.id, id).await?;
    Ok(Json(json!({ "ok": true })))
}
