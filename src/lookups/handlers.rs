use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
    auth::extractors::CurrentAccount,
    error::ApiError,
    lookups::{
        dto::{LookupName, LookupsResponse},
        repo,
        repo::LookupKind,
    },
    state::AppState,
};

pub fn lookup_routes() -> Router<AppState> {
    Router::new()
        .route("/lookups", get(list_lookups))
        .route("/lookups/:kind", post(add_lookup))
        .route(
            "/lookups/:kind/:id",
            put(update_lookup).delete(delete_lookup),
        )
}

#[instrument(skip_all, fields(account_id = account.id))]
pub async fn list_lookups(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
) -> Result<Json<LookupsResponse>, ApiError> {
    let responsible_parties =
        repo::list(&state.db, LookupKind::ResponsibleParty, account.id).await?;
    let categories = repo::list(&state.db, LookupKind::Category, account.id).await?;
    let locations = repo::list(&state.db, LookupKind::Location, account.id).await?;
    Ok(Json(LookupsResponse {
        responsible_parties,
        categories,
        locations,
    }))
}

#[instrument(skip_all, fields(account_id = account.id, kind = %kind))]
pub async fn add_lookup(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path(kind): Path<String>,
    Json(payload): Json<LookupName>,
) -> Result<Json<Value>, ApiError> {
    let kind: LookupKind = kind.parse()?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    repo::add(&state.db, kind, account.id, name).await?;
    Ok(Json(json!({ "ok": true })))
}

#[instrument(skip_all, fields(account_id = account.id, kind = %kind, id = id))]
pub async fn update_lookup(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path((kind, id)): Path<(String, i64)>,
    Json(payload): Json<LookupName>,
) -> Result<Json<Value>, ApiError> {
    let kind: LookupKind = kind.parse()?;
    let name = payload.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    // Renames do not rewrite expense rows; recorded names stay as written.
    repo::rename(&state.db, kind, account.id, id, name).await?;
    Ok(Json(json!({ "ok": true })))
}

#[instrument(skip_all, fields(account_id = account.id, kind = %kind, id = id))]
pub async fn delete_lookup(
    State(state): State<AppState>,
    CurrentAccount(account): CurrentAccount,
    Path((kind, id)): Path<(String, i64)>,
) -> Result<Json<Value>, ApiError> {
    let kind: LookupKind = kind.parse()?;
    repo::delete(&state.db, kind, account.id, id).await?;
    Ok(Json(json!({ "ok": true })))
}
