use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    accounts::dto::{AccountList, AccountRow, CreateAccountRequest},
    auth::{
        extractors::AdminAccount,
        password::hash_password,
        repo::{Account, Role},
    },
    error::ApiError,
    state::AppState,
};

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/:id", delete(delete_account))
}

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[instrument(skip_all, fields(admin_id = admin.id))]
pub async fn list_accounts(
    State(state): State<AppState>,
    AdminAccount(admin): AdminAccount,
) -> Result<Json<AccountList>, ApiError> {
    let accounts = Account::list(&state.db)
        .await?
        .into_iter()
        .map(AccountRow::from)
        .collect();
    Ok(Json(AccountList { accounts }))
}

#[instrument(skip_all, fields(admin_id = admin.id))]
pub async fn create_account(
    State(state): State<AppState>,
    AdminAccount(admin): AdminAccount,
    Json(payload): Json<CreateAccountRequest>,
) -> Result<Json<Value>, ApiError> {
    let name = payload.name.trim();
    let email = payload.email.trim().to_lowercase();
    let password = payload.password.trim();

    if name.is_empty() {
        return Err(ApiError::validation("Name is required"));
    }
    if email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if !is_valid_email(&email) {
        return Err(ApiError::validation("Invalid email"));
    }
    if password.len() < 4 {
        return Err(ApiError::validation(
            "Password must be at least 4 characters",
        ));
    }
    let role: Role = payload
        .role
        .trim()
        .parse()
        .map_err(|_| ApiError::validation("Invalid role"))?;

    if Account::find_by_email(&state.db, &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(ApiError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(password)?;
    let account = Account::create(&state.db, name, &email, &hash, role).await?;
    info!(account_id = account.id, %email, "account created");
    Ok(Json(json!({ "ok": true })))
}

#[instrument(skip_all, fields(admin_id = admin.id, target_id = id))]
pub async fn delete_account(
    State(state): State<AppState>,
    AdminAccount(admin): AdminAccount,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    // An admin deleting themselves would lock the tenant out.
    if id == admin.id {
        return Err(ApiError::validation("You cannot delete your own account"));
    }

    Account::delete_cascade(&state.db, id).await?;
    info!(target_id = id, "account deleted");
    Ok(Json(json!({ "ok": true })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::ephemeral_state;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    async fn seed_admin(state: &AppState) -> Account {
        Account::create(&state.db, "Admin", "admin@example.com", "hash", Role::Admin)
            .await
            .unwrap()
    }

    fn request(name: &str, email: &str, password: &str, role: &str) -> CreateAccountRequest {
        CreateAccountRequest {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            role: role.into(),
        }
    }

    async fn create_status(state: &AppState, admin: &Account, req: CreateAccountRequest) -> StatusCode {
        match create_account(State(state.clone()), AdminAccount(admin.clone()), Json(req)).await {
            Ok(_) => StatusCode::OK,
            Err(e) => e.into_response().status(),
        }
    }

    #[tokio::test]
    async fn create_account_validates_input() {
        let state = ephemeral_state().await;
        let admin = seed_admin(&state).await;

        let cases = [
            request("", "a@example.com", "pass", "user"),
            request("Bob", "", "pass", "user"),
            request("Bob", "not-an-email", "pass", "user"),
            request("Bob", "b@example.com", "abc", "user"),
            request("Bob", "b@example.com", "pass", "superuser"),
        ];
        for case in cases {
            assert_eq!(
                create_status(&state, &admin, case).await,
                StatusCode::BAD_REQUEST
            );
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&state.db)
            .await
            .unwrap();
        assert_eq!(count, 1, "no account may be created on the rejected paths");
    }

    #[tokio::test]
    async fn create_account_rejects_duplicate_email_case_insensitively() {
        let state = ephemeral_state().await;
        let admin = seed_admin(&state).await;

        let ok = create_status(&state, &admin, request("Bob", "bob@example.com", "pass", "user")).await;
        assert_eq!(ok, StatusCode::OK);

        let dup = create_status(&state, &admin, request("Bob2", "BOB@Example.com", "pass", "user")).await;
        assert_eq!(dup, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn create_account_stores_hash_not_plaintext() {
        let state = ephemeral_state().await;
        let admin = seed_admin(&state).await;

        create_status(&state, &admin, request("Bob", "bob@example.com", "s3cret", "user")).await;
        let stored = Account::find_by_email(&state.db, "bob@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "s3cret");
        assert!(crate::auth::password::verify_password("s3cret", &stored.password_hash).unwrap());
    }

    #[tokio::test]
    async fn admin_cannot_delete_own_account() {
        let state = ephemeral_state().await;
        let admin = seed_admin(&state).await;

        let result = delete_account(
            State(state.clone()),
            AdminAccount(admin.clone()),
            Path(admin.id),
        )
        .await;
        assert_eq!(
            result.err().map(|e| e.into_response().status()),
            Some(StatusCode::BAD_REQUEST)
        );
        assert!(Account::find_by_id(&state.db, admin.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn delete_account_removes_target() {
        let state = ephemeral_state().await;
        let admin = seed_admin(&state).await;
        let target = Account::create(&state.db, "Bob", "bob@example.com", "hash", Role::User)
            .await
            .unwrap();

        delete_account(State(state.clone()), AdminAccount(admin), Path(target.id))
            .await
            .expect("delete ok");
        assert!(Account::find_by_id(&state.db, target.id)
            .await
            .unwrap()
            .is_none());
    }
}
