use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, MeResponse},
        extractors::CurrentAccount,
        jwt::JwtKeys,
        password::verify_password,
        repo::Account,
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let password = payload.password.trim();

    if email.is_empty() || password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    // Unknown email and wrong password must be indistinguishable to the
    // caller; both take the same rejection below.
    let account = match Account::find_by_email(&state.db, &email).await? {
        Some(a) => a,
        None => {
            warn!("login with unknown email");
            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    if !verify_password(password, &account.password_hash)? {
        warn!(account_id = account.id, "login invalid password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(account.id, &account.email)?;

    info!(account_id = account.id, "login ok");
    Ok(Json(AuthResponse {
        token,
        account: account.into(),
    }))
}

#[instrument(skip_all, fields(account_id = account.id))]
pub async fn get_me(CurrentAccount(account): CurrentAccount) -> Result<Json<MeResponse>, ApiError> {
    Ok(Json(MeResponse {
        account: account.into(),
    }))
}
