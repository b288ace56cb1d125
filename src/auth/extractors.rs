use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::{jwt::JwtKeys, repo::Account};
use crate::{error::ApiError, state::AppState};

/// The resolved caller identity. Verifies the bearer token, then re-fetches
/// the account row by id so a role change or deletion takes effect on the
/// next request; the token bears identity, not authority.
#[derive(Debug)]
pub struct CurrentAccount(pub Account);

#[async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::unauthorized("Invalid auth scheme"))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|_| {
            warn!("invalid or expired token");
            ApiError::unauthorized("Invalid or expired token")
        })?;

        let account = Account::find_by_id(&state.db, claims.sub)
            .await?
            .ok_or_else(|| {
                warn!(account_id = claims.sub, "token for deleted account");
                ApiError::unauthorized("Invalid or expired token")
            })?;

        Ok(CurrentAccount(account))
    }
}

/// RequireRole(admin): composes `CurrentAccount` and rejects everyone else.
#[derive(Debug)]
pub struct AdminAccount(pub Account);

#[async_trait]
impl FromRequestParts<AppState> for AdminAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let CurrentAccount(account) = CurrentAccount::from_request_parts(parts, state).await?;
        if !account.role.is_admin() {
            warn!(account_id = account.id, "admin route denied");
            return Err(ApiError::Forbidden("Admin role required".into()));
        }
        Ok(AdminAccount(account))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::Role;
    use crate::state::test_support::ephemeral_state;
    use axum::http::{header::AUTHORIZATION, Request, StatusCode};
    use axum::response::IntoResponse;

    fn bearer_parts(token: &str) -> Parts {
        Request::builder()
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(())
            .unwrap()
            .into_parts()
            .0
    }

    fn signed_token(state: &AppState, account: &Account) -> String {
        JwtKeys::from_ref(state)
            .sign(account.id, &account.email)
            .unwrap()
    }

    async fn seed(state: &AppState, email: &str, role: Role) -> Account {
        Account::create(&state.db, "Tester", email, "hash", role)
            .await
            .unwrap()
    }

    fn status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[tokio::test]
    async fn valid_token_resolves_the_stored_account() {
        let state = ephemeral_state().await;
        let account = seed(&state, "alice@example.com", Role::User).await;
        let token = signed_token(&state, &account);

        let CurrentAccount(resolved) =
            CurrentAccount::from_request_parts(&mut bearer_parts(&token), &state)
                .await
                .expect("resolves");
        assert_eq!(resolved.id, account.id);
        assert_eq!(resolved.email, "alice@example.com");
    }

    #[tokio::test]
    async fn missing_header_and_bad_scheme_are_unauthorized() {
        let state = ephemeral_state().await;

        let mut no_header = Request::builder().body(()).unwrap().into_parts().0;
        let err = CurrentAccount::from_request_parts(&mut no_header, &state)
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::UNAUTHORIZED);

        let mut basic = Request::builder()
            .header(AUTHORIZATION, "Basic abc")
            .body(())
            .unwrap()
            .into_parts()
            .0;
        let err = CurrentAccount::from_request_parts(&mut basic, &state)
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_for_deleted_account_stops_working_immediately() {
        let state = ephemeral_state().await;
        let account = seed(&state, "gone@example.com", Role::User).await;
        let token = signed_token(&state, &account);

        // The token still verifies, but the account row is gone.
        Account::delete_cascade(&state.db, account.id).await.unwrap();

        let err = CurrentAccount::from_request_parts(&mut bearer_parts(&token), &state)
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn demoted_admin_loses_admin_access_on_the_next_request() {
        let state = ephemeral_state().await;
        let admin = seed(&state, "admin@example.com", Role::Admin).await;
        let token = signed_token(&state, &admin);

        AdminAccount::from_request_parts(&mut bearer_parts(&token), &state)
            .await
            .expect("admin while role holds");

        sqlx::query("UPDATE accounts SET role = 'user' WHERE id = ?")
            .bind(admin.id)
            .execute(&state.db)
            .await
            .unwrap();

        // Same token, next request: the stored role wins.
        let err = AdminAccount::from_request_parts(&mut bearer_parts(&token), &state)
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::FORBIDDEN);

        let CurrentAccount(still_me) =
            CurrentAccount::from_request_parts(&mut bearer_parts(&token), &state)
                .await
                .expect("identity survives the demotion");
        assert_eq!(still_me.role, Role::User);
    }

    #[tokio::test]
    async fn non_admin_token_is_forbidden_on_admin_routes() {
        let state = ephemeral_state().await;
        let user = seed(&state, "user@example.com", Role::User).await;
        let token = signed_token(&state, &user);

        let err = AdminAccount::from_request_parts(&mut bearer_parts(&token), &state)
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::FORBIDDEN);
    }
}
