use serde::{Deserialize, Serialize};

use super::repo::{Account, Role};

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Response returned after a successful login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub account: PublicAccount,
}

/// Response for the current-session profile endpoint.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub account: PublicAccount,
}

/// Public part of an account returned to clients.
#[derive(Debug, Serialize)]
pub struct PublicAccount {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<Account> for PublicAccount {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            email: a.email,
            name: a.name,
            role: a.role,
        }
    }
}
