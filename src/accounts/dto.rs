use serde::{Deserialize, Serialize};

use crate::auth::repo::{Account, Role};

/// Request body for admin account provisioning.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".into()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
}

impl From<Account> for AccountRow {
    fn from(a: Account) -> Self {
        Self {
            id: a.id,
            name: a.name,
            email: a.email,
            role: a.role,
            created_at: a.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccountList {
    pub accounts: Vec<AccountRow>,
}
