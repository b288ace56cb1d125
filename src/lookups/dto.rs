use serde::{Deserialize, Serialize};

use super::repo::LookupEntry;

/// Request body for adding or renaming a lookup entry.
#[derive(Debug, Deserialize)]
pub struct LookupName {
    #[serde(default)]
    pub name: String,
}

/// All three lookup lists for the caller, in one response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupsResponse {
    pub responsible_parties: Vec<LookupEntry>,
    pub categories: Vec<LookupEntry>,
    pub locations: Vec<LookupEntry>,
}
