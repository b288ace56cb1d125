use serde::{Deserialize, Serialize};

use super::repo::Expense;

/// Request body for creating or replacing an expense.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePayload {
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub responsible_party: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: String,
}

/// Optional list filters; both compose.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub year: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRow {
    pub id: i64,
    pub date: String,
    pub amount: f64,
    pub responsible_party: String,
    pub category: String,
    pub description: Option<String>,
    pub location: String,
}

impl From<Expense> for ExpenseRow {
    fn from(e: Expense) -> Self {
        Self {
            id: e.id,
            date: e.date,
            amount: e.amount,
            responsible_party: e.responsible_party,
            category: e.category,
            description: e.description,
            location: e.location,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExpenseList {
    pub expenses: Vec<ExpenseRow>,
}
