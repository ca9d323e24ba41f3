use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::amount_from_json;

/// Category applied when the user leaves the field blank
pub const DEFAULT_CATEGORY: &str = "General";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "income"),
            TransactionKind::Expense => write!(f, "expense"),
        }
    }
}

impl TransactionKind {
    /// The other kind, for toggling in the entry form
    pub fn toggled(&self) -> Self {
        match self {
            TransactionKind::Income => TransactionKind::Expense,
            TransactionKind::Expense => TransactionKind::Income,
        }
    }
}

/// A ledger entry as returned by the backend. Identity is the server-assigned
/// id; the client never invents one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(deserialize_with = "amount_from_json")]
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// True when the entry was edited after creation
    pub fn was_edited(&self) -> bool {
        self.updated_at.is_some_and(|updated| updated != self.created_at)
    }
}

/// Request body for creating or updating a transaction
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub amount: f64,
    pub description: String,
    pub category: String,
}

impl NewTransaction {
    /// Build a request body, substituting the default category for a blank one
    pub fn new(kind: TransactionKind, amount: f64, description: &str, category: &str) -> Self {
        let category = category.trim();
        Self {
            kind,
            amount,
            description: description.trim().to_string(),
            category: if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category.to_string()
            },
        }
    }
}

/// Wrapper the backend uses for create/update responses
#[derive(Debug, Deserialize)]
pub struct TransactionEnvelope {
    pub transaction: Transaction,
}
