//! Data models for the expense-tracking API.
//!
//! This module contains the data structures exchanged with the backend:
//!
//! - `UserProfile`, `ProfileUpdate`, `UserPatch`: account data
//! - `Transaction`, `TransactionKind`, `NewTransaction`: ledger entries
//!
//! Monetary fields may arrive from the backend as JSON numbers or numeric
//! strings; the deserializers here accept both.

pub mod transaction;
pub mod user;

use serde::{Deserialize, Deserializer};

pub use transaction::{NewTransaction, Transaction, TransactionEnvelope, TransactionKind};
pub use user::{ProfileUpdate, UserPatch, UserProfile};

/// Deserialize an amount that the backend may encode as a number or a string
pub(crate) fn amount_from_json<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(value) => Ok(value),
        Amount::Text(raw) => raw.trim().parse().map_err(serde::de::Error::custom),
    }
}
