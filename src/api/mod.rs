//! REST API client module for the expense-tracking backend.
//!
//! This module provides the `ApiClient` for authentication, profile, and
//! transaction operations. The backend uses JWT bearer token authentication;
//! expired tokens are exchanged transparently via the refresh endpoint.

pub mod client;
pub mod error;

pub use client::{ApiClient, AuthPayload, BudgetResponse, MessageResponse, Registration};
pub use error::ApiError;
