//! API client for the expense-tracking backend.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests. Every request reads the bearer token from the credential store
//! at send time; a 401 triggers at most one transparent token refresh and
//! replay per originating request, serialized behind a single-flight lock so
//! concurrent failures share one refresh.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::models::{
    NewTransaction, ProfileUpdate, Transaction, TransactionEnvelope, UserProfile,
};
use crate::store::CredentialStore;

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Login endpoint, excluded from refresh-and-retry: a 401 here means bad
/// credentials, not an expired session.
const LOGIN_PATH: &str = "/auth/login";

/// Refresh endpoint, excluded from refresh-and-retry to prevent recursion.
const REFRESH_PATH: &str = "/auth/refresh-token";

#[derive(Debug, Deserialize)]
pub struct AuthPayload {
    pub token: String,
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct RefreshPayload {
    token: String,
}

#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct BudgetResponse {
    #[serde(deserialize_with = "crate::models::amount_from_json")]
    pub budget: f64,
}

/// Request body for `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub budget: f64,
}

/// True when a 401 on `path` is eligible for refresh-and-retry
fn refresh_eligible(path: &str) -> bool {
    path != LOGIN_PATH && path != REFRESH_PATH
}

/// API client for the expense-tracking backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection
/// pooling, and the credential store and refresh lock are shared.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    credentials: CredentialStore,
    refresh_lock: Arc<Mutex<()>>,
}

impl ApiClient {
    /// Create a new API client against `base_url` (no trailing slash)
    pub fn new(base_url: impl Into<String>, credentials: CredentialStore) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            credentials,
            refresh_lock: Arc::new(Mutex::new(())),
        })
    }

    // =========================================================================
    // Request pipeline
    // =========================================================================

    /// Send one request, attaching the stored bearer token if present.
    ///
    /// On a 401 from an eligible endpoint the token is refreshed once and the
    /// request replayed once with the new token; the attempt counter is local
    /// to this call, so a second 401 propagates. All other error statuses
    /// pass through unchanged.
    async fn dispatch<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt: u8 = 0;

        loop {
            let mut request = self.http.request(method.clone(), &url);
            if let Some(token) = self.credentials.token() {
                request = request.bearer_auth(token);
            }
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::UNAUTHORIZED && attempt == 0 && refresh_eligible(path) {
                attempt += 1;
                debug!(path, "Request returned 401, refreshing token");
                let stale = self.credentials.token();
                self.refresh_access_token(stale.as_deref()).await?;
                continue;
            }

            if status.is_success() {
                return Ok(response);
            }

            let body_text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_status(status, &body_text));
        }
    }

    /// Refresh the access token, persisting the replacement.
    ///
    /// The lock makes the refresh single-flight: concurrent 401s queue here,
    /// and a waiter that finds the stored token already different from the
    /// one its failed attempt used skips the network call entirely. Any
    /// refresh failure clears the stored session and surfaces as
    /// `SessionExpired`.
    async fn refresh_access_token(&self, stale: Option<&str>) -> Result<(), ApiError> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(current) = self.credentials.token() {
            if stale != Some(current.as_str()) {
                debug!("Token already refreshed by a concurrent request");
                return Ok(());
            }
        }

        let url = format!("{}{}", self.base_url, REFRESH_PATH);
        let mut request = self.http.post(&url);
        if let Some(token) = self.credentials.token() {
            request = request.bearer_auth(token);
        }

        let outcome = match request.send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<RefreshPayload>().await {
                    Ok(payload) => Ok(payload.token),
                    Err(e) => Err(format!("unreadable refresh response: {}", e)),
                }
            }
            Ok(response) => Err(format!("refresh rejected with status {}", response.status())),
            Err(e) => Err(format!("refresh request failed: {}", e)),
        };

        match outcome {
            Ok(token) => {
                self.credentials.set_token(&token)?;
                debug!("Access token refreshed");
                Ok(())
            }
            Err(reason) => {
                warn!(reason = %reason, "Token refresh failed, clearing stored session");
                self.credentials.clear();
                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn parse_json<T: DeserializeOwned>(
        response: reqwest::Response,
        path: &str,
    ) -> Result<T, ApiError> {
        response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("from {}: {}", path, e)))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.dispatch::<()>(Method::GET, path, None).await?;
        Self::parse_json(response, path).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(Method::POST, path, Some(body)).await?;
        Self::parse_json(response, path).await
    }

    async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.dispatch(Method::PUT, path, Some(body)).await?;
        Self::parse_json(response, path).await
    }

    // =========================================================================
    // Auth endpoints
    // =========================================================================

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload, ApiError> {
        let body = serde_json::json!({ "email": email, "password": password });
        self.post(LOGIN_PATH, &body).await
    }

    /// Exchange an OAuth credential for a session
    pub async fn google_login(&self, credential: &str) -> Result<AuthPayload, ApiError> {
        let body = serde_json::json!({ "credential": credential });
        self.post("/auth/google-login", &body).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.dispatch(Method::POST, "/auth/register", Some(registration))
            .await?;
        Ok(())
    }

    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, ApiError> {
        let body = serde_json::json!({ "email": email });
        self.post("/auth/forgot-password", &body).await
    }

    pub async fn reset_password(
        &self,
        reset_token: &str,
        password: &str,
    ) -> Result<MessageResponse, ApiError> {
        let body = serde_json::json!({ "password": password });
        self.post(&format!("/auth/reset-password/{}", reset_token), &body)
            .await
    }

    /// Fetch the current user's profile
    pub async fn me(&self) -> Result<UserProfile, ApiError> {
        self.get("/auth/me").await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.put("/auth/me", update).await
    }

    pub async fn update_budget(&self, budget: f64) -> Result<BudgetResponse, ApiError> {
        let body = serde_json::json!({ "budget": budget });
        self.put("/auth/budget", &body).await
    }

    pub async fn delete_account(&self) -> Result<(), ApiError> {
        self.dispatch::<()>(Method::DELETE, "/auth/delete", None)
            .await?;
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.dispatch::<()>(Method::POST, "/auth/logout", None)
            .await?;
        Ok(())
    }

    /// Force a token refresh outside the 401 path
    #[allow(dead_code)]
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let stale = self.credentials.token();
        self.refresh_access_token(stale.as_deref()).await
    }

    // =========================================================================
    // Transaction endpoints
    // =========================================================================

    pub async fn transactions(&self) -> Result<Vec<Transaction>, ApiError> {
        self.get("/transactions").await
    }

    pub async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<Transaction, ApiError> {
        let envelope: TransactionEnvelope = self.post("/transactions", transaction).await?;
        Ok(envelope.transaction)
    }

    pub async fn update_transaction(
        &self,
        id: i64,
        transaction: &NewTransaction,
    ) -> Result<Transaction, ApiError> {
        let envelope: TransactionEnvelope = self
            .put(&format!("/transactions/{}", id), transaction)
            .await?;
        Ok(envelope.transaction)
    }

    pub async fn delete_transaction(&self, id: i64) -> Result<(), ApiError> {
        self.dispatch::<()>(Method::DELETE, &format!("/transactions/{}", id), None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROFILE_JSON: &str = r#"{"id":1,"firstname":"Ada","lastname":"Lovelace","username":"ada_l","email":"ada@example.com","budget":1500}"#;

    fn credentials() -> CredentialStore {
        CredentialStore::new(Arc::new(MemoryStore::new()))
    }

    fn client(server: &MockServer, credentials: &CredentialStore) -> ApiClient {
        ApiClient::new(server.uri(), credentials.clone()).unwrap()
    }

    #[test]
    fn test_refresh_eligibility() {
        assert!(refresh_eligible("/transactions"));
        assert!(refresh_eligible("/auth/me"));
        assert!(!refresh_eligible("/auth/login"));
        assert!(!refresh_eligible("/auth/refresh-token"));
    }

    #[tokio::test]
    async fn test_no_token_sends_no_authorization_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transactions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let store = credentials();
        let api = client(&server, &store);
        api.transactions().await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].headers.contains_key("authorization"));
    }

    #[tokio::test]
    async fn test_token_is_attached_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/transactions"))
            .and(header("Authorization", "Bearer tok-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let store = credentials();
        store.set_token("tok-1").unwrap();
        let api = client(&server, &store);
        api.transactions().await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_and_request_replayed_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transactions"))
            .and(header("Authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "fresh"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transactions"))
            .and(header("Authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let store = credentials();
        store.set_token("stale").unwrap();
        let api = client(&server, &store);

        // The caller observes only the final successful response
        let transactions = api.transactions().await.unwrap();
        assert!(transactions.is_empty());
        assert_eq!(store.token().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_session_and_does_not_recurse() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transactions"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let store = credentials();
        store.set_token("stale").unwrap();
        let api = client(&server, &store);

        let err = api.transactions().await.unwrap_err();
        assert!(err.is_session_expired());
        assert!(store.token().is_none());
        assert!(store.user().is_none());
    }

    #[tokio::test]
    async fn test_login_401_passes_through_without_refresh() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let store = credentials();
        let api = client(&server, &store);

        let err = api.login("ada@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_concurrent_401s_share_a_single_refresh() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/transactions"))
            .and(header("Authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("Authorization", "Bearer stale"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "fresh"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/transactions"))
            .and(header("Authorization", "Bearer fresh"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .and(header("Authorization", "Bearer fresh"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(PROFILE_JSON, "application/json"),
            )
            .mount(&server)
            .await;

        let store = credentials();
        store.set_token("stale").unwrap();
        let api = client(&server, &store);

        let (transactions, profile) = tokio::join!(api.transactions(), api.me());
        transactions.unwrap();
        profile.unwrap();
        assert_eq!(store.token().as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn test_validation_error_carries_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .respond_with(ResponseTemplate::new(400).set_body_json(
                serde_json::json!({"message": "User with this email already exists."}),
            ))
            .mount(&server)
            .await;

        let store = credentials();
        let api = client(&server, &store);
        let registration = Registration {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            username: "ada_l".to_string(),
            email: "ada@example.com".to_string(),
            password: "Str0ng!pw".to_string(),
            budget: 1500.0,
        };

        match api.register(&registration).await.unwrap_err() {
            ApiError::Validation(msg) => {
                assert_eq!(msg, "User with this email already exists.")
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_transaction_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "transaction": {
                    "id": 42,
                    "type": "expense",
                    "amount": "12.00",
                    "description": "Bus fare",
                    "category": "Transport",
                    "created_at": "2025-03-01T10:00:00Z",
                    "updated_at": "2025-03-01T10:00:00Z"
                }
            })))
            .mount(&server)
            .await;

        let store = credentials();
        let api = client(&server, &store);
        let body = NewTransaction::new(
            crate::models::TransactionKind::Expense,
            12.0,
            "Bus fare",
            "Transport",
        );
        let created = api.create_transaction(&body).await.unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(created.amount, 12.0);
    }
}
