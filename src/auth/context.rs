//! Session state shared by every screen.
//!
//! The auth context is created once at startup and is the single source of
//! truth for the current token and user; screens never read the credential
//! store directly. The store is kept as a write-through mirror so the
//! session survives restarts.

use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::{UserPatch, UserProfile};
use crate::store::CredentialStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No credentials; only the public screens are reachable
    Anonymous,
    /// A stored token exists but has not been confirmed against the backend
    Verifying,
    /// The token was accepted and a profile is cached
    Authenticated,
}

pub struct AuthContext {
    credentials: CredentialStore,
    api: ApiClient,
    state: SessionState,
    user: Option<UserProfile>,
}

impl AuthContext {
    /// Build the context from whatever the store holds. A stored token
    /// starts the session in `Verifying`; call `verify` before trusting it.
    pub fn new(credentials: CredentialStore, api: ApiClient) -> Self {
        let (state, user) = if credentials.token().is_some() {
            (SessionState::Verifying, credentials.user())
        } else {
            (SessionState::Anonymous, None)
        };

        Self {
            credentials,
            api,
            state,
            user,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn token(&self) -> Option<String> {
        self.credentials.token()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    /// Confirm a stored token against the backend at startup.
    ///
    /// Success caches (and persists) the fresh profile; any failure clears
    /// the stored session and drops to `Anonymous`.
    pub async fn verify(&mut self) {
        if self.credentials.token().is_none() {
            self.state = SessionState::Anonymous;
            return;
        }

        self.state = SessionState::Verifying;
        match self.api.me().await {
            Ok(user) => {
                debug!(username = %user.username, "Stored session verified");
                if let Err(e) = self.credentials.set_user(&user) {
                    warn!(error = %e, "Failed to persist verified profile");
                }
                self.user = Some(user);
                self.state = SessionState::Authenticated;
            }
            Err(e) => {
                info!(error = %e, "Stored session rejected, clearing");
                self.credentials.clear();
                self.user = None;
                self.state = SessionState::Anonymous;
            }
        }
    }

    /// Install a fresh session after a successful login
    pub fn login(&mut self, token: &str, user: UserProfile) {
        if let Err(e) = self.credentials.set_session(token, &user) {
            warn!(error = %e, "Failed to persist session");
        }
        self.user = Some(user);
        self.state = SessionState::Authenticated;
        info!("Logged in");
    }

    /// End the session. The server call is best-effort; local state is
    /// cleared regardless of its outcome.
    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Logout failed on server");
        }
        self.credentials.clear();
        self.user = None;
        self.state = SessionState::Anonymous;
        info!("Logged out");
    }

    /// Drop local session state without calling the server. Used when the
    /// session manager has already cleared the store on refresh failure.
    pub fn invalidate(&mut self) {
        self.credentials.clear();
        self.user = None;
        self.state = SessionState::Anonymous;
    }

    /// Merge a partial change into the cached profile and persist it
    pub fn update_user(&mut self, patch: UserPatch) {
        if let Some(user) = self.user.as_mut() {
            user.apply(patch);
            if let Err(e) = self.credentials.set_user(user) {
                warn!(error = %e, "Failed to persist profile update");
            }
        }
    }

    /// Replace the cached profile wholesale (profile edit response)
    pub fn set_user(&mut self, user: UserProfile) {
        if let Err(e) = self.credentials.set_user(&user) {
            warn!(error = %e, "Failed to persist profile");
        }
        self.user = Some(user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROFILE_JSON: &str = r#"{"id":1,"firstname":"Ada","lastname":"Lovelace","username":"ada_l","email":"ada@example.com","budget":1500}"#;

    fn sample_user() -> UserProfile {
        serde_json::from_str(PROFILE_JSON).unwrap()
    }

    fn context_against(server: &MockServer) -> (AuthContext, CredentialStore) {
        let credentials = CredentialStore::new(Arc::new(MemoryStore::new()));
        let api = ApiClient::new(server.uri(), credentials.clone()).unwrap();
        (AuthContext::new(credentials.clone(), api), credentials)
    }

    #[tokio::test]
    async fn test_starts_anonymous_without_token() {
        let server = MockServer::start().await;
        let (mut ctx, _) = context_against(&server);
        assert_eq!(ctx.state(), SessionState::Anonymous);

        ctx.verify().await;
        assert_eq!(ctx.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_verify_accepts_valid_stored_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PROFILE_JSON, "application/json"))
            .mount(&server)
            .await;

        let credentials = CredentialStore::new(Arc::new(MemoryStore::new()));
        credentials.set_token("tok-1").unwrap();
        let api = ApiClient::new(server.uri(), credentials.clone()).unwrap();
        let mut ctx = AuthContext::new(credentials.clone(), api);
        assert_eq!(ctx.state(), SessionState::Verifying);

        ctx.verify().await;
        assert_eq!(ctx.state(), SessionState::Authenticated);
        assert_eq!(ctx.user().unwrap().username, "ada_l");
        // the verified profile is mirrored into the store
        assert_eq!(credentials.user().unwrap().username, "ada_l");
    }

    #[tokio::test]
    async fn test_verify_clears_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh-token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let credentials = CredentialStore::new(Arc::new(MemoryStore::new()));
        credentials.set_token("expired").unwrap();
        let api = ApiClient::new(server.uri(), credentials.clone()).unwrap();
        let mut ctx = AuthContext::new(credentials.clone(), api);

        ctx.verify().await;
        assert_eq!(ctx.state(), SessionState::Anonymous);
        assert!(credentials.token().is_none());
        assert!(ctx.user().is_none());
    }

    #[tokio::test]
    async fn test_login_persists_session() {
        let server = MockServer::start().await;
        let (mut ctx, credentials) = context_against(&server);

        ctx.login("tok-1", sample_user());
        assert!(ctx.is_authenticated());
        assert_eq!(credentials.token().as_deref(), Some("tok-1"));
        assert_eq!(credentials.user().unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_logout_clears_locally_even_when_server_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (mut ctx, credentials) = context_against(&server);
        ctx.login("tok-1", sample_user());

        ctx.logout().await;
        assert_eq!(ctx.state(), SessionState::Anonymous);
        assert!(credentials.token().is_none());
        assert!(credentials.user().is_none());
    }

    #[tokio::test]
    async fn test_update_user_merges_and_persists() {
        let server = MockServer::start().await;
        let (mut ctx, credentials) = context_against(&server);
        ctx.login("tok-1", sample_user());

        ctx.update_user(UserPatch::budget(900.0));
        assert_eq!(ctx.user().unwrap().budget, 900.0);
        assert_eq!(credentials.user().unwrap().budget, 900.0);
        // untouched fields survive the merge
        assert_eq!(ctx.user().unwrap().username, "ada_l");
    }
}
