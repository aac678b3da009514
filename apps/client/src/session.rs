//! Process-wide sign-in state: the token (through the API client's store) and the
//! cached profile.

use tracing::{debug, info, warn};

use crate::api_client::ApiClient;
use crate::error::ClientError;
use crate::types::{Credentials, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticating,
    Authenticated,
}

pub struct Session {
    api: ApiClient,
    state: SessionState,
    profile: Option<Profile>,
}

impl Session {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: SessionState::Anonymous,
            profile: None,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Resolves the starting state by probing the profile endpoint with the stored
    /// token. A probe failure means anonymous; it is never reported as an error.
    pub async fn init(&mut self) -> SessionState {
        if !self.api.has_token() {
            self.state = SessionState::Anonymous;
            return self.state;
        }

        self.state = SessionState::Authenticating;
        match self.api.get_profile().await {
            Ok(profile) => {
                self.profile = Some(profile);
                self.state = SessionState::Authenticated;
            }
            // signed in, no profile yet
            Err(e) if e.is_not_found() => {
                self.profile = None;
                self.state = SessionState::Authenticated;
            }
            Err(e) => {
                debug!("Session probe failed, starting signed out: {e}");
                if let Err(e) = self.api.clear_token() {
                    warn!("Could not clear the stored token: {e}");
                }
                self.profile = None;
                self.state = SessionState::Anonymous;
            }
        }
        self.state
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let credentials = credentials(email, password)?;
        self.state = SessionState::Authenticating;
        match self.api.login(&credentials).await {
            Ok(()) => self.signed_in(email).await,
            Err(e) => {
                self.state = SessionState::Anonymous;
                Err(e)
            }
        }
    }

    pub async fn register(&mut self, email: &str, password: &str) -> Result<(), ClientError> {
        let credentials = credentials(email, password)?;
        self.state = SessionState::Authenticating;
        match self.api.register(&credentials).await {
            Ok(()) => self.signed_in(email).await,
            Err(e) => {
                self.state = SessionState::Anonymous;
                Err(e)
            }
        }
    }

    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.profile = None;
        self.state = SessionState::Anonymous;
        self.api.clear_token()
    }

    /// Re-fetches the cached profile. `None` when the user has not created one.
    pub async fn refresh_profile(&mut self) -> Result<Option<&Profile>, ClientError> {
        match self.api.get_profile().await {
            Ok(profile) => self.profile = Some(profile),
            Err(e) if e.is_not_found() => self.profile = None,
            Err(e) => return Err(self.observe(e)),
        }
        Ok(self.profile.as_ref())
    }

    /// Stores a profile returned by a create or update call.
    pub fn set_profile(&mut self, profile: Profile) {
        self.profile = Some(profile);
    }

    /// Passes an error through, signing out when it is an unauthorized response.
    pub fn observe(&mut self, err: ClientError) -> ClientError {
        if err.is_unauthorized() {
            self.profile = None;
            self.state = SessionState::Anonymous;
        }
        err
    }

    async fn signed_in(&mut self, email: &str) -> Result<(), ClientError> {
        self.state = SessionState::Authenticated;
        info!("Signed in as {email}");
        // a missing profile is fine right after sign-in
        if let Err(e) = self.refresh_profile().await {
            debug!("Could not load profile after sign-in: {e}");
        }
        Ok(())
    }
}

fn credentials(email: &str, password: &str) -> Result<Credentials, ClientError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(ClientError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    Ok(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api_client::test_server::spawn;
    use crate::config::ClientConfig;
    use crate::token_store::{MemoryTokenStore, TokenStore};
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use std::sync::Arc;

    fn bearer(headers: &HeaderMap) -> String {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .trim_start_matches("Bearer ")
            .to_string()
    }

    fn profile_body() -> Value {
        json!({
            "id": 1,
            "full_name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": null,
            "linkedin": null,
            "github": null,
            "portfolio": null,
            "location": "London",
            "summary": null,
            "skills": ["Rust"],
            "education": [],
            "experience": [],
            "projects": [],
            "certifications": [],
            "created_at": "2026-02-01T09:00:00Z",
            "updated_at": "2026-02-01T09:00:00Z"
        })
    }

    async fn server() -> String {
        let router = Router::new()
            .route(
                "/api/profile",
                get(|headers: HeaderMap| async move {
                    match bearer(&headers).as_str() {
                        "with-profile" => (StatusCode::OK, Json(profile_body())),
                        "no-profile" => (StatusCode::NOT_FOUND, Json(json!({"detail": "Profile not found"}))),
                        "broken" => (StatusCode::BAD_GATEWAY, Json(json!({"detail": "upstream down"}))),
                        _ => (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Could not validate credentials"}))),
                    }
                }),
            )
            .route(
                "/api/auth/login",
                post(|Json(body): Json<Value>| async move {
                    if body["password"] == "secret1" {
                        (StatusCode::OK, Json(json!({"access_token": "with-profile", "token_type": "bearer"})))
                    } else {
                        (StatusCode::UNAUTHORIZED, Json(json!({"detail": "Invalid credentials"})))
                    }
                }),
            )
            .route(
                "/api/auth/register",
                post(|| async {
                    Json(json!({"access_token": "no-profile", "token_type": "bearer"}))
                }),
            );
        spawn(router).await
    }

    async fn session_with(token: Option<&str>) -> (Session, Arc<MemoryTokenStore>) {
        let store = Arc::new(match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::default(),
        });
        let config = ClientConfig::new(&server().await, PathBuf::from("unused"));
        let api = ApiClient::new(&config, store.clone()).unwrap();
        (Session::new(api), store)
    }

    #[tokio::test]
    async fn test_init_without_token_is_anonymous() {
        let (mut session, _) = session_with(None).await;
        assert_eq!(session.init().await, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_init_with_valid_token_loads_profile() {
        let (mut session, _) = session_with(Some("with-profile")).await;
        assert_eq!(session.init().await, SessionState::Authenticated);
        assert_eq!(session.profile().unwrap().full_name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_init_missing_profile_still_authenticated() {
        let (mut session, store) = session_with(Some("no-profile")).await;
        assert_eq!(session.init().await, SessionState::Authenticated);
        assert!(session.profile().is_none());
        assert!(store.load().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_init_rejected_token_is_cleared() {
        let (mut session, store) = session_with(Some("expired")).await;
        assert_eq!(session.init().await, SessionState::Anonymous);
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_init_probe_failure_is_anonymous() {
        let (mut session, store) = session_with(Some("broken")).await;
        assert_eq!(session.init().await, SessionState::Anonymous);
        assert_eq!(store.load().unwrap(), None);
    }

    /// Holds a token it cannot remove.
    struct StuckTokenStore;

    impl TokenStore for StuckTokenStore {
        fn load(&self) -> Result<Option<String>, ClientError> {
            Ok(Some("expired".to_string()))
        }

        fn save(&self, _token: &str) -> Result<(), ClientError> {
            Ok(())
        }

        fn clear(&self) -> Result<(), ClientError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[tokio::test]
    async fn test_init_token_store_failure_still_anonymous() {
        let config = ClientConfig::new(&server().await, PathBuf::from("unused"));
        let api = ApiClient::new(&config, Arc::new(StuckTokenStore)).unwrap();
        let mut session = Session::new(api);

        assert_eq!(session.init().await, SessionState::Anonymous);
        assert!(session.profile().is_none());
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let (mut session, store) = session_with(None).await;

        session.login("ada@example.com", "secret1").await.unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.profile().unwrap().email.as_deref(), Some("ada@example.com"));

        session.logout().unwrap();
        assert_eq!(session.state(), SessionState::Anonymous);
        assert!(session.profile().is_none());
        assert_eq!(store.load().unwrap(), None);
    }

    #[tokio::test]
    async fn test_failed_login_returns_to_anonymous() {
        let (mut session, _) = session_with(None).await;
        let err = session.login("ada@example.com", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(session.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_register_without_profile() {
        let (mut session, store) = session_with(None).await;
        session.register("new@example.com", "secret1").await.unwrap();
        assert!(session.is_authenticated());
        assert!(session.profile().is_none());
        assert_eq!(store.load().unwrap().as_deref(), Some("no-profile"));
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected_locally() {
        let (mut session, _) = session_with(None).await;
        let err = session.login("  ", "secret1").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unauthorized_refresh_signs_out() {
        let (mut session, _) = session_with(Some("with-profile")).await;
        session.init().await;
        session.api().clear_token().unwrap();

        let err = session.refresh_profile().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(session.state(), SessionState::Anonymous);
    }
}
