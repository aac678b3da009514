//! HTTP gateway to the ResumeAI API. Attaches the bearer token to protected calls
//! and owns the one place where an unauthorized response is handled.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::token_store::TokenStore;
use crate::types::{
    CoverLetter, Credentials, ErrorBody, GapAnalysis, JobRequest, Profile, ProfileInput, Resume,
    ResumeSummary, TokenResponse,
};

/// Resume optimization can take several LLM round trips.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
            tokens,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        matches!(self.tokens.load(), Ok(Some(_)))
    }

    pub fn clear_token(&self) -> Result<(), ClientError> {
        self.tokens.clear()
    }

    // ── Auth ─────────────────────────────────────────────────────────────────

    /// Registers and stores the returned token.
    pub async fn register(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let response: TokenResponse = self
            .send_public(self.public(Method::POST, "/api/auth/register").json(credentials))
            .await?;
        self.tokens.save(&response.access_token)
    }

    /// Logs in and stores the returned token.
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ClientError> {
        let response: TokenResponse = self
            .send_public(self.public(Method::POST, "/api/auth/login").json(credentials))
            .await?;
        self.tokens.save(&response.access_token)
    }

    pub async fn health(&self) -> Result<serde_json::Value, ClientError> {
        self.send_public(self.public(Method::GET, "/health")).await
    }

    // ── Profile ──────────────────────────────────────────────────────────────

    pub async fn get_profile(&self) -> Result<Profile, ClientError> {
        self.get("/api/profile").await
    }

    pub async fn create_profile(&self, profile: &ProfileInput) -> Result<Profile, ClientError> {
        let has_name = profile
            .full_name
            .as_deref()
            .is_some_and(|name| !name.trim().is_empty());
        if !has_name {
            return Err(ClientError::Validation("Full name is required".to_string()));
        }
        self.send_json(Method::POST, "/api/profile", profile).await
    }

    pub async fn update_profile(&self, update: &ProfileInput) -> Result<Profile, ClientError> {
        self.send_json(Method::PUT, "/api/profile", update).await
    }

    // ── Documents ────────────────────────────────────────────────────────────

    pub async fn generate_resume(&self, job: JobRequest) -> Result<Resume, ClientError> {
        let job = job.validated()?;
        self.send_json(Method::POST, "/api/resume/generate", &job).await
    }

    pub async fn list_resumes(&self) -> Result<Vec<ResumeSummary>, ClientError> {
        self.get("/api/resume/list").await
    }

    pub async fn get_resume(&self, id: i32) -> Result<Resume, ClientError> {
        self.get(&format!("/api/resume/{id}")).await
    }

    pub async fn generate_cover_letter(&self, job: JobRequest) -> Result<CoverLetter, ClientError> {
        let job = job.validated()?;
        self.send_json(Method::POST, "/api/cover-letter/generate", &job).await
    }

    pub async fn list_cover_letters(&self) -> Result<Vec<CoverLetter>, ClientError> {
        self.get("/api/cover-letter/list").await
    }

    pub async fn get_cover_letter(&self, id: i32) -> Result<CoverLetter, ClientError> {
        self.get(&format!("/api/cover-letter/{id}")).await
    }

    pub async fn analyze_gap(&self, job: JobRequest) -> Result<GapAnalysis, ClientError> {
        let job = job.validated()?;
        self.send_json(Method::POST, "/api/gap-analysis/analyze", &job).await
    }

    pub async fn list_gap_analyses(&self) -> Result<Vec<GapAnalysis>, ClientError> {
        self.get("/api/gap-analysis/list").await
    }

    pub async fn get_gap_analysis(&self, id: i32) -> Result<GapAnalysis, ClientError> {
        self.get(&format!("/api/gap-analysis/{id}")).await
    }

    // ── Plumbing ─────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn public(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Builds a protected request. Without a stored token nothing is sent.
    fn protected(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let token = self.tokens.load()?.ok_or(ClientError::Unauthorized)?;
        Ok(self.http.request(method, self.url(path)).bearer_auth(token))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let request = self.protected(Method::GET, path)?;
        self.send_protected(request).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.protected(method, path)?.json(body);
        self.send_protected(request).await
    }

    async fn send_protected<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            warn!("API rejected the stored token; signing out");
            if let Err(e) = self.tokens.clear() {
                warn!("Could not clear the stored token: {e}");
            }
            return Err(ClientError::Unauthorized);
        }
        decode(response).await
    }

    /// Public calls carry no token, so a 401 here (bad credentials) is an ordinary
    /// server error with its detail.
    async fn send_public<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;
    debug!("API responded {status} ({} bytes)", body.len());

    if status.is_success() {
        return Ok(serde_json::from_slice(&body)?);
    }

    let detail = serde_json::from_slice::<ErrorBody>(&body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| default_detail(status));
    Err(ClientError::Server {
        status: status.as_u16(),
        detail,
    })
}

fn default_detail(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("Request failed: {} {reason}", status.as_u16()),
        None => format!("Request failed: {}", status.as_u16()),
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::Router;

    /// Serves `router` on an ephemeral port and returns its base URL.
    pub async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[derive(Clone, Default)]
    pub struct Hits(Arc<AtomicUsize>);

    impl Hits {
        pub fn bump(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }

        pub fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }
}
