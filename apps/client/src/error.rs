use thiserror::Error;

/// Every failure the client can surface. `Display` is the one-line message shown
/// to the user.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Missing or rejected credentials. The stored token has already been cleared.
    #[error("Not signed in. Please log in again.")]
    Unauthorized,

    /// Input rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// Non-success response; `detail` comes from the response body.
    #[error("{detail}")]
    Server { status: u16, detail: String },

    #[error("Could not reach the API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from the API: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Token storage failed: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Server { status: 404, .. })
    }
}
