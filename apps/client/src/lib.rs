//! Client for the ResumeAI API: HTTP gateway, session state and local history.

pub mod api_client;
pub mod config;
pub mod error;
pub mod history;
pub mod session;
pub mod token_store;
pub mod types;

pub use api_client::ApiClient;
pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{Session, SessionState};
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};
