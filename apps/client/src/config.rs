use anyhow::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
const TOKEN_FILE_NAME: &str = ".resumeai_token";

/// Client configuration from the environment (`.env` honoured).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash.
    pub api_url: String,
    pub token_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_url = std::env::var("RESUMEAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let token_file = match std::env::var("RESUMEAI_TOKEN_FILE") {
            Ok(path) => PathBuf::from(path),
            Err(_) => default_token_file().context("Cannot locate a home directory for the token file; set RESUMEAI_TOKEN_FILE")?,
        };

        Ok(Self::new(&api_url, token_file))
    }

    pub fn new(api_url: &str, token_file: PathBuf) -> Self {
        Self {
            api_url: normalize_base_url(api_url),
            token_file,
        }
    }
}

fn default_token_file() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(TOKEN_FILE_NAME))
}

fn normalize_base_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.is_empty() {
        DEFAULT_API_URL.to_string()
    } else {
        url.to_string()
    }
}
