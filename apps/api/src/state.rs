use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::jwt::JwtKeys;
use crate::config::Config;
use crate::generation::optimizer::OptimizationPolicy;
use crate::generation::writer::ResumeWriter;
use crate::jobs::scraper::JobScraper;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub scraper: JobScraper,
    pub config: Config,
    pub jwt: JwtKeys,
    /// Drafts, scores and revises resumes for the optimization loop.
    pub writer: Arc<dyn ResumeWriter>,
}

impl AppState {
    pub fn optimization_policy(&self) -> OptimizationPolicy {
        OptimizationPolicy {
            target_score: self.config.ats_target_score,
            max_iterations: self.config.max_optimization_iterations,
        }
    }
}
