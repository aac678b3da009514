//! Axum route handlers for the Resume API.

use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::types::Json as JsonColumn;
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::generation::optimizer::optimize_resume;
use crate::jobs::extractor::{extract_job, JobRequest};
use crate::models::documents::{ResumeRow, ResumeSummary};
use crate::profile::repository::require_profile;
use crate::state::AppState;

/// POST /api/resume/generate
///
/// Job extraction → generate → score/revise loop → persist.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<JobRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    request.source()?;
    let profile = require_profile(&state.db, user.user_id).await?;

    let job = extract_job(&request, &state.scraper, &state.llm).await?;
    let outcome =
        optimize_resume(state.writer.as_ref(), &profile, &job, state.optimization_policy()).await?;

    let resume = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes
            (user_id, job_title, company_name, job_description, job_url, latex_content,
             ats_score, iterations, keywords, optimization_history)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(user.user_id)
    .bind(&job.job_title)
    .bind(&job.company_name)
    .bind(&job.job_description)
    .bind(request.job_url())
    .bind(&outcome.latex)
    .bind(outcome.ats_score)
    .bind(outcome.iterations as i32)
    .bind(JsonColumn(&outcome.keywords))
    .bind(JsonColumn(&outcome.history))
    .fetch_one(&state.db)
    .await?;

    info!(
        "Resume {} for user {}: score {} after {} iteration(s)",
        resume.id, user.user_id, resume.ats_score, resume.iterations
    );

    Ok(Json(resume))
}

/// GET /api/resume/list
///
/// Newest first.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ResumeSummary>>, AppError> {
    let resumes = sqlx::query_as::<_, ResumeSummary>(
        r#"
        SELECT id, job_title, company_name, ats_score, iterations, created_at
        FROM resumes
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(resumes))
}

/// GET /api/resume/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    user: AuthUser,
    Path(resume_id): Path<i32>,
) -> Result<Json<ResumeRow>, AppError> {
    sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(resume_id)
        .bind(user.user_id)
        .fetch_optional(&state.db)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))
}
