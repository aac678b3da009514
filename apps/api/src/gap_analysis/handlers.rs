//! Axum route handlers for the Gap Analysis API.

use axum::{
    extract::{Path, State},
    Json,
};
use sqlx::types::Json as JsonColumn;
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::gap_analysis::analyzer::analyze_gap;
use crate::jobs::extractor::{extract_job, JobRequest};
use crate::models::documents::GapAnalysisRow;
use crate::profile::repository::require_profile;
use crate::state::AppState;

/// POST /api/gap-analysis/analyze
pub async fn handle_analyze_gap(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<JobRequest>,
) -> Result<Json<GapAnalysisRow>, AppError> {
    request.source()?;
    let profile = require_profile(&state.db, user.user_id).await?;

    let job = extract_job(&request, &state.scraper, &state.llm).await?;
    let analysis = analyze_gap(&state.llm, &profile, &job).await;

    let row = sqlx::query_as::<_, GapAnalysisRow>(
        r#"
        INSERT INTO job_analyses
            (user_id, job_title, job_description, job_url, match_percentage, matching_skills,
             missing_skills, priority_gaps, strengths, recommendations,
             certifications_suggested, training_courses, learning_roadmap)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING *
        "#,
    )
    .bind(user.user_id)
    .bind(&job.job_title)
    .bind(&job.job_description)
    .bind(request.job_url())
    .bind(analysis.match_percentage)
    .bind(JsonColumn(&analysis.matching_skills))
    .bind(JsonColumn(&analysis.missing_skills))
    .bind(JsonColumn(&analysis.priority_gaps))
    .bind(JsonColumn(&analysis.strengths))
    .bind(JsonColumn(&analysis.recommendations))
    .bind(JsonColumn(&analysis.certifications_suggested))
    .bind(JsonColumn(&analysis.training_courses))
    .bind(&analysis.learning_roadmap)
    .fetch_one(&state.db)
    .await?;

    info!(
        "Gap analysis {} for user {}: {}% match",
        row.id, user.user_id, row.match_percentage
    );
    Ok(Json(row))
}

/// GET /api/gap-analysis/list
pub async fn handle_list_gap_analyses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<GapAnalysisRow>>, AppError> {
    let rows = sqlx::query_as::<_, GapAnalysisRow>(
        "SELECT * FROM job_analyses WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows))
}

/// GET /api/gap-analysis/:id
pub async fn handle_get_gap_analysis(
    State(state): State<AppState>,
    user: AuthUser,
    Path(analysis_id): Path<i32>,
) -> Result<Json<GapAnalysisRow>, AppError> {
    sqlx::query_as::<_, GapAnalysisRow>("SELECT * FROM job_analyses WHERE id = $1 AND user_id = $2")
        .bind(analysis_id)
        .bind(user.user_id)
        .fetch_optional(&state.db)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Gap analysis not found".to_string()))
}
