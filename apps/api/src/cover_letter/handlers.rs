//! Axum route handlers for the Cover Letter API.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::cover_letter::generator::write_cover_letter;
use crate::errors::AppError;
use crate::jobs::extractor::{extract_job, JobRequest};
use crate::models::documents::CoverLetterRow;
use crate::profile::repository::require_profile;
use crate::state::AppState;

/// POST /api/cover-letter/generate
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<JobRequest>,
) -> Result<Json<CoverLetterRow>, AppError> {
    request.source()?;
    let profile = require_profile(&state.db, user.user_id).await?;

    let job = extract_job(&request, &state.scraper, &state.llm).await?;
    let content = write_cover_letter(&state.llm, &profile, &job).await;

    let letter = sqlx::query_as::<_, CoverLetterRow>(
        r#"
        INSERT INTO cover_letters
            (user_id, job_title, company_name, job_description, job_url, content)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(user.user_id)
    .bind(&job.job_title)
    .bind(&job.company_name)
    .bind(&job.job_description)
    .bind(request.job_url())
    .bind(&content)
    .fetch_one(&state.db)
    .await?;

    info!("Cover letter {} for user {}", letter.id, user.user_id);
    Ok(Json(letter))
}

/// GET /api/cover-letter/list
pub async fn handle_list_cover_letters(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<CoverLetterRow>>, AppError> {
    let letters = sqlx::query_as::<_, CoverLetterRow>(
        "SELECT * FROM cover_letters WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(user.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(letters))
}

/// GET /api/cover-letter/:id
pub async fn handle_get_cover_letter(
    State(state): State<AppState>,
    user: AuthUser,
    Path(letter_id): Path<i32>,
) -> Result<Json<CoverLetterRow>, AppError> {
    sqlx::query_as::<_, CoverLetterRow>(
        "SELECT * FROM cover_letters WHERE id = $1 AND user_id = $2",
    )
    .bind(letter_id)
    .bind(user.user_id)
    .fetch_optional(&state.db)
    .await?
    .map(Json)
    .ok_or_else(|| AppError::NotFound("Cover letter not found".to_string()))
}
