//! Axum route handlers for the Profile API.

use axum::{extract::State, Json};
use tracing::info;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::profile::Profile;
use crate::profile::repository::{
    find_profile, insert_profile, save_profile, validate_full_name, ProfileCreate, ProfileUpdate,
};
use crate::state::AppState;

/// POST /api/profile
pub async fn handle_create_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ProfileCreate>,
) -> Result<Json<Profile>, AppError> {
    validate_full_name(&request.full_name)?;

    if find_profile(&state.db, user.user_id).await?.is_some() {
        return Err(AppError::Validation("Profile already exists".to_string()));
    }

    let profile = insert_profile(&state.db, user.user_id, request).await?;
    info!("Created profile {} for {}", profile.id, user.email);
    Ok(Json(profile))
}

/// GET /api/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Profile>, AppError> {
    find_profile(&state.db, user.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

/// PUT /api/profile
///
/// Partial update: only fields present in the body change.
pub async fn handle_update_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<ProfileUpdate>,
) -> Result<Json<Profile>, AppError> {
    if let Some(name) = &request.full_name {
        validate_full_name(name)?;
    }

    let mut profile = find_profile(&state.db, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    request.apply(&mut profile);
    let profile = save_profile(&state.db, &profile).await?;

    info!("Updated profile {} for user {}", profile.id, user.user_id);
    Ok(Json(profile))
}
