use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::profile::{Certification, Education, Experience, Profile, Project};

/// Body of `POST /api/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileCreate {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<Certification>,
}

/// Body of `PUT /api/profile`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub skills: Option<Vec<String>>,
    pub education: Option<Vec<Education>>,
    pub experience: Option<Vec<Experience>>,
    pub projects: Option<Vec<Project>>,
    pub certifications: Option<Vec<Certification>>,
}

impl ProfileUpdate {
    /// Overlays the supplied fields onto an existing profile.
    pub fn apply(self, profile: &mut Profile) {
        if let Some(v) = self.full_name {
            profile.full_name = v;
        }
        if let Some(v) = self.email {
            profile.email = Some(v);
        }
        if let Some(v) = self.phone {
            profile.phone = Some(v);
        }
        if let Some(v) = self.linkedin {
            profile.linkedin = Some(v);
        }
        if let Some(v) = self.github {
            profile.github = Some(v);
        }
        if let Some(v) = self.portfolio {
            profile.portfolio = Some(v);
        }
        if let Some(v) = self.location {
            profile.location = Some(v);
        }
        if let Some(v) = self.summary {
            profile.summary = Some(v);
        }
        if let Some(v) = self.skills {
            profile.skills = Json(v);
        }
        if let Some(v) = self.education {
            profile.education = Json(v);
        }
        if let Some(v) = self.experience {
            profile.experience = Json(v);
        }
        if let Some(v) = self.projects {
            profile.projects = Json(v);
        }
        if let Some(v) = self.certifications {
            profile.certifications = Json(v);
        }
    }
}

pub fn validate_full_name(full_name: &str) -> Result<(), AppError> {
    if full_name.trim().is_empty() {
        return Err(AppError::Validation("full_name is required".to_string()));
    }
    Ok(())
}

pub async fn find_profile(pool: &PgPool, user_id: i32) -> Result<Option<Profile>, AppError> {
    Ok(
        sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(pool)
            .await?,
    )
}

/// Profile lookup for generation endpoints, which cannot run without one.
pub async fn require_profile(pool: &PgPool, user_id: i32) -> Result<Profile, AppError> {
    find_profile(pool, user_id).await?.ok_or_else(|| {
        AppError::NotFound("Profile not found. Please create profile first.".to_string())
    })
}

pub async fn insert_profile(
    pool: &PgPool,
    user_id: i32,
    data: ProfileCreate,
) -> Result<Profile, AppError> {
    Ok(sqlx::query_as::<_, Profile>(
        r#"
        INSERT INTO profiles
            (user_id, full_name, email, phone, linkedin, github, portfolio, location, summary,
             skills, education, experience, projects, certifications)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(data.full_name.trim())
    .bind(data.email)
    .bind(data.phone)
    .bind(data.linkedin)
    .bind(data.github)
    .bind(data.portfolio)
    .bind(data.location)
    .bind(data.summary)
    .bind(Json(data.skills))
    .bind(Json(data.education))
    .bind(Json(data.experience))
    .bind(Json(data.projects))
    .bind(Json(data.certifications))
    .fetch_one(pool)
    .await?)
}

/// Writes every column of `profile` back and bumps `updated_at`.
pub async fn save_profile(pool: &PgPool, profile: &Profile) -> Result<Profile, AppError> {
    Ok(sqlx::query_as::<_, Profile>(
        r#"
        UPDATE profiles SET
            full_name = $2, email = $3, phone = $4, linkedin = $5, github = $6,
            portfolio = $7, location = $8, summary = $9, skills = $10, education = $11,
            experience = $12, projects = $13, certifications = $14, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(profile.id)
    .bind(&profile.full_name)
    .bind(&profile.email)
    .bind(&profile.phone)
    .bind(&profile.linkedin)
    .bind(&profile.github)
    .bind(&profile.portfolio)
    .bind(&profile.location)
    .bind(&profile.summary)
    .bind(&profile.skills)
    .bind(&profile.education)
    .bind(&profile.experience)
    .bind(&profile.projects)
    .bind(&profile.certifications)
    .fetch_one(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_only_touches_supplied_fields() {
        let mut profile = Profile::fixture("Ada Lovelace", &["Rust"]);
        let update = ProfileUpdate {
            summary: Some("Compiler engineer".to_string()),
            skills: Some(vec!["Rust".to_string(), "LLVM".to_string()]),
            ..Default::default()
        };

        update.apply(&mut profile);

        assert_eq!(profile.full_name, "Ada Lovelace");
        assert_eq!(profile.summary.as_deref(), Some("Compiler engineer"));
        assert_eq!(profile.skills.0, vec!["Rust", "LLVM"]);
        assert_eq!(profile.experience.0.len(), 1);
    }

    #[test]
    fn test_update_deserializes_from_partial_json() {
        let update: ProfileUpdate = serde_json::from_str(r#"{"phone": "+44 20 0000"}"#).unwrap();
        assert_eq!(update.phone.as_deref(), Some("+44 20 0000"));
        assert!(update.full_name.is_none());
        assert!(update.projects.is_none());
    }

    #[test]
    fn test_blank_full_name_rejected() {
        assert!(validate_full_name("   ").is_err());
        assert!(validate_full_name("Ada").is_ok());
    }

    #[test]
    fn test_create_defaults_lists() {
        let create: ProfileCreate = serde_json::from_str(r#"{"full_name": "Ada"}"#).unwrap();
        assert!(create.skills.is_empty());
        assert!(create.certifications.is_empty());
    }
}
