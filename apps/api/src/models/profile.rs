use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub field: Option<String>,
    pub university: String,
    pub location: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub gpa: Option<f64>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(default)]
    pub is_current: bool,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    pub link: Option<String>,
    pub github: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: Option<String>,
    pub expiry_date: Option<String>,
    pub credential_id: Option<String>,
    pub credential_url: Option<String>,
}

/// A user's stored profile. One row per user; the source of truth for every
/// generated document.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Profile {
    pub id: i32,
    pub user_id: i32,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub skills: Json<Vec<String>>,
    pub education: Json<Vec<Education>>,
    pub experience: Json<Vec<Experience>>,
    pub projects: Json<Vec<Project>>,
    pub certifications: Json<Vec<Certification>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
impl Profile {
    /// Minimal profile for unit tests.
    pub fn fixture(full_name: &str, skills: &[&str]) -> Self {
        let now = Utc::now();
        Profile {
            id: 1,
            user_id: 1,
            full_name: full_name.to_string(),
            email: Some("ada@example.com".to_string()),
            phone: Some("+1 555 0100".to_string()),
            linkedin: None,
            github: Some("https://github.com/ada".to_string()),
            portfolio: None,
            location: Some("London".to_string()),
            summary: Some("Systems engineer".to_string()),
            skills: Json(skills.iter().map(|s| s.to_string()).collect()),
            education: Json(vec![Education {
                degree: "BSc".to_string(),
                field: Some("Computer Science".to_string()),
                university: "University of London".to_string(),
                start_year: Some(2015),
                end_year: Some(2019),
                gpa: Some(3.8),
                ..Default::default()
            }]),
            experience: Json(vec![Experience {
                title: "Backend Engineer".to_string(),
                company: "Acme".to_string(),
                start_date: "2019-09".to_string(),
                is_current: true,
                achievements: vec!["Cut p99 latency by 40%".to_string()],
                technologies: vec!["Rust".to_string(), "PostgreSQL".to_string()],
                ..Default::default()
            }]),
            projects: Json(vec![Project {
                name: "ledger".to_string(),
                description: "Double-entry accounting engine".to_string(),
                technologies: vec!["Rust".to_string(), "Tokio".to_string()],
                github: Some("https://github.com/ada/ledger".to_string()),
                ..Default::default()
            }]),
            certifications: Json(vec![]),
            created_at: now,
            updated_at: now,
        }
    }
}
