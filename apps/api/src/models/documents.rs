use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use super::null_as_default;

/// One revision pass of the resume optimization loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationStep {
    pub iteration: u32,
    pub score: i32,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeRow {
    pub id: i32,
    #[serde(skip_serializing)]
    pub user_id: i32,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_description: Option<String>,
    pub job_url: Option<String>,
    pub latex_content: String,
    pub ats_score: i32,
    pub iterations: i32,
    pub keywords: Json<Vec<String>>,
    pub optimization_history: Json<Vec<OptimizationStep>>,
    pub created_at: DateTime<Utc>,
}

/// History-list projection of a resume.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ResumeSummary {
    pub id: i32,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub ats_score: i32,
    pub iterations: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CoverLetterRow {
    pub id: i32,
    #[serde(skip_serializing)]
    pub user_id: i32,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_description: Option<String>,
    pub job_url: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Urgency of closing a skill gap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityTier {
    #[serde(alias = "critical", alias = "CRITICAL")]
    Critical,
    #[default]
    #[serde(alias = "high", alias = "HIGH")]
    High,
    #[serde(alias = "medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "low", alias = "LOW")]
    Low,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityGap {
    #[serde(deserialize_with = "null_as_default")]
    pub skill: String,
    #[serde(deserialize_with = "null_as_default")]
    pub priority: PriorityTier,
    #[serde(deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time_to_learn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strength {
    #[serde(deserialize_with = "null_as_default")]
    pub skill: String,
    #[serde(deserialize_with = "null_as_default")]
    pub level: String,
    #[serde(deserialize_with = "null_as_default")]
    pub evidence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    #[serde(rename = "type")]
    #[serde(deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub resource: String,
    #[serde(deserialize_with = "null_as_default")]
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationSuggestion {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub provider: String,
    #[serde(deserialize_with = "null_as_default")]
    pub relevance: String,
    #[serde(deserialize_with = "null_as_default")]
    pub cost: String,
    #[serde(deserialize_with = "null_as_default")]
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingCourse {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub platform: String,
    #[serde(deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub skill_covered: String,
    #[serde(deserialize_with = "null_as_default")]
    pub duration: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct GapAnalysisRow {
    pub id: i32,
    #[serde(skip_serializing)]
    pub user_id: i32,
    pub job_title: Option<String>,
    #[serde(skip_serializing)]
    pub job_description: Option<String>,
    pub job_url: Option<String>,
    pub match_percentage: i32,
    pub matching_skills: Json<Vec<String>>,
    pub missing_skills: Json<Vec<String>>,
    pub priority_gaps: Json<Vec<PriorityGap>>,
    pub strengths: Json<Vec<Strength>>,
    pub recommendations: Json<Vec<Recommendation>>,
    pub certifications_suggested: Json<Vec<CertificationSuggestion>>,
    pub training_courses: Json<Vec<TrainingCourse>>,
    pub learning_roadmap: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_tier_accepts_lowercase() {
        let gap: PriorityGap = serde_json::from_str(
            r#"{"skill": "Kubernetes", "priority": "critical", "reason": "core", "time_to_learn": "4 weeks"}"#,
        )
        .unwrap();
        assert_eq!(gap.priority, PriorityTier::Critical);
    }

    #[test]
    fn test_recommendation_type_field_renamed() {
        let rec: Recommendation =
            serde_json::from_str(r#"{"type": "Certification", "title": "CKA"}"#).unwrap();
        assert_eq!(rec.kind, "Certification");
        assert_eq!(rec.title, "CKA");
        assert!(rec.duration.is_empty());
    }
}
