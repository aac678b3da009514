//! Request and response bodies of the ResumeAI REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Server error body.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: String,
}

// ── Profile ──────────────────────────────────────────────────────────────────

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

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Profile {
    pub id: i32,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of both profile create and update. Absent fields are not sent, so an
/// update only touches what is set here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub education: Option<Vec<Education>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Experience>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Vec<Certification>>,
}

// ── Job submissions ──────────────────────────────────────────────────────────

/// Job reference submitted to every generate/analyze endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

impl JobRequest {
    /// Drops blank fields and requires a URL or a description.
    pub fn validated(self) -> Result<Self, ClientError> {
        let clean = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let request = JobRequest {
            job_url: clean(self.job_url),
            job_description: clean(self.job_description),
            job_title: clean(self.job_title),
            company_name: clean(self.company_name),
        };
        if request.job_url.is_none() && request.job_description.is_none() {
            return Err(ClientError::Validation(
                "Please provide either a job URL or a job description".to_string(),
            ));
        }
        Ok(request)
    }
}

// ── Documents ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OptimizationStep {
    pub iteration: u32,
    pub score: i32,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Resume {
    pub id: i32,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_description: Option<String>,
    pub job_url: Option<String>,
    pub latex_content: String,
    pub ats_score: i32,
    pub iterations: i32,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub optimization_history: Vec<OptimizationStep>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResumeSummary {
    pub id: i32,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub ats_score: i32,
    pub iterations: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&Resume> for ResumeSummary {
    fn from(resume: &Resume) -> Self {
        ResumeSummary {
            id: resume.id,
            job_title: resume.job_title.clone(),
            company_name: resume.company_name.clone(),
            ats_score: resume.ats_score,
            iterations: resume.iterations,
            created_at: resume.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoverLetter {
    pub id: i32,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub job_description: Option<String>,
    pub job_url: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PriorityGap {
    pub skill: String,
    pub priority: String,
    pub reason: String,
    pub time_to_learn: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Strength {
    pub skill: String,
    pub level: String,
    pub evidence: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub description: String,
    pub resource: String,
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CertificationSuggestion {
    pub name: String,
    pub provider: String,
    pub relevance: String,
    pub cost: String,
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainingCourse {
    pub name: String,
    pub platform: String,
    pub url: String,
    pub skill_covered: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GapAnalysis {
    pub id: i32,
    pub job_title: Option<String>,
    pub job_url: Option<String>,
    pub match_percentage: i32,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub priority_gaps: Vec<PriorityGap>,
    #[serde(default)]
    pub strengths: Vec<Strength>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub certifications_suggested: Vec<CertificationSuggestion>,
    #[serde(default)]
    pub training_courses: Vec<TrainingCourse>,
    #[serde(default)]
    pub learning_roadmap: String,
    pub created_at: DateTime<Utc>,
}

/// Anything listed in a history view.
pub trait Document {
    fn id(&self) -> i32;
    fn created_at(&self) -> DateTime<Utc>;
}

macro_rules! impl_document {
    ($($t:ty),*) => {
        $(impl Document for $t {
            fn id(&self) -> i32 {
                self.id
            }
            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        })*
    };
}

impl_document!(Resume, ResumeSummary, CoverLetter, GapAnalysis);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_request_requires_url_or_description() {
        let err = JobRequest {
            job_title: Some("SRE".to_string()),
            job_url: Some("   ".to_string()),
            ..Default::default()
        }
        .validated()
        .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[test]
    fn test_job_request_blank_fields_not_sent() {
        let request = JobRequest {
            job_description: Some(" Rust engineer for payments ".to_string()),
            company_name: Some("".to_string()),
            ..Default::default()
        }
        .validated()
        .unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, serde_json::json!({"job_description": "Rust engineer for payments"}));
    }

    #[test]
    fn test_profile_input_omits_unset_fields() {
        let update = ProfileInput {
            summary: Some("Compiler engineer".to_string()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"summary": "Compiler engineer"})
        );
    }

    #[test]
    fn test_resume_deserializes_from_api_body() {
        let resume: Resume = serde_json::from_value(serde_json::json!({
            "id": 7,
            "job_title": "SRE",
            "company_name": null,
            "job_description": "Run things",
            "job_url": null,
            "latex_content": "\\documentclass{article}",
            "ats_score": 88,
            "iterations": 2,
            "keywords": ["Kubernetes"],
            "optimization_history": [{"iteration": 1, "score": 70, "missing_keywords": ["Go"], "suggestions": []}],
            "created_at": "2026-01-05T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(resume.iterations, 2);
        assert_eq!(resume.optimization_history[0].score, 70);
        assert_eq!(ResumeSummary::from(&resume).ats_score, 88);
    }
}
