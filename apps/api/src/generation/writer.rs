//! Resume writer: the generate / score / revise seam driven by the optimization loop.
//!
//! `AppState` holds an `Arc<dyn ResumeWriter>`; production uses [`LlmResumeWriter`],
//! tests script their own.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::latex::{is_latex_document, render_fallback_resume};
use crate::generation::profile_text::{
    certifications_text, contact_block, education_text, experience_text, projects_text,
};
use crate::generation::prompts::{
    ATS_SCORE_PROMPT_TEMPLATE, RESUME_PROMPT_TEMPLATE, REVISE_PROMPT_TEMPLATE,
};
use crate::jobs::extractor::JobData;
use crate::llm_client::prompts::{FACTUALITY_INSTRUCTION, JSON_ONLY_SYSTEM, WRITER_SYSTEM};
use crate::llm_client::{parse_json_reply, LlmClient};
use crate::models::null_as_default;
use crate::models::profile::Profile;

const RESUME_MAX_TOKENS: u32 = 4000;
const SCORE_MAX_TOKENS: u32 = 1500;
/// Resume text shown to the scorer / reviser, in characters.
const SCORE_RESUME_CHARS: usize = 2000;
const REVISE_RESUME_CHARS: usize = 3000;
const NEUTRAL_SCORE: i32 = 50;

// ────────────────────────────────────────────────────────────────────────────
// ATS report
// ────────────────────────────────────────────────────────────────────────────

/// Scorer verdict on one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct AtsReport {
    /// Always within 0..=100.
    pub ats_score: i32,
    pub keyword_matches: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
}

impl AtsReport {
    /// Report used when the scorer's reply cannot be read.
    pub fn neutral() -> Self {
        Self {
            ats_score: NEUTRAL_SCORE,
            keyword_matches: vec![],
            missing_keywords: vec![],
            suggestions: vec![],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAtsReport {
    ats_score: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    keyword_matches: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    missing_keywords: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    suggestions: Vec<String>,
}

impl From<RawAtsReport> for AtsReport {
    fn from(raw: RawAtsReport) -> Self {
        let score = match raw.ats_score {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
            _ => None,
        };
        AtsReport {
            ats_score: score
                .map(|s| s.round().clamp(0.0, 100.0) as i32)
                .unwrap_or(NEUTRAL_SCORE),
            keyword_matches: raw.keyword_matches,
            missing_keywords: raw.missing_keywords,
            suggestions: raw.suggestions,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait ResumeWriter: Send + Sync {
    /// First candidate for the job. Always a complete LaTeX document.
    async fn generate(&self, profile: &Profile, job: &JobData) -> Result<String, AppError>;

    async fn score(&self, resume: &str, job: &JobData) -> Result<AtsReport, AppError>;

    /// Next candidate given the scorer's feedback. Returns `resume` unchanged when
    /// no usable revision comes back.
    async fn revise(
        &self,
        resume: &str,
        report: &AtsReport,
        iteration: u32,
    ) -> Result<String, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// LlmResumeWriter
// ────────────────────────────────────────────────────────────────────────────

pub struct LlmResumeWriter {
    llm: LlmClient,
}

impl LlmResumeWriter {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ResumeWriter for LlmResumeWriter {
    async fn generate(&self, profile: &Profile, job: &JobData) -> Result<String, AppError> {
        let prompt = build_resume_prompt(profile, job);
        let reply = self.llm.call_text(&prompt, WRITER_SYSTEM, RESUME_MAX_TOKENS).await?;

        if is_latex_document(&reply) {
            info!("Generated resume draft ({} chars)", reply.len());
            Ok(reply.trim().to_string())
        } else {
            warn!("Model reply is not a LaTeX document; rendering profile template");
            Ok(render_fallback_resume(profile, job))
        }
    }

    async fn score(&self, resume: &str, job: &JobData) -> Result<AtsReport, AppError> {
        let prompt = build_score_prompt(resume, job);
        let reply = self.llm.call_text(&prompt, JSON_ONLY_SYSTEM, SCORE_MAX_TOKENS).await?;

        match parse_json_reply::<RawAtsReport>(&reply) {
            Ok(raw) => Ok(raw.into()),
            Err(e) => {
                warn!("Unreadable ATS report, scoring neutral: {e}");
                Ok(AtsReport::neutral())
            }
        }
    }

    async fn revise(
        &self,
        resume: &str,
        report: &AtsReport,
        iteration: u32,
    ) -> Result<String, AppError> {
        let prompt = build_revise_prompt(resume, report, iteration);
        let reply = self.llm.call_text(&prompt, WRITER_SYSTEM, RESUME_MAX_TOKENS).await?;

        if is_latex_document(&reply) {
            Ok(reply.trim().to_string())
        } else {
            warn!("Revision {iteration} is not a LaTeX document; keeping current candidate");
            Ok(resume.to_string())
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt assembly
// ────────────────────────────────────────────────────────────────────────────

fn head(items: &[String], n: usize) -> String {
    items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn build_resume_prompt(profile: &Profile, job: &JobData) -> String {
    let job_skills: Vec<String> = job
        .skills_required
        .iter()
        .chain(job.preferred_skills.iter())
        .cloned()
        .collect();

    RESUME_PROMPT_TEMPLATE
        .replace("{job_title}", &job.job_title)
        .replace("{company_name}", &job.company_name)
        .replace("{job_skills}", &head(&job_skills, 20))
        .replace("{requirements}", &head(&job.requirements, 8))
        .replace("{responsibilities}", &head(&job.responsibilities, 8))
        .replace("{contact}", &contact_block(profile))
        .replace("{summary}", profile.summary.as_deref().unwrap_or("N/A"))
        .replace("{skills}", &profile.skills.join(", "))
        .replace("{education}", &education_text(&profile.education))
        .replace("{experience}", &experience_text(&profile.experience))
        .replace("{projects}", &projects_text(&profile.projects))
        .replace("{certifications}", &certifications_text(&profile.certifications))
        .replace("{factuality}", FACTUALITY_INSTRUCTION)
}

fn build_score_prompt(resume: &str, job: &JobData) -> String {
    ATS_SCORE_PROMPT_TEMPLATE
        .replace("{job_title}", &job.job_title)
        .replace("{company_name}", &job.company_name)
        .replace("{skills_required}", &head(&job.skills_required, 10))
        .replace("{preferred_skills}", &head(&job.preferred_skills, 10))
        .replace("{experience_level}", &job.experience_level)
        .replace("{requirements}", &head(&job.requirements, 5))
        .replace("{keywords}", &head(&job.keywords, 15))
        .replace("{resume}", &truncate(resume, SCORE_RESUME_CHARS))
}

fn build_revise_prompt(resume: &str, report: &AtsReport, iteration: u32) -> String {
    REVISE_PROMPT_TEMPLATE
        .replace("{iteration}", &iteration.to_string())
        .replace("{score}", &report.ats_score.to_string())
        .replace("{missing_keywords}", &head(&report.missing_keywords, 10))
        .replace("{suggestions}", &head(&report.suggestions, 5))
        .replace("{factuality}", FACTUALITY_INSTRUCTION)
        .replace("{resume}", &truncate(resume, REVISE_RESUME_CHARS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_from(json: &str) -> AtsReport {
        parse_json_reply::<RawAtsReport>(json).unwrap().into()
    }

    #[test]
    fn test_score_clamped_to_range() {
        assert_eq!(report_from(r#"{"ats_score": 140}"#).ats_score, 100);
        assert_eq!(report_from(r#"{"ats_score": -3}"#).ats_score, 0);
        assert_eq!(report_from(r#"{"ats_score": 86.6}"#).ats_score, 87);
    }

    #[test]
    fn test_missing_score_defaults_to_neutral() {
        let report = report_from(r#"{"keyword_matches": ["Rust"]}"#);
        assert_eq!(report.ats_score, 50);
        assert_eq!(report.keyword_matches, vec!["Rust"]);
    }

    #[test]
    fn test_null_lists_keep_the_score() {
        let report = report_from(
            r#"{"ats_score": 92, "keyword_matches": ["Rust"], "missing_keywords": null, "suggestions": null}"#,
        );
        assert_eq!(report.ats_score, 92);
        assert_eq!(report.keyword_matches, vec!["Rust"]);
        assert!(report.missing_keywords.is_empty());
        assert!(report.suggestions.is_empty());
    }

    #[test]
    fn test_string_score_accepted() {
        assert_eq!(report_from(r#"{"ats_score": "78%"}"#).ats_score, 78);
        assert_eq!(report_from(r#"{"ats_score": "high"}"#).ats_score, 50);
    }

    #[test]
    fn test_report_parsed_through_prose() {
        let report = report_from(
            "Here is the analysis:\n{\"ats_score\": 72, \"missing_keywords\": [\"Kafka\"], \"suggestions\": [\"Mention Kafka\"]}",
        );
        assert_eq!(report.ats_score, 72);
        assert_eq!(report.missing_keywords, vec!["Kafka"]);
        assert_eq!(report.suggestions, vec!["Mention Kafka"]);
    }

    #[test]
    fn test_resume_prompt_carries_profile_and_job() {
        let profile = Profile::fixture("Ada Lovelace", &["Rust", "Go"]);
        let job = JobData {
            job_title: "Systems Engineer".to_string(),
            company_name: "Acme".to_string(),
            skills_required: vec!["Rust".to_string()],
            preferred_skills: vec!["Kafka".to_string()],
            ..Default::default()
        };
        let prompt = build_resume_prompt(&profile, &job);

        assert!(prompt.contains("Position: Systems Engineer at Acme"));
        assert!(prompt.contains("Required Skills: Rust, Kafka"));
        assert!(prompt.contains("Name: Ada Lovelace"));
        assert!(prompt.contains("ALL Skills: Rust, Go"));
        assert!(prompt.contains("- ledger"));
        assert!(!prompt.contains("{factuality}"));
    }

    #[test]
    fn test_revise_prompt_carries_feedback() {
        let report = AtsReport {
            ats_score: 61,
            keyword_matches: vec![],
            missing_keywords: vec!["Kubernetes".to_string(), "gRPC".to_string()],
            suggestions: vec!["Quantify impact".to_string()],
        };
        let prompt = build_revise_prompt("\\documentclass{article}", &report, 2);

        assert!(prompt.contains("This is revision 2."));
        assert!(prompt.contains("Current Score: 61%"));
        assert!(prompt.contains("Missing Keywords: Kubernetes, gRPC"));
        assert!(prompt.contains("Suggestions: Quantify impact"));
    }

    #[test]
    fn test_score_prompt_truncates_resume() {
        let long_resume = "x".repeat(SCORE_RESUME_CHARS * 2);
        let prompt = build_score_prompt(&long_resume, &JobData::default());
        assert!(prompt.len() < long_resume.len());
    }
}
