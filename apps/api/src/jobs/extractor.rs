//! Job extractor: resolves the caller's job reference (URL or pasted text) into a
//! structured [`JobData`].

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::jobs::prompts::JOB_EXTRACT_PROMPT_TEMPLATE;
use crate::jobs::scraper::JobScraper;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::models::null_as_default;

const MIN_JOB_TEXT_CHARS: usize = 20;
const MAX_JOB_TEXT_CHARS: usize = 4000;
const SUMMARY_FALLBACK_CHARS: usize = 1000;

/// Job fields shared by every generate/analyze request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobRequest {
    pub job_url: Option<String>,
    pub job_description: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
}

/// Where the job text comes from. A URL wins when both are supplied.
#[derive(Debug, Clone, PartialEq)]
pub enum JobSource<'a> {
    Url(&'a str),
    Text(&'a str),
}

impl JobRequest {
    pub fn source(&self) -> Result<JobSource<'_>, AppError> {
        match (non_blank(&self.job_url), non_blank(&self.job_description)) {
            (Some(url), _) => Ok(JobSource::Url(url)),
            (None, Some(text)) => Ok(JobSource::Text(text)),
            (None, None) => Err(AppError::Validation(
                "Either job_url or job_description must be provided".to_string(),
            )),
        }
    }

    pub fn job_url(&self) -> Option<&str> {
        non_blank(&self.job_url)
    }
}

/// Structured job requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobData {
    #[serde(deserialize_with = "null_as_default")]
    pub job_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub job_description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub requirements: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub responsibilities: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills_required: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub preferred_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience_level: String,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
}

impl JobData {
    /// Baseline used wherever the LLM leaves a field empty.
    fn defaults_for(job_text: &str) -> Self {
        JobData {
            job_title: "Position".to_string(),
            company_name: "Company".to_string(),
            job_description: job_text.chars().take(SUMMARY_FALLBACK_CHARS).collect(),
            experience_level: "mid".to_string(),
            ..Default::default()
        }
    }

    /// Overlays the non-empty fields of `extracted` onto `self`.
    fn merge(mut self, extracted: JobData) -> Self {
        fn take_str(slot: &mut String, value: String) {
            if !value.trim().is_empty() {
                *slot = value.trim().to_string();
            }
        }
        fn take_list(slot: &mut Vec<String>, value: Vec<String>) {
            let value: Vec<String> = value
                .into_iter()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .collect();
            if !value.is_empty() {
                *slot = value;
            }
        }

        take_str(&mut self.job_title, extracted.job_title);
        take_str(&mut self.company_name, extracted.company_name);
        take_str(&mut self.job_description, extracted.job_description);
        take_str(&mut self.experience_level, extracted.experience_level);
        take_list(&mut self.requirements, extracted.requirements);
        take_list(&mut self.responsibilities, extracted.responsibilities);
        take_list(&mut self.skills_required, extracted.skills_required);
        take_list(&mut self.preferred_skills, extracted.preferred_skills);
        take_list(&mut self.keywords, extracted.keywords);
        self
    }

    fn override_identity(&mut self, title: Option<&str>, company: Option<&str>) {
        if let Some(title) = title {
            self.job_title = title.to_string();
        }
        if let Some(company) = company {
            self.company_name = company.to_string();
        }
    }
}

/// Resolves a job request into [`JobData`]: scrape or take the pasted text, check its
/// length, truncate, structure it with the LLM, then apply caller overrides.
///
/// Structuring failures degrade to defaults; scraping and validation failures do not.
pub async fn extract_job(
    request: &JobRequest,
    scraper: &JobScraper,
    llm: &LlmClient,
) -> Result<JobData, AppError> {
    let (job_text, scraped_title, scraped_company) = match request.source()? {
        JobSource::Url(url) => {
            let scraped = scraper
                .fetch_job(url)
                .await
                .map_err(|e| AppError::JobExtraction(format!("Could not extract job from URL: {e}")))?;
            info!(
                "Job text from {} ({}placeholder)",
                scraped.board,
                if scraped.from_url_pattern { "" } else { "no " }
            );
            (scraped.job_text, scraped.title, scraped.company)
        }
        JobSource::Text(text) => (text.to_string(), None, None),
    };

    let job_text = prepare_job_text(&job_text)?;

    let prompt = JOB_EXTRACT_PROMPT_TEMPLATE.replace("{jd_text}", &job_text);
    let extracted = match llm.call_json::<JobData>(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(data) => Some(data),
        Err(e) => {
            warn!("Job structuring failed, using defaults: {e}");
            None
        }
    };

    let job = assemble_job(
        &job_text,
        extracted,
        non_blank(&request.job_title).or(scraped_title.as_deref()),
        non_blank(&request.company_name).or(scraped_company.as_deref()),
    );

    info!(
        "Extracted job '{}' at '{}' ({} skills, {} keywords)",
        job.job_title,
        job.company_name,
        job.skills_required.len(),
        job.keywords.len()
    );

    Ok(job)
}

/// Rejects text too short to describe a job and truncates the rest.
fn prepare_job_text(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_JOB_TEXT_CHARS {
        return Err(AppError::Validation(
            "No job description available. Please provide a valid URL or paste the job description."
                .to_string(),
        ));
    }
    Ok(trimmed.chars().take(MAX_JOB_TEXT_CHARS).collect())
}

fn assemble_job(
    job_text: &str,
    extracted: Option<JobData>,
    title: Option<&str>,
    company: Option<&str>,
) -> JobData {
    let base = JobData::defaults_for(job_text);
    let mut job = match extracted {
        Some(extracted) => base.merge(extracted),
        None => base,
    };
    job.override_identity(title, company);
    job
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = "We are hiring a backend engineer to build payment APIs in Rust and Postgres.";

    #[test]
    fn test_url_takes_priority_over_text() {
        let request = JobRequest {
            job_url: Some("https://example.com/job/1".to_string()),
            job_description: Some(JD.to_string()),
            ..Default::default()
        };
        assert_eq!(request.source().unwrap(), JobSource::Url("https://example.com/job/1"));
    }

    #[test]
    fn test_blank_fields_count_as_missing() {
        let request = JobRequest {
            job_url: Some("   ".to_string()),
            job_description: Some("".to_string()),
            ..Default::default()
        };
        assert!(matches!(request.source(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_text_source_when_no_url() {
        let request = JobRequest {
            job_description: Some(format!("  {JD}  ")),
            ..Default::default()
        };
        assert_eq!(request.source().unwrap(), JobSource::Text(JD));
    }

    #[test]
    fn test_short_text_rejected() {
        let result = prepare_job_text("  too short  ");
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("No job description")));
    }

    #[test]
    fn test_long_text_truncated() {
        let long = "x".repeat(MAX_JOB_TEXT_CHARS + 500);
        assert_eq!(prepare_job_text(&long).unwrap().chars().count(), MAX_JOB_TEXT_CHARS);
    }

    #[test]
    fn test_empty_llm_fields_fall_back_to_defaults() {
        let extracted = JobData {
            job_title: "".to_string(),
            company_name: "Stripe".to_string(),
            skills_required: vec!["Rust".to_string(), " ".to_string()],
            ..Default::default()
        };
        let job = assemble_job(JD, Some(extracted), None, None);
        assert_eq!(job.job_title, "Position");
        assert_eq!(job.company_name, "Stripe");
        assert_eq!(job.skills_required, vec!["Rust"]);
        assert_eq!(job.experience_level, "mid");
        assert_eq!(job.job_description, JD);
    }

    #[test]
    fn test_caller_identity_overrides_extracted() {
        let extracted = JobData {
            job_title: "Engineer".to_string(),
            company_name: "Stripe".to_string(),
            ..Default::default()
        };
        let job = assemble_job(JD, Some(extracted), Some("Staff Engineer"), None);
        assert_eq!(job.job_title, "Staff Engineer");
        assert_eq!(job.company_name, "Stripe");
    }

    #[test]
    fn test_missing_extraction_uses_defaults() {
        let job = assemble_job(JD, None, None, Some("Acme"));
        assert_eq!(job.job_title, "Position");
        assert_eq!(job.company_name, "Acme");
        assert!(job.keywords.is_empty());
    }

    #[test]
    fn test_null_fields_keep_the_rest_of_the_extraction() {
        let extracted: JobData = serde_json::from_str(
            r#"{"job_title": "SRE", "company_name": null, "requirements": null, "skills_required": ["Go", "Kubernetes"], "keywords": ["on-call"]}"#,
        )
        .unwrap();
        let job = assemble_job(JD, Some(extracted), None, None);
        assert_eq!(job.job_title, "SRE");
        assert_eq!(job.company_name, "Company");
        assert_eq!(job.skills_required, vec!["Go", "Kubernetes"]);
        assert_eq!(job.keywords, vec!["on-call"]);
        assert!(job.requirements.is_empty());
    }

    #[test]
    fn test_job_data_tolerates_partial_json() {
        let job: JobData = serde_json::from_str(r#"{"job_title": "SRE", "keywords": ["k8s"]}"#).unwrap();
        assert_eq!(job.job_title, "SRE");
        assert_eq!(job.keywords, vec!["k8s"]);
        assert!(job.requirements.is_empty());
    }
}
