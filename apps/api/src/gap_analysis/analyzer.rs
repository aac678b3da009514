//! Gap analyzer: compares a profile with a job's skill requirements.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::gap_analysis::prompts::GAP_ANALYSIS_PROMPT_TEMPLATE;
use crate::generation::profile_text::{education_text, experience_text, projects_text};
use crate::jobs::extractor::JobData;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{parse_json_reply, LlmClient, LlmError};
use crate::models::documents::{
    CertificationSuggestion, PriorityGap, PriorityTier, Recommendation, Strength, TrainingCourse,
};
use crate::models::null_as_default;
use crate::models::profile::Profile;

const ANALYSIS_MAX_TOKENS: u32 = 3000;
const DEFAULT_MATCH_PERCENTAGE: i32 = 50;
const JOB_SUMMARY_CHARS: usize = 1500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapAnalysis {
    /// Always within 0..=100.
    pub match_percentage: i32,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub strengths: Vec<Strength>,
    pub priority_gaps: Vec<PriorityGap>,
    pub recommendations: Vec<Recommendation>,
    pub certifications_suggested: Vec<CertificationSuggestion>,
    pub training_courses: Vec<TrainingCourse>,
    pub learning_roadmap: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGapAnalysis {
    match_percentage: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    matching_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    missing_skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    strengths: Vec<Strength>,
    #[serde(deserialize_with = "null_as_default")]
    priority_gaps: Vec<PriorityGap>,
    #[serde(deserialize_with = "null_as_default")]
    recommendations: Vec<Recommendation>,
    #[serde(deserialize_with = "null_as_default")]
    certifications_suggested: Vec<CertificationSuggestion>,
    #[serde(deserialize_with = "null_as_default")]
    training_courses: Vec<TrainingCourse>,
    learning_roadmap: Option<String>,
}

impl From<RawGapAnalysis> for GapAnalysis {
    fn from(raw: RawGapAnalysis) -> Self {
        let match_percentage = match raw.match_percentage {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
            _ => None,
        }
        .map(|p| p.round().clamp(0.0, 100.0) as i32)
        .unwrap_or(DEFAULT_MATCH_PERCENTAGE);

        let learning_roadmap = raw
            .learning_roadmap
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| fallback_roadmap(&raw.missing_skills));

        GapAnalysis {
            match_percentage,
            matching_skills: raw.matching_skills,
            missing_skills: raw.missing_skills,
            strengths: raw.strengths,
            priority_gaps: raw.priority_gaps,
            recommendations: raw.recommendations,
            certifications_suggested: raw.certifications_suggested,
            training_courses: raw.training_courses,
            learning_roadmap,
        }
    }
}

/// Runs the model analysis, falling back to keyword overlap on any model failure.
pub async fn analyze_gap(llm: &LlmClient, profile: &Profile, job: &JobData) -> GapAnalysis {
    let prompt = build_prompt(profile, job);

    match request_analysis(llm, &prompt).await {
        Ok(analysis) => {
            info!("Gap analysis for '{}': {}% match", job.job_title, analysis.match_percentage);
            analysis
        }
        Err(e) => {
            warn!("Gap analysis model call failed, using keyword analysis: {e}");
            keyword_gap_analysis(&profile.skills, &job_skills(job))
        }
    }
}

async fn request_analysis(llm: &LlmClient, prompt: &str) -> Result<GapAnalysis, LlmError> {
    let reply = llm.call_text(prompt, JSON_ONLY_SYSTEM, ANALYSIS_MAX_TOKENS).await?;
    Ok(parse_json_reply::<RawGapAnalysis>(&reply)?.into())
}

fn job_skills(job: &JobData) -> Vec<String> {
    job.skills_required
        .iter()
        .chain(job.preferred_skills.iter())
        .cloned()
        .collect()
}

fn list_or(items: &[String], n: usize, empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
    }
}

fn build_prompt(profile: &Profile, job: &JobData) -> String {
    let job_summary: String = job.job_description.chars().take(JOB_SUMMARY_CHARS).collect();

    GAP_ANALYSIS_PROMPT_TEMPLATE
        .replace("{job_title}", &job.job_title)
        .replace("{company_name}", &job.company_name)
        .replace("{skills_required}", &list_or(&job.skills_required, 15, "Not specified"))
        .replace("{preferred_skills}", &list_or(&job.preferred_skills, 15, "Not specified"))
        .replace("{requirements}", &list_or(&job.requirements, 8, "As per job description"))
        .replace("{skills}", &list_or(&profile.skills, 30, "No skills listed"))
        .replace("{education}", &education_text(&profile.education))
        .replace("{experience}", &experience_text(&profile.experience))
        .replace("{projects}", &projects_text(&profile.projects))
        .replace("{job_summary}", &job_summary)
}

/// Deterministic analysis: a job skill matches when it and a candidate skill
/// contain one another, case-insensitively.
pub fn keyword_gap_analysis(candidate_skills: &[String], job_skills: &[String]) -> GapAnalysis {
    let candidate: Vec<String> = candidate_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let (matching, missing): (Vec<String>, Vec<String>) = job_skills.iter().cloned().partition(|skill| {
        let skill = skill.to_lowercase();
        candidate
            .iter()
            .any(|c| c.contains(&skill) || skill.contains(c.as_str()))
    });

    let match_percentage = if job_skills.is_empty() {
        DEFAULT_MATCH_PERCENTAGE
    } else {
        (matching.len() * 100 / job_skills.len()) as i32
    };

    let strengths = matching
        .iter()
        .take(5)
        .map(|skill| Strength {
            skill: skill.clone(),
            level: "Intermediate".to_string(),
            evidence: "Listed in profile".to_string(),
        })
        .collect();

    let priority_gaps = missing
        .iter()
        .take(5)
        .map(|skill| PriorityGap {
            skill: skill.clone(),
            priority: PriorityTier::High,
            reason: "Required for role".to_string(),
            time_to_learn: "2-4 weeks".to_string(),
        })
        .collect();

    let first_missing = missing.first().cloned();
    let recommendations = first_missing
        .iter()
        .map(|skill| Recommendation {
            kind: "Training".to_string(),
            title: format!("Learn {skill}"),
            description: "Take an online course".to_string(),
            resource: "Coursera/Udemy".to_string(),
            duration: "4-6 weeks".to_string(),
        })
        .collect();

    let course_skill = first_missing.unwrap_or_else(|| "Programming".to_string());

    GapAnalysis {
        match_percentage,
        learning_roadmap: fallback_roadmap(&missing),
        matching_skills: matching.into_iter().take(10).collect(),
        missing_skills: missing.into_iter().take(10).collect(),
        strengths,
        priority_gaps,
        recommendations,
        certifications_suggested: vec![CertificationSuggestion {
            name: "AWS/GCP Certification".to_string(),
            provider: "Cloud Provider".to_string(),
            relevance: "Industry standard".to_string(),
            cost: "$150-300".to_string(),
            duration: "2-3 months".to_string(),
        }],
        training_courses: vec![TrainingCourse {
            name: format!("{course_skill} Course"),
            platform: "Udemy".to_string(),
            url: "udemy.com".to_string(),
            skill_covered: course_skill,
            duration: "20-40 hours".to_string(),
        }],
    }
}

/// Four-phase plan over the first five missing skills.
pub fn fallback_roadmap(missing_skills: &[String]) -> String {
    if missing_skills.is_empty() {
        return "Continue building on your current skills through challenging projects and \
                staying updated with industry trends."
            .to_string();
    }

    let skills: Vec<&str> = missing_skills.iter().take(5).map(String::as_str).collect();
    let phase1 = skills[0];
    let phase2 = skills.get(1).copied().unwrap_or("advanced concepts");
    let phase3 = if skills.len() > 2 {
        skills[2..skills.len().min(4)].join(", ")
    } else {
        "integration and best practices".to_string()
    };

    format!(
        "**Phase 1 (Weeks 1-4): Foundation**\n\
         - Learn: {phase1}\n\
         - Complete an online course and build a practice project\n\n\
         **Phase 2 (Weeks 5-8): Development**\n\
         - Learn: {phase2}\n\
         - Work on hands-on exercises and contribute to open-source\n\n\
         **Phase 3 (Weeks 9-12): Advanced Application**\n\
         - Master: {phase3}\n\
         - Build a comprehensive portfolio project\n\n\
         **Phase 4 (Ongoing): Continuous Improvement**\n\
         - Pursue certifications and stay updated with trends"
    )
}
