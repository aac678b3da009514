//! Cover letter generation with a deterministic letter for unusable model output.

use tracing::{info, warn};

use crate::cover_letter::prompts::COVER_LETTER_PROMPT_TEMPLATE;
use crate::generation::profile_text::{contact_block, education_text, experience_text, projects_text};
use crate::jobs::extractor::JobData;
use crate::llm_client::prompts::{FACTUALITY_INSTRUCTION, WRITER_SYSTEM};
use crate::llm_client::LlmClient;
use crate::models::profile::Profile;

const LETTER_MAX_TOKENS: u32 = 2000;
/// Replies at or below this length are treated as failures.
const MIN_LETTER_CHARS: usize = 100;
const JOB_SUMMARY_CHARS: usize = 1500;

/// Asks the model for a letter; any failure or too-short reply yields the
/// profile-built letter instead.
pub async fn write_cover_letter(llm: &LlmClient, profile: &Profile, job: &JobData) -> String {
    let prompt = build_prompt(profile, job);
    let reply = match llm.call_text(&prompt, WRITER_SYSTEM, LETTER_MAX_TOKENS).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!("Cover letter generation failed: {e}");
            None
        }
    };
    finalize_letter(reply, profile, job)
}

fn finalize_letter(reply: Option<String>, profile: &Profile, job: &JobData) -> String {
    match reply.map(|r| r.trim().to_string()) {
        Some(letter) if letter.chars().count() > MIN_LETTER_CHARS => {
            info!("Cover letter generated ({} chars)", letter.len());
            letter
        }
        _ => {
            warn!("Using fallback cover letter for '{}'", job.job_title);
            fallback_letter(profile, job)
        }
    }
}

fn build_prompt(profile: &Profile, job: &JobData) -> String {
    let job_skills: Vec<&str> = job
        .skills_required
        .iter()
        .chain(job.preferred_skills.iter())
        .take(15)
        .map(String::as_str)
        .collect();
    let job_skills = if job_skills.is_empty() {
        "various technical skills".to_string()
    } else {
        job_skills.join(", ")
    };
    let requirements = if job.requirements.is_empty() {
        "as specified in the job posting".to_string()
    } else {
        job.requirements.iter().take(8).cloned().collect::<Vec<_>>().join(", ")
    };
    let skills = if profile.skills.is_empty() {
        "software development, problem-solving, and teamwork".to_string()
    } else {
        profile.skills.iter().take(20).cloned().collect::<Vec<_>>().join(", ")
    };
    let job_summary: String = job.job_description.chars().take(JOB_SUMMARY_CHARS).collect();

    COVER_LETTER_PROMPT_TEMPLATE
        .replace("{job_title}", &job.job_title)
        .replace("{company_name}", &job.company_name)
        .replace("{job_skills}", &job_skills)
        .replace("{requirements}", &requirements)
        .replace("{contact}", &contact_block(profile))
        .replace("{summary}", profile.summary.as_deref().unwrap_or("N/A"))
        .replace("{skills}", &skills)
        .replace("{education}", &education_text(&profile.education))
        .replace("{experience}", &experience_text(&profile.experience))
        .replace("{projects}", &projects_text(&profile.projects))
        .replace("{full_name}", &profile.full_name)
        .replace("{factuality}", FACTUALITY_INSTRUCTION)
        .replace("{job_summary}", &job_summary)
}

/// Letter assembled from the profile alone.
pub fn fallback_letter(profile: &Profile, job: &JobData) -> String {
    let position = match non_empty(&job.job_title) {
        Some(title) => format!("the {title} position"),
        None => "this position".to_string(),
    };
    let company = non_empty(&job.company_name).unwrap_or("your company");

    let skills = if profile.skills.is_empty() {
        "Python, JavaScript, data structures, algorithms, and software development".to_string()
    } else {
        profile.skills.iter().take(8).cloned().collect::<Vec<_>>().join(", ")
    };

    let degree_opening = match profile.education.first() {
        Some(edu) => format!(
            "As a {} graduate in {} from {}, I am",
            edu.degree,
            edu.field.as_deref().unwrap_or("Computer Science"),
            edu.university
        ),
        None => "With a strong background in Computer Science, I am".to_string(),
    };

    let experience = profile
        .experience
        .first()
        .map(|exp| {
            let tech = if exp.technologies.is_empty() {
                "various technologies".to_string()
            } else {
                exp.technologies.iter().take(4).cloned().collect::<Vec<_>>().join(", ")
            };
            format!(
                " In my role as {} at {}, I worked with {tech}, developing solutions that improved \
                 team efficiency and system reliability.",
                exp.title, exp.company
            )
        })
        .unwrap_or_default();

    let mut projects = String::new();
    if let Some(first) = profile.projects.first() {
        let tech = if first.technologies.is_empty() {
            "various technologies".to_string()
        } else {
            first.technologies.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
        };
        let description: String = first.description.chars().take(100).collect();
        projects.push_str(&format!(
            "\n\nOne of my standout projects is {}, where I used {tech} to build {description}.",
            first.name
        ));
        if let Some(second) = profile.projects.get(1) {
            let tech = second.technologies.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
            projects.push_str(&format!(
                " I also developed {} using {tech}, demonstrating my ability to design and implement \
                 robust systems.",
                second.name
            ));
        }
    }

    let contact: Vec<&str> = [profile.email.as_deref(), profile.phone.as_deref()]
        .into_iter()
        .flatten()
        .collect();

    format!(
        "Dear Hiring Manager,\n\n\
         {degree_opening} writing to express my interest in {position} at {company}. \
         With a strong foundation in data structures, algorithms, and systems design, I am confident \
         in my ability to contribute meaningfully to your engineering team.{experience}\n\n\
         My technical expertise includes {skills}. Through my academic and personal projects, I have \
         developed strong problem-solving skills and a deep understanding of software development \
         practices.{projects}\n\n\
         {alignment} at {company}. I am drawn to the company's commitment to technical excellence, and \
         I believe my combination of technical skills and project experience makes me a strong fit \
         for this role.\n\n\
         I would welcome the opportunity to discuss how my background can contribute to {company}'s \
         mission. Thank you for considering my application.\n\n\
         Sincerely,\n{name}{contact}",
        alignment = team_alignment(&job.job_title),
        name = profile.full_name,
        contact = if contact.is_empty() {
            String::new()
        } else {
            format!("\n{}", contact.join("\n"))
        },
    )
}

/// Which kind of team the letter says the candidate wants to join, from the job title.
fn team_alignment(job_title: &str) -> &'static str {
    let title = job_title.to_lowercase();
    let words: Vec<&str> = title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has_word = |w: &str| words.contains(&w);

    if has_word("ml") || has_word("ai") || title.contains("machine learning") {
        "I am particularly excited about the opportunity to contribute to AI/ML initiatives"
    } else if has_word("backend") || has_word("infrastructure") || has_word("systems") {
        "I am particularly excited about the opportunity to work on infrastructure and systems challenges"
    } else if has_word("data") {
        "I am particularly excited about the opportunity to work on data engineering and analytics"
    } else if has_word("cloud") {
        "I am particularly excited about the opportunity to contribute to cloud platform development"
    } else {
        "I am particularly excited about the opportunity to contribute to innovative technical projects"
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
