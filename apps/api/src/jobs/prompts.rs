/// Job description structuring prompt. Replace `{jd_text}` before sending.
pub const JOB_EXTRACT_PROMPT_TEMPLATE: &str = r#"Extract structured information from this job description.

JOB DESCRIPTION:
{jd_text}

Return a JSON object with this EXACT schema (no extra fields):
{
  "job_title": "exact job title",
  "company_name": "company name",
  "job_description": "brief summary of the role",
  "requirements": ["requirement 1", "requirement 2"],
  "responsibilities": ["responsibility 1", "responsibility 2"],
  "skills_required": ["skill 1", "skill 2"],
  "preferred_skills": ["preferred skill 1", "preferred skill 2"],
  "experience_level": "entry | mid | senior",
  "keywords": ["important keyword 1", "important keyword 2"]
}

SKILLS: concrete technologies, languages, frameworks, tools and methods. Required skills come
from "required", "must have", minimum-years phrasing; preferred skills from "nice to have",
"bonus", "preferred", "a plus".
KEYWORDS: the terms an applicant tracking system would match on, most important first."#;
