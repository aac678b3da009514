/// Cover letter prompt. Placeholders are substituted with `str::replace`.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"Write a compelling, professional cover letter for the following job application.

=== JOB DETAILS ===
Position: {job_title}
Company: {company_name}
Required Skills: {job_skills}
Key Requirements: {requirements}
Job Description Summary: {job_summary}

=== CANDIDATE ===
{contact}
Professional Summary: {summary}
Technical Skills: {skills}

Education:
{education}

Work Experience:
{experience}

Projects:
{projects}

=== WHAT THE LETTER MUST COVER ===
1. Opening: the candidate's degree and specialization, and interest in this role at this company.
2. One or two standout projects: what was built, the technical problems solved, the stack used.
3. Technical depth: algorithms, systems design, machine learning or architecture work, where the
   profile shows it.
4. Impact: quantified results where the profile provides them.
5. Alignment: which of the company's teams or products the candidate's work fits.
6. Closing: a clear call to action.

=== RULES ===
- 350-400 words, at most 4 paragraphs; professional and confident.
- Use the candidate's actual name ({full_name}); no placeholders.
- {factuality}
- Start with "Dear Hiring Manager," and end with the candidate's contact details.
- Output the letter text only, no commentary."#;
