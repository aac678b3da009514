// Prompt templates for resume generation, ATS scoring and revision.
// Placeholders are `{name}` tokens substituted with `str::replace`.

/// Resume generation prompt. The model must return a full LaTeX document in this layout.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"Create a job-tailored, ATS-optimized resume using the EXACT LaTeX template format provided below.

TARGET JOB:
Position: {job_title} at {company_name}
Required Skills: {job_skills}
Key Requirements: {requirements}
Responsibilities: {responsibilities}

CANDIDATE PROFILE:
{contact}

Current Summary: {summary}
ALL Skills: {skills}

EDUCATION:
{education}

EXPERIENCE:
{experience}

ALL PROJECTS (select 2-4 most relevant):
{projects}

CERTIFICATIONS:
{certifications}

MANDATORY TEMPLATE FORMAT - DO NOT CHANGE STRUCTURE:

\documentclass[a4paper,10pt]{article}
\usepackage[unicode, draft=false]{hyperref}
\hypersetup{hidelinks, colorlinks=false, pdfborder={0 0 0}}
\usepackage{fontawesome5}
\usepackage{parskip}
\usepackage{xcolor}
\usepackage[scale=0.9, top=0.5in, bottom=0.5in, left=0.5in, right=0.5in]{geometry}
\usepackage{tabularx}
\usepackage{enumitem}
\usepackage{titlesec}
\definecolor{PrimaryColor}{HTML}{1C033C}
\definecolor{SecondaryColor}{HTML}{371e77}
\titleformat{\section}{\large\scshape\raggedright}{}{0em}{}[\titlerule]
\titlespacing{\section}{0pt}{8pt}{4pt}
\pagestyle{empty}
\begin{document}

\begin{center}
    \color{PrimaryColor}
    \Huge\textbf{FULL NAME}\\[6pt]
    \normalsize
    \color{SecondaryColor}
    \underline{\faEnvelope} \href{mailto:EMAIL}{EMAIL} \quad \underline{\faMobile} PHONE \\[3pt]
    \underline{\faGithub} \href{GITHUB-URL}{github.com/user} \quad \underline{\faLinkedin} \href{LINKEDIN-URL}{linkedin.com/in/user}
\end{center}

\section*{PROFILE}
[A NEW 2-3 line summary tailored to the {job_title} role]

\section{SKILLS}
\begin{itemize}[leftmargin=1.5em, itemsep=2pt, nosep]
    \item \textbf{Programming Languages:} [job-relevant languages first]
    \item \textbf{Web \& Database:} [if relevant]
    \item \textbf{ML/AI \& Libraries:} [if relevant]
    \item \textbf{Cloud \& Tools:} [platforms and tools]
    \item \textbf{Core Concepts:} [concepts from the job requirements]
\end{itemize}

\section*{EDUCATION}
\begin{tabularx}{\textwidth}{X r}
\textbf{University, Location} & \textbf{Start Year -- End Year}\\
Degree in Field & \textit{GPA: X.XX} \\[4pt]
\end{tabularx}

\section{EXPERIENCE}
\begin{itemize}[leftmargin=1.2em, itemsep=4pt]
\item \textbf{Title}, Company \hfill Start -- End\\
[Achievements rephrased around the job requirements]
\end{itemize}

\section{PROJECTS}
\begin{itemize}[leftmargin=1.2em, itemsep=4pt]
\item \textbf{Project Name} \href{github-url}{\faGithub}\\
[Description emphasizing technologies matching the job]\\
\textbf{Technologies:} [technologies, job-relevant first]
\end{itemize}

\section{AWARDS AND CERTIFICATES}
\begin{itemize}[leftmargin=1.5em, itemsep=2pt, nosep]
    \item \textbf{Certification Name} (Issuer) \href{url}{\faLink}
\end{itemize}

\end{document}

RULES:
1. Keep the template structure: same packages, colours and section order.
2. Tailor the CONTENT to the job; write a new summary for this role.
3. Organise skills into the five categories shown, job-relevant skills first.
4. Select only the 2-4 most relevant projects.
5. Escape LaTeX special characters (&, %, $, #, _) in text.
6. {factuality}
7. Return ONLY the LaTeX code, no markdown blocks, no explanations."#;

/// ATS scoring prompt. Reply must be JSON.
pub const ATS_SCORE_PROMPT_TEMPLATE: &str = r#"You are an ATS (Applicant Tracking System) analyzer. Analyze this resume against the job requirements and score it from 0-100.

Job Requirements:
- Title: {job_title}
- Company: {company_name}
- Required Skills: {skills_required}
- Preferred Skills: {preferred_skills}
- Experience Level: {experience_level}
- Key Requirements: {requirements}
- Keywords: {keywords}

Resume Content:
{resume}

Return JSON with this EXACT schema:
{
  "ats_score": 0,
  "keyword_matches": ["matched keyword"],
  "missing_keywords": ["important keyword absent from the resume"],
  "suggestions": ["concrete improvement"]
}"#;

/// Revision prompt fed with the scorer's feedback.
pub const REVISE_PROMPT_TEMPLATE: &str = r#"Improve this resume based on ATS feedback to increase the ATS score. This is revision {iteration}.

Current Resume:
{resume}

ATS Feedback:
- Current Score: {score}%
- Missing Keywords: {missing_keywords}
- Suggestions: {suggestions}

Optimize the resume by:
1. Incorporating missing keywords naturally into relevant sections
2. Improving keyword density without keyword stuffing
3. Strengthening the experience, projects and skills sections
4. Keeping the professional tone, the LaTeX formatting and the document structure
5. {factuality}

Return the complete optimized LaTeX document starting with \documentclass, and nothing else."#;
