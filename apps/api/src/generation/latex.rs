//! LaTeX helpers: document detection, escaping, and the deterministic resume
//! template used when the model does not return a usable document.

use crate::generation::profile_text::end_date_label;
use crate::jobs::extractor::JobData;
use crate::models::profile::Profile;

const DOCUMENT_CLASS: &str = "\\documentclass";

/// Packages, colours and section styling shared by every rendered resume.
const PREAMBLE: &str = r#"\documentclass[a4paper,10pt]{article}

% -------------------- Packages --------------------
\usepackage[unicode, draft=false]{hyperref}
\hypersetup{
    hidelinks,
    colorlinks=false,
    pdfborder={0 0 0}
}
\usepackage{fontawesome5}
\usepackage{parskip}
\usepackage{xcolor}
\usepackage[scale=0.9, top=0.5in, bottom=0.5in, left=0.5in, right=0.5in]{geometry}
\usepackage{tabularx}
\usepackage{enumitem}
\usepackage{titlesec}

% -------------------- Customizations --------------------
\definecolor{PrimaryColor}{HTML}{1C033C}
\definecolor{SecondaryColor}{HTML}{371e77}

\titleformat{\section}{\large\scshape\raggedright}{}{0em}{}[\titlerule]
\titlespacing{\section}{0pt}{8pt}{4pt}

\pagestyle{empty}
"#;

const MAX_SKILLS: usize = 15;
const MAX_EDUCATION: usize = 3;
const MAX_PROJECTS: usize = 3;
const MAX_PROJECT_TECH: usize = 5;
const MAX_CERTIFICATIONS: usize = 5;

pub fn is_latex_document(text: &str) -> bool {
    text.trim_start().starts_with(DOCUMENT_CLASS)
}

/// Escapes characters LaTeX treats as markup in running text.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '~' => out.push_str("\\textasciitilde{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            _ => out.push(c),
        }
    }
    out
}

/// URLs keep their structure inside `\href`; only `%` and `#` need escaping.
fn escape_url(url: &str) -> String {
    url.replace('%', "\\%").replace('#', "\\#")
}

fn href(url: &str, label: &str) -> String {
    format!("\\href{{{}}}{{{}}}", escape_url(url), label)
}

/// Renders a complete resume from the profile alone.
pub fn render_fallback_resume(profile: &Profile, job: &JobData) -> String {
    let mut doc = String::from(PREAMBLE);

    doc.push_str("\n% -------------------- Document --------------------\n\\begin{document}\n\n");
    doc.push_str(&header(profile));

    let summary = profile
        .summary
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("Professional summary highlighting key strengths and career focus.");
    doc.push_str("\n\\section*{PROFILE}\n");
    doc.push_str(&escape(summary));
    doc.push('\n');

    let skills: Vec<String> = profile.skills.iter().take(MAX_SKILLS).map(|s| escape(s)).collect();
    doc.push_str("\n\\section{SKILLS}\n\\begin{itemize}[leftmargin=1.5em, itemsep=2pt, nosep]\n");
    doc.push_str(&format!("    \\item \\textbf{{Technical Skills:}} {}\n", skills.join(", ")));
    doc.push_str("\\end{itemize}\n");

    if !profile.education.is_empty() {
        doc.push_str("\n\\section*{EDUCATION}\n\\begin{tabularx}{\\textwidth}{X r}\n");
        for edu in profile.education.iter().take(MAX_EDUCATION) {
            let place = match &edu.location {
                Some(loc) => format!("{}, {}", escape(&edu.university), escape(loc)),
                None => escape(&edu.university),
            };
            let years = match (edu.start_year, edu.end_year) {
                (Some(start), Some(end)) => format!("{start} -- {end}"),
                (None, Some(end)) => end.to_string(),
                (Some(start), None) => format!("{start} -- Present"),
                (None, None) => String::new(),
            };
            let field = edu.field.as_deref().map(|f| format!(" in {}", escape(f))).unwrap_or_default();
            let gpa = edu.gpa.map(|g| format!("\\textit{{GPA: {g}}}")).unwrap_or_default();
            doc.push_str(&format!("\\textbf{{{place}}} & \\textbf{{{years}}}\\\\\n"));
            doc.push_str(&format!("{}{field} & {gpa} \\\\[4pt]\n", escape(&edu.degree)));
        }
        doc.push_str("\\end{tabularx}\n");
    }

    if !profile.experience.is_empty() {
        doc.push_str("\n\\section{EXPERIENCE}\n\\begin{itemize}[leftmargin=1.2em, itemsep=4pt]\n");
        for exp in profile.experience.iter() {
            doc.push_str(&format!(
                "\\item \\textbf{{{}}}, {} \\hfill {} -- {}\\\\\n",
                escape(&exp.title),
                escape(&exp.company),
                escape(&exp.start_date),
                escape(end_date_label(exp)),
            ));
            for achievement in &exp.achievements {
                doc.push_str(&format!("{}\\\\\n", escape(achievement)));
            }
        }
        doc.push_str("\\end{itemize}\n");
    }

    if !profile.projects.is_empty() {
        doc.push_str("\n\\section{PROJECTS}\n\\begin{itemize}[leftmargin=1.2em, itemsep=4pt]\n");
        for proj in profile.projects.iter().take(MAX_PROJECTS) {
            let link = proj
                .github
                .as_deref()
                .map(|url| format!(" {}", href(url, "\\faGithub")))
                .unwrap_or_default();
            let tech: Vec<String> = proj.technologies.iter().take(MAX_PROJECT_TECH).map(|t| escape(t)).collect();
            doc.push_str(&format!("\\item \\textbf{{{}}}{link}\\\\\n", escape(&proj.name)));
            doc.push_str(&format!("{}\\\\\n", escape(&proj.description)));
            doc.push_str(&format!("\\textbf{{Technologies:}} {}\n\n", tech.join(", ")));
        }
        doc.push_str("\\end{itemize}\n");
    }

    if !profile.certifications.is_empty() {
        doc.push_str("\n\\section{CERTIFICATIONS}\n\\begin{itemize}[leftmargin=1.5em, itemsep=2pt, nosep]\n");
        for cert in profile.certifications.iter().take(MAX_CERTIFICATIONS) {
            let link = cert
                .credential_url
                .as_deref()
                .map(|url| format!(" {}", href(url, "\\faLink")))
                .unwrap_or_default();
            doc.push_str(&format!(
                "    \\item \\textbf{{{}}} ({}){link}\n",
                escape(&cert.name),
                escape(&cert.issuer)
            ));
        }
        doc.push_str("\\end{itemize}\n");
    }

    doc.push_str("\n\\section*{TARGET ROLE}\n");
    doc.push_str(&format!(
        "Applying for: {} at {}\n",
        escape(&job.job_title),
        escape(&job.company_name)
    ));

    doc.push_str("\n\\end{document}\n");
    doc
}

fn header(profile: &Profile) -> String {
    let mut first_line = Vec::new();
    if let Some(email) = &profile.email {
        first_line.push(format!(
            "\\underline{{\\faEnvelope}} {}",
            href(&format!("mailto:{email}"), &escape(email))
        ));
    }
    if let Some(phone) = &profile.phone {
        first_line.push(format!("\\underline{{\\faMobile}} {}", escape(phone)));
    }

    let mut second_line = Vec::new();
    if let Some(github) = &profile.github {
        second_line.push(format!("\\underline{{\\faGithub}} {}", href(github, &escape(&display_url(github)))));
    }
    if let Some(linkedin) = &profile.linkedin {
        second_line.push(format!("\\underline{{\\faLinkedin}} {}", href(linkedin, &escape(&display_url(linkedin)))));
    }

    let mut out = String::from("\\begin{center}\n    \\color{PrimaryColor}\n");
    out.push_str(&format!("    \\Huge\\textbf{{{}}}\\\\[6pt]\n", escape(&profile.full_name)));
    out.push_str("    \\normalsize\n    \\color{SecondaryColor}\n");
    if !first_line.is_empty() {
        out.push_str(&format!("    {} \\\\[3pt]\n", first_line.join(" \\quad\n    ")));
    }
    if !second_line.is_empty() {
        out.push_str(&format!("    {}\n", second_line.join(" \\quad\n    ")));
    }
    out.push_str("\\end{center}\n");
    out
}

/// `https://www.github.com/ada` → `github.com/ada`
fn display_url(url: &str) -> String {
    let url = url.trim();
    let url = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    url.strip_prefix("www.").unwrap_or(url).trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> JobData {
        JobData {
            job_title: "Platform Engineer".to_string(),
            company_name: "R&D Labs".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_detects_document_class() {
        assert!(is_latex_document("  \n\\documentclass{article}"));
        assert!(!is_latex_document("Here is your resume:\n\\documentclass{article}"));
    }

    #[test]
    fn test_escape_special_characters() {
        assert_eq!(escape("C# & 100% of $5_x"), "C\\# \\& 100\\% of \\$5\\_x");
        assert_eq!(escape("a~b^c"), "a\\textasciitilde{}b\\textasciicircum{}c");
        assert_eq!(escape("{x}"), "\\{x\\}");
    }

    #[test]
    fn test_fallback_is_complete_document() {
        let profile = Profile::fixture("Ada Lovelace", &["Rust", "C++"]);
        let doc = render_fallback_resume(&profile, &job());

        assert!(is_latex_document(&doc));
        assert!(doc.trim_end().ends_with("\\end{document}"));
        assert!(doc.contains("\\Huge\\textbf{Ada Lovelace}"));
        assert!(doc.contains("\\textbf{Technical Skills:} Rust, C++"));
        assert!(doc.contains("Applying for: Platform Engineer at R\\&D Labs"));
        assert!(doc.contains("\\textbf{ledger}"));
        assert!(doc.contains("github.com/ada"));
    }

    #[test]
    fn test_fallback_skips_empty_sections() {
        let mut profile = Profile::fixture("Ada", &[]);
        profile.projects.0.clear();
        let doc = render_fallback_resume(&profile, &job());
        assert!(!doc.contains("\\section{PROJECTS}"));
        assert!(!doc.contains("\\section{CERTIFICATIONS}"));
    }

    #[test]
    fn test_display_url_strips_scheme_and_www() {
        assert_eq!(display_url("https://www.linkedin.com/in/ada/"), "linkedin.com/in/ada");
        assert_eq!(display_url("github.com/ada"), "github.com/ada");
    }
}
