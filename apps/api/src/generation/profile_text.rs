//! Plain-text renderings of profile sections for LLM prompts.

use crate::models::profile::{Certification, Education, Experience, Profile, Project};

pub fn education_text(education: &[Education]) -> String {
    if education.is_empty() {
        return "No education data provided".to_string();
    }
    education
        .iter()
        .map(|edu| {
            let mut line = format!(
                "- {} in {} from {}",
                edu.degree,
                edu.field.as_deref().unwrap_or("Field"),
                edu.university
            );
            if let Some(location) = &edu.location {
                line.push_str(&format!(", {location}"));
            }
            if let (Some(start), Some(end)) = (edu.start_year, edu.end_year) {
                line.push_str(&format!(" ({start} - {end})"));
            }
            if let Some(gpa) = edu.gpa {
                line.push_str(&format!(", GPA: {gpa}"));
            }
            if !edu.achievements.is_empty() {
                line.push_str(&format!("\n  Achievements: {}", edu.achievements.join(", ")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn experience_text(experience: &[Experience]) -> String {
    if experience.is_empty() {
        return "No work experience provided".to_string();
    }
    experience
        .iter()
        .map(|exp| {
            let mut line = format!("- {} at {}", exp.title, exp.company);
            if let Some(location) = &exp.location {
                line.push_str(&format!(", {location}"));
            }
            line.push_str(&format!(" ({} - {})", exp.start_date, end_date_label(exp)));
            if !exp.achievements.is_empty() {
                line.push_str("\n  Achievements:");
                for achievement in &exp.achievements {
                    line.push_str(&format!("\n  • {achievement}"));
                }
            }
            if !exp.technologies.is_empty() {
                line.push_str(&format!("\n  Technologies: {}", exp.technologies.join(", ")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn projects_text(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects provided".to_string();
    }
    projects
        .iter()
        .map(|proj| {
            let mut line = format!("- {}", proj.name);
            if let Some(link) = proj.link.as_ref().or(proj.github.as_ref()) {
                line.push_str(&format!(" (Link: {link})"));
            }
            line.push_str(&format!("\n  {}", proj.description));
            if !proj.technologies.is_empty() {
                line.push_str(&format!("\n  Technologies: {}", proj.technologies.join(", ")));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn certifications_text(certifications: &[Certification]) -> String {
    if certifications.is_empty() {
        return "No certifications provided".to_string();
    }
    certifications
        .iter()
        .map(|cert| {
            let mut line = format!("- {} from {}", cert.name, cert.issuer);
            if let Some(date) = &cert.date {
                line.push_str(&format!(" ({date})"));
            }
            if let Some(url) = &cert.credential_url {
                line.push_str(&format!(" - {url}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn end_date_label(exp: &Experience) -> &str {
    match (&exp.end_date, exp.is_current) {
        (_, true) => "Present",
        (Some(end), false) => end,
        (None, false) => "End",
    }
}

/// Header block shared by the resume and cover letter prompts.
pub fn contact_block(profile: &Profile) -> String {
    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    format!(
        "Name: {}\nEmail: {} | Phone: {}\nLocation: {}\nLinkedIn: {} | GitHub: {}",
        profile.full_name,
        field(&profile.email),
        field(&profile.phone),
        field(&profile.location),
        field(&profile.linkedin),
        field(&profile.github),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_sections_have_placeholders() {
        assert_eq!(education_text(&[]), "No education data provided");
        assert_eq!(experience_text(&[]), "No work experience provided");
        assert_eq!(projects_text(&[]), "No projects provided");
        assert_eq!(certifications_text(&[]), "No certifications provided");
    }

    #[test]
    fn test_current_role_ends_present() {
        let exp = Experience {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            start_date: "2021".to_string(),
            end_date: Some("2023".to_string()),
            is_current: true,
            ..Default::default()
        };
        assert_eq!(end_date_label(&exp), "Present");
        assert!(experience_text(&[exp]).starts_with("- Engineer at Acme (2021 - Present)"));
    }

    #[test]
    fn test_project_prefers_link_over_github() {
        let proj = Project {
            name: "ledger".to_string(),
            description: "Double-entry ledger".to_string(),
            link: Some("https://ledger.dev".to_string()),
            github: Some("https://github.com/x/ledger".to_string()),
            technologies: vec!["Rust".to_string()],
            ..Default::default()
        };
        let text = projects_text(&[proj]);
        assert!(text.contains("(Link: https://ledger.dev)"));
        assert!(text.contains("Technologies: Rust"));
    }

    #[test]
    fn test_education_with_years_and_gpa() {
        let edu = Education {
            degree: "BSc".to_string(),
            field: Some("Computer Science".to_string()),
            university: "MIT".to_string(),
            start_year: Some(2016),
            end_year: Some(2020),
            gpa: Some(3.9),
            ..Default::default()
        };
        assert_eq!(
            education_text(&[edu]),
            "- BSc in Computer Science from MIT (2016 - 2020), GPA: 3.9"
        );
    }
}
