/// Gap analysis prompt. Reply must be JSON.
pub const GAP_ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are an expert career coach and technical skills assessor. Perform a comprehensive skill gap analysis.

=== JOB REQUIREMENTS ===
Position: {job_title}
Company: {company_name}
Required Skills: {skills_required}
Preferred Skills: {preferred_skills}
Requirements: {requirements}
Job Description: {job_summary}

=== CANDIDATE PROFILE ===
Skills: {skills}
Education: {education}
Experience: {experience}
Projects: {projects}

Return a JSON object with this EXACT schema:
{
  "match_percentage": 0,
  "matching_skills": ["skills the candidate has that the job asks for"],
  "missing_skills": ["required skills the candidate lacks"],
  "strengths": [{"skill": "name", "level": "Expert | Advanced | Intermediate", "evidence": "from the profile"}],
  "priority_gaps": [{"skill": "name", "priority": "Critical | High | Medium | Low", "reason": "why it matters", "time_to_learn": "X weeks"}],
  "recommendations": [{"type": "Training | Certification | Project", "title": "specific recommendation", "description": "details", "resource": "platform", "duration": "time"}],
  "certifications_suggested": [{"name": "certification", "provider": "provider", "relevance": "why relevant", "cost": "$XXX", "duration": "time"}],
  "training_courses": [{"name": "course", "platform": "platform", "url": "course URL", "skill_covered": "skill", "duration": "hours"}],
  "learning_roadmap": "a 3-6 month learning roadmap"
}

Be specific: name real courses, certifications and platforms."#;
