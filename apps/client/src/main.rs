use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use resumeai_client::history::{Dashboard, DocumentHistory};
use resumeai_client::types::{
    CoverLetter, GapAnalysis, JobRequest, Profile, ProfileInput, Resume, ResumeSummary,
};
use resumeai_client::{ApiClient, ClientConfig, ClientError, FileTokenStore, Session, SessionState};

/// Rows shown under a freshly generated document.
const RECENT_AFTER_GENERATE: usize = 5;

/// ATS-optimized resumes, cover letters and skill-gap analyses.
#[derive(Parser)]
#[command(name = "resumeai", version)]
struct Cli {
    /// API base URL
    #[arg(long, env = "RESUMEAI_API_URL", global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the token
    Login(CredentialArgs),
    /// Create an account and sign in
    Register(CredentialArgs),
    /// Forget the stored token
    Logout,
    /// Show, create or update your profile
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Generate and browse ATS-optimized resumes
    #[command(subcommand)]
    Resume(DocumentCommand),
    /// Generate and browse cover letters
    #[command(subcommand)]
    CoverLetter(DocumentCommand),
    /// Analyze skill gaps against a job
    #[command(subcommand)]
    Gap(DocumentCommand),
    /// Counts, scores and recent documents
    Dashboard,
    /// Check that the API is reachable
    Health,
}

#[derive(Args)]
struct CredentialArgs {
    #[arg(long)]
    email: String,
    #[arg(long, env = "RESUMEAI_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Subcommand)]
enum ProfileCommand {
    Show,
    Create(ProfileArgs),
    Update(ProfileArgs),
}

#[derive(Args)]
struct ProfileArgs {
    /// JSON file with any profile fields, including education/experience/projects
    #[arg(long)]
    from_file: Option<PathBuf>,
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    linkedin: Option<String>,
    #[arg(long)]
    github: Option<String>,
    #[arg(long)]
    portfolio: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    summary: Option<String>,
    /// Comma-separated, replaces the stored list
    #[arg(long, value_delimiter = ',')]
    skills: Option<Vec<String>>,
}

#[derive(Subcommand)]
enum DocumentCommand {
    /// Generate from a job URL or description
    #[command(alias = "analyze")]
    Generate(JobArgs),
    List,
    Show {
        id: i32,
        /// Write the document body to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args)]
struct JobArgs {
    /// Job posting URL (takes priority over a description)
    #[arg(long)]
    url: Option<String>,
    #[arg(long, conflicts_with = "description_file")]
    description: Option<String>,
    #[arg(long)]
    description_file: Option<PathBuf>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    company: Option<String>,
    /// Write the generated document to this file
    #[arg(long)]
    out: Option<PathBuf>,
}

impl JobArgs {
    fn to_request(&self) -> Result<JobRequest> {
        let job_description = match &self.description_file {
            Some(path) => Some(
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
            ),
            None => self.description.clone(),
        };
        Ok(JobRequest {
            job_url: self.url.clone(),
            job_description,
            job_title: self.title.clone(),
            company_name: self.company.clone(),
        })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = ClientConfig::new(url, config.token_file);
    }

    let store = Arc::new(FileTokenStore::new(config.token_file.clone()));
    let api = ApiClient::new(&config, store).context("Failed to build HTTP client")?;
    let mut session = Session::new(api);

    let command = match cli.command {
        Command::Health => {
            let status = session.api().health().await?;
            println!("{} is up: {status}", session.api().base_url());
            return Ok(());
        }
        Command::Login(args) => {
            session.login(&args.email, &args.password).await?;
            print_welcome(&session);
            return Ok(());
        }
        Command::Register(args) => {
            session.register(&args.email, &args.password).await?;
            println!("Account created. Next: `resumeai profile create --full-name ...`");
            return Ok(());
        }
        Command::Logout => {
            session.logout()?;
            println!("Signed out.");
            return Ok(());
        }
        protected => protected,
    };

    if session.init().await != SessionState::Authenticated {
        return Err(ClientError::Unauthorized.into());
    }

    let result = match command {
        Command::Profile(cmd) => run_profile(&mut session, cmd).await,
        Command::Resume(cmd) => run_resume(&session, cmd).await,
        Command::CoverLetter(cmd) => run_cover_letter(&session, cmd).await,
        Command::Gap(cmd) => run_gap(&session, cmd).await,
        Command::Dashboard => run_dashboard(&session).await,
        Command::Health | Command::Login(_) | Command::Register(_) | Command::Logout => Ok(()),
    };

    result.map_err(|e| session.observe(e).into())
}

// ── Profile ──────────────────────────────────────────────────────────────────

async fn run_profile(session: &mut Session, cmd: ProfileCommand) -> Result<(), ClientError> {
    match cmd {
        ProfileCommand::Show => match session.profile() {
            Some(profile) => print_profile(profile),
            None => println!("No profile yet. Create one with `resumeai profile create`."),
        },
        ProfileCommand::Create(args) => {
            let profile = session.api().create_profile(&profile_input(args)?).await?;
            println!("Profile created for {}.", profile.full_name);
            session.set_profile(profile);
        }
        ProfileCommand::Update(args) => {
            let profile = session.api().update_profile(&profile_input(args)?).await?;
            println!("Profile updated.");
            print_profile(&profile);
            session.set_profile(profile);
        }
    }
    Ok(())
}

fn profile_input(args: ProfileArgs) -> Result<ProfileInput, ClientError> {
    let mut input = match &args.from_file {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => ProfileInput::default(),
    };

    macro_rules! overlay {
        ($($field:ident),*) => {
            $(if args.$field.is_some() {
                input.$field = args.$field;
            })*
        };
    }
    overlay!(full_name, email, phone, linkedin, github, portfolio, location, summary, skills);

    Ok(input)
}

fn print_profile(profile: &Profile) {
    println!("{}", profile.full_name);
    for value in [&profile.email, &profile.phone, &profile.location, &profile.linkedin, &profile.github]
        .into_iter()
        .flatten()
    {
        println!("  {value}");
    }
    if let Some(summary) = &profile.summary {
        println!("\n{summary}");
    }
    if !profile.skills.is_empty() {
        println!("\nSkills: {}", profile.skills.join(", "));
    }
    println!(
        "Education: {}  Experience: {}  Projects: {}  Certifications: {}",
        profile.education.len(),
        profile.experience.len(),
        profile.projects.len(),
        profile.certifications.len()
    );
}

// ── Documents ────────────────────────────────────────────────────────────────

async fn run_resume(session: &Session, cmd: DocumentCommand) -> Result<(), ClientError> {
    let api = session.api();
    match cmd {
        DocumentCommand::Generate(args) => {
            let request = job_request(&args)?;
            eprintln!("Generating resume, this can take a minute...");
            let resume = api.generate_resume(request).await?;
            print_resume(&resume, args.out)?;

            let mut history = DocumentHistory::from_fetched(api.list_resumes().await?);
            history.push_created(ResumeSummary::from(&resume));
            println!("\nRecent resumes:");
            print_resume_list(history.recent(RECENT_AFTER_GENERATE));
        }
        DocumentCommand::List => {
            let history = DocumentHistory::from_fetched(api.list_resumes().await?);
            if history.is_empty() {
                println!("No resumes yet.");
            }
            print_resume_list(history.items());
        }
        DocumentCommand::Show { id, out } => {
            let resume = api.get_resume(id).await?;
            print_resume(&resume, out)?;
        }
    }
    Ok(())
}

async fn run_cover_letter(session: &Session, cmd: DocumentCommand) -> Result<(), ClientError> {
    let api = session.api();
    match cmd {
        DocumentCommand::Generate(args) => {
            let request = job_request(&args)?;
            let letter = api.generate_cover_letter(request).await?;
            print_cover_letter(&letter, args.out)?;

            let mut history = DocumentHistory::from_fetched(api.list_cover_letters().await?);
            history.push_created(letter);
            println!("\nRecent cover letters:");
            print_cover_letter_list(history.recent(RECENT_AFTER_GENERATE));
        }
        DocumentCommand::List => {
            let history = DocumentHistory::from_fetched(api.list_cover_letters().await?);
            if history.is_empty() {
                println!("No cover letters yet.");
            }
            print_cover_letter_list(history.items());
        }
        DocumentCommand::Show { id, out } => {
            let letter = api.get_cover_letter(id).await?;
            print_cover_letter(&letter, out)?;
        }
    }
    Ok(())
}

async fn run_gap(session: &Session, cmd: DocumentCommand) -> Result<(), ClientError> {
    let api = session.api();
    match cmd {
        DocumentCommand::Generate(args) => {
            let request = job_request(&args)?;
            let analysis = api.analyze_gap(request).await?;
            print_gap(&analysis);

            let mut history = DocumentHistory::from_fetched(api.list_gap_analyses().await?);
            history.push_created(analysis);
            println!("\nRecent gap analyses:");
            print_gap_list(history.recent(RECENT_AFTER_GENERATE));
        }
        DocumentCommand::List => {
            let history = DocumentHistory::from_fetched(api.list_gap_analyses().await?);
            if history.is_empty() {
                println!("No gap analyses yet.");
            }
            print_gap_list(history.items());
        }
        DocumentCommand::Show { id, .. } => print_gap(&api.get_gap_analysis(id).await?),
    }
    Ok(())
}

async fn run_dashboard(session: &Session) -> Result<(), ClientError> {
    let api = session.api();
    let (resumes, letters, analyses) = tokio::try_join!(
        api.list_resumes(),
        api.list_cover_letters(),
        api.list_gap_analyses()
    )?;
    let dashboard = Dashboard {
        resumes: DocumentHistory::from_fetched(resumes),
        cover_letters: DocumentHistory::from_fetched(letters),
        gap_analyses: DocumentHistory::from_fetched(analyses),
    };
    let stats = dashboard.stats();

    if let Some(profile) = session.profile() {
        println!("Welcome back, {}!\n", profile.full_name);
    }
    println!("Resumes:        {}", stats.resumes);
    println!("Cover letters:  {}", stats.cover_letters);
    println!("Gap analyses:   {}", stats.gap_analyses);
    if let (Some(avg), Some(best)) = (stats.average_ats_score, stats.best_ats_score) {
        println!("ATS score:      avg {avg}, best {best}");
    }

    if !dashboard.resumes.is_empty() {
        println!("\nRecent resumes:");
        for r in dashboard.resumes.recent(5) {
            println!("  #{} {} (ATS {})", r.id, job_label(&r.job_title, &r.company_name), r.ats_score);
        }
    }
    if session.profile().is_none() {
        println!("\nTip: create a profile first with `resumeai profile create`.");
    }
    Ok(())
}

fn print_resume_list(resumes: &[ResumeSummary]) {
    for r in resumes {
        println!(
            "#{:<5} {}  ATS {:>3}  {}",
            r.id,
            r.created_at.format("%Y-%m-%d"),
            r.ats_score,
            job_label(&r.job_title, &r.company_name)
        );
    }
}

fn print_cover_letter_list(letters: &[CoverLetter]) {
    for l in letters {
        println!(
            "#{:<5} {}  {}",
            l.id,
            l.created_at.format("%Y-%m-%d"),
            job_label(&l.job_title, &l.company_name)
        );
    }
}

fn print_gap_list(analyses: &[GapAnalysis]) {
    for a in analyses {
        println!(
            "#{:<5} {}  {:>3}% match  {}",
            a.id,
            a.created_at.format("%Y-%m-%d"),
            a.match_percentage,
            a.job_title.as_deref().unwrap_or("Untitled")
        );
    }
}

fn job_request(args: &JobArgs) -> Result<JobRequest, ClientError> {
    args.to_request()
        .map_err(|e| ClientError::Validation(format!("{e:#}")))
}

fn job_label(title: &Option<String>, company: &Option<String>) -> String {
    match (title.as_deref(), company.as_deref()) {
        (Some(t), Some(c)) => format!("{t} at {c}"),
        (Some(t), None) => t.to_string(),
        (None, Some(c)) => c.to_string(),
        (None, None) => "Untitled".to_string(),
    }
}

fn print_resume(resume: &Resume, out: Option<PathBuf>) -> Result<(), ClientError> {
    println!(
        "Resume #{} for {}: ATS score {} after {} iteration(s)",
        resume.id,
        job_label(&resume.job_title, &resume.company_name),
        resume.ats_score,
        resume.iterations
    );
    for step in &resume.optimization_history {
        println!("  iteration {}: score {}", step.iteration, step.score);
    }
    if !resume.keywords.is_empty() {
        println!("Matched keywords: {}", resume.keywords.join(", "));
    }
    emit(&resume.latex_content, out)
}

fn print_cover_letter(letter: &CoverLetter, out: Option<PathBuf>) -> Result<(), ClientError> {
    println!(
        "Cover letter #{} for {}",
        letter.id,
        job_label(&letter.job_title, &letter.company_name)
    );
    emit(&letter.content, out)
}

fn print_gap(analysis: &GapAnalysis) {
    println!(
        "Gap analysis #{} for {}: {}% match",
        analysis.id,
        analysis.job_title.as_deref().unwrap_or("Untitled"),
        analysis.match_percentage
    );
    if !analysis.matching_skills.is_empty() {
        println!("Matching: {}", analysis.matching_skills.join(", "));
    }
    if !analysis.missing_skills.is_empty() {
        println!("Missing:  {}", analysis.missing_skills.join(", "));
    }
    if !analysis.priority_gaps.is_empty() {
        println!("\nPriority gaps:");
        for gap in &analysis.priority_gaps {
            println!("  [{}] {} ({}): {}", gap.priority, gap.skill, gap.time_to_learn, gap.reason);
        }
    }
    if !analysis.strengths.is_empty() {
        println!("\nStrengths:");
        for s in &analysis.strengths {
            println!("  {} ({}): {}", s.skill, s.level, s.evidence);
        }
    }
    if !analysis.recommendations.is_empty() {
        println!("\nRecommendations:");
        for r in &analysis.recommendations {
            println!("  [{}] {}: {} ({})", r.kind, r.title, r.description, r.duration);
        }
    }
    if !analysis.certifications_suggested.is_empty() {
        println!("\nCertifications:");
        for c in &analysis.certifications_suggested {
            println!("  {} by {} ({}, {})", c.name, c.provider, c.cost, c.duration);
        }
    }
    if !analysis.training_courses.is_empty() {
        println!("\nCourses:");
        for c in &analysis.training_courses {
            println!("  {} on {} {}", c.name, c.platform, c.url);
        }
    }
    if !analysis.learning_roadmap.is_empty() {
        println!("\nRoadmap:\n{}", analysis.learning_roadmap);
    }
}

fn emit(body: &str, out: Option<PathBuf>) -> Result<(), ClientError> {
    match out {
        Some(path) => {
            std::fs::write(&path, body)?;
            println!("Saved to {}", path.display());
        }
        None => println!("\n{body}"),
    }
    Ok(())
}

fn print_welcome(session: &Session) {
    match session.profile() {
        Some(profile) => println!("Welcome back, {}!", profile.full_name),
        None => println!("Signed in. Create your profile with `resumeai profile create`."),
    }
}
