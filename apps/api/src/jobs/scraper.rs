//! Job board scraper: turns a posting URL into plain job text.
//!
//! Site-specific selectors for LinkedIn, Indeed and Glassdoor, a generic fallback
//! for everything else, and a last-resort placeholder built from the URL itself
//! when the page cannot be fetched (LinkedIn in particular often demands a login).

use regex::Regex;
use reqwest::{Client, Url};
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
const GENERIC_TEXT_LIMIT: usize = 5000;

const BOILERPLATE: &[&str] = &[
    "Sign in to apply",
    "Easy Apply",
    "Save job",
    "Report this job",
    "Show more",
    "Show less",
    "See who you know",
];

/// Tags whose text never belongs to a job description.
const CHROME_TAGS: &[&str] = &["script", "style", "nav", "footer", "header", "noscript"];

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("connection error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{board} returned status {status}")]
    Status { board: JobBoard, status: u16 },

    #[error("could not find a job description on the page")]
    NoContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobBoard {
    LinkedIn,
    Indeed,
    Glassdoor,
    Generic,
}

impl std::fmt::Display for JobBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            JobBoard::LinkedIn => "LinkedIn",
            JobBoard::Indeed => "Indeed",
            JobBoard::Glassdoor => "Glassdoor",
            JobBoard::Generic => "Site",
        };
        f.write_str(name)
    }
}

impl JobBoard {
    pub fn from_url(url: &Url) -> Self {
        let host = url.host_str().unwrap_or_default().to_lowercase();
        if host.ends_with("linkedin.com") {
            JobBoard::LinkedIn
        } else if host.ends_with("indeed.com") {
            JobBoard::Indeed
        } else if host.ends_with("glassdoor.com") {
            JobBoard::Glassdoor
        } else {
            JobBoard::Generic
        }
    }
}

/// A posting pulled off a job board.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedJob {
    pub job_text: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub board: JobBoard,
    /// True when the text was synthesized from the URL rather than scraped.
    pub from_url_pattern: bool,
}

/// What the URL alone reveals about a posting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UrlInfo {
    pub title: Option<String>,
    pub company: Option<String>,
    pub job_id: Option<String>,
}

#[derive(Clone)]
pub struct JobScraper {
    client: Client,
}

impl JobScraper {
    pub fn new() -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches and parses a posting. Falls back to a URL-derived placeholder for
    /// known job boards when the page itself is unusable.
    pub async fn fetch_job(&self, raw_url: &str) -> Result<ScrapedJob, ScrapeError> {
        let url = Url::parse(raw_url.trim())
            .map_err(|e| ScrapeError::InvalidUrl(format!("{raw_url}: {e}")))?;
        let board = JobBoard::from_url(&url);

        info!("Fetching job posting from {} ({board})", url);

        match self.fetch_and_parse(&url, board).await {
            Ok(job) => {
                info!("Extracted {} characters from {}", job.job_text.len(), url);
                Ok(job)
            }
            Err(e) => match parse_url_info(&url, board) {
                Some(url_info) => {
                    warn!("Fetching {url} failed ({e}); using URL-derived placeholder");
                    Ok(placeholder_job(&url, board, url_info))
                }
                None => Err(e),
            },
        }
    }

    async fn fetch_and_parse(&self, url: &Url, board: JobBoard) -> Result<ScrapedJob, ScrapeError> {
        let response = self
            .client
            .get(url.clone())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                board,
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        parse_posting(board, &html).ok_or(ScrapeError::NoContent)
    }
}

/// Parses a fetched page with the selectors for its board.
pub fn parse_posting(board: JobBoard, html: &str) -> Option<ScrapedJob> {
    let document = Html::parse_document(html);
    match board {
        JobBoard::LinkedIn => parse_linkedin(&document),
        JobBoard::Indeed => parse_indeed(&document),
        JobBoard::Glassdoor => parse_glassdoor(&document),
        JobBoard::Generic => parse_generic(&document),
    }
}

fn parse_linkedin(document: &Html) -> Option<ScrapedJob> {
    let title = first_text(
        document,
        &[
            "h1.top-card-layout__title",
            "h1.topcard__title",
            "h1[class*='job-title']",
            "h1",
        ],
    );
    let company = first_text(
        document,
        &[
            "a.topcard__org-name-link",
            "a[class*='company-name']",
            "span.topcard__flavor",
        ],
    );

    let mut job_text = String::new();
    for selector in [
        "div.show-more-less-html__markup",
        "div.description__text",
        "section.show-more-less-html",
        "div[class*='job-description']",
        "div[class*='description']",
        "article",
    ] {
        if let Some(el) = select_first(document, selector) {
            job_text = element_text(el, "\n");
            if job_text.len() > 100 {
                break;
            }
        }
    }
    if job_text.len() < 100 {
        if let Some(el) = select_first(document, "main").or_else(|| select_first(document, "body")) {
            job_text = element_text(el, "\n");
        }
    }

    let job_text = clean_text(&job_text);
    // anything shorter is a login wall
    if job_text.len() < 50 {
        return None;
    }

    Some(ScrapedJob {
        job_text,
        title,
        company,
        board: JobBoard::LinkedIn,
        from_url_pattern: false,
    })
}

fn parse_indeed(document: &Html) -> Option<ScrapedJob> {
    let title = first_text(document, &["h1.jobsearch-JobInfoHeader-title", "h1"]);
    let company = first_text(
        document,
        &["div[data-company-name]", ".jobsearch-CompanyAvatar"],
    );
    let job_text = ["#jobDescriptionText", "div[class*='jobDescription']"]
        .iter()
        .find_map(|s| select_first(document, s))
        .map(|el| clean_text(&element_text(el, "\n")))
        .unwrap_or_default();

    (!job_text.is_empty()).then(|| ScrapedJob {
        job_text,
        title,
        company,
        board: JobBoard::Indeed,
        from_url_pattern: false,
    })
}

fn parse_glassdoor(document: &Html) -> Option<ScrapedJob> {
    let job_text = ["[class*='jobDescription']", "[class*='JobDetails']"]
        .iter()
        .find_map(|s| select_first(document, s))
        .map(|el| clean_text(&element_text(el, "\n")))
        .unwrap_or_default();

    (!job_text.is_empty()).then(|| ScrapedJob {
        job_text,
        title: None,
        company: None,
        board: JobBoard::Glassdoor,
        from_url_pattern: false,
    })
}

fn parse_generic(document: &Html) -> Option<ScrapedJob> {
    // longest candidate container wins
    let mut job_text = String::new();
    for selector in [
        "[class*='job-description']",
        "[class*='jobDescription']",
        "[class*='job_description']",
        "[id*='job-description']",
        "[id*='jobDescription']",
        "article",
        "main",
        ".content",
        "#content",
    ] {
        if let Some(el) = select_first(document, selector) {
            let text = element_text(el, "\n");
            if text.len() > job_text.len() {
                job_text = text;
            }
        }
    }
    if job_text.is_empty() {
        job_text = element_text(document.root_element(), "\n");
    }

    let job_text: String = clean_text(&job_text).chars().take(GENERIC_TEXT_LIMIT).collect();
    if job_text.is_empty() {
        return None;
    }

    Some(ScrapedJob {
        job_text,
        title: first_text(document, &["h1"]),
        company: None,
        board: JobBoard::Generic,
        from_url_pattern: false,
    })
}

/// Title/company/id recoverable from the URL of a known job board.
pub fn parse_url_info(url: &Url, board: JobBoard) -> Option<UrlInfo> {
    static LINKEDIN_ID: OnceLock<Regex> = OnceLock::new();
    static LINKEDIN_SLUG: OnceLock<Regex> = OnceLock::new();

    match board {
        JobBoard::LinkedIn => {
            let path = url.path();
            let id_re = LINKEDIN_ID.get_or_init(|| Regex::new(r"/jobs/view/(\d+)").expect("valid regex"));
            let slug_re = LINKEDIN_SLUG
                .get_or_init(|| Regex::new(r"/jobs/view/([^/]+)-at-([^/]+)-(\d+)").expect("valid regex"));

            let mut info = UrlInfo::default();
            if let Some(caps) = slug_re.captures(path) {
                info.title = Some(title_case(&caps[1]));
                info.company = Some(title_case(&caps[2]));
                info.job_id = Some(caps[3].to_string());
            } else if let Some(caps) = id_re.captures(path) {
                info.job_id = Some(caps[1].to_string());
            }
            Some(info)
        }
        JobBoard::Indeed => Some(UrlInfo {
            job_id: url
                .query_pairs()
                .find(|(k, _)| k == "jk")
                .map(|(_, v)| v.into_owned()),
            ..Default::default()
        }),
        JobBoard::Glassdoor => Some(UrlInfo::default()),
        JobBoard::Generic => None,
    }
}

fn placeholder_job(url: &Url, board: JobBoard, info: UrlInfo) -> ScrapedJob {
    let title = info.title.clone().unwrap_or_else(|| "Position".to_string());
    let company = info.company.clone().unwrap_or_else(|| "Company".to_string());
    let board_name = match board {
        JobBoard::Generic => "Job Board".to_string(),
        other => other.to_string(),
    };

    let job_id = info
        .job_id
        .as_deref()
        .map(|id| format!("Job ID: {id}\n"))
        .unwrap_or_default();
    let job_text = format!(
        "Job Posting from {board_name}\n\n\
         Job Title: {title}\n\
         Company: {company}\n\
         {job_id}\
         Source URL: {url}\n\n\
         Only the URL of this posting could be read. Tailor the resume to the job title and \
         company above and to the standard requirements of this type of role."
    );

    ScrapedJob {
        job_text,
        title: info.title,
        company: info.company,
        board,
        from_url_pattern: true,
    }
}

fn select_first<'a>(document: &'a Html, selector: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(selector).ok()?;
    document.select(&selector).next()
}

fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors.iter().find_map(|s| {
        let text = element_text(select_first(document, s)?, " ");
        (!text.is_empty()).then_some(text)
    })
}

/// Visible text of an element: trimmed text nodes joined by `separator`,
/// skipping scripts, styles and page chrome.
fn element_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let in_chrome = node.ancestors().any(|a| {
                a.value()
                    .as_element()
                    .is_some_and(|e| CHROME_TAGS.contains(&e.name()))
            });
            let trimmed = text.trim();
            (!in_chrome && !trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .collect::<Vec<_>>()
        .join(separator)
}

/// Collapses blank-line runs and horizontal whitespace, and strips job-board UI text.
pub fn clean_text(text: &str) -> String {
    static BLANK_LINES: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    static BOILERPLATE_RE: OnceLock<Regex> = OnceLock::new();

    let blank_lines = BLANK_LINES.get_or_init(|| Regex::new(r"\n\s*\n").expect("valid regex"));
    let spaces = SPACES.get_or_init(|| Regex::new(r"[ \t]+").expect("valid regex"));
    let boilerplate = BOILERPLATE_RE.get_or_init(|| {
        let alternation = BOILERPLATE
            .iter()
            .map(|p| regex::escape(p))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?i){alternation}")).expect("valid regex")
    });

    let text = blank_lines.replace_all(text, "\n\n");
    let text = spaces.replace_all(&text, " ");
    let text = boilerplate.replace_all(&text, "");
    text.trim().to_string()
}

fn title_case(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_board_detection() {
        assert_eq!(JobBoard::from_url(&url("https://www.linkedin.com/jobs/view/1")), JobBoard::LinkedIn);
        assert_eq!(JobBoard::from_url(&url("https://uk.indeed.com/viewjob?jk=abc")), JobBoard::Indeed);
        assert_eq!(JobBoard::from_url(&url("https://www.glassdoor.com/job/x")), JobBoard::Glassdoor);
        assert_eq!(JobBoard::from_url(&url("https://careers.example.com/1")), JobBoard::Generic);
    }

    #[test]
    fn test_linkedin_slug_yields_title_and_company() {
        let u = url("https://www.linkedin.com/jobs/view/senior-rust-engineer-at-acme-corp-3901234567/");
        let info = parse_url_info(&u, JobBoard::LinkedIn).unwrap();
        assert_eq!(info.title.as_deref(), Some("Senior Rust Engineer"));
        assert_eq!(info.company.as_deref(), Some("Acme Corp"));
        assert_eq!(info.job_id.as_deref(), Some("3901234567"));
    }

    #[test]
    fn test_linkedin_numeric_url_yields_id_only() {
        let u = url("https://www.linkedin.com/jobs/view/3901234567/");
        let info = parse_url_info(&u, JobBoard::LinkedIn).unwrap();
        assert_eq!(info.job_id.as_deref(), Some("3901234567"));
        assert!(info.title.is_none());
    }

    #[test]
    fn test_indeed_job_key_from_query() {
        let u = url("https://www.indeed.com/viewjob?jk=9f8e7d&from=serp");
        let info = parse_url_info(&u, JobBoard::Indeed).unwrap();
        assert_eq!(info.job_id.as_deref(), Some("9f8e7d"));
    }

    #[test]
    fn test_generic_url_has_no_info() {
        assert!(parse_url_info(&url("https://example.com/jobs/1"), JobBoard::Generic).is_none());
    }

    #[test]
    fn test_placeholder_mentions_title_company_and_url() {
        let u = url("https://www.linkedin.com/jobs/view/data-engineer-at-globex-42/");
        let info = parse_url_info(&u, JobBoard::LinkedIn).unwrap();
        let job = placeholder_job(&u, JobBoard::LinkedIn, info);
        assert!(job.from_url_pattern);
        assert!(job.job_text.contains("Job Posting from LinkedIn"));
        assert!(job.job_text.contains("Job Title: Data Engineer"));
        assert!(job.job_text.contains("Company: Globex"));
        assert!(job.job_text.contains("Job ID: 42"));
        assert!(job.job_text.contains("data-engineer-at-globex-42"));
    }

    #[test]
    fn test_clean_text_strips_boilerplate_and_whitespace() {
        let raw = "Easy Apply\n\n\n  We build   ledgers.\t\tRust required.\n \nshow more";
        assert_eq!(clean_text(raw), "We build ledgers. Rust required.");
    }

    #[test]
    fn test_parse_indeed_posting() {
        let html = r#"<html><body>
            <h1 class="jobsearch-JobInfoHeader-title">Platform Engineer</h1>
            <div data-company-name="true">Initech</div>
            <div id="jobDescriptionText"><p>Operate Kubernetes clusters.</p><ul><li>Go</li><li>Terraform</li></ul></div>
        </body></html>"#;
        let job = parse_posting(JobBoard::Indeed, html).unwrap();
        assert_eq!(job.title.as_deref(), Some("Platform Engineer"));
        assert_eq!(job.company.as_deref(), Some("Initech"));
        assert_eq!(job.job_text, "Operate Kubernetes clusters.\nGo\nTerraform");
    }

    #[test]
    fn test_linkedin_login_wall_yields_nothing() {
        let html = "<html><body><main><p>Sign in to apply</p></main></body></html>";
        assert!(parse_posting(JobBoard::LinkedIn, html).is_none());
    }

    #[test]
    fn test_generic_prefers_longest_container_and_skips_scripts() {
        let html = r#"<html><body>
            <header>Careers Home</header>
            <article>Short teaser</article>
            <main>
              <script>var tracking = 1;</script>
              <h1>Staff Engineer</h1>
              <p>Design storage engines in Rust. Own the write path end to end.</p>
            </main>
        </body></html>"#;
        let job = parse_posting(JobBoard::Generic, html).unwrap();
        assert_eq!(job.title.as_deref(), Some("Staff Engineer"));
        assert!(job.job_text.contains("Design storage engines in Rust."));
        assert!(!job.job_text.contains("tracking"));
        assert!(!job.job_text.contains("Careers Home"));
    }
}
