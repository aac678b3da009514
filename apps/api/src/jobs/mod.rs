// Job intake: validates the caller's job reference, scrapes job boards when given a
// URL, and structures the posting with the LLM.

pub mod extractor;
pub mod prompts;
pub mod scraper;
