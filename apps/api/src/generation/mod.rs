// Resume generation: LaTeX drafting, ATS scoring and the revision loop.
// Model calls sit behind the `ResumeWriter` trait so the loop runs without a network.

pub mod handlers;
pub mod latex;
pub mod optimizer;
pub mod profile_text;
pub mod prompts;
pub mod writer;
