// Skill gap analysis: model-driven comparison of a profile against a job, with a
// keyword-overlap analysis when the model cannot be used.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
