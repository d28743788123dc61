// Batch screening: a pool of resumes queried together in natural language.
// Resumes are pooled silently on upload; the provider only sees them at query time.

pub mod handlers;
pub mod prompts;
pub mod query;
