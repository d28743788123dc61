// Screening: scores each resume against free-text job requirements.
// All LLM calls go through the Dispatcher; no direct provider calls here.

pub mod handlers;
pub mod prompts;
pub mod screener;
