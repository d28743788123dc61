// Resume analysis: extracts a structured profile from one resume's text.
// All LLM calls go through the Dispatcher; no direct provider calls here.

pub mod analyzer;
pub mod handlers;
pub mod prompts;
