// Document chat: a multi-turn conversation about one uploaded document.
// All LLM calls go through the Dispatcher; no direct provider calls here.

pub mod conversation;
pub mod handlers;
pub mod prompts;
