// Benefits Q&A: employee questions answered from a pool of policy documents.

pub mod handlers;
pub mod prompts;
pub mod query;
