//! Resume Analyzer: asks the selected provider for a structured profile of one resume.

use serde::{Deserialize, Serialize};

use crate::analysis::prompts::{RESUME_ANALYSIS_PROMPT_TEMPLATE, RESUME_ANALYSIS_SYSTEM};
use crate::dispatch::{Answer, Dispatcher};
use crate::errors::AppError;
use crate::llm_client::prompts::{render, truncate_chars, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{lenient, ChatRequest};

/// Characters of resume text sent to the provider.
pub const RESUME_EXCERPT_CHARS: usize = 3000;
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 2000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "lenient::opt_text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    #[serde(deserialize_with = "lenient::opt_text")]
    pub degree: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub school: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub major: Option<String>,
    /// Models answer `2019` as often as `"2019"`.
    #[serde(deserialize_with = "lenient::opt_text")]
    pub graduation_year: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperience {
    #[serde(deserialize_with = "lenient::opt_text")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub position: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub period: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    #[serde(deserialize_with = "lenient::opt_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub technologies: Vec<String>,
}

/// Structured profile of one resume. Every field tolerates being absent, `null`
/// or answered in a neighbouring shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeAnalysis {
    #[serde(deserialize_with = "lenient::opt_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub contact: Contact,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "lenient::number")]
    pub experience_years: f32,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub work_experience: Vec<WorkExperience>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub projects: Vec<Project>,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub summary: Option<String>,
}

pub fn build_request(resume_text: &str) -> ChatRequest {
    let prompt = render(
        RESUME_ANALYSIS_PROMPT_TEMPLATE,
        &[(
            "resume_text",
            truncate_chars(resume_text, RESUME_EXCERPT_CHARS),
        )],
    );
    ChatRequest::new(
        format!("{RESUME_ANALYSIS_SYSTEM} {JSON_ONLY_INSTRUCTION}"),
        prompt,
    )
    .temperature(TEMPERATURE)
    .max_tokens(MAX_TOKENS)
}

pub async fn analyze_resume(
    resume_text: &str,
    dispatcher: &Dispatcher,
    model_type: Option<&str>,
) -> Result<Answer<ResumeAnalysis>, AppError> {
    dispatcher
        .complete_json::<ResumeAnalysis>(model_type, &build_request(resume_text))
        .await
}
