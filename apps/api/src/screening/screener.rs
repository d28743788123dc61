//! Resume Screener: one provider call per resume, results ranked by match score.
//!
//! Resumes are screened sequentially with the same provider. The first provider
//! failure aborts the whole screening and is returned to the caller as-is.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::analyzer::RESUME_EXCERPT_CHARS;
use crate::dispatch::Dispatcher;
use crate::errors::AppError;
use crate::llm_client::prompts::{render, truncate_chars, EVIDENCE_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{lenient, ChatRequest};
use crate::pool::PooledDocument;
use crate::screening::prompts::{SCREENING_PROMPT_TEMPLATE, SCREENING_SYSTEM};

const TEMPERATURE: f32 = 0.5;
const MAX_TOKENS: u32 = 1500;

/// A resume to screen. `id` is echoed back so callers can correlate results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenCandidate {
    pub id: Option<String>,
    pub filename: String,
    pub text: String,
}

impl From<&PooledDocument> for ScreenCandidate {
    fn from(document: &PooledDocument) -> Self {
        Self {
            id: Some(document.doc_id.to_string()),
            filename: document.filename.clone(),
            text: document.text.clone(),
        }
    }
}

/// The provider's assessment of one candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningInsight {
    #[serde(deserialize_with = "lenient::number")]
    pub match_score: f32,
    #[serde(deserialize_with = "lenient::text_list")]
    pub strengths: Vec<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub weaknesses: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub recommendations: String,
    #[serde(deserialize_with = "lenient::text_list")]
    pub key_highlights: Vec<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub concerns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningResult {
    pub id: Option<String>,
    pub filename: String,
    /// 0 – 100, rounded to two decimals.
    pub match_score: f32,
    pub insight: ScreeningInsight,
}

#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    pub results: Vec<ScreeningResult>,
    pub provider: String,
    pub model: String,
}

pub fn build_request(requirements: &str, resume_text: &str) -> ChatRequest {
    let prompt = render(
        SCREENING_PROMPT_TEMPLATE,
        &[
            ("requirements", requirements),
            (
                "resume_text",
                truncate_chars(resume_text, RESUME_EXCERPT_CHARS),
            ),
        ],
    );
    ChatRequest::new(
        format!("{SCREENING_SYSTEM} {EVIDENCE_INSTRUCTION} {JSON_ONLY_INSTRUCTION}"),
        prompt,
    )
    .temperature(TEMPERATURE)
    .max_tokens(MAX_TOKENS)
}

pub async fn screen_resumes(
    requirements: &str,
    candidates: Vec<ScreenCandidate>,
    dispatcher: &Dispatcher,
    model_type: Option<&str>,
) -> Result<ScreeningOutcome, AppError> {
    // Resolve once so an invalid selection fails before any outbound call.
    let provider = dispatcher.resolve(model_type)?;
    let provider_id = provider.id.clone();
    let model = provider.model.clone();

    let mut results = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let answer = dispatcher
            .complete_json::<ScreeningInsight>(
                Some(&provider_id),
                &build_request(requirements, &candidate.text),
            )
            .await?;
        results.push(ScreeningResult {
            id: candidate.id,
            filename: candidate.filename,
            match_score: normalize_score(answer.value.match_score),
            insight: answer.value,
        });
    }

    rank(&mut results);
    info!(
        "Screened {} resumes with {} ({})",
        results.len(),
        provider_id,
        model
    );

    Ok(ScreeningOutcome {
        results,
        provider: provider_id,
        model,
    })
}

/// Clamps to 0 – 100 and rounds to two decimals. NaN scores count as 0.
pub fn normalize_score(score: f32) -> f32 {
    if score.is_nan() {
        return 0.0;
    }
    (score.clamp(0.0, 100.0) * 100.0).round() / 100.0
}

/// Highest score first; ties keep their input order.
pub fn rank(results: &mut [ScreeningResult]) {
    results.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
}
