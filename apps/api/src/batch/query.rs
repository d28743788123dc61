//! Batch query: sends the whole resume pool to the provider with a natural-language request
//! and maps the chosen candidates back onto pooled resumes.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::analyzer::RESUME_EXCERPT_CHARS;
use crate::batch::prompts::{BATCH_QUERY_PROMPT_TEMPLATE, BATCH_QUERY_SYSTEM};
use crate::dispatch::Dispatcher;
use crate::errors::AppError;
use crate::llm_client::prompts::{render, truncate_chars, EVIDENCE_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{lenient, ChatRequest};
use crate::pool::PooledDocument;

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 4000;

/// A candidate as named by the provider. Nothing here is trusted until matched to the pool.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CandidateMatch {
    #[serde(deserialize_with = "lenient::text")]
    pub doc_id: String,
    #[serde(deserialize_with = "lenient::opt_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub reason: String,
    #[serde(deserialize_with = "lenient::text_list")]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BatchQueryAnswer {
    #[serde(deserialize_with = "lenient::null_as_default")]
    pub matched_candidates: Vec<CandidateMatch>,
    #[serde(deserialize_with = "lenient::text")]
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchedResume {
    pub doc_id: Uuid,
    pub filename: String,
    pub name: String,
    pub reason: String,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchQueryResponse {
    pub success: bool,
    pub query: String,
    pub total_resumes: usize,
    pub match_count: usize,
    pub matched_resumes: Vec<MatchedResume>,
    pub summary: String,
    pub message: String,
    pub provider: String,
    pub model: String,
}

pub fn build_request(query: &str, resumes: &[PooledDocument]) -> ChatRequest {
    let resumes_json: Vec<_> = resumes
        .iter()
        .map(|r| {
            json!({
                "doc_id": r.doc_id,
                "filename": r.filename,
                "name": r.name,
                "full_text": truncate_chars(&r.text, RESUME_EXCERPT_CHARS),
            })
        })
        .collect();
    let resumes_json = serde_json::to_string_pretty(&resumes_json).unwrap_or_default();
    let resume_count = resumes.len().to_string();

    let prompt = render(
        BATCH_QUERY_PROMPT_TEMPLATE,
        &[
            ("resume_count", resume_count.as_str()),
            ("query", query),
            ("resumes_json", resumes_json.as_str()),
        ],
    );
    ChatRequest::new(
        format!("{BATCH_QUERY_SYSTEM} {EVIDENCE_INSTRUCTION} {JSON_ONLY_INSTRUCTION}"),
        prompt,
    )
    .temperature(TEMPERATURE)
    .max_tokens(MAX_TOKENS)
}

/// Keeps only candidates whose `doc_id` is pooled, once each, in the provider's order.
pub fn select_matches(answer: BatchQueryAnswer, pool: &[PooledDocument]) -> Vec<MatchedResume> {
    let mut matched: Vec<MatchedResume> = Vec::new();

    for candidate in answer.matched_candidates {
        let document = Uuid::parse_str(candidate.doc_id.trim())
            .ok()
            .and_then(|id| pool.iter().find(|d| d.doc_id == id));

        let Some(document) = document else {
            warn!(
                "Provider returned unknown doc_id '{}'; dropping candidate",
                candidate.doc_id
            );
            continue;
        };
        if matched.iter().any(|m| m.doc_id == document.doc_id) {
            continue;
        }

        matched.push(MatchedResume {
            doc_id: document.doc_id,
            filename: document.filename.clone(),
            name: candidate
                .name
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| document.name.clone()),
            reason: candidate.reason,
            highlights: candidate.highlights,
        });
    }

    matched
}

pub async fn query_resumes(
    query: &str,
    pool: Vec<PooledDocument>,
    dispatcher: &Dispatcher,
    model_type: Option<&str>,
) -> Result<BatchQueryResponse, AppError> {
    if pool.is_empty() {
        return Err(AppError::Validation(
            "The resume pool is empty. Add resumes first".to_string(),
        ));
    }

    let answer = dispatcher
        .complete_json::<BatchQueryAnswer>(model_type, &build_request(query, &pool))
        .await?;

    let summary = answer.value.summary.clone();
    let matched_resumes = select_matches(answer.value, &pool);
    info!(
        "Batch query matched {}/{} resumes via {}",
        matched_resumes.len(),
        pool.len(),
        answer.provider
    );

    Ok(BatchQueryResponse {
        success: true,
        query: query.to_string(),
        total_resumes: pool.len(),
        match_count: matched_resumes.len(),
        message: format!("Found {} matching resumes", matched_resumes.len()),
        matched_resumes,
        summary,
        provider: answer.provider,
        model: answer.model,
    })
}
