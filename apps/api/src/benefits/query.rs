//! Benefits query: answers an employee question from every readable policy document.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::benefits::prompts::{BENEFIT_QUERY_PROMPT_TEMPLATE, BENEFIT_QUERY_SYSTEM};
use crate::dispatch::Dispatcher;
use crate::errors::AppError;
use crate::llm_client::prompts::{render, truncate_chars, EVIDENCE_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{lenient, ChatRequest};
use crate::pool::PooledDocument;

/// Characters of each policy document sent to the provider.
pub const POLICY_EXCERPT_CHARS: usize = 5000;
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 4000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BenefitAnswer {
    #[serde(deserialize_with = "lenient::text")]
    pub answer: String,
    #[serde(deserialize_with = "lenient::text_list")]
    pub relevant_documents: Vec<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub key_points: Vec<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub source_quote: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenefitQueryResponse {
    pub success: bool,
    pub query: String,
    #[serde(flatten)]
    pub answer: BenefitAnswer,
    pub total_documents: usize,
    pub provider: String,
    pub model: String,
}

pub fn build_request(query: &str, documents: &[&PooledDocument]) -> ChatRequest {
    let documents_json: Vec<_> = documents
        .iter()
        .map(|d| {
            json!({
                "doc_id": d.doc_id,
                "filename": d.filename,
                "content": truncate_chars(&d.text, POLICY_EXCERPT_CHARS),
            })
        })
        .collect();
    let documents_json = serde_json::to_string_pretty(&documents_json).unwrap_or_default();
    let document_count = documents.len().to_string();

    let prompt = render(
        BENEFIT_QUERY_PROMPT_TEMPLATE,
        &[
            ("document_count", document_count.as_str()),
            ("query", query),
            ("documents_json", documents_json.as_str()),
        ],
    );
    ChatRequest::new(
        format!("{BENEFIT_QUERY_SYSTEM} {EVIDENCE_INSTRUCTION} {JSON_ONLY_INSTRUCTION}"),
        prompt,
    )
    .temperature(TEMPERATURE)
    .max_tokens(MAX_TOKENS)
}

pub async fn query_benefits(
    query: &str,
    pool: Vec<PooledDocument>,
    dispatcher: &Dispatcher,
    model_type: Option<&str>,
) -> Result<BenefitQueryResponse, AppError> {
    if pool.is_empty() {
        return Err(AppError::Validation(
            "The benefits policy library is empty. Add policy documents first".to_string(),
        ));
    }

    let readable: Vec<&PooledDocument> = pool.iter().filter(|d| !d.parse_error).collect();
    if readable.is_empty() {
        return Err(AppError::Validation(
            "None of the policy documents contain text; nothing to answer from".to_string(),
        ));
    }

    let answer = dispatcher
        .complete_json::<BenefitAnswer>(model_type, &build_request(query, &readable))
        .await?;
    info!(
        "Benefits query answered from {} documents via {}",
        readable.len(),
        answer.provider
    );

    Ok(BenefitQueryResponse {
        success: true,
        query: query.to_string(),
        answer: answer.value,
        total_documents: pool.len(),
        provider: answer.provider,
        model: answer.model,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::llm_client::fake::FakeBackend;
    use crate::pool::DocumentPool;
    use crate::providers::ProviderRegistry;

    fn dispatcher(backend: Arc<FakeBackend>) -> Dispatcher {
        let registry = ProviderRegistry::from_pairs(&[
            ("AI_MODELS", "deepseek"),
            ("DEEPSEEK_API_KEY", "sk"),
            ("DEEPSEEK_MODEL", "deepseek-chat"),
        ]);
        Dispatcher::new(Arc::new(registry), backend)
    }

    #[tokio::test]
    async fn test_only_readable_documents_are_sent() {
        let pool = DocumentPool::new("benefit");
        pool.add("leave.txt", "Annual leave is 15 working days.").await;
        pool.add("scan.pdf", "").await;
        let backend = Arc::new(FakeBackend::replying(
            r#"{"answer": "15 days", "relevant_documents": ["leave.txt"], "key_points": ["15 working days"], "source_quote": "Annual leave is 15 working days."}"#,
        ));
        let dispatcher = dispatcher(backend.clone());

        let response = query_benefits(
            "How much annual leave do I get?",
            pool.snapshot().await,
            &dispatcher,
            None,
        )
        .await
        .unwrap();

        assert_eq!(response.answer.answer, "15 days");
        assert_eq!(response.answer.relevant_documents, vec!["leave.txt"]);
        assert_eq!(response.total_documents, 2);

        let prompt = &backend.calls()[0].request.prompt;
        assert!(prompt.contains("leave.txt"));
        assert!(!prompt.contains("scan.pdf"));
    }

    #[tokio::test]
    async fn test_pool_without_text_is_rejected_before_dispatch() {
        let pool = DocumentPool::new("benefit");
        pool.add("scan.pdf", "").await;
        let backend = Arc::new(FakeBackend::replying("{}"));
        let dispatcher = dispatcher(backend.clone());

        let err = query_benefits("leave?", pool.snapshot().await, &dispatcher, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn test_response_flattens_answer_fields() {
        let response = BenefitQueryResponse {
            success: true,
            query: "q".to_string(),
            answer: BenefitAnswer {
                answer: "a".to_string(),
                ..Default::default()
            },
            total_documents: 1,
            provider: "deepseek".to_string(),
            model: "deepseek-chat".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["answer"], "a");
        assert!(json["key_points"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_build_request_truncates_long_policies() {
        let pool_doc = PooledDocument {
            doc_id: uuid::Uuid::new_v4(),
            filename: "handbook.txt".to_string(),
            name: "handbook".to_string(),
            text: "y".repeat(POLICY_EXCERPT_CHARS * 2),
            parse_error: false,
            error_message: None,
            added_at: chrono::Utc::now(),
        };
        let request = build_request("q", &[&pool_doc]);
        assert!(request.prompt.contains(&"y".repeat(POLICY_EXCERPT_CHARS)));
        assert!(!request.prompt.contains(&"y".repeat(POLICY_EXCERPT_CHARS + 1)));
    }
}
