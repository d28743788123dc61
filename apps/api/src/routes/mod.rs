pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::batch::handlers as batch;
use crate::benefits::handlers as benefits;
use crate::chat::handlers as chat;
use crate::providers::handlers as providers;
use crate::screening::handlers as screening;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Model selection
        .route("/api/available_models", get(providers::handle_available_models))
        .route("/api/config_summary", get(providers::handle_config_summary))
        // Single-resume tasks
        .route("/upload", post(analysis::handle_analyze_resume))
        .route("/screen", post(screening::handle_screen))
        // Document chat
        .route("/api/upload_document", post(chat::handle_upload_document))
        .route("/api/chat_with_document", post(chat::handle_chat_with_document))
        .route("/api/clear_conversation", post(chat::handle_clear_conversation))
        .route(
            "/api/conversation_history/:doc_id",
            get(chat::handle_conversation_history),
        )
        // Batch screening pool
        .route("/api/batch_add_resume", post(batch::handle_add_resume))
        .route("/api/batch_query", post(batch::handle_batch_query))
        .route("/api/batch_pool_status", get(batch::handle_pool_status))
        .route("/api/batch_clear_pool", post(batch::handle_clear_pool))
        .route("/api/batch_remove_resume", post(batch::handle_remove_resume))
        // Benefits policy library
        .route("/api/benefit_add_document", post(benefits::handle_add_document))
        .route("/api/benefit_query", post(benefits::handle_benefit_query))
        .route("/api/benefit_pool_status", get(benefits::handle_pool_status))
        .route("/api/benefit_clear_pool", post(benefits::handle_clear_pool))
        .route(
            "/api/benefit_remove_document",
            post(benefits::handle_remove_document),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::fake::FakeBackend;

    const DEEPSEEK_ONLY: &[(&str, &str)] = &[
        ("AI_MODELS", "deepseek,gemini"),
        ("DEEPSEEK_API_KEY", "sk-deepseek"),
        ("DEEPSEEK_MODEL", "deepseek-chat"),
    ];

    const BOTH: &[(&str, &str)] = &[
        ("AI_MODELS", "deepseek,gemini"),
        ("DEEPSEEK_API_KEY", "sk-deepseek"),
        ("DEEPSEEK_MODEL", "deepseek-chat"),
        ("GEMINI_API_KEY", "gm-key"),
        ("GEMINI_MODEL", "gemini-1.5-pro"),
    ];

    async fn send(
        router: Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let state = AppState::for_tests(DEEPSEEK_ONLY, Arc::new(FakeBackend::replying("{}")));
        let (status, body) = send(build_router(state), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model_count"], 1);
        assert_eq!(body["default_model"], "deepseek");
    }

    #[tokio::test]
    async fn test_available_models_lists_only_complete_providers() {
        let state = AppState::for_tests(DEEPSEEK_ONLY, Arc::new(FakeBackend::replying("{}")));
        let (status, body) =
            send(build_router(state), Method::GET, "/api/available_models", None).await;

        assert_eq!(status, StatusCode::OK);
        let models = body.as_array().unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0]["value"], "deepseek");
        assert_eq!(models[0]["display_name"], "deepseek");
    }

    #[tokio::test]
    async fn test_config_summary_reports_incomplete_providers() {
        let state = AppState::for_tests(DEEPSEEK_ONLY, Arc::new(FakeBackend::replying("{}")));
        let (status, body) =
            send(build_router(state), Method::GET, "/api/config_summary", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model_count"], 1);
        assert_eq!(body["default_model"], "deepseek");
        let errors = body["errors"].as_array().unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].as_str().unwrap().contains("GEMINI_API_KEY"));
    }

    #[tokio::test]
    async fn test_undeclared_model_is_rejected_without_a_provider_call() {
        let backend = Arc::new(FakeBackend::replying("{}"));
        let state = AppState::for_tests(DEEPSEEK_ONLY, backend.clone());
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/upload",
            Some(json!({"resume_text": "Rust engineer, 5 years", "model_type": "openai"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "INVALID_MODEL");
        assert!(body["error"]["message"].as_str().unwrap().contains("openai"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_uses_selected_provider() {
        let backend = Arc::new(FakeBackend::replying(
            r#"{"name": "Zhang San", "experience_years": 5, "skills": ["Rust"]}"#,
        ));
        let state = AppState::for_tests(BOTH, backend.clone());
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/upload",
            Some(json!({
                "resume_text": "Zhang San. Rust engineer, 5 years.",
                "filename": "zhangsan.pdf",
                "model_type": "gemini"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["provider"], "gemini");
        assert_eq!(body["model"], "gemini-1.5-pro");
        assert_eq!(body["analysis"]["name"], "Zhang San");
        assert_eq!(backend.calls()[0].provider, "gemini");
    }

    #[tokio::test]
    async fn test_no_configured_model_is_service_unavailable() {
        let backend = Arc::new(FakeBackend::replying("{}"));
        let state = AppState::for_tests(&[("AI_MODELS", "deepseek")], backend.clone());
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/upload",
            Some(json!({"resume_text": "text"})),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "NO_MODEL_CONFIGURED");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_rate_limit_reaches_the_caller() {
        let backend = Arc::new(FakeBackend::failing(429, "Rate limit reached for requests"));
        let state = AppState::for_tests(DEEPSEEK_ONLY, backend);
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/screen",
            Some(json!({
                "requirements": "Senior Rust engineer",
                "resumes": [{"filename": "a.txt", "text": "Rust, 8 years"}]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"]["code"], "PROVIDER_RATE_LIMITED");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Rate limit reached"));
    }

    #[tokio::test]
    async fn test_batch_pool_lifecycle() {
        let backend = Arc::new(FakeBackend::replying("{}"));
        let state = AppState::for_tests(DEEPSEEK_ONLY, backend);
        let router = build_router(state);

        let (status, added) = send(
            router.clone(),
            Method::POST,
            "/api/batch_add_resume",
            Some(json!({"filename": "alice.pdf", "text": "Rust engineer"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(added["success"], true);
        let doc_id = added["doc_id"].as_str().unwrap().to_string();

        let (_, pool) = send(router.clone(), Method::GET, "/api/batch_pool_status", None).await;
        assert_eq!(pool["total_count"], 1);
        assert_eq!(pool["documents"][0]["name"], "alice");

        let (status, _) = send(
            router.clone(),
            Method::POST,
            "/api/batch_remove_resume",
            Some(json!({"doc_id": doc_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            router.clone(),
            Method::POST,
            "/api/batch_remove_resume",
            Some(json!({"doc_id": doc_id})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");

        let (_, pool) = send(router, Method::GET, "/api/batch_pool_status", None).await;
        assert_eq!(pool["total_count"], 0);
    }

    #[tokio::test]
    async fn test_batch_query_on_empty_pool_is_rejected() {
        let backend = Arc::new(FakeBackend::replying("{}"));
        let state = AppState::for_tests(DEEPSEEK_ONLY, backend.clone());
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/api/batch_query",
            Some(json!({"query": "Who knows Rust?"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_benefit_query_answers_from_pool() {
        let backend = Arc::new(FakeBackend::replying(
            r#"{"answer": "15 working days", "relevant_documents": ["leave.txt"], "key_points": [], "source_quote": ""}"#,
        ));
        let state = AppState::for_tests(BOTH, backend.clone());
        let router = build_router(state);

        send(
            router.clone(),
            Method::POST,
            "/api/benefit_add_document",
            Some(json!({"filename": "leave.txt", "text": "Annual leave is 15 working days."})),
        )
        .await;

        let (status, body) = send(
            router.clone(),
            Method::POST,
            "/api/benefit_query",
            Some(json!({"query": "How much annual leave?", "model_type": "deepseek"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "15 working days");
        assert_eq!(body["total_documents"], 1);
        assert_eq!(body["provider"], "deepseek");

        let (_, cleared) = send(router.clone(), Method::POST, "/api/benefit_clear_pool", None).await;
        assert_eq!(cleared["success"], true);
        let (_, pool) = send(router, Method::GET, "/api/benefit_pool_status", None).await;
        assert_eq!(pool["total_count"], 0);
    }

    #[tokio::test]
    async fn test_remove_with_foreign_doc_id_is_json_not_found() {
        let state = AppState::for_tests(DEEPSEEK_ONLY, Arc::new(FakeBackend::replying("{}")));
        let router = build_router(state);

        for uri in ["/api/batch_remove_resume", "/api/benefit_remove_document"] {
            let (status, body) = send(
                router.clone(),
                Method::POST,
                uri,
                Some(json!({"doc_id": "20240101_120000_1234"})),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"]["code"], "NOT_FOUND", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_validation_error() {
        let state = AppState::for_tests(DEEPSEEK_ONLY, Arc::new(FakeBackend::replying("{}")));
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/api/batch_remove_resume",
            Some(json!({"id": 7})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_upload_accepts_loosely_typed_analysis() {
        let backend = Arc::new(FakeBackend::replying(
            r#"{"name": "Li Si", "experience_years": null, "education": [{"graduation_year": 2019}]}"#,
        ));
        let state = AppState::for_tests(DEEPSEEK_ONLY, backend);
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/upload",
            Some(json!({"resume_text": "Li Si, data engineer"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["analysis"]["experience_years"], 0.0);
        assert_eq!(body["analysis"]["education"][0]["graduation_year"], "2019");
    }

    #[tokio::test]
    async fn test_screen_accepts_string_score() {
        let backend = Arc::new(FakeBackend::replying(
            r#"{"match_score": "85", "recommendations": ["Interview"]}"#,
        ));
        let state = AppState::for_tests(DEEPSEEK_ONLY, backend);
        let (status, body) = send(
            build_router(state),
            Method::POST,
            "/screen",
            Some(json!({
                "requirements": "Rust engineer",
                "resumes": [{"filename": "a.txt", "text": "Rust, 8 years"}]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"][0]["match_score"], 85.0);
        assert_eq!(body["results"][0]["insight"]["recommendations"], "Interview");
    }

    #[tokio::test]
    async fn test_document_chat_lifecycle() {
        let backend = Arc::new(FakeBackend::replying_all(&[
            "Zhang San: five years of Rust.",
            "No Go experience is listed.",
        ]));
        let state = AppState::for_tests(BOTH, backend.clone());
        let router = build_router(state);

        let (status, opened) = send(
            router.clone(),
            Method::POST,
            "/api/upload_document",
            Some(json!({
                "filename": "zhang.pdf",
                "text": "Zhang San. Rust engineer, 5 years.",
                "model_type": "gemini"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(opened["analysis"], "Zhang San: five years of Rust.");
        assert_eq!(opened["provider"], "gemini");
        let doc_id = opened["doc_id"].as_str().unwrap().to_string();

        let (status, reply) = send(
            router.clone(),
            Method::POST,
            "/api/chat_with_document",
            Some(json!({"doc_id": doc_id, "message": "Any Go experience?"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reply["ai_response"], "No Go experience is listed.");
        assert_eq!(reply["conversation_length"], 4);
        assert_eq!(reply["provider"], "gemini");
        assert_eq!(backend.calls()[1].request.history.len(), 2);

        let history_uri = format!("/api/conversation_history/{doc_id}");
        let (status, history) = send(router.clone(), Method::GET, &history_uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["count"], 4);
        assert_eq!(history["history"][1]["role"], "assistant");
        assert_eq!(history["history"][2]["content"], "Any Go experience?");

        let (status, cleared) = send(
            router.clone(),
            Method::POST,
            "/api/clear_conversation",
            Some(json!({"doc_id": doc_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cleared["success"], true);

        let (status, body) = send(router, Method::GET, &history_uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_chat_with_unknown_document_is_not_found() {
        let backend = Arc::new(FakeBackend::replying("unused"));
        let state = AppState::for_tests(DEEPSEEK_ONLY, backend.clone());
        let router = build_router(state);

        let (status, body) = send(
            router.clone(),
            Method::POST,
            "/api/chat_with_document",
            Some(json!({"doc_id": "20240101_120000_1234", "message": "hello"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
        assert_eq!(backend.call_count(), 0);

        let (status, _) = send(
            router.clone(),
            Method::POST,
            "/api/clear_conversation",
            Some(json!({"doc_id": uuid::Uuid::new_v4()})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            router,
            Method::GET,
            "/api/conversation_history/not-a-document",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
