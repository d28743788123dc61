use std::sync::Arc;

use crate::chat::conversation::ConversationStore;
use crate::dispatch::Dispatcher;
use crate::pool::DocumentPool;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the provider registry; every task service calls providers through it.
    pub dispatcher: Dispatcher,
    pub resume_pool: Arc<DocumentPool>,
    pub benefit_pool: Arc<DocumentPool>,
    pub conversations: Arc<ConversationStore>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            resume_pool: Arc::new(DocumentPool::new("resume")),
            benefit_pool: Arc::new(DocumentPool::new("benefit")),
            conversations: Arc::new(ConversationStore::new()),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State backed by a registry built from `pairs` and a scripted backend.
    pub fn for_tests(
        pairs: &[(&str, &str)],
        backend: Arc<crate::llm_client::fake::FakeBackend>,
    ) -> Self {
        let registry = crate::providers::ProviderRegistry::from_pairs(pairs);
        Self::new(Dispatcher::new(Arc::new(registry), backend))
    }
}
