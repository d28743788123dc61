//! In-memory document pools: resumes for batch screening, policy documents for benefits Q&A.
//!
//! Documents arrive as already-extracted text. Insertion order is preserved; the pool
//! is lost on restart. Query paths clone a snapshot so no lock is held across a provider call.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct PooledDocument {
    pub doc_id: Uuid,
    pub filename: String,
    /// Filename without extension; shown in place of a parsed candidate name.
    pub name: String,
    pub text: String,
    pub parse_error: bool,
    pub error_message: Option<String>,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub doc_id: Uuid,
    pub filename: String,
    pub name: String,
    pub parse_error: bool,
    pub error_message: Option<String>,
    pub text_length: usize,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStatus {
    pub total_count: usize,
    pub documents: Vec<DocumentSummary>,
}

#[derive(Debug, Deserialize)]
pub struct AddDocumentRequest {
    pub filename: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddDocumentResponse {
    pub success: bool,
    pub doc_id: Uuid,
    pub filename: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// `doc_id` stays a string so that an id this service never issued is a 404, not a body error.
#[derive(Debug, Deserialize)]
pub struct RemoveDocumentRequest {
    pub doc_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PoolMessageResponse {
    pub success: bool,
    pub message: String,
}

pub struct DocumentPool {
    /// Used in log lines only, e.g. "resume" or "benefit".
    label: &'static str,
    documents: RwLock<Vec<PooledDocument>>,
}

impl DocumentPool {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            documents: RwLock::new(Vec::new()),
        }
    }

    /// Adds a document. Blank text is still pooled, flagged as a parse error.
    pub async fn add(&self, filename: &str, text: &str) -> PooledDocument {
        let text = text.trim();
        let parse_error = text.is_empty();
        let document = PooledDocument {
            doc_id: Uuid::new_v4(),
            filename: filename.to_string(),
            name: display_name(filename),
            text: text.to_string(),
            parse_error,
            error_message: parse_error.then(|| "No text could be extracted".to_string()),
            added_at: Utc::now(),
        };

        let mut documents = self.documents.write().await;
        documents.push(document.clone());

        if parse_error {
            warn!(
                "Added {} document {} ({}) without text",
                self.label, document.doc_id, document.filename
            );
        } else {
            info!(
                "Added {} document {} ({}); pool size {}",
                self.label,
                document.doc_id,
                document.filename,
                documents.len()
            );
        }

        document
    }

    pub async fn snapshot(&self) -> Vec<PooledDocument> {
        self.documents.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn remove(&self, doc_id: Uuid) -> Option<PooledDocument> {
        let mut documents = self.documents.write().await;
        let index = documents.iter().position(|d| d.doc_id == doc_id)?;
        let removed = documents.remove(index);
        info!("Removed {} document {}", self.label, doc_id);
        Some(removed)
    }

    /// Empties the pool and returns how many documents were dropped.
    pub async fn clear(&self) -> usize {
        let mut documents = self.documents.write().await;
        let count = documents.len();
        documents.clear();
        info!("Cleared {count} {} documents", self.label);
        count
    }

    pub async fn status(&self) -> PoolStatus {
        let documents = self.documents.read().await;
        PoolStatus {
            total_count: documents.len(),
            documents: documents.iter().map(PooledDocument::summary).collect(),
        }
    }

    /// Shared body of the `*_add_*` endpoints.
    pub async fn handle_add(
        &self,
        request: AddDocumentRequest,
        added_message: &str,
    ) -> Result<AddDocumentResponse, AppError> {
        let filename = request.filename.trim();
        if filename.is_empty() {
            return Err(AppError::Validation("filename cannot be empty".to_string()));
        }

        let document = self.add(filename, &request.text).await;
        Ok(AddDocumentResponse {
            success: true,
            doc_id: document.doc_id,
            filename: document.filename,
            message: added_message.to_string(),
            warning: document
                .parse_error
                .then(|| "Document was added but contains no text".to_string()),
        })
    }

    /// Shared body of the `*_remove_*` endpoints.
    pub async fn handle_remove(&self, doc_id: &str) -> Result<PoolMessageResponse, AppError> {
        let removed = self
            .remove(parse_doc_id(doc_id)?)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Document {doc_id} not found")))?;
        Ok(PoolMessageResponse {
            success: true,
            message: format!("Removed {}", removed.filename),
        })
    }

    /// Shared body of the `*_clear_pool` endpoints.
    pub async fn handle_clear(&self) -> PoolMessageResponse {
        let count = self.clear().await;
        PoolMessageResponse {
            success: true,
            message: format!("Cleared {count} documents"),
        }
    }
}

impl PooledDocument {
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            doc_id: self.doc_id,
            filename: self.filename.clone(),
            name: self.name.clone(),
            parse_error: self.parse_error,
            error_message: self.error_message.clone(),
            text_length: self.text.chars().count(),
            added_at: self.added_at,
        }
    }
}

/// Ids are issued as UUIDs; any other string cannot name a document and is a 404.
pub fn parse_doc_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(format!("Document {raw} not found")))
}

/// `张三_简历.pdf` → `张三_简历`.
pub fn display_name(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(filename)
        .to_string()
}
