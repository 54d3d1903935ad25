//! Wire types for the Prism corpus API.

use serde::Deserialize;
use serde_json::Value;

fn default_true() -> bool {
    true
}

/// Per-document outcome inside an import response.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentImportResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of `POST /api/v1/corpus/import`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportResponse {
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub imported: usize,
    #[serde(default)]
    pub failed: usize,
    #[serde(default)]
    pub results: Vec<DocumentImportResult>,
}

/// One hit from `POST /api/v1/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub document_title: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub similarity: f64,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl SearchHit {
    /// Display title, falling back across the fields Prism may populate.
    pub fn display_title(&self) -> &str {
        self.document_title
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or("Unknown")
    }
}

/// Response of `POST /api/v1/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

/// Response of `GET /api/v1/admin/stats`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PrismStats {
    #[serde(default)]
    pub total_documents: usize,
    #[serde(default)]
    pub corpus_documents: usize,
    #[serde(default)]
    pub kb_documents: usize,
    #[serde(default)]
    pub total_chunks: usize,
    #[serde(default)]
    pub embedded_chunks: usize,
    #[serde(default)]
    pub domains: usize,
}

/// Response of `GET /api/v1/documents`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentListing {
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub documents: Vec<Value>,
}

impl DocumentListing {
    /// Total document count, preferring the explicit field over page size.
    pub fn count(&self) -> usize {
        self.total.unwrap_or(self.documents.len())
    }
}
