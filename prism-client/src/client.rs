//! Async HTTP client for the Prism corpus API.

use std::time::Duration;

use serde_json::json;
use tracing::debug;
use url::Url;

use common::document::CorpusDocument;
use common::error::AppError;
use common::utils::config::AppConfig;

use crate::types::{DocumentListing, ImportResponse, PrismStats, SearchResponse};

/// Hard cap the corpus import endpoint enforces per call.
pub const MAX_BATCH_SIZE: usize = 100;

pub struct PrismClient {
    http: reqwest::Client,
    base_url: Url,
}

impl PrismClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::Validation(format!("invalid Prism base URL: {err}")))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(
            &config.prism_base_url,
            Duration::from_secs(config.prism_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        self.base_url
            .join(path)
            .map_err(|err| AppError::Validation(format!("invalid endpoint path {path}: {err}")))
    }

    /// True when the service answers `GET /health` with a success status.
    pub async fn check_health(&self) -> bool {
        let Ok(url) = self.endpoint("/health") else {
            return false;
        };
        debug!(%url, "checking Prism health");
        match self.http.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    pub async fn get_stats(&self) -> Result<PrismStats, AppError> {
        let url = self.endpoint("/api/v1/admin/stats")?;
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Imports one batch of documents (at most [`MAX_BATCH_SIZE`]).
    ///
    /// A larger slice is a caller bug and fails before any request is made.
    pub async fn import_corpus_batch(
        &self,
        documents: &[CorpusDocument],
        embed: bool,
    ) -> Result<ImportResponse, AppError> {
        if documents.len() > MAX_BATCH_SIZE {
            return Err(AppError::Contract(format!(
                "Batch size {} exceeds maximum of {MAX_BATCH_SIZE}. Split into smaller batches.",
                documents.len()
            )));
        }

        let url = self.endpoint("/api/v1/corpus/import")?;
        debug!(%url, count = documents.len(), embed, "importing corpus batch");
        let response = self
            .http
            .post(url)
            .json(&json!({
                "documents": documents,
                "embed": embed,
            }))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn search_documents(
        &self,
        query: &str,
        domain: Option<&str>,
        top_k: usize,
    ) -> Result<SearchResponse, AppError> {
        let url = self.endpoint("/api/v1/search")?;

        let mut payload = json!({
            "query": query,
            "top_k": top_k,
        });
        if let (Some(domain), Some(object)) = (domain, payload.as_object_mut()) {
            object.insert("domain".to_string(), json!(domain));
        }

        debug!(%url, query, domain, "searching documents");
        let response = self
            .http
            .post(url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }

    /// Number of documents in a domain; any failure counts as zero.
    pub async fn count_domain_documents(&self, domain: &str) -> usize {
        let Ok(url) = self.endpoint("/api/v1/documents") else {
            return 0;
        };

        let result = async {
            let response = self
                .http
                .get(url)
                .query(&[("domain", domain), ("limit", "1")])
                .send()
                .await?
                .error_for_status()?;
            response.json::<DocumentListing>().await
        }
        .await;

        match result {
            Ok(listing) => listing.count(),
            Err(_) => 0,
        }
    }
}
