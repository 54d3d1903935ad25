//! Sequential batch upload with aggregated result accounting.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};

use common::document::CorpusDocument;
use common::error::AppError;

use crate::client::{PrismClient, MAX_BATCH_SIZE};

#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Documents per API call, capped at [`MAX_BATCH_SIZE`].
    pub batch_size: usize,
    /// Whether Prism should generate embeddings during import.
    pub embed: bool,
    /// Pause between consecutive batches. Rate-limiting courtesy, not
    /// backpressure.
    pub batch_pause: Duration,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            batch_size: MAX_BATCH_SIZE,
            embed: true,
            batch_pause: Duration::from_millis(500),
        }
    }
}

/// One recorded failure: a whole batch, or a single document inside an
/// otherwise successful batch.
#[derive(Debug, Clone)]
pub enum ImportFailure {
    Batch { batch: usize, message: String },
    Document { title: String, message: String },
}

/// Aggregate accounting for a full upload run.
#[derive(Debug, Clone, Default)]
pub struct BatchImportReport {
    pub total_documents: usize,
    pub total_batches: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub failures: Vec<ImportFailure>,
}

/// Uploads documents in sequential batches.
///
/// A failed health pre-flight aborts before any batch; after that, batch
/// failures are recorded and the run continues, so the caller always gets
/// a full accounting.
pub async fn import_documents_in_batches(
    client: &PrismClient,
    documents: &[CorpusDocument],
    options: &UploadOptions,
) -> Result<BatchImportReport, AppError> {
    if options.batch_size == 0 || options.batch_size > MAX_BATCH_SIZE {
        return Err(AppError::Contract(format!(
            "Batch size must be between 1 and {MAX_BATCH_SIZE}, got {}",
            options.batch_size
        )));
    }

    if !client.check_health().await {
        return Err(AppError::ServiceUnavailable(format!(
            "Prism service not accessible at {}. Ensure Prism is running.",
            client.base_url()
        )));
    }

    let total_batches = documents.len().div_ceil(options.batch_size);
    let mut report = BatchImportReport {
        total_documents: documents.len(),
        total_batches,
        ..BatchImportReport::default()
    };

    for (batch_index, batch) in documents.chunks(options.batch_size).enumerate() {
        let batch_num = batch_index + 1;

        match client.import_corpus_batch(batch, options.embed).await {
            Ok(response) => {
                report.success_count += response.imported;
                report.error_count += response.failed;

                for result in &response.results {
                    if !result.success {
                        if let Some(error) = &result.error {
                            report.failures.push(ImportFailure::Document {
                                title: result.title.clone(),
                                message: error.clone(),
                            });
                        }
                    }
                }

                info!(
                    batch = batch_num,
                    total_batches,
                    imported = response.imported,
                    failed = response.failed,
                    "imported batch"
                );
            }
            Err(err) => {
                // The whole batch counts as failed; remaining batches
                // still run.
                report.error_count += batch.len();
                report.failures.push(ImportFailure::Batch {
                    batch: batch_num,
                    message: format!("Batch {batch_num} failed: {err}"),
                });
                warn!(batch = batch_num, total_batches, error = %err, "batch import failed");
            }
        }

        if batch_num < total_batches && !options.batch_pause.is_zero() {
            sleep(options.batch_pause).await;
        }
    }

    Ok(report)
}
