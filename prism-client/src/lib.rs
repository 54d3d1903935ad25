#![allow(clippy::missing_docs_in_private_items)]

pub mod client;
pub mod types;
pub mod uploader;

pub use client::{PrismClient, MAX_BATCH_SIZE};
pub use types::{
    DocumentImportResult, DocumentListing, ImportResponse, PrismStats, SearchHit, SearchResponse,
};
pub use uploader::{
    import_documents_in_batches, BatchImportReport, ImportFailure, UploadOptions,
};
